use std::path::{Path, PathBuf};

use blockscript_cli::args::{CompileArgs, ProgramArgs, RunArgs};
use blockscript_cli::{commands, CliError};
use blockscript_compiler::{CompilationError, ValidationError};
use blockscript_program::{BlockId, Program};
use blockscript_runtime::{Completion, RunOutcome, RuntimeError};

const MAZE_PROGRAM: &str = r#"{
  "blocks": {
    "languageVersion": 0,
    "blocks": [
      {
        "type": "when_run", "id": "start",
        "next": {"block": {
          "type": "maze_move_forward", "id": "fwd",
          "fields": {"STEPS": 2}
        }}
      }
    ]
  }
}"#;

const CORRIDOR: &str = r#"{"rows": ["S.G"], "facing": "east"}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn program_args(program: PathBuf, game: &str) -> ProgramArgs {
    ProgramArgs {
        program,
        game: game.to_string(),
        config: None,
    }
}

fn run_args(program: PathBuf, game: &str, level: PathBuf) -> RunArgs {
    RunArgs {
        program: program_args(program, game),
        level,
        step_ms: 0,
        max_steps: None,
    }
}

#[test]
fn compile_prints_program_json() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(dir.path(), "program.json", MAZE_PROGRAM);

    let json = commands::compile(&CompileArgs {
        program: program_args(program, "maze"),
        pretty: false,
    })
    .unwrap();

    let parsed: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.leaf_count(), 2);
    assert!(json.contains(r#""op":"move""#));
}

#[test]
fn compile_with_custom_config() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(
        dir.path(),
        "program.json",
        r#"[{"type": "go", "id": "g", "next": {"block": {"type": "hop", "id": "h"}}}]"#,
    );
    let config = write(
        dir.path(),
        "config.json",
        r#"{"classes": {"start": ["go"], "move": ["hop"]}}"#,
    );

    let mut args = program_args(program, "maze");
    args.config = Some(config);
    let json = commands::compile(&CompileArgs {
        program: args,
        pretty: true,
    })
    .unwrap();

    assert!(json.contains('\n'));
    let parsed: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.first_block(), Some(&BlockId::from("g")));
}

#[test]
fn compile_errors() {
    let dir = tempfile::tempdir().unwrap();
    let no_start = write(
        dir.path(),
        "no_start.json",
        r#"[{"type": "move_forward", "id": "m"}]"#,
    );
    let only_start = write(dir.path(), "only_start.json", r#"[{"type": "when_run", "id": "s"}]"#);

    let err = commands::load_program(&program_args(no_start, "maze")).unwrap_err();
    assert!(matches!(
        err,
        CliError::Compile(CompilationError::MissingStart { .. })
    ));

    let err = commands::load_program(&program_args(only_start.clone(), "maze")).unwrap_err();
    assert!(matches!(err, CliError::Validate(ValidationError::Empty)));

    let err = commands::load_program(&program_args(only_start, "pinball")).unwrap_err();
    assert!(matches!(err, CliError::UnknownGame(ref g) if g == "pinball"));
    assert!(err.to_string().contains("blockscript presets"));

    let err = commands::load_program(&program_args(dir.path().join("missing.json"), "maze"))
        .unwrap_err();
    assert!(matches!(err, CliError::Graph(_)));
}

#[test]
fn very_long_programs_compile_truncated() {
    let len = 5_000;
    let mut text = String::from(r#"[{"type": "maze_start", "id": "start""#);
    for i in 0..len {
        text.push_str(&format!(
            r#", "next": {{"block": {{"type": "maze_move_forward", "id": "m{i}""#
        ));
    }
    text.push_str(&"}}".repeat(len));
    text.push_str("}]");

    let dir = tempfile::tempdir().unwrap();
    let program = write(dir.path(), "program.json", &text);
    let program = commands::load_program(&program_args(program, "maze")).unwrap();
    assert_eq!(program.len(), blockscript_compiler::DEFAULT_MAX_BLOCKS);
}

#[test]
fn presets_are_listed() {
    assert_eq!(commands::presets(), "artist\nfarm\nmaze");
}

#[tokio::test]
async fn run_maze_level() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(dir.path(), "program.json", MAZE_PROGRAM);
    let level = write(dir.path(), "level.json", CORRIDOR);

    let summary = commands::run(&run_args(program, "maze", level), std::future::pending())
        .await
        .unwrap();

    assert_eq!(
        summary.outcome,
        RunOutcome::Completed(Completion::Won("reached the goal".into()))
    );
    assert_eq!(summary.steps, vec![BlockId::from("start"), BlockId::from("fwd")]);
    assert_eq!(
        summary.to_string(),
        "step 1: start\nstep 2: fwd\nwon: reached the goal\nat (2, 0) facing east\n"
    );
}

#[tokio::test]
async fn run_with_step_limit_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(
        dir.path(),
        "program.json",
        r#"[{"type": "when_run", "id": "s", "next": {"block": {
            "type": "controls_repeat", "id": "r", "fields": {"TIMES": 50},
            "inputs": {"DO": {"block": {"type": "turn_left", "id": "t"}}}
        }}}]"#,
    );
    let level = write(dir.path(), "level.json", CORRIDOR);

    let mut args = run_args(program, "maze", level);
    args.max_steps = Some(10);
    let err = commands::run(&args, std::future::pending()).await.unwrap_err();

    assert!(matches!(
        err,
        CliError::Runtime(RuntimeError::StepLimit { limit: 10 })
    ));
}

#[tokio::test]
async fn run_can_be_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(dir.path(), "program.json", MAZE_PROGRAM);
    let level = write(dir.path(), "level.json", CORRIDOR);

    let summary = commands::run(&run_args(program, "maze", level), async {})
        .await
        .unwrap();

    // The stop can land before any step, between steps or after the run.
    match summary.outcome {
        RunOutcome::Cancelled => assert!(summary.steps.len() < 2),
        RunOutcome::Completed(_) => assert_eq!(summary.steps.len(), 2),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn run_rejects_bad_level() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(dir.path(), "program.json", MAZE_PROGRAM);
    let level = write(dir.path(), "level.json", r#"{"rows": ["S.."]}"#);

    let err = commands::run(&run_args(program, "maze", level), std::future::pending())
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Level(_)));
}

#[tokio::test]
async fn run_farm_level() {
    let dir = tempfile::tempdir().unwrap();
    let program = write(
        dir.path(),
        "program.json",
        r#"[{"type": "farm_start", "id": "s", "next": {"block": {
            "type": "farm_move_forward", "id": "m", "next": {"block": {
                "type": "farm_plant", "id": "p", "next": {"block": {
                    "type": "farm_water", "id": "w", "next": {"block": {
                        "type": "farm_harvest", "id": "h"
        }}}}}}}}}]"#,
    );
    let level = write(
        dir.path(),
        "level.json",
        r#"{"rows": ["So"], "facing": "east", "goal": {"harvest": 1}}"#,
    );

    let summary = commands::run(&run_args(program, "farm", level), std::future::pending())
        .await
        .unwrap();

    assert_eq!(
        summary.outcome,
        RunOutcome::Completed(Completion::Won("the farm work is done".into()))
    );
    assert_eq!(summary.steps.len(), 5);
    assert!(summary.state.ends_with("0 collected, 1 harvested"));
}
