use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use blockscript_compiler::{compile, preset, validate, MemoryGraph};
use blockscript_games::{
    ArtistAdapter, ArtistLevel, ArtistState, FarmAdapter, FarmLevel, FarmState, Heading, Level,
    LevelError, MazeAdapter, MazeLevel, MazeState, Pace, Position,
};
use blockscript_program::{BlockId, Program};
use blockscript_runtime::testing::RecordingObserver;
use blockscript_runtime::{run, Completion, RunOutcome};

fn maze_program() -> Program {
    let mut graph = MemoryGraph::new();
    let start = graph.add_top("start", "when_run");
    let forward = graph.add_block("fwd", "maze_move_forward");
    graph.set_field(forward, "STEPS", 2);
    let turn = graph.add_block("turn", "maze_turn_right");
    let down = graph.add_block("down", "maze_move_forward");
    graph.chain(&[start, forward, turn, down]);

    let program = compile(&graph, preset("maze").unwrap()).unwrap();
    validate(&program).unwrap();
    program
}

#[tokio::test]
async fn compiled_maze_program_hits_a_wall() {
    let level = MazeLevel::new(&["S.#", "#.G", "###"], Heading::East).unwrap();
    let observer = Arc::new(RecordingObserver::new());

    let adapter = MazeAdapter::new(level);
    let report = run(maze_program(), adapter, MazeState::default(), observer.clone())
        .join()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::Completed(Completion::Lost("hit a wall at (2, 0)".into()))
    );
    assert_eq!(report.state.position, Position::new(1, 0));
    assert_eq!(observer.step_ids().len(), 2);
}

#[tokio::test]
async fn compiled_maze_program_wins() {
    let level = MazeLevel::new(&["S.#", "#.G", "###"], Heading::East).unwrap();
    let mut graph = MemoryGraph::new();
    let start = graph.add_top("start", "when_run");
    let a = graph.add_block("a", "move_forward");
    let r = graph.add_block("r", "turn_right");
    let b = graph.add_block("b", "move_forward");
    let l = graph.add_block("l", "turn_left");
    let c = graph.add_block("c", "move_forward");
    graph.chain(&[start, a, r, b, l, c]);
    let program = compile(&graph, preset("maze").unwrap()).unwrap();

    let observer = Arc::new(RecordingObserver::new());
    let report = run(program, MazeAdapter::new(level), MazeState::default(), observer.clone())
        .join()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::Completed(Completion::Won("reached the goal".into()))
    );
    assert_eq!(report.state.position, Position::new(2, 1));
    let ids: Vec<BlockId> = ["start", "a", "r", "b", "l", "c"]
        .into_iter()
        .map(BlockId::from)
        .collect();
    assert_eq!(observer.step_ids(), ids);
}

#[tokio::test]
async fn compiled_artist_repeat_draws_a_square() {
    let mut graph = MemoryGraph::new();
    let start = graph.add_top("start", "when_run");
    let repeat = graph.add_block("rep", "controls_repeat");
    graph.set_field(repeat, "TIMES", 4);
    let forward = graph.add_block("fwd", "artist_move_forward");
    graph.set_field(forward, "STEPS", 10);
    let turn = graph.add_block("turn", "artist_turn_left");
    graph.chain(&[forward, turn]);
    graph.set_input(repeat, "DO", forward);
    graph.chain(&[start, repeat]);

    let program = compile(&graph, preset("artist").unwrap()).unwrap();
    let level = ArtistLevel::from_json(
        r#"{"width": 40, "height": 40, "start": {"x": 5, "y": 5}, "heading": 0}"#,
    )
    .unwrap();
    let observer = Arc::new(RecordingObserver::new());

    let adapter = ArtistAdapter::new(level);
    let report = run(program, adapter, ArtistState::default(), observer.clone())
        .join()
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed(Completion::Finished));
    assert_eq!(report.state.segments.len(), 4);
    assert_eq!(report.steps, 9);
}

#[tokio::test]
async fn farm_level_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"rows": ["S*"], "facing": "east", "goal": {{"collect": 1}}}}"#
    )
    .unwrap();
    let level = FarmLevel::load(file.path()).unwrap();

    let mut graph = MemoryGraph::new();
    let start = graph.add_top("start", "farm_start");
    let forward = graph.add_block("fwd", "farm_move_forward");
    let collect = graph.add_block("take", "farm_collect");
    graph.chain(&[start, forward, collect]);
    let program = compile(&graph, preset("farm").unwrap()).unwrap();

    let report = run(
        program,
        FarmAdapter::new(level),
        FarmState::default(),
        Arc::new(RecordingObserver::new()),
    )
    .join()
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::Completed(Completion::Won("the farm work is done".into()))
    );
    assert_eq!(report.state.collected, 1);
}

#[test]
fn missing_level_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MazeLevel::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LevelError::Io(_)));
}

#[tokio::test(start_paused = true)]
async fn pace_stretches_the_run() {
    let level = MazeLevel::new(&["S...G"], Heading::East).unwrap();
    let program = maze_program();
    let begin = tokio::time::Instant::now();

    let report = run(
        Program::new(program.ops()[..2].to_vec()),
        MazeAdapter::new(level).with_pace(Pace::from_millis(250)),
        MazeState::default(),
        Arc::new(RecordingObserver::new()),
    )
    .join()
    .await
    .unwrap();

    assert_eq!(report.state.position, Position::new(2, 0));
    assert_eq!(begin.elapsed(), Duration::from_millis(250));
}
