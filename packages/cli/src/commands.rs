//! The subcommands.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

use blockscript_compiler::{preset, preset_names, validate, Compiler, CompilerConfig};
use blockscript_games::{
    ArtistAdapter, ArtistLevel, ArtistState, FarmAdapter, FarmLevel, FarmState, Level, MazeAdapter,
    MazeLevel, MazeState, Pace,
};
use blockscript_json_graph::JsonGraph;
use blockscript_program::{BlockId, Program};
use blockscript_runtime::{Adapter, Callbacks, Completion, RunOutcome, Runtime, RuntimeConfig};
use tracing::{debug, info};

use crate::args::{CompileArgs, ProgramArgs, RunArgs};
use crate::error::{CliError, Result};

/// The preset for `--game`, or the file given with `--config`.
pub fn load_config(args: &ProgramArgs) -> Result<CompilerConfig> {
    match &args.config {
        Some(path) => {
            debug!("Reading compiler config {}...", path.display());
            let json = std::fs::read_to_string(path)?;
            Ok(CompilerConfig::from_json(&json)?)
        }
        None => preset(&args.game)
            .cloned()
            .ok_or_else(|| CliError::UnknownGame(args.game.clone())),
    }
}

/// Read, compile and validate a program.
pub fn load_program(args: &ProgramArgs) -> Result<Program> {
    let graph = JsonGraph::load(&args.program)?;
    let config = load_config(args)?;

    let program = Compiler::new(&config).compile(&graph)?;
    validate(&program)?;

    info!(
        ops = program.len(),
        leaves = program.leaf_count(),
        "compiled {}",
        args.program.display()
    );
    Ok(program)
}

/// `blockscript compile`: the program as JSON.
pub fn compile(args: &CompileArgs) -> Result<String> {
    let program = load_program(&args.program)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&program)?
    } else {
        serde_json::to_string(&program)?
    };
    Ok(json)
}

/// `blockscript presets`: one preset name per line.
pub fn presets() -> String {
    preset_names().collect::<Vec<_>>().join("\n")
}

/// What a finished run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Blocks in the order they ran.
    pub steps: Vec<BlockId>,
    pub outcome: RunOutcome,
    /// Where the game ended up, in words.
    pub state: String,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, block) in self.steps.iter().enumerate() {
            writeln!(f, "step {}: {}", i + 1, block)?;
        }
        match &self.outcome {
            RunOutcome::Completed(Completion::Finished) => writeln!(f, "finished")?,
            RunOutcome::Completed(Completion::Won(m)) => writeln!(f, "won: {}", m)?,
            RunOutcome::Completed(Completion::Lost(m)) => writeln!(f, "lost: {}", m)?,
            RunOutcome::Failed(e) => writeln!(f, "failed: {}", e)?,
            RunOutcome::Cancelled => writeln!(f, "cancelled")?,
        }
        writeln!(f, "{}", self.state)
    }
}

/// `blockscript run`: play the program on a level until it ends or `stop`
/// resolves.
///
/// A run that ends in an error is returned as `Err`. Winning, losing and
/// being stopped are all summaries.
pub async fn run<F>(args: &RunArgs, stop: F) -> Result<RunSummary>
where
    F: Future<Output = ()> + Send + 'static,
{
    let program = load_program(&args.program)?;
    let pace = Pace::from_millis(args.step_ms);
    let mut config = RuntimeConfig::default();
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    let runtime = Runtime::new(config);
    let level = args.level.as_path();

    match args.program.game.as_str() {
        "maze" => {
            let adapter = MazeAdapter::new(load_level::<MazeLevel>(level)?).with_pace(pace);
            play(&runtime, program, adapter, MazeState::default(), stop, describe_maze).await
        }
        "artist" => {
            let adapter = ArtistAdapter::new(load_level::<ArtistLevel>(level)?).with_pace(pace);
            play(&runtime, program, adapter, ArtistState::default(), stop, describe_artist).await
        }
        "farm" => {
            let adapter = FarmAdapter::new(load_level::<FarmLevel>(level)?).with_pace(pace);
            play(&runtime, program, adapter, FarmState::default(), stop, describe_farm).await
        }
        other => Err(CliError::UnknownGame(other.to_string())),
    }
}

fn load_level<L: Level>(path: &Path) -> Result<L> {
    Ok(L::load(path)?)
}

async fn play<A, F>(
    runtime: &Runtime,
    program: Program,
    adapter: A,
    state: A::State,
    stop: F,
    describe: fn(&A::State) -> String,
) -> Result<RunSummary>
where
    A: Adapter + 'static,
    A::State: 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let steps = Arc::new(Mutex::new(Vec::new()));
    let recorded = steps.clone();
    let observer = Callbacks::new()
        .step(move |block| {
            debug!(%block, "step");
            if let Ok(mut steps) = recorded.lock() {
                steps.push(block.clone());
            }
        })
        .status(|status| debug!(status, "status"));

    let handle = runtime.run(program, adapter, state, Arc::new(observer));
    let token = handle.cancel_token();
    let watcher = tokio::spawn(async move {
        stop.await;
        token.cancel();
    });
    let report = handle.join().await;
    watcher.abort();
    let report = report?;

    let outcome = match report.outcome {
        RunOutcome::Failed(error) => return Err(error.into()),
        outcome => outcome,
    };
    let steps = steps.lock().map(|s| s.clone()).unwrap_or_default();
    Ok(RunSummary {
        steps,
        outcome,
        state: describe(&report.state),
    })
}

fn describe_maze(state: &MazeState) -> String {
    format!("at {} facing {}", state.position, state.facing)
}

fn describe_artist(state: &ArtistState) -> String {
    format!(
        "at {} heading {} with {} segments drawn",
        state.position,
        state.heading,
        state.segments.len()
    )
}

fn describe_farm(state: &FarmState) -> String {
    format!(
        "at {} facing {}, {} collected, {} harvested",
        state.position, state.facing, state.collected, state.harvested
    )
}
