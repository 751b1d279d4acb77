//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Blockscript - compile and run block programs
#[derive(Parser, Debug)]
#[command(name = "blockscript")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a program and print its instructions as JSON
    Compile(CompileArgs),
    /// Run a program against a level of one of the reference games
    Run(RunArgs),
    /// List the built-in game presets
    Presets,
}

/// Where the program comes from and how to compile it.
#[derive(Args, Debug, Clone)]
pub struct ProgramArgs {
    /// Block workspace JSON file
    pub program: PathBuf,

    /// Game preset that maps block types to instructions
    #[arg(long, short, default_value = "maze")]
    pub game: String,

    /// Compiler configuration JSON, used instead of the preset's
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    #[command(flatten)]
    pub program: ProgramArgs,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub program: ProgramArgs,

    /// Level JSON file for the game
    #[arg(long, short)]
    pub level: PathBuf,

    /// Milliseconds each instruction takes to animate
    #[arg(long, default_value_t = 0)]
    pub step_ms: u64,

    /// Abort runs longer than this many instructions
    #[arg(long)]
    pub max_steps: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run() {
        let cli = Cli::try_parse_from([
            "blockscript",
            "run",
            "prog.json",
            "--game",
            "farm",
            "--level",
            "level.json",
            "--step-ms",
            "200",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.program.program, PathBuf::from("prog.json"));
                assert_eq!(args.program.game, "farm");
                assert_eq!(args.level, PathBuf::from("level.json"));
                assert_eq!(args.step_ms, 200);
                assert_eq!(args.max_steps, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn compile_defaults_to_maze() {
        let cli = Cli::try_parse_from(["blockscript", "compile", "prog.json"]).unwrap();
        match cli.command {
            Command::Compile(args) => {
                assert_eq!(args.program.game, "maze");
                assert!(args.program.config.is_none());
                assert!(!args.pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn run_needs_a_level() {
        assert!(Cli::try_parse_from(["blockscript", "run", "prog.json"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
