use clap::Parser;

use blockscript_cli::args::{Cli, Command};
use blockscript_cli::{commands, init_logging, Result};

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compile(args) => println!("{}", commands::compile(&args)?),
        Command::Presets => println!("{}", commands::presets()),
        Command::Run(args) => {
            let summary = commands::run(&args, async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            })
            .await?;
            print!("{}", summary);
        }
    }
    Ok(())
}
