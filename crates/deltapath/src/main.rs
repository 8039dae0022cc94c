use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "deltapath", about = "Delta segmentation analysis for G-code")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare fixed-rate and adaptive segmentation over a G-code program.
    Analyze(cli::analyze::AnalyzeArgs),
}
