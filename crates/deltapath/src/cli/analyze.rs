use anyhow::{Context, Result};
use clap::Args;
use deltapath::{
    analysis,
    config::Config,
    report::{self, OutputFormat},
};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// G-code program to analyze.
    pub input: PathBuf,

    /// Path to the configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format; overrides the configuration file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl AnalyzeArgs {
    pub fn run(&self) -> Result<()> {
        init_tracing(self.verbose);

        let config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.validate()?;

        tracing::info!("analyzing {}", self.input.display());
        let input = fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;

        let analysis = analysis::analyze(&input, &config.processor_config())?;
        let format = self.format.unwrap_or(config.report.format);
        let rendered = report::render(&analysis, format, config.report.max_signatures)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
