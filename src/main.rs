use anyhow::{Context, Result};
use attendance::cli::Cli;
use attendance::session::Session;
use chrono::Local;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = attendance::load_default_settings(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("attendance={}", settings.log_level)))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let stdout = io::stdout().lock();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Session::new(settings, date, stdout).run(BufReader::new(file))
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            Session::new(settings, date, stdout)
                .with_prompt(interactive)
                .run(stdin.lock())
        }
    }
}
