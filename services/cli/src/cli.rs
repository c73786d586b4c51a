use crate::demo::{run_demo, DemoArgs};
use crate::score::{run_score, ScoreArgs};
use clap::{Parser, Subcommand};
use safety_score::config::AppConfig;
use safety_score::error::AppError;
use safety_score::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Safety Score",
    about = "Score subject safety from recorded positions and risk zones",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one subject from position and zone fixtures
    Score(ScoreArgs),
    /// Replay canned scenarios through the ingestion pipeline (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Score(args) => run_score(args, config),
        Command::Demo(args) => run_demo(args, config),
    }
}
