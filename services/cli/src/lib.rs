mod cli;
mod demo;
mod infra;
mod score;

use safety_score::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
