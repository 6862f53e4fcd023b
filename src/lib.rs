pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod report;
pub mod telemetry;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
