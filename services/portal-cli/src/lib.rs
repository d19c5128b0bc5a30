mod cli;
mod demo;
mod infra;
mod resolve;

use enterprise_subsidy::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
