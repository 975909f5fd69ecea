mod app;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;


use anyhow::Result;
use clap::Parser;

use crate::app::{run, Cli};
use crate::platform::config::Config;
use crate::platform::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    run(cli, config).await
}
