use anyhow::{Context, Result};
use clap::Parser;
use dorkcraft_core::{DorkConfig, GenerationController, Session};
use tracing::debug;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::logging::init_logging;
use crate::output::print_usage_instructions;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Defaults, then config file, then environment, then flags
    let config = DorkConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .merge(&args.config_overrides());

    init_logging(config.log_level());
    debug!(model = config.model(), "Configuration loaded");

    let controller = GenerationController::from_config(config);
    let mut session = Session::new();

    if !args.manual_fields().is_empty() {
        app::run_manual(&args, &controller, &mut session)?;
    } else if args.interactive {
        app::run_interactive(&controller, &mut session).await?;
    } else if let Some(objective) = args.objective.clone() {
        app::run_single_query(objective, &args, &controller, &mut session).await?;
    } else {
        print_usage_instructions();
    }

    Ok(())
}
