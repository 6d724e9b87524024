//! Tally CLI Application
//!
//! Command-line interface for the household ranked-choice decision engine.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use tally_core::{params::ListPlans, EngineBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let engine = EngineBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize engine")?;

    let cli = Cli::new(engine, TerminalRenderer::new(!no_color));

    info!("Tally started");

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Slot { command }) => cli.handle_slot_command(command).await,
        Some(Vote(args)) => cli.vote(args).await,
        Some(Finalize(args)) => cli.finalize(args).await,
        Some(Sweep(args)) => cli.sweep(args).await,
        None => cli.list_plans(&ListPlans::default()).await,
    }
}
