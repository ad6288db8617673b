// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use loglens_cortex::CortexConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = CortexConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. LOGLENS_CONFIG_PATH: {}",
            std::env::var("LOGLENS_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./loglens-config.yaml");
        println!("  4. ~/.loglens/config.yaml");
        println!("  5. /etc/loglens/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Learning:".bold());
    let learning = &config.learning;
    println!("  Pattern threshold: {}", learning.pattern_threshold);
    println!("  Confidence threshold: {}", learning.confidence_threshold);
    println!(
        "  Decay: x{} after {} idle days",
        learning.decay_factor, learning.decay_after_days
    );
    println!("  Correlation window: {}", learning.correlation_window);
    println!("  Active window: {} days", learning.active_window_days);
    println!();

    println!("{}", "Persistence:".bold());
    let persistence = &config.persistence;
    println!("  State file: {}", persistence.state_path.display());
    println!("  Save timeout: {} ms", persistence.save_timeout_ms);
    println!("  Flush mode: {:?}", persistence.flush_mode);
    if persistence.flush_mode == loglens_cortex::FlushMode::Background {
        println!("  Flush interval: {} s", persistence.flush_interval_seconds);
    }
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config =
        CortexConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}
