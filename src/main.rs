// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thicket CLI entrypoint.
//!
//! By default this runs the interactive TUI against the configured research service. Use `--demo`
//! to run offline, or `thicket layout <graph.json>` to print a laid-out tree.

use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use thicket::api::{ChatApi, HttpChatApi};
use thicket::chat::ChatController;
use thicket::cli::{layout_file, Cli, Commands};
use thicket::config::ClientConfig;
use thicket::demo::DemoApi;
use thicket::layout::TreeLayoutEngine;
use thicket::store::ViewStore;
use thicket::tui::{self, App};

const LOG_ENV: &str = "THICKET_LOG";
const DEMO_LATENCY: Duration = Duration::from_millis(300);

fn env_filter() -> Result<EnvFilter> {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_else(|_| "thicket=info".to_owned());
    EnvFilter::try_new(directives).context("invalid log filter")
}

/// Stderr logging, for commands that do not take over the terminal.
fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(env_filter()?).init();
    Ok(())
}

/// File logging for the TUI. Without a usable log location, logging stays off.
fn init_file_logging(config: &ClientConfig) -> Result<()> {
    let Some(path) = config.log_file_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter()?)
        .init();
    Ok(())
}

fn run_tui(cli: &Cli, config: ClientConfig) -> Result<()> {
    let api: Arc<dyn ChatApi> = if cli.demo {
        tracing::info!("running against the demo api");
        Arc::new(DemoApi::default().with_latency(DEMO_LATENCY))
    } else {
        tracing::info!(api_url = %config.api_url, "running against the research service");
        Arc::new(HttpChatApi::new(&config.api_url, config.request_timeout())?)
    };
    let controller = ChatController::new(api);

    let store = ViewStore::new(TreeLayoutEngine::new(config.layout), config.direction);
    let app = App::new(store, config.render);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let handle = runtime.handle().clone();
    runtime.block_on(async move {
        tokio::task::spawn_blocking(move || tui::run(app, controller, handle))
            .await
            .context("ui thread panicked")??;
        Ok::<(), anyhow::Error>(())
    })?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = ClientConfig::load(cli.config.as_deref())?;
    let mut config = loaded.config.clone();
    cli.apply_overrides(&mut config);

    match &cli.command {
        Some(Commands::Layout { file, json }) => {
            init_stderr_logging()?;
            loaded.report();
            config.validate()?;
            println!("{}", layout_file(file, *json, &config)?);
        }
        None => {
            config.validate()?;
            init_file_logging(&config)?;
            loaded.report();
            run_tui(&cli, config)?;
        }
    }

    Ok(())
}
