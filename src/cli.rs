// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line interface.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::ClientConfig;
use crate::layout::{layout_tree, Direction, LayoutError};
use crate::model::RawGraph;
use crate::render::{render_tree, RenderError};

/// Thicket - chat with a research assistant while the research tree grows beside you
#[derive(Debug, Parser)]
#[command(name = "thicket", version, about, long_about = None)]
pub struct Cli {
    /// Run offline against a built-in demo tree
    #[arg(long)]
    pub demo: bool,

    /// Config file (default: $CONFIG_DIR/thicket/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the research-tree service
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Tree orientation: TB or LR
    #[arg(long, global = true, value_name = "TB|LR")]
    pub direction: Option<Direction>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lay out a graph file and print the rendered tree
    Layout {
        /// JSON graph: an object mapping node ids to nodes
        file: PathBuf,
        /// Print positioned nodes and edges as JSON instead
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Applies flag overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read graph file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse graph file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to encode layout")]
    Encode(#[source] serde_json::Error),
}

/// Runs `thicket layout`: the rendered tree, or the layout as pretty JSON.
pub fn layout_file(path: &Path, json: bool, config: &ClientConfig) -> Result<String, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let graph: RawGraph = serde_json::from_str(&contents)
        .map_err(|source| CliError::Parse { path: path.to_path_buf(), source })?;
    tracing::debug!(nodes = graph.len(), file = %path.display(), "graph loaded");

    let layout = layout_tree(&graph, config.direction, &config.layout)?;
    if json {
        return serde_json::to_string_pretty(&layout).map_err(CliError::Encode);
    }
    Ok(render_tree(layout.nodes(), layout.edges(), &config.render)?)
}
