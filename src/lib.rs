// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thicket - terminal chat client with an interactive research-tree view.
//!
//! The research service owns the graph; this crate lays it out as a family tree, renders it to
//! terminal cells and keeps the view state that the TUI draws from.

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod demo;
pub mod layout;
pub mod model;
pub mod render;
pub mod store;
pub mod tui;
