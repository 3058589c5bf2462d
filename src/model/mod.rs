// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A graph snapshot maps node ids to raw node records; the chat log is a list of role-tagged
//! messages.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod graph;
pub mod ids;
pub mod message;
pub mod node;

pub use graph::RawGraph;
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use message::{ChatMessage, Role};
pub use node::{NodeKind, RawNode, Relation};
