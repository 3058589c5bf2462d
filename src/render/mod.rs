// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering of laid-out trees.
//!
//! Positioned nodes are mapped from layout units onto a character grid and drawn with Unicode
//! box-drawing characters. Renders are annotated with the cells each node covers so the UI can
//! highlight and scroll to nodes without re-deriving geometry.

use std::collections::BTreeMap;

use crate::model::NodeId;

mod canvas;
mod text;
pub mod tree;

pub use canvas::{Canvas, CanvasError};
pub use tree::{render_tree, render_tree_annotated, CellRect, RenderConfig, RenderError};

pub(crate) use text::{single_line, truncate_with_ellipsis};

/// A contiguous span of highlighted cells within a single rendered line.
///
/// Coordinates are `(y, x0, x1)` in character-cell indices, inclusive, relative to the returned
/// rendered text lines.
pub type LineSpan = (usize, usize, usize);

/// Mapping from node ids to the spans that should be highlighted for that node.
pub type HighlightIndex = BTreeMap<NodeId, Vec<LineSpan>>;

/// Render output plus the cell geometry of every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedRender {
    pub text: String,
    pub highlight_index: HighlightIndex,
    pub boxes: BTreeMap<NodeId, CellRect>,
}

impl AnnotatedRender {
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.split('\n').count()
        }
    }

    pub fn max_line_width(&self) -> usize {
        self.text.split('\n').map(text::text_len).max().unwrap_or(0)
    }
}
