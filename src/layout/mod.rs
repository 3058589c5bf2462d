// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for research trees.
//!
//! Turns a raw graph snapshot plus a direction into positioned nodes and handle-annotated edges.
//! The layout is a pure function of its inputs and the fixed size/spacing configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{RawGraph, Relation};

pub mod tree;

pub use tree::{
    bounds_of, layout_tree, LayoutBounds, LayoutEdge, LayoutError, PositionedNode, TreeLayout,
    TreeLayoutEngine,
};

/// Orientation of the tree: generations advance downwards (`TB`) or rightwards (`LR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopBottom,
    #[serde(rename = "LR", alias = "lr")]
    LeftRight,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::TopBottom => Self::LeftRight,
            Self::LeftRight => Self::TopBottom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (expected TB or LR)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Self::TopBottom),
            "LR" => Ok(Self::LeftRight),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

/// The side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
}

/// Source and target handle sides for an edge of `relation` under `direction`.
///
/// Children use the forward sides, spouses the "after" sides and siblings the "before" sides.
pub fn handles_for(relation: Relation, direction: Direction) -> (Handle, Handle) {
    use Handle::{Bottom, Left, Right, Top};

    let horizontal = direction.is_horizontal();
    match relation {
        Relation::Child => {
            if horizontal {
                (Right, Left)
            } else {
                (Bottom, Top)
            }
        }
        Relation::Spouse => {
            if horizontal {
                (Bottom, Top)
            } else {
                (Right, Left)
            }
        }
        Relation::Sibling => {
            if horizontal {
                (Top, Bottom)
            } else {
                (Left, Right)
            }
        }
    }
}

/// Fixed node box size and spacing, in layout units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between leaf children of the same parent.
    pub sibling_spacing: f64,
    /// Gap between adjacent child subtrees when either has children of its own.
    pub subtree_spacing: f64,
    /// Gap between a node and its siblings/spouses on the same row.
    pub lateral_spacing: f64,
    /// Gap between consecutive generations.
    pub generation_spacing: f64,
    pub root_x: f64,
    pub root_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 100.0,
            sibling_spacing: 100.0,
            subtree_spacing: 100.0,
            lateral_spacing: 100.0,
            generation_spacing: 100.0,
            root_x: 0.0,
            root_y: 0.0,
        }
    }
}

impl LayoutConfig {
    /// Node extent along the axis generations advance on.
    pub fn depth_extent(&self, direction: Direction) -> f64 {
        if direction.is_horizontal() {
            self.node_width
        } else {
            self.node_height
        }
    }

    /// Node extent along the axis nodes of one generation are spread on.
    pub fn breadth_extent(&self, direction: Direction) -> f64 {
        if direction.is_horizontal() {
            self.node_height
        } else {
            self.node_width
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let sizes = [("node_width", self.node_width), ("node_height", self.node_height)];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be a positive number (got {value})"));
            }
        }

        let gaps = [
            ("sibling_spacing", self.sibling_spacing),
            ("subtree_spacing", self.subtree_spacing),
            ("lateral_spacing", self.lateral_spacing),
            ("generation_spacing", self.generation_spacing),
        ];
        for (name, value) in gaps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be a non-negative number (got {value})"));
            }
        }

        if !(self.root_x.is_finite() && self.root_y.is_finite()) {
            return Err("root origin must be finite".to_owned());
        }

        Ok(())
    }
}

/// The seam between the view store and whatever produces positions for a graph.
pub trait GraphLayout {
    fn layout(&self, graph: &RawGraph, direction: Direction) -> Result<TreeLayout, LayoutError>;
}
