// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::text::{canvas_to_string_trimmed, single_line, truncate_with_ellipsis};
use super::{AnnotatedRender, Canvas, CanvasError, HighlightIndex};
use crate::layout::{bounds_of, Handle, LayoutBounds, LayoutEdge, PositionedNode};
use crate::model::{EdgeId, NodeId};

/// Blank cells kept around the drawing so arrowheads next to outer boxes stay on the canvas.
const MARGIN: usize = 1;
const MIN_BOX_WIDTH: usize = 5;
const MIN_BOX_HEIGHT: usize = 3;

/// Size of one terminal cell in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub cell_width_px: f64,
    pub cell_height_px: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { cell_width_px: 10.0, cell_height_px: 25.0 }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in
            [("cell_width_px", self.cell_width_px), ("cell_height_px", self.cell_height_px)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be a positive number (got {value})"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
    #[error("edge {edge_id} references node {node_id} that is not in the node set")]
    MissingNode { edge_id: EdgeId, node_id: NodeId },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Cell rectangle of a node box; both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl CellRect {
    pub fn center(&self) -> (usize, usize) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }

    /// The border cell an edge leaves from.
    fn border_point(&self, handle: Handle) -> (usize, usize) {
        let (cx, cy) = self.center();
        match handle {
            Handle::Top => (cx, self.y0),
            Handle::Bottom => (cx, self.y1),
            Handle::Left => (self.x0, cy),
            Handle::Right => (self.x1, cy),
        }
    }

    /// The cell just outside the border where an edge ends, with the arrowhead drawn there.
    fn approach_point(&self, handle: Handle) -> (usize, usize, char) {
        let (cx, cy) = self.center();
        match handle {
            Handle::Top => (cx, self.y0.saturating_sub(1), '▼'),
            Handle::Bottom => (cx, self.y1 + 1, '▲'),
            Handle::Left => (self.x0.saturating_sub(1), cy, '▶'),
            Handle::Right => (self.x1 + 1, cy, '◀'),
        }
    }
}

fn to_cells(length: f64, cell: f64) -> usize {
    (length / cell).round().max(0.0) as usize
}

fn cell_rect(node: &PositionedNode, bounds: &LayoutBounds, config: &RenderConfig) -> CellRect {
    let x0 = to_cells(node.x() - bounds.min_x, config.cell_width_px) + MARGIN;
    let y0 = to_cells(node.y() - bounds.min_y, config.cell_height_px) + MARGIN;
    let width = to_cells(node.width(), config.cell_width_px).max(MIN_BOX_WIDTH);
    let height = to_cells(node.height(), config.cell_height_px).max(MIN_BOX_HEIGHT);
    CellRect { x0, y0, x1: x0 + width - 1, y1: y0 + height - 1 }
}

pub fn render_tree(
    nodes: &[PositionedNode],
    edges: &[LayoutEdge],
    config: &RenderConfig,
) -> Result<String, RenderError> {
    render_tree_annotated(nodes, edges, config).map(|render| render.text)
}

/// Draws `nodes` as labelled boxes and `edges` as orthogonal connectors.
///
/// Every edge runs from the midpoint of its source handle side to the cell in front of its target
/// handle side, with one bend pair halfway between. Connectors sharing cells merge into junctions.
pub fn render_tree_annotated(
    nodes: &[PositionedNode],
    edges: &[LayoutEdge],
    config: &RenderConfig,
) -> Result<AnnotatedRender, RenderError> {
    config.validate().map_err(RenderError::InvalidConfig)?;
    let Some(bounds) = bounds_of(nodes) else {
        return Ok(AnnotatedRender::default());
    };

    let boxes = nodes
        .iter()
        .map(|node| (node.id().clone(), cell_rect(node, &bounds, config)))
        .collect::<BTreeMap<_, _>>();
    let width = boxes.values().map(|rect| rect.x1).max().unwrap_or(0) + 1 + MARGIN;
    let height = boxes.values().map(|rect| rect.y1).max().unwrap_or(0) + 1 + MARGIN;
    let mut canvas = Canvas::new(width, height)?;

    let mut arrows = Vec::with_capacity(edges.len());
    for edge in edges {
        arrows.push(draw_connector(&mut canvas, &boxes, edge)?);
    }

    for node in nodes {
        if let Some(rect) = boxes.get(node.id()) {
            draw_node(&mut canvas, node, rect)?;
        }
    }

    for (x, y, arrow) in arrows {
        canvas.set(x, y, arrow)?;
    }

    let highlight_index = boxes
        .iter()
        .map(|(node_id, rect)| {
            let spans = (rect.y0..=rect.y1).map(|y| (y, rect.x0, rect.x1)).collect();
            (node_id.clone(), spans)
        })
        .collect::<HighlightIndex>();

    Ok(AnnotatedRender { text: canvas_to_string_trimmed(&canvas), highlight_index, boxes })
}

fn rect_for<'a>(
    boxes: &'a BTreeMap<NodeId, CellRect>,
    edge: &LayoutEdge,
    node_id: &NodeId,
) -> Result<&'a CellRect, RenderError> {
    boxes.get(node_id).ok_or_else(|| RenderError::MissingNode {
        edge_id: edge.id().clone(),
        node_id: node_id.clone(),
    })
}

fn draw_connector(
    canvas: &mut Canvas,
    boxes: &BTreeMap<NodeId, CellRect>,
    edge: &LayoutEdge,
) -> Result<(usize, usize, char), RenderError> {
    let source = rect_for(boxes, edge, edge.source())?;
    let target = rect_for(boxes, edge, edge.target())?;
    let (sx, sy) = source.border_point(edge.source_handle());
    let (tx, ty, arrow) = target.approach_point(edge.target_handle());

    match edge.source_handle() {
        Handle::Top | Handle::Bottom => {
            let mid = (sy + ty) / 2;
            canvas.draw_vline(sx, sy, mid)?;
            canvas.draw_hline(sx, tx, mid)?;
            canvas.draw_vline(tx, mid, ty)?;
        }
        Handle::Left | Handle::Right => {
            let mid = (sx + tx) / 2;
            canvas.draw_hline(sx, mid, sy)?;
            canvas.draw_vline(mid, sy, ty)?;
            canvas.draw_hline(mid, tx, ty)?;
        }
    }

    Ok((tx, ty, arrow))
}

fn draw_node(
    canvas: &mut Canvas,
    node: &PositionedNode,
    rect: &CellRect,
) -> Result<(), CanvasError> {
    canvas.draw_box(rect.x0, rect.y0, rect.x1, rect.y1)?;

    let text_width = rect.width().saturating_sub(4);
    let name = truncate_with_ellipsis(&single_line(node.name()), text_width);
    canvas.write_str(rect.x0 + 2, rect.y0 + 1, &name)?;

    if rect.height() >= 4 {
        let kind = node.kind();
        let badge = truncate_with_ellipsis(&format!("{} {}", kind.badge(), kind), text_width);
        canvas.write_str(rect.x0 + 2, rect.y0 + 2, &badge)?;
    }
    Ok(())
}
