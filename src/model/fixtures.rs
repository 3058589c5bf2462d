// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::RawGraph;
use super::ids::NodeId;
use super::node::{NodeKind, RawNode};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn node(id: &str, kind: NodeKind) -> RawNode {
    RawNode::new(nid(id), id.to_owned(), kind)
}

/// `r -> a`: the smallest graph with an edge.
pub(crate) fn root_with_child() -> RawGraph {
    RawGraph::from_nodes([
        node("r", NodeKind::Root).with_children([nid("a")]),
        node("a", NodeKind::Text),
    ])
}

/// A root with two children where the second child has three children of its own.
pub(crate) fn two_level_tree() -> RawGraph {
    RawGraph::from_nodes([
        node("r", NodeKind::Root).with_children([nid("a"), nid("b")]),
        node("a", NodeKind::Question),
        node("b", NodeKind::Search).with_children([nid("b1"), nid("b2"), nid("b3")]),
        node("b1", NodeKind::Link),
        node("b2", NodeKind::File),
        node("b3", NodeKind::Image),
    ])
}

/// Root and a child that both carry siblings and spouses.
pub(crate) fn lateral_tree() -> RawGraph {
    RawGraph::from_nodes([
        node("r", NodeKind::Root)
            .with_children([nid("a"), nid("b")])
            .with_siblings([nid("rs")])
            .with_spouses([nid("rp")]),
        node("a", NodeKind::Text),
        node("b", NodeKind::Text)
            .with_children([nid("b1"), nid("b2")])
            .with_siblings([nid("bs")])
            .with_spouses([nid("bp")]),
        node("b1", NodeKind::Text),
        node("b2", NodeKind::Text),
        node("rs", NodeKind::Text),
        node("rp", NodeKind::Text),
        node("bs", NodeKind::Text),
        node("bp", NodeKind::Text),
    ])
}
