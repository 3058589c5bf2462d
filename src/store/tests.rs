// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::layout::{Direction, LayoutError};
use crate::model::fixtures::{lateral_tree, nid, root_with_child, two_level_tree};
use crate::model::{ChatMessage, NodeKind, RawGraph, RawNode, Role};

use super::{Action, StoreError, ViewStore};

fn store_with(graph: RawGraph) -> ViewStore {
    let mut store = ViewStore::default();
    store.set_graph(graph).expect("set graph");
    store
}

#[test]
fn set_graph_replaces_nodes_and_edges_and_returns_them() {
    let mut store = ViewStore::default();
    assert!(store.state().nodes().is_empty());

    let (nodes, edges) = store.set_graph(two_level_tree()).expect("set graph");
    assert_eq!(nodes.len(), 6);
    assert_eq!(edges.len(), 5);
    assert_eq!(store.state().nodes().len(), 6);
    assert_eq!(store.state().graph().len(), 6);
    assert_eq!(store.state().rev(), 1);

    store.set_graph(root_with_child()).expect("set graph");
    assert_eq!(store.state().nodes().len(), 2);
    assert_eq!(store.state().edges().len(), 1);
    assert_eq!(store.state().rev(), 2);
}

#[test]
fn rejected_graph_leaves_state_untouched() {
    let mut store = store_with(two_level_tree());
    store.set_selected_node(Some(nid("b"))).expect("select");
    let before = store.state().clone();

    let broken = RawGraph::from_nodes([
        RawNode::new(nid("r"), "root", NodeKind::Root).with_children([nid("missing")])
    ]);
    let err = store.set_graph(broken).unwrap_err();
    assert!(matches!(err, StoreError::Layout(LayoutError::DanglingReference { .. })));

    assert_eq!(store.state(), &before);
}

#[test]
fn selection_survives_only_when_node_still_exists() {
    let mut store = store_with(two_level_tree());
    store.set_selected_node(Some(nid("a"))).expect("select");

    store.set_graph(root_with_child()).expect("set graph");
    assert_eq!(store.state().selected_node_id().map(|id| id.as_str()), Some("a"));

    store.set_selected_node(Some(nid("r"))).expect("select");
    store.set_graph(two_level_tree()).expect("set graph");
    assert_eq!(store.state().selected_node().map(|node| node.name()), Some("r"));

    store.set_selected_node(Some(nid("b2"))).expect("select");
    store.set_graph(root_with_child()).expect("set graph");
    assert_eq!(store.state().selected_node_id(), None);
}

#[test]
fn selecting_an_unknown_node_is_rejected() {
    let mut store = store_with(root_with_child());
    let err = store.set_selected_node(Some(nid("zzz"))).unwrap_err();
    assert_eq!(err, StoreError::UnknownNode { node_id: nid("zzz") });
    assert_eq!(store.state().selected_node_id(), None);

    store.set_selected_node(Some(nid("a"))).expect("select");
    store.set_selected_node(None).expect("deselect");
    assert_eq!(store.state().selected_node_id(), None);
}

#[test]
fn direction_change_relays_out_from_the_stored_graph() {
    let mut store = store_with(lateral_tree());
    let top_bottom = store.state().nodes().to_vec();

    store.set_direction(Direction::LeftRight).expect("direction");
    assert_eq!(store.state().direction(), Direction::LeftRight);
    assert!(store.state().nodes().iter().all(|node| node.direction() == Direction::LeftRight));
    assert_ne!(store.state().nodes(), top_bottom.as_slice());

    store.set_direction(Direction::TopBottom).expect("direction");
    assert_eq!(store.state().nodes(), top_bottom.as_slice());
}

#[test]
fn direction_can_change_before_any_graph_arrives() {
    let mut store = ViewStore::default();
    store.set_direction(Direction::LeftRight).expect("direction");
    assert_eq!(store.state().direction(), Direction::LeftRight);
    assert_eq!(store.state().rev(), 1);

    store.set_graph(root_with_child()).expect("set graph");
    let child = store.state().node("a").expect("child");
    assert_eq!((child.x(), child.y()), (250.0, 0.0));
}

#[test]
fn revision_moves_only_on_effective_changes() {
    let mut store = ViewStore::default();

    store.set_global_loading(false);
    store.set_input("");
    store.clear_messages();
    assert_eq!(store.state().rev(), 0);

    store.set_global_loading(true);
    assert!(store.state().is_loading());
    store.set_global_loading(true);
    assert_eq!(store.state().rev(), 1);

    store.edit_input(|input| input.push('x'));
    store.edit_input(|_| {});
    assert_eq!(store.state().input(), "x");
    assert_eq!(store.state().rev(), 2);
}

#[test]
fn update_nodes_clears_selection_of_removed_nodes() {
    let mut store = store_with(two_level_tree());
    store.set_selected_node(Some(nid("b3"))).expect("select");

    store.update_nodes(|nodes| nodes.retain(|node| node.id().as_str() != "b3"));
    assert_eq!(store.state().nodes().len(), 5);
    assert_eq!(store.state().selected_node_id(), None);

    store.update_nodes(|nodes| {
        for node in nodes.iter_mut() {
            node.set_position(node.x() + 10.0, node.y());
        }
    });
    assert_eq!(store.state().node("r").map(|node| node.x()), Some(10.0));

    store.update_edges(|edges| edges.clear());
    assert!(store.state().edges().is_empty());
}

#[test]
fn dispatch_drives_every_mutator() {
    let mut store = ViewStore::default();

    store.dispatch(Action::SetGraph(root_with_child())).expect("graph");
    store.dispatch(Action::SetSelectedNode(Some(nid("a")))).expect("select");
    store.dispatch(Action::SetGlobalLoading(true)).expect("loading");
    store.dispatch(Action::AppendMessage(ChatMessage::user("hi"))).expect("append");
    store.dispatch(Action::AppendMessage(ChatMessage::assistant("hello"))).expect("append");
    store.dispatch(Action::SetInput("draft".to_owned())).expect("input");
    store.dispatch(Action::ToggleChat).expect("toggle");
    store.dispatch(Action::SetDirection(Direction::LeftRight)).expect("direction");
    store
        .dispatch(Action::UpdateNodes(Box::new(|nodes| nodes.truncate(1))))
        .expect("update nodes");
    store.dispatch(Action::UpdateEdges(Box::new(|edges| edges.clear()))).expect("update edges");

    let state = store.state();
    assert!(state.is_loading());
    assert!(!state.is_chat_open());
    assert_eq!(state.input(), "draft");
    assert_eq!(state.direction(), Direction::LeftRight);
    assert_eq!(state.nodes().len(), 1);
    assert!(state.edges().is_empty());
    assert_eq!(state.selected_node_id(), None);
    assert_eq!(
        state.messages().iter().map(ChatMessage::role).collect::<Vec<_>>(),
        vec![Role::User, Role::Assistant]
    );

    store.dispatch(Action::ClearMessages).expect("clear");
    assert!(store.state().messages().is_empty());

    let err = store.dispatch(Action::SetSelectedNode(Some(nid("nope")))).unwrap_err();
    assert!(matches!(err, StoreError::UnknownNode { .. }));
}
