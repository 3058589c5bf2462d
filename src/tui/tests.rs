// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, style::Color, Terminal};
use rstest::rstest;

use super::{draw, styled_line, App, CenterTarget, HintMode, InputMode, SELECTION_BG};
use crate::api::fake::unavailable;
use crate::api::{ChatRequest, ChatResponse, GenerateRequest, HistoryEntry, CHAT_ENDPOINT};
use crate::chat::{Completion, Request, Response};
use crate::layout::Direction;
use crate::model::fixtures::{nid, root_with_child, two_level_tree};
use crate::model::{NodeId, RawGraph};
use crate::render::RenderConfig;
use crate::store::ViewStore;

fn app_with(graph: RawGraph) -> App {
    let mut store = ViewStore::default();
    store.set_graph(graph).expect("graph");
    App::new(store, RenderConfig::default())
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn selected(app: &App) -> Option<NodeId> {
    app.store().state().selected_node_id().cloned()
}

fn toast_text(app: &App) -> Option<&str> {
    app.toast.as_ref().map(|toast| toast.message.as_str())
}

fn text_to_string(text: &ratatui::text::Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn tab_cycles_selection_and_wraps() {
    let mut app = app_with(two_level_tree());
    let ids = app
        .store()
        .state()
        .nodes()
        .iter()
        .map(|node| node.id().clone())
        .collect::<Vec<_>>();

    press(&mut app, KeyCode::Tab);
    assert_eq!(selected(&app), Some(ids[0].clone()));
    press(&mut app, KeyCode::Tab);
    assert_eq!(selected(&app), Some(ids[1].clone()));
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(selected(&app), Some(ids[ids.len() - 1].clone()));

    press(&mut app, KeyCode::Esc);
    assert_eq!(selected(&app), None);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(selected(&app), Some(ids[ids.len() - 1].clone()));
}

#[test]
fn tab_on_empty_tree_selects_nothing() {
    let mut app = App::new(ViewStore::default(), RenderConfig::default());
    press(&mut app, KeyCode::Tab);
    assert_eq!(selected(&app), None);
}

#[test]
fn hint_jump_selects_labelled_node() {
    let mut app = app_with(two_level_tree());
    let third = app.store().state().nodes()[2].id().clone();

    press(&mut app, KeyCode::Char('f'));
    assert!(matches!(app.hint_mode, HintMode::AwaitingFirst { .. }));
    assert_eq!(app.hint_mode.targets().len(), 6);

    press(&mut app, KeyCode::Char('a'));
    assert!(matches!(app.hint_mode, HintMode::AwaitingSecond { first: 'A', .. }));
    press(&mut app, KeyCode::Char('d'));

    assert!(matches!(app.hint_mode, HintMode::Inactive));
    assert_eq!(selected(&app), Some(third));
    assert_eq!(app.pending_center, Some(CenterTarget::Selection));
}

#[test]
fn hint_mode_cancels_on_escape_or_unknown_letter() {
    let mut app = app_with(two_level_tree());

    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Esc);
    assert!(matches!(app.hint_mode, HintMode::Inactive));
    assert_eq!(selected(&app), None);

    press(&mut app, KeyCode::Char('f'));
    press(&mut app, KeyCode::Char('z'));
    assert!(matches!(app.hint_mode, HintMode::Inactive));
    assert_eq!(toast_text(&app), Some("No hint starting with 'Z'"));
}

#[test]
fn hint_labels_are_stamped_on_box_borders() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('f'));

    let text = text_to_string(&app.diagram_text());
    let lines = text.split('\n').collect::<Vec<_>>();
    assert!(lines[1].starts_with(" ┌AA"), "{}", lines[1]);
    assert!(lines[9].starts_with(" ┌AS"), "{}", lines[9]);
}

#[test]
fn enter_without_selection_only_warns() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Enter);

    assert!(app.take_requests().is_empty());
    assert_eq!(toast_text(&app), Some("Select a node to expand"));
    assert!(!app.store().state().is_loading());
}

#[test]
fn enter_with_selection_queues_generate() {
    let mut app = app_with(root_with_child());
    app.select(Some(nid("a")));
    press(&mut app, KeyCode::Enter);

    assert_eq!(
        app.take_requests(),
        vec![Request::Generate(GenerateRequest { active_node_uuid: nid("a") })]
    );
    assert!(app.store().state().is_loading());
    assert!(app.take_requests().is_empty());
}

#[test]
fn typed_message_is_queued_and_completion_applied() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('i'));
    assert!(app.store().state().is_chat_open());
    assert_eq!(app.input_mode, InputMode::Editing);

    type_text(&mut app, "hix");
    press(&mut app, KeyCode::Backspace);
    // Keys that are commands in normal mode go to the input while editing.
    assert_eq!(app.store().state().input(), "hi");
    assert!(!app.should_quit());

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    let requests = app.take_requests();
    assert_eq!(requests, vec![Request::Chat(ChatRequest::user("hi", None))]);
    assert!(app.store().state().is_loading());

    let response = ChatResponse {
        chat_history: vec![HistoryEntry {
            role: "assistant".to_owned(),
            message: "hello".to_owned(),
        }],
        graph: None,
    };
    let request = requests.into_iter().next().expect("request");
    app.apply_completion(Completion::new(request, Ok(Response::Chat(response))));

    let state = app.store().state();
    assert!(!state.is_loading());
    assert_eq!(state.messages().len(), 2);
    assert_eq!(state.messages()[1].content(), "hello");
    assert_eq!(state.input(), "");
}

#[test]
fn blank_message_stays_in_editing_mode() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Editing);
    assert!(app.take_requests().is_empty());
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn failed_completion_shows_error_and_keeps_input() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "hello");
    press(&mut app, KeyCode::Enter);
    let request = app.take_requests().into_iter().next().expect("request");

    app.apply_completion(Completion::new(request, Err(unavailable(CHAT_ENDPOINT))));

    let toast = app.toast.as_ref().expect("toast");
    assert!(toast.is_error);
    assert!(toast.message.starts_with("chat failed: "), "{}", toast.message);
    let state = app.store().state();
    assert!(state.messages().is_empty());
    assert_eq!(state.input(), "hello");
    assert!(!state.is_loading());
}

#[test]
fn direction_toggle_relayouts_and_recentres() {
    let mut app = app_with(root_with_child());
    app.pending_center = None;

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.store().state().direction(), Direction::LeftRight);
    assert_eq!(toast_text(&app), Some("Direction LR"));
    assert_eq!(app.pending_center, Some(CenterTarget::Diagram));

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.store().state().direction(), Direction::TopBottom);
}

#[test]
fn chat_toggle_and_clear() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('c'));
    assert!(app.store().state().is_chat_open());
    press(&mut app, KeyCode::Char('c'));
    assert!(!app.store().state().is_chat_open());

    app.store.append_message(crate::model::ChatMessage::user("one"));
    press(&mut app, KeyCode::Char('x'));
    assert!(app.store().state().messages().is_empty());
}

#[test]
fn reload_queues_start() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.take_requests(), vec![Request::Start]);
    assert!(app.store().state().is_loading());
}

#[rstest]
#[case::quit(KeyCode::Char('q'), KeyModifiers::NONE)]
#[case::ctrl_c(KeyCode::Char('c'), KeyModifiers::CONTROL)]
fn quit_keys(#[case] code: KeyCode, #[case] modifiers: KeyModifiers) {
    let mut app = app_with(root_with_child());
    app.handle_key(KeyEvent::new(code, modifiers));
    assert!(app.should_quit());
}

#[test]
fn help_overlay_swallows_keys() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('?'));
    assert!(app.show_help);

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.help_scroll, 1);
    assert_eq!(selected(&app), None);

    press(&mut app, KeyCode::Esc);
    assert!(!app.show_help);
}

#[test]
fn small_tree_is_centered_with_padding() {
    let mut app = app_with(root_with_child());
    assert_eq!(app.render.max_line_width(), 16);
    assert_eq!(app.render.line_count(), 13);

    app.center_if_needed(40, 20);
    assert_eq!((app.pan_x, app.pan_y), (-12, -3));
    assert_eq!(app.render_offsets(), (0, 0, 12, 3));
    assert_eq!(app.pending_center, None);
}

#[test]
fn selection_is_centered_in_viewport() {
    let mut app = app_with(root_with_child());
    app.select(Some(nid("a")));

    app.center_if_needed(10, 4);
    assert_eq!((app.pan_x, app.pan_y), (3, 8));
    assert_eq!(app.render_offsets(), (3, 8, 0, 0));
}

#[test]
fn panning_moves_the_camera() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Char('J'));
    assert_eq!((app.pan_x, app.pan_y), (1, 10));
    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::PageUp);
    assert_eq!((app.pan_x, app.pan_y), (0, 0));
}

#[test]
fn selected_box_is_highlighted() {
    let mut app = app_with(root_with_child());
    app.select(Some(nid("r")));

    let text = app.diagram_text();
    let top_border = &text.lines[1];
    let highlighted = top_border
        .spans
        .iter()
        .find(|span| span.content.contains('┌'))
        .expect("border span");
    assert_eq!(highlighted.style.bg, Some(SELECTION_BG));
    assert_eq!(highlighted.content.chars().count(), 15);

    let child_border = &text.lines[9];
    assert!(child_border.spans.iter().all(|span| span.style.bg.is_none()));
}

#[test]
fn styled_line_groups_equal_styles() {
    let plain = ratatui::style::Style::default();
    let red = plain.fg(Color::Red);
    let line = styled_line([('a', plain), ('b', plain), ('c', red), ('d', plain)].into_iter());
    let contents = line.spans.iter().map(|span| span.content.as_ref()).collect::<Vec<_>>();
    assert_eq!(contents, vec!["ab", "c", "d"]);
}

#[test]
fn draws_tree_chat_and_footer() {
    let mut app = app_with(root_with_child());
    press(&mut app, KeyCode::Char('c'));
    app.select(Some(nid("a")));

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|frame| draw(frame, &mut app)).expect("draw");

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let screen = buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    assert!(screen.contains("Research tree"), "{screen}");
    assert!(screen.contains("│ r "), "{screen}");
    assert!(screen.contains(" Chat "), "{screen}");
    assert!(screen.contains(" Node "), "{screen}");
    assert!(screen.contains("Nodes:2"), "{screen}");
}
