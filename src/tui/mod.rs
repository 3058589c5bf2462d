// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The app owns the view store and runs on a blocking thread. API calls run as tokio tasks and
//! report back over a channel; completions are applied on the UI thread in arrival order.

use std::{
    collections::BTreeMap,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::{runtime::Handle, sync::mpsc};

use crate::chat::{self, ChatController, Completion, Request};
use crate::layout::{GraphLayout, TreeLayoutEngine};
use crate::model::{NodeId, Role};
use crate::render::{self, AnnotatedRender, RenderConfig};
use crate::store::ViewStore;

mod hints;

use hints::HintTarget;

const SELECTION_FG: Color = Color::Black;
const SELECTION_BG: Color = Color::Yellow;
const HINT_FG: Color = Color::Black;
const HINT_BG: Color = Color::LightMagenta;
const ARROW_COLOR: Color = Color::Cyan;
const DETAIL_COLOR: Color = Color::Gray;
const USER_COLOR: Color = Color::LightGreen;
const ASSISTANT_COLOR: Color = Color::LightBlue;
const ERROR_COLOR: Color = Color::LightRed;
const EDITING_COLOR: Color = Color::LightGreen;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const NODE_HINT_CHARS: &str = "ASDFJKLEWCMPGH";
const PAN_STEP: i32 = 1;
const PAN_PAGE: i32 = 10;
const TOAST_TTL: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const SIDEBAR_PERCENT: u16 = 38;
const DETAIL_HEIGHT: u16 = 9;
const INPUT_HEIGHT: u16 = 3;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("terminal error")]
    Terminal(#[from] io::Error),
}

/// Runs the interactive terminal UI until the user quits.
///
/// Blocks the calling thread; requests are spawned onto `runtime`. The initial graph is fetched
/// from the API on launch.
pub fn run<L: GraphLayout>(
    mut app: App<L>,
    controller: ChatController,
    runtime: Handle,
) -> Result<(), TuiError> {
    let mut terminal = TerminalSession::new()?;
    let (completions_tx, mut completions_rx) = mpsc::unbounded_channel::<Completion>();
    app.request_start();

    while !app.should_quit() {
        while let Ok(completion) = completions_rx.try_recv() {
            app.apply_completion(completion);
        }
        for request in app.take_requests() {
            spawn_request(&runtime, &controller, &completions_tx, request);
        }

        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    tracing::info!("ui closed");
    Ok(())
}

fn spawn_request(
    runtime: &Handle,
    controller: &ChatController,
    completions: &mpsc::UnboundedSender<Completion>,
    request: Request,
) {
    let controller = controller.clone();
    let completions = completions.clone();
    runtime.spawn(async move {
        let completion = controller.execute(request).await;
        if completions.send(completion).is_err() {
            tracing::debug!("ui closed before the request completed");
        }
    });
}

fn draw<L: GraphLayout>(frame: &mut Frame<'_>, app: &mut App<L>) {
    app.refresh_render();
    let area = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = rows[0];
    let status_area = rows[1];

    let state = app.store.state();
    let sidebar_visible = state.is_chat_open() || state.selected_node().is_some();
    let (diagram_area, sidebar_area) = if sidebar_visible {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - SIDEBAR_PERCENT),
                Constraint::Percentage(SIDEBAR_PERCENT),
            ])
            .split(main_area);
        (panes[0], Some(panes[1]))
    } else {
        (main_area, None)
    };

    render_diagram(frame, app, diagram_area);
    if let Some(sidebar_area) = sidebar_area {
        render_sidebar(frame, app, sidebar_area);
    }
    render_footer(frame, app, status_area);

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

// Panel, footer and help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    is_error: bool,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Default)]
enum HintMode {
    #[default]
    Inactive,
    AwaitingFirst {
        targets: Vec<HintTarget>,
    },
    AwaitingSecond {
        first: char,
        targets: Vec<HintTarget>,
    },
}

impl HintMode {
    fn targets(&self) -> &[HintTarget] {
        match self {
            Self::Inactive => &[],
            Self::AwaitingFirst { targets } | Self::AwaitingSecond { targets, .. } => targets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CenterTarget {
    Diagram,
    Selection,
}

/// UI state layered over the view store: camera, modes, toast and the queue of requests waiting
/// to be spawned.
pub struct App<L: GraphLayout = TreeLayoutEngine> {
    store: ViewStore<L>,
    render_config: RenderConfig,
    render: AnnotatedRender,
    rendered_rev: Option<u64>,
    pan_x: i32,
    pan_y: i32,
    pending_center: Option<CenterTarget>,
    input_mode: InputMode,
    hint_mode: HintMode,
    show_help: bool,
    help_scroll: u16,
    toast: Option<Toast>,
    outbox: Vec<Request>,
    should_quit: bool,
}

impl<L: GraphLayout> App<L> {
    pub fn new(store: ViewStore<L>, render_config: RenderConfig) -> Self {
        let mut app = Self {
            store,
            render_config,
            render: AnnotatedRender::default(),
            rendered_rev: None,
            pan_x: 0,
            pan_y: 0,
            pending_center: Some(CenterTarget::Diagram),
            input_mode: InputMode::Normal,
            hint_mode: HintMode::Inactive,
            show_help: false,
            help_scroll: 0,
            toast: None,
            outbox: Vec::new(),
            should_quit: false,
        };
        app.refresh_render();
        app
    }

    pub fn store(&self) -> &ViewStore<L> {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests raised since the last call, in the order they were raised.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub fn request_start(&mut self) {
        let request = chat::begin_start(&mut self.store);
        self.outbox.push(request);
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        let label = completion.request().label();
        if let Err(err) = chat::finish(&mut self.store, completion) {
            self.set_error_toast(format!("{label} failed: {err}"));
        }
        self.refresh_render();
    }

    fn refresh_render(&mut self) {
        let rev = self.store.state().rev();
        if self.rendered_rev == Some(rev) {
            return;
        }
        self.rendered_rev = Some(rev);

        let was_empty = self.render.boxes.is_empty();
        let state = self.store.state();
        match render::render_tree_annotated(state.nodes(), state.edges(), &self.render_config) {
            Ok(render) => self.render = render,
            Err(err) => {
                tracing::warn!(error = %err, "render failed");
                self.render = AnnotatedRender::default();
                self.set_error_toast(format!("render failed: {err}"));
            }
        }

        if was_empty && !self.render.boxes.is_empty() && self.pending_center.is_none() {
            self.pending_center = Some(CenterTarget::Diagram);
        }
        self.hint_mode = HintMode::Inactive;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.handle_key_code(key.code);
    }

    fn handle_key_code(&mut self, code: KeyCode) {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                _ => {}
            }
            return;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_input_key(code);
            return;
        }

        if self.handle_hint_key(code) {
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => self.pan(0, -PAN_STEP),
            KeyCode::Down | KeyCode::Char('j') => self.pan(0, PAN_STEP),
            KeyCode::Left | KeyCode::Char('h') => self.pan(-PAN_STEP, 0),
            KeyCode::Right | KeyCode::Char('l') => self.pan(PAN_STEP, 0),
            KeyCode::PageUp | KeyCode::Char('K') => self.pan(0, -PAN_PAGE),
            KeyCode::PageDown | KeyCode::Char('J') => self.pan(0, PAN_PAGE),
            KeyCode::Char('H') => self.pan(-PAN_PAGE, 0),
            KeyCode::Char('L') => self.pan(PAN_PAGE, 0),
            KeyCode::Home => self.pending_center = Some(CenterTarget::Diagram),
            KeyCode::Tab => self.cycle_selection(true),
            KeyCode::BackTab => self.cycle_selection(false),
            KeyCode::Esc => self.select(None),
            KeyCode::Char('f') => self.enter_hint_mode(),
            KeyCode::Enter => self.expand_selected(),
            KeyCode::Char('d') => self.toggle_direction(),
            KeyCode::Char('c') => self.store.toggle_chat(),
            KeyCode::Char('i') => self.start_editing(),
            KeyCode::Char('x') => self.store.clear_messages(),
            KeyCode::Char('.') => self.recentre(),
            KeyCode::Char('r') => self.request_start(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                let input = self.store.state().input().to_owned();
                if let Some(request) = chat::begin_send(&mut self.store, &input) {
                    self.outbox.push(request);
                    self.input_mode = InputMode::Normal;
                }
            }
            KeyCode::Backspace => self.store.edit_input(|input| {
                input.pop();
            }),
            KeyCode::Char(ch) => self.store.edit_input(|input| input.push(ch)),
            _ => {}
        }
    }

    fn start_editing(&mut self) {
        if !self.store.state().is_chat_open() {
            self.store.toggle_chat();
        }
        self.input_mode = InputMode::Editing;
    }

    fn pan(&mut self, dx: i32, dy: i32) {
        self.pan_x = self.pan_x.saturating_add(dx);
        self.pan_y = self.pan_y.saturating_add(dy);
    }

    fn select(&mut self, node_id: Option<NodeId>) {
        let recentre = node_id.is_some();
        match self.store.set_selected_node(node_id) {
            Ok(()) if recentre => self.pending_center = Some(CenterTarget::Selection),
            Ok(()) => {}
            Err(err) => self.set_error_toast(err.to_string()),
        }
    }

    fn cycle_selection(&mut self, forward: bool) {
        let state = self.store.state();
        let nodes = state.nodes();
        if nodes.is_empty() {
            return;
        }

        let current = state
            .selected_node_id()
            .and_then(|selected| nodes.iter().position(|node| node.id() == selected));
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % nodes.len(),
            (Some(idx), false) => (idx + nodes.len() - 1) % nodes.len(),
            (None, true) => 0,
            (None, false) => nodes.len() - 1,
        };
        let node_id = nodes[next].id().clone();
        self.select(Some(node_id));
    }

    fn recentre(&mut self) {
        let target = if self.store.state().selected_node_id().is_some() {
            CenterTarget::Selection
        } else {
            CenterTarget::Diagram
        };
        self.pending_center = Some(target);
    }

    fn expand_selected(&mut self) {
        let Some(node_id) = self.store.state().selected_node_id().cloned() else {
            self.set_toast("Select a node to expand");
            return;
        };
        match chat::begin_expand(&mut self.store, &node_id) {
            Ok(request) => self.outbox.push(request),
            Err(err) => self.set_error_toast(err.to_string()),
        }
    }

    fn toggle_direction(&mut self) {
        let direction = self.store.state().direction().toggled();
        match self.store.set_direction(direction) {
            Ok(()) => {
                self.recentre();
                self.set_toast(format!("Direction {direction}"));
            }
            Err(err) => self.set_error_toast(format!("relayout failed: {err}")),
        }
    }

    fn enter_hint_mode(&mut self) {
        self.refresh_render();
        let node_ids =
            self.store.state().nodes().iter().map(|node| node.id().clone()).collect::<Vec<_>>();
        if node_ids.is_empty() {
            self.set_toast("No nodes to jump to");
            return;
        }
        match hints::two_letter_targets(&node_ids, NODE_HINT_CHARS) {
            Some(targets) => self.hint_mode = HintMode::AwaitingFirst { targets },
            None => self.set_toast(format!("Too many nodes for jump hints ({})", node_ids.len())),
        }
    }

    /// Consumes `code` when a hint prompt is open.
    fn handle_hint_key(&mut self, code: KeyCode) -> bool {
        match std::mem::take(&mut self.hint_mode) {
            HintMode::Inactive => false,
            HintMode::AwaitingFirst { targets } => {
                match code {
                    KeyCode::Esc => {}
                    KeyCode::Char(ch) => {
                        let first = ch.to_ascii_uppercase();
                        let targets = targets
                            .into_iter()
                            .filter(|target| target.label[0] == first)
                            .collect::<Vec<_>>();
                        if targets.is_empty() {
                            self.set_toast(format!("No hint starting with '{first}'"));
                        } else {
                            self.hint_mode = HintMode::AwaitingSecond { first, targets };
                        }
                    }
                    _ => self.hint_mode = HintMode::AwaitingFirst { targets },
                }
                true
            }
            HintMode::AwaitingSecond { first, targets } => {
                match code {
                    KeyCode::Esc => {}
                    KeyCode::Char(ch) => {
                        let second = ch.to_ascii_uppercase();
                        let selected = targets
                            .iter()
                            .find(|target| target.label[1] == second)
                            .map(|target| target.node_id.clone());
                        match selected {
                            Some(node_id) => self.select(Some(node_id)),
                            None => {
                                self.hint_mode = HintMode::AwaitingSecond { first, targets };
                                self.set_toast("No matching hint");
                            }
                        }
                    }
                    _ => self.hint_mode = HintMode::AwaitingSecond { first, targets },
                }
                true
            }
        }
    }

    fn center_if_needed(&mut self, viewport_width: usize, viewport_height: usize) {
        let Some(target) = self.pending_center else {
            return;
        };
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }

        let viewport_width = viewport_width as i32;
        let viewport_height = viewport_height as i32;
        let selected_rect = self
            .store
            .state()
            .selected_node_id()
            .and_then(|node_id| self.render.boxes.get(node_id))
            .copied();

        match (target, selected_rect) {
            (CenterTarget::Selection, Some(rect)) => {
                let (cx, cy) = rect.center();
                self.pan_x = cx as i32 - viewport_width / 2;
                self.pan_y = cy as i32 - viewport_height / 2;
            }
            _ => {
                // Oversized trees start at their top-left corner instead of mid-canvas.
                let width = self.render.max_line_width() as i32;
                let height = self.render.line_count() as i32;
                self.pan_x = ((width - viewport_width) / 2).min(0);
                self.pan_y = ((height - viewport_height) / 2).min(0);
            }
        }
        self.pending_center = None;
    }

    fn render_offsets(&self) -> (u16, u16, usize, usize) {
        let scroll_x = clamp_positive_i32_to_u16(self.pan_x);
        let scroll_y = clamp_positive_i32_to_u16(self.pan_y);
        let left_pad = self.pan_x.saturating_neg().max(0) as usize;
        let top_pad = self.pan_y.saturating_neg().max(0) as usize;
        (scroll_x, scroll_y, left_pad, top_pad)
    }

    /// The rendered tree with the selection highlighted and hint labels stamped onto box borders.
    fn diagram_text(&self) -> Text<'static> {
        let lines = self.render.text.split('\n').collect::<Vec<_>>();
        let mut selected =
            lines.iter().map(|line| vec![false; line.chars().count()]).collect::<Vec<_>>();
        if let Some(spans) = self
            .store
            .state()
            .selected_node_id()
            .and_then(|node_id| self.render.highlight_index.get(node_id))
        {
            for &(y, x0, x1) in spans {
                if let Some(row) = selected.get_mut(y) {
                    for cell in row.iter_mut().take(x1 + 1).skip(x0) {
                        *cell = true;
                    }
                }
            }
        }

        let mut hint_cells = BTreeMap::<(usize, usize), char>::new();
        for target in self.hint_mode.targets() {
            if let Some(rect) = self.render.boxes.get(&target.node_id) {
                hint_cells.insert((rect.y0, rect.x0 + 1), target.label[0]);
                hint_cells.insert((rect.y0, rect.x0 + 2), target.label[1]);
            }
        }

        let text_lines = lines
            .iter()
            .enumerate()
            .map(|(y, line)| {
                let cells = line.chars().enumerate().map(|(x, ch)| {
                    if let Some(&label) = hint_cells.get(&(y, x)) {
                        let style = Style::default()
                            .fg(HINT_FG)
                            .bg(HINT_BG)
                            .add_modifier(Modifier::BOLD);
                        return (label, style);
                    }
                    let is_selected = selected.get(y).and_then(|row| row.get(x)).copied();
                    let style = if is_selected == Some(true) {
                        Style::default()
                            .fg(SELECTION_FG)
                            .bg(SELECTION_BG)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        style_for_diagram_char(Style::default(), ch)
                    };
                    (ch, style)
                });
                styled_line(cells)
            })
            .collect::<Vec<_>>();
        Text::from(text_lines)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: false,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn set_error_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: true,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

/// Groups consecutive cells of equal style into spans.
fn styled_line(cells: impl Iterator<Item = (char, Style)>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let mut run = String::new();
    let mut run_style = None::<Style>;
    for (ch, style) in cells {
        if run_style.is_some_and(|current| current != style) {
            spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
        }
        run_style = Some(style);
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style.unwrap_or_default()));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).inspect_err(|_| teardown_terminal())?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).inspect_err(|_| teardown_terminal())?;
        terminal.clear().inspect_err(|_| teardown_terminal())?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
