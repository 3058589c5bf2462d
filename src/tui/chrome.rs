// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Panel, footer, help, and style helpers used by TUI rendering.
fn clamp_positive_i32_to_u16(value: i32) -> u16 {
    value.max(0).min(u16::MAX as i32) as u16
}

fn pad_text(mut text: Text<'static>, left_pad: usize, top_pad: usize) -> Text<'static> {
    if left_pad == 0 && top_pad == 0 {
        return text;
    }

    if left_pad > 0 {
        let pad = " ".repeat(left_pad);
        for line in &mut text.lines {
            line.spans.insert(0, Span::raw(pad.clone()));
        }
    }

    if top_pad > 0 {
        let mut lines = vec![Line::from(String::new()); top_pad];
        lines.extend(text.lines);
        text.lines = lines;
    }

    text
}

fn style_for_diagram_char(mut style: Style, ch: char) -> Style {
    if is_arrowhead(ch) {
        style.fg = Some(ARROW_COLOR);
    }
    style
}

fn is_arrowhead(ch: char) -> bool {
    matches!(ch, '▼' | '▲' | '▶' | '◀')
}

fn panel_title(label: &str, tail: Option<&str>) -> String {
    match tail.map(str::trim).filter(|tail| !tail.is_empty()) {
        Some(tail) => format!(" {label} {tail} "),
        None => format!(" {label} "),
    }
}

fn render_diagram<L: GraphLayout>(frame: &mut Frame<'_>, app: &mut App<L>, area: Rect) {
    let hint_tail = match &app.hint_mode {
        HintMode::Inactive => None,
        HintMode::AwaitingFirst { .. } => Some("[jump: _ _]".to_owned()),
        HintMode::AwaitingSecond { first, .. } => Some(format!("[jump: {first} _]")),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Research tree", hint_tail.as_deref()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.render.boxes.is_empty() {
        let message = if app.store.state().is_loading() {
            "Loading research tree…"
        } else {
            "No research tree yet. Press r to fetch it."
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(DETAIL_COLOR))
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    }

    app.center_if_needed(inner.width as usize, inner.height as usize);
    let (scroll_x, scroll_y, left_pad, top_pad) = app.render_offsets();
    let text = pad_text(app.diagram_text(), left_pad, top_pad);
    frame.render_widget(Paragraph::new(text).scroll((scroll_y, scroll_x)), inner);
}

fn render_sidebar<L: GraphLayout>(frame: &mut Frame<'_>, app: &App<L>, area: Rect) {
    let state = app.store.state();
    let has_detail = state.selected_node().is_some();
    let chat_open = state.is_chat_open();

    match (has_detail, chat_open) {
        (true, true) => {
            let panes = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(DETAIL_HEIGHT), Constraint::Min(0)])
                .split(area);
            render_detail(frame, app, panes[0]);
            render_chat(frame, app, panes[1]);
        }
        (true, false) => render_detail(frame, app, area),
        (false, true) => render_chat(frame, app, area),
        (false, false) => {}
    }
}

fn detail_lines(node: &crate::layout::PositionedNode) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(FOOTER_LABEL_COLOR);
    let row = |label: &str, value: String| {
        Line::from(vec![Span::styled(format!("{label:<9}"), label_style), Span::raw(value)])
    };

    let mut lines = vec![
        row("Name", render::single_line(node.name())),
        row("Kind", format!("{} {}", node.kind().badge(), node.kind().as_str())),
        row("Id", node.id().to_string()),
        row("Depth", node.depth().to_string()),
        row(
            "Relation",
            node.relation().map_or_else(|| "root".to_owned(), |relation| relation.to_string()),
        ),
    ];
    if let Some(content) = node.content().filter(|content| !content.trim().is_empty()) {
        lines.push(Line::from(String::new()));
        lines.push(Line::from(Span::styled(
            content.to_owned(),
            Style::default().fg(DETAIL_COLOR),
        )));
    }
    lines
}

fn render_detail<L: GraphLayout>(frame: &mut Frame<'_>, app: &App<L>, area: Rect) {
    let Some(node) = app.store.state().selected_node() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SELECTION_BG))
        .title(panel_title("Node", None));
    let paragraph = Paragraph::new(detail_lines(node))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Rows `text` needs when wrapped at `width` columns.
fn wrapped_height(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum()
}

fn render_chat<L: GraphLayout>(frame: &mut Frame<'_>, app: &App<L>, area: Rect) {
    let state = app.store.state();
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
        .split(area);

    let loading = state.is_loading().then_some("(waiting…)");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Chat", loading));
    let inner = block.inner(panes[0]);

    let mut lines = Vec::<Line<'static>>::new();
    let mut rows = 0usize;
    for message in state.messages() {
        let (prefix, color) = match message.role() {
            Role::User => ("you", USER_COLOR),
            Role::Assistant => ("ai", ASSISTANT_COLOR),
        };
        let prefix = format!("{prefix}: ");
        rows += wrapped_height(&format!("{prefix}{}", message.content()), inner.width as usize);
        let mut content_lines = message.content().split('\n');
        let first = content_lines.next().unwrap_or_default().to_owned();
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(first),
        ]));
        lines.extend(content_lines.map(|line| Line::from(line.to_owned())));
    }
    let scroll = rows.saturating_sub(inner.height as usize);
    let history = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((clamp_positive_i32_to_u16(scroll as i32), 0));
    frame.render_widget(history, panes[0]);

    let editing = app.input_mode == InputMode::Editing;
    let input_style = if editing {
        Style::default().fg(EDITING_COLOR)
    } else {
        Style::default()
    };
    let input_title = if editing { "Message (Enter send, Esc stop)" } else { "Message (i)" };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(input_style)
        .title(panel_title(input_title, None));
    let input_inner = input_block.inner(panes[1]);

    // Keep the tail of long input visible.
    let input = state.input();
    let visible_width = (input_inner.width as usize).saturating_sub(1);
    let input_len = input.chars().count();
    let skip = input_len.saturating_sub(visible_width);
    let visible = input.chars().skip(skip).collect::<String>();
    frame.render_widget(Paragraph::new(visible).block(input_block), panes[1]);

    if editing && input_inner.width > 0 && input_inner.height > 0 {
        let offset = (input_len - skip).min(input_inner.width as usize - 1) as u16;
        frame.set_cursor(input_inner.x + offset, input_inner.y);
    }
}

fn render_footer<L: GraphLayout>(frame: &mut Frame<'_>, app: &mut App<L>, area: Rect) {
    if app.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
        app.toast = None;
    }

    let state = app.store.state();
    let mut spans = Vec::<Span<'static>>::new();
    if app.input_mode == InputMode::Editing {
        push_footer_entry(&mut spans, "send", "Enter");
        push_footer_entry(&mut spans, "stop", "Esc");
    } else {
        push_footer_entry(&mut spans, "help", "?");
        push_footer_entry(&mut spans, "select", "Tab");
        push_footer_entry(&mut spans, "jump", "f");
        push_footer_entry(&mut spans, "expand", "Enter");
        push_footer_entry(&mut spans, "chat", "c/i");
        push_footer_entry(&mut spans, "dir", state.direction().as_str());
    }
    push_footer_entry(&mut spans, "nodes", &state.nodes().len().to_string());
    if state.is_loading() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "Loading…".to_owned(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(toast) = &app.toast {
        let color = if toast.is_error { ERROR_COLOR } else { FOOTER_KEY_COLOR };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(toast.message.clone(), Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn help_key_style() -> Style {
    Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    ("Global", &[("?", "Help (toggle)"), ("q, Ctrl-C", "Quit"), ("r", "Reload tree from server")]),
    (
        "Tree",
        &[
            ("←↓↑→, hjkl", "Pan"),
            ("HJKL, PgUp/PgDn", "Pan by a page"),
            ("Home", "Center the whole tree"),
            (".", "Center the selection"),
            ("Tab/Shift-Tab", "Select next/previous node"),
            ("f", "Jump to a node by its label"),
            ("Esc", "Clear selection"),
            ("Enter", "Expand the selected node"),
            ("d", "Toggle direction (TB/LR)"),
        ],
    ),
    (
        "Chat",
        &[
            ("c", "Show/hide chat"),
            ("i", "Write a message"),
            ("Enter", "Send (while writing)"),
            ("Esc", "Stop writing"),
            ("x", "Clear chat history"),
        ],
    ),
];

fn render_help<L: GraphLayout>(frame: &mut Frame<'_>, app: &App<L>, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let key_col_width = HELP_SECTIONS
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (idx, (title, entries)) in HELP_SECTIONS.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(String::new()));
        }
        lines.push(Line::from(Span::styled(format!("--- {title} ---"), help_header_style())));
        lines.extend(
            entries.iter().map(|(key, desc)| help_kv(key, desc, key_col_width, key_style)),
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Help", Some("(Esc to close, j/k to scroll)")));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
