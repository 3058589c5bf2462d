// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max_len` chars, marking the cut with `…`.
pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    match max_len {
        0 => String::new(),
        _ if text_len(text) <= max_len => text.to_owned(),
        1 => "…".to_owned(),
        _ => text.chars().take(max_len - 1).chain(std::iter::once('…')).collect(),
    }
}

/// Collapses whitespace runs (including newlines) to single spaces.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canvas text with trailing blanks removed from every line and trailing empty lines dropped.
pub(crate) fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let mut lines =
        canvas.lines().map(|line| line.trim_end_matches(' ').to_owned()).collect::<Vec<_>>();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{canvas_to_string_trimmed, single_line, text_len, truncate_with_ellipsis};
    use crate::render::Canvas;

    #[test]
    fn truncates_by_chars_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
        assert_eq!(truncate_with_ellipsis("h", 1), "h");
        assert_eq!(truncate_with_ellipsis("hello", 3), "he…");
        assert_eq!(text_len("αβγ"), 3);
        assert_eq!(truncate_with_ellipsis("αβγ", 2), "α…");
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("  a\n\tb   c "), "a b c");
    }

    #[test]
    fn trimmed_output_drops_trailing_blanks() {
        let mut canvas = Canvas::new(3, 3).expect("canvas");
        canvas.set(0, 0, 'A').expect("set");
        assert_eq!(canvas_to_string_trimmed(&canvas), "A");
    }
}
