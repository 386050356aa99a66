//! Layout and text-width helpers.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A rectangle centered in `area`, sized as a percentage of it.
pub fn centered_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Cut `text` to at most `width` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Spaces needed to pad `text` to `width` display columns.
pub fn padding_for(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.width()))
}

/// Split text into alternating word and whitespace runs, keeping both.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            pieces.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_area() {
        let outer = Rect::new(0, 0, 100, 50);
        let area = centered_area(outer, 50, 50);
        assert_eq!((area.width, area.height), (50, 25));
        assert_eq!(area.x, 25);
        assert_eq!(outer.intersection(area), area);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a longer title", 6), "a lon…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for("ab", 5), "   ");
        assert_eq!(padding_for("日本", 4), "");
        assert_eq!(padding_for("toolong", 3), "");
    }

    #[test]
    fn test_split_words_keeps_whitespace() {
        assert_eq!(split_words("one  two three"), vec!["one", "  ", "two", " ", "three"]);
        assert_eq!(split_words(" lead"), vec![" ", "lead"]);
        assert!(split_words("").is_empty());
    }
}
