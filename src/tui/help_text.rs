//! Help popup contents, generated from the active keybindings so user
//! overrides show up.

use crate::keybindings::{KeybindingMode, Keybindings};
use crate::tui::theme::Theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Key column width for keybindings
const KEY_COLUMN_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpLine {
    Title(String),
    Description(String),
    SectionHeader(String),
    KeyBinding { keys: String, desc: String },
    Blank,
}

impl HelpLine {
    pub fn to_line(&self, theme: &Theme) -> Line<'static> {
        match self {
            HelpLine::Title(text) => Line::from(Span::styled(
                text.clone(),
                Style::default()
                    .fg(theme.modal_title())
                    .add_modifier(Modifier::BOLD),
            )),
            HelpLine::Description(text) => Line::from(Span::styled(
                text.clone(),
                Style::default()
                    .fg(theme.modal_description())
                    .add_modifier(Modifier::ITALIC),
            )),
            HelpLine::SectionHeader(text) => Line::from(Span::styled(
                text.clone(),
                Style::default()
                    .fg(theme.modal_text())
                    .add_modifier(Modifier::BOLD),
            )),
            HelpLine::KeyBinding { keys, desc } => Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", keys, width = KEY_COLUMN_WIDTH),
                    Style::default().fg(theme.modal_key_fg()),
                ),
                Span::styled(desc.clone(), Style::default().fg(theme.modal_text())),
            ]),
            HelpLine::Blank => Line::from(""),
        }
    }
}

/// One section per mode, actions grouped by category.
pub fn help_lines(keybindings: &Keybindings) -> Vec<HelpLine> {
    let mut lines = vec![
        HelpLine::Title("mdseek - Keyboard Shortcuts".to_string()),
        HelpLine::Description("Use j/k or ↓/↑ to scroll | Press Esc or ? to close".to_string()),
        HelpLine::Blank,
    ];

    for mode in [
        KeybindingMode::Normal,
        KeybindingMode::DocSearch,
        KeybindingMode::Help,
    ] {
        let entries = keybindings.help_entries(mode);
        if entries.is_empty() {
            continue;
        }
        let mut category = "";
        for (action, keys) in entries {
            if action.category() != category {
                category = action.category();
                lines.push(HelpLine::SectionHeader(format!(
                    "{} · {}",
                    mode.display_name(),
                    category
                )));
            }
            lines.push(HelpLine::KeyBinding {
                keys: keys.join("/"),
                desc: action.description().to_string(),
            });
        }
        lines.push(HelpLine::Blank);
    }

    lines.push(HelpLine::Description(
        "While finding, any other key types into the query".to_string(),
    ));
    lines
}

pub fn build_help_text(keybindings: &Keybindings, theme: &Theme) -> Vec<Line<'static>> {
    help_lines(keybindings)
        .iter()
        .map(|line| line.to_line(theme))
        .collect()
}
