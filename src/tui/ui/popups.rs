//! Modal overlays.

use super::util::centered_area;
use crate::tui::app::App;
use crate::tui::help_text;
use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::style::Style;
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

/// Keyboard shortcuts, scrolled by `app.help_scroll`.
pub fn render_help_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_area(area, 70, 80);
    let theme = &app.theme;

    frame.render_widget(Clear, popup);

    let lines = help_text::build_help_text(&app.keybindings, theme);
    let len = lines.len();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.modal_border()))
                .title(" Help ")
                .style(Style::default().bg(theme.modal_bg())),
        )
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, popup);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme.modal_border()));
    let mut state = ScrollbarState::new(len).position(usize::from(app.help_scroll));
    frame.render_stateful_widget(
        scrollbar,
        popup.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut state,
    );
}
