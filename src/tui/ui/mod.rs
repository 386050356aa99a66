pub mod document;
mod layout;
mod popups;
pub mod util;

use layout::{DynamicLayout, Section};

use crate::tui::app::{App, AppMode, Focus};
use document::find_bar_line;
use popups::render_help_popup;
use ratatui::Frame;
use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use unicode_width::UnicodeWidthStr;
use util::{padding_for, truncate_to_width};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let main = DynamicLayout::vertical(area)
        .section(Section::Title, Constraint::Length(1))
        .section_if(app.search.is_open(), Section::FindBar, Constraint::Length(3))
        .section(Section::Body, Constraint::Min(0))
        .section(Section::Status, Constraint::Length(1))
        .build();

    render_title_bar(frame, app, main.area(Section::Title));

    if let Some(find_area) = main.get(Section::FindBar) {
        render_find_bar(frame, app, find_area);
    }

    let body = DynamicLayout::horizontal(main.area(Section::Body))
        .section_if(
            app.show_outline,
            Section::Outline,
            Constraint::Percentage(app.outline_width),
        )
        .section(Section::Content, Constraint::Min(0))
        .build();

    if let Some(outline_area) = body.get(Section::Outline) {
        render_outline(frame, app, outline_area);
    }
    render_content(frame, app, body.area(Section::Content));
    render_status_bar(frame, app, main.area(Section::Status));

    if app.mode == AppMode::Help {
        render_help_popup(frame, app, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "mdseek - {} - {} headings",
        app.filename,
        app.document.headings.len()
    );
    let title = Paragraph::new(truncate_to_width(&title, usize::from(area.width))).style(
        Style::default()
            .fg(app.theme.title_bar_fg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, area);
}

fn render_find_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.mode == AppMode::DocSearch))
        .title(" Find ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut query = find_bar_line(&app.document.tree, theme);
    if app.mode == AppMode::DocSearch {
        query.push_span(Span::styled("▌", Style::default().fg(theme.foreground)));
    }

    let mut right = Vec::new();
    if let Some((indicator, navigable)) = app.search_indicator() {
        let hint_style = if navigable {
            theme.text_style()
        } else {
            theme.dim_style()
        };
        right.push(Span::styled(format!(" {} ", indicator), theme.bold_style()));
        right.push(Span::styled("Enter:next  S-Enter:prev  Esc:close ", hint_style));
    }
    let right = Line::from(right);

    let used = query.width() + right.width();
    let mut spans = query.spans;
    spans.push(Span::raw(" ".repeat(usize::from(inner.width).saturating_sub(used))));
    spans.extend(right.spans);
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_outline(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let items: Vec<ListItem> = app
        .sections()
        .into_iter()
        .map(|section| {
            let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
            let marker = if section.folded { "▶ " } else { "▼ " };
            let text = format!(
                "{}{}{} {}",
                indent,
                marker,
                "#".repeat(usize::from(section.level)),
                section.title
            );
            ListItem::new(Line::from(Span::styled(
                text,
                Style::default().fg(theme.heading_color(section.level)),
            )))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(app.focus == Focus::Outline))
                .title(" Outline "),
        )
        .style(theme.content_style())
        .highlight_style(theme.selection_style())
        .highlight_symbol("► ");

    frame.render_stateful_widget(list, area, &mut app.outline_state);
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(app.focus == Focus::Content))
        .title(format!(" {} ", app.filename));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Leave a column for the scrollbar.
    let text_width = inner.width.saturating_sub(1);
    app.prepare_frame(text_width, inner.height);

    let top = app.viewport.top();
    let visible: Vec<Line> = app
        .rendered
        .lines
        .iter()
        .skip(top)
        .take(usize::from(inner.height))
        .cloned()
        .collect();
    let text_area = Rect {
        width: text_width,
        ..inner
    };
    frame.render_widget(
        Paragraph::new(visible).style(app.theme.content_style()),
        text_area,
    );

    let total = app.rendered.len();
    if total > usize::from(inner.height) {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .style(app.theme.dim_style());
        let mut state = ScrollbarState::new(total.saturating_sub(usize::from(inner.height)))
            .position(top);
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state,
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.mode {
        AppMode::Normal => "NORMAL",
        AppMode::DocSearch => "FIND",
        AppMode::Help => "HELP",
    };
    let focus = match app.focus {
        Focus::Outline => "Outline",
        Focus::Content => "Content",
    };

    let left = match &app.status_message {
        Some(msg) => format!(" [{}] {}", mode, msg),
        None => format!(" [{}] {} • ?:help • /:find • q:quit", mode, focus),
    };

    let total = app.rendered.len();
    let percent = if total == 0 {
        100
    } else {
        (app.viewport.top() + app.viewport.height()).min(total) * 100 / total
    };
    let right = format!("{} words • {}% ", app.document.word_count(), percent);

    let width = usize::from(area.width);
    let left = truncate_to_width(&left, width.saturating_sub(right.width()));
    let text = format!(
        "{}{}{}",
        left,
        padding_for(&left, width.saturating_sub(right.width())),
        right
    );
    frame.render_widget(
        Paragraph::new(text).style(app.theme.status_bar_style()),
        area,
    );
}
