use crate::config::Config;
use crate::keybindings::{Action, KeybindingMode, Keybindings};
use crate::parser::{self, Document};
use crate::search::{Phase, ScrollBehavior, ScrollBlock, ScrollIntoView, ScrollOptions, SearchController};
use crate::tree::SectionInfo;
use crate::tui::help_text;
use crate::tui::theme::{Theme, ThemeName};
use crate::tui::ui::document::{RenderedDocument, render_document};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indextree::NodeId;
use ratatui::widgets::ListState;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Outline,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Normal,
    DocSearch,
    Help,
}

impl AppMode {
    fn keybinding_mode(self) -> KeybindingMode {
        match self {
            AppMode::Normal => KeybindingMode::Normal,
            AppMode::DocSearch => KeybindingMode::DocSearch,
            AppMode::Help => KeybindingMode::Help,
        }
    }
}

/// Content pane scroll position.
///
/// Search navigation asks for a node; the request is resolved to a line on
/// the next frame, once the layout for the current width is known. Smooth
/// requests move `smoothing` of the remaining distance per frame.
#[derive(Debug, Clone)]
pub struct Viewport {
    offset: f32,
    target: f32,
    height: usize,
    total: usize,
    smoothing: f32,
    pending: Option<(NodeId, ScrollOptions)>,
}

impl Viewport {
    pub fn new(smoothing: f32) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            height: 0,
            total: 0,
            smoothing,
            pending: None,
        }
    }

    /// First visible line.
    pub fn top(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn max_top(&self) -> usize {
        self.total.saturating_sub(self.height)
    }

    pub fn set_metrics(&mut self, height: usize, total: usize) {
        self.height = height;
        self.total = total;
        let max = self.max_top() as f32;
        self.target = self.target.min(max);
        self.offset = self.offset.min(max);
    }

    /// Jump to `line` without animating.
    pub fn jump_to(&mut self, line: usize) {
        self.target = line.min(self.max_top()) as f32;
        self.offset = self.target;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let line = self.top().saturating_add_signed(delta);
        self.jump_to(line);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// A request or animation still needs frames.
    pub fn is_moving(&self) -> bool {
        self.is_pending() || (self.target - self.offset).abs() >= 0.5
    }

    /// Turn a pending node request into a target line.
    pub fn resolve(&mut self, doc: &RenderedDocument) {
        let Some((node, options)) = self.pending.take() else {
            return;
        };
        let Some(line) = doc.line_of(node) else {
            tracing::debug!(?node, "scroll target not drawn");
            return;
        };
        let top = match options.block {
            ScrollBlock::Start => line,
            ScrollBlock::Center => line.saturating_sub(self.height / 2),
        };
        self.target = top.min(self.max_top()) as f32;
        if options.behavior == ScrollBehavior::Instant {
            self.offset = self.target;
        }
    }

    /// Advance one animation frame. Returns true while still moving.
    pub fn animate(&mut self) -> bool {
        let distance = self.target - self.offset;
        if distance.abs() < 0.5 {
            self.offset = self.target;
            return false;
        }
        self.offset += distance * self.smoothing;
        true
    }
}

impl ScrollIntoView<NodeId> for Viewport {
    fn scroll_into_view(&mut self, node: NodeId, options: ScrollOptions) {
        self.pending = Some((node, options));
    }
}

pub struct App {
    pub document: Document,
    pub filename: String,
    pub file_path: Option<PathBuf>,
    pub search: SearchController<NodeId>,
    pub viewport: Viewport,
    pub rendered: RenderedDocument,
    rendered_width: u16,
    dirty: bool,
    pub outline_state: ListState,
    pub focus: Focus,
    pub mode: AppMode,
    pub show_outline: bool,
    pub outline_width: u16,
    pub help_scroll: u16,
    pub current_theme: ThemeName,
    pub theme: Theme,
    pub keybindings: Keybindings,
    pub status_message: Option<String>,
    pub should_quit: bool,
    config: Config,
}

impl App {
    pub fn new(
        document: Document,
        filename: String,
        file_path: Option<PathBuf>,
        config: Config,
    ) -> Self {
        let current_theme = config.theme_name();
        let theme = Theme::from_name(current_theme).with_custom_colors(&config.theme);

        let mut outline_state = ListState::default();
        if !document.tree.sections().is_empty() {
            outline_state.select(Some(0));
        }

        Self {
            document,
            filename,
            file_path,
            search: SearchController::new(config.search.debounce(), config.search.max_query_len),
            viewport: Viewport::new(config.search.smoothing()),
            rendered: RenderedDocument::default(),
            rendered_width: 0,
            dirty: true,
            outline_state,
            focus: Focus::Content,
            mode: AppMode::Normal,
            show_outline: config.ui.show_outline,
            outline_width: config.ui.outline_width.clamp(10, 60),
            help_scroll: 0,
            current_theme,
            theme,
            keybindings: config.keybindings(),
            status_message: None,
            should_quit: false,
            config,
        }
    }

    pub fn sections(&self) -> Vec<SectionInfo> {
        self.document.tree.sections()
    }

    fn selected_section(&self) -> Option<SectionInfo> {
        let index = self.outline_state.selected()?;
        self.sections().into_iter().nth(index)
    }

    /// Lay the document out for `width` if anything changed, then settle
    /// pending scroll requests and step the scroll animation.
    pub fn prepare_frame(&mut self, width: u16, height: u16) -> bool {
        if self.dirty || width != self.rendered_width {
            self.rendered = render_document(&self.document.tree, &self.theme, width);
            self.rendered_width = width;
            self.dirty = false;
        }
        self.viewport
            .set_metrics(usize::from(height), self.rendered.len());
        self.viewport.resolve(&self.rendered);
        self.viewport.animate()
    }

    /// Fire the search debounce if it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.search.tick(&mut self.document.tree, &mut self.viewport, now) {
            self.dirty = true;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let mode = self.mode.keybinding_mode();
        if let Some(action) = self.keybindings.dispatch(mode, key) {
            self.handle_action(action, now);
            return;
        }
        if self.mode == AppMode::DocSearch
            && let KeyCode::Char(c) = key.code
            && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            self.search_input(c, now);
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        self.status_message = None;
        match action {
            Action::Next => self.next(),
            Action::Previous => self.previous(),
            Action::First => self.first(),
            Action::Last => self.last(),
            Action::PageDown => self.scroll_page(true),
            Action::PageUp => self.scroll_page(false),
            Action::ToggleFocus => self.toggle_focus(),
            Action::ToggleFold => self.toggle_fold(),
            Action::ToggleOutline => self.show_outline = !self.show_outline,
            Action::ToggleDetails => self.toggle_details(),
            Action::EnterDocSearch => self.open_search(),
            Action::ExitMode => self.exit_mode(),
            Action::NextMatch => self.next_match(),
            Action::PrevMatch => self.prev_match(),
            Action::SearchBackspace => self.search_backspace(now),
            Action::ClearSearch => self.clear_search(now),
            Action::CycleTheme => self.cycle_theme(),
            Action::ToggleHelp => self.toggle_help(),
            Action::HelpScrollDown => {
                let max = u16::try_from(self.help_line_count()).unwrap_or(u16::MAX);
                self.help_scroll = self.help_scroll.saturating_add(1).min(max.saturating_sub(1));
            }
            Action::HelpScrollUp => self.help_scroll = self.help_scroll.saturating_sub(1),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::Outline => self.select_section(|i, len| (i + 1).min(len - 1)),
            Focus::Content => self.viewport.scroll_by(1),
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Outline => self.select_section(|i, _| i.saturating_sub(1)),
            Focus::Content => self.viewport.scroll_by(-1),
        }
    }

    pub fn first(&mut self) {
        match self.focus {
            Focus::Outline => self.select_section(|_, _| 0),
            Focus::Content => self.viewport.jump_to(0),
        }
    }

    pub fn last(&mut self) {
        match self.focus {
            Focus::Outline => self.select_section(|_, len| len - 1),
            Focus::Content => self.viewport.jump_to(usize::MAX),
        }
    }

    fn select_section(&mut self, pick: impl Fn(usize, usize) -> usize) {
        let sections = self.sections();
        if sections.is_empty() {
            return;
        }
        let current = self.outline_state.selected().unwrap_or(0);
        let index = pick(current, sections.len()).min(sections.len() - 1);
        self.outline_state.select(Some(index));
        self.viewport.scroll_into_view(
            sections[index].heading,
            ScrollOptions {
                block: ScrollBlock::Start,
                behavior: ScrollBehavior::Smooth,
            },
        );
    }

    pub fn scroll_page(&mut self, down: bool) {
        let page = self.viewport.height().saturating_sub(2).max(1) as isize;
        self.viewport.scroll_by(if down { page } else { -page });
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Outline => Focus::Content,
            Focus::Content if self.show_outline => Focus::Outline,
            Focus::Content => Focus::Content,
        };
    }

    pub fn toggle_fold(&mut self) {
        let Some(section) = self.selected_section() else {
            return;
        };
        let folded = self.document.tree.toggle_section(&section);
        self.dirty = true;
        self.rerun_search();
        self.status_message = Some(format!(
            "{} {}",
            if folded { "Folded" } else { "Unfolded" },
            section.title
        ));
    }

    pub fn toggle_details(&mut self) {
        let open = self.document.tree.toggle_details();
        self.dirty = true;
        self.rerun_search();
        self.status_message = Some(
            if open {
                "Details expanded"
            } else {
                "Details collapsed"
            }
            .to_string(),
        );
    }

    /// Hidden content is never matched, so visibility changes re-run the
    /// settled query.
    fn rerun_search(&mut self) {
        self.search.refresh(&mut self.document.tree, &mut self.viewport);
    }

    pub fn open_search(&mut self) {
        self.search.open(&mut self.document.tree);
        self.mode = AppMode::DocSearch;
        self.keybindings.reset_sequences();
        self.dirty = true;
    }

    pub fn close_search(&mut self) {
        self.search.close(&mut self.document.tree);
        self.mode = AppMode::Normal;
        self.dirty = true;
    }

    /// Escape: close the find bar, then the help popup.
    pub fn exit_mode(&mut self) {
        match self.mode {
            AppMode::Help => self.mode = self.base_mode(),
            _ if self.search.is_open() => self.close_search(),
            _ => {}
        }
    }

    fn base_mode(&self) -> AppMode {
        if self.search.is_open() {
            AppMode::DocSearch
        } else {
            AppMode::Normal
        }
    }

    pub fn search_input(&mut self, c: char, now: Instant) {
        if self.search.insert_char(&mut self.document.tree, c, now) {
            self.dirty = true;
        }
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if self.search.backspace(&mut self.document.tree, now) {
            self.dirty = true;
        }
    }

    pub fn clear_search(&mut self, now: Instant) {
        if self.search.clear_query(&mut self.document.tree, now) {
            self.dirty = true;
        }
    }

    /// Enter while a query is pending commits it; the first match becomes
    /// current.
    pub fn next_match(&mut self) {
        let tree = &mut self.document.tree;
        if self.search.flush(tree, &mut self.viewport) || self.search.advance(tree, &mut self.viewport) {
            self.dirty = true;
        }
    }

    pub fn prev_match(&mut self) {
        let tree = &mut self.document.tree;
        if self.search.flush(tree, &mut self.viewport) || self.search.retreat(tree, &mut self.viewport) {
            self.dirty = true;
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == AppMode::Help {
            self.base_mode()
        } else {
            self.help_scroll = 0;
            AppMode::Help
        };
    }

    pub fn help_line_count(&self) -> usize {
        help_text::help_lines(&self.keybindings).len()
    }

    pub fn cycle_theme(&mut self) {
        self.current_theme = self.current_theme.next();
        self.theme = Theme::from_name(self.current_theme).with_custom_colors(&self.config.theme);
        self.dirty = true;
        self.status_message = match self.config.set_theme(self.current_theme) {
            Ok(()) => Some(format!("Theme: {}", self.current_theme)),
            Err(e) => {
                tracing::warn!("could not save theme: {}", e);
                Some(format!("Theme: {} (not saved)", self.current_theme))
            }
        };
    }

    /// Re-read the file after an external change, keeping folds out of it
    /// but the find bar, the query and the current match index.
    pub fn reload(&mut self) -> Result<(), String> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        let mut document = parser::parse_file(&path, &self.config.content)
            .map_err(|e| format!("Reload failed: {}", e))?;

        self.search.rerun(&mut document.tree, &mut self.viewport);
        self.document = document;
        self.dirty = true;

        let count = self.sections().len();
        match self.outline_state.selected() {
            _ if count == 0 => self.outline_state.select(None),
            Some(i) if i >= count => self.outline_state.select(Some(count - 1)),
            None => self.outline_state.select(Some(0)),
            Some(_) => {}
        }
        tracing::debug!(path = %path.display(), "document reloaded");
        self.status_message = Some("File reloaded".to_string());
        Ok(())
    }

    /// `{current}/{count}` or "no matches", plus whether navigation is
    /// possible.
    pub fn search_indicator(&self) -> Option<(String, bool)> {
        if self.search.phase() == Phase::Searching {
            return Some(("…".to_string(), false));
        }
        let state = self.search.state();
        state
            .indicator()
            .map(|text| (text, state.match_count() > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::io::Write;
    use std::time::Duration;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app(md: &str) -> App {
        let document = parser::parse_markdown(md, &ContentConfig::default());
        App::new(document, "test.md".to_string(), None, Config::default())
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
    }

    #[test]
    fn test_slash_opens_and_typing_searches() {
        let mut app = app("# Stocks\n\nBuy stock.\n\nSell stock.");
        let t0 = Instant::now();
        app.handle_key(key(KeyCode::Char('/'), KeyModifiers::NONE), t0);
        assert_eq!(app.mode, AppMode::DocSearch);
        assert!(app.search.is_open());

        // q types into the query instead of quitting
        type_str(&mut app, "qstock", t0);
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Backspace, KeyModifiers::NONE), t0);
        app.handle_key(key(KeyCode::Char('u'), KeyModifiers::CONTROL), t0);
        type_str(&mut app, "STOCK", t0);
        assert_eq!(app.search.query(), "STOCK");
        assert_eq!(app.search.phase(), Phase::Searching);

        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.search.phase(), Phase::Settled);
        // Heading "Stocks" also contains the query
        assert_eq!(app.search.state().match_count(), 3);
        assert_eq!(app.search_indicator(), Some(("1/3".to_string(), true)));

        app.handle_key(key(KeyCode::Enter, KeyModifiers::NONE), t0);
        assert_eq!(app.search.state().current_index, 2);
        app.handle_key(key(KeyCode::Enter, KeyModifiers::SHIFT), t0);
        assert_eq!(app.search.state().current_index, 1);
        app.handle_key(key(KeyCode::Up, KeyModifiers::NONE), t0);
        assert_eq!(app.search.state().current_index, 3);

        app.handle_key(key(KeyCode::Esc, KeyModifiers::NONE), t0);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.document.tree.marks_under(app.document.tree.root()).is_empty());
    }

    #[test]
    fn test_ctrl_f_in_find_bar_reselects_query() {
        let mut app = app("alpha beta");
        let t0 = Instant::now();
        app.handle_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL), t0);
        type_str(&mut app, "beta", t0);
        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.search.phase(), Phase::Settled);

        app.handle_key(key(KeyCode::Char('f'), KeyModifiers::CONTROL), t0);
        assert_eq!(app.mode, AppMode::DocSearch);
        assert_eq!(app.search.query(), "beta");
        assert!(app.search.input().selected);
        assert_eq!(app.search.phase(), Phase::Settled);

        type_str(&mut app, "alpha", t0);
        assert_eq!(app.search.query(), "alpha");
    }

    #[test]
    fn test_enter_commits_pending_query() {
        let mut app = app("alpha beta alpha");
        let t0 = Instant::now();
        app.open_search();
        type_str(&mut app, "alpha", t0);
        app.handle_key(key(KeyCode::Enter, KeyModifiers::NONE), t0);
        assert_eq!(app.search.phase(), Phase::Settled);
        assert_eq!(app.search.state().current_index, 1);
        assert_eq!(app.search.state().match_count(), 2);
    }

    #[test]
    fn test_no_matches_indicator() {
        let mut app = app("nothing here");
        let t0 = Instant::now();
        app.open_search();
        type_str(&mut app, "zebra", t0);
        assert_eq!(app.search_indicator(), Some(("…".to_string(), false)));
        app.next_match();
        assert_eq!(app.search_indicator(), Some(("no matches".to_string(), false)));
    }

    #[test]
    fn test_viewport_centres_current_match() {
        let body: String = (0..60).map(|i| format!("line {i}\n\n")).collect();
        let mut app = app(&format!("{body}target word"));
        app.viewport = Viewport::new(1.0);
        app.prepare_frame(80, 10);
        app.open_search();
        app.search
            .set_query(&mut app.document.tree, "target", Instant::now());
        app.next_match();
        assert!(app.viewport.is_pending());

        app.prepare_frame(80, 10);
        let mark = app.search.state().current().unwrap().mark;
        let line = app.rendered.line_of(mark).unwrap();
        let top = app.viewport.top();
        assert!(top <= line && line < top + 10);
    }

    #[test]
    fn test_smooth_scroll_animates() {
        let mut viewport = Viewport::new(0.5);
        viewport.set_metrics(10, 100);
        viewport.target = 40.0;
        assert!(viewport.animate());
        assert_eq!(viewport.top(), 20);
        for _ in 0..20 {
            viewport.animate();
        }
        assert_eq!(viewport.top(), 40);
        assert!(!viewport.animate());
    }

    #[test]
    fn test_fold_hides_matches() {
        let mut app = app("# A\n\nneedle\n\n# B\n\nneedle");
        app.open_search();
        app.search
            .set_query(&mut app.document.tree, "needle", Instant::now());
        app.next_match();
        assert_eq!(app.search.state().match_count(), 2);

        app.focus = Focus::Outline;
        app.first();
        app.toggle_fold();
        assert_eq!(app.search.state().match_count(), 1);
    }

    #[test]
    fn test_help_toggle_returns_to_search() {
        let mut app = app("text");
        app.open_search();
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Help);
        app.exit_mode();
        assert_eq!(app.mode, AppMode::DocSearch);
    }

    #[test]
    fn test_reload_keeps_query() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one match").unwrap();
        let path = file.path().to_path_buf();
        let document = parser::parse_file(&path, &ContentConfig::default()).unwrap();
        let mut app = App::new(document, "f.md".to_string(), Some(path.clone()), Config::default());

        app.open_search();
        app.search
            .set_query(&mut app.document.tree, "match", Instant::now());
        app.next_match();
        assert_eq!(app.search.state().match_count(), 1);

        std::fs::write(&path, "match and match again").unwrap();
        app.reload().unwrap();
        assert_eq!(app.search.query(), "match");
        assert_eq!(app.search.state().match_count(), 2);
        assert_eq!(app.search.state().current_index, 1);
    }
}
