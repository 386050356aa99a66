//! Lays the document tree out as terminal lines.
//!
//! The renderer walks the tree once per frame width, skipping hidden and
//! folded elements, and records the first line every node lands on so the
//! viewport can scroll a search highlight into view.

use super::util::{padding_for, split_words};
use crate::search::TextTree;
use crate::tree::{Display, DocTree, ElementKind, NodeData};
use crate::tui::theme::Theme;
use indextree::NodeId;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// The laid-out document.
#[derive(Debug, Default)]
pub struct RenderedDocument {
    pub lines: Vec<Line<'static>>,
    node_lines: HashMap<NodeId, usize>,
}

impl RenderedDocument {
    /// First line `node` is drawn on, if it is drawn at all.
    pub fn line_of(&self, node: NodeId) -> Option<usize> {
        self.node_lines.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn render_document(tree: &DocTree, theme: &Theme, width: u16) -> RenderedDocument {
    let mut renderer = Renderer {
        tree,
        theme,
        width: usize::from(width.max(8)),
        lines: Vec::new(),
        spans: Vec::new(),
        used: 0,
        line_open: false,
        last_blank: true,
        prefix: Vec::new(),
        inline_stack: Vec::new(),
        wrap: true,
        quote_depth: 0,
        list_depth: 0,
        node_lines: HashMap::new(),
    };
    renderer.block(tree.body());
    renderer.end_line();
    while renderer.lines.last().is_some_and(|l| l.width() == 0) {
        renderer.lines.pop();
    }
    RenderedDocument {
        lines: renderer.lines,
        node_lines: renderer.node_lines,
    }
}

/// The find bar as one line, drawn from the panel subtree: the label, then
/// the placeholder while it is visible, then the typed value.
pub fn find_bar_line(tree: &DocTree, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for node in tree.descendants(tree.search_panel()) {
        let Some(text) = tree.text(node) else { continue };
        let Some(parent) = tree.parent(node) else { continue };
        if text.is_empty() || !tree.computed_visibility(parent).is_visible() {
            continue;
        }
        let style = match tree.kind(parent) {
            Some(ElementKind::Label) => Style::default()
                .fg(theme.title_bar_fg)
                .add_modifier(Modifier::BOLD),
            Some(ElementKind::Placeholder) => theme.dim_style().add_modifier(Modifier::ITALIC),
            _ => theme.text_style(),
        };
        spans.push(Span::styled(text.to_string(), style));
    }
    Line::from(spans)
}

struct Renderer<'a> {
    tree: &'a DocTree,
    theme: &'a Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    used: usize,
    line_open: bool,
    last_blank: bool,
    /// Repeated at the start of every line: quote bars, list indents.
    prefix: Vec<Span<'static>>,
    /// Inline elements enclosing the text being drawn, outermost first.
    inline_stack: Vec<NodeId>,
    wrap: bool,
    quote_depth: usize,
    list_depth: usize,
    node_lines: HashMap<NodeId, usize>,
}

impl Renderer<'_> {
    fn visible(&self, node: NodeId) -> bool {
        match self.tree.get(node) {
            Some(NodeData::Text(_)) => true,
            Some(NodeData::Element(el)) => {
                !el.hidden && el.display != Display::None && el.kind.is_renderable()
            }
            None => false,
        }
    }

    fn prefix_width(&self) -> usize {
        self.prefix.iter().map(|s| s.content.width()).sum()
    }

    fn ensure_line(&mut self) {
        if !self.line_open {
            self.spans = self.prefix.clone();
            self.used = self.prefix_width();
            self.line_open = true;
        }
    }

    fn end_line(&mut self) {
        if self.line_open {
            let spans = std::mem::take(&mut self.spans);
            self.lines.push(Line::from(spans));
            self.line_open = false;
            self.last_blank = false;
        }
    }

    /// Separate blocks with one empty line, never two.
    fn blank(&mut self) {
        self.end_line();
        if !self.last_blank && self.list_depth == 0 {
            self.lines.push(Line::from(self.prefix.clone()));
            self.last_blank = true;
        }
    }

    fn anchor(&mut self, node: NodeId) {
        let line = self.lines.len();
        self.node_lines.entry(node).or_insert(line);
        for &el in &self.inline_stack {
            self.node_lines.entry(el).or_insert(line);
        }
    }

    fn push_span(&mut self, node: NodeId, text: &str, style: Style) {
        self.ensure_line();
        self.anchor(node);
        self.used += text.width();
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn push_text(&mut self, node: NodeId, text: &str, style: Style) {
        if !self.wrap {
            for (i, segment) in text.split('\n').enumerate() {
                if i > 0 {
                    self.ensure_line();
                    self.end_line();
                }
                if !segment.is_empty() {
                    self.push_span(node, segment, style);
                }
            }
            return;
        }

        let text = text.replace('\n', " ");
        for piece in split_words(&text) {
            let is_space = piece.starts_with(char::is_whitespace);
            self.ensure_line();
            let at_start = self.used <= self.prefix_width();
            if is_space && at_start {
                continue;
            }
            if !at_start && self.used + piece.width() > self.width {
                self.trim_trailing_space();
                self.end_line();
                if is_space {
                    continue;
                }
            }
            self.push_span(node, piece, style);
        }
    }

    fn trim_trailing_space(&mut self) {
        let prefix = self.prefix.len();
        while self.spans.len() > prefix
            && self
                .spans
                .last()
                .is_some_and(|s| s.content.trim().is_empty())
        {
            self.spans.pop();
        }
    }

    fn inline_style(&self, base: Style) -> Style {
        self.inline_stack.iter().fold(base, |style, &node| {
            let Some(el) = self.tree.element(node) else {
                return style;
            };
            match &el.kind {
                ElementKind::Strong => style.patch(self.theme.bold_style()),
                ElementKind::Emphasis => style.patch(self.theme.italic_style()),
                ElementKind::Strikethrough => style.patch(self.theme.strikethrough_style()),
                ElementKind::InlineCode => style.patch(self.theme.inline_code_style()),
                ElementKind::Link { .. } => style.patch(self.theme.link_style()),
                ElementKind::Mark if el.current => style.patch(self.theme.search_current_style()),
                ElementKind::Mark => style.patch(self.theme.search_match_style()),
                _ => style,
            }
        })
    }

    fn base_style(&self) -> Style {
        if self.quote_depth > 0 {
            Style::default()
                .fg(self.theme.blockquote_fg)
                .add_modifier(Modifier::ITALIC)
        } else {
            self.theme.text_style()
        }
    }

    fn inline_children(&mut self, node: NodeId, base: Style) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        for child in children {
            self.inline(child, base);
        }
    }

    fn inline(&mut self, node: NodeId, base: Style) {
        if !self.visible(node) {
            return;
        }
        if let Some(text) = self.tree.text(node) {
            let style = self.inline_style(base);
            self.push_text(node, text, style);
            return;
        }
        self.inline_stack.push(node);
        self.inline_children(node, base);
        self.inline_stack.pop();
    }

    fn blocks(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        for child in children {
            self.block(child);
        }
    }

    fn block(&mut self, node: NodeId) {
        if !self.visible(node) {
            return;
        }
        let Some(kind) = self.tree.kind(node).cloned() else {
            // Stray text directly in a container
            let base = self.base_style();
            self.inline(node, base);
            return;
        };
        self.node_lines.entry(node).or_insert(self.lines.len());

        match kind {
            ElementKind::Root
            | ElementKind::Body
            | ElementKind::Section
            | ElementKind::SectionBody => self.blocks(node),
            ElementKind::SearchPanel
            | ElementKind::Label
            | ElementKind::Input
            | ElementKind::Placeholder
            | ElementKind::Value
            | ElementKind::Metadata => {}
            ElementKind::Heading(level) => self.heading(node, level),
            ElementKind::Paragraph | ElementKind::Summary => {
                let base = self.base_style();
                self.inline_children(node, base);
                self.blank();
            }
            ElementKind::CodeBlock { language } => self.code_block(node, language.as_deref()),
            ElementKind::List { ordered } => self.list(node, ordered),
            ElementKind::ListItem { checked } => self.list_item(node, "• ", checked),
            ElementKind::Blockquote => {
                self.end_line();
                self.prefix.push(Span::styled(
                    "│ ",
                    Style::default().fg(self.theme.blockquote_border),
                ));
                self.quote_depth += 1;
                self.blocks(node);
                self.end_line();
                self.quote_depth -= 1;
                self.prefix.pop();
                self.blank();
            }
            ElementKind::Table => self.table(node),
            ElementKind::TableRow { .. } | ElementKind::TableCell => self.blocks(node),
            ElementKind::Details => self.details(node),
            ElementKind::Image => {
                self.end_line();
                self.push_span(node, "[image: ", self.theme.dim_style());
                self.inline_children(node, self.theme.dim_style());
                self.push_span(node, "]", self.theme.dim_style());
                self.blank();
            }
            ElementKind::Rule => {
                self.end_line();
                let width = self.width.saturating_sub(self.prefix_width());
                self.push_span(node, &"─".repeat(width), self.theme.dim_style());
                self.blank();
            }
            ElementKind::Strong
            | ElementKind::Emphasis
            | ElementKind::Strikethrough
            | ElementKind::InlineCode
            | ElementKind::Link { .. }
            | ElementKind::Mark => {
                let base = self.base_style();
                self.inline(node, base);
            }
        }
    }

    fn heading(&mut self, node: NodeId, level: u8) {
        self.end_line();
        if !self.lines.is_empty() && !self.last_blank {
            self.blank();
        }
        let style = self.theme.heading_style(level);
        let marker = format!("{} ", "#".repeat(usize::from(level)));
        self.push_span(node, &marker, style);
        self.inline_children(node, style);

        let folded = self
            .tree
            .parent_of(node)
            .filter(|&p| self.tree.kind(p) == Some(&ElementKind::Section))
            .and_then(|section| self.tree.children(section).nth(1))
            .and_then(|body| self.tree.element(body))
            .is_some_and(|el| el.display == Display::None);
        if folded {
            self.push_span(node, " …", self.theme.dim_style());
        }
        self.blank();
    }

    fn code_block(&mut self, node: NodeId, language: Option<&str>) {
        self.end_line();
        let fence = self.theme.code_fence_style();
        self.push_span(node, &format!("```{}", language.unwrap_or_default()), fence);
        self.end_line();

        let wrap = std::mem::replace(&mut self.wrap, false);
        let code = self.theme.code_style();
        self.inline_children(node, code);
        self.wrap = wrap;

        // Content usually ends with a newline that already closed the line
        self.end_line();
        self.push_span(node, "```", fence);
        self.blank();
    }

    fn list(&mut self, node: NodeId, ordered: bool) {
        self.end_line();
        self.list_depth += 1;
        let items: Vec<NodeId> = self.tree.children(node).collect();
        for (i, item) in items.into_iter().enumerate() {
            if !self.visible(item) {
                continue;
            }
            let checked = match self.tree.kind(item) {
                Some(ElementKind::ListItem { checked }) => *checked,
                _ => None,
            };
            let bullet = if ordered {
                format!("{}. ", i + 1)
            } else {
                "• ".to_string()
            };
            self.node_lines.entry(item).or_insert(self.lines.len());
            self.list_item(item, &bullet, checked);
        }
        self.list_depth -= 1;
        self.blank();
    }

    fn list_item(&mut self, node: NodeId, bullet: &str, checked: Option<bool>) {
        self.end_line();
        let marker = match checked {
            Some(true) => format!("{bullet}[x] "),
            Some(false) => format!("{bullet}[ ] "),
            None => bullet.to_string(),
        };
        let bullet_style = Style::default().fg(self.theme.list_bullet);
        self.push_span(node, &marker, bullet_style);
        self.prefix.push(Span::raw(" ".repeat(marker.width())));

        let children: Vec<NodeId> = self.tree.children(node).collect();
        for child in children {
            if self.tree.kind(child) == Some(&ElementKind::Paragraph) {
                if !self.visible(child) {
                    continue;
                }
                self.node_lines.entry(child).or_insert(self.lines.len());
                let base = self.base_style();
                self.inline_children(child, base);
                self.end_line();
            } else {
                self.block(child);
            }
        }
        self.end_line();
        self.prefix.pop();
    }

    fn table(&mut self, node: NodeId) {
        self.end_line();
        let rows: Vec<NodeId> = self
            .tree
            .children(node)
            .filter(|&r| self.visible(r))
            .collect();
        let mut widths: Vec<usize> = Vec::new();
        for &row in &rows {
            for (j, cell) in self.tree.children(row).enumerate() {
                let w = self.tree.text_of(cell).width();
                if j >= widths.len() {
                    widths.push(w);
                } else {
                    widths[j] = widths[j].max(w);
                }
            }
        }

        let border = Style::default().fg(self.theme.table_border);
        let wrap = std::mem::replace(&mut self.wrap, false);
        for &row in &rows {
            let header = matches!(
                self.tree.kind(row),
                Some(ElementKind::TableRow { header: true })
            );
            let base = if header {
                self.base_style().add_modifier(Modifier::BOLD)
            } else {
                self.base_style()
            };
            self.node_lines.entry(row).or_insert(self.lines.len());
            let cells: Vec<NodeId> = self.tree.children(row).collect();
            for (j, &cell) in cells.iter().enumerate() {
                if j > 0 {
                    self.push_span(cell, " │ ", border);
                }
                self.ensure_line();
                self.node_lines.entry(cell).or_insert(self.lines.len());
                self.inline_children(cell, base);
                let pad = padding_for(&self.tree.text_of(cell), widths.get(j).copied().unwrap_or(0));
                if !pad.is_empty() {
                    self.spans.push(Span::raw(pad));
                }
            }
            self.end_line();
            if header {
                let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
                self.push_span(row, &rule.join("─┼─"), border);
                self.end_line();
            }
        }
        self.wrap = wrap;
        self.blank();
    }

    fn details(&mut self, node: NodeId) {
        self.end_line();
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let open = children
            .iter()
            .skip(1)
            .any(|&c| self.tree.element(c).is_some_and(|el| !el.hidden));
        let marker = if open { "▼ " } else { "▶ " };
        let style = Style::default()
            .fg(self.theme.title_bar_fg)
            .add_modifier(Modifier::BOLD);
        self.push_span(node, marker, style);

        if let Some(&summary) = children.first() {
            self.node_lines.entry(summary).or_insert(self.lines.len());
            self.inline_children(summary, style);
        }
        self.end_line();
        for &child in children.iter().skip(1) {
            self.block(child);
        }
        self.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;
    use crate::parser::parse_markdown;
    use crate::search::SearchController;
    use std::time::Instant;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_text(doc: &RenderedDocument) -> Vec<String> {
        doc.lines.iter().map(text).collect()
    }

    fn render(md: &str, width: u16) -> (DocTree, RenderedDocument) {
        let tree = parse_markdown(md, &ContentConfig::default()).tree;
        let rendered = render_document(&tree, &Theme::default(), width);
        (tree, rendered)
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let (_, doc) = render("# Title\n\nHello world\n\n## Next\n\nMore", 80);
        let lines = all_text(&doc);
        assert_eq!(lines[0], "# Title");
        assert!(lines.contains(&"Hello world".to_string()));
        assert!(lines.contains(&"## Next".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("More"));
    }

    #[test]
    fn test_wraps_at_width() {
        let (_, doc) = render("alpha beta gamma delta", 12);
        let lines = all_text(&doc);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_code_block_keeps_blank_lines() {
        let (_, doc) = render("```rust\nfn a() {}\n\nfn b() {}\n```", 80);
        let lines = all_text(&doc);
        assert_eq!(lines, vec!["```rust", "fn a() {}", "", "fn b() {}", "```"]);
    }

    #[test]
    fn test_folded_section_hides_body() {
        let (mut tree, _) = render("# A\n\nsecret text\n\n# B\n\nvisible", 80);
        let first = tree.sections()[0].clone();
        tree.toggle_section(&first);
        let doc = render_document(&tree, &Theme::default(), 80);
        let joined = all_text(&doc).join("\n");
        assert!(!joined.contains("secret"));
        assert!(joined.contains("# A …"));
        assert!(joined.contains("visible"));
    }

    #[test]
    fn test_front_matter_not_drawn() {
        let (_, doc) = render("---\nkey: hidden\n---\nbody", 80);
        assert_eq!(all_text(&doc), vec!["body"]);
    }

    #[test]
    fn test_marks_are_styled_and_mapped() {
        let theme = Theme::default();
        let mut tree = parse_markdown(
            "first line\n\nsecond needle\n\nthird needle",
            &ContentConfig::default(),
        )
        .tree;
        let mut controller = SearchController::default();
        controller.open(&mut tree);
        controller.set_query(&mut tree, "needle", Instant::now());
        controller.flush(&mut tree, &mut ());

        let doc = render_document(&tree, &theme, 80);
        let marks = controller.state().marks();
        assert_eq!(marks.len(), 2);
        assert_eq!(doc.line_of(marks[0]), Some(2));
        assert_eq!(doc.line_of(marks[1]), Some(4));

        let current = doc.lines[2]
            .spans
            .iter()
            .find(|s| s.content == "needle")
            .unwrap();
        assert_eq!(current.style.bg, Some(theme.search_current_bg));
        let other = doc.lines[4]
            .spans
            .iter()
            .find(|s| s.content == "needle")
            .unwrap();
        assert_eq!(other.style.bg, Some(theme.search_match_bg));
        // Rendered text is unchanged by highlighting
        assert_eq!(text(&doc.lines[2]), "second needle");
    }

    #[test]
    fn test_find_bar_placeholder_then_value() {
        let theme = Theme::default();
        let mut tree = DocTree::new();
        assert!(text(&find_bar_line(&tree, &theme)).is_empty());
        tree.show_search_panel(true);
        assert!(text(&find_bar_line(&tree, &theme)).contains(crate::tree::SEARCH_PLACEHOLDER));
        tree.set_search_input("abc");
        let line = text(&find_bar_line(&tree, &theme));
        assert!(!line.contains(crate::tree::SEARCH_PLACEHOLDER));
        assert!(line.ends_with("abc"));
    }

    #[test]
    fn test_list_and_table() {
        let (_, doc) = render("- one\n- [x] done\n\n| a | bb |\n|---|---|\n| 1 | 2 |\n", 80);
        let lines = all_text(&doc);
        assert!(lines.contains(&"• one".to_string()));
        assert!(lines.contains(&"• [x] done".to_string()));
        assert!(lines.contains(&"a │ bb".to_string()));
        assert!(lines.contains(&"1 │ 2 ".to_string()));
    }
}
