//! Builds the document tree from parsed markdown blocks.
//!
//! Headings open nested sections: a heading owns every following block up to
//! the next heading of the same or a higher level, which lets the outline
//! fold a section by hiding one element.

use super::content::{Block, InlineElement, ListItem};
use super::utils::parse_inline_html;
use crate::config::ContentConfig;
use crate::tree::{DocTree, ElementKind};
use indextree::NodeId;

struct TreeBuilder {
    tree: DocTree,
    /// Open sections as (heading level, body container), outermost first.
    sections: Vec<(u8, NodeId)>,
}

/// Build a [`DocTree`] from top-level blocks and an optional front matter
/// block.
pub fn build_tree(blocks: &[Block], front_matter: Option<&str>, config: &ContentConfig) -> DocTree {
    let mut builder = TreeBuilder {
        tree: DocTree::new(),
        sections: Vec::new(),
    };

    if let Some(raw) = front_matter {
        let body = builder.tree.body();
        let kind = if config.hide_frontmatter {
            ElementKind::Metadata
        } else {
            ElementKind::CodeBlock {
                language: Some("yaml".to_string()),
            }
        };
        let node = builder.tree.append_element(body, kind);
        builder.tree.append_text(node, raw);
    }

    for block in blocks {
        builder.push_top_level(block);
    }
    builder.tree
}

impl TreeBuilder {
    fn container(&self) -> NodeId {
        self.sections
            .last()
            .map(|&(_, body)| body)
            .unwrap_or_else(|| self.tree.body())
    }

    fn push_top_level(&mut self, block: &Block) {
        if let Block::Heading {
            level,
            content,
            inline,
            ..
        } = block
        {
            let level = (*level).clamp(1, 6) as u8;
            while self.sections.last().is_some_and(|&(open, _)| open >= level) {
                self.sections.pop();
            }
            let parent = self.container();
            let section = self.tree.append_element(parent, ElementKind::Section);
            let heading = self.tree.append_element(section, ElementKind::Heading(level));
            self.push_inline_or_text(heading, inline, content);
            let body = self.tree.append_element(section, ElementKind::SectionBody);
            self.sections.push((level, body));
        } else {
            let parent = self.container();
            self.push_block(parent, block);
        }
    }

    fn push_block(&mut self, parent: NodeId, block: &Block) {
        match block {
            Block::Heading {
                level,
                content,
                inline,
                ..
            } => {
                let level = (*level).clamp(1, 6) as u8;
                let heading = self.tree.append_element(parent, ElementKind::Heading(level));
                self.push_inline_or_text(heading, inline, content);
            }
            Block::Paragraph { content, inline } => {
                let p = self.tree.append_element(parent, ElementKind::Paragraph);
                self.push_inline_or_text(p, inline, content);
            }
            Block::Code {
                language, content, ..
            } => {
                let code = self.tree.append_element(
                    parent,
                    ElementKind::CodeBlock {
                        language: language.clone().filter(|l| !l.is_empty()),
                    },
                );
                self.tree.append_text(code, content);
            }
            Block::List { ordered, items } => {
                let list = self
                    .tree
                    .append_element(parent, ElementKind::List { ordered: *ordered });
                for item in items {
                    self.push_list_item(list, item);
                }
            }
            Block::Blockquote { content, blocks } => {
                let quote = self.tree.append_element(parent, ElementKind::Blockquote);
                if blocks.is_empty() {
                    let p = self.tree.append_element(quote, ElementKind::Paragraph);
                    self.tree.append_text(p, content);
                } else {
                    for nested in blocks {
                        self.push_block(quote, nested);
                    }
                }
            }
            Block::Table { headers, rows, .. } => {
                let table = self.tree.append_element(parent, ElementKind::Table);
                self.push_row(table, headers, true);
                for row in rows {
                    self.push_row(table, row, false);
                }
            }
            Block::Image { alt, .. } => {
                let image = self.tree.append_element(parent, ElementKind::Image);
                self.tree.append_text(image, alt);
            }
            Block::Details {
                summary, blocks, ..
            } => {
                let details = self.tree.append_element(parent, ElementKind::Details);
                let summary_node = self.tree.append_element(details, ElementKind::Summary);
                let inline = parse_inline_html(summary);
                self.push_inline(summary_node, &inline);
                // Collapsed until the reader expands it
                for nested in blocks {
                    let before = self.tree.children(details).count();
                    self.push_block(details, nested);
                    let added: Vec<NodeId> = self.tree.children(details).skip(before).collect();
                    for node in added {
                        self.tree.set_hidden(node, true);
                    }
                }
            }
            Block::HorizontalRule => {
                self.tree.append_element(parent, ElementKind::Rule);
            }
        }
    }

    fn push_list_item(&mut self, list: NodeId, item: &ListItem) {
        let node = self.tree.append_element(
            list,
            ElementKind::ListItem {
                checked: item.checked,
            },
        );
        if !item.inline.is_empty() || !item.content.is_empty() {
            let p = self.tree.append_element(node, ElementKind::Paragraph);
            let first_line = item.content.lines().next().unwrap_or_default();
            let text = if item.blocks.is_empty() {
                item.content.as_str()
            } else {
                first_line
            };
            self.push_inline_or_text(p, &item.inline, text);
        }
        for nested in &item.blocks {
            self.push_block(node, nested);
        }
    }

    fn push_row(&mut self, table: NodeId, cells: &[String], header: bool) {
        let row = self
            .tree
            .append_element(table, ElementKind::TableRow { header });
        for cell in cells {
            let node = self.tree.append_element(row, ElementKind::TableCell);
            self.tree.append_text(node, cell);
        }
    }

    fn push_inline_or_text(&mut self, parent: NodeId, inline: &[InlineElement], text: &str) {
        if inline.is_empty() {
            self.tree.append_text(parent, text);
        } else {
            self.push_inline(parent, inline);
        }
    }

    fn push_inline(&mut self, parent: NodeId, inline: &[InlineElement]) {
        for element in inline {
            let (kind, value) = match element {
                InlineElement::Text { value } => {
                    self.tree.append_text(parent, value);
                    continue;
                }
                InlineElement::Strong { value } => (ElementKind::Strong, value),
                InlineElement::Emphasis { value } => (ElementKind::Emphasis, value),
                InlineElement::Code { value } => (ElementKind::InlineCode, value),
                InlineElement::Strikethrough { value } => (ElementKind::Strikethrough, value),
                InlineElement::Link { text, url, .. } => {
                    (ElementKind::Link { url: url.clone() }, text)
                }
                InlineElement::Image { alt, .. } => (ElementKind::Image, alt),
            };
            let node = self.tree.append_element(parent, kind);
            self.tree.append_text(node, value);
        }
    }
}
