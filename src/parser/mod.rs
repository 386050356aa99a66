//! Markdown parsing and document tree construction.
//!
//! All block parsing is delegated to `turbovault-parser` for unified,
//! code-block-aware OFM (Obsidian Flavored Markdown) support. The blocks are
//! then turned into a [`DocTree`](crate::tree::DocTree) by [`builder`].

pub mod builder;
pub mod content;
mod document;
pub mod utils;

pub use builder::build_tree;
pub use document::{Document, Heading};

use crate::config::ContentConfig;
use std::path::Path;

/// Parse a markdown file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_file(path: &Path, config: &ContentConfig) -> std::io::Result<Document> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_markdown(&content, config))
}

/// Parse markdown content into a document with its outline and tree.
///
/// A leading front matter block is kept out of the outline; whether it is
/// rendered depends on `config.hide_frontmatter`.
pub fn parse_markdown(content: &str, config: &ContentConfig) -> Document {
    let (front_matter, body, body_offset, start_line) = match utils::split_front_matter(content) {
        Some(fm) => (Some(fm.raw), fm.body, content.len() - fm.body.len(), fm.lines),
        None => (None, content, 0, 0),
    };

    let headings = turbovault_parser::parse_headings(body)
        .into_iter()
        .map(|h| Heading {
            level: h.level as usize,
            text: h.text,
            offset: h.position.offset + body_offset,
        })
        .collect();

    let blocks = content::parse_content(body, start_line);
    let tree = build_tree(&blocks, front_matter, config);

    Document::new(
        content.to_string(),
        front_matter.map(str::to_string),
        headings,
        tree,
    )
}
