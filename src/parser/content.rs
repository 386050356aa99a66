//! Block-level parsing, delegated to turbovault-parser.
//!
//! turbovault skips code blocks when it looks for OFM syntax and lifts
//! `<details><summary>` HTML into [`Block::Details`], which the builder turns
//! into a collapsible element.

pub use turbovault_parser::{ContentBlock as Block, InlineElement, ListItem};

/// Blocks of `markdown`, with line positions counted from `start_line`.
pub fn parse_content(markdown: &str, start_line: usize) -> Vec<Block> {
    turbovault_parser::parse_blocks_from_line(markdown, start_line)
}
