use crate::search::TextTree;
use crate::tree::{DocTree, ElementKind};
use indextree::NodeId;
use serde::Serialize;

/// A heading from the flat outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    /// Byte offset of the heading line in the source.
    pub offset: usize,
}

/// A parsed markdown document: the source, its outline and the tree the
/// reader renders and searches.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub front_matter: Option<String>,
    pub headings: Vec<Heading>,
    pub tree: DocTree,
}

impl Document {
    pub fn new(
        content: String,
        front_matter: Option<String>,
        headings: Vec<Heading>,
        tree: DocTree,
    ) -> Self {
        Self {
            content,
            front_matter,
            headings,
            tree,
        }
    }

    /// Whitespace-separated words in the body text.
    pub fn word_count(&self) -> usize {
        self.tree
            .descendants(self.tree.body())
            .filter_map(|n| self.tree.text(n))
            .map(|text| text.split_whitespace().count())
            .sum()
    }

    /// Title of the innermost section containing `node`.
    pub fn section_title(&self, node: NodeId) -> Option<String> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.tree.kind(id) == Some(&ElementKind::Section) {
                let heading = self.tree.children(id).next()?;
                return Some(self.tree.text_of(heading));
            }
            current = self.tree.parent_of(id);
        }
        None
    }
}
