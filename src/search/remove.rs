//! Undoing highlights.

use super::tree::TextTree;

/// Unwrap every tracked marker and re-merge the text around it.
///
/// Handles that are no longer live markers are ignored, so calling this
/// twice, or with an empty slice, changes nothing.
pub fn remove_highlights<T: TextTree>(tree: &mut T, marks: &[T::Node]) {
    let mut parents: Vec<T::Node> = Vec::new();
    for &mark in marks {
        if let Some(parent) = tree.unwrap_mark(mark)
            && !parents.contains(&parent)
        {
            parents.push(parent);
        }
    }
    for parent in parents {
        tree.normalize(parent);
    }
}

/// Unwrap every marker under `root`, whether or not anything tracked it.
/// Returns how many were removed.
pub fn purge_markers<T: TextTree>(tree: &mut T, root: T::Node) -> usize {
    let marks: Vec<T::Node> = tree.descendants(root).filter(|&n| tree.is_mark(n)).collect();
    let count = marks.len();
    if count > 0 {
        tracing::debug!(count, "purging untracked highlight markers");
        remove_highlights(tree, &marks);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::apply::apply_unit;
    use crate::search::matcher::Matcher;
    use crate::tree::{DocTree, ElementKind};
    use indextree::NodeId;

    fn highlight_all(tree: &mut DocTree, query: &str) -> Vec<NodeId> {
        let matcher = Matcher::new(query).unwrap();
        let units: Vec<(NodeId, String)> = tree
            .descendants(tree.body())
            .filter_map(|n| tree.text(n).map(|t| (n, t.to_string())))
            .collect();
        let mut marks = Vec::new();
        for (unit, text) in units {
            let ranges = matcher.scan(unit, &text);
            marks.extend(apply_unit(tree, unit, &ranges).highlights());
        }
        marks
    }

    fn sample() -> DocTree {
        let mut tree = DocTree::new();
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "Stock up on stock. ");
        let strong = tree.append_element(p, ElementKind::Strong);
        tree.append_text(strong, "stocky");
        tree.append_text(p, " tail");
        let q = tree.append_element(tree.body(), ElementKind::Blockquote);
        tree.append_text(q, "nothing here");
        tree
    }

    #[test]
    fn test_restore_is_exact() {
        let mut tree = sample();
        let before = tree.dump(tree.body());
        let marks = highlight_all(&mut tree, "stock");
        assert_eq!(marks.len(), 3);
        assert_ne!(tree.dump(tree.body()), before);

        remove_highlights(&mut tree, &marks);
        assert_eq!(tree.dump(tree.body()), before);
    }

    #[test]
    fn test_repeated_search_and_clear() {
        let mut tree = sample();
        let before = tree.dump(tree.body());
        for query in ["s", "stock", "o", "tail", "zzz", "st"] {
            let marks = highlight_all(&mut tree, query);
            remove_highlights(&mut tree, &marks);
            remove_highlights(&mut tree, &marks);
            assert_eq!(tree.dump(tree.body()), before, "query {:?}", query);
        }
    }

    #[test]
    fn test_clear_without_highlights_is_noop() {
        let mut tree = sample();
        let before = tree.dump(tree.body());
        let root = tree.root();
        remove_highlights(&mut tree, &[]);
        assert_eq!(purge_markers(&mut tree, root), 0);
        assert_eq!(tree.dump(tree.body()), before);
    }

    #[test]
    fn test_purge_untracked_markers() {
        let mut tree = sample();
        let before = tree.dump(tree.body());
        let marks = highlight_all(&mut tree, "o");
        let root = tree.root();
        assert_eq!(purge_markers(&mut tree, root), marks.len());
        assert_eq!(tree.dump(tree.body()), before);
        assert!(tree.marks_under(tree.root()).is_empty());
    }
}
