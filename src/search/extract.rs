//! Visible text unit discovery.

use super::tree::TextTree;

/// The subtree to search and the find bar to leave out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchScope<N> {
    pub root: N,
    pub exclude: Option<N>,
}

impl<N> SearchScope<N> {
    pub fn new(root: N) -> Self {
        Self {
            root,
            exclude: None,
        }
    }

    pub fn excluding(mut self, node: N) -> Self {
        self.exclude = Some(node);
        self
    }
}

/// Text units under `scope.root` that a reader can actually see, in
/// document order.
///
/// The iterator is lazy and borrows the tree; call again to restart.
pub fn text_units<T: TextTree>(
    tree: &T,
    scope: SearchScope<T::Node>,
) -> impl Iterator<Item = T::Node> + '_ {
    tree.descendants(scope.root)
        .filter(move |&node| tree.text(node).is_some() && is_searchable(tree, node, scope.exclude))
}

fn is_searchable<T: TextTree>(tree: &T, unit: T::Node, exclude: Option<T::Node>) -> bool {
    let Some(nearest) = tree.parent(unit) else {
        return false;
    };
    if !tree.is_renderable(nearest) {
        return false;
    }
    if !tree.computed_visibility(nearest).is_visible() {
        return false;
    }

    let mut ancestor = Some(nearest);
    while let Some(node) = ancestor {
        if Some(node) == exclude || tree.has_hidden_attr(node) {
            return false;
        }
        ancestor = tree.parent(node);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Display, DocTree, ElementKind, SEARCH_PLACEHOLDER, Visibility};

    fn collect(tree: &DocTree) -> Vec<String> {
        let scope = SearchScope::new(tree.root()).excluding(tree.search_panel());
        text_units(tree, scope)
            .map(|n| tree.text(n).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_document_order() {
        let mut tree = DocTree::new();
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "first ");
        let strong = tree.append_element(p, ElementKind::Strong);
        tree.append_text(strong, "second");
        tree.append_text(p, " third");
        assert_eq!(collect(&tree), vec!["first ", "second", " third"]);
    }

    #[test]
    fn test_excludes_search_panel_even_when_open() {
        let mut tree = DocTree::new();
        tree.show_search_panel(true);
        tree.set_search_input("needle");
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "haystack");

        let units = collect(&tree);
        assert_eq!(units, vec!["haystack"]);
        assert!(!units.iter().any(|u| u.contains(SEARCH_PLACEHOLDER)));
    }

    #[test]
    fn test_excludes_metadata() {
        let mut tree = DocTree::new();
        let meta = tree.append_element(tree.body(), ElementKind::Metadata);
        tree.append_text(meta, "title: hidden");
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "shown");
        assert_eq!(collect(&tree), vec!["shown"]);
    }

    #[test]
    fn test_excludes_hidden_ancestor() {
        let mut tree = DocTree::new();
        let details = tree.append_element(tree.body(), ElementKind::Details);
        let summary = tree.append_element(details, ElementKind::Summary);
        tree.append_text(summary, "summary");
        let body = tree.append_element(details, ElementKind::Paragraph);
        let em = tree.append_element(body, ElementKind::Emphasis);
        tree.append_text(em, "deep");
        tree.set_hidden(body, true);

        assert_eq!(collect(&tree), vec!["summary"]);
        tree.set_hidden(body, false);
        assert_eq!(collect(&tree), vec!["summary", "deep"]);
    }

    #[test]
    fn test_excludes_display_none() {
        let mut tree = DocTree::new();
        let folded = tree.append_element(tree.body(), ElementKind::SectionBody);
        let p = tree.append_element(folded, ElementKind::Paragraph);
        tree.append_text(p, "folded away");
        tree.set_display(folded, Display::None);
        assert!(collect(&tree).is_empty());
    }

    #[test]
    fn test_excludes_visibility_hidden() {
        let mut tree = DocTree::new();
        let quote = tree.append_element(tree.body(), ElementKind::Blockquote);
        let inner = tree.append_element(quote, ElementKind::Paragraph);
        tree.append_text(inner, "quoted");
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "plain");

        tree.element_mut(quote).unwrap().visibility = Some(Visibility::Hidden);
        assert_eq!(collect(&tree), vec!["plain"]);

        tree.element_mut(inner).unwrap().visibility = Some(Visibility::Visible);
        assert_eq!(collect(&tree), vec!["quoted", "plain"]);
    }

    #[test]
    fn test_restartable() {
        let mut tree = DocTree::new();
        let p = tree.append_element(tree.body(), ElementKind::Paragraph);
        tree.append_text(p, "again");
        let scope = SearchScope::new(tree.root());
        assert_eq!(text_units(&tree, scope).count(), 1);
        assert_eq!(text_units(&tree, scope).count(), 1);
    }
}
