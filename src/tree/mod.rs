//! Arena-backed document tree.
//!
//! Every document the reader shows lives in one [`DocTree`]: a synthetic root
//! holding the find bar and the document body. The renderer draws from it and
//! the find engine mutates it in place through the
//! [`TextTree`](crate::search::TextTree) capability implemented in
//! `adapter.rs`.

mod adapter;
mod node;

pub use node::{Display, Element, ElementKind, NodeData, Visibility};

use indextree::{Arena, Node, NodeId};

/// Placeholder shown in the find bar while the query is empty.
pub const SEARCH_PLACEHOLDER: &str = "Search this document";

/// Handles into the find bar subtree.
#[derive(Debug, Clone, Copy)]
struct SearchPanel {
    container: NodeId,
    placeholder: NodeId,
    value_text: NodeId,
}

/// One heading and the content it owns, as listed in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub section: NodeId,
    pub heading: NodeId,
    pub body: NodeId,
    pub level: u8,
    pub title: String,
    pub folded: bool,
}

#[derive(Debug, Clone)]
pub struct DocTree {
    arena: Arena<NodeData>,
    root: NodeId,
    body: NodeId,
    panel: SearchPanel,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTree {
    /// An empty document with a closed find bar.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Element(Element::new(ElementKind::Root)));

        let mut container = Element::new(ElementKind::SearchPanel);
        container.display = Display::None;
        let container = arena.new_node(NodeData::Element(container));
        root.append(container, &mut arena);

        let label = arena.new_node(NodeData::Element(Element::new(ElementKind::Label)));
        container.append(label, &mut arena);
        let label_text = arena.new_node(NodeData::Text("Find: ".to_string()));
        label.append(label_text, &mut arena);

        let input = arena.new_node(NodeData::Element(Element::new(ElementKind::Input)));
        container.append(input, &mut arena);
        let placeholder = arena.new_node(NodeData::Element(Element::new(ElementKind::Placeholder)));
        input.append(placeholder, &mut arena);
        let placeholder_text = arena.new_node(NodeData::Text(SEARCH_PLACEHOLDER.to_string()));
        placeholder.append(placeholder_text, &mut arena);
        let value = arena.new_node(NodeData::Element(Element::new(ElementKind::Value)));
        input.append(value, &mut arena);
        let value_text = arena.new_node(NodeData::Text(String::new()));
        value.append(value_text, &mut arena);

        let body = arena.new_node(NodeData::Element(Element::new(ElementKind::Body)));
        root.append(body, &mut arena);

        Self {
            arena,
            root,
            body,
            panel: SearchPanel {
                container,
                placeholder,
                value_text,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Container of the document content.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Container of the find bar, excluded from search results.
    pub fn search_panel(&self) -> NodeId {
        self.panel.container
    }

    fn live(&self, node: NodeId) -> Option<&Node<NodeData>> {
        self.arena.get(node).filter(|n| !n.is_removed())
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.live(node).map(Node::get)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.get(node).and_then(NodeData::as_element)
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.arena.get_mut(node) {
            Some(n) if !n.is_removed() => match n.get_mut() {
                NodeData::Element(el) => Some(el),
                NodeData::Text(_) => None,
            },
            _ => None,
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<&ElementKind> {
        self.element(node).map(|el| &el.kind)
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(Node::parent)
    }

    pub fn append_element(&mut self, parent: NodeId, kind: ElementKind) -> NodeId {
        let node = self.arena.new_node(NodeData::Element(Element::new(kind)));
        parent.append(node, &mut self.arena);
        node
    }

    /// Append character data, extending a trailing text child instead of
    /// creating a sibling so the tree stays normalized.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        if text.is_empty() {
            return None;
        }
        if let Some(last) = self.live(parent).and_then(Node::last_child)
            && let NodeData::Text(existing) = self.arena[last].get_mut()
        {
            existing.push_str(text);
            return Some(last);
        }
        let node = self.arena.new_node(NodeData::Text(text.to_string()));
        parent.append(node, &mut self.arena);
        Some(node)
    }

    pub fn set_display(&mut self, node: NodeId, display: Display) {
        if let Some(el) = self.element_mut(node) {
            el.display = display;
        }
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(el) = self.element_mut(node) {
            el.hidden = hidden;
        }
    }

    /// Show or hide the find bar.
    pub fn show_search_panel(&mut self, open: bool) {
        let display = if open { Display::Normal } else { Display::None };
        self.set_display(self.panel.container, display);
    }

    /// Mirror the query into the find bar input; the placeholder stays laid
    /// out but is not painted while the input has a value.
    pub fn set_search_input(&mut self, query: &str) {
        if let Some(NodeData::Text(value)) = self.arena.get_mut(self.panel.value_text).map(Node::get_mut) {
            value.clear();
            value.push_str(query);
        }
        let visibility = (!query.is_empty()).then_some(Visibility::Hidden);
        if let Some(el) = self.element_mut(self.panel.placeholder) {
            el.visibility = visibility;
        }
    }

    /// Concatenated character data below `node`.
    pub fn text_of(&self, node: NodeId) -> String {
        node.descendants(&self.arena)
            .filter_map(|n| self.get(n).and_then(NodeData::as_text))
            .collect()
    }

    /// Headings in document order, for the outline.
    pub fn sections(&self) -> Vec<SectionInfo> {
        self.body
            .descendants(&self.arena)
            .filter(|&n| matches!(self.kind(n), Some(ElementKind::Section)))
            .filter_map(|section| {
                let mut children = section.children(&self.arena);
                let heading = children.next()?;
                let body = children.next()?;
                let level = match self.kind(heading)? {
                    ElementKind::Heading(level) => *level,
                    _ => return None,
                };
                let folded = self
                    .element(body)
                    .is_some_and(|el| el.display == Display::None);
                Some(SectionInfo {
                    section,
                    heading,
                    body,
                    level,
                    title: self.text_of(heading),
                    folded,
                })
            })
            .collect()
    }

    /// Fold or unfold a section's body. Returns the new folded state.
    pub fn toggle_section(&mut self, section: &SectionInfo) -> bool {
        let folded = !section.folded;
        let display = if folded { Display::None } else { Display::Normal };
        self.set_display(section.body, display);
        folded
    }

    /// Open every `<details>` body if any is closed, otherwise close them all.
    /// Returns whether the bodies are now open.
    pub fn toggle_details(&mut self) -> bool {
        let bodies: Vec<NodeId> = self
            .body
            .descendants(&self.arena)
            .filter(|&n| matches!(self.kind(n), Some(ElementKind::Details)))
            .flat_map(|d| d.children(&self.arena).skip(1).collect::<Vec<_>>())
            .collect();
        let open = bodies
            .iter()
            .any(|&b| self.element(b).is_some_and(|el| el.hidden));
        for body in bodies {
            self.set_hidden(body, !open);
        }
        open
    }

    /// Every highlight marker below `root`, found by tag.
    #[cfg(test)]
    pub(crate) fn marks_under(&self, root: NodeId) -> Vec<NodeId> {
        root.descendants(&self.arena)
            .filter(|&n| matches!(self.kind(n), Some(ElementKind::Mark)))
            .collect()
    }

    /// Compact structural dump, used to compare trees in tests.
    #[cfg(test)]
    pub(crate) fn dump(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(node, &mut out);
        out
    }

    #[cfg(test)]
    fn dump_into(&self, node: NodeId, out: &mut String) {
        match self.get(node) {
            Some(NodeData::Text(text)) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            Some(NodeData::Element(el)) => {
                out.push('(');
                out.push_str(el.kind.tag());
                for child in node.children(&self.arena) {
                    out.push(' ');
                    self.dump_into(child, out);
                }
                out.push(')');
            }
            None => {}
        }
    }
}
