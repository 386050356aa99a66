//! [`TextTree`] adapter over the document arena.

use super::{DocTree, Display, Element, ElementKind, NodeData, Visibility};
use crate::search::{
    ComputedVisibility, SearchScope, SearchSurface, TextTree, WrapError, Wrapped,
};
use indextree::NodeId;
use std::ops::Range;

impl TextTree for DocTree {
    type Node = NodeId;

    fn descendants(&self, root: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
        Box::new(root.descendants(&self.arena).filter(|&n| self.get(n).is_some()))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(NodeData::as_text)
    }

    fn replace_text(&mut self, node: NodeId, text: &str) -> bool {
        match self.arena.get_mut(node) {
            Some(n) if !n.is_removed() => match n.get_mut() {
                NodeData::Text(existing) => {
                    existing.clear();
                    existing.push_str(text);
                    true
                }
                NodeData::Element(_) => false,
            },
            _ => false,
        }
    }

    fn is_renderable(&self, element: NodeId) -> bool {
        self.kind(element).is_some_and(ElementKind::is_renderable)
    }

    fn has_hidden_attr(&self, element: NodeId) -> bool {
        self.element(element).is_some_and(|el| el.hidden)
    }

    fn computed_visibility(&self, element: NodeId) -> ComputedVisibility {
        let mut visibility = None;
        for id in element.ancestors(&self.arena) {
            let Some(el) = self.element(id) else { continue };
            if el.display == Display::None {
                return ComputedVisibility::DisplayNone;
            }
            if visibility.is_none() {
                visibility = el.visibility;
            }
        }
        match visibility {
            Some(Visibility::Hidden) => ComputedVisibility::Hidden,
            Some(Visibility::Visible) | None => ComputedVisibility::Visible,
        }
    }

    fn wrap_range(
        &mut self,
        unit: NodeId,
        range: Range<usize>,
    ) -> Result<Wrapped<NodeId>, WrapError> {
        let text = match self.get(unit) {
            Some(NodeData::Text(text)) if self.parent_of(unit).is_some() => text.clone(),
            _ => return Err(WrapError::NotText),
        };
        let Range { start, end } = range;
        if start >= end {
            return Err(WrapError::EmptyRange { start, end });
        }
        if end > text.len() {
            return Err(WrapError::OutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(WrapError::NotCharBoundary { start, end });
        }

        let mark = self
            .arena
            .new_node(NodeData::Element(Element::new(ElementKind::Mark)));
        let inner = self.arena.new_node(NodeData::Text(text[start..end].to_string()));
        mark.append(inner, &mut self.arena);
        unit.insert_after(mark, &mut self.arena);

        let after = (end < text.len()).then(|| {
            let node = self.arena.new_node(NodeData::Text(text[end..].to_string()));
            mark.insert_after(node, &mut self.arena);
            node
        });

        let before = if start > 0 {
            *self.arena[unit].get_mut() = NodeData::Text(text[..start].to_string());
            Some(unit)
        } else {
            unit.remove(&mut self.arena);
            None
        };

        Ok(Wrapped {
            before,
            mark,
            after,
        })
    }

    fn is_mark(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(ElementKind::Mark))
    }

    fn unwrap_mark(&mut self, mark: NodeId) -> Option<NodeId> {
        if !self.is_mark(mark) {
            return None;
        }
        let parent = self.parent_of(mark)?;
        let text = self.text_of(mark);
        let plain = self.arena.new_node(NodeData::Text(text));
        mark.insert_before(plain, &mut self.arena);
        mark.remove_subtree(&mut self.arena);
        Some(parent)
    }

    fn normalize(&mut self, node: NodeId) {
        let children: Vec<NodeId> = node.children(&self.arena).collect();
        let mut run: Option<NodeId> = None;
        for child in children {
            let text = match self.get(child) {
                Some(NodeData::Text(text)) => text.clone(),
                _ => {
                    run = None;
                    continue;
                }
            };
            if text.is_empty() {
                child.remove(&mut self.arena);
                continue;
            }
            match run {
                Some(head) => {
                    if let NodeData::Text(existing) = self.arena[head].get_mut() {
                        existing.push_str(&text);
                    }
                    child.remove(&mut self.arena);
                }
                None => run = Some(child),
            }
        }
    }

    fn set_current(&mut self, mark: NodeId, current: bool) {
        if let Some(el) = self.element_mut(mark)
            && el.kind == ElementKind::Mark
        {
            el.current = current;
        }
    }

    fn is_current(&self, mark: NodeId) -> bool {
        self.element(mark)
            .is_some_and(|el| el.kind == ElementKind::Mark && el.current)
    }
}

impl SearchSurface for DocTree {
    fn search_scope(&self) -> SearchScope<NodeId> {
        SearchScope::new(self.root).excluding(self.panel.container)
    }

    fn show_find_bar(&mut self, open: bool) {
        self.show_search_panel(open);
    }

    fn set_find_value(&mut self, query: &str) {
        self.set_search_input(query);
    }
}
