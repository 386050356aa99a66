//! Capability interfaces the find engine needs from its host.
//!
//! The engine never touches a concrete tree type. Anything that can walk its
//! nodes in document order, expose text, and split a text node around a byte
//! range can be searched and highlighted. [`crate::tree::DocTree`] is the
//! adapter used by the reader.

use super::error::WrapError;
use super::extract::SearchScope;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

/// How an element is currently presented, after inheritance is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedVisibility {
    /// Rendered normally.
    Visible,
    /// The element or one of its ancestors is `display: none`.
    DisplayNone,
    /// The element inherits `visibility: hidden`: laid out but not painted.
    Hidden,
}

impl ComputedVisibility {
    pub fn is_visible(self) -> bool {
        self == ComputedVisibility::Visible
    }
}

/// Result of wrapping one byte range of a text unit in a highlight marker.
///
/// `before` reuses the original unit's handle when the range does not start
/// at offset zero, so ranges that lie entirely before the wrapped span keep
/// addressing valid offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapped<N> {
    pub before: Option<N>,
    pub mark: N,
    pub after: Option<N>,
}

/// Read/write access to a tree of text-bearing nodes.
pub trait TextTree {
    /// Stable handle to a node.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// `root` and all of its descendants, in document order.
    fn descendants(&self, root: Self::Node) -> Box<dyn Iterator<Item = Self::Node> + '_>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Character data of a text node, `None` for elements.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Concatenated character data of `node` and everything below it.
    fn text_content(&self, node: Self::Node) -> String {
        self.descendants(node)
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Replace the character data of a text node. Returns false for elements.
    fn replace_text(&mut self, node: Self::Node, text: &str) -> bool;

    /// Whether the element's category is ever rendered (false for metadata,
    /// scripts and other non-visual carriers).
    fn is_renderable(&self, element: Self::Node) -> bool;

    /// Whether the element itself carries an explicit `hidden` attribute.
    fn has_hidden_attr(&self, element: Self::Node) -> bool;

    fn computed_visibility(&self, element: Self::Node) -> ComputedVisibility;

    /// Split the text unit around `range` and wrap the middle in a marker.
    fn wrap_range(
        &mut self,
        unit: Self::Node,
        range: Range<usize>,
    ) -> Result<Wrapped<Self::Node>, WrapError>;

    /// Whether `node` is a highlight marker.
    fn is_mark(&self, node: Self::Node) -> bool;

    /// Replace a marker with a plain text node holding its text.
    /// Returns the marker's parent, or `None` if `mark` is not a live marker.
    fn unwrap_mark(&mut self, mark: Self::Node) -> Option<Self::Node>;

    /// Merge adjacent text children of `node` and drop empty ones.
    fn normalize(&mut self, node: Self::Node);

    fn set_current(&mut self, mark: Self::Node, current: bool);

    fn is_current(&self, mark: Self::Node) -> bool;
}

/// Where the target should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    Instant,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOptions {
    pub block: ScrollBlock,
    pub behavior: ScrollBehavior,
}

/// Host primitive that brings a node into view.
pub trait ScrollIntoView<N> {
    fn scroll_into_view(&mut self, node: N, options: ScrollOptions);
}

/// Headless hosts have nothing to scroll.
impl<N> ScrollIntoView<N> for () {
    fn scroll_into_view(&mut self, _node: N, _options: ScrollOptions) {}
}

/// A searchable tree that also hosts its own find bar.
///
/// The controller keeps the bar's visibility and value in sync with its
/// state, and searches [`SearchSurface::search_scope`], which must leave the
/// bar itself out.
pub trait SearchSurface: TextTree {
    fn search_scope(&self) -> SearchScope<Self::Node>;

    fn show_find_bar(&mut self, open: bool);

    fn set_find_value(&mut self, query: &str);
}
