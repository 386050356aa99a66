//! Moving between highlights.

use super::state::SearchState;
use super::tree::{ScrollIntoView, ScrollOptions, TextTree};

/// Make highlight `index` (1-based) current and bring it into view.
/// Out-of-range indices are ignored. Returns whether anything changed.
pub fn go_to_match<T, S>(
    state: &mut SearchState<T::Node>,
    tree: &mut T,
    scroller: &mut S,
    index: usize,
) -> bool
where
    T: TextTree,
    S: ScrollIntoView<T::Node> + ?Sized,
{
    if index == 0 || index > state.highlights.len() {
        return false;
    }
    for h in &state.highlights {
        tree.set_current(h.mark, false);
    }
    let target = state.highlights[index - 1].mark;
    tree.set_current(target, true);
    state.current_index = index;
    tracing::trace!(index, count = state.highlights.len(), "current match");
    scroller.scroll_into_view(target, ScrollOptions::default());
    true
}

/// Advance to the next highlight, wrapping from the last to the first.
pub fn next<T, S>(state: &mut SearchState<T::Node>, tree: &mut T, scroller: &mut S) -> bool
where
    T: TextTree,
    S: ScrollIntoView<T::Node> + ?Sized,
{
    let len = state.highlights.len();
    if len == 0 {
        return false;
    }
    let target = if state.current_index >= len {
        1
    } else {
        state.current_index + 1
    };
    go_to_match(state, tree, scroller, target)
}

/// Step back to the previous highlight, wrapping from the first to the last.
pub fn prev<T, S>(state: &mut SearchState<T::Node>, tree: &mut T, scroller: &mut S) -> bool
where
    T: TextTree,
    S: ScrollIntoView<T::Node> + ?Sized,
{
    let len = state.highlights.len();
    if len == 0 {
        return false;
    }
    let target = if state.current_index <= 1 {
        len
    } else {
        state.current_index - 1
    };
    go_to_match(state, tree, scroller, target)
}
