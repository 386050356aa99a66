//! Turning match ranges into highlight markers.

use super::matcher::MatchRange;
use super::tree::TextTree;
use std::collections::VecDeque;

/// A piece of an original text unit after highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<N> {
    Plain(N),
    Highlight(N),
}

impl<N: Copy> Fragment<N> {
    pub fn node(&self) -> N {
        match *self {
            Fragment::Plain(n) | Fragment::Highlight(n) => n,
        }
    }
}

/// The ordered fragments an original text unit was split into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedUnit<N> {
    pub unit: N,
    /// Left to right. Concatenated text equals the original unit's text.
    pub fragments: Vec<Fragment<N>>,
}

impl<N: Copy> AppliedUnit<N> {
    /// Highlight markers in document order.
    pub fn highlights(&self) -> impl Iterator<Item = N> + '_ {
        self.fragments.iter().filter_map(|f| match *f {
            Fragment::Highlight(n) => Some(n),
            Fragment::Plain(_) => None,
        })
    }
}

/// Wrap every range of one unit in a highlight marker.
///
/// Ranges are applied from the highest start offset down. Each wrap leaves
/// the text before the range in the original unit, so the offsets of the
/// ranges still to be applied stay valid without recomputation. A range
/// that cannot be wrapped is skipped and leaves its text in place.
pub fn apply_unit<T: TextTree>(
    tree: &mut T,
    unit: T::Node,
    ranges: &[MatchRange<T::Node>],
) -> AppliedUnit<T::Node> {
    let mut ordered: Vec<&MatchRange<T::Node>> = ranges.iter().filter(|r| r.unit == unit).collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut fragments = VecDeque::with_capacity(ordered.len() * 2 + 1);
    let mut current = Some(unit);

    for range in ordered {
        let Some(target) = current else {
            tracing::debug!(?range, "no text left before a previous highlight, skipping");
            continue;
        };
        match tree.wrap_range(target, range.start..range.end) {
            Ok(wrapped) => {
                if let Some(after) = wrapped.after {
                    fragments.push_front(Fragment::Plain(after));
                }
                fragments.push_front(Fragment::Highlight(wrapped.mark));
                current = wrapped.before;
            }
            Err(e) => {
                tracing::debug!(?range, error = %e, "skipping unwrappable range");
            }
        }
    }

    if let Some(rest) = current {
        fragments.push_front(Fragment::Plain(rest));
    }

    AppliedUnit {
        unit,
        fragments: fragments.into(),
    }
}

/// Apply grouped ranges unit by unit. The groups must be in document order;
/// the result keeps that order.
pub fn apply_all<T: TextTree>(
    tree: &mut T,
    groups: Vec<(T::Node, Vec<MatchRange<T::Node>>)>,
) -> Vec<AppliedUnit<T::Node>> {
    groups
        .into_iter()
        .map(|(unit, ranges)| apply_unit(tree, unit, &ranges))
        .collect()
}
