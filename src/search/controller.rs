//! Find bar lifecycle and the search pipeline.

use super::apply::{Fragment, apply_all};
use super::debounce::Debouncer;
use super::extract::{SearchScope, text_units};
use super::matcher::Matcher;
use super::navigate;
use super::remove::remove_highlights;
use super::state::{Highlight, SearchState};
use super::tree::{ScrollIntoView, SearchSurface, TextTree};
use std::time::{Duration, Instant};

/// Default pause after the last keystroke before the query is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Default limit on query length, in characters.
pub const DEFAULT_MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    /// Open with nothing to search for.
    OpenEmpty,
    /// The query changed and the debounce timer is pending.
    Searching,
    /// Highlights reflect the current query.
    Settled,
}

impl Phase {
    pub fn is_open(self) -> bool {
        self != Phase::Closed
    }
}

/// The find bar's text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    pub text: String,
    pub focused: bool,
    /// Whole text selected; the next edit replaces it.
    pub selected: bool,
}

/// Clear stale highlights, then find and mark every occurrence of `query`
/// under `scope`, then make the first one current.
///
/// Runs synchronously. Returns the number of highlights.
pub fn run_search<T, S>(
    tree: &mut T,
    scope: SearchScope<T::Node>,
    query: &str,
    state: &mut SearchState<T::Node>,
    scroller: &mut S,
) -> usize
where
    T: TextTree,
    S: ScrollIntoView<T::Node> + ?Sized,
{
    remove_highlights(tree, &state.marks());
    state.clear_highlights();
    state.query = query.to_string();

    let Some(matcher) = Matcher::new(query) else {
        return 0;
    };

    let groups: Vec<_> = text_units(tree, scope)
        .filter_map(|unit| {
            let ranges = matcher.scan(unit, tree.text(unit)?);
            (!ranges.is_empty()).then_some((unit, ranges))
        })
        .collect();

    for applied in apply_all(tree, groups) {
        let mut offset = 0;
        for fragment in &applied.fragments {
            let len = tree.text_content(fragment.node()).len();
            if let Fragment::Highlight(mark) = *fragment {
                state.highlights.push(Highlight {
                    mark,
                    unit: applied.unit,
                    start: offset,
                    end: offset + len,
                });
            }
            offset += len;
        }
    }

    tracing::debug!(query, matches = state.highlights.len(), "search settled");
    navigate::go_to_match(state, tree, scroller, 1);
    state.highlights.len()
}

/// Drives the find bar: open/close, query editing, debounced commits and
/// match navigation.
#[derive(Debug, Clone)]
pub struct SearchController<N> {
    phase: Phase,
    input: QueryInput,
    state: SearchState<N>,
    debounce: Debouncer,
    max_query_len: usize,
}

impl<N: Copy> Default for SearchController<N> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_MAX_QUERY_LEN)
    }
}

impl<N: Copy> SearchController<N> {
    pub fn new(debounce: Duration, max_query_len: usize) -> Self {
        Self {
            phase: Phase::Closed,
            input: QueryInput::default(),
            state: SearchState::default(),
            debounce: Debouncer::new(debounce),
            max_query_len: max_query_len.max(1),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    pub fn query(&self) -> &str {
        &self.input.text
    }

    pub fn state(&self) -> &SearchState<N> {
        &self.state
    }

    /// How long the event loop may block before [`Self::tick`] has work.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until(now)
    }

    /// Open the find bar, or re-focus and re-select it if already open.
    pub fn open<T: SearchSurface<Node = N>>(&mut self, tree: &mut T) {
        if self.phase == Phase::Closed {
            self.phase = Phase::OpenEmpty;
            tree.show_find_bar(true);
            tree.set_find_value(&self.input.text);
        }
        self.input.focused = true;
        self.input.selected = !self.input.text.is_empty();
    }

    /// Close the find bar and restore the tree. A pending commit is dropped.
    pub fn close<T: SearchSurface<Node = N>>(&mut self, tree: &mut T) {
        if self.phase == Phase::Closed {
            return;
        }
        self.debounce.cancel();
        remove_highlights(tree, &self.state.marks());
        self.state.reset();
        self.input = QueryInput::default();
        tree.set_find_value("");
        tree.show_find_bar(false);
        self.phase = Phase::Closed;
    }

    /// Type one character. Replaces the selection if there is one.
    pub fn insert_char<T: SearchSurface<Node = N>>(
        &mut self,
        tree: &mut T,
        c: char,
        now: Instant,
    ) -> bool {
        if !self.is_open() || c.is_control() {
            return false;
        }
        let replaced = self.input.selected && !self.input.text.is_empty();
        if self.input.selected {
            self.input.text.clear();
            self.input.selected = false;
        }
        if self.input.text.chars().count() >= self.max_query_len {
            if replaced {
                self.query_changed(tree, now);
            }
            return replaced;
        }
        self.input.text.push(c);
        self.query_changed(tree, now);
        true
    }

    pub fn backspace<T: SearchSurface<Node = N>>(&mut self, tree: &mut T, now: Instant) -> bool {
        if !self.is_open() {
            return false;
        }
        let changed = if self.input.selected {
            self.input.selected = false;
            let had_text = !self.input.text.is_empty();
            self.input.text.clear();
            had_text
        } else {
            self.input.text.pop().is_some()
        };
        if changed {
            self.query_changed(tree, now);
        }
        changed
    }

    pub fn clear_query<T: SearchSurface<Node = N>>(
        &mut self,
        tree: &mut T,
        now: Instant,
    ) -> bool {
        if !self.is_open() || self.input.text.is_empty() {
            return false;
        }
        self.input.text.clear();
        self.input.selected = false;
        self.query_changed(tree, now);
        true
    }

    /// Replace the whole query, truncated to the length limit.
    pub fn set_query<T: SearchSurface<Node = N>>(
        &mut self,
        tree: &mut T,
        query: &str,
        now: Instant,
    ) {
        if !self.is_open() {
            return;
        }
        self.input.text = query.chars().take(self.max_query_len).collect();
        self.input.selected = false;
        self.query_changed(tree, now);
    }

    fn query_changed<T: SearchSurface<Node = N>>(&mut self, tree: &mut T, now: Instant) {
        tree.set_find_value(&self.input.text);
        self.debounce.arm(now);
        self.phase = Phase::Searching;
    }

    /// Commit the query if the debounce deadline has passed. Returns true
    /// when the pipeline ran.
    pub fn tick<T, S>(&mut self, tree: &mut T, scroller: &mut S, now: Instant) -> bool
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        if self.phase != Phase::Searching || !self.debounce.fire_if_due(now) {
            return false;
        }
        self.commit(tree, scroller);
        true
    }

    /// Commit a pending query right away.
    pub fn flush<T, S>(&mut self, tree: &mut T, scroller: &mut S) -> bool
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        if self.phase != Phase::Searching {
            return false;
        }
        self.debounce.cancel();
        self.commit(tree, scroller);
        true
    }

    fn commit<T, S>(&mut self, tree: &mut T, scroller: &mut S)
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        let scope = tree.search_scope();
        run_search(tree, scope, &self.input.text, &mut self.state, scroller);
        self.phase = if self.input.text.is_empty() {
            Phase::OpenEmpty
        } else {
            Phase::Settled
        };
    }

    /// Move to the next match. Ignored until the query has settled.
    pub fn advance<T, S>(&mut self, tree: &mut T, scroller: &mut S) -> bool
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        self.phase == Phase::Settled && navigate::next(&mut self.state, tree, scroller)
    }

    /// Move to the previous match. Ignored until the query has settled.
    pub fn retreat<T, S>(&mut self, tree: &mut T, scroller: &mut S) -> bool
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        self.phase == Phase::Settled && navigate::prev(&mut self.state, tree, scroller)
    }

    /// Re-run the settled query on the same tree after its visibility
    /// changed. The current index is kept when it still exists.
    pub fn refresh<T, S>(&mut self, tree: &mut T, scroller: &mut S)
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        if self.phase != Phase::Settled {
            return;
        }
        let previous = self.state.current_index;
        self.commit(tree, scroller);
        if previous > 1 {
            navigate::go_to_match(&mut self.state, tree, scroller, previous);
        }
    }

    /// Search a freshly built tree again after the previous one was
    /// replaced. Handles into the old tree are dropped without touching it.
    pub fn rerun<T, S>(&mut self, tree: &mut T, scroller: &mut S)
    where
        T: SearchSurface<Node = N>,
        S: ScrollIntoView<N> + ?Sized,
    {
        let previous = self.state.current_index;
        self.state.clear_highlights();
        if !self.is_open() {
            return;
        }
        tree.show_find_bar(true);
        tree.set_find_value(&self.input.text);
        if self.phase == Phase::Settled {
            self.commit(tree, scroller);
            if previous > 1 {
                navigate::go_to_match(&mut self.state, tree, scroller, previous);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DocTree, ElementKind, SEARCH_PLACEHOLDER};
    use indextree::NodeId;

    fn doc(paragraphs: &[&str]) -> DocTree {
        let mut tree = DocTree::new();
        for text in paragraphs {
            let p = tree.append_element(tree.body(), ElementKind::Paragraph);
            tree.append_text(p, text);
        }
        tree
    }

    fn type_query(
        controller: &mut SearchController<NodeId>,
        tree: &mut DocTree,
        query: &str,
        now: Instant,
    ) {
        for c in query.chars() {
            controller.insert_char(tree, c, now);
        }
    }

    fn settle(controller: &mut SearchController<NodeId>, tree: &mut DocTree, now: Instant) {
        assert!(controller.tick(tree, &mut (), now + DEFAULT_DEBOUNCE));
    }

    #[test]
    fn test_stock_scenario() {
        let mut tree = doc(&[
            "Stock prices and stock splits",
            "Nothing relevant",
            "The STOCK closed higher",
        ]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        assert_eq!(c.phase(), Phase::OpenEmpty);
        type_query(&mut c, &mut tree, "stock", t0);
        assert_eq!(c.phase(), Phase::Searching);
        settle(&mut c, &mut tree, t0);

        assert_eq!(c.phase(), Phase::Settled);
        assert_eq!(c.state().match_count(), 3);
        assert_eq!(c.state().current_index, 1);
        assert_eq!(c.state().indicator().as_deref(), Some("1/3"));

        for _ in 0..3 {
            assert!(c.advance(&mut tree, &mut ()));
        }
        assert_eq!(c.state().current_index, 1);
        assert!(c.retreat(&mut tree, &mut ()));
        assert_eq!(c.state().current_index, 3);
    }

    #[test]
    fn test_highlights_carry_original_offsets() {
        let mut tree = doc(&["ab ab"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "ab", t0);
        settle(&mut c, &mut tree, t0);
        let spans: Vec<(usize, usize)> = c
            .state()
            .highlights
            .iter()
            .map(|h| (h.start, h.end))
            .collect();
        assert_eq!(spans, vec![(0, 2), (3, 5)]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let mut tree = doc(&["axb", "a.b"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "a.b", t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 1);
        assert_eq!(tree.text_of(c.state().highlights[0].mark), "a.b");
    }

    #[test]
    fn test_find_bar_never_matches_itself() {
        let mut tree = doc(&["plain body"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "search this", t0);
        settle(&mut c, &mut tree, t0);
        assert!(tree.text_of(tree.search_panel()).contains(SEARCH_PLACEHOLDER));
        assert_eq!(c.state().match_count(), 0);
        assert_eq!(c.state().indicator().as_deref(), Some("no matches"));

        c.clear_query(&mut tree, t0);
        type_query(&mut c, &mut tree, "find", t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 0);
    }

    #[test]
    fn test_debounce_rearms_on_each_keystroke() {
        let mut tree = doc(&["alpha beta"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        c.insert_char(&mut tree, 'a', t0);
        let t1 = t0 + Duration::from_millis(100);
        c.insert_char(&mut tree, 'l', t1);
        assert!(!c.tick(&mut tree, &mut (), t0 + DEFAULT_DEBOUNCE));
        assert_eq!(c.phase(), Phase::Searching);
        assert!(c.tick(&mut tree, &mut (), t1 + DEFAULT_DEBOUNCE));
        assert_eq!(c.state().query, "al");
        assert_eq!(c.state().match_count(), 1);
    }

    #[test]
    fn test_close_cancels_pending_and_restores() {
        let mut tree = doc(&["one two one"]);
        let before = tree.dump(tree.body());
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "one", t0);
        settle(&mut c, &mut tree, t0);
        assert_ne!(tree.dump(tree.body()), before);

        c.insert_char(&mut tree, 'x', t0);
        c.close(&mut tree);
        assert_eq!(c.phase(), Phase::Closed);
        assert!(!c.tick(&mut tree, &mut (), t0 + DEFAULT_DEBOUNCE * 10));
        assert_eq!(tree.dump(tree.body()), before);
        assert!(c.query().is_empty());
        assert_eq!(c.state().match_count(), 0);
    }

    #[test]
    fn test_empty_query_settles_open_empty() {
        let mut tree = doc(&["text"]);
        let before = tree.dump(tree.body());
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "t", t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 2);

        c.backspace(&mut tree, t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.phase(), Phase::OpenEmpty);
        assert_eq!(c.state().indicator(), None);
        assert_eq!(tree.dump(tree.body()), before);
    }

    #[test]
    fn test_navigation_ignored_unless_settled() {
        let mut tree = doc(&["x x"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        assert!(!c.advance(&mut tree, &mut ()));
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "x", t0);
        settle(&mut c, &mut tree, t0);
        c.insert_char(&mut tree, 'y', t0);
        assert!(!c.advance(&mut tree, &mut ()));
        assert!(!c.retreat(&mut tree, &mut ()));
    }

    #[test]
    fn test_reopen_selects_query() {
        let mut tree = doc(&["abc"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "ab", t0);
        settle(&mut c, &mut tree, t0);
        c.open(&mut tree);
        assert_eq!(c.phase(), Phase::Settled);
        assert!(c.input().selected && c.input().focused);

        c.insert_char(&mut tree, 'c', t0);
        assert_eq!(c.query(), "c");
    }

    #[test]
    fn test_max_query_len() {
        let mut tree = doc(&["abc"]);
        let mut c = SearchController::new(DEFAULT_DEBOUNCE, 3);
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "abcd", t0);
        assert_eq!(c.query(), "abc");
        c.set_query(&mut tree, "wxyz", t0);
        assert_eq!(c.query(), "wxy");
    }

    #[test]
    fn test_zero_query_len_still_replaces_selection() {
        let mut tree = doc(&["ab ba"]);
        let mut c = SearchController::new(DEFAULT_DEBOUNCE, 0);
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "ab", t0);
        assert_eq!(c.query(), "a");
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 2);

        c.open(&mut tree);
        assert!(c.insert_char(&mut tree, 'b', t0));
        assert_eq!(c.query(), "b");
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 2);
        assert_eq!(tree.marks_under(tree.root()).len(), 2);
    }

    #[test]
    fn test_hidden_content_is_not_matched() {
        let mut tree = doc(&["visible word"]);
        let details = tree.append_element(tree.body(), ElementKind::Details);
        let summary = tree.append_element(details, ElementKind::Summary);
        tree.append_text(summary, "summary");
        let body = tree.append_element(details, ElementKind::Paragraph);
        tree.append_text(body, "hidden word");
        tree.set_hidden(body, true);

        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "word", t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 1);
    }

    #[test]
    fn test_rerun_on_new_tree() {
        let mut tree = doc(&["a a a"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "a", t0);
        settle(&mut c, &mut tree, t0);
        c.advance(&mut tree, &mut ());

        let mut fresh = doc(&["a a a a"]);
        c.rerun(&mut fresh, &mut ());
        assert_eq!(c.state().match_count(), 4);
        assert_eq!(c.state().current_index, 2);
        assert_eq!(fresh.marks_under(fresh.root()).len(), 4);
    }

    #[test]
    fn test_refresh_after_hiding() {
        let mut tree = doc(&["a a", "a"]);
        let mut c = SearchController::default();
        let t0 = Instant::now();
        c.open(&mut tree);
        type_query(&mut c, &mut tree, "a", t0);
        settle(&mut c, &mut tree, t0);
        assert_eq!(c.state().match_count(), 3);
        c.advance(&mut tree, &mut ());

        let second = tree.children(tree.body()).nth(1).unwrap();
        tree.set_hidden(second, true);
        c.refresh(&mut tree, &mut ());
        assert_eq!(c.state().match_count(), 2);
        assert_eq!(c.state().current_index, 2);
        assert_eq!(tree.marks_under(tree.root()).len(), 2);
        assert_eq!(tree.text_of(tree.body()), "a aa");
    }
}
