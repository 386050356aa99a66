//! Search session state.

/// A tracked highlight marker and where its text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<N> {
    pub mark: N,
    /// The text unit the match was found in, before splitting.
    pub unit: N,
    pub start: usize,
    pub end: usize,
}

/// Current query, its highlights in document order, and the 1-based index of
/// the current one (0 when there are none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<N> {
    pub query: String,
    pub highlights: Vec<Highlight<N>>,
    pub current_index: usize,
}

impl<N> Default for SearchState<N> {
    fn default() -> Self {
        Self {
            query: String::new(),
            highlights: Vec::new(),
            current_index: 0,
        }
    }
}

impl<N: Copy> SearchState<N> {
    pub fn match_count(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    /// The current highlight, if any.
    pub fn current(&self) -> Option<&Highlight<N>> {
        self.current_index
            .checked_sub(1)
            .and_then(|i| self.highlights.get(i))
    }

    pub fn marks(&self) -> Vec<N> {
        self.highlights.iter().map(|h| h.mark).collect()
    }

    /// `"2/5"`, `"no matches"` for a query without results, or nothing while
    /// the query is empty.
    pub fn indicator(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else if self.highlights.is_empty() {
            Some("no matches".to_string())
        } else {
            Some(format!("{}/{}", self.current_index, self.highlights.len()))
        }
    }

    /// Forget highlights without touching the tree. The caller restores the
    /// tree first.
    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.current_index = 0;
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.clear_highlights();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(count: usize) -> SearchState<u32> {
        SearchState {
            query: "q".to_string(),
            highlights: (0..count as u32)
                .map(|i| Highlight {
                    mark: i,
                    unit: 100,
                    start: 0,
                    end: 1,
                })
                .collect(),
            current_index: usize::from(count > 0),
        }
    }

    #[test]
    fn test_indicator() {
        assert_eq!(SearchState::<u32>::default().indicator(), None);
        assert_eq!(state_with(0).indicator().as_deref(), Some("no matches"));
        assert_eq!(state_with(4).indicator().as_deref(), Some("1/4"));
    }

    #[test]
    fn test_current() {
        assert!(state_with(0).current().is_none());
        let state = state_with(3);
        assert_eq!(state.current().map(|h| h.mark), Some(0));
    }

    #[test]
    fn test_reset() {
        let mut state = state_with(2);
        state.reset();
        assert!(state.query.is_empty());
        assert_eq!(state.match_count(), 0);
        assert_eq!(state.current_index, 0);
    }
}
