//! Literal, case-insensitive occurrence scanning.

use regex::{Regex, RegexBuilder};

/// One occurrence of the query inside a text unit, as a half-open byte range
/// into the unit's content at discovery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange<N> {
    pub unit: N,
    pub start: usize,
    pub end: usize,
}

impl<N> MatchRange<N> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Compiled query. The query text is always escaped, so any input is a
/// valid literal.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// `None` for an empty query, which matches nothing.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                // Only reachable for queries beyond the compiled size limit.
                tracing::warn!("query could not be compiled: {}", e);
                None
            }
        }
    }

    /// All non-overlapping occurrences in `text`, left to right.
    pub fn scan<N: Copy>(&self, unit: N, text: &str) -> Vec<MatchRange<N>> {
        self.regex
            .find_iter(text)
            .map(|m| MatchRange {
                unit,
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(query: &str, text: &str) -> Vec<(usize, usize)> {
        Matcher::new(query)
            .map(|m| m.scan((), text).iter().map(|r| (r.start, r.end)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_query_has_no_matcher() {
        assert!(Matcher::new("").is_none());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(offsets("AAPL", "aapl Aapl AAPL"), vec![(0, 4), (5, 9), (10, 14)]);
        assert_eq!(offsets("aapl", "AAPL"), vec![(0, 4)]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        assert_eq!(offsets("a.b", "axb a.b"), vec![(4, 7)]);
        assert_eq!(offsets("(x)*", "(x)* xx"), vec![(0, 4)]);
        assert!(offsets("[", "no bracket").is_empty());
        assert_eq!(offsets("$5", "cost $5"), vec![(5, 7)]);
    }

    #[test]
    fn test_overlaps_resolve_left_to_right() {
        assert_eq!(offsets("aa", "aaaa"), vec![(0, 2), (2, 4)]);
        assert_eq!(offsets("aa", "aaa"), vec![(0, 2)]);
        assert_eq!(offsets("aba", "ababa"), vec![(0, 3)]);
    }

    #[test]
    fn test_ranges_sorted_and_disjoint() {
        let ranges = offsets("o", "foo boo zoo");
        for pair in ranges.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
        assert_eq!(ranges.len(), 6);
    }

    #[test]
    fn test_unicode_offsets_are_char_boundaries() {
        let text = "Ünïcode ÜNÏCODE";
        let ranges = offsets("ünï", text);
        assert_eq!(ranges.len(), 2);
        for (start, end) in ranges {
            assert!(text.is_char_boundary(start) && text.is_char_boundary(end));
        }
    }

    #[test]
    fn test_match_range_len() {
        let range = MatchRange {
            unit: (),
            start: 3,
            end: 7,
        };
        assert_eq!(range.len(), 4);
        assert!(!range.is_empty());
    }
}
