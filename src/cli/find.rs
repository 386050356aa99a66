//! Headless find: the same highlight pipeline as the reader, reported on
//! stdout.

use super::OutputFormat;
use indextree::NodeId;
use mdseek::Document;
use mdseek::search::{SearchState, SearchSurface, run_search};
use mdseek::tree::DocTree;
use serde::Serialize;

/// Longest context snippet printed per match, in characters.
const CONTEXT_CHARS: usize = 100;

#[derive(Debug, Serialize)]
pub struct FindReport {
    pub query: String,
    pub count: usize,
    pub matches: Vec<MatchReport>,
}

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub index: usize,
    /// Title of the innermost enclosing section.
    pub section: Option<String>,
    /// Matched text as it appears in the document.
    pub text: String,
    /// The block the match sits in, whitespace collapsed.
    pub context: String,
}

/// Highlight every occurrence of `query` in `document` and describe them in
/// document order.
pub fn find(document: &mut Document, query: &str) -> FindReport {
    let mut state = SearchState::default();
    let scope = document.tree.search_scope();
    run_search(&mut document.tree, scope, query, &mut state, &mut ());

    let matches = state
        .highlights
        .iter()
        .enumerate()
        .map(|(i, highlight)| MatchReport {
            index: i + 1,
            section: document.section_title(highlight.mark),
            text: document.tree.text_of(highlight.mark),
            context: context(&document.tree, highlight.mark),
        })
        .collect();

    FindReport {
        query: query.to_string(),
        count: state.match_count(),
        matches,
    }
}

/// Text of the nearest block element containing `node`.
fn context(tree: &DocTree, node: NodeId) -> String {
    let mut block = node;
    while let Some(parent) = tree.parent_of(block) {
        block = parent;
        if tree.kind(block).is_some_and(|kind| !kind.is_inline()) {
            break;
        }
    }
    let text = tree.text_of(block);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > CONTEXT_CHARS {
        let cut: String = collapsed.chars().take(CONTEXT_CHARS - 1).collect();
        format!("{}…", cut)
    } else {
        collapsed
    }
}

pub fn print_report(report: &FindReport, format: OutputFormat, count_only: bool) {
    match format {
        OutputFormat::Json if count_only => {
            println!("{}", serde_json::json!({ "query": report.query, "count": report.count }));
        }
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing results: {}", e),
        },
        OutputFormat::Plain if count_only => println!("{}", report.count),
        OutputFormat::Plain => {
            for m in &report.matches {
                let section = m.section.as_deref().unwrap_or("(top)");
                println!("{}/{} [{}] {}", m.index, report.count, section, m.context);
            }
        }
    }
}

/// Headings as `## Title` lines, or the outline as JSON.
pub fn print_headings(document: &Document, format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            for heading in &document.headings {
                println!("{} {}", "#".repeat(heading.level), heading.text);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&document.headings) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing headings: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdseek::config::ContentConfig;
    use mdseek::parse_markdown;

    fn doc(markdown: &str) -> Document {
        parse_markdown(markdown, &ContentConfig::default())
    }

    #[test]
    fn test_find_reports_matches_in_document_order() {
        let mut document = doc("# Intro\n\nThe **cat** sat.\n\n## Later\n\nAnother cat here.\n");
        let report = find(&mut document, "CAT");

        assert_eq!(report.count, 2);
        assert_eq!(report.matches[0].text, "cat");
        assert_eq!(report.matches[0].section.as_deref(), Some("Intro"));
        assert_eq!(report.matches[0].context, "The cat sat.");
        assert_eq!(report.matches[1].index, 2);
        assert_eq!(report.matches[1].section.as_deref(), Some("Later"));
    }

    #[test]
    fn test_find_without_matches() {
        let mut document = doc("# Intro\n\nNothing to see.\n");
        let report = find(&mut document, "zebra");
        assert_eq!(report.count, 0);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_find_empty_query() {
        let mut document = doc("Some text.\n");
        assert_eq!(find(&mut document, "").count, 0);
    }

    #[test]
    fn test_report_serializes() {
        let mut document = doc("# A\n\nfoo\n");
        let json = serde_json::to_value(find(&mut document, "foo")).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["matches"][0]["section"], "A");
    }
}
