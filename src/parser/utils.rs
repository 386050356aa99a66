//! Utility functions for markdown parsing.

use super::content::InlineElement;
use regex::Regex;
use std::sync::OnceLock;

/// A YAML front matter block split off the top of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Text between the fences, without them.
    pub raw: &'a str,
    /// Everything after the closing fence.
    pub body: &'a str,
    /// Lines consumed, fences included.
    pub lines: usize,
}

/// Split a leading `---` fenced front matter block from the document.
///
/// The opening fence must be the very first line; without a closing fence
/// the whole input is treated as body.
///
/// # Examples
///
/// ```
/// # use mdseek::parser::utils::split_front_matter;
/// let fm = split_front_matter("---\ntitle: x\n---\n# Doc\n").unwrap();
/// assert_eq!(fm.raw, "title: x");
/// assert_eq!(fm.body, "# Doc\n");
/// assert!(split_front_matter("# No front matter").is_none());
/// ```
pub fn split_front_matter(content: &str) -> Option<FrontMatter<'_>> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;
    let header = content.len() - rest.len();

    let mut offset = 0;
    for (idx, line) in rest.split_inclusive('\n').enumerate() {
        if line.trim_end() == "---" {
            let raw = rest[..offset].trim_end_matches(['\n', '\r']);
            let body = &content[header + offset + line.len()..];
            return Some(FrontMatter {
                raw,
                body,
                lines: idx + 2,
            });
        }
        offset += line.len();
    }
    None
}

/// Parse simple inline HTML (`<strong>`, `<b>`, `<em>`, `<i>`, `<code>`) into
/// inline elements. Anything else stays text.
///
/// # Examples
///
/// ```
/// # use mdseek::parser::utils::parse_inline_html;
/// let elements = parse_inline_html("<strong>Navigation</strong>");
/// assert_eq!(elements.len(), 1);
/// ```
pub fn parse_inline_html(html: &str) -> Vec<InlineElement> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(tag_re) = TAG
        .get_or_init(|| Regex::new(r"<(strong|b|em|i|code)>(.*?)</(strong|b|em|i|code)>").ok())
        .as_ref()
    else {
        return vec![InlineElement::Text {
            value: html.to_string(),
        }];
    };

    let mut elements = Vec::new();
    let mut last = 0;
    for caps in tag_re.captures_iter(html) {
        let (Some(whole), Some(open), Some(inner), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        // `<b>x</em>` is not a pair
        if open.as_str() != close.as_str() {
            continue;
        }
        if whole.start() > last {
            elements.push(InlineElement::Text {
                value: html[last..whole.start()].to_string(),
            });
        }
        let value = inner.as_str().to_string();
        elements.push(match open.as_str() {
            "strong" | "b" => InlineElement::Strong { value },
            "em" | "i" => InlineElement::Emphasis { value },
            _ => InlineElement::Code { value },
        });
        last = whole.end();
    }
    if last < html.len() {
        elements.push(InlineElement::Text {
            value: html[last..].to_string(),
        });
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_front_matter() {
        let doc = "---\ntitle: Notes\ntags: [a, b]\n---\n# Heading\nBody\n";
        let fm = split_front_matter(doc).unwrap();
        assert_eq!(fm.raw, "title: Notes\ntags: [a, b]");
        assert_eq!(fm.body, "# Heading\nBody\n");
        assert_eq!(fm.lines, 4);
    }

    #[test]
    fn test_front_matter_requires_leading_fence() {
        assert!(split_front_matter("text\n---\nmore\n---\n").is_none());
        assert!(split_front_matter("---\nnever closed\n").is_none());
    }

    #[test]
    fn test_front_matter_at_end_of_input() {
        let fm = split_front_matter("---\na: 1\n---").unwrap();
        assert_eq!(fm.raw, "a: 1");
        assert_eq!(fm.body, "");
    }

    #[test]
    fn test_front_matter_crlf() {
        let fm = split_front_matter("---\r\na: 1\r\n---\r\nrest").unwrap();
        assert_eq!(fm.raw, "a: 1");
        assert_eq!(fm.body, "rest");
    }

    #[test]
    fn test_parse_inline_html_mixed() {
        let elements = parse_inline_html("Before <strong>bold</strong> after");
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[0], InlineElement::Text { value } if value == "Before "));
        assert!(matches!(&elements[1], InlineElement::Strong { value } if value == "bold"));
        assert!(matches!(&elements[2], InlineElement::Text { value } if value == " after"));
    }

    #[test]
    fn test_parse_inline_html_tags() {
        assert!(matches!(
            &parse_inline_html("<i>x</i>")[0],
            InlineElement::Emphasis { value } if value == "x"
        ));
        assert!(matches!(
            &parse_inline_html("<code>fn main()</code>")[0],
            InlineElement::Code { value } if value == "fn main()"
        ));
    }

    #[test]
    fn test_parse_inline_html_mismatched_is_text() {
        let elements = parse_inline_html("<b>x</em>");
        assert_eq!(elements.len(), 1);
        assert!(matches!(&elements[0], InlineElement::Text { value } if value == "<b>x</em>"));
    }

    #[test]
    fn test_parse_inline_html_plain_text() {
        let elements = parse_inline_html("No HTML here");
        assert_eq!(elements.len(), 1);
    }
}
