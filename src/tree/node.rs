//! Node payloads stored in the document arena.

/// Element categories produced by the markdown builder plus the reader chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Root,
    Body,
    /// Container for the find bar. Its contents are never search results.
    SearchPanel,
    Label,
    Input,
    Placeholder,
    Value,
    /// A heading together with everything up to the next heading of the same
    /// or higher level.
    Section,
    SectionBody,
    Heading(u8),
    Paragraph,
    Strong,
    Emphasis,
    Strikethrough,
    InlineCode,
    Link { url: String },
    CodeBlock { language: Option<String> },
    List { ordered: bool },
    ListItem { checked: Option<bool> },
    Blockquote,
    Table,
    TableRow { header: bool },
    TableCell,
    Details,
    Summary,
    Image,
    Rule,
    /// Front matter and similar data that is carried but never drawn.
    Metadata,
    /// Search highlight marker.
    Mark,
}

impl ElementKind {
    /// Whether elements of this kind ever paint anything.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, ElementKind::Metadata)
    }

    /// Inline kinds flow within the enclosing block's lines.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            ElementKind::Strong
                | ElementKind::Emphasis
                | ElementKind::Strikethrough
                | ElementKind::InlineCode
                | ElementKind::Link { .. }
                | ElementKind::Mark
                | ElementKind::Label
                | ElementKind::Placeholder
                | ElementKind::Value
        )
    }

    #[cfg(test)]
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            ElementKind::Root => "root",
            ElementKind::Body => "body",
            ElementKind::SearchPanel => "search",
            ElementKind::Label => "label",
            ElementKind::Input => "input",
            ElementKind::Placeholder => "placeholder",
            ElementKind::Value => "value",
            ElementKind::Section => "section",
            ElementKind::SectionBody => "section-body",
            ElementKind::Heading(_) => "h",
            ElementKind::Paragraph => "p",
            ElementKind::Strong => "strong",
            ElementKind::Emphasis => "em",
            ElementKind::Strikethrough => "del",
            ElementKind::InlineCode => "code",
            ElementKind::Link { .. } => "a",
            ElementKind::CodeBlock { .. } => "pre",
            ElementKind::List { .. } => "list",
            ElementKind::ListItem { .. } => "li",
            ElementKind::Blockquote => "blockquote",
            ElementKind::Table => "table",
            ElementKind::TableRow { .. } => "tr",
            ElementKind::TableCell => "td",
            ElementKind::Details => "details",
            ElementKind::Summary => "summary",
            ElementKind::Image => "img",
            ElementKind::Rule => "hr",
            ElementKind::Metadata => "meta",
            ElementKind::Mark => "mark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Normal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    /// Explicit `hidden` attribute; hides the whole subtree.
    pub hidden: bool,
    pub display: Display,
    /// `None` inherits from the parent.
    pub visibility: Option<Visibility>,
    /// Emphasis flag for [`ElementKind::Mark`].
    pub current: bool,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            hidden: false,
            display: Display::Normal,
            visibility: None,
            current: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

impl NodeData {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }
}
