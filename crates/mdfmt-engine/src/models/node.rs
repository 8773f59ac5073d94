use std::fmt;

/// Column alignment declared in a table's delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// The kind of a node together with its kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a parsed document
    Document,
    /// ATX or setext heading, level 1-6
    Heading { level: u8 },
    Paragraph,
    /// Plain text; the content lives in `Node::literal`
    Text,
    Emph,
    Strong,
    /// Code span; the content lives in `Node::literal`
    Code,
    Link { destination: String, title: String },
    Image { destination: String, title: String },
    List { ordered: bool },
    Item,
    BlockQuote,
    /// Fenced or indented code block; the code lives in `Node::literal`
    CodeBlock {
        fenced: bool,
        fence_length: usize,
        info: String,
    },
    Table { alignments: Vec<Alignment> },
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    HtmlBlock,
    HtmlSpan,
    HardBreak,
    ThematicBreak,
    /// Any other construct the parser produced (footnotes, math, ...)
    Extension(&'static str),
}

impl NodeKind {
    /// Human readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text => "text",
            NodeKind::Emph => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Code => "code span",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::List { .. } => "list",
            NodeKind::Item => "list item",
            NodeKind::BlockQuote => "block quote",
            NodeKind::CodeBlock { .. } => "code block",
            NodeKind::Table { .. } => "table",
            NodeKind::TableHead => "table head",
            NodeKind::TableBody => "table body",
            NodeKind::TableRow => "table row",
            NodeKind::TableCell => "table cell",
            NodeKind::HtmlBlock => "html block",
            NodeKind::HtmlSpan => "inline html",
            NodeKind::HardBreak => "hard line break",
            NodeKind::ThematicBreak => "thematic break",
            NodeKind::Extension(name) => name,
        }
    }

    /// Whether nodes of this kind appear inside paragraphs rather than as blocks.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::Emph
                | NodeKind::Strong
                | NodeKind::Code
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::HtmlSpan
                | NodeKind::HardBreak
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One element of a parsed markdown document.
///
/// The tree is read-only once built: children are owned in document order,
/// so "a node and its following siblings" is simply a slice of `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Raw payload for `Text`, `Code`, `CodeBlock` and HTML nodes
    pub literal: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            literal: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            literal: String::new(),
            children,
        }
    }

    pub fn with_literal(kind: NodeKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            children: Vec::new(),
        }
    }

    pub fn text(literal: impl Into<String>) -> Self {
        Self::with_literal(NodeKind::Text, literal)
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Concatenated text of this node's descendants, ignoring markup.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        collect_plain_text(&self.children, &mut text);
        text
    }
}

fn collect_plain_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node.kind {
            NodeKind::Text | NodeKind::Code => out.push_str(&node.literal),
            NodeKind::HardBreak => out.push(' '),
            _ => collect_plain_text(&node.children, out),
        }
    }
}
