//! Markdown parsing module that turns raw markdown text into a [`Node`] tree.
//!
//! Parsing itself is delegated to `pulldown-cmark`; this module folds its flat
//! event stream into the owned tree the renderer walks.

use std::ops::Range;
use std::str::Utf8Error;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::models::{Alignment, Node, NodeKind};

/// Parser extensions the renderer understands.
///
/// Fenced code is core CommonMark, and CommonMark's flanking rules already
/// keep `_` inside words from opening emphasis, so only tables need enabling.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
}

/// Parse markdown content into a document tree.
///
/// The returned node is always of kind [`NodeKind::Document`].
pub fn parse_markdown(content: &str) -> Node {
    let mut builder = TreeBuilder::new(content);
    for (event, range) in Parser::new_ext(content, parser_options()).into_offset_iter() {
        builder.process_event(event, range);
    }
    builder.finish()
}

/// Parse a markdown document held in raw bytes. The bytes must be UTF-8.
pub fn parse_bytes(content: &[u8]) -> Result<Node, Utf8Error> {
    let content = std::str::from_utf8(content)?;
    Ok(parse_markdown(content))
}

/// Builds the node tree from `pulldown-cmark` events.
///
/// # Event shapes that need reshaping
///
/// Tight list items carry their inline content directly:
/// ```markdown
/// - Parent
///   - Child
/// ```
/// 1. `Start(List)`, `Start(Item)`
/// 2. `Text("Parent")`
/// 3. `Start(List)`, `Start(Item)`, `Text("Child")`, `End(Item)`, `End(List)`
/// 4. `End(Item)`, `End(List)`
///
/// Loose items wrap the same text in `Start(Paragraph)`/`End(Paragraph)`.
/// The builder wraps the inline runs of tight items in a paragraph so every
/// item looks like `Item[Paragraph, List?]` regardless of tightness.
///
/// Tables emit the head cells directly under `TableHead` and the body rows
/// directly under `Table`; the builder adds the head row and a `TableBody`.
struct TreeBuilder<'a> {
    source: &'a str,
    stack: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: vec![Node::new(NodeKind::Document)],
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                let kind = self.kind_for_tag(tag, range);
                self.stack.push(Node::new(kind));
            }
            Event::End(end) => self.close(end),
            Event::Text(text) => self.push_text(&text),
            Event::SoftBreak => self.push_text("\n"),
            Event::Code(code) => self.push_leaf(Node::with_literal(NodeKind::Code, code.as_ref())),
            Event::Html(html) => {
                if self.top().kind == NodeKind::HtmlBlock {
                    self.top().literal.push_str(&html);
                } else {
                    self.push_leaf(Node::with_literal(NodeKind::HtmlBlock, html.as_ref()));
                }
            }
            Event::InlineHtml(html) => {
                self.push_leaf(Node::with_literal(NodeKind::HtmlSpan, html.as_ref()))
            }
            Event::HardBreak => self.push_leaf(Node::new(NodeKind::HardBreak)),
            Event::Rule => self.push_leaf(Node::new(NodeKind::ThematicBreak)),
            Event::FootnoteReference(label) => self.push_leaf(Node::with_literal(
                NodeKind::Extension("footnote reference"),
                label.as_ref(),
            )),
            Event::TaskListMarker(_) => {
                self.push_leaf(Node::new(NodeKind::Extension("task list marker")))
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push_leaf(Node::with_literal(NodeKind::Extension("math"), math.as_ref()))
            }
        }
    }

    fn kind_for_tag(&self, tag: Tag<'_>, range: Range<usize>) -> NodeKind {
        match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock {
                fenced: true,
                fence_length: self.fence_length_at(range.start),
                info: info.trim().to_string(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
                fenced: false,
                fence_length: 0,
                info: String::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock,
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
            },
            Tag::Item => NodeKind::Item,
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(convert_alignment).collect(),
            },
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emph,
            Tag::Strong => NodeKind::Strong,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                destination: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                destination: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Strikethrough => NodeKind::Extension("strikethrough"),
            Tag::FootnoteDefinition(_) => NodeKind::Extension("footnote definition"),
            Tag::MetadataBlock(_) => NodeKind::Extension("metadata block"),
            _ => NodeKind::Extension("extension"),
        }
    }

    /// Length of the fence opening at `offset`, or 0 if none is found there.
    fn fence_length_at(&self, offset: usize) -> usize {
        let line = self.source.get(offset..).unwrap_or_default();
        let line = line.trim_start_matches([' ', '\t']);
        match line.chars().next() {
            Some(fence @ ('`' | '~')) => line.chars().take_while(|&c| c == fence).count(),
            _ => 0,
        }
    }

    fn top(&mut self) -> &mut Node {
        // The document root is never popped, so the stack is never empty.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn push_leaf(&mut self, node: Node) {
        self.top().children.push(node);
    }

    fn push_text(&mut self, text: &str) {
        let top = self.top();
        if matches!(top.kind, NodeKind::CodeBlock { .. }) {
            top.literal.push_str(text);
            return;
        }
        match top.children.last_mut() {
            Some(last) if last.is_text() => {
                last.literal.push_str(text);
                return;
            }
            _ => {}
        }
        top.children.push(Node::text(text));
    }

    fn close(&mut self, _end: TagEnd) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(mut node) = self.stack.pop() {
            finalize(&mut node);
            self.push_leaf(node);
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            if let Some(mut node) = self.stack.pop() {
                finalize(&mut node);
                self.push_leaf(node);
            }
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document))
    }
}

/// Reshape a node whose children are complete.
fn finalize(node: &mut Node) {
    match node.kind {
        NodeKind::Item => {
            let children = std::mem::take(&mut node.children);
            node.children = wrap_inline_runs(children);
        }
        NodeKind::TableHead => {
            if node.children.iter().all(|c| c.kind == NodeKind::TableCell) {
                let cells = std::mem::take(&mut node.children);
                node.children = vec![Node::with_children(NodeKind::TableRow, cells)];
            }
        }
        NodeKind::Table { .. } => {
            let (head, rows): (Vec<Node>, Vec<Node>) = std::mem::take(&mut node.children)
                .into_iter()
                .partition(|c| c.kind != NodeKind::TableRow);
            node.children = head;
            node.children
                .push(Node::with_children(NodeKind::TableBody, rows));
        }
        _ => {}
    }
}

/// Group consecutive inline nodes into paragraphs, leaving blocks untouched.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut blocks = Vec::with_capacity(children.len());
    let mut run = Vec::new();

    for child in children {
        if child.kind.is_inline() {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            blocks.push(Node::with_children(
                NodeKind::Paragraph,
                std::mem::take(&mut run),
            ));
        }
        blocks.push(child);
    }
    if !run.is_empty() {
        blocks.push(Node::with_children(NodeKind::Paragraph, run));
    }

    blocks
}

fn convert_alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
