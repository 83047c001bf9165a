//! Owned document tree consumed by the adapter.
//!
//! Children are stored inline, so a node taken out of its parent (see [`Node::detach_child`])
//! owns its whole subtree and keeps no link back into the tree it came from.
use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeVariant {
    Document,
    Heading,
    Paragraph,
    BlockQuote,
    CodeBlock,
    HtmlBlock,
    List,
    Item,
    ThematicBreak,
    Table,
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition,
    Text,
    Code,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    SoftBreak,
    HardBreak,
    Html,
    FootnoteReference,
    TaskListMarker,
    Other,
}

impl NodeVariant {
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeVariant::Document
                | NodeVariant::Heading
                | NodeVariant::Paragraph
                | NodeVariant::BlockQuote
                | NodeVariant::CodeBlock
                | NodeVariant::HtmlBlock
                | NodeVariant::List
                | NodeVariant::Item
                | NodeVariant::ThematicBreak
                | NodeVariant::Table
                | NodeVariant::TableHead
                | NodeVariant::TableRow
                | NodeVariant::TableCell
                | NodeVariant::FootnoteDefinition
                | NodeVariant::Other
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    BlockQuote,
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    List {
        /// `Some(n)` for ordered lists starting at `n`.
        start: Option<u64>,
    },
    Item,
    ThematicBreak,
    Table {
        alignments: Vec<Alignment>,
    },
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition {
        label: String,
    },
    Text(String),
    Code(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        destination: String,
        title: String,
    },
    Image {
        destination: String,
        title: String,
    },
    SoftBreak,
    HardBreak,
    Html(String),
    FootnoteReference(String),
    TaskListMarker(bool),
    Other,
}

impl NodeKind {
    pub fn variant(&self) -> NodeVariant {
        match self {
            NodeKind::Document => NodeVariant::Document,
            NodeKind::Heading { .. } => NodeVariant::Heading,
            NodeKind::Paragraph => NodeVariant::Paragraph,
            NodeKind::BlockQuote => NodeVariant::BlockQuote,
            NodeKind::CodeBlock { .. } => NodeVariant::CodeBlock,
            NodeKind::HtmlBlock { .. } => NodeVariant::HtmlBlock,
            NodeKind::List { .. } => NodeVariant::List,
            NodeKind::Item => NodeVariant::Item,
            NodeKind::ThematicBreak => NodeVariant::ThematicBreak,
            NodeKind::Table { .. } => NodeVariant::Table,
            NodeKind::TableHead => NodeVariant::TableHead,
            NodeKind::TableRow => NodeVariant::TableRow,
            NodeKind::TableCell => NodeVariant::TableCell,
            NodeKind::FootnoteDefinition { .. } => NodeVariant::FootnoteDefinition,
            NodeKind::Text(_) => NodeVariant::Text,
            NodeKind::Code(_) => NodeVariant::Code,
            NodeKind::Emphasis => NodeVariant::Emphasis,
            NodeKind::Strong => NodeVariant::Strong,
            NodeKind::Strikethrough => NodeVariant::Strikethrough,
            NodeKind::Link { .. } => NodeVariant::Link,
            NodeKind::Image { .. } => NodeVariant::Image,
            NodeKind::SoftBreak => NodeVariant::SoftBreak,
            NodeKind::HardBreak => NodeVariant::HardBreak,
            NodeKind::Html(_) => NodeVariant::Html,
            NodeKind::FootnoteReference(_) => NodeVariant::FootnoteReference,
            NodeKind::TaskListMarker(_) => NodeVariant::TaskListMarker,
            NodeKind::Other => NodeVariant::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    kind: NodeKind,
    /// Source byte range, `0..0` for nodes that were not produced by a parser.
    span: Range<usize>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            span: 0..0,
            children: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(literal: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(literal.into()))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn variant(&self) -> NodeVariant {
        self.kind.variant()
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Sibling that follows the child at `index`.
    pub fn next_sibling_of(&self, index: usize) -> Option<&Node> {
        self.children.get(index.checked_add(1)?)
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn detach_child(&mut self, index: usize) -> Option<Node> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Detaches every child, leaving `self` as an empty node.
    pub fn detach_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text content of the subtree. Breaks become `\n`/` `.
    pub fn literal_text(&self) -> String {
        let mut out = String::new();
        collect_literal(self, &mut out);
        out
    }

    /// Deterministic identity for this subtree (kind, source span and children).
    pub fn stable_id(&self) -> i64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish() as i64
    }
}

fn collect_literal(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(s) | NodeKind::Code(s) | NodeKind::Html(s) => out.push_str(s),
        NodeKind::CodeBlock { literal, .. } | NodeKind::HtmlBlock { literal } => {
            out.push_str(literal)
        }
        NodeKind::SoftBreak => out.push(' '),
        NodeKind::HardBreak => out.push('\n'),
        _ => {}
    }
    for child in &node.children {
        collect_literal(child, out);
    }
}
