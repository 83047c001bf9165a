use crate::options::MarkdownOptions;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use ratatui_recycler_core::node::Alignment;
use ratatui_recycler_core::node::Node;
use ratatui_recycler_core::node::NodeKind;
use std::ops::Range;

/// Parses `input` into a `Document` node whose children are the top-level blocks.
///
/// Every node carries the byte range it was parsed from, so identical blocks at different places
/// in the source get different stable ids.
pub fn parse_markdown(input: &str, options: &MarkdownOptions) -> Node {
    let parser = Parser::new_ext(input, options.parser_options()).into_offset_iter();
    let mut stack = vec![Node::new(NodeKind::Document).with_span(0..input.len())];

    for (event, range) in parser {
        match event {
            Event::Start(tag) => stack.push(Node::new(kind_for_tag(tag)).with_span(range)),
            Event::End(_) => close(&mut stack),
            Event::Text(text) => push_literal(&mut stack, text, range),
            Event::Html(html) | Event::InlineHtml(html) => {
                if let Some(NodeKind::HtmlBlock { literal }) = stack.last_mut().map(Node::kind_mut)
                {
                    literal.push_str(&html);
                } else {
                    append(&mut stack, Node::new(NodeKind::Html(html.to_string())), range);
                }
            }
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => append(
                &mut stack,
                Node::new(NodeKind::Code(code.to_string())),
                range,
            ),
            Event::FootnoteReference(label) => append(
                &mut stack,
                Node::new(NodeKind::FootnoteReference(label.to_string())),
                range,
            ),
            Event::SoftBreak => append(&mut stack, Node::new(NodeKind::SoftBreak), range),
            Event::HardBreak => append(&mut stack, Node::new(NodeKind::HardBreak), range),
            Event::Rule => append(&mut stack, Node::new(NodeKind::ThematicBreak), range),
            Event::TaskListMarker(checked) => append(
                &mut stack,
                Node::new(NodeKind::TaskListMarker(checked)),
                range,
            ),
        }
    }

    while stack.len() > 1 {
        close(&mut stack);
    }
    let root = stack
        .pop()
        .unwrap_or_else(|| Node::new(NodeKind::Document));
    tracing::trace!(blocks = root.children().len(), "parsed markdown");
    root
}

fn kind_for_tag(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level(level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => normalize_fenced_lang(&info),
                CodeBlockKind::Indented => None,
            },
            literal: String::new(),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock {
            literal: String::new(),
        },
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::Item,
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
            label: label.to_string(),
        },
        Tag::Table(alignments) => NodeKind::Table {
            alignments: alignments.into_iter().map(alignment).collect(),
        },
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
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
        _ => NodeKind::Other,
    }
}

fn close(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.append_child(node);
    }
}

fn append(stack: &mut [Node], node: Node, range: Range<usize>) {
    if let Some(parent) = stack.last_mut() {
        parent.append_child(node.with_span(range));
    }
}

fn push_literal(stack: &mut [Node], text: CowStr<'_>, range: Range<usize>) {
    match stack.last_mut().map(Node::kind_mut) {
        Some(NodeKind::CodeBlock { literal, .. } | NodeKind::HtmlBlock { literal }) => {
            literal.push_str(&text);
        }
        _ => append(stack, Node::text(text.to_string()), range),
    }
}

fn alignment(a: pulldown_cmark::Alignment) -> Alignment {
    match a {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn normalize_fenced_lang(lang: &CowStr<'_>) -> Option<String> {
    let first = lang.split_whitespace().next().unwrap_or("");
    let first = first.split(',').next().unwrap_or("").trim();
    let first = first.strip_prefix("language-").unwrap_or(first);
    let first = first.trim_start_matches('{').trim_end_matches('}').trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui_recycler_core::node::NodeVariant;

    fn parse(input: &str) -> Node {
        parse_markdown(input, &MarkdownOptions::default())
    }

    fn variants(node: &Node) -> Vec<NodeVariant> {
        node.children().iter().map(Node::variant).collect()
    }

    #[test]
    fn top_level_blocks_become_document_children() {
        let doc = parse("# Title\n\nSome *text*.\n\n---\n\n- a\n- b\n");
        assert_eq!(doc.variant(), NodeVariant::Document);
        assert_eq!(
            variants(&doc),
            vec![
                NodeVariant::Heading,
                NodeVariant::Paragraph,
                NodeVariant::ThematicBreak,
                NodeVariant::List,
            ]
        );
        assert_eq!(doc.children()[0].kind(), &NodeKind::Heading { level: 1 });
        assert_eq!(doc.children()[1].literal_text(), "Some text.");
    }

    #[test]
    fn code_block_text_is_folded_into_literal() {
        let doc = parse("```rust,ignore\nfn main() {}\nlet x = 1;\n```\n");
        let code = &doc.children()[0];
        assert_eq!(
            code.kind(),
            &NodeKind::CodeBlock {
                info: Some("rust".to_string()),
                literal: "fn main() {}\nlet x = 1;\n".to_string(),
            }
        );
        assert!(code.is_empty());
    }

    #[test]
    fn spans_point_back_into_the_source() {
        let input = "first\n\nsecond\n";
        let doc = parse(input);
        let second = &doc.children()[1];
        assert_eq!(&input[second.span()].trim_end(), &"second");
    }

    #[test]
    fn tables_keep_alignment_and_cells() {
        let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let table = &doc.children()[0];
        assert_eq!(
            table.kind(),
            &NodeKind::Table {
                alignments: vec![Alignment::Left, Alignment::Right]
            }
        );
        assert_eq!(
            variants(table),
            vec![NodeVariant::TableHead, NodeVariant::TableRow]
        );
    }

    #[test]
    fn task_markers_and_footnotes_are_nodes() {
        let doc = parse("- [x] done\n\nNote[^1].\n\n[^1]: text\n");
        let item = &doc.children()[0].children()[0];
        assert_eq!(
            item.first_child().map(Node::variant),
            Some(NodeVariant::TaskListMarker)
        );
        assert_eq!(
            doc.children().last().map(Node::variant),
            Some(NodeVariant::FootnoteDefinition)
        );
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = parse("");
        assert!(doc.is_empty());
    }
}
