use crate::options::MarkdownOptions;
use crate::parse::parse_markdown;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use ratatui_recycler_core::entry::DocumentContext;
use ratatui_recycler_core::node::Alignment;
use ratatui_recycler_core::node::Node;
use ratatui_recycler_core::node::NodeKind;
use ratatui_recycler_core::node::NodeVariant;
use ratatui_recycler_core::theme::Theme;
use unicode_width::UnicodeWidthStr;
use url::Url;

/// Markdown [`DocumentContext`]: pulldown-cmark parsing plus styled rendering of any node.
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    theme: Theme,
    options: MarkdownOptions,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(theme: Theme, options: MarkdownOptions) -> Self {
        Self { theme, options }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    pub fn lines(&self, node: &Node) -> Vec<Line<'static>> {
        match node.kind() {
            NodeKind::Document | NodeKind::Other => self.stacked(node.children()),
            NodeKind::Paragraph | NodeKind::TableCell => {
                self.inline_lines(node.children(), self.theme.text_primary)
            }
            NodeKind::Heading { level } => {
                let style = self.theme.heading;
                let mut lines = self.inline_lines(node.children(), style);
                if self.options.show_heading_markers
                    && let Some(first) = lines.first_mut()
                {
                    let marker = format!("{} ", "#".repeat(*level as usize));
                    first.spans.insert(0, Span::styled(marker, self.theme.text_muted));
                }
                lines
            }
            NodeKind::BlockQuote => {
                let prefix = self.options.blockquote_prefix.clone();
                self.stacked(node.children())
                    .into_iter()
                    .map(|line| {
                        let mut spans = vec![Span::styled(prefix.clone(), self.theme.text_muted)];
                        spans.extend(
                            line.spans
                                .into_iter()
                                .map(|s| Span::styled(s.content, self.theme.quote.patch(s.style))),
                        );
                        Line::from(spans)
                    })
                    .collect()
            }
            NodeKind::CodeBlock { literal, .. } => {
                let indent = " ".repeat(self.options.code_block_indent as usize);
                literal
                    .lines()
                    .map(|l| {
                        Line::from(vec![
                            Span::raw(indent.clone()),
                            Span::styled(l.to_string(), self.theme.code_block),
                        ])
                    })
                    .collect()
            }
            NodeKind::HtmlBlock { literal } => literal
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), self.theme.text_muted)))
                .collect(),
            NodeKind::List { start } => self.list_lines(node, *start),
            NodeKind::Item => self.stacked(node.children()),
            NodeKind::ThematicBreak => vec![Line::from(Span::styled(
                "─".repeat(self.options.rule_width as usize),
                self.theme.rule,
            ))],
            NodeKind::Table { .. } | NodeKind::TableHead | NodeKind::TableRow => table_lines(node)
                .into_iter()
                .map(|line| line.patch_style(self.theme.text_primary))
                .collect(),
            NodeKind::FootnoteDefinition { label } => {
                let mut lines = self.stacked(node.children());
                let marker = Span::styled(format!("[^{label}]: "), self.theme.accent);
                match lines.first_mut() {
                    Some(first) => first.spans.insert(0, marker),
                    None => lines.push(Line::from(marker)),
                }
                lines
            }
            _ => self.inline_lines(std::slice::from_ref(node), self.theme.text_primary),
        }
    }

    /// Renders block children one after another, separated by blank lines. Runs of inline
    /// children (as in tight list items) are rendered together and hug the blocks around them.
    fn stacked(&self, children: &[Node]) -> Vec<Line<'static>> {
        let mut out: Vec<Line<'static>> = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut blocks: Vec<(bool, Vec<Line<'static>>)> = Vec::new();

        for (i, child) in children.iter().enumerate() {
            if child.variant().is_block() {
                if let Some(start) = run_start.take() {
                    let run = self.inline_lines(&children[start..i], self.theme.text_primary);
                    blocks.push((true, run));
                }
                blocks.push((false, self.lines(child)));
            } else if run_start.is_none() {
                run_start = Some(i);
            }
        }
        if let Some(start) = run_start {
            blocks.push((true, self.inline_lines(&children[start..], self.theme.text_primary)));
        }

        let mut prev_inline: Option<bool> = None;
        for (inline, block) in blocks {
            if prev_inline.is_some_and(|prev| !prev && !inline) {
                out.push(Line::default());
            }
            prev_inline = Some(inline);
            out.extend(block);
        }
        out
    }

    fn list_lines(&self, list: &Node, start: Option<u64>) -> Vec<Line<'static>> {
        let mut out = Vec::new();
        for (i, item) in list.children().iter().enumerate() {
            let marker = match start {
                Some(n) => format!("{}. ", n + i as u64),
                None => self.options.bullet.clone(),
            };
            let hang = " ".repeat(UnicodeWidthStr::width(marker.as_str()));
            for (j, mut line) in self.lines(item).into_iter().enumerate() {
                let prefix = if j == 0 {
                    Span::styled(marker.clone(), self.theme.accent)
                } else {
                    Span::raw(hang.clone())
                };
                line.spans.insert(0, prefix);
                out.push(line);
            }
        }
        out
    }

    fn inline_lines(&self, nodes: &[Node], base: Style) -> Vec<Line<'static>> {
        let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
        for node in nodes {
            self.push_inline(node, base, &mut rows);
        }
        rows.into_iter().map(Line::from).collect()
    }

    fn push_inline(&self, node: &Node, style: Style, rows: &mut Vec<Vec<Span<'static>>>) {
        let push = |rows: &mut Vec<Vec<Span<'static>>>, span: Span<'static>| {
            if let Some(row) = rows.last_mut() {
                row.push(span);
            }
        };
        match node.kind() {
            NodeKind::Text(s) => push(rows, Span::styled(s.clone(), style)),
            NodeKind::Code(s) => {
                let code_style = style.patch(self.theme.code_inline);
                push(rows, Span::styled(s.clone(), code_style));
            }
            NodeKind::Html(s) => {
                let text = html_to_text(s);
                if !text.is_empty() {
                    push(rows, Span::styled(text, style));
                }
            }
            NodeKind::SoftBreak => push(rows, Span::styled(" ", style)),
            NodeKind::HardBreak => rows.push(Vec::new()),
            NodeKind::Emphasis => {
                self.push_children(node, style.add_modifier(Modifier::ITALIC), rows)
            }
            NodeKind::Strong => {
                self.push_children(node, style.add_modifier(Modifier::BOLD), rows)
            }
            NodeKind::Strikethrough => {
                self.push_children(node, style.add_modifier(Modifier::CROSSED_OUT), rows)
            }
            NodeKind::Link { destination, .. } => {
                self.push_children(node, style.patch(self.theme.link), rows);
                if self.options.show_link_destinations && !destination.is_empty() {
                    let dest = resolve_url(self.options.base_url.as_deref(), destination);
                    push(rows, Span::styled(format!(" ({dest})"), self.theme.text_muted));
                }
            }
            NodeKind::Image { destination, .. } => {
                let dest = resolve_url(self.options.base_url.as_deref(), destination);
                let alt = node.literal_text();
                push(rows, Span::styled("Image: ", self.theme.text_muted));
                push(rows, Span::styled(alt, style.patch(self.theme.link)));
                push(rows, Span::styled(format!(" → {dest}"), self.theme.text_muted));
            }
            NodeKind::FootnoteReference(label) => {
                push(rows, Span::styled(format!("[^{label}]"), self.theme.accent))
            }
            NodeKind::TaskListMarker(checked) => {
                let marker = if *checked { "[x] " } else { "[ ] " };
                push(rows, Span::styled(marker, self.theme.accent));
            }
            _ => self.push_children(node, style, rows),
        }
    }

    fn push_children(&self, node: &Node, style: Style, rows: &mut Vec<Vec<Span<'static>>>) {
        for child in node.children() {
            self.push_inline(child, style, rows);
        }
    }
}

impl DocumentContext for MarkdownRenderer {
    fn parse(&self, input: &str) -> Node {
        parse_markdown(input, &self.options)
    }

    fn render(&self, node: &Node) -> Text<'static> {
        Text::from(self.lines(node))
    }
}

/// Lays a table node out as a grid: header row, separator, body rows. Columns are padded to the
/// widest cell and aligned as declared in the table.
pub fn table_lines(node: &Node) -> Vec<Line<'static>> {
    let alignments = match node.kind() {
        NodeKind::Table { alignments } => alignments.clone(),
        _ => Vec::new(),
    };

    let mut head: Option<Vec<String>> = None;
    let mut body: Vec<Vec<String>> = Vec::new();
    let collect_row = |row: &Node| {
        row.children()
            .iter()
            .map(|cell| normalize_whitespace(&cell.literal_text()))
            .collect::<Vec<_>>()
    };
    match node.variant() {
        NodeVariant::TableHead => head = Some(collect_row(node)),
        NodeVariant::TableRow => body.push(collect_row(node)),
        _ => {
            for part in node.children() {
                match part.variant() {
                    NodeVariant::TableHead => head = Some(collect_row(part)),
                    _ => body.push(collect_row(part)),
                }
            }
        }
    }

    let columns = head
        .iter()
        .chain(body.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in head.iter().chain(body.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let layout_row = |row: &[String], style: Style| {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" │ "));
            }
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let align = alignments.get(i).copied().unwrap_or_default();
            spans.push(Span::styled(pad_cell(cell, *width, align), style));
        }
        Line::from(spans)
    };

    let mut out = Vec::new();
    if let Some(head) = &head {
        out.push(layout_row(head, Style::default().add_modifier(Modifier::BOLD)));
        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        out.push(Line::from(separator));
    }
    for row in &body {
        out.push(layout_row(row, Style::default()));
    }
    out
}

fn pad_cell(cell: &str, width: usize, align: Alignment) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    match align {
        Alignment::Right => format!("{}{cell}", " ".repeat(fill)),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(fill - left))
        }
        Alignment::None | Alignment::Left => format!("{cell}{}", " ".repeat(fill)),
    }
}

fn html_to_text(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            _ => out.push(ch),
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn resolve_url(base_url: Option<&str>, dest: &str) -> String {
    let dest = dest.trim();
    if dest.is_empty() || is_absolute_url(dest) {
        return dest.to_string();
    }
    let Some(base) = base_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return dest.to_string();
    };
    match Url::parse(base) {
        Ok(base) => base
            .join(dest)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| dest.to_string()),
        Err(_) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            dest.trim_start_matches("./").trim_start_matches('/')
        ),
    }
}

fn is_absolute_url(dest: &str) -> bool {
    dest.starts_with('#')
        || dest.starts_with("mailto:")
        || dest.starts_with("http://")
        || dest.starts_with("https://")
        || dest.starts_with("file://")
        || dest.starts_with('/')
}
