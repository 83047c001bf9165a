//! Block entries with layouts beyond "render the node and wrap it".
use crate::render::table_lines;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use ratatui::widgets::Padding;
use ratatui_recycler_core::entry::DocumentContext;
use ratatui_recycler_core::entry::Entry;
use ratatui_recycler_core::error::EntryError;
use ratatui_recycler_core::holder::Holder;
use ratatui_recycler_core::holder::Inflater;
use ratatui_recycler_core::holder::StyleRole;
use ratatui_recycler_core::holder::Template;
use ratatui_recycler_core::node::Node;
use ratatui_recycler_core::node::NodeKind;
use ratatui_recycler_core::node::NodeVariant;
use ratatui_recycler_core::registry::AdapterBuilder;
use std::collections::HashMap;

/// Headings, underlined with `═` (level 1) or `─` (level 2).
#[derive(Clone, Debug)]
pub struct HeadingEntry {
    template: Template,
}

impl Default for HeadingEntry {
    fn default() -> Self {
        Self {
            template: Template::new("heading")
                .role(StyleRole::Heading)
                .padding(Padding::new(0, 0, 0, 1)),
        }
    }
}

impl Entry for HeadingEntry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
        Ok(inflater.inflate(&self.template))
    }

    fn bind_holder(
        &mut self,
        context: &dyn DocumentContext,
        holder: &mut Holder,
        node: &Node,
    ) -> Result<(), EntryError> {
        let NodeKind::Heading { level } = node.kind() else {
            return Err(EntryError::msg(format!(
                "heading entry bound to {:?}",
                node.variant()
            )));
        };
        let mut text = context.render(node);
        let underline = match *level {
            1 => Some("═"),
            2 => Some("─"),
            _ => None,
        };
        if let Some(ch) = underline {
            let width = text.lines.iter().map(Line::width).max().unwrap_or(0);
            text.lines.push(Line::from(ch.repeat(width.max(1))));
        }
        holder.set_text(text);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct CodeBlockOptions {
    pub show_language: bool,
    pub line_numbers: bool,
}

impl Default for CodeBlockOptions {
    fn default() -> Self {
        Self {
            show_language: true,
            line_numbers: false,
        }
    }
}

/// Fenced and indented code. Lines never wrap; the laid-out text is cached per node until the
/// next document.
#[derive(Clone, Debug)]
pub struct CodeBlockEntry {
    template: Template,
    options: CodeBlockOptions,
    cache: HashMap<i64, Text<'static>>,
}

impl Default for CodeBlockEntry {
    fn default() -> Self {
        Self::new(CodeBlockOptions::default())
    }
}

impl CodeBlockEntry {
    pub fn new(options: CodeBlockOptions) -> Self {
        Self {
            template: Template::new("code_block")
                .role(StyleRole::Code)
                .padding(Padding::new(2, 0, 0, 1))
                .wrap(false),
            options,
            cache: HashMap::new(),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn layout(&self, info: Option<&str>, literal: &str) -> Text<'static> {
        let mut lines = Vec::new();
        if self.options.show_language
            && let Some(lang) = info
        {
            lines.push(Line::from(Span::styled(
                lang.to_string(),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        let body: Vec<&str> = literal.lines().collect();
        let digits = body.len().max(1).to_string().len();
        for (i, line) in body.iter().enumerate() {
            let mut spans = Vec::new();
            if self.options.line_numbers {
                spans.push(Span::styled(
                    format!("{:>digits$} │ ", i + 1),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            spans.push(Span::raw(line.to_string()));
            lines.push(Line::from(spans));
        }
        Text::from(lines)
    }
}

impl Entry for CodeBlockEntry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
        Ok(inflater.inflate(&self.template))
    }

    fn bind_holder(
        &mut self,
        _context: &dyn DocumentContext,
        holder: &mut Holder,
        node: &Node,
    ) -> Result<(), EntryError> {
        let NodeKind::CodeBlock { info, literal } = node.kind() else {
            return Err(EntryError::msg(format!(
                "code block entry bound to {:?}",
                node.variant()
            )));
        };
        let id = node.stable_id();
        let text = match self.cache.get(&id) {
            Some(text) => text.clone(),
            None => {
                let text = self.layout(info.as_deref(), literal);
                self.cache.insert(id, text.clone());
                text
            }
        };
        holder.set_text(text);
        Ok(())
    }

    fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Tables as a column-aligned grid, cached per node until the next document.
#[derive(Clone, Debug)]
pub struct TableEntry {
    template: Template,
    cache: HashMap<i64, Text<'static>>,
}

impl Default for TableEntry {
    fn default() -> Self {
        Self {
            template: Template::new("table")
                .padding(Padding::new(0, 0, 0, 1))
                .wrap(false),
            cache: HashMap::new(),
        }
    }
}

impl TableEntry {
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Entry for TableEntry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
        Ok(inflater.inflate(&self.template))
    }

    fn bind_holder(
        &mut self,
        _context: &dyn DocumentContext,
        holder: &mut Holder,
        node: &Node,
    ) -> Result<(), EntryError> {
        let text = self
            .cache
            .entry(node.stable_id())
            .or_insert_with(|| Text::from(table_lines(node)))
            .clone();
        holder.set_text(text);
        Ok(())
    }

    fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Builder preloaded with the markdown entries. Anything not registered here (paragraphs, lists,
/// quotes, rules, html, footnotes) goes through a wrapping paragraph template.
pub fn markdown_adapter() -> AdapterBuilder {
    AdapterBuilder::new()
        .include(NodeVariant::Heading, HeadingEntry::default())
        .include(NodeVariant::CodeBlock, CodeBlockEntry::default())
        .include(NodeVariant::Table, TableEntry::default())
        .default_template(Template::new("paragraph").padding(Padding::new(0, 0, 0, 1)))
}
