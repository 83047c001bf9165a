//! Reusable display cells and the templates they are inflated from.
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;

/// Theme slot a template draws its base style from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleRole {
    #[default]
    Text,
    Muted,
    Heading,
    Code,
    Quote,
    Rule,
}

impl StyleRole {
    fn resolve(self, theme: &Theme) -> Style {
        match self {
            StyleRole::Text => theme.text_primary,
            StyleRole::Muted => theme.text_muted,
            StyleRole::Heading => theme.heading,
            StyleRole::Code => theme.code_block,
            StyleRole::Quote => theme.quote,
            StyleRole::Rule => theme.rule,
        }
    }
}

/// Description of a holder layout: which theme slot it uses, extra style, padding and wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    name: String,
    role: StyleRole,
    style: Style,
    padding: Padding,
    wrap: bool,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: StyleRole::Text,
            style: Style::default(),
            padding: Padding::ZERO,
            wrap: true,
        }
    }

    pub fn role(mut self, role: StyleRole) -> Self {
        self.role = role;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn padding_ref(&self) -> &Padding {
        &self.padding
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new("empty").wrap(false)
    }
}

/// Turns templates into holders for one parent container.
///
/// The adapter creates a single inflater the first time it is asked for a holder and keeps it
/// for its whole lifetime.
#[derive(Clone, Debug)]
pub struct Inflater {
    theme: Theme,
}

impl Inflater {
    pub fn from_parent(theme: &Theme) -> Self {
        Self {
            theme: theme.clone(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn inflate(&self, template: &Template) -> Holder {
        let style = template.role.resolve(&self.theme).patch(template.style);
        Holder {
            template: template.clone(),
            style,
            text: Text::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Holder {
    template: Template,
    style: Style,
    text: Text<'static>,
}

impl Holder {
    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn text(&self) -> &Text<'static> {
        &self.text
    }

    pub fn set_text(&mut self, text: Text<'static>) {
        self.text = text;
    }

    /// Drops bound content so the holder can go back to a pool.
    pub fn reset(&mut self) {
        self.text = Text::default();
    }

    pub fn is_empty(&self) -> bool {
        self.text.lines.is_empty()
    }

    /// Rows needed to show the holder at `width`, padding included. Empty holders take no rows.
    pub fn height(&self, width: u16) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let pad = self.template.padding;
        let inner_w = width.saturating_sub(pad.left.saturating_add(pad.right));
        let lines = if self.template.wrap && inner_w > 0 {
            Paragraph::new(self.text.clone())
                .wrap(Wrap { trim: false })
                .line_count(inner_w)
        } else {
            self.text.lines.len()
        };
        (lines as u32)
            .saturating_add(pad.top as u32)
            .saturating_add(pad.bottom as u32)
    }

    /// Renders into `area`, skipping the first `clip_top` rows of the holder.
    pub fn render(&self, area: Rect, buf: &mut Buffer, clip_top: u32) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.style);

        let pad = self.template.padding;
        let top = pad.top as u32;
        let (offset, scroll) = if clip_top < top {
            ((top - clip_top) as u16, 0u16)
        } else {
            (0, (clip_top - top).min(u16::MAX as u32) as u16)
        };
        let inner = Rect::new(
            area.x.saturating_add(pad.left),
            area.y.saturating_add(offset),
            area.width.saturating_sub(pad.left.saturating_add(pad.right)),
            area.height.saturating_sub(offset),
        );
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut paragraph = Paragraph::new(self.text.clone())
            .style(self.style)
            .scroll((scroll, 0));
        if self.template.wrap {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        paragraph.render(inner, buf);
    }
}
