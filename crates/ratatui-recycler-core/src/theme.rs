use ratatui::style::Style;

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub heading: Style,
    pub code_inline: Style,
    pub code_block: Style,
    pub quote: Style,
    pub rule: Style,
    pub link: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            heading: Style::default().cyan().bold(),
            code_inline: Style::default().cyan(),
            code_block: Style::default().yellow(),
            quote: Style::default().dark_gray().italic(),
            rule: Style::default().dark_gray(),
            link: Style::default().blue().underlined(),
        }
    }
}
