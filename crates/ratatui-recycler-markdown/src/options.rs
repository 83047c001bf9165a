use pulldown_cmark::Options;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    pub show_heading_markers: bool,
    pub show_link_destinations: bool,
    /// Base for relative link and image destinations.
    pub base_url: Option<String>,
    pub blockquote_prefix: String,
    pub bullet: String,
    pub code_block_indent: u16,
    pub rule_width: u16,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: true,
            show_heading_markers: false,
            show_link_destinations: false,
            base_url: None,
            blockquote_prefix: "| ".to_string(),
            bullet: "• ".to_string(),
            code_block_indent: 4,
            rule_width: 24,
        }
    }
}

impl MarkdownOptions {
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options
    }
}
