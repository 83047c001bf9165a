use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_recycler::crossterm_input::scroll_command_from_crossterm;
use ratatui_recycler::entry::DocumentContext;
use ratatui_recycler::markdown::MarkdownOptions;
use ratatui_recycler::markdown::MarkdownRenderer;
use ratatui_recycler::markdown::markdown_adapter;
use ratatui_recycler::recycler_view::RecyclerView;
use ratatui_recycler::theme::Theme;
use std::io;
use std::sync::Arc;
use std::time::Duration;

fn sample_markdown() -> String {
    let mut s = String::new();
    for i in 0..500 {
        s.push_str(&format!("## Section {i}\n\n"));
        s.push_str("Only the blocks on screen are bound. ");
        s.push_str("Holders that scroll away return to a pool and are rebound later.\n\n");
        if i % 3 == 0 {
            s.push_str("```rust\nlet adapter = markdown_adapter().build();\n```\n\n");
        }
        if i % 4 == 0 {
            s.push_str("| block | view type |\n|:--|--:|\n| heading | 1 |\n| code | 2 |\n\n");
        }
        if i % 5 == 0 {
            s.push_str("> quoted text\n\n- [x] done\n- [ ] pending\n\n---\n\n");
        }
    }
    s
}

fn main() -> io::Result<()> {
    let markdown = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => sample_markdown(),
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let context: Arc<dyn DocumentContext> = Arc::new(MarkdownRenderer::with_options(
        theme.clone(),
        MarkdownOptions {
            show_link_destinations: true,
            ..Default::default()
        },
    ));
    let mut view = RecyclerView::new(markdown_adapter().build());
    view.submit_markdown(context, &markdown);

    let res = run(&mut terminal, &theme, &mut view);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    view: &mut RecyclerView,
) -> io::Result<()> {
    loop {
        let mut failure = None;
        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let block = Block::default()
                .title("RecyclerView (j/k, ↑/↓, PgUp/PgDn, g/G, [/], q)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            let buf = f.buffer_mut();
            if let Err(err) = view.render(inner, buf, theme) {
                failure = Some(err);
            }

            let first = view.first_visible().unwrap_or(0);
            let pct = view.viewport.percent_y().unwrap_or(0);
            let status_line = format!(
                "item={first}/{}  attached={}  pooled={}  created={}  scroll={pct}%",
                view.adapter().count(),
                view.attached_len(),
                view.scrap_len(),
                view.created_holders(),
            );
            let status_span = Span::styled(status_line, Style::default());
            buf.set_span(status.x, status.y, &status_span, status.width);
        })?;
        if let Some(err) = failure {
            return Err(io::Error::other(err));
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            let ev = crossterm::event::read()?;
            if let Event::Key(key) = &ev
                && key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
            if let Some(cmd) = scroll_command_from_crossterm(ev) {
                view.apply(cmd);
            }
        }
    }
}
