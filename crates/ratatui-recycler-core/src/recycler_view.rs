use crate::adapter::RecyclerAdapter;
use crate::entry::DocumentContext;
use crate::error::AdapterError;
use crate::holder::Holder;
use crate::node::Node;
use crate::registry::ViewType;
use crate::theme::Theme;
use crate::viewport;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry as MapEntry;
use std::sync::Arc;
use virtualizer::Align;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollCommand {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    PrevItem,
    NextItem,
}

#[derive(Clone, Debug)]
pub struct RecyclerViewOptions {
    pub show_scrollbar: bool,
    pub overscan: usize,
    pub gap: u32,
    /// Key virtualizer items by [`crate::entry::Entry::id`] instead of by position.
    pub stable_ids: bool,
    pub max_scrap_per_type: usize,
    pub estimated_item_height: u32,
    pub style: Style,
    pub scrollbar_style: Style,
}

impl Default for RecyclerViewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            overscan: 2,
            gap: 0,
            stable_ids: true,
            max_scrap_per_type: 8,
            estimated_item_height: 1,
            style: Style::default(),
            scrollbar_style: Style::default(),
        }
    }
}

struct Attached {
    view_type: ViewType,
    holder: Holder,
}

/// Virtualized list that materializes only the visible items of a [`RecyclerAdapter`].
///
/// Holders scrolled out of view go to a scrap pool keyed by [`ViewType`] and are rebound to
/// new positions of the same type instead of being created again.
pub struct RecyclerView {
    pub viewport: ViewportState,
    options: RecyclerViewOptions,
    adapter: RecyclerAdapter,
    virtualizer: Virtualizer,
    attached: HashMap<usize, Attached>,
    scrap: HashMap<ViewType, Vec<Holder>>,
    keys: Arc<Vec<u64>>,
    cached_width: Option<u16>,
    created: usize,
}

impl RecyclerView {
    pub fn new(adapter: RecyclerAdapter) -> Self {
        Self::with_options(adapter, RecyclerViewOptions::default())
    }

    pub fn with_options(adapter: RecyclerAdapter, options: RecyclerViewOptions) -> Self {
        let virtualizer = Self::make_virtualizer(adapter.count(), &options);
        let mut view = Self {
            viewport: ViewportState::default(),
            options,
            adapter,
            virtualizer,
            attached: HashMap::new(),
            scrap: HashMap::new(),
            keys: Arc::new(Vec::new()),
            cached_width: None,
            created: 0,
        };
        view.install_keys();
        view
    }

    pub fn options(&self) -> &RecyclerViewOptions {
        &self.options
    }

    pub fn adapter(&self) -> &RecyclerAdapter {
        &self.adapter
    }

    pub fn submit(&mut self, context: Arc<dyn DocumentContext>, root: Node) {
        self.adapter.submit(context, root);
        self.notify_data_set_changed();
    }

    pub fn submit_items(&mut self, context: Arc<dyn DocumentContext>, items: Vec<Node>) {
        self.adapter.submit_items(context, items);
        self.notify_data_set_changed();
    }

    pub fn submit_markdown(&mut self, context: Arc<dyn DocumentContext>, markdown: &str) {
        self.adapter.submit_markdown(context, markdown);
        self.notify_data_set_changed();
    }

    /// Invalidates every bound holder after the adapter's items changed.
    pub fn notify_data_set_changed(&mut self) {
        let positions = self.attached.keys().copied().collect::<Vec<_>>();
        for position in positions {
            self.recycle(position);
        }
        let count = self.adapter.count();
        if self.options.stable_ids {
            self.virtualizer.set_count(count);
        } else {
            self.virtualizer = Self::make_virtualizer(count, &self.options);
        }
        self.install_keys();
        self.viewport.y = 0;
        self.virtualizer.set_scroll_offset(0);
        tracing::debug!(items = count, "data set changed");
    }

    pub fn created_holders(&self) -> usize {
        self.created
    }

    pub fn attached_len(&self) -> usize {
        self.attached.len()
    }

    pub fn scrap_len(&self) -> usize {
        self.scrap.values().map(Vec::len).sum()
    }

    /// First item intersecting the top of the viewport.
    pub fn first_visible(&self) -> Option<usize> {
        self.virtualizer
            .index_at_offset(self.virtualizer.scroll_offset())
    }

    pub fn scroll_to_item(&mut self, position: usize) {
        let count = self.adapter.count();
        if count == 0 {
            return;
        }
        self.sync_virtualizer(count);
        self.virtualizer
            .scroll_to_index(position.min(count - 1), Align::Start);
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        self.viewport.clamp();
    }

    pub fn apply(&mut self, command: ScrollCommand) -> bool {
        let count = self.adapter.count();
        if count == 0 {
            self.viewport.to_top();
            return false;
        }
        self.sync_virtualizer(count);
        let before = self.viewport.y;
        match command {
            ScrollCommand::LineUp => self.viewport.scroll_y_by(-1),
            ScrollCommand::LineDown => self.viewport.scroll_y_by(1),
            ScrollCommand::PageUp => self.viewport.page_up(),
            ScrollCommand::PageDown => self.viewport.page_down(),
            ScrollCommand::Top => self.viewport.to_top(),
            ScrollCommand::Bottom => self.viewport.to_bottom(),
            ScrollCommand::PrevItem | ScrollCommand::NextItem => {
                let current = self.first_visible().unwrap_or(0);
                let target = if command == ScrollCommand::NextItem {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                self.scroll_to_item(target);
                return self.viewport.y != before;
            }
        }
        self.virtualizer.set_scroll_offset(self.viewport.y as u64);
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        self.viewport.y != before
    }

    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
    ) -> Result<(), AdapterError> {
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }

        let (content_area, scrollbar_x) = if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };

        self.viewport.set_viewport_height(content_area.height);
        if self.cached_width != Some(content_area.width) {
            // Measured heights depend on the width; start over with estimates.
            self.cached_width = Some(content_area.width);
            self.virtualizer = Self::make_virtualizer(self.adapter.count(), &self.options);
            self.install_keys();
        }

        let count = self.adapter.count();
        self.sync_virtualizer(count);

        let base_style = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        buf.set_style(content_area, base_style);

        let scroll = self.virtualizer.scroll_offset() as i64;
        let window = self
            .virtualizer
            .get_virtual_items()
            .into_iter()
            .map(|item| (item.index, item.start as i64, item.size as u32))
            .collect::<Vec<_>>();

        let visible = window.iter().map(|(idx, _, _)| *idx).collect::<HashSet<_>>();
        let stale = self
            .attached
            .keys()
            .copied()
            .filter(|p| !visible.contains(p))
            .collect::<Vec<_>>();
        for position in stale {
            self.recycle(position);
        }

        let mut measurements: Vec<(usize, u32)> = Vec::new();
        for (idx, start, size) in window {
            let holder = self.attach(idx, theme)?;
            // Zero-sized items would pull the rest of the list into the window.
            let measured = holder.height(content_area.width).max(1);
            if measured != size {
                measurements.push((idx, measured));
            }

            let rel_start = start - scroll;
            let clip_top = (-rel_start).max(0) as u32;
            let visible_start = rel_start.max(0).min(u16::MAX as i64) as u16;
            let remaining_h = content_area.height.saturating_sub(visible_start);
            let visible_h = size.saturating_sub(clip_top).min(remaining_h as u32) as u16;
            if visible_h == 0 {
                continue;
            }
            let item_area = Rect::new(
                content_area.x,
                content_area.y + visible_start,
                content_area.width,
                visible_h,
            );
            holder.render(item_area, buf, clip_top);
        }

        for (idx, measured) in measurements {
            self.virtualizer.measure(idx, measured);
        }
        self.viewport.set_content_height(self.total_size_u32());
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        self.viewport.clamp();

        if let Some(sb_x) = scrollbar_x {
            viewport::render_scrollbar(
                Rect::new(sb_x, area.y, 1, area.height),
                buf,
                &self.viewport,
                self.options.scrollbar_style,
            );
        }
        Ok(())
    }

    fn attach(&mut self, position: usize, theme: &Theme) -> Result<&mut Holder, AdapterError> {
        match self.attached.entry(position) {
            MapEntry::Occupied(slot) => Ok(&mut slot.into_mut().holder),
            MapEntry::Vacant(slot) => {
                let view_type = self.adapter.view_type(position)?;
                let pooled = self.scrap.get_mut(&view_type).and_then(Vec::pop);
                let mut holder = match pooled {
                    Some(holder) => {
                        tracing::trace!(position, view_type = view_type.get(), "reusing holder");
                        holder
                    }
                    None => {
                        self.created += 1;
                        self.adapter.create_holder(theme, view_type)?
                    }
                };
                self.adapter.bind_holder(&mut holder, position)?;
                Ok(&mut slot.insert(Attached { view_type, holder }).holder)
            }
        }
    }

    fn recycle(&mut self, position: usize) {
        let Some(Attached {
            view_type,
            mut holder,
        }) = self.attached.remove(&position)
        else {
            return;
        };
        tracing::trace!(position, view_type = view_type.get(), "recycling holder");
        let pool = self.scrap.entry(view_type).or_default();
        if pool.len() < self.options.max_scrap_per_type {
            holder.reset();
            pool.push(holder);
        }
    }

    fn install_keys(&mut self) {
        if !self.options.stable_ids {
            return;
        }
        let keys = (0..self.adapter.count())
            .map(|position| {
                self.adapter
                    .item_id(position)
                    .map_or(position as u64, |id| id as u64)
            })
            .collect::<Vec<_>>();
        self.keys = Arc::new(keys);
        let keys = self.keys.clone();
        self.virtualizer
            .set_get_item_key(move |idx| keys.get(idx).copied().unwrap_or(idx as u64));
    }

    fn sync_virtualizer(&mut self, count: usize) {
        self.virtualizer.set_count(count);
        self.virtualizer
            .set_viewport_size(self.viewport.viewport_h as u32);
        self.virtualizer.set_overscan(self.options.overscan);
        self.virtualizer.set_gap(self.options.gap);
        self.virtualizer.set_scroll_offset(self.viewport.y as u64);
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        self.viewport.set_content_height(self.total_size_u32());
    }

    fn total_size_u32(&self) -> u32 {
        self.virtualizer.get_total_size().min(u32::MAX as u64) as u32
    }

    fn make_virtualizer(count: usize, options: &RecyclerViewOptions) -> Virtualizer {
        let estimate = options.estimated_item_height.max(1);
        let mut opts = VirtualizerOptions::new(count, move |_| estimate);
        opts.overscan = options.overscan;
        let mut virtualizer = Virtualizer::new(opts);
        virtualizer.set_gap(options.gap);
        virtualizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holder::Template;
    use crate::node::NodeKind;
    use crate::node::NodeVariant;
    use crate::registry::AdapterBuilder;
    use ratatui::text::Text;

    struct LinesContext;

    impl DocumentContext for LinesContext {
        fn parse(&self, input: &str) -> Node {
            let blocks = input.lines().enumerate().map(|(i, line)| {
                let kind = if line.starts_with('#') {
                    NodeKind::Heading { level: 1 }
                } else {
                    NodeKind::Paragraph
                };
                Node::new(kind)
                    .with_span(i..i + 1)
                    .with_children([Node::text(line)])
            });
            Node::new(NodeKind::Document).with_children(blocks)
        }

        fn render(&self, node: &Node) -> Text<'static> {
            Text::from(node.literal_text())
        }
    }

    fn document(n: usize) -> String {
        (0..n)
            .map(|i| {
                if i % 5 == 0 {
                    format!("# heading {i}")
                } else {
                    format!("paragraph {i}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn view() -> RecyclerView {
        let adapter = AdapterBuilder::new()
            .include(
                NodeVariant::Heading,
                crate::entry::SimpleEntry::new(Template::new("heading")),
            )
            .default_template(Template::new("paragraph"))
            .build();
        RecyclerView::with_options(
            adapter,
            RecyclerViewOptions {
                overscan: 0,
                show_scrollbar: false,
                ..Default::default()
            },
        )
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn renders_only_the_visible_window() {
        let mut v = view();
        v.submit_markdown(Arc::new(LinesContext), &document(20));
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &Theme::default()).unwrap();

        assert_eq!(v.attached_len(), 3);
        assert_eq!(row(&buf, 0), "# heading 0");
        assert_eq!(row(&buf, 2), "paragraph 2");
    }

    #[test]
    fn scrolling_reuses_holders_from_the_scrap_pool() {
        let mut v = view();
        v.submit_markdown(Arc::new(LinesContext), &document(20));
        let area = Rect::new(0, 0, 20, 3);
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &theme).unwrap();
        let created = v.created_holders();

        for _ in 0..10 {
            v.apply(ScrollCommand::PageDown);
            let mut buf = Buffer::empty(area);
            v.render(area, &mut buf, &theme).unwrap();
        }
        assert!(v.created_holders() <= created + 1);
        assert_eq!(v.attached_len(), 3);
    }

    #[test]
    fn new_document_returns_holders_to_the_pool() {
        let mut v = view();
        v.submit_markdown(Arc::new(LinesContext), &document(20));
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &Theme::default()).unwrap();

        v.submit_markdown(Arc::new(LinesContext), &document(2));
        assert_eq!(v.attached_len(), 0);
        assert_eq!(v.scrap_len(), 3);
        assert_eq!(v.adapter().count(), 2);
    }

    #[test]
    fn empty_holders_keep_the_window_bounded() {
        let adapter = AdapterBuilder::new().build();
        let mut v = RecyclerView::with_options(
            adapter,
            RecyclerViewOptions {
                overscan: 0,
                show_scrollbar: false,
                ..Default::default()
            },
        );
        v.submit_markdown(Arc::new(LinesContext), &document(2000));
        let area = Rect::new(0, 0, 20, 5);
        let theme = Theme::default();
        for _ in 0..10 {
            let mut buf = Buffer::empty(area);
            v.render(area, &mut buf, &theme).unwrap();
            assert!(v.attached_len() <= 5);
        }
        v.apply(ScrollCommand::PageDown);
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &theme).unwrap();
        assert!(v.attached_len() <= 5);
        assert!(v.created_holders() <= 10);
    }

    #[test]
    fn empty_adapter_renders_nothing() {
        let mut v = view();
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &Theme::default()).unwrap();
        assert_eq!(v.created_holders(), 0);
        assert!(!v.apply(ScrollCommand::PageDown));
    }
}
