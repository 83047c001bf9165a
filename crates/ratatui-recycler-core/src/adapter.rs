//! The adapter sitting between a virtualized list and a document tree.
//!
//! It answers the four questions every virtualization host asks while scrolling: how many
//! items there are, which holder pool a position belongs to, which stable id it has, and how to
//! create and bind a holder. Each answer is delegated to the [`Entry`] registered for the node
//! variant at that position.
//!
//! ```ignore
//! let mut adapter = AdapterBuilder::new()
//!     .include(NodeVariant::Heading, heading_entry)
//!     .default_template(Template::new("paragraph"))
//!     .build();
//! adapter.submit(context, document);
//! for position in 0..adapter.count() {
//!     let mut holder = adapter.create_holder(&theme, adapter.view_type(position)?)?;
//!     adapter.bind_holder(&mut holder, position)?;
//! }
//! ```
use crate::entry::DocumentContext;
use crate::entry::Entry;
use crate::error::AdapterError;
use crate::holder::Holder;
use crate::holder::Inflater;
use crate::node::Node;
use crate::node::NodeVariant;
use crate::reducer::Reducer;
use crate::registry::AdapterBuilder;
use crate::registry::EntryRegistry;
use crate::registry::ViewType;
use crate::theme::Theme;
use std::sync::Arc;

struct Submission {
    context: Arc<dyn DocumentContext>,
    items: Vec<Node>,
}

pub struct RecyclerAdapter {
    registry: EntryRegistry,
    reducer: Box<dyn Reducer>,
    inflater: Option<Inflater>,
    current: Option<Submission>,
}

impl RecyclerAdapter {
    pub fn builder() -> AdapterBuilder {
        AdapterBuilder::new()
    }

    pub(crate) fn new(registry: EntryRegistry, reducer: Box<dyn Reducer>) -> Self {
        Self {
            registry,
            reducer,
            inflater: None,
            current: None,
        }
    }

    pub fn registry(&self) -> &EntryRegistry {
        &self.registry
    }

    /// Parses `markdown` with the context's parser and submits the result.
    pub fn submit_markdown(&mut self, context: Arc<dyn DocumentContext>, markdown: &str) {
        let root = context.parse(markdown);
        self.submit(context, root);
    }

    /// Reduces `root` into items and installs them together with `context`.
    ///
    /// The host must invalidate its holders afterwards; the adapter does not notify anyone.
    pub fn submit(&mut self, context: Arc<dyn DocumentContext>, root: Node) {
        let items = self.reducer.reduce(root);
        self.submit_items(context, items);
    }

    /// Installs already flattened `items`, skipping the reducer.
    pub fn submit_items(&mut self, context: Arc<dyn DocumentContext>, items: Vec<Node>) {
        self.registry.clear_all();
        tracing::debug!(items = items.len(), "submitted document");
        self.current = Some(Submission { context, items });
    }

    pub fn count(&self) -> usize {
        self.current.as_ref().map_or(0, |s| s.items.len())
    }

    pub fn items(&self) -> &[Node] {
        match &self.current {
            Some(current) => &current.items,
            None => &[],
        }
    }

    /// Stable ids are always derived through the entries.
    pub fn has_stable_ids(&self) -> bool {
        true
    }

    pub fn view_type_of(&self, variant: NodeVariant) -> ViewType {
        self.registry.view_type_of(variant)
    }

    pub fn view_type(&self, position: usize) -> Result<ViewType, AdapterError> {
        let node = self.item(position)?;
        Ok(self.view_type_of(node.variant()))
    }

    pub fn item_id(&self, position: usize) -> Result<i64, AdapterError> {
        let node = self.item(position)?;
        let view_type = self.view_type_of(node.variant());
        Ok(self.registry.entry(view_type).id(node))
    }

    /// Creates a holder for `view_type`. `parent` seeds the inflater on first use; later calls
    /// keep using that inflater.
    pub fn create_holder(
        &mut self,
        parent: &Theme,
        view_type: ViewType,
    ) -> Result<Holder, AdapterError> {
        let inflater = self
            .inflater
            .get_or_insert_with(|| Inflater::from_parent(parent));
        tracing::trace!(view_type = view_type.get(), "creating holder");
        self.registry
            .entry(view_type)
            .create_holder(inflater)
            .map_err(|source| AdapterError::Create { view_type, source })
    }

    pub fn bind_holder(
        &mut self,
        holder: &mut Holder,
        position: usize,
    ) -> Result<(), AdapterError> {
        let count = self.count();
        let Some(current) = self.current.as_ref() else {
            return Err(AdapterError::OutOfRange { position, count });
        };
        let Some(node) = current.items.get(position) else {
            return Err(AdapterError::OutOfRange { position, count });
        };
        let variant = node.variant();
        let view_type = self.registry.view_type_of(variant);
        let entry: &mut dyn Entry = self.registry.entry_mut(view_type);
        entry
            .bind_holder(current.context.as_ref(), holder, node)
            .map_err(|source| AdapterError::Bind {
                position,
                variant,
                source,
            })
    }

    fn item(&self, position: usize) -> Result<&Node, AdapterError> {
        self.items()
            .get(position)
            .ok_or(AdapterError::OutOfRange {
                position,
                count: self.count(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SimpleEntry;
    use crate::error::EntryError;
    use crate::holder::Template;
    use crate::node::NodeKind;
    use pretty_assertions::assert_eq;
    use ratatui::text::Text;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct PlainContext;

    impl DocumentContext for PlainContext {
        fn parse(&self, input: &str) -> Node {
            let blocks = input
                .split("\n\n")
                .filter(|b| !b.trim().is_empty())
                .map(|b| match b.strip_prefix("# ") {
                    Some(title) => Node::new(NodeKind::Heading { level: 1 })
                        .with_children([Node::text(title.trim())]),
                    None => Node::new(NodeKind::Paragraph).with_children([Node::text(b.trim())]),
                });
            Node::new(NodeKind::Document).with_children(blocks)
        }

        fn render(&self, node: &Node) -> Text<'static> {
            Text::from(node.literal_text())
        }
    }

    /// Records which entry bound which text, and what it still remembered from earlier binds.
    struct Recording {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        seen: Vec<String>,
    }

    impl Recording {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                log: log.clone(),
                seen: Vec::new(),
            }
        }
    }

    impl Entry for Recording {
        fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
            Ok(inflater.inflate(&Template::new(self.name)))
        }

        fn bind_holder(
            &mut self,
            context: &dyn DocumentContext,
            holder: &mut Holder,
            node: &Node,
        ) -> Result<(), EntryError> {
            let text = node.literal_text();
            self.log.borrow_mut().push(format!(
                "{}:{}:{}",
                self.name,
                text,
                self.seen.join("|")
            ));
            self.seen.push(text);
            holder.set_text(context.render(node));
            Ok(())
        }

        fn clear(&mut self) {
            self.seen.clear();
        }
    }

    struct Failing;

    impl Entry for Failing {
        fn create_holder(&self, _inflater: &Inflater) -> Result<Holder, EntryError> {
            Err(EntryError::msg("no template"))
        }

        fn bind_holder(
            &mut self,
            _context: &dyn DocumentContext,
            _holder: &mut Holder,
            _node: &Node,
        ) -> Result<(), EntryError> {
            Err(EntryError::msg("broken"))
        }
    }

    fn context() -> Arc<dyn DocumentContext> {
        Arc::new(PlainContext)
    }

    #[test]
    fn count_is_zero_before_submit() {
        let mut adapter = AdapterBuilder::new().build();
        assert_eq!(adapter.count(), 0);
        assert!(adapter.items().is_empty());
        assert!(matches!(
            adapter.view_type(0),
            Err(AdapterError::OutOfRange {
                position: 0,
                count: 0
            })
        ));
        assert!(matches!(
            adapter.item_id(0),
            Err(AdapterError::OutOfRange {
                position: 0,
                count: 0
            })
        ));

        let mut holder = adapter
            .create_holder(&Theme::default(), ViewType::DEFAULT)
            .unwrap();
        assert!(matches!(
            adapter.bind_holder(&mut holder, 0),
            Err(AdapterError::OutOfRange {
                position: 0,
                count: 0
            })
        ));
    }

    #[test]
    fn heading_and_paragraphs_dispatch_to_their_entries() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = AdapterBuilder::new()
            .include(NodeVariant::Heading, Recording::new("heading", &log))
            .default_entry(Recording::new("default", &log))
            .build();
        adapter.submit_markdown(context(), "# Title\n\nfirst\n\nsecond");

        assert_eq!(adapter.count(), 3);
        let heading = adapter.view_type_of(NodeVariant::Heading);
        assert!(!heading.is_default());
        assert_eq!(adapter.view_type(0).unwrap(), heading);
        assert_eq!(adapter.view_type(1).unwrap(), ViewType::DEFAULT);
        assert_eq!(adapter.view_type(2).unwrap(), ViewType::DEFAULT);

        let theme = Theme::default();
        for position in 0..adapter.count() {
            let view_type = adapter.view_type(position).unwrap();
            let mut holder = adapter.create_holder(&theme, view_type).unwrap();
            adapter.bind_holder(&mut holder, position).unwrap();
        }
        assert_eq!(
            log.borrow().as_slice(),
            &[
                "heading:Title:".to_string(),
                "default:first:".to_string(),
                "default:second:first".to_string(),
            ]
        );
    }

    #[test]
    fn out_of_range_positions_fail_fast() {
        let mut adapter = AdapterBuilder::new().build();
        adapter.submit_markdown(context(), "a\n\nb\n\nc");
        assert_eq!(adapter.count(), 3);
        assert!(matches!(
            adapter.view_type(5),
            Err(AdapterError::OutOfRange {
                position: 5,
                count: 3
            })
        ));
        assert!(adapter.item_id(3).is_err());

        let mut holder = adapter
            .create_holder(&Theme::default(), ViewType::DEFAULT)
            .unwrap();
        assert!(matches!(
            adapter.bind_holder(&mut holder, 3),
            Err(AdapterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn item_ids_are_deterministic() {
        let mut adapter = AdapterBuilder::new()
            .default_template(Template::new("p"))
            .build();
        adapter.submit_markdown(context(), "same\n\nsame\n\nother");
        assert_eq!(adapter.item_id(0).unwrap(), adapter.item_id(0).unwrap());
        assert_ne!(adapter.item_id(0).unwrap(), adapter.item_id(2).unwrap());
    }

    #[test]
    fn new_document_clears_entry_state() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = AdapterBuilder::new()
            .default_entry(Recording::new("default", &log))
            .build();
        let theme = Theme::default();

        adapter.submit_markdown(context(), "one\n\ntwo");
        let mut holder = adapter.create_holder(&theme, ViewType::DEFAULT).unwrap();
        adapter.bind_holder(&mut holder, 0).unwrap();
        adapter.bind_holder(&mut holder, 1).unwrap();

        adapter.submit_markdown(context(), "three");
        assert_eq!(adapter.count(), 1);
        adapter.bind_holder(&mut holder, 0).unwrap();

        assert_eq!(log.borrow().last().map(String::as_str), Some("default:three:"));
        assert_eq!(holder.text(), &Text::from("three"));
    }

    #[test]
    fn submit_items_skips_the_reducer() {
        let mut adapter = AdapterBuilder::new()
            .reducer(|_root: Node| -> Vec<Node> { panic!("reducer must not run") })
            .build();
        let items = vec![Node::text("a"), Node::text("b")];
        adapter.submit_items(context(), items.clone());
        assert_eq!(adapter.items(), items.as_slice());
    }

    #[test]
    fn custom_reducer_controls_items() {
        let mut adapter = AdapterBuilder::new()
            .reducer(|mut root: Node| {
                root.detach_children()
                    .into_iter()
                    .filter(|n| n.variant() == NodeVariant::Heading)
                    .collect::<Vec<_>>()
            })
            .build();
        adapter.submit_markdown(context(), "# a\n\nb\n\n# c");
        assert_eq!(adapter.count(), 2);
        assert_eq!(adapter.items()[1].literal_text(), "c");
    }

    #[test]
    fn entry_failures_propagate() {
        let mut adapter = AdapterBuilder::new()
            .include(NodeVariant::Paragraph, Failing)
            .default_entry(SimpleEntry::new(Template::new("p")))
            .build();
        adapter.submit_markdown(context(), "body");
        let view_type = adapter.view_type(0).unwrap();
        let theme = Theme::default();
        assert!(matches!(
            adapter.create_holder(&theme, view_type),
            Err(AdapterError::Create { .. })
        ));

        let mut holder = adapter.create_holder(&theme, ViewType::DEFAULT).unwrap();
        let err = adapter.bind_holder(&mut holder, 0).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Bind {
                position: 0,
                variant: NodeVariant::Paragraph,
                ..
            }
        ));
    }
}
