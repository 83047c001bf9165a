use crate::error::EntryError;
use crate::holder::Holder;
use crate::holder::Inflater;
use crate::holder::Template;
use crate::node::Node;
use ratatui::text::Text;
use std::collections::HashMap;

/// Document-wide services handed to every bind: parsing for raw input and node rendering.
pub trait DocumentContext {
    fn parse(&self, input: &str) -> Node;

    fn render(&self, node: &Node) -> Text<'static>;
}

/// Renders one node variant into recycled holders.
///
/// Entries live as long as the adapter. Anything an entry caches about the nodes of the current
/// document must be dropped in [`Entry::clear`], which the adapter calls before every new
/// document is installed.
pub trait Entry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError>;

    fn bind_holder(
        &mut self,
        context: &dyn DocumentContext,
        holder: &mut Holder,
        node: &Node,
    ) -> Result<(), EntryError>;

    fn id(&self, node: &Node) -> i64 {
        node.stable_id()
    }

    fn clear(&mut self) {}
}

/// Renders a node through [`DocumentContext::render`] into a holder inflated from `template`.
#[derive(Clone, Debug)]
pub struct SimpleEntry {
    template: Template,
    cache: HashMap<i64, Text<'static>>,
}

impl SimpleEntry {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            cache: HashMap::new(),
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Entry for SimpleEntry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
        Ok(inflater.inflate(&self.template))
    }

    fn bind_holder(
        &mut self,
        context: &dyn DocumentContext,
        holder: &mut Holder,
        node: &Node,
    ) -> Result<(), EntryError> {
        let text = self
            .cache
            .entry(node.stable_id())
            .or_insert_with(|| context.render(node))
            .clone();
        holder.set_text(text);
        Ok(())
    }

    fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Fallback used when no default entry is configured: holders stay empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyEntry;

impl Entry for EmptyEntry {
    fn create_holder(&self, inflater: &Inflater) -> Result<Holder, EntryError> {
        Ok(inflater.inflate(&Template::default()))
    }

    fn bind_holder(
        &mut self,
        _context: &dyn DocumentContext,
        holder: &mut Holder,
        _node: &Node,
    ) -> Result<(), EntryError> {
        holder.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::theme::Theme;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingContext {
        renders: Cell<usize>,
    }

    impl DocumentContext for CountingContext {
        fn parse(&self, input: &str) -> Node {
            Node::new(NodeKind::Document)
                .with_children([Node::new(NodeKind::Paragraph).with_children([Node::text(input)])])
        }

        fn render(&self, node: &Node) -> Text<'static> {
            self.renders.set(self.renders.get() + 1);
            Text::from(node.literal_text())
        }
    }

    #[test]
    fn simple_entry_renders_once_per_document() {
        let ctx = CountingContext::default();
        let inflater = Inflater::from_parent(&Theme::default());
        let mut entry = SimpleEntry::new(Template::new("p"));
        let node = Node::new(NodeKind::Paragraph).with_children([Node::text("hi")]);

        let mut holder = entry.create_holder(&inflater).unwrap();
        entry.bind_holder(&ctx, &mut holder, &node).unwrap();
        entry.bind_holder(&ctx, &mut holder, &node).unwrap();
        assert_eq!(ctx.renders.get(), 1);
        assert_eq!(holder.text(), &Text::from("hi"));

        entry.clear();
        assert_eq!(entry.cached_len(), 0);
        entry.bind_holder(&ctx, &mut holder, &node).unwrap();
        assert_eq!(ctx.renders.get(), 2);
    }

    #[test]
    fn empty_entry_leaves_holder_blank() {
        let ctx = CountingContext::default();
        let inflater = Inflater::from_parent(&Theme::default());
        let mut entry = EmptyEntry;
        let mut holder = entry.create_holder(&inflater).unwrap();
        holder.set_text(Text::from("stale"));
        entry
            .bind_holder(&ctx, &mut holder, &Node::text("x"))
            .unwrap();
        assert!(holder.is_empty());
        assert_eq!(ctx.renders.get(), 0);
    }
}
