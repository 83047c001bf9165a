use crate::adapter::RecyclerAdapter;
use crate::entry::EmptyEntry;
use crate::entry::Entry;
use crate::entry::SimpleEntry;
use crate::holder::Template;
use crate::node::NodeVariant;
use crate::reducer::Reducer;
use crate::reducer::TopLevelReducer;
use std::collections::HashMap;

/// Holder pool key. Registered variants get dense ids starting at 1 in registration order;
/// [`ViewType::DEFAULT`] groups everything served by the default entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewType(u32);

impl ViewType {
    pub const DEFAULT: ViewType = ViewType(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

pub struct EntryRegistry {
    view_types: HashMap<NodeVariant, ViewType>,
    entries: Vec<Box<dyn Entry>>,
    default_entry: Box<dyn Entry>,
}

impl EntryRegistry {
    pub fn view_type_of(&self, variant: NodeVariant) -> ViewType {
        self.view_types
            .get(&variant)
            .copied()
            .unwrap_or(ViewType::DEFAULT)
    }

    /// Entry for `view_type`; the default entry for [`ViewType::DEFAULT`] and unknown ids.
    pub fn entry(&self, view_type: ViewType) -> &dyn Entry {
        match self.slot(view_type) {
            Some(idx) => self.entries[idx].as_ref(),
            None => self.default_entry.as_ref(),
        }
    }

    pub fn entry_mut(&mut self, view_type: ViewType) -> &mut dyn Entry {
        match self.slot(view_type) {
            Some(idx) => self.entries[idx].as_mut(),
            None => self.default_entry.as_mut(),
        }
    }

    /// Calls [`Entry::clear`] on the default entry, then on every registered entry.
    pub fn clear_all(&mut self) {
        self.default_entry.clear();
        for entry in &mut self.entries {
            entry.clear();
        }
    }

    /// Number of explicitly registered variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn slot(&self, view_type: ViewType) -> Option<usize> {
        let idx = (view_type.get() as usize).checked_sub(1)?;
        (idx < self.entries.len()).then_some(idx)
    }
}

/// Collects entries and the reducer, then freezes them into a [`RecyclerAdapter`].
#[derive(Default)]
pub struct AdapterBuilder {
    view_types: HashMap<NodeVariant, ViewType>,
    entries: Vec<Box<dyn Entry>>,
    default_entry: Option<Box<dyn Entry>>,
    reducer: Option<Box<dyn Reducer>>,
}

impl AdapterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` for `variant`. Registering a variant again replaces its entry and keeps
    /// its view type.
    pub fn include(mut self, variant: NodeVariant, entry: impl Entry + 'static) -> Self {
        match self.view_types.get(&variant) {
            Some(view_type) => {
                tracing::warn!(
                    ?variant,
                    view_type = view_type.get(),
                    "entry registered twice; replacing the previous entry"
                );
                self.entries[view_type.get() as usize - 1] = Box::new(entry);
            }
            None => {
                self.entries.push(Box::new(entry));
                let view_type = ViewType(self.entries.len() as u32);
                self.view_types.insert(variant, view_type);
            }
        }
        self
    }

    pub fn default_entry(mut self, entry: impl Entry + 'static) -> Self {
        self.default_entry = Some(Box::new(entry));
        self
    }

    /// Shorthand for a [`SimpleEntry`] default built from `template`.
    pub fn default_template(self, template: Template) -> Self {
        self.default_entry(SimpleEntry::new(template))
    }

    pub fn reducer(mut self, reducer: impl Reducer + 'static) -> Self {
        self.reducer = Some(Box::new(reducer));
        self
    }

    pub fn build(self) -> RecyclerAdapter {
        let registry = EntryRegistry {
            view_types: self.view_types,
            entries: self.entries,
            default_entry: self
                .default_entry
                .unwrap_or_else(|| Box::new(EmptyEntry)),
        };
        let reducer = self.reducer.unwrap_or_else(|| Box::new(TopLevelReducer));
        RecyclerAdapter::new(registry, reducer)
    }
}
