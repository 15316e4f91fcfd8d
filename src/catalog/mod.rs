use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod pagination;

pub use pagination::{PaginationState, PAGE_SIZE};

/// Catalog keyed by sound name. Iteration order is the display order.
pub type SoundMap = IndexMap<String, SoundItem>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundItem {
    pub price: u64,
    #[serde(rename = "cooldown")]
    pub cooldown_millis: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl SoundItem {
    pub fn new(price: u64, cooldown_millis: u64) -> Self {
        Self {
            price,
            cooldown_millis,
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    items: SoundMap,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing keys keep their position and take the incoming value; new
    /// keys are appended.
    pub fn merge(&mut self, incoming: SoundMap) {
        for (id, item) in incoming {
            self.items.insert(id, item);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<SoundItem> {
        self.items.shift_remove(id)
    }

    pub fn snapshot(&self) -> &SoundMap {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&SoundItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The store together with its page cursor. Every store mutation goes
/// through here so the cursor is re-clamped in the same step.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    store: CollectionStore,
    pagination: PaginationState,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, incoming: SoundMap) {
        self.store.merge(incoming);
        self.pagination.recompute(self.store.len());
    }

    pub fn remove(&mut self, id: &str) -> Option<SoundItem> {
        let removed = self.store.remove(id);
        self.pagination.recompute(self.store.len());
        removed
    }

    pub fn change_page(&mut self, requested: i64) -> bool {
        self.pagination.change_page(requested)
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pagination.previous_page()
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn snapshot(&self) -> &SoundMap {
        self.store.snapshot()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }

    pub fn max_page(&self) -> usize {
        self.pagination.max_page()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Ids on the current page, or the whole catalog if that page is empty.
    pub fn visible_keys(&self) -> Vec<&str> {
        let keys = self.store.keys();
        pagination::visible_slice(
            &keys,
            self.pagination.current_page(),
            self.pagination.page_size(),
        )
        .to_vec()
    }

    pub fn visible_rows(&self) -> Vec<(&str, &SoundItem)> {
        self.visible_keys()
            .into_iter()
            .filter_map(|id| self.store.get(id).map(|item| (id, item)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_map(names: &[&str]) -> SoundMap {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), SoundItem::new(idx as u64 * 10, 1_000)))
        .collect()
}
