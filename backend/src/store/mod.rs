use crate::models::Item;

/// Volatile item storage: append and replace-in-place only.
///
/// Indices are always the contiguous range `[0, len)`. Nothing is removed
/// except by [`ItemStore::reset`], which exists for test isolation.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns its index (the previous length).
    pub fn append(&mut self, item: Item) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Overwrites the record at `index`, returning the one it replaced.
    ///
    /// Returns `None` without touching the store when `index` is out of range.
    pub fn replace(&mut self, index: usize, item: Item) -> Option<Item> {
        let slot = self.items.get_mut(index)?;
        Some(std::mem::replace(slot, item))
    }

    /// Maps a signed index from the wire onto an existing slot.
    pub fn resolve(&self, index: i64) -> Option<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.items.len())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }
}
