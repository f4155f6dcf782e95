//! Circular cursor over an ordered, non-empty sequence.

/// Stepping wraps in both directions. The cursor starts at index 0 and is
/// always in `[0, len)`.
#[derive(Debug, Clone)]
pub struct NavigationCycle<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> NavigationCycle<T> {
    /// Returns `None` for an empty sequence.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self { items, cursor: 0 })
    }

    pub fn advance(&mut self) -> &T {
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[self.cursor]
    }

    pub fn retreat(&mut self) -> &T {
        let len = self.items.len();
        self.cursor = (self.cursor + len - 1) % len;
        &self.items[self.cursor]
    }

    pub fn current(&self) -> &T {
        &self.items[self.cursor]
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}
