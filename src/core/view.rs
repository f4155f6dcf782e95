//! # Reactive Views
//!
//! Two small observable containers the browsers render from:
//!
//! - [`ReactiveListView`]: an untouched source list plus the subset that
//!   passes the active filter. Changing the filter recomputes the subset from
//!   scratch and notifies listeners.
//! - [`ReactiveItemView`]: a single current item that can be swapped out,
//!   notifying listeners with the new item.
//!
//! Listeners are plain closures. The TUI registers one that raises its
//! "content changed" flag so the next frame rebuilds cached layout.

type Predicate<T> = Box<dyn Fn(&T) -> bool>;
type ListListener<T> = Box<dyn FnMut(&[T])>;
type ItemListener<T> = Box<dyn FnMut(&T)>;

/// Something a free-text filter can match against.
pub trait Searchable {
    fn matches(&self, query: &str) -> bool;
}

pub struct ReactiveListView<T> {
    source: Vec<T>,
    predicate: Predicate<T>,
    visible: Vec<T>,
    listeners: Vec<ListListener<T>>,
}

impl<T: Clone> ReactiveListView<T> {
    /// Starts with an accept-all filter.
    pub fn new(source: Vec<T>) -> Self {
        let visible = source.clone();
        Self {
            source,
            predicate: Box::new(|_| true),
            visible,
            listeners: Vec::new(),
        }
    }

    pub fn set_filter(&mut self, predicate: impl Fn(&T) -> bool + 'static) -> &[T] {
        self.predicate = Box::new(predicate);
        self.visible = self
            .source
            .iter()
            .filter(|item| (self.predicate)(*item))
            .cloned()
            .collect();

        for listener in &mut self.listeners {
            listener(&self.visible);
        }
        &self.visible
    }

    pub fn reset(&mut self) -> &[T] {
        self.set_filter(|_| true)
    }

    pub fn original(&self) -> &[T] {
        &self.source
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[T]) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

impl<T: Clone + Searchable> ReactiveListView<T> {
    /// Filter to items matching `query`; an empty query shows everything.
    pub fn search(&mut self, query: &str) -> &[T] {
        let query = query.to_string();
        self.set_filter(move |item: &T| item.matches(&query))
    }
}

pub struct ReactiveItemView<T> {
    current: T,
    listeners: Vec<ItemListener<T>>,
}

impl<T> ReactiveItemView<T> {
    pub fn new(item: T) -> Self {
        Self {
            current: item,
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Swap in `item` and return the one it replaced.
    pub fn replace(&mut self, item: T) -> T {
        let previous = std::mem::replace(&mut self.current, item);
        for listener in &mut self.listeners {
            listener(&self.current);
        }
        previous
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    impl Searchable for &'static str {
        fn matches(&self, query: &str) -> bool {
            self.contains(query)
        }
    }

    fn names() -> Vec<&'static str> {
        vec!["vim", "emacs", "visual-studio-code", "sublime", "iterm"]
    }

    #[test]
    fn test_initial_view_shows_everything() {
        let view = ReactiveListView::new(names());
        assert_eq!(view.visible(), names().as_slice());
    }

    #[test]
    fn test_filter_keeps_source_order() {
        let mut view = ReactiveListView::new(names());
        let visible = view.set_filter(|n| n.contains('i'));
        assert_eq!(visible, &["vim", "visual-studio-code", "sublime", "iterm"]);
    }

    #[test]
    fn test_original_untouched_by_filters() {
        let mut view = ReactiveListView::new(names());
        view.set_filter(|n| n.len() > 4);
        view.set_filter(|_| false);
        view.search("vi");
        assert_eq!(view.original(), names().as_slice());
        assert_eq!(view.visible(), &["vim", "visual-studio-code"]);
    }

    #[test]
    fn test_filter_is_recomputed_not_narrowed() {
        let mut view = ReactiveListView::new(names());
        view.search("vim");
        view.search("e");
        assert_eq!(view.visible(), &["emacs", "visual-studio-code", "sublime", "iterm"]);
    }

    #[test]
    fn test_reset_restores_all() {
        let mut view = ReactiveListView::new(names());
        view.search("zzz");
        assert!(view.visible().is_empty());
        assert_eq!(view.reset().len(), 5);
    }

    #[test]
    fn test_listeners_receive_visible_slice() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut view = ReactiveListView::new(names());
        view.subscribe(move |visible| sink.borrow_mut().push(visible.len()));
        view.search("e");
        view.reset();

        assert_eq!(*seen.borrow(), vec![4, 5]);
    }

    #[test]
    fn test_item_replace_returns_previous_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut view = ReactiveItemView::new("py");
        view.subscribe(move |item| sink.borrow_mut().push(*item));

        assert_eq!(view.replace("rs"), "py");
        assert_eq!(view.replace("go"), "rs");
        assert_eq!(*view.current(), "go");
        assert_eq!(*seen.borrow(), vec!["rs", "go"]);
    }
}
