//! # Browser State
//!
//! Core state for the two interactive browsers. Domain logic only, no
//! terminal types. Presentation caches live in the `tui` module.
//!
//! ```text
//! BrowserState
//! ├── mode: Mode
//! │   ├── Catalog { view: ReactiveListView<RepositoryRecord>, query }
//! │   └── Samples { cycle: NavigationCycle<Rc<CodeSample>>, view: ReactiveItemView<..> }
//! └── scroll: ScrollPosition        // offset clamped to [0, content - viewport]
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::rc::Rc;

use crate::core::navigation::NavigationCycle;
use crate::core::view::{ReactiveItemView, ReactiveListView};
use crate::remote::types::{CodeSample, RepositoryRecord};

/// Vertical scroll position of the browser body.
///
/// The renderer reports content and viewport heights every frame through
/// [`ScrollPosition::set_bounds`]; every adjustment is clamped against them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    pub offset: u16,
    pub content_height: u16,
    pub viewport_height: u16,
}

impl ScrollPosition {
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn set_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let target = (self.offset as i32 + delta).clamp(0, self.max_offset() as i32);
        self.offset = target as u16;
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_height.max(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_height.max(1) as i32));
    }
}

pub struct CatalogState {
    pub view: ReactiveListView<RepositoryRecord>,
    pub query: String,
    /// Size of the aggregated catalog, hidden entries included.
    pub total: usize,
}

pub struct SampleState {
    pub cycle: NavigationCycle<Rc<CodeSample>>,
    pub view: ReactiveItemView<Rc<CodeSample>>,
}

pub enum Mode {
    Catalog(CatalogState),
    Samples(SampleState),
}

pub struct BrowserState {
    pub mode: Mode,
    pub scroll: ScrollPosition,
}

impl BrowserState {
    /// Catalog browser over `records`. `total` is what the header reports.
    pub fn catalog(records: Vec<RepositoryRecord>, total: usize) -> Self {
        Self {
            mode: Mode::Catalog(CatalogState {
                view: ReactiveListView::new(records),
                query: String::new(),
                total,
            }),
            scroll: ScrollPosition::default(),
        }
    }

    /// Sample browser starting on the first sample. `None` when `samples` is empty.
    pub fn samples(samples: Vec<CodeSample>) -> Option<Self> {
        let cycle = NavigationCycle::new(samples.into_iter().map(Rc::new).collect())?;
        let view = ReactiveItemView::new(Rc::clone(cycle.current()));
        Some(Self {
            mode: Mode::Samples(SampleState { cycle, view }),
            scroll: ScrollPosition::default(),
        })
    }

    /// Register `listener` on whichever view backs the current mode.
    pub fn on_change(&mut self, mut listener: impl FnMut() + 'static) {
        match &mut self.mode {
            Mode::Catalog(catalog) => catalog.view.subscribe(move |_| listener()),
            Mode::Samples(samples) => samples.view.subscribe(move |_| listener()),
        }
    }
}
