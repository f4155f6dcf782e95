//! # TUI Components
//!
//! UI pieces for the two browsers and for the plain console output.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `StatusBar`: header and footer lines
//! - `RepoCard` / `DetailCard`: repository panels (ratatui `Widget`s)
//! - `CatalogGrid`: scrollable grid of cards
//! - `SampleView`: scrollable, highlighted code sample
//! - `file_tree`: tree text for the download flow
//!
//! Scroll position is a prop: the core owns it, components only report
//! content and viewport heights back into it while rendering.
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `SearchBox`: owns the search text, emits `SearchEvent::Changed`
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── catalog_grid.rs  (Card grid, shared with `all`)
//! ├── file_tree.rs     (Tree printout for `download`)
//! ├── repo_card.rs     (Catalog and detail cards)
//! ├── sample_view.rs   (Highlighted code sample)
//! ├── search_box.rs    (Filter input)
//! └── status_bar.rs    (Header and footer)
//! ```

pub mod catalog_grid;
pub mod file_tree;
pub mod repo_card;
pub mod sample_view;
pub mod search_box;
pub mod status_bar;

pub use catalog_grid::{CardGrid, CatalogGrid};
pub use repo_card::{DetailCard, RepoCard};
pub use sample_view::SampleView;
pub use search_box::{SearchBox, SearchEvent};
pub use status_bar::StatusBar;
