//! # Core Application Logic
//!
//! This module contains the browser state machine and the pieces it is
//! built from. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (browser data) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │  Console   │
//!             │  Adapter   │          │  printer   │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `BrowserState`, the two browser modes plus scroll position
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`navigation`]: `NavigationCycle`, a wrapping cursor
//! - [`view`]: `ReactiveListView` / `ReactiveItemView`
//! - [`cache`]: `CacheStore`, TTL-based response cache
//! - [`config`]: layered configuration

pub mod action;
pub mod cache;
pub mod config;
pub mod navigation;
pub mod state;
pub mod view;
