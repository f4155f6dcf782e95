//! # Remote Data
//!
//! Everything that talks to the catalog host.
//!
//! ```text
//! catalog::CatalogClient          (fetch_catalog, fetch_tree, downloads, ...)
//!   ├── paginate::PaginatedFetcher  (count → pages 1..N, fail-fast)
//!   ├── tree::TreeBuilder           (depth-first contents walk)
//!   └── context::FetchContext       (cache check → transport → cache put)
//!         ├── core::cache::CacheStore
//!         └── transport::Transport  (github::GithubTransport via reqwest)
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod github;
pub mod paginate;
pub mod transport;
pub mod tree;
pub mod types;

pub use catalog::{CatalogClient, Endpoints};
pub use error::FetchError;
