//! examforge-report: assessment persistence and rendering.
//!
//! Implements the `ResultStore` trait over the local filesystem and renders
//! the human-readable summaries written next to each assessment.

pub mod store;
pub mod summary;

pub use store::FsResultStore;
pub use summary::{render_aggregate, render_summary};
