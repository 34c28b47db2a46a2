//! examforge-core: Core assessment engine, scoring, and batch scheduling.
//!
//! This crate defines the fundamental data model, traits, and scoring logic
//! that the entire examforge system builds on.

pub mod assessor;
pub mod catalog;
pub mod error;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod report;
pub mod scheduler;
pub mod scoring;
pub mod statistics;
pub mod traits;
