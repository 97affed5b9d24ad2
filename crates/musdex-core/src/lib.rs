//! Reconciliation engine for musdex
//!
//! musdex keeps archive containers (zip and zip-based document formats) in
//! sync with an extracted, version-controlled copy of their contents.
//!
//! - [`Config`] is the registry of managed archives
//! - [`Index`] records the last-known timestamp of every materialized path
//! - [`Session`] loads both for one run and persists them when it ends
//! - [`Engine`] runs `add`, `extract` and `combine` and returns a
//!   [`RunReport`]

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod report;
pub mod session;

pub use config::{ArchiveConfig, Config, extraction_root};
pub use engine::Engine;
pub use error::{Error, Result};
pub use index::Index;
pub use report::{Issue, RunReport};
pub use session::Session;
