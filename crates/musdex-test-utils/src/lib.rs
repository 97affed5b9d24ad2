//! Shared test utilities for the musdex workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`archive`]: [`ZipFixture`] for writing zip containers with chosen
//!   entry timestamps, plus timestamp helpers
//! - [`git`]: git repository fixtures
//! - [`tree`]: [`TestTree`] scratch working root with assertion helpers
//! - [`vcs`]: [`RecordingVcs`] in-memory VCS adapter

pub mod archive;
pub mod git;
pub mod tree;
pub mod vcs;

pub use archive::{ZipFixture, at, from_now, read_entries, read_entry, touch};
pub use tree::TestTree;
pub use vcs::RecordingVcs;
