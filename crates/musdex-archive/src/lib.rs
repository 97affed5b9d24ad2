//! Archive handlers for musdex
//!
//! An [`ArchiveHandler`] knows one container format. Given an
//! [`ArchiveContext`] (where the container lives, where its contents are
//! extracted, and what the VCS and index already know about that tree) it
//! extracts the entries that need writing or folds edited files back into
//! the container. The per-entry decisions are format-independent and live
//! in [`plan`], so every handler applies the same rules.

pub mod context;
pub mod error;
pub mod handler;
pub mod plan;
pub mod registry;
pub mod zipfile;

pub use context::ArchiveContext;
pub use error::{Error, Result};
pub use handler::{ArchiveEntry, ArchiveHandler, Change, ExtractOutcome, Reconciled};
pub use plan::{EntryAction, ExtractMode, FoldAction};
pub use registry::{DEFAULT_HANDLER, HandlerRegistry};
pub use zipfile::ZipHandler;
