//! Filesystem primitives for musdex
//!
//! Provides normalized relative paths, atomic locked writes, format-agnostic
//! config storage and the timestamp conversions shared by the archive and
//! index layers.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod time;

pub use config::ConfigStore;
pub use constants::ManagedPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use time::Timestamp;
