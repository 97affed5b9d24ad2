//! Version-control adapters for musdex
//!
//! musdex only needs two things from a VCS: the set of paths it tracks and a
//! way to start tracking a new one. Both are expressed by [`VcsAdapter`];
//! concrete backends are selected by name through [`VcsRegistry`].

pub mod adapter;
pub mod error;
pub mod git;
pub mod manifest;
pub mod registry;
pub mod shell;

pub use adapter::VcsAdapter;
pub use error::{Error, Result};
pub use git::GitVcs;
pub use manifest::Manifest;
pub use registry::{VcsRegistry, VcsSettings};
pub use shell::{CommandTemplate, ShellVcs};
