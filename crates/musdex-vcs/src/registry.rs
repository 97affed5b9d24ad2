//! Registry selecting a VCS adapter by name

use std::path::Path;

use crate::shell::{DARCS_ADD, DARCS_SHOW_FILES};
use crate::{CommandTemplate, Error, GitVcs, Result, ShellVcs, VcsAdapter};

/// Adapter used when the config names none.
pub const DEFAULT_VCS: &str = "darcs";

/// VCS selection as read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcsSettings {
    /// Adapter name (`darcs`, `git`); `None` means [`DEFAULT_VCS`]
    pub name: Option<String>,
    /// Override for the add command, with a `%(file)s` placeholder
    pub add_template: Option<String>,
    /// Override for the list command, with a `%(archive)s` placeholder
    pub show_files_template: Option<String>,
}

impl VcsSettings {
    fn has_templates(&self) -> bool {
        self.add_template.is_some() || self.show_files_template.is_some()
    }
}

/// Registry of the built-in VCS adapters.
pub struct VcsRegistry;

impl VcsRegistry {
    /// Names accepted by [`VcsRegistry::create`].
    pub fn names() -> &'static [&'static str] {
        &["darcs", "git"]
    }

    /// Build the adapter described by `settings` for the working root `root`.
    ///
    /// Command templates, when present, always produce a shell adapter; a
    /// missing template falls back to the darcs default.
    pub fn create(root: &Path, settings: &VcsSettings) -> Result<Box<dyn VcsAdapter>> {
        let name = settings.name.as_deref().unwrap_or(DEFAULT_VCS);

        if settings.has_templates() {
            tracing::debug!(vcs = %name, "Using command template overrides");
            let add = settings.add_template.as_deref().unwrap_or(DARCS_ADD);
            let show = settings
                .show_files_template
                .as_deref()
                .unwrap_or(DARCS_SHOW_FILES);
            return Ok(Box::new(ShellVcs::new(
                name,
                root,
                CommandTemplate::new(add),
                CommandTemplate::new(show),
            )));
        }

        match name {
            "darcs" => Ok(Box::new(ShellVcs::darcs(root))),
            "git" => Ok(Box::new(GitVcs::open(root)?)),
            other => Err(Error::UnknownVcs {
                name: other.to_string(),
                available: Self::names().join(", "),
            }),
        }
    }
}
