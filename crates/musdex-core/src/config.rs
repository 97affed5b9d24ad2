//! Archive registry persisted in the musdex config file

use std::path::{Path, PathBuf};

use musdex_fs::{ManagedPath, NormalizedPath};
use musdex_vcs::VcsSettings;
use serde::{Deserialize, Serialize};

/// One managed archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Container path relative to the working root
    pub filename: NormalizedPath,
    /// Handler name; absent means the default handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl ArchiveConfig {
    pub fn new(filename: NormalizedPath, handler: Option<String>) -> Self {
        Self { filename, handler }
    }

    /// Directory the archive's entries are extracted under.
    pub fn location(&self) -> NormalizedPath {
        extraction_root(&self.filename)
    }
}

/// `_musdex/<archive>`: where an archive's entries live on disk.
pub fn extraction_root(archive: &NormalizedPath) -> NormalizedPath {
    NormalizedPath::new(ManagedPath::BaseDir.as_str()).join(archive.as_str())
}

/// The musdex config document.
///
/// Unknown fields are ignored so older builds can read newer files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Override for the index file location, relative to the working root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// VCS adapter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,

    /// Add command template with a `%(file)s` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_add: Option<String>,

    /// List command template with an `%(archive)s` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_show_files: Option<String>,

    /// Managed archives, in the order they were added
    #[serde(default)]
    pub archives: Vec<ArchiveConfig>,

    #[serde(skip)]
    dirty: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, filename: &NormalizedPath) -> Option<&ArchiveConfig> {
        self.archives.iter().find(|a| &a.filename == filename)
    }

    pub fn contains(&self, filename: &NormalizedPath) -> bool {
        self.find(filename).is_some()
    }

    /// Append an archive entry.
    ///
    /// Returns `false` and leaves the registry untouched if an entry with the
    /// same filename already exists.
    pub fn push(&mut self, archive: ArchiveConfig) -> bool {
        if self.contains(&archive.filename) {
            return false;
        }
        self.archives.push(archive);
        self.dirty = true;
        true
    }

    /// Index file location for the working root `root`.
    pub fn index_path(&self, root: &Path) -> PathBuf {
        match &self.index {
            Some(index) => root.join(index),
            None => ManagedPath::Index.locate(root, ManagedPath::YamlIndex),
        }
    }

    pub fn vcs_settings(&self) -> VcsSettings {
        VcsSettings {
            name: self.vcs.clone(),
            add_template: self.vcs_add.clone(),
            show_files_template: self.vcs_show_files.clone(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_rejects_duplicate_filename() {
        let mut config = Config::new();
        assert!(config.push(ArchiveConfig::new("a.zip".into(), None)));
        assert!(!config.push(ArchiveConfig::new("a.zip".into(), Some("zip".into()))));
        assert_eq!(config.archives.len(), 1);
        assert_eq!(config.archives[0].handler, None);
    }

    #[test]
    fn test_push_marks_dirty() {
        let mut config = Config::new();
        assert!(!config.is_dirty());
        config.push(ArchiveConfig::new("a.zip".into(), None));
        assert!(config.is_dirty());
    }

    #[test]
    fn test_location_is_under_managed_dir() {
        let archive = ArchiveConfig::new("docs/report.odt".into(), None);
        assert_eq!(archive.location().as_str(), "_musdex/docs/report.odt");
    }

    #[test]
    fn test_index_path_default_and_override() {
        let root = Path::new("/work");
        let mut config = Config::new();
        assert_eq!(
            config.index_path(root),
            root.join("_musdex/.musdex.index.toml")
        );

        config.index = Some("state/index.json".into());
        assert_eq!(config.index_path(root), root.join("state/index.json"));
    }

    #[test]
    fn test_parse_toml_ignores_unknown_fields() {
        let config: Config = toml::from_str(
            r#"
            vcs = "git"
            future_option = true

            [[archives]]
            filename = "a.zip"

            [[archives]]
            filename = "b.odt"
            handler = "zip"
            "#,
        )
        .unwrap();

        assert_eq!(config.vcs.as_deref(), Some("git"));
        assert_eq!(
            config.archives,
            vec![
                ArchiveConfig::new("a.zip".into(), None),
                ArchiveConfig::new("b.odt".into(), Some("zip".into())),
            ]
        );
    }

    #[test]
    fn test_handler_omitted_when_unset() {
        let mut config = Config::new();
        config.push(ArchiveConfig::new("a.zip".into(), None));
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("filename = \"a.zip\""));
        assert!(!text.contains("handler"));
        assert!(!text.contains("dirty"));
    }

    #[test]
    fn test_vcs_settings_carry_templates() {
        let config: Config = serde_json::from_str(
            r#"{"vcs_add": "hg add %(file)s", "vcs_show_files": "hg locate %(archive)s"}"#,
        )
        .unwrap();
        let settings = config.vcs_settings();
        assert_eq!(settings.name, None);
        assert_eq!(settings.add_template.as_deref(), Some("hg add %(file)s"));
        assert_eq!(
            settings.show_files_template.as_deref(),
            Some("hg locate %(archive)s")
        );
    }
}
