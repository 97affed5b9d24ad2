//! Shell-template VCS adapter
//!
//! Runs configurable command templates such as `darcs add "%(file)s"`. The
//! placeholder is substituted first, then the command line is split into argv
//! with shell-word quoting rules and executed directly (no shell).

use std::path::{Path, PathBuf};
use std::process::Command;

use musdex_fs::NormalizedPath;

use crate::{Error, Manifest, Result, VcsAdapter};

/// Default command used to register a file with darcs.
pub const DARCS_ADD: &str = r#"darcs add "%(file)s""#;

/// Default command used to list darcs-tracked files below a directory.
pub const DARCS_SHOW_FILES: &str = r#"darcs show files "%(archive)s""#;

/// A command line with a single `%(name)s` style placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    template: String,
}

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute `%(key)s` with `value` and split the result into argv.
    pub fn render(&self, key: &str, value: &str) -> Result<Vec<String>> {
        let placeholder = format!("%({key})s");
        let line = self.template.replace(&placeholder, value);

        let argv = shell_words::split(&line).map_err(|e| Error::InvalidTemplate {
            template: self.template.clone(),
            message: e.to_string(),
        })?;

        if argv.is_empty() {
            return Err(Error::InvalidTemplate {
                template: self.template.clone(),
                message: "command is empty".into(),
            });
        }

        Ok(argv)
    }
}

/// VCS adapter driven by two command templates.
#[derive(Debug, Clone)]
pub struct ShellVcs {
    name: String,
    root: PathBuf,
    add: CommandTemplate,
    show_files: CommandTemplate,
}

impl ShellVcs {
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        add: CommandTemplate,
        show_files: CommandTemplate,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            add,
            show_files,
        }
    }

    /// The darcs defaults.
    pub fn darcs(root: impl Into<PathBuf>) -> Self {
        Self::new(
            "darcs",
            root,
            CommandTemplate::new(DARCS_ADD),
            CommandTemplate::new(DARCS_SHOW_FILES),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, argv: &[String]) -> Result<String> {
        let command = argv.join(" ");
        tracing::debug!(vcs = %self.name, command = %command, "Running VCS command");

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(&self.root)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl VcsAdapter for ShellVcs {
    fn name(&self) -> &str {
        &self.name
    }

    fn manifest(&self, scope: &NormalizedPath) -> Result<Manifest> {
        let argv = self.show_files.render("archive", scope.as_str())?;
        let output = self.run(&argv)?;
        Ok(Manifest::from_lines(&output).subtree(scope))
    }

    fn add_file(&self, path: &NormalizedPath) -> Result<()> {
        let argv = self.add.render("file", path.as_str())?;
        self.run(&argv)?;
        Ok(())
    }
}
