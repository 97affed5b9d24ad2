//! Reconciliation engine
//!
//! The engine drives handlers over the managed archives and keeps the index
//! and the VCS in step with what they write. It owns no state between runs:
//! everything persistent lives in the [`Session`] it is handed.

use std::collections::BTreeSet;

use musdex_archive::{ArchiveContext, ExtractOutcome, HandlerRegistry, Reconciled};
use musdex_fs::{ManagedPath, NormalizedPath, Timestamp};
use musdex_vcs::{Manifest, VcsAdapter};

use crate::{ArchiveConfig, Error, Result, RunReport, Session};

/// Bookkeeping for one run.
struct Run {
    /// Tracked paths as of the start of the run
    manifest: Manifest,
    /// Paths this run has registered
    registered: BTreeSet<NormalizedPath>,
    report: RunReport,
}

impl Run {
    fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            registered: BTreeSet::new(),
            report: RunReport::new(),
        }
    }
}

/// Reconciles archives with their extracted trees.
pub struct Engine<'a> {
    handlers: &'a HandlerRegistry,
    vcs: &'a dyn VcsAdapter,
}

impl<'a> Engine<'a> {
    pub fn new(handlers: &'a HandlerRegistry, vcs: &'a dyn VcsAdapter) -> Self {
        Self { handlers, vcs }
    }

    /// Bring `archives` under management.
    ///
    /// Each archive is checked by the handler (`handler`, or the default),
    /// fully extracted, and appended to the config. Archives already managed
    /// or not understood by the handler are skipped.
    ///
    /// # Errors
    ///
    /// Only failures to query the VCS are returned; per-archive problems are
    /// collected in the report.
    pub fn add(
        &self,
        session: &mut Session,
        archives: &[NormalizedPath],
        handler: Option<&str>,
    ) -> Result<RunReport> {
        let mut run = Run::new(self.snapshot()?);

        for archive in archives {
            if session.config().contains(archive) {
                tracing::warn!(archive = %archive, "Archive is already managed, skipping");
                run.report.skip(
                    archive.clone(),
                    Error::DuplicateArchive {
                        archive: archive.clone(),
                    },
                );
                continue;
            }

            let entry = ArchiveConfig::new(archive.clone(), handler.map(str::to_string));
            match self.add_one(session, &mut run, &entry) {
                Ok(()) => {
                    session.config_mut().push(entry);
                }
                Err(e @ Error::Acceptance { .. }) => {
                    tracing::error!(archive = %archive, error = %e, "Archive not supported");
                    run.report.skip(archive.clone(), e);
                }
                Err(e) => {
                    tracing::error!(archive = %archive, error = %e, "Failed to add archive");
                    run.report.fail(archive.clone(), e);
                }
            }
        }

        Ok(run.report)
    }

    fn add_one(&self, session: &mut Session, run: &mut Run, entry: &ArchiveConfig) -> Result<()> {
        let handler = self.handlers.get(entry.handler.as_deref())?;
        let ctx = self.context(session, &run.manifest, entry);

        if !handler.check(&ctx) {
            return Err(Error::Acceptance {
                archive: entry.filename.clone(),
                handler: handler.name().to_string(),
            });
        }

        tracing::info!(archive = %entry.filename, handler = handler.name(), "Extracting new archive");
        let outcome = handler.extract(&ctx, true)?;
        self.apply_extraction(session, run, entry, outcome);
        Ok(())
    }

    /// Extract managed archives whose containers changed since they were
    /// last extracted.
    ///
    /// `filter` restricts the run to the named archives; empty means all.
    /// `force` extracts every entry of every selected archive.
    ///
    /// # Errors
    ///
    /// Only failures to query the VCS are returned; per-archive problems are
    /// collected in the report.
    pub fn extract(
        &self,
        session: &mut Session,
        filter: &[NormalizedPath],
        force: bool,
    ) -> Result<RunReport> {
        let mut run = Run::new(self.snapshot()?);

        for entry in self.select(session, filter, &mut run.report) {
            if let Err(e) = self.extract_one(session, &mut run, &entry, force) {
                tracing::error!(archive = %entry.filename, error = %e, "Extraction failed");
                run.report.fail(entry.filename.clone(), e);
            }
        }

        Ok(run.report)
    }

    fn extract_one(
        &self,
        session: &mut Session,
        run: &mut Run,
        entry: &ArchiveConfig,
        force: bool,
    ) -> Result<()> {
        let handler = self.handlers.get(entry.handler.as_deref())?;
        let ctx = self.context(session, &run.manifest, entry);
        let outcome = handler.extract(&ctx, force)?;
        self.apply_extraction(session, run, entry, outcome);
        Ok(())
    }

    /// Fold edited files back into the containers of managed archives.
    ///
    /// An archive that has never been extracted on this machine is combined
    /// as if `force` were set, so every file in its tree is written.
    ///
    /// # Errors
    ///
    /// Only failures to query the VCS are returned; per-archive problems are
    /// collected in the report.
    pub fn combine(
        &self,
        session: &mut Session,
        filter: &[NormalizedPath],
        force: bool,
    ) -> Result<RunReport> {
        let mut run = Run::new(self.snapshot()?);

        for entry in self.select(session, filter, &mut run.report) {
            if let Err(e) = self.combine_one(session, &mut run, &entry, force) {
                tracing::error!(archive = %entry.filename, error = %e, "Combine failed");
                run.report.fail(entry.filename.clone(), e);
            }
        }

        Ok(run.report)
    }

    fn combine_one(
        &self,
        session: &mut Session,
        run: &mut Run,
        entry: &ArchiveConfig,
        force: bool,
    ) -> Result<()> {
        let handler = self.handlers.get(entry.handler.as_deref())?;
        let ctx = self.context(session, &run.manifest, entry);
        let force = force || ctx.indexed_at.is_none();

        let files = handler.combine(&ctx, force)?;
        if files.is_empty() {
            return Ok(());
        }

        tracing::info!(archive = %entry.filename, files = files.len(), "Combined archive");
        let index = session.index_mut();
        index.record(entry.location(), Timestamp::now());
        for file in &files {
            index.record(file.path.clone(), file.timestamp);
        }
        run.report.files.extend(files);
        Ok(())
    }

    /// Managed archives selected by `filter`, in config order.
    fn select(
        &self,
        session: &Session,
        filter: &[NormalizedPath],
        report: &mut RunReport,
    ) -> Vec<ArchiveConfig> {
        for archive in filter {
            if !session.config().contains(archive) {
                tracing::warn!(archive = %archive, "Archive is not managed, ignoring");
                report.skip(
                    archive.clone(),
                    Error::NotManaged {
                        archive: archive.clone(),
                    },
                );
            }
        }

        session
            .config()
            .archives
            .iter()
            .filter(|a| filter.is_empty() || filter.contains(&a.filename))
            .cloned()
            .collect()
    }

    fn snapshot(&self) -> Result<Manifest> {
        let base = NormalizedPath::new(ManagedPath::BaseDir.as_str());
        let manifest = self.vcs.manifest(&base)?;
        tracing::debug!(vcs = self.vcs.name(), tracked = manifest.len(), "Read VCS manifest");
        Ok(manifest)
    }

    fn context(&self, session: &Session, manifest: &Manifest, entry: &ArchiveConfig) -> ArchiveContext {
        let location = entry.location();
        let index = session.index();

        ArchiveContext::new(session.root(), entry.filename.clone(), location.clone())
            .with_indexed_at(index.get(&location))
            .with_tracked(manifest.within(&location).cloned())
            .with_recorded(
                index
                    .within(&location)
                    .filter(|(path, _)| *path != &location)
                    .map(|(path, ts)| (path.clone(), ts)),
            )
    }

    /// Record an extraction in the index and register new files.
    fn apply_extraction(
        &self,
        session: &mut Session,
        run: &mut Run,
        entry: &ArchiveConfig,
        outcome: ExtractOutcome,
    ) {
        if outcome.materialized() {
            session.index_mut().record(entry.location(), Timestamp::now());
        }

        for file in outcome.files {
            session.index_mut().record(file.path.clone(), file.timestamp);
            self.register(run, &file);
            run.report.files.push(file);
        }
    }

    /// Register `file` with the VCS unless it was tracked at the start of the
    /// run or this run already registered it.
    fn register(&self, run: &mut Run, file: &Reconciled) {
        let path = &file.path;
        if run.manifest.contains(path) || run.registered.contains(path) {
            return;
        }

        match self.vcs.add_file(path) {
            Ok(()) => {
                tracing::debug!(file = %path, vcs = self.vcs.name(), "Registered with VCS");
                run.registered.insert(path.clone());
                run.report.registered.push(path.clone());
            }
            Err(source) => {
                tracing::warn!(file = %path, error = %source, "Failed to register with VCS");
                run.report.fail(
                    path.clone(),
                    Error::VcsRegistration {
                        path: path.clone(),
                        vcs: self.vcs.name().to_string(),
                        source,
                    },
                );
            }
        }
    }
}
