//! Zip container handler

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Timelike};
use musdex_fs::{NormalizedPath, Timestamp};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::plan::{self, ExtractMode, FoldAction};
use crate::{ArchiveContext, ArchiveEntry, ArchiveHandler, Change, Error, ExtractOutcome, Reconciled, Result};

/// Handler for zip containers (plain zip, ODF, OOXML and friends).
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipHandler;

/// A file found under the extraction root that must go into the container.
struct Fold {
    name: String,
    source: PathBuf,
    timestamp: Timestamp,
    action: FoldAction,
}

impl ZipHandler {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<ZipArchive<File>> {
        let file = File::open(path).map_err(|e| Error::read(path, e))?;
        ZipArchive::new(file).map_err(|e| Error::read(path, e))
    }

    /// Walk the extraction root and collect files that differ from the container.
    fn collect_folds(
        location: &Path,
        archived: &BTreeMap<String, Timestamp>,
        force: bool,
    ) -> Result<Vec<Fold>> {
        let mut folds = Vec::new();

        for entry in WalkDir::new(location).sort_by_file_name() {
            let entry = entry.map_err(|e| musdex_fs::Error::io(location, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(location).unwrap_or(entry.path());
            let name = NormalizedPath::new(relative).as_str().to_string();
            let on_disk = Timestamp::modified(entry.path())?.truncated();

            let action = plan::plan_fold(on_disk, archived.get(&name).copied(), force);
            if action.writes() {
                tracing::debug!(entry = %name, ?action, "File differs from archive");
                folds.push(Fold {
                    name,
                    source: entry.path().to_path_buf(),
                    timestamp: on_disk,
                    action,
                });
            }
        }

        Ok(folds)
    }

    /// Write a new container holding the old entries with `folds` applied,
    /// then move it over the old one.
    fn rewrite(container: &Path, folds: &[Fold]) -> Result<()> {
        musdex_fs::io::ensure_parent(container)?;
        let file_name = container
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp = container.with_file_name(format!(".{file_name}.musdex.tmp"));

        let result = Self::write_container(container, &temp, folds)
            .and_then(|()| fs::rename(&temp, container).map_err(|e| Error::write(container, e)));

        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }

    fn write_container(container: &Path, temp: &Path, folds: &[Fold]) -> Result<()> {
        let by_name: BTreeMap<&str, &Fold> = folds.iter().map(|f| (f.name.as_str(), f)).collect();
        let mut written: BTreeSet<&str> = BTreeSet::new();

        let out = File::create(temp).map_err(|e| Error::write(container, e))?;
        let mut writer = ZipWriter::new(out);

        if container.exists() {
            let mut old = Self::open(container)?;
            for i in 0..old.len() {
                let raw = old.by_index_raw(i).map_err(|e| Error::read(container, e))?;
                let key = raw
                    .enclosed_name()
                    .map(|p| NormalizedPath::new(p).as_str().to_string());

                match key.as_deref().and_then(|k| by_name.get_key_value(k)) {
                    Some((name, fold)) if !raw.is_dir() => {
                        let method = match raw.compression() {
                            CompressionMethod::Stored => CompressionMethod::Stored,
                            _ => CompressionMethod::Deflated,
                        };
                        drop(raw);
                        write_file(&mut writer, container, fold, method)?;
                        written.insert(*name);
                    }
                    _ => writer
                        .raw_copy_file(raw)
                        .map_err(|e| Error::write(container, e))?,
                }
            }
        }

        for fold in folds.iter().filter(|f| !written.contains(f.name.as_str())) {
            write_file(&mut writer, container, fold, CompressionMethod::Deflated)?;
        }

        writer.finish().map_err(|e| Error::write(container, e))?;
        Ok(())
    }
}

fn write_file(
    writer: &mut ZipWriter<File>,
    container: &Path,
    fold: &Fold,
    method: CompressionMethod,
) -> Result<()> {
    tracing::debug!(entry = %fold.name, action = ?fold.action, "Writing archive entry");
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(to_zip_datetime(fold.timestamp));

    writer
        .start_file(fold.name.as_str(), options)
        .map_err(|e| Error::write(container, e))?;

    let mut source = File::open(&fold.source).map_err(|e| musdex_fs::Error::io(&fold.source, e))?;
    io::copy(&mut source, writer).map_err(|e| Error::write(container, e))?;
    Ok(())
}

/// Stream one entry to `target` through a sibling part file, so a failed read
/// leaves the previous content in place. The entry's declared size is never
/// trusted.
fn write_entry(container: &Path, entry: &mut impl Read, target: &Path) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let part = target.with_file_name(format!(".{file_name}.musdex.part"));

    let result = File::create(&part)
        .map_err(|e| Error::from(musdex_fs::Error::io(&part, e)))
        .and_then(|mut out| io::copy(entry, &mut out).map_err(|e| Error::read(container, e)))
        .and_then(|_| fs::rename(&part, target).map_err(|e| musdex_fs::Error::io(target, e).into()));

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result
}

fn safe_name(container: &Path, enclosed: Option<PathBuf>, raw: &str) -> Result<String> {
    enclosed
        .map(|p| NormalizedPath::new(p).as_str().to_string())
        .ok_or_else(|| Error::UnsafeEntry {
            archive: container.to_path_buf(),
            name: raw.to_string(),
        })
}

/// Convert zip (DOS) metadata to a timestamp; `None` for impossible dates.
fn from_zip_datetime(dt: DateTime) -> Option<Timestamp> {
    NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
        .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())
        .map(Timestamp::new)
}

/// Convert a timestamp to zip metadata, clamping out-of-range years to the
/// zip epoch.
fn to_zip_datetime(ts: Timestamp) -> DateTime {
    let naive = ts.as_naive();
    DateTime::from_date_and_time(
        u16::try_from(naive.year()).unwrap_or(1980),
        naive.month() as u8,
        naive.day() as u8,
        naive.hour() as u8,
        naive.minute() as u8,
        naive.second() as u8,
    )
    .unwrap_or_default()
}

impl ArchiveHandler for ZipHandler {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn check(&self, ctx: &ArchiveContext) -> bool {
        match Self::open(&ctx.container_path()) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(archive = %ctx.archive, error = %e, "Not a zip archive");
                false
            }
        }
    }

    fn entries(&self, ctx: &ArchiveContext) -> Result<Vec<ArchiveEntry>> {
        let container = ctx.container_path();
        let fallback = Timestamp::modified(&container)
            .map_err(|e| Error::read(&container, e))?
            .truncated();
        let mut archive = Self::open(&container)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i).map_err(|e| Error::read(&container, e))?;
            if file.is_dir() {
                continue;
            }
            entries.push(ArchiveEntry {
                name: safe_name(&container, file.enclosed_name(), file.name())?,
                timestamp: file
                    .last_modified()
                    .and_then(from_zip_datetime)
                    .unwrap_or(fallback),
            });
        }

        Ok(entries)
    }

    fn extract(&self, ctx: &ArchiveContext, force: bool) -> Result<ExtractOutcome> {
        let container = ctx.container_path();
        let modified = Timestamp::modified(&container).map_err(|e| Error::read(&container, e))?;

        let mode = ExtractMode::decide(ctx.indexed_at, modified, force);
        match mode {
            ExtractMode::UpToDate => {
                tracing::debug!(archive = %ctx.archive, "Archive unchanged since last extraction");
                return Ok(ExtractOutcome::up_to_date());
            }
            ExtractMode::Full => tracing::info!(archive = %ctx.archive, "Extracting all entries"),
            ExtractMode::Selective => tracing::info!(archive = %ctx.archive, "Selectively extracting"),
        }

        let mut archive = Self::open(&container)?;
        let fallback = modified.truncated();
        let mut files = Vec::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| Error::read(&container, e))?;
            let name = safe_name(&container, entry.enclosed_name(), entry.name())?;
            let path = ctx.entry_path(&name);
            let target = ctx.resolve(&path);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| musdex_fs::Error::io(&target, e))?;
                continue;
            }

            let timestamp = entry
                .last_modified()
                .and_then(from_zip_datetime)
                .unwrap_or(fallback);

            let action = plan::plan_entry(ctx, mode, &path, timestamp);
            if !action.writes() {
                tracing::debug!(file = %path, "Up to date");
                continue;
            }

            musdex_fs::io::ensure_parent(&target)?;
            write_entry(&container, &mut entry, &target)?;
            timestamp.apply_to(&target)?;

            let change = match action {
                plan::EntryAction::Create => {
                    tracing::debug!(file = %path, "Extracted new file");
                    Change::Created
                }
                _ => {
                    tracing::debug!(file = %path, "Extracted updated file");
                    Change::Updated
                }
            };
            files.push(Reconciled::new(path, timestamp, change));
        }

        Ok(ExtractOutcome { mode, files })
    }

    fn combine(&self, ctx: &ArchiveContext, force: bool) -> Result<Vec<Reconciled>> {
        let container = ctx.container_path();
        let location = ctx.location_path();

        if !location.is_dir() {
            tracing::warn!(archive = %ctx.archive, location = %ctx.location, "Nothing extracted to combine");
            return Ok(Vec::new());
        }

        let archived: BTreeMap<String, Timestamp> = if container.exists() {
            self.entries(ctx)?
                .into_iter()
                .map(|e| (e.name, e.timestamp))
                .collect()
        } else {
            BTreeMap::new()
        };

        let folds = Self::collect_folds(&location, &archived, force)?;
        if folds.is_empty() {
            tracing::debug!(archive = %ctx.archive, "Extracted tree matches archive");
            return Ok(Vec::new());
        }

        tracing::info!(archive = %ctx.archive, files = folds.len(), "Combining changed files into archive");
        Self::rewrite(&container, &folds)?;

        Ok(folds
            .into_iter()
            .map(|f| Reconciled::new(ctx.entry_path(&f.name), f.timestamp, Change::Combined))
            .collect())
    }
}
