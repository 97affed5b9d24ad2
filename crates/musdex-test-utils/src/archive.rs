//! Zip container fixtures.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Timelike};
use musdex_fs::Timestamp;
use zip::write::SimpleFileOptions;
use zip::{DateTime, ZipArchive, ZipWriter};

/// A timestamp on the fixture day (2010-03-02) at `hh:mm:ss`.
///
/// Use even seconds; zip metadata cannot hold odd ones.
pub fn at(hour: u32, minute: u32, second: u32) -> Timestamp {
    Timestamp::new(
        NaiveDate::from_ymd_opt(2010, 3, 2)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .unwrap_or_else(|| panic!("at: invalid time {hour}:{minute}:{second}")),
    )
}

/// A timestamp `hours` away from the current local time.
pub fn from_now(hours: i64) -> Timestamp {
    Timestamp::new(*Timestamp::now().as_naive() + Duration::hours(hours))
}

enum FixtureEntry {
    File {
        name: String,
        content: Vec<u8>,
        timestamp: Timestamp,
    },
    Dir {
        name: String,
    },
}

/// Builder for zip containers with explicit entry timestamps.
///
/// # Example
///
/// ```rust,no_run
/// use musdex_test_utils::{ZipFixture, at};
///
/// ZipFixture::new()
///     .file("content.xml", "<doc/>", at(12, 0, 0))
///     .dir("Pictures/")
///     .write_to(std::path::Path::new("doc.odt"));
/// ```
#[derive(Default)]
pub struct ZipFixture {
    entries: Vec<FixtureEntry>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry.
    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>, timestamp: Timestamp) -> Self {
        self.entries.push(FixtureEntry::File {
            name: name.to_string(),
            content: content.as_ref().to_vec(),
            timestamp,
        });
        self
    }

    /// Add a directory entry.
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(FixtureEntry::Dir {
            name: name.to_string(),
        });
        self
    }

    /// Write the container to `path`, creating parent directories.
    ///
    /// # Panics
    /// Panics if any filesystem or zip operation fails.
    pub fn write_to(self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("ZipFixture: failed to create {}: {e}", parent.display()));
        }
        let file = File::create(path)
            .unwrap_or_else(|e| panic!("ZipFixture: failed to create {}: {e}", path.display()));
        let mut writer = ZipWriter::new(file);

        for entry in self.entries {
            match entry {
                FixtureEntry::File {
                    name,
                    content,
                    timestamp,
                } => {
                    let options =
                        SimpleFileOptions::default().last_modified_time(zip_datetime(timestamp));
                    writer
                        .start_file(name.as_str(), options)
                        .unwrap_or_else(|e| panic!("ZipFixture: failed to start {name}: {e}"));
                    writer
                        .write_all(&content)
                        .unwrap_or_else(|e| panic!("ZipFixture: failed to write {name}: {e}"));
                }
                FixtureEntry::Dir { name } => writer
                    .add_directory(name.as_str(), SimpleFileOptions::default())
                    .unwrap_or_else(|e| panic!("ZipFixture: failed to add {name}: {e}")),
            }
        }

        writer
            .finish()
            .unwrap_or_else(|e| panic!("ZipFixture: failed to finish {}: {e}", path.display()));
    }

    /// Write the container to `path` and set its modification time.
    pub fn write_with_mtime(self, path: &Path, modified: Timestamp) {
        self.write_to(path);
        touch(path, modified);
    }
}

/// Set the modification time of `path`.
///
/// # Panics
/// Panics if the file cannot be updated.
pub fn touch(path: &Path, modified: Timestamp) {
    modified
        .apply_to(path)
        .unwrap_or_else(|e| panic!("touch: failed to set mtime of {}: {e}", path.display()));
}

/// The file entries of the container at `path` as `(name, timestamp)`,
/// in container order.
///
/// # Panics
/// Panics if the container cannot be read.
pub fn read_entries(path: &Path) -> Vec<(String, Timestamp)> {
    let file = File::open(path)
        .unwrap_or_else(|e| panic!("read_entries: failed to open {}: {e}", path.display()));
    let mut archive = ZipArchive::new(file)
        .unwrap_or_else(|e| panic!("read_entries: failed to read {}: {e}", path.display()));

    (0..archive.len())
        .filter_map(|i| {
            let entry = archive
                .by_index_raw(i)
                .unwrap_or_else(|e| panic!("read_entries: bad entry {i}: {e}"));
            if entry.is_dir() {
                return None;
            }
            let dt = entry.last_modified().unwrap_or_default();
            let naive = NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())
                .and_then(|d| d.and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into()))
                .unwrap_or_else(|| panic!("read_entries: invalid timestamp on {}", entry.name()));
            Some((entry.name().to_string(), Timestamp::new(naive)))
        })
        .collect()
}

/// Content of entry `name` in the container at `path`.
///
/// # Panics
/// Panics if the container or entry cannot be read.
pub fn read_entry(path: &Path, name: &str) -> String {
    let file = File::open(path)
        .unwrap_or_else(|e| panic!("read_entry: failed to open {}: {e}", path.display()));
    let mut archive = ZipArchive::new(file)
        .unwrap_or_else(|e| panic!("read_entry: failed to read {}: {e}", path.display()));
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("read_entry: no entry {name}: {e}"));
    let mut content = String::new();
    std::io::Read::read_to_string(&mut entry, &mut content)
        .unwrap_or_else(|e| panic!("read_entry: failed to read {name}: {e}"));
    content
}

fn zip_datetime(ts: Timestamp) -> DateTime {
    let naive = ts.as_naive();
    DateTime::from_date_and_time(
        naive.year() as u16,
        naive.month() as u8,
        naive.day() as u8,
        naive.hour() as u8,
        naive.minute() as u8,
        naive.second() as u8,
    )
    .unwrap_or_else(|e| panic!("zip_datetime: {ts} out of range: {e:?}"))
}
