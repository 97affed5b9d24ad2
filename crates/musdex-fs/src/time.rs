//! Local wall-clock timestamps
//!
//! Archive metadata carries naive local date-times with 2-second resolution,
//! so every timestamp musdex records (index entries, archive roots, file
//! modification times) is kept in the same zone-less local form.

use std::fs::File;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// A naive local date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    /// The current local time.
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        Self(DateTime::<Local>::from(time).naive_local())
    }

    /// Modification time of the file at `path`.
    pub fn modified(path: &Path) -> Result<Self> {
        let modified = path
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(path, e))?;
        Ok(Self::from_system_time(modified))
    }

    /// Set the modification time of the file at `path`.
    pub fn apply_to(self, path: &Path) -> Result<()> {
        let file = File::options()
            .write(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;
        file.set_modified(self.to_system_time())
            .map_err(|e| Error::io(path, e))
    }

    /// Round down to the 2-second resolution archive metadata can hold.
    pub fn truncated(self) -> Self {
        let second = self.0.second() - self.0.second() % 2;
        let naive = self
            .0
            .with_nanosecond(0)
            .and_then(|t| t.with_second(second))
            .unwrap_or(self.0);
        Self(naive)
    }

    pub fn to_system_time(self) -> SystemTime {
        match Local.from_local_datetime(&self.0).earliest() {
            Some(local) => local.into(),
            // Skipped by a DST transition
            None => Utc.from_utc_datetime(&self.0).into(),
        }
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Parse an ISO 8601 date-time, with either `T` or a space between date
    /// and time. Fractional seconds are optional.
    pub fn parse(raw: &str) -> std::result::Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw.trim()).map_err(serde::de::Error::custom)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self(naive)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
