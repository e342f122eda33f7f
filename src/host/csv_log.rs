//! Append-only CSV log of temperature samples
//!
//! Columns: `timestamp_iso,epoch_ms,id,name,temp_c,source`. The header is
//! written only when the file is new or empty, so one file can collect
//! several sessions.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// CSV header line
pub const HEADER: &str = "timestamp_iso,epoch_ms,id,name,temp_c,source";

/// Where a logged temperature came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleSource {
    /// Reply to an explicit `READ`
    Read,
    /// Unsolicited periodic report
    Interval,
}

impl SampleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleSource::Read => "read",
            SampleSource::Interval => "interval",
        }
    }

    /// Source of a decoded sample (`periodic` as returned by `DeviceMessage::temperature`)
    pub fn from_periodic(periodic: bool) -> Self {
        if periodic {
            SampleSource::Interval
        } else {
            SampleSource::Read
        }
    }
}

/// Temperature log file
pub struct TemperatureLog {
    path: PathBuf,
    file: File,
}

impl TemperatureLog {
    /// Open `path` for appending, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_new = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if is_new {
            writeln!(file, "{}", HEADER)?;
            file.flush()?;
        }

        log::info!("logging temperatures to {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one sample stamped with the current local time
    pub fn record(&mut self, id: u8, name: &str, temp_c: f64, source: SampleSource) -> io::Result<()> {
        self.record_at(Local::now(), id, name, temp_c, source)
    }

    /// Append one sample with an explicit timestamp
    pub fn record_at(
        &mut self,
        at: DateTime<Local>,
        id: u8,
        name: &str,
        temp_c: f64,
        source: SampleSource,
    ) -> io::Result<()> {
        writeln!(
            self.file,
            "{},{},{},{},{},{}",
            at.format("%Y-%m-%dT%H:%M:%S"),
            at.timestamp_millis(),
            id,
            csv_field(name),
            temp_c,
            source.as_str()
        )?;
        self.file.flush()
    }
}

/// Quote a field if it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
