//! Offline timetable files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use schoolboard_core::model::{Course, Subject, TimetableEntry};

use crate::labels::Labels;

/// A timetable saved to disk, with the lookups needed to label it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entries: Vec<TimetableEntry>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Full(TimetableSnapshot),
    Entries(Vec<TimetableEntry>),
}

impl TimetableSnapshot {
    /// Parse a snapshot; a bare array of entries is accepted too.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: SnapshotFile =
            serde_json::from_str(content).context("failed to parse timetable JSON")?;
        Ok(match file {
            SnapshotFile::Full(snapshot) => snapshot,
            SnapshotFile::Entries(entries) => Self {
                entries,
                ..Self::default()
            },
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timetable from {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize timetable")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write timetable to {}", path.display()))?;
        Ok(())
    }

    pub fn labels(&self) -> Labels {
        Labels::new(&self.courses, &self.subjects)
    }
}
