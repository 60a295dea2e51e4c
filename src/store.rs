use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AttendanceError;
use crate::models::AttendanceRecord;

/// Append-only attendance log persisted as one JSON array on disk.
///
/// Records keep their insertion order, which is what the analytics windows
/// are defined over. Saves are all-or-nothing at batch granularity.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Everything ever appended, in insertion order. A missing file reads as
    /// the empty store.
    pub fn query_all(&self) -> anyhow::Result<Vec<AttendanceRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let records = serde_json::from_str(&raw)
            .with_context(|| format!("malformed attendance data in {}", self.path.display()))?;
        Ok(records)
    }

    /// Appends one save batch. If any incoming record's (date, course) pair
    /// has been marked before, the whole batch is rejected and nothing is
    /// written.
    pub fn append(&self, records: &[AttendanceRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut existing = self.query_all()?;

        for record in records {
            let marked = existing.iter().any(|stored| {
                stored.date == record.date && stored.course_id == record.course_id
            });
            if marked {
                return Err(AttendanceError::DuplicateSave {
                    date: record.date,
                    course_id: record.course_id,
                }
                .into());
            }
        }

        existing.extend_from_slice(records);
        self.persist(&existing)
    }

    /// Stored records narrowed by course, student, and an inclusive date
    /// range. Insertion order is preserved.
    pub fn fetch(
        &self,
        course_id: Option<Uuid>,
        student_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let records = self.query_all()?;

        Ok(records
            .into_iter()
            .filter(|record| course_id.map_or(true, |id| record.course_id == id))
            .filter(|record| student_id.map_or(true, |id| record.student_id == id))
            .filter(|record| from.map_or(true, |start| record.date >= start))
            .filter(|record| to.map_or(true, |end| record.date <= end))
            .collect())
    }

    fn persist(&self, records: &[AttendanceRecord]) -> anyhow::Result<()> {
        let payload = serde_json::to_string_pretty(records)?;

        // Write-then-rename so a failed save never truncates existing data.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
