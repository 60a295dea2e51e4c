use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub usn: String,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Positive => write!(f, "positive"),
            TrendDirection::Neutral => write!(f, "neutral"),
            TrendDirection::Negative => write!(f, "negative"),
        }
    }
}

/// Derived analytics for one student in one course. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub likely: String,
    pub rate: u8,
    pub recent_rate: u8,
    pub consistency_score: u8,
    pub trend: TrendDirection,
    pub prediction: String,
    pub details: PredictionDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionDetails {
    pub overall: String,
    pub recent: String,
    pub consistency: String,
    pub pattern: String,
    pub shortage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StudentSummary {
    pub usn: String,
    pub name: String,
    pub total_classes: usize,
    pub present: usize,
    pub rate: f64,
}
