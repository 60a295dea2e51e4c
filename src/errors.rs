use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("attendance has already been marked for this date and course ({course_id} on {date})")]
    DuplicateSave { date: NaiveDate, course_id: Uuid },
    #[error("no course with code {0} in the roster")]
    UnknownCourse(String),
    #[error("no student with USN {0} in the roster")]
    UnknownStudent(String),
}
