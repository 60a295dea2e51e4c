use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use uuid::Uuid;

use crate::models::{AttendanceRecord, AttendanceStatus, Course, Student};

pub fn sheet_filename(course: &Course, date: NaiveDate) -> String {
    format!("attendance-{}-{}.xlsx", course.name, date)
}

/// Writes the roster snapshot for one course and date: one row per student,
/// columns USN / Name / Course / Status. Students without a stored record
/// for that date are listed as absent, matching the unmarked default.
pub fn write_sheet(
    out_dir: &Path,
    course: &Course,
    date: NaiveDate,
    students: &[Student],
    records: &[AttendanceRecord],
) -> anyhow::Result<PathBuf> {
    let statuses: HashMap<Uuid, AttendanceStatus> = records
        .iter()
        .filter(|record| record.course_id == course.id && record.date == date)
        .map(|record| (record.student_id, record.status))
        .collect();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Attendance")?;

    let header = Format::new().set_bold();
    sheet.write_with_format(0, 0, "USN", &header)?;
    sheet.write_with_format(0, 1, "Name", &header)?;
    sheet.write_with_format(0, 2, "Course", &header)?;
    sheet.write_with_format(0, 3, "Status", &header)?;

    for (index, student) in students.iter().enumerate() {
        let row = (index + 1) as u32;
        let status = statuses
            .get(&student.id)
            .copied()
            .unwrap_or(AttendanceStatus::Absent);

        sheet.write(row, 0, student.usn.as_str())?;
        sheet.write(row, 1, student.name.as_str())?;
        sheet.write(row, 2, course.name.as_str())?;
        sheet.write(row, 3, status.to_string())?;
    }

    let path = out_dir.join(sheet_filename(course, date));
    workbook
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
