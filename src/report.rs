use std::collections::HashSet;
use std::fmt::Write;

use crate::models::{AttendanceRecord, AttendanceStatus, Course, Student, StudentSummary};
use crate::predictor;

pub fn summarize_students(
    students: &[Student],
    records: &[AttendanceRecord],
) -> Vec<StudentSummary> {
    let mut summaries: Vec<StudentSummary> = students
        .iter()
        .map(|student| {
            let total_classes = records
                .iter()
                .filter(|record| record.student_id == student.id)
                .count();
            let present = records
                .iter()
                .filter(|record| {
                    record.student_id == student.id
                        && record.status == AttendanceStatus::Present
                })
                .count();

            StudentSummary {
                usn: student.usn.clone(),
                name: student.name.clone(),
                total_classes,
                present,
                rate: if total_classes == 0 {
                    0.0
                } else {
                    present as f64 / total_classes as f64
                },
            }
        })
        .collect();

    // Lowest attendance first so the students needing attention lead.
    summaries.sort_by(|a, b| a.rate.partial_cmp(&b.rate).unwrap_or(std::cmp::Ordering::Equal));
    summaries
}

pub fn build_report(course: &Course, students: &[Student], records: &[AttendanceRecord]) -> String {
    let summaries = summarize_students(students, records);
    let class_dates: HashSet<_> = records.iter().map(|record| record.date).collect();

    let mut output = String::new();

    let _ = writeln!(output, "# Attendance Report: {}", course.name);
    let _ = writeln!(
        output,
        "Course {} across {} marked classes",
        course.code,
        class_dates.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster Summary");

    if records.is_empty() {
        let _ = writeln!(output, "No attendance marked for this course yet.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {}/{} classes present ({:.1}%)",
                summary.name,
                summary.usn,
                summary.present,
                summary.total_classes,
                summary.rate * 100.0
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Shortage List");

    let short: Vec<&StudentSummary> = summaries
        .iter()
        .filter(|summary| summary.total_classes > 0 && summary.rate < predictor::ATTENDANCE_THRESHOLD)
        .collect();

    if short.is_empty() {
        let _ = writeln!(output, "No students below the 85% requirement.");
    } else {
        for summary in short {
            let _ = writeln!(
                output,
                "- {} ({}) at {:.1}%",
                summary.name,
                summary.usn,
                summary.rate * 100.0
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Outlook");

    let mut any_outlook = false;
    for student in students {
        let history: Vec<AttendanceRecord> = records
            .iter()
            .filter(|record| record.student_id == student.id)
            .cloned()
            .collect();

        if let Some(outlook) = predictor::predict(&history) {
            any_outlook = true;
            let _ = writeln!(
                output,
                "- {} ({}): {} ({} trend), {}",
                student.name, student.usn, outlook.prediction, outlook.trend, outlook.likely
            );
        }
    }
    if !any_outlook {
        let _ = writeln!(output, "No attendance marked for this course yet.");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    fn course() -> Course {
        Course {
            id: Uuid::new_v4(),
            name: "Computer Networks".to_string(),
            code: "CS303".to_string(),
        }
    }

    fn student(name: &str, usn: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            name: name.to_string(),
            usn: usn.to_string(),
        }
    }

    fn history(
        student: &Student,
        course: &Course,
        statuses: &[AttendanceStatus],
    ) -> Vec<AttendanceRecord> {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        statuses
            .iter()
            .enumerate()
            .map(|(day, status)| AttendanceRecord {
                date: start + Duration::days(day as i64),
                student_id: student.id,
                course_id: course.id,
                status: *status,
            })
            .collect()
    }

    #[test]
    fn empty_course_reports_nothing_marked() {
        let report = build_report(&course(), &[student("Priya Nair", "1CR22CS005")], &[]);

        assert!(report.contains("# Attendance Report: Computer Networks"));
        assert!(report.contains("across 0 marked classes"));
        assert!(report.contains("No attendance marked for this course yet."));
        assert!(report.contains("No students below the 85% requirement."));
    }

    #[test]
    fn short_students_lead_the_summary_and_make_the_shortage_list() {
        use crate::models::AttendanceStatus::{Absent, Present};

        let course = course();
        let strong = student("Sanya Iyer", "1CR22CS007");
        let weak = student("Rohan Kulkarni", "1CR22CS006");

        let mut records = history(&strong, &course, &[Present, Present, Present, Present]);
        records.extend(history(&weak, &course, &[Present, Absent, Absent, Present]));

        let summaries = summarize_students(&[strong.clone(), weak.clone()], &records);
        assert_eq!(summaries[0].usn, weak.usn);
        assert_eq!(summaries[0].present, 2);

        let report = build_report(&course, &[strong, weak], &records);
        assert!(report.contains("- Rohan Kulkarni (1CR22CS006) at 50.0%"));
        assert!(!report.contains("Sanya Iyer (1CR22CS007) at"));
        assert!(report.contains("Good attendance"));
        assert!(report.contains("Attendance shortage!"));
    }

    #[test]
    fn students_without_records_stay_off_the_shortage_list() {
        let course = course();
        let unmarked = student("Vikram Gowda", "1CR22CS008");
        let marked = student("Aditi Rao", "1CR22CS001");
        let records = history(&marked, &course, &[AttendanceStatus::Present; 3]);

        let report = build_report(&course, &[unmarked, marked], &records);
        assert!(report.contains("No students below the 85% requirement."));
        assert!(report.contains("- Vikram Gowda (1CR22CS008): 0/0 classes present (0.0%)"));
    }
}
