use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::errors::AttendanceError;
use crate::models::{Course, Student};

/// Fixed roster for the session: the students attendance is marked against
/// and the courses it can be marked for. Read-only once loaded; operator
/// input (USN, course code) is resolved here before anything touches the
/// store.
pub struct Roster {
    students: Vec<Student>,
    courses: Vec<Course>,
}

impl Roster {
    pub fn builtin() -> anyhow::Result<Self> {
        let students = vec![
            ("8f2b4c1d-6a3e-4f7b-9c0d-1e2f3a4b5c6d", "Aditi Rao", "1CR22CS001"),
            ("2a9c8e7f-1b4d-4a6c-8e0f-2d3c4b5a6978", "Farhan Khan", "1CR22CS002"),
            ("c4d5e6f7-0a1b-4c2d-8e3f-405162738495", "Meera Pillai", "1CR22CS003"),
            ("5e6f7a8b-9c0d-4e1f-a2b3-c4d5e6f70819", "Nikhil Shetty", "1CR22CS004"),
            ("d7e8f9a0-b1c2-4d3e-8f40-516273849506", "Priya Nair", "1CR22CS005"),
            ("3c4d5e6f-7a8b-4c9d-80e1-f20314253647", "Rohan Kulkarni", "1CR22CS006"),
            ("9a0b1c2d-3e4f-4a5b-8c6d-7e8f90a1b2c3", "Sanya Iyer", "1CR22CS007"),
            ("6f708192-a3b4-4c5d-8e6f-708192a3b4c5", "Vikram Gowda", "1CR22CS008"),
        ];

        let courses = vec![
            ("0b1c2d3e-4f50-4617-8283-94a5b6c7d8e9", "Data Structures", "CS301"),
            ("7c8d9e0f-1a2b-4c3d-8e4f-5061728394a5", "Operating Systems", "CS302"),
            ("e1f20314-2536-4748-8596-a7b8c9d0e1f2", "Computer Networks", "CS303"),
            ("48596a7b-8c9d-4e0f-8192-a3b4c5d6e7f8", "Database Systems", "CS304"),
        ];

        let students = students
            .into_iter()
            .map(|(id, name, usn)| {
                Ok(Student {
                    id: Uuid::parse_str(id).context("invalid student id in built-in roster")?,
                    name: name.to_string(),
                    usn: usn.to_string(),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let courses = courses
            .into_iter()
            .map(|(id, name, code)| {
                Ok(Course {
                    id: Uuid::parse_str(id).context("invalid course id in built-in roster")?,
                    name: name.to_string(),
                    code: code.to_string(),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { students, courses })
    }

    /// Loads students from a CSV file (`usn,name` with an optional stable
    /// `id` column). The course catalogue stays the built-in one. Rows
    /// without an id get a fresh one, so rosters that should line up with
    /// previously stored attendance need the id column filled in.
    pub fn from_csv(path: &Path) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            #[serde(default)]
            id: Option<Uuid>,
            usn: String,
            name: String,
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open roster {}", path.display()))?;

        let mut students = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            let row = result.context("malformed roster row")?;
            students.push(Student {
                id: row.id.unwrap_or_else(Uuid::new_v4),
                name: row.name,
                usn: row.usn,
            });
        }

        let courses = Self::builtin()?.courses;
        Ok(Self { students, courses })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn student_by_usn(&self, usn: &str) -> Result<&Student, AttendanceError> {
        self.students
            .iter()
            .find(|student| student.usn.eq_ignore_ascii_case(usn))
            .ok_or_else(|| AttendanceError::UnknownStudent(usn.to_string()))
    }

    pub fn course_by_code(&self, code: &str) -> Result<&Course, AttendanceError> {
        self.courses
            .iter()
            .find(|course| course.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| AttendanceError::UnknownCourse(code.to_string()))
    }
}
