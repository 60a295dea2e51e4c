use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

mod errors;
mod export;
mod models;
mod predictor;
mod report;
mod roster;
mod store;

use crate::errors::AttendanceError;
use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::roster::Roster;
use crate::store::RecordStore;

#[derive(Parser)]
#[command(name = "attendance-tracker")]
#[command(about = "Classroom attendance tracker with per-student analytics", long_about = None)]
struct Cli {
    /// Attendance store path (falls back to $ATTENDANCE_STORE, then attendance.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Roster CSV (id,usn,name); the built-in roster is used when omitted
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the students and courses attendance can be marked against
    Roster,
    /// Mark one course and date across the whole roster
    Mark {
        #[arg(long)]
        course: String,
        #[arg(long)]
        date: NaiveDate,
        /// USNs marked present; everyone else is recorded absent
        #[arg(long, value_delimiter = ',')]
        present: Vec<String>,
    },
    /// Import attendance rows from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show attendance analytics and the outlook for one student
    Analytics {
        #[arg(long)]
        usn: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Export a roster snapshot for one course and date as a spreadsheet
    Export {
        #[arg(long)]
        course: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Generate a markdown report for one course
    Report {
        #[arg(long)]
        course: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store_path = cli
        .store
        .clone()
        .or_else(|| std::env::var("ATTENDANCE_STORE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("attendance.json"));
    let store = RecordStore::open(store_path);

    let roster = match &cli.roster {
        Some(path) => Roster::from_csv(path)
            .with_context(|| format!("failed to load roster from {}", path.display()))?,
        None => Roster::builtin()?,
    };

    match cli.command {
        Commands::Roster => {
            println!("Students:");
            for student in roster.students() {
                println!("- {} {}", student.usn, student.name);
            }
            println!();
            println!("Courses:");
            for course in roster.courses() {
                println!("- {} {}", course.code, course.name);
            }
        }
        Commands::Mark {
            course,
            date,
            present,
        } => {
            let course = roster.course_by_code(&course)?;

            let mut present_ids: HashSet<Uuid> = HashSet::new();
            for usn in &present {
                present_ids.insert(roster.student_by_usn(usn)?.id);
            }

            let batch: Vec<AttendanceRecord> = roster
                .students()
                .iter()
                .map(|student| AttendanceRecord {
                    date,
                    student_id: student.id,
                    course_id: course.id,
                    status: if present_ids.contains(&student.id) {
                        AttendanceStatus::Present
                    } else {
                        AttendanceStatus::Absent
                    },
                })
                .collect();

            store.append(&batch)?;
            println!(
                "Marked {} students for {} on {} ({} present).",
                batch.len(),
                course.name,
                date,
                present_ids.len()
            );
        }
        Commands::Import { csv } => {
            let (records, batches, skipped) = import_csv(&store, &roster, &csv)?;
            println!(
                "Imported {records} records across {batches} save batches from {} ({skipped} already marked).",
                csv.display()
            );
        }
        Commands::Analytics {
            usn,
            course,
            from,
            to,
        } => {
            let student = roster.student_by_usn(&usn)?;
            let course = roster.course_by_code(&course)?;

            // The displayed counts honor the date range; the outlook always
            // runs over the full history.
            let ranged = store.fetch(Some(course.id), Some(student.id), from, to)?;
            let full = store.fetch(Some(course.id), Some(student.id), None, None)?;

            println!("{} ({}) — {}", student.name, student.usn, course.name);

            let total = ranged.len();
            let present = ranged
                .iter()
                .filter(|record| record.status == AttendanceStatus::Present)
                .count();
            let percentage = if total == 0 {
                0.0
            } else {
                present as f64 / total as f64 * 100.0
            };
            println!(
                "Classes: {} | Present: {} | Absent: {} | Rate: {:.1}%",
                total,
                present,
                total - present,
                percentage
            );

            match predictor::predict(&full) {
                Some(outlook) => {
                    println!();
                    println!(
                        "{} — {} ({} trend)",
                        outlook.likely, outlook.prediction, outlook.trend
                    );
                    println!("- {}", outlook.details.overall);
                    println!("- {}", outlook.details.recent);
                    println!("- {}", outlook.details.consistency);
                    println!("- {}", outlook.details.pattern);
                    if let Some(shortage) = &outlook.details.shortage {
                        println!("- {shortage}");
                    }
                }
                None => println!("No attendance marked yet for this student and course."),
            }

            if !ranged.is_empty() {
                println!();
                println!("History:");
                for record in &ranged {
                    println!("- {} {}", record.date, record.status);
                }
            }
        }
        Commands::Export { course, date, out } => {
            let course = roster.course_by_code(&course)?;
            let records = store.fetch(Some(course.id), None, Some(date), Some(date))?;
            let path = export::write_sheet(&out, course, date, roster.students(), &records)?;
            println!("Sheet written to {}.", path.display());
        }
        Commands::Report { course, out } => {
            let course = roster.course_by_code(&course)?;
            let records = store.fetch(Some(course.id), None, None, None)?;
            let report = report::build_report(course, roster.students(), &records);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Loads `usn,course,date,status` rows, grouped into one save batch per
/// (date, course) so each batch goes through the same duplicate check as
/// interactive marking. Batches that collide with already-marked dates are
/// skipped, not fatal.
fn import_csv(
    store: &RecordStore,
    roster: &Roster,
    csv_path: &std::path::Path,
) -> anyhow::Result<(usize, usize, usize)> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        usn: String,
        course: String,
        date: NaiveDate,
        status: AttendanceStatus,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;

    let mut groups: Vec<((NaiveDate, Uuid), Vec<AttendanceRecord>)> = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.context("malformed attendance row")?;
        let student = roster.student_by_usn(&row.usn)?;
        let course = roster.course_by_code(&row.course)?;

        let record = AttendanceRecord {
            date: row.date,
            student_id: student.id,
            course_id: course.id,
            status: row.status,
        };

        let key = (row.date, course.id);
        match groups.iter_mut().find(|(group, _)| *group == key) {
            Some((_, batch)) => batch.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    let mut imported = 0;
    let mut batches = 0;
    let mut skipped = 0;

    for ((date, _), batch) in groups {
        match store.append(&batch) {
            Ok(()) => {
                imported += batch.len();
                batches += 1;
            }
            Err(err) => match err.downcast_ref::<AttendanceError>() {
                Some(AttendanceError::DuplicateSave { .. }) => {
                    println!("Skipped {date}: attendance already marked for that course.");
                    skipped += 1;
                }
                _ => return Err(err),
            },
        }
    }

    Ok((imported, batches, skipped))
}
