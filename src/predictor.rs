use crate::models::{
    AttendanceRecord, AttendanceStatus, Prediction, PredictionDetails, TrendDirection,
};

/// Minimum attendance rate before a student is flagged as short.
pub const ATTENDANCE_THRESHOLD: f64 = 0.85;

const RECENT_WINDOW: usize = 5;
const CONSISTENCY_WINDOW: usize = 10;

/// Derives the attendance outlook for one student in one course.
///
/// `records` must already be filtered to a single student and course and be
/// in chronological order. The window maths reads the tail of the slice as
/// the latest classes and never re-sorts, so out-of-order input produces an
/// out-of-order trend.
pub fn predict(records: &[AttendanceRecord]) -> Option<Prediction> {
    if records.is_empty() {
        return None;
    }

    let overall_rate = present_ratio(records);

    let recent = tail(records, RECENT_WINDOW);
    let recent_rate = present_ratio(recent);

    let consistency_window = tail(records, CONSISTENCY_WINDOW);
    let consistency_score = if consistency_window.len() >= 2 {
        let matching = consistency_window
            .windows(2)
            .filter(|pair| pair[0].status == pair[1].status)
            .count();
        matching as f64 / (consistency_window.len() - 1) as f64
    } else {
        1.0
    };

    let trend = if recent_rate > overall_rate {
        TrendDirection::Positive
    } else if recent_rate < overall_rate {
        TrendDirection::Negative
    } else {
        TrendDirection::Neutral
    };

    let weighted_score = overall_rate * 0.4 + recent_rate * 0.4 + consistency_score * 0.2;
    let is_shortage = overall_rate < ATTENDANCE_THRESHOLD;

    let prediction = if weighted_score >= 0.85 {
        "High attendance likely"
    } else if weighted_score >= 0.70 {
        "Moderate attendance likely"
    } else {
        "Low attendance likely"
    };

    // Pattern label buckets on the raw score, not the rounded percentage.
    let pattern = if consistency_score >= 0.8 {
        "Very consistent attendance"
    } else if consistency_score >= 0.6 {
        "Moderately consistent"
    } else {
        "Irregular attendance pattern"
    };

    let shortage = is_shortage.then(|| {
        format!(
            "Need {}% more to meet requirement",
            percent(ATTENDANCE_THRESHOLD - overall_rate)
        )
    });

    let likely = if is_shortage {
        "Attendance shortage!"
    } else {
        "Good attendance"
    };

    Some(Prediction {
        likely: likely.to_string(),
        rate: percent(overall_rate),
        recent_rate: percent(recent_rate),
        consistency_score: percent(consistency_score),
        trend,
        prediction: prediction.to_string(),
        details: PredictionDetails {
            overall: format!("{}% overall attendance", percent(overall_rate)),
            recent: format!("{}% in last 5 classes", percent(recent_rate)),
            consistency: format!("{}% attendance consistency", percent(consistency_score)),
            pattern: pattern.to_string(),
            shortage,
        },
    })
}

fn present_ratio(records: &[AttendanceRecord]) -> f64 {
    let present = records
        .iter()
        .filter(|record| record.status == AttendanceStatus::Present)
        .count();
    present as f64 / records.len() as f64
}

fn tail(records: &[AttendanceRecord], window: usize) -> &[AttendanceRecord] {
    &records[records.len().saturating_sub(window)..]
}

/// Rounds a fraction to a whole percentage, half away from zero.
fn percent(fraction: f64) -> u8 {
    (fraction * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use uuid::Uuid;

    use crate::models::AttendanceStatus::{Absent, Present};

    fn history(statuses: &[AttendanceStatus]) -> Vec<AttendanceRecord> {
        let student_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        statuses
            .iter()
            .enumerate()
            .map(|(day, status)| AttendanceRecord {
                date: start + Duration::days(day as i64),
                student_id,
                course_id,
                status: *status,
            })
            .collect()
    }

    #[test]
    fn empty_history_has_no_outlook() {
        assert!(predict(&[]).is_none());
    }

    #[test]
    fn single_present_class_is_a_high_outlook() {
        let outlook = predict(&history(&[Present])).unwrap();

        assert_eq!(outlook.rate, 100);
        assert_eq!(outlook.recent_rate, 100);
        assert_eq!(outlook.consistency_score, 100);
        assert_eq!(outlook.trend, TrendDirection::Neutral);
        assert_eq!(outlook.prediction, "High attendance likely");
        assert_eq!(outlook.likely, "Good attendance");
        assert!(outlook.details.shortage.is_none());
    }

    #[test]
    fn uniform_histories_score_perfect_consistency() {
        let all_present = predict(&history(&[Present; 6])).unwrap();
        assert_eq!(all_present.consistency_score, 100);
        assert_eq!(all_present.details.pattern, "Very consistent attendance");

        let all_absent = predict(&history(&[Absent; 4])).unwrap();
        assert_eq!(all_absent.consistency_score, 100);
        assert_eq!(all_absent.details.pattern, "Very consistent attendance");
        assert_eq!(all_absent.rate, 0);
        assert_eq!(all_absent.likely, "Attendance shortage!");
    }

    #[test]
    fn eight_of_ten_present_is_a_five_point_shortage() {
        let statuses = [
            Present, Absent, Present, Present, Present, Absent, Present, Present, Present, Present,
        ];
        let outlook = predict(&history(&statuses)).unwrap();

        assert_eq!(outlook.rate, 80);
        assert_eq!(outlook.recent_rate, 80);
        assert_eq!(outlook.trend, TrendDirection::Neutral);
        assert_eq!(outlook.likely, "Attendance shortage!");
        assert_eq!(
            outlook.details.shortage.as_deref(),
            Some("Need 5% more to meet requirement")
        );
    }

    #[test]
    fn alternating_history_is_irregular() {
        let outlook = predict(&history(&[Present, Absent, Present, Absent, Present])).unwrap();

        assert_eq!(outlook.rate, 60);
        assert_eq!(outlook.recent_rate, 60);
        assert_eq!(outlook.trend, TrendDirection::Neutral);
        assert_eq!(outlook.consistency_score, 0);
        assert_eq!(outlook.details.pattern, "Irregular attendance pattern");
        assert_eq!(outlook.prediction, "Low attendance likely");
    }

    #[test]
    fn recent_window_drives_the_trend() {
        // Weak start, perfect last five classes.
        let statuses = [
            Absent, Absent, Absent, Present, Present, Present, Present, Present,
        ];
        let improving = predict(&history(&statuses)).unwrap();
        assert_eq!(improving.trend, TrendDirection::Positive);

        // Perfect start, absent last five classes.
        let statuses = [
            Present, Present, Present, Absent, Absent, Absent, Absent, Absent,
        ];
        let slipping = predict(&history(&statuses)).unwrap();
        assert_eq!(slipping.trend, TrendDirection::Negative);
    }

    #[test]
    fn consistency_only_reads_the_last_ten_classes() {
        // Twelve alternating classes, then the tail settles: the first two
        // never enter the consistency window.
        let mut statuses = vec![Present, Absent];
        statuses.extend_from_slice(&[Present; 10]);
        let outlook = predict(&history(&statuses)).unwrap();

        assert_eq!(outlook.consistency_score, 100);
        assert_eq!(outlook.details.pattern, "Very consistent attendance");
    }

    #[test]
    fn prediction_is_pure() {
        let records = history(&[Present, Absent, Present, Present]);
        assert_eq!(predict(&records), predict(&records));
    }

    #[test]
    fn detail_strings_use_rounded_percentages() {
        // 2 of 3 present: 66.67% rounds to 67.
        let outlook = predict(&history(&[Present, Present, Absent])).unwrap();

        assert_eq!(outlook.rate, 67);
        assert_eq!(outlook.details.overall, "67% overall attendance");
        assert_eq!(outlook.details.recent, "67% in last 5 classes");
        assert_eq!(
            outlook.details.shortage.as_deref(),
            Some("Need 18% more to meet requirement")
        );
    }
}
