//! Exam scheduling satellite: parse an exam calendar, compute fees and
//! reminders, and detect exams whose absolute time windows collide.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::schedule::ranges_overlap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamRaw {
    subject: String,
    date: String,
    duration_minutes: i64,
    location: String,
    /// Base fee in PLN.
    fee: f64,
    early_bird_deadline: String,
    registration_deadline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exam {
    pub subject: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub location: String,
    pub fee: f64,
    pub early_bird_deadline: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub subject: String,
    pub send_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub exam_a: Exam,
    pub exam_b: Exam,
    pub overlap_minutes: i64,
}

/// Parse a JSON exam calendar, validating timestamps and the deadline
/// ordering early-bird ≤ registration ≤ exam date.
pub fn parse_exam_schedule(json: &str) -> Result<Vec<Exam>, AppError> {
    let raw: Vec<ExamRaw> = serde_json::from_str(json)
        .map_err(|e| AppError::BadRequest(format!("Invalid exam schedule: {e}")))?;

    raw.into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let date = parse_instant(&item.date, "date", idx)?;
            let early_bird = parse_instant(&item.early_bird_deadline, "earlyBirdDeadline", idx)?;
            let registration =
                parse_instant(&item.registration_deadline, "registrationDeadline", idx)?;

            if early_bird > registration {
                return Err(AppError::BadRequest(format!(
                    "Early-bird deadline after registration deadline at index {idx}"
                )));
            }
            if registration > date {
                return Err(AppError::BadRequest(format!(
                    "Registration deadline after exam date at index {idx}"
                )));
            }

            Ok(Exam {
                subject: item.subject,
                date,
                duration_minutes: item.duration_minutes,
                location: item.location,
                fee: item.fee,
                early_bird_deadline: early_bird,
                registration_deadline: registration,
            })
        })
        .collect()
}

fn parse_instant(value: &str, field: &str, idx: usize) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(format!("Invalid {field} at index {idx}: {value}")))
}

/// Registration stays open through the registration deadline, inclusive.
pub fn can_register(exam: &Exam, now: DateTime<Utc>) -> bool {
    now <= exam.registration_deadline
}

/// Fee due for registering at `now`: 20% off through the early-bird
/// deadline, full fee through the registration deadline, closed after.
/// Rounded to cents.
pub fn registration_fee(exam: &Exam, now: DateTime<Utc>) -> Result<f64, AppError> {
    if now <= exam.early_bird_deadline {
        return Ok(round_cents(exam.fee * 0.8));
    }
    if now <= exam.registration_deadline {
        return Ok(round_cents(exam.fee));
    }
    Err(AppError::BadRequest("Registration closed".to_string()))
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// One reminder per (exam, days-before) pair whose send time is still in
/// the future, sorted ascending by send time.
pub fn exam_reminders(exams: &[Exam], days_before: &[i64], now: DateTime<Utc>) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = exams
        .iter()
        .flat_map(|exam| {
            days_before.iter().filter_map(|&days| {
                let send_at = exam.date - Duration::days(days);
                (send_at > now).then(|| Reminder {
                    subject: exam.subject.clone(),
                    send_at,
                    message: format!(
                        "Reminder: your exam \"{}\" is in {} day(s).",
                        exam.subject, days
                    ),
                })
            })
        })
        .collect();

    reminders.sort_by_key(|r| r.send_at);
    reminders
}

/// Pairwise scan for exams whose time windows overlap. The window of an
/// exam is `[date, date + duration)`, so back-to-back exams do not collide.
pub fn detect_conflicts(exams: &[Exam]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in exams.iter().enumerate() {
        let a_start = a.date;
        let a_end = a.date + Duration::minutes(a.duration_minutes);

        for b in &exams[i + 1..] {
            let b_start = b.date;
            let b_end = b.date + Duration::minutes(b.duration_minutes);

            if ranges_overlap(a_start, a_end, b_start, b_end) {
                let overlap_start = a_start.max(b_start);
                let overlap_end = a_end.min(b_end);
                conflicts.push(Conflict {
                    exam_a: a.clone(),
                    exam_b: b.clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn exam(subject: &str, date: DateTime<Utc>, duration_minutes: i64) -> Exam {
        Exam {
            subject: subject.to_string(),
            date,
            duration_minutes,
            location: "Hall A".to_string(),
            fee: 150.0,
            early_bird_deadline: date - Duration::days(30),
            registration_deadline: date - Duration::days(7),
        }
    }

    #[test]
    fn parses_a_valid_schedule() {
        let json = r#"[{
            "subject": "Databases",
            "date": "2026-06-10T09:00:00Z",
            "durationMinutes": 90,
            "location": "Hall A",
            "fee": 150.0,
            "earlyBirdDeadline": "2026-05-01T00:00:00Z",
            "registrationDeadline": "2026-06-01T00:00:00Z"
        }]"#;

        let exams = parse_exam_schedule(json).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].subject, "Databases");
        assert_eq!(exams[0].date, at(2026, 6, 10, 9, 0));
        assert_eq!(exams[0].duration_minutes, 90);
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(parse_exam_schedule("{}").is_err());
        assert!(parse_exam_schedule("not json").is_err());
    }

    #[test]
    fn rejects_bad_timestamps_naming_the_index() {
        let json = r#"[{
            "subject": "Databases",
            "date": "next tuesday",
            "durationMinutes": 90,
            "location": "Hall A",
            "fee": 150.0,
            "earlyBirdDeadline": "2026-05-01T00:00:00Z",
            "registrationDeadline": "2026-06-01T00:00:00Z"
        }]"#;

        let err = parse_exam_schedule(json).expect_err("expected error");
        assert!(err.to_string().contains("date at index 0"));
    }

    #[test]
    fn rejects_misordered_deadlines() {
        let json = r#"[{
            "subject": "Databases",
            "date": "2026-06-10T09:00:00Z",
            "durationMinutes": 90,
            "location": "Hall A",
            "fee": 150.0,
            "earlyBirdDeadline": "2026-06-05T00:00:00Z",
            "registrationDeadline": "2026-06-01T00:00:00Z"
        }]"#;

        let err = parse_exam_schedule(json).expect_err("expected error");
        assert!(err.to_string().contains("Early-bird deadline after registration deadline"));
    }

    #[test]
    fn registration_window_is_inclusive_of_the_deadline() {
        let e = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        assert!(can_register(&e, e.registration_deadline));
        assert!(!can_register(&e, e.registration_deadline + Duration::seconds(1)));
    }

    #[test]
    fn early_bird_fee_gets_twenty_percent_off() {
        let e = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        let fee = registration_fee(&e, e.early_bird_deadline).unwrap();
        assert_eq!(fee, 120.0);
    }

    #[test]
    fn full_fee_applies_after_early_bird() {
        let e = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        let fee = registration_fee(&e, e.early_bird_deadline + Duration::days(1)).unwrap();
        assert_eq!(fee, 150.0);
    }

    #[test]
    fn fee_rounds_to_cents() {
        let mut e = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        e.fee = 99.99;
        let fee = registration_fee(&e, e.early_bird_deadline).unwrap();
        assert_eq!(fee, 79.99);
    }

    #[test]
    fn late_registration_is_closed() {
        let e = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        let err = registration_fee(&e, e.registration_deadline + Duration::days(1));
        assert!(err.is_err());
    }

    #[test]
    fn overlapping_exams_conflict_with_overlap_minutes() {
        let a = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        let b = exam("Algorithms", at(2026, 6, 10, 10, 0), 60);

        let conflicts = detect_conflicts(&[a, b]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].exam_a.subject, "Databases");
        assert_eq!(conflicts[0].exam_b.subject, "Algorithms");
        // Databases runs 09:00-10:30, Algorithms starts at 10:00.
        assert_eq!(conflicts[0].overlap_minutes, 30);
    }

    #[test]
    fn back_to_back_exams_do_not_conflict() {
        let a = exam("Databases", at(2026, 6, 10, 9, 0), 60);
        let b = exam("Algorithms", at(2026, 6, 10, 10, 0), 60);
        assert!(detect_conflicts(&[a, b]).is_empty());
    }

    #[test]
    fn reminders_are_future_only_and_sorted() {
        let near = exam("Databases", at(2026, 6, 10, 9, 0), 90);
        let far = exam("Algorithms", at(2026, 6, 20, 9, 0), 90);
        let now = at(2026, 6, 8, 0, 0);

        let reminders = exam_reminders(&[far, near], &[1, 7], now);

        // The 7-days-before reminder for the near exam is already past.
        let expected: Vec<(&str, DateTime<Utc>)> = vec![
            ("Databases", at(2026, 6, 9, 9, 0)),
            ("Algorithms", at(2026, 6, 13, 9, 0)),
            ("Algorithms", at(2026, 6, 19, 9, 0)),
        ];
        let actual: Vec<(&str, DateTime<Utc>)> = reminders
            .iter()
            .map(|r| (r.subject.as_str(), r.send_at))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(
            reminders[0].message,
            "Reminder: your exam \"Databases\" is in 1 day(s)."
        );
    }
}
