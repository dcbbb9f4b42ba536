//! Pure due-time evaluation. Nothing here touches the store, the clock or the
//! network; callers pass "now" and the reminders with their resolved zones.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::reminder::Reminder;

/// Accepted shapes of a stored reminder date, tried in order.
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Error, Debug, PartialEq)]
pub enum EvaluationError {
    #[error("unparsable reminder date {0:?}")]
    MalformedTimestamp(String),

    #[error("local time {0} does not exist in {1}")]
    NonexistentLocalTime(NaiveDateTime, Tz),
}

/// Parses a zone-less local date-time such as `2024-06-01T14:30:00`.
///
/// A value carrying an explicit offset is accepted too; its offset is dropped
/// and the wall-clock part is kept, since the owner's zone always wins.
pub fn parse_due_timestamp(raw: &str) -> Result<NaiveDateTime, EvaluationError> {
    let raw = raw.trim();

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .ok_or_else(|| EvaluationError::MalformedTimestamp(raw.to_string()))
}

/// Resolves a stored zone name, falling back to `default` when it is absent
/// or not a known IANA zone.
pub fn resolve_zone(name: Option<&str>, default: Tz) -> Tz {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using {}", name, default);
            default
        }),
        None => default,
    }
}

/// Attaches `zone` to a wall-clock time. Ambiguous times (clocks turned back)
/// take the earlier instant; times skipped by a forward shift are moved one
/// hour later.
pub fn localize(local: NaiveDateTime, zone: Tz) -> Result<DateTime<Utc>, EvaluationError> {
    let resolved = match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => zone.from_local_datetime(&(local + Duration::hours(1))).earliest(),
    };

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(EvaluationError::NonexistentLocalTime(local, zone))
}

/// Whole minutes from `now` until `due`, truncated toward zero.
pub fn minutes_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due - now).num_minutes()
}

pub fn is_due(diff_minutes: i64) -> bool {
    (-1..=0).contains(&diff_minutes)
}

pub fn evaluate(reminder: &Reminder, zone: Tz, now: DateTime<Utc>) -> Result<bool, EvaluationError> {
    let local = parse_due_timestamp(&reminder.reminder_date)?;
    let due = localize(local, zone)?;
    Ok(is_due(minutes_until(due, now)))
}

/// The reminders due at `now`. A reminder that cannot be evaluated is logged
/// and left out; it never hides the ones after it.
pub fn select_due(now: DateTime<Utc>, candidates: &[(Reminder, Tz)]) -> Vec<&Reminder> {
    candidates
        .iter()
        .filter_map(|(reminder, zone)| match evaluate(reminder, *zone, now) {
            Ok(true) => Some(reminder),
            Ok(false) => None,
            Err(e) => {
                tracing::error!("Skipping reminder {}: {}", reminder.reminder_id, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn reminder(id: &str, date: &str) -> Reminder {
        Reminder {
            reminder_id: id.into(),
            title: format!("title-{}", id),
            reminder_message: format!("message-{}", id),
            reminder_date: date.into(),
            user_id: "owner".into(),
            schedule_id: None,
        }
    }

    #[test]
    fn test_due_window_boundaries() {
        let cases: &[(&str, Tz, bool)] = &[
            ("2024-01-01T12:00:00", chrono_tz::UTC, true),
            ("2024-01-01T11:59:30", chrono_tz::UTC, true),
            ("2024-01-01T11:59:00", chrono_tz::UTC, true),
            ("2024-01-01T11:58:59", chrono_tz::UTC, true),
            ("2024-01-01T11:58:01", chrono_tz::UTC, true),
            ("2024-01-01T11:58:00", chrono_tz::UTC, false),
            ("2024-01-01T12:00:59", chrono_tz::UTC, true),
            ("2024-01-01T12:01:00", chrono_tz::UTC, false),
            ("2024-01-01T11:00:00", chrono_tz::UTC, false),
            ("2024-01-01T13:00:00", chrono_tz::Europe::Berlin, true),
            ("2024-01-01T12:00:00", chrono_tz::Europe::Berlin, false),
            ("2024-01-01T07:00:00", chrono_tz::America::New_York, true),
            ("2024-01-01T12:00", chrono_tz::UTC, true),
        ];

        for (date, zone, expected) in cases {
            let got = evaluate(&reminder("r", date), *zone, now()).unwrap();
            assert_eq!(got, *expected, "{} in {}", date, zone);
        }
    }

    #[test]
    fn test_minutes_until_truncates_toward_zero() {
        let at = |h, m, s| Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap();
        assert_eq!(minutes_until(at(11, 58, 59), now()), -1);
        assert_eq!(minutes_until(at(11, 58, 0), now()), -2);
        assert_eq!(minutes_until(at(12, 0, 59), now()), 0);
        assert_eq!(minutes_until(at(12, 1, 0), now()), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_due_timestamp("next tuesday"),
            Err(EvaluationError::MalformedTimestamp("next tuesday".into()))
        );
        assert!(parse_due_timestamp("2024-13-01T10:00:00").is_err());
    }

    #[test]
    fn test_parse_keeps_wall_clock_of_offset_values() {
        let parsed = parse_due_timestamp("2024-06-01T14:30:00+02:00").unwrap();
        assert_eq!(parsed, parse_due_timestamp("2024-06-01T14:30:00").unwrap());
    }

    #[test]
    fn test_resolve_zone_falls_back_to_default() {
        let default = chrono_tz::UTC;
        assert_eq!(resolve_zone(None, default), default);
        assert_eq!(resolve_zone(Some(""), default), default);
        assert_eq!(resolve_zone(Some("Mars/Olympus"), default), default);
        assert_eq!(
            resolve_zone(Some("Europe/Berlin"), default),
            chrono_tz::Europe::Berlin
        );
    }

    #[test]
    fn test_localize_handles_dst_transitions() {
        let berlin = chrono_tz::Europe::Berlin;

        // 02:30 on 2024-03-31 is skipped in Berlin.
        let gap = parse_due_timestamp("2024-03-31T02:30:00").unwrap();
        assert_eq!(
            localize(gap, berlin).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap()
        );

        // 02:30 on 2024-10-27 happens twice; the first (CEST) wins.
        let overlap = parse_due_timestamp("2024-10-27T02:30:00").unwrap();
        assert_eq!(
            localize(overlap, berlin).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_select_due_skips_malformed_and_keeps_scanning() {
        let candidates = vec![
            (reminder("bad", "not a date"), chrono_tz::UTC),
            (reminder("due-1", "2024-01-01T12:00:00"), chrono_tz::UTC),
            (reminder("later", "2024-01-01T15:00:00"), chrono_tz::UTC),
            (reminder("due-2", "2024-01-01T11:59:00"), chrono_tz::UTC),
        ];

        let ids: Vec<&str> = select_due(now(), &candidates)
            .into_iter()
            .map(|r| r.reminder_id.as_str())
            .collect();
        assert_eq!(ids, vec!["due-1", "due-2"]);
    }
}
