use anyhow::{anyhow, Result};
use chrono::{
    DateTime, Days, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};

use crate::model::entry::Timestamp;

/// Which side of a DST transition to land on when a local wall-clock time is
/// skipped or repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

pub fn to_local(instant: Timestamp) -> DateTime<Local> {
    to_zone(&Local, instant)
}

pub fn local_date(instant: Timestamp) -> NaiveDate {
    to_local(instant).date_naive()
}

/// Local midnight (00:00:00.000) of the calendar day containing `instant`.
pub fn start_of_day(instant: Timestamp) -> Timestamp {
    start_of_day_in(&Local, instant)
}

/// Local 23:59:59.999 of the calendar day containing `instant`.
pub fn end_of_day(instant: Timestamp) -> Timestamp {
    end_of_day_in(&Local, instant)
}

/// Inclusive `[start, end]` millisecond bounds of the local day containing `instant`.
pub fn day_window(instant: Timestamp) -> (Timestamp, Timestamp) {
    day_window_in(&Local, instant)
}

/// Moves `instant` by whole calendar days, keeping the local wall-clock time.
pub fn shift_days(instant: Timestamp, days: i64) -> Timestamp {
    shift_days_in(&Local, instant, days)
}

fn to_zone<Tz: TimeZone>(tz: &Tz, instant: Timestamp) -> DateTime<Tz> {
    DateTime::from_timestamp_millis(instant)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .with_timezone(tz)
}

/// First instant of the day in `tz`. When midnight is skipped this is the
/// first wall-clock time that exists.
pub fn start_of_day_in<Tz: TimeZone>(tz: &Tz, instant: Timestamp) -> Timestamp {
    let date = to_zone(tz, instant).date_naive();
    resolve_in(tz, date.and_time(NaiveTime::MIN), Edge::Start).timestamp_millis()
}

/// Last millisecond of the day in `tz`; the later one when 23:59:59.999 repeats.
pub fn end_of_day_in<Tz: TimeZone>(tz: &Tz, instant: Timestamp) -> Timestamp {
    let date = to_zone(tz, instant).date_naive();
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    resolve_in(tz, date.and_time(last_milli), Edge::End).timestamp_millis()
}

pub fn day_window_in<Tz: TimeZone>(tz: &Tz, instant: Timestamp) -> (Timestamp, Timestamp) {
    (start_of_day_in(tz, instant), end_of_day_in(tz, instant))
}

pub fn shift_days_in<Tz: TimeZone>(tz: &Tz, instant: Timestamp, days: i64) -> Timestamp {
    let naive = to_zone(tz, instant).naive_local();
    let shifted = if days >= 0 {
        naive.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        naive.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    match shifted {
        Some(n) => resolve_in(tz, n, Edge::Start).timestamp_millis(),
        None => instant,
    }
}

fn resolve_in<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, edge: Edge) -> DateTime<Tz> {
    let step = match edge {
        Edge::Start => Duration::minutes(30),
        Edge::End => Duration::minutes(-30),
    };
    let mut candidate = naive;
    // Real-world gaps are at most a couple of hours.
    for _ in 0..8 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, latest) => {
                return match edge {
                    Edge::Start => earliest,
                    Edge::End => latest,
                }
            }
            LocalResult::None => candidate += step,
        }
    }
    tz.from_utc_datetime(&naive)
}

/// Parses a user-facing point in time relative to `now`.
///
/// Accepted forms: `now`, `today`, `yesterday`, `-3d` / `+1d` / `-2w`,
/// `YYYY-MM-DD HH:MM`, and `YYYY-MM-DD` (local noon of that day).
pub fn parse_when(input: &str, now: Timestamp) -> Result<Timestamp> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "" => return Err(anyhow!("Empty date string")),
        "now" | "today" | "tod" => return Ok(now),
        "yesterday" | "yest" => return Ok(shift_days(now, -1)),
        _ => {}
    }

    if input.starts_with('+') || input.starts_with('-') {
        let (sign, rest) = input.split_at(1);
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid relative format: {}", input))?;
        let count = if sign == "-" { -count } else { count };
        return match unit.to_lowercase().as_str() {
            "d" => Ok(shift_days(now, count)),
            "w" => Ok(shift_days(now, count * 7)),
            _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
        };
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(resolve_in(&Local, dt, Edge::Start).timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        return Ok(resolve_in(&Local, d.and_time(noon), Edge::Start).timestamp_millis());
    }

    Err(anyhow!("Could not parse date: {}", input))
}
