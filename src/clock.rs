use crate::error::TaskError;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

/// On-disk layout of every timestamp in the log.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Length of a formatted timestamp.
pub const TIMESTAMP_LEN: usize = 19;

/// Width of the leading timestamp field of a log line, separator included.
pub const TIMESTAMP_FIELD: usize = TIMESTAMP_LEN + 1;

/// An hour/minute pair given on the command line (`8:24`, `17:36`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

fn is_leap_year(year: u32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Parses a run of ASCII digits. Signs, spaces and empty input are rejected.
fn digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn resolve_local(naive: &NaiveDateTime) -> Option<DateTime<Local>> {
    // A repeated wall-clock time (DST fold) resolves to its first occurrence.
    Local.from_local_datetime(naive).earliest()
}

/// Parses `YYYY/MM/DD HH:MM:SS` as a local instant.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Local>, TaskError> {
    let invalid = || TaskError::InvalidTimestamp(text.to_string());
    let b = text.as_bytes();

    if b.len() != TIMESTAMP_LEN
        || b[4] != b'/'
        || b[7] != b'/'
        || b[10] != b' '
        || b[13] != b':'
        || b[16] != b':'
    {
        return Err(invalid());
    }

    let field = |range: std::ops::Range<usize>| digits(&b[range]).ok_or_else(invalid);
    let year = field(0..4)?;
    let month = field(5..7)?;
    let day = field(8..10)?;
    let hour = field(11..13)?;
    let minute = field(14..16)?;
    let second = field(17..19)?;

    if year < 1900
        || !(1..=12).contains(&month)
        || day < 1
        || day > days_in_month(year, month)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return Err(invalid());
    }

    let naive = NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(invalid)?;
    resolve_local(&naive).ok_or_else(invalid)
}

pub fn format_timestamp(instant: &DateTime<Local>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Day of the week for a calendar date, 0 = Sunday.
pub fn day_of_week(year: i32, month: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.weekday().num_days_from_sunday())
}

/// Recognizes `H:MM` and `HH:MM`.
///
/// Anything of another shape yields `Ok(None)` so callers can fall back to
/// treating the argument as task text. A value of the right shape with an
/// hour above 23 or a minute above 59 is an error.
pub fn parse_clock_time(text: &str) -> Result<Option<ClockTime>, TaskError> {
    let b = text.as_bytes();
    let colon = match b.len() {
        4 => 1,
        5 => 2,
        _ => return Ok(None),
    };
    if b[colon] != b':' {
        return Ok(None);
    }
    let (Some(hour), Some(minute)) = (digits(&b[..colon]), digits(&b[colon + 1..])) else {
        return Ok(None);
    };

    if hour > 23 || minute > 59 {
        return Err(TaskError::InvalidClockTime);
    }
    Ok(Some(ClockTime { hour, minute }))
}

/// Moves `instant` to `clock` on the same local date, seconds zeroed.
pub fn apply_clock_time(
    instant: &DateTime<Local>,
    clock: ClockTime,
) -> Result<DateTime<Local>, TaskError> {
    let naive = instant
        .date_naive()
        .and_hms_opt(clock.hour, clock.minute, 0)
        .ok_or(TaskError::InvalidClockTime)?;
    resolve_local(&naive).ok_or(TaskError::InvalidClockTime)
}

/// Value of the digit run directly in front of the first `marker`.
fn elapsed_component(text: &str, marker: char) -> Result<i64, TaskError> {
    let Some(pos) = text.find(marker) else {
        return Ok(0);
    };
    let head = &text[..pos];
    let run = &head[head.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    if run.is_empty() {
        return Ok(0);
    }
    run.parse::<i64>().map_err(|_| TaskError::InvalidElapsed)
}

/// Parses an elapsed time such as `8h38m`, `2h` or `45m`.
///
/// A missing component counts as zero, so text without any marker is a zero
/// duration. Values too large to represent are an error.
pub fn parse_elapsed(text: &str) -> Result<Duration, TaskError> {
    let hours = elapsed_component(text, 'h')?;
    let minutes = elapsed_component(text, 'm')?;
    hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes.checked_mul(60)?))
        .and_then(Duration::try_seconds)
        .ok_or(TaskError::InvalidElapsed)
}
