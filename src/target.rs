use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use thiserror::Error;

const LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum TargetParseError {
    #[error("invalid time '{0}'; use HH:MM (e.g., 23:59)")]
    InvalidClockTime(String),
    #[error(
        "invalid time '{0}'; use YYYY-MM-DD HH:MM:SS (e.g., 2024-12-31 23:59:59) or HH:MM (e.g., 23:59)"
    )]
    InvalidDateTime(String),
    #[error("'{0}' does not exist as a local wall-clock time on that day")]
    NonexistentLocalTime(String),
}

/// Parses the target argument against the current local clock. `HH:MM` means
/// the next future occurrence of that wall-clock time; a full
/// `YYYY-MM-DD HH:MM:SS` is taken literally, past or future.
pub fn parse_target(input: &str) -> Result<DateTime<Local>, TargetParseError> {
    parse_target_with_now(input, Local::now())
}

pub fn parse_target_with_now(
    input: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, TargetParseError> {
    if looks_like_clock_time(input) {
        let time = NaiveTime::parse_from_str(input, "%H:%M")
            .map_err(|_| TargetParseError::InvalidClockTime(input.to_string()))?;
        let today = now.date_naive();
        let candidate = resolve_local(today.and_time(time), input)?;
        if candidate > now {
            return Ok(candidate);
        }
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| TargetParseError::InvalidClockTime(input.to_string()))?;
        return resolve_local(tomorrow.and_time(time), input);
    }

    let naive = NaiveDateTime::parse_from_str(input, LITERAL_FORMAT)
        .map_err(|_| TargetParseError::InvalidDateTime(input.to_string()))?;
    resolve_local(naive, input)
}

fn looks_like_clock_time(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4]
            .iter()
            .all(|&index| bytes[index].is_ascii_digit())
}

fn resolve_local(naive: NaiveDateTime, input: &str) -> Result<DateTime<Local>, TargetParseError> {
    resolve_in_tz(&Local, naive, input)
}

fn resolve_in_tz<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    input: &str,
) -> Result<DateTime<Tz>, TargetParseError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(datetime) => Ok(datetime),
        // DST fold: take the earlier of the two instants.
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(TargetParseError::NonexistentLocalTime(input.to_string())),
    }
}
