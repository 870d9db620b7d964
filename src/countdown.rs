use chrono::{DateTime, Local};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CountdownSnapshot {
    pub clock_text: String,
    pub remaining_text: String,
    pub overdue: bool,
}

/// Builds the two display strings for one tick. Fractional leftover seconds
/// truncate toward zero; once the difference is non-positive the remaining
/// time clamps to 00:00:00 and the snapshot is flagged overdue.
pub fn snapshot(target: DateTime<Local>, now: DateTime<Local>) -> CountdownSnapshot {
    let clock_text = now.format("%H:%M:%S").to_string();
    let left_secs = target.signed_duration_since(now).num_seconds();
    CountdownSnapshot {
        clock_text,
        remaining_text: format_remaining(left_secs),
        overdue: left_secs <= 0,
    }
}

fn format_remaining(left_secs: i64) -> String {
    let total = left_secs.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    fn fixture_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 10, 8, 5, 9)
            .single()
            .expect("valid fixture datetime")
    }

    #[test]
    fn clock_text_is_current_wall_time() {
        let now = fixture_now();
        let snap = snapshot(now + chrono::Duration::hours(1), now);
        assert_eq!(snap.clock_text, "08:05:09");
    }

    #[test]
    fn remaining_splits_into_hours_minutes_seconds() {
        let now = fixture_now();
        let target = now
            + chrono::Duration::hours(1)
            + chrono::Duration::minutes(2)
            + chrono::Duration::seconds(3);
        let snap = snapshot(target, now);
        assert_eq!(snap.remaining_text, "01:02:03");
        assert!(!snap.overdue);
    }

    #[test]
    fn target_equal_to_now_is_overdue_at_zero() {
        let now = fixture_now();
        let snap = snapshot(now, now);
        assert_eq!(snap.remaining_text, "00:00:00");
        assert!(snap.overdue);
    }

    #[test]
    fn past_target_clamps_to_zero() {
        let now = fixture_now();
        let snap = snapshot(now - chrono::Duration::hours(5), now);
        assert_eq!(snap.remaining_text, "00:00:00");
        assert!(snap.overdue);
    }

    #[test]
    fn fractional_seconds_truncate_toward_zero() {
        let now = fixture_now();
        let snap = snapshot(now + chrono::Duration::milliseconds(3_700), now);
        assert_eq!(snap.remaining_text, "00:00:03");
        assert!(!snap.overdue);
    }

    #[test]
    fn distant_target_overflows_two_hour_digits() {
        let now = fixture_now();
        let snap = snapshot(now + chrono::Duration::hours(120), now);
        assert_eq!(snap.remaining_text, "120:00:00");
    }
}
