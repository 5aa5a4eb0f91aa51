/// Formats a playback position as `MM:SS`, switching to `HH:MM:SS` once the
/// value reaches a full hour. Negative and fractional inputs floor to whole
/// seconds.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_a_minute() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.0), "00:59");
    }

    #[test]
    fn hour_segment_appears_at_one_hour() {
        assert_eq!(format_clock(3599.0), "59:59");
        assert_eq!(format_clock(3600.0), "01:00:00");
        assert_eq!(format_clock(3661.0), "01:01:01");
    }

    #[test]
    fn fifteen_minutes() {
        assert_eq!(format_clock(900.0), "15:00");
    }

    #[test]
    fn odd_inputs_are_normalized() {
        assert_eq!(format_clock(-5.0), "00:00", "negative positions render as the start");
        assert_eq!(format_clock(61.9), "01:01", "sub-second precision is floored");
    }
}
