//! Elapsed-time formatting.

use chrono::Duration;
use serde::Serialize;

/// A millisecond count split into clock components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormattedTime {
    /// Whole hours, unbounded.
    pub hours: i64,
    /// Minutes past the hour, `0..60`.
    pub minutes: i64,
    /// Seconds past the minute, `0..60`.
    pub seconds: i64,
}

impl FormattedTime {
    /// Split a millisecond count. Negative input reads as zero.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        let total_seconds = if ms > 0 { ms / 1000 } else { 0 };
        Self {
            hours: total_seconds / 3600,
            minutes: (total_seconds / 60) % 60,
            seconds: total_seconds % 60,
        }
    }

    /// Split a duration.
    #[must_use]
    pub fn from_duration(d: Duration) -> Self {
        Self::from_millis(d.num_milliseconds())
    }
}

impl std::fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Format a duration as `HH:MM:SS`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    FormattedTime::from_duration(d).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_seconds() {
        assert_eq!(FormattedTime::from_millis(5000).to_string(), "00:00:05");
    }

    #[test]
    fn test_components() {
        let t = FormattedTime::from_millis(3_723_999);
        assert_eq!(
            t,
            FormattedTime {
                hours: 1,
                minutes: 2,
                seconds: 3
            }
        );
    }

    #[test]
    fn test_hours_are_unbounded() {
        assert_eq!(format_duration(Duration::hours(125)), "125:00:00");
    }

    #[test]
    fn test_sub_second_floors_to_zero() {
        assert_eq!(FormattedTime::from_millis(999).to_string(), "00:00:00");
    }

    #[test]
    fn test_negative_clamps() {
        assert_eq!(FormattedTime::from_millis(-5000).to_string(), "00:00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(90)), "01:30:00");
        assert_eq!(format_duration(Duration::seconds(59)), "00:00:59");
    }
}
