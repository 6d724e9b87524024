//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Time left until a deadline, e.g. `closes in 2h 15m` or `closed`.
pub struct TimeLeft {
    pub deadline: Timestamp,
    pub now: Timestamp,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = self.deadline.duration_since(self.now);
        if remaining.is_zero() || remaining.is_negative() {
            return write!(f, "closed");
        }

        let total_minutes = remaining.as_secs() / 60;
        let (days, hours, minutes) = (
            total_minutes / (24 * 60),
            (total_minutes / 60) % 24,
            total_minutes % 60,
        );
        match (days, hours) {
            (0, 0) if minutes == 0 => write!(f, "closes in under a minute"),
            (0, 0) => write!(f, "closes in {minutes}m"),
            (0, _) => write!(f, "closes in {hours}h {minutes}m"),
            _ => write!(f, "closes in {days}d {hours}h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_time_left() {
        let now: Timestamp = "2030-01-06T08:00:00Z".parse().unwrap();
        let left = |secs: i64| {
            TimeLeft {
                deadline: now + SignedDuration::from_secs(secs),
                now,
            }
            .to_string()
        };

        assert_eq!(left(-5), "closed");
        assert_eq!(left(0), "closed");
        assert_eq!(left(30), "closes in under a minute");
        assert_eq!(left(45 * 60), "closes in 45m");
        assert_eq!(left(2 * 3600 + 15 * 60), "closes in 2h 15m");
        assert_eq!(left(50 * 3600), "closes in 2d 2h");
    }
}
