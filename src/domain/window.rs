//! Time-of-day activity windows.
//!
//! A window is an optional start/end pair. When either bound is missing the
//! strategy is unrestricted. A start after the end describes a window that
//! crosses midnight.

use chrono::NaiveTime;

use crate::error::WindowError;

/// Parse a time-of-day bound in `HH:MM` or `HH:MM:SS` form.
///
/// # Errors
///
/// Returns [`WindowError`] when the value is not a valid time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, WindowError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| WindowError {
            value: value.to_string(),
        })
}

/// Whether `now` falls inside `[start, end]`, both ends inclusive.
///
/// Absent bounds mean unrestricted.
#[must_use]
pub fn is_active(now: NaiveTime, start: Option<NaiveTime>, end: Option<NaiveTime>) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return true;
    };

    if start <= end {
        start <= now && now <= end
    } else {
        now >= start || now <= end
    }
}

/// A window as stored on a strategy: raw strings, parsed on use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ActiveWindow {
    #[must_use]
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    /// Check the window at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first bound that fails to parse. Callers decide how to
    /// treat a malformed window.
    pub fn check(&self, now: NaiveTime) -> Result<bool, WindowError> {
        let start = self.start.as_deref().filter(|s| !s.trim().is_empty());
        let end = self.end.as_deref().filter(|s| !s.trim().is_empty());

        let (Some(start), Some(end)) = (start, end) else {
            return Ok(true);
        };

        let start = parse_time_of_day(start)?;
        let end = parse_time_of_day(end)?;
        Ok(is_active(now, Some(start), Some(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn daytime_window_is_inclusive() {
        let (start, end) = (Some(t(9, 0)), Some(t(22, 0)));
        assert!(is_active(t(12, 0), start, end));
        assert!(is_active(t(9, 0), start, end));
        assert!(is_active(t(22, 0), start, end));
        assert!(!is_active(t(23, 0), start, end));
        assert!(!is_active(t(8, 59), start, end));
    }

    #[test]
    fn overnight_window_wraps_midnight() {
        let (start, end) = (Some(t(22, 0)), Some(t(6, 0)));
        assert!(is_active(t(23, 30), start, end));
        assert!(is_active(t(5, 0), start, end));
        assert!(!is_active(t(12, 0), start, end));
    }

    #[test]
    fn missing_bound_is_unrestricted() {
        assert!(is_active(t(3, 0), None, Some(t(1, 0))));
        assert!(is_active(t(3, 0), Some(t(4, 0)), None));
    }

    #[test]
    fn parses_with_and_without_seconds() {
        assert_eq!(parse_time_of_day("09:00").unwrap(), t(9, 0));
        assert_eq!(parse_time_of_day("22:15:00").unwrap(), t(22, 15));
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("noon").is_err());
    }

    #[test]
    fn window_reports_malformed_bound() {
        let window = ActiveWindow::new(Some("9am".into()), Some("22:00".into()));
        let err = window.check(t(12, 0)).unwrap_err();
        assert_eq!(err.value, "9am");
    }

    #[test]
    fn blank_bound_counts_as_missing() {
        let window = ActiveWindow::new(Some(" ".into()), Some("06:00".into()));
        assert!(window.check(t(12, 0)).unwrap());
    }
}
