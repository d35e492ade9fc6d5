//! Meeting window derivation.
//!
//! The calendar boundary books a fixed window relative to the requested
//! time: `[t + 30min, t + 90min)`. The offsets are a policy of the
//! calendar service and are reproduced here exactly for compatibility.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Offset from the requested time to the window start, in minutes.
const WINDOW_START_OFFSET_MINUTES: i64 = 30;

/// Offset from the requested time to the window end, in minutes.
const WINDOW_END_OFFSET_MINUTES: i64 = 90;

/// A half-open scheduling window `[start, end)`.
///
/// Timestamps are naive wall-clock times; the calendar client attaches
/// the configured timezone label when talking to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingWindow {
    /// Window start (inclusive).
    pub start: NaiveDateTime,
    /// Window end (exclusive).
    pub end: NaiveDateTime,
}

impl MeetingWindow {
    /// Derives the window from a requested meeting time.
    #[must_use]
    pub fn from_requested(requested: NaiveDateTime) -> Self {
        Self {
            start: requested + Duration::minutes(WINDOW_START_OFFSET_MINUTES),
            end: requested + Duration::minutes(WINDOW_END_OFFSET_MINUTES),
        }
    }

    /// Window start as a Unix timestamp, treating the wall-clock time
    /// as UTC.
    #[must_use]
    pub fn start_epoch(&self) -> i64 {
        self.start.and_utc().timestamp()
    }

    /// Window end as a Unix timestamp, treating the wall-clock time
    /// as UTC.
    #[must_use]
    pub fn end_epoch(&self) -> i64 {
        self.end.and_utc().timestamp()
    }

    /// Returns true if `[other_start, other_end)` overlaps this window.
    #[must_use]
    pub fn overlaps_epochs(&self, other_start: i64, other_end: i64) -> bool {
        !(self.end_epoch() <= other_start || self.start_epoch() >= other_end)
    }
}

/// Parses a string-encoded meeting timestamp.
///
/// Accepts ISO-8601 naive timestamps such as `2025-01-01T10:00:00`.
/// Empty or unparsable input yields `None`; the caller reports this as
/// an invalid meeting time rather than retrying.
#[must_use]
pub fn parse_meeting_ts(meeting_ts: &str) -> Option<NaiveDateTime> {
    let trimmed = meeting_ts.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<NaiveDateTime>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested() -> NaiveDateTime {
        parse_meeting_ts("2025-01-01T10:00:00").expect("valid timestamp")
    }

    #[test]
    fn window_offsets() {
        let window = MeetingWindow::from_requested(requested());
        assert_eq!(window.start, parse_meeting_ts("2025-01-01T10:30:00").unwrap());
        assert_eq!(window.end, parse_meeting_ts("2025-01-01T11:30:00").unwrap());
    }

    #[test]
    fn epoch_span_is_one_hour() {
        let window = MeetingWindow::from_requested(requested());
        assert_eq!(window.end_epoch() - window.start_epoch(), 3600);
    }

    #[test]
    fn overlap_detection() {
        let window = MeetingWindow::from_requested(requested());
        let start = window.start_epoch();
        let end = window.end_epoch();

        // Adjacent events do not overlap
        assert!(!window.overlaps_epochs(start - 3600, start));
        assert!(!window.overlaps_epochs(end, end + 3600));

        // Partial and full overlaps do
        assert!(window.overlaps_epochs(start - 600, start + 600));
        assert!(window.overlaps_epochs(start + 60, end - 60));
        assert!(window.overlaps_epochs(start - 600, end + 600));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_meeting_ts("").is_none());
        assert!(parse_meeting_ts("tomorrow at noon").is_none());
        assert!(parse_meeting_ts("2025-13-40T99:00:00").is_none());
    }

    #[test]
    fn parse_accepts_iso_naive() {
        assert!(parse_meeting_ts("2025-06-15T09:30:00").is_some());
        assert!(parse_meeting_ts("  2025-06-15T09:30:00  ").is_some());
    }
}
