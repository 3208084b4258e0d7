use chrono::{DateTime, Duration, Utc};

/// The two aggregation ranges of one detection run, anchored at `now`.
///
/// Current window: `[current_start, now)`. Baseline window:
/// `[baseline_start, current_start)`. The baseline ends exactly where the
/// current window begins — contiguous, never overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionWindows {
    pub baseline_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl DetectionWindows {
    #[must_use]
    pub fn at(now: DateTime<Utc>, current_hours: i64, baseline_hours: i64) -> Self {
        Self {
            baseline_start: now - Duration::hours(baseline_hours),
            current_start: now - Duration::hours(current_hours),
            now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn baseline_end_equals_current_start() {
        for (current, baseline) in [(1, 24), (2, 48), (6, 168)] {
            let w = DetectionWindows::at(anchor(), current, baseline);
            // The baseline range is [baseline_start, current_start): its end
            // is the current window's start by construction — no gap, no
            // overlap.
            assert!(w.baseline_start < w.current_start);
            assert!(w.current_start < w.now);
        }
    }

    #[test]
    fn window_lengths_match_the_configured_hours() {
        let w = DetectionWindows::at(anchor(), 1, 24);
        assert_eq!(w.now - w.current_start, chrono::Duration::hours(1));
        assert_eq!(w.current_start - w.baseline_start, chrono::Duration::hours(23));
        assert_eq!(w.now - w.baseline_start, chrono::Duration::hours(24));
    }
}
