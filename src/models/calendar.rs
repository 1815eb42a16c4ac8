//! Calendar and time window models.
//!
//! A calendar is the remaining availability of one resource: an ordered set
//! of disjoint half-open windows. It starts from the resource's working time
//! (minus blocked periods) and shrinks as allocations are committed.
//!
//! # Time Model
//! All times are integers on a shared discrete timeline. The consumer
//! defines what a unit means (minutes, shifts, days).
//!
//! # Canonical Form
//! After every mutation the windows are sorted by start, non-empty, and
//! separated by a gap: overlapping or touching windows are merged.
//! An empty calendar means "never available".

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// A point on the scheduling timeline.
pub type Time = i64;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: Time,
    /// Interval end (exclusive).
    pub end: Time,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    /// Whether the window covers no time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a time point falls within this window.
    #[inline]
    pub fn contains(&self, time: Time) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `other` lies entirely inside this window.
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlapping part of two windows, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then_some(Self { start, end })
    }
}

/// Remaining availability of a single resource.
///
/// # Example
///
/// ```
/// use window_sched::models::{Calendar, TimeWindow};
///
/// let mut cal = Calendar::new().with_window(0, 4).with_window(5, 10);
/// cal.reserve(TimeWindow::new(0, 3)).unwrap();
/// assert_eq!(cal.windows(), &[TimeWindow::new(3, 4), TimeWindow::new(5, 10)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeWindow>", into = "Vec<TimeWindow>")]
pub struct Calendar {
    windows: Vec<TimeWindow>,
}

impl Calendar {
    /// Creates an empty calendar (never available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from arbitrary windows, normalizing them.
    pub fn from_windows(windows: impl IntoIterator<Item = TimeWindow>) -> Self {
        Self {
            windows: normalize(windows.into_iter().collect()),
        }
    }

    /// Adds an availability window.
    pub fn with_window(mut self, start: Time, end: Time) -> Self {
        self.add_window(TimeWindow::new(start, end));
        self
    }

    /// Adds a blocked period (overrides availability).
    pub fn with_blocked(mut self, start: Time, end: Time) -> Self {
        self.block(TimeWindow::new(start, end));
        self
    }

    /// Adds an availability window in place.
    pub fn add_window(&mut self, window: TimeWindow) {
        if window.is_empty() {
            return;
        }
        let mut windows = std::mem::take(&mut self.windows);
        windows.push(window);
        self.windows = normalize(windows);
    }

    /// Removes `span` from availability wherever it overlaps.
    ///
    /// Unlike [`reserve`](Self::reserve), the span may cover gaps or several
    /// windows.
    pub fn block(&mut self, span: TimeWindow) {
        if span.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.windows.len() + 1);
        for w in &self.windows {
            if !w.overlaps(&span) {
                kept.push(*w);
                continue;
            }
            if w.start < span.start {
                kept.push(TimeWindow::new(w.start, span.start));
            }
            if span.end < w.end {
                kept.push(TimeWindow::new(span.end, w.end));
            }
        }
        self.windows = kept;
    }

    /// The current windows, sorted and disjoint.
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Whether no availability remains.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Availability at or after `floor`.
    ///
    /// A window straddling `floor` is clipped to start at `floor`.
    pub fn windows_from(&self, floor: Time) -> Vec<TimeWindow> {
        let first = self.first_ending_after(floor);
        self.windows[first..]
            .iter()
            .map(|w| TimeWindow::new(w.start.max(floor), w.end))
            .collect()
    }

    /// Total remaining availability.
    pub fn total_available(&self) -> Time {
        self.windows.iter().map(TimeWindow::duration).sum()
    }

    /// Availability within [start, end).
    pub fn available_in_range(&self, start: Time, end: Time) -> Time {
        let range = TimeWindow::new(start, end);
        if range.is_empty() {
            return 0;
        }
        self.windows
            .iter()
            .filter_map(|w| w.intersection(&range))
            .map(|w| w.duration())
            .sum()
    }

    /// Finds the first available time at or after `from`.
    ///
    /// Returns `None` if no future availability exists.
    pub fn next_available_time(&self, from: Time) -> Option<Time> {
        self.windows
            .get(self.first_ending_after(from))
            .map(|w| w.start.max(from))
    }

    /// Whether `span` lies inside a single window.
    pub fn is_free(&self, span: &TimeWindow) -> bool {
        self.containing_index(span).is_some()
    }

    /// Consumes `span`, splitting its window into at most two remainders.
    ///
    /// # Errors
    /// - [`CalendarError::EmptySpan`] if `span` covers no time.
    /// - [`CalendarError::SpanNotContained`] if `span` is not inside a single window.
    pub fn reserve(&mut self, span: TimeWindow) -> Result<(), CalendarError> {
        if span.is_empty() {
            return Err(CalendarError::EmptySpan {
                start: span.start,
                end: span.end,
            });
        }
        let idx = self
            .containing_index(&span)
            .ok_or(CalendarError::SpanNotContained {
                start: span.start,
                end: span.end,
            })?;

        let w = self.windows[idx];
        let mut remainder = Vec::with_capacity(2);
        if w.start < span.start {
            remainder.push(TimeWindow::new(w.start, span.start));
        }
        if span.end < w.end {
            remainder.push(TimeWindow::new(span.end, w.end));
        }
        self.windows.splice(idx..=idx, remainder);
        Ok(())
    }

    /// Reserves every span or none of them.
    pub fn reserve_all(&mut self, spans: &[TimeWindow]) -> Result<(), CalendarError> {
        let mut staged = self.clone();
        for span in spans {
            staged.reserve(*span)?;
        }
        *self = staged;
        Ok(())
    }

    /// Index of the first window whose end lies after `t`.
    fn first_ending_after(&self, t: Time) -> usize {
        self.windows.partition_point(|w| w.end <= t)
    }

    fn containing_index(&self, span: &TimeWindow) -> Option<usize> {
        let idx = self.first_ending_after(span.start);
        self.windows
            .get(idx)
            .filter(|w| w.covers(span))
            .map(|_| idx)
    }
}

impl From<Vec<TimeWindow>> for Calendar {
    fn from(windows: Vec<TimeWindow>) -> Self {
        Self::from_windows(windows)
    }
}

impl From<Calendar> for Vec<TimeWindow> {
    fn from(calendar: Calendar) -> Self {
        calendar.windows
    }
}

/// Sorts, drops empty windows, and merges overlapping or touching ones.
fn normalize(mut windows: Vec<TimeWindow>) -> Vec<TimeWindow> {
    windows.retain(|w| !w.is_empty());
    windows.sort();

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(windows.len());
    for w in windows {
        match merged.last_mut() {
            Some(last) if w.start <= last.end => last.end = last.end.max(w.end),
            _ => merged.push(w),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn tw(start: Time, end: Time) -> TimeWindow {
        TimeWindow::new(start, end)
    }

    fn assert_canonical(cal: &Calendar) {
        for w in cal.windows() {
            assert!(w.start < w.end, "empty window {w:?}");
        }
        for pair in cal.windows().windows(2) {
            assert!(pair[0].end < pair[1].start, "not separated: {pair:?}");
        }
    }

    #[test]
    fn test_time_window() {
        let w = tw(100, 200);
        assert_eq!(w.duration(), 100);
        assert!(w.contains(100));
        assert!(w.contains(199));
        assert!(!w.contains(200)); // exclusive end
        assert!(!w.contains(50));
        assert!(w.covers(&tw(120, 200)));
        assert!(!w.covers(&tw(120, 201)));
    }

    #[test]
    fn test_time_window_overlap() {
        let a = tw(0, 100);
        let b = tw(50, 150);
        assert!(a.overlaps(&b));
        assert_eq!(a.intersection(&b), Some(tw(50, 100)));

        let c = tw(100, 200); // touching but not overlapping
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_normalization_merges_and_sorts() {
        let cal = Calendar::from_windows(vec![tw(5, 10), tw(0, 4), tw(8, 12), tw(12, 15), tw(3, 3)]);
        assert_eq!(cal.windows(), &[tw(0, 4), tw(5, 15)]);
        assert_canonical(&cal);
    }

    #[test]
    fn test_empty_calendar_never_available() {
        let cal = Calendar::new();
        assert!(cal.is_empty());
        assert!(cal.windows_from(0).is_empty());
        assert_eq!(cal.next_available_time(0), None);
    }

    #[test]
    fn test_blocked_overrides() {
        let cal = Calendar::new()
            .with_window(0, 100)
            .with_window(200, 300)
            .with_blocked(50, 250); // spans the gap

        assert_eq!(cal.windows(), &[tw(0, 50), tw(250, 300)]);
        assert_eq!(cal.total_available(), 100);
    }

    #[test]
    fn test_windows_from_clips_straddling_window() {
        let cal = Calendar::new().with_window(0, 4).with_window(5, 10);
        assert_eq!(cal.windows_from(2), vec![tw(2, 4), tw(5, 10)]);
        assert_eq!(cal.windows_from(4), vec![tw(5, 10)]);
        assert_eq!(cal.windows_from(7), vec![tw(7, 10)]);
        assert!(cal.windows_from(10).is_empty());
    }

    #[test]
    fn test_next_available_time() {
        let cal = Calendar::new().with_window(0, 8).with_window(16, 24);
        assert_eq!(cal.next_available_time(4), Some(4)); // already available
        assert_eq!(cal.next_available_time(10), Some(16)); // wait for next shift
        assert_eq!(cal.next_available_time(24), None);
    }

    #[test]
    fn test_available_in_range() {
        let cal = Calendar::new().with_window(0, 40).with_window(60, 100);
        assert_eq!(cal.available_in_range(0, 100), 80);
        assert_eq!(cal.available_in_range(30, 70), 20);
        assert_eq!(cal.available_in_range(70, 30), 0);
    }

    #[test]
    fn test_reserve_splits_window() {
        let mut cal = Calendar::new().with_window(0, 10);
        cal.reserve(tw(3, 6)).unwrap();
        assert_eq!(cal.windows(), &[tw(0, 3), tw(6, 10)]);

        cal.reserve(tw(0, 3)).unwrap(); // whole window consumed
        assert_eq!(cal.windows(), &[tw(6, 10)]);
    }

    #[test]
    fn test_reserve_rejects_uncontained_span() {
        let mut cal = Calendar::new().with_window(0, 4).with_window(5, 10);
        let err = cal.reserve(tw(3, 6)).unwrap_err();
        assert_eq!(err, CalendarError::SpanNotContained { start: 3, end: 6 });
        assert_eq!(cal.windows(), &[tw(0, 4), tw(5, 10)]); // untouched

        assert!(matches!(
            cal.reserve(tw(2, 2)),
            Err(CalendarError::EmptySpan { .. })
        ));
    }

    #[test]
    fn test_reserve_all_is_atomic() {
        let mut cal = Calendar::new().with_window(0, 10);
        let err = cal.reserve_all(&[tw(0, 2), tw(8, 12)]);
        assert!(err.is_err());
        assert_eq!(cal.windows(), &[tw(0, 10)]);

        cal.reserve_all(&[tw(0, 2), tw(8, 10)]).unwrap();
        assert_eq!(cal.windows(), &[tw(2, 8)]);
    }

    #[test]
    fn test_serde_normalizes_input() {
        let cal: Calendar =
            serde_json::from_str(r#"[{"start":5,"end":10},{"start":0,"end":5}]"#).unwrap();
        assert_eq!(cal.windows(), &[tw(0, 10)]);
        let json = serde_json::to_string(&cal).unwrap();
        assert_eq!(json, r#"[{"start":0,"end":10}]"#);
    }

    /// Random reservations keep the calendar canonical and never double-book.
    #[test]
    fn test_random_reservations_preserve_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut cal = Calendar::new();
            for _ in 0..rng.random_range(1..6) {
                let start = rng.random_range(0..200);
                cal.add_window(tw(start, start + rng.random_range(1..40)));
            }
            let original = cal.clone();
            let mut reserved: Vec<TimeWindow> = Vec::new();

            for _ in 0..30 {
                let windows = cal.windows().to_vec();
                if windows.is_empty() {
                    break;
                }
                let w = windows[rng.random_range(0..windows.len())];
                let start = rng.random_range(w.start..w.end);
                let end = rng.random_range(start + 1..=w.end);
                cal.reserve(tw(start, end)).unwrap();
                reserved.push(tw(start, end));
                assert_canonical(&cal);
            }

            // Union of remaining + reserved equals the original availability.
            let remaining: Time = cal.total_available();
            let consumed: Time = reserved.iter().map(TimeWindow::duration).sum();
            assert_eq!(remaining + consumed, original.total_available());

            for (i, a) in reserved.iter().enumerate() {
                assert!(original.is_free(a));
                assert!(cal.windows().iter().all(|w| !w.overlaps(a)));
                for b in &reserved[i + 1..] {
                    assert!(!a.overlaps(b), "double booked {a:?} and {b:?}");
                }
            }
        }
    }
}
