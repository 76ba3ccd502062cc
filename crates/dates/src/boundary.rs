//! Day-boundary arithmetic.
//!
//! A "logical day" doesn't end at midnight: with a boundary hour of 4, a note
//! written at 01:30 still belongs to the previous calendar day. The check is
//! always made against the *current* wall-clock hour, supplied by a [`Clock`].

use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// Source of the current wall-clock time.
pub trait Clock {
    /// The current local date and time.
    fn now(&self) -> PrimitiveDateTime;

    /// The current local hour (`0..=23`).
    fn hour(&self) -> u8 {
        self.now().hour()
    }
}

/// Reads the system clock, in the local timezone when it can be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        // Determining the local offset fails on some platforms when the
        // process is multi-threaded; UTC is the best we can do then.
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub PrimitiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}

/// The hour before which the previous calendar day is still "today".
///
/// `0` never shifts anything. Values above `23` are accepted and simply shift
/// more often.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayBoundary(u8);

impl DayBoundary {
    pub const fn new(hour: u8) -> Self {
        Self(hour)
    }

    pub const fn hour(self) -> u8 {
        self.0
    }

    /// Whether a note name computed at `current_hour` belongs to yesterday.
    pub const fn shifts_note_name(self, current_hour: u8) -> bool {
        current_hour < self.0
    }

    /// Whether a month directory computed at `current_hour` belongs to
    /// yesterday.
    ///
    /// Offset by one hour compared to [`shifts_note_name`](Self::shifts_note_name).
    pub const fn shifts_month_dir(self, current_hour: u8) -> bool {
        current_hour.saturating_add(1) < self.0
    }
}

impl From<u8> for DayBoundary {
    fn from(hour: u8) -> Self {
        Self::new(hour)
    }
}

/// The same wall-clock time one calendar day earlier.
///
/// Saturates at the earliest representable date.
pub fn previous_day(timestamp: PrimitiveDateTime) -> PrimitiveDateTime {
    timestamp.saturating_sub(Duration::DAY)
}

/// Returns `timestamp`, or the day before it when `shift` is set.
pub fn shift_back(timestamp: PrimitiveDateTime, shift: bool) -> PrimitiveDateTime {
    match shift {
        true => previous_day(timestamp),
        false => timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[test]
    fn test_note_name_rule_grid() {
        for boundary in 0..=23u8 {
            for current in 0..=23u8 {
                assert_eq!(DayBoundary::new(boundary).shifts_note_name(current), current < boundary);
            }
        }
    }

    #[test]
    fn test_month_dir_rule_grid() {
        for boundary in 0..=23u8 {
            for current in 0..=23u8 {
                let expected = boundary >= 2 && current <= boundary - 2;
                assert_eq!(DayBoundary::new(boundary).shifts_month_dir(current), expected);
            }
        }
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(0, 23, false)]
    #[case(24, 0, true)]
    #[case(24, 22, true)]
    #[case(24, 23, false)]
    fn test_month_dir_edges(#[case] boundary: u8, #[case] current: u8, #[case] shifts: bool) {
        assert_eq!(DayBoundary::new(boundary).shifts_month_dir(current), shifts);
    }

    #[test]
    fn test_boundary_24_always_shifts_note_name() {
        assert!((0..=23).all(|hour| DayBoundary::new(24).shifts_note_name(hour)));
    }

    #[rstest]
    #[case(datetime!(2024-03-01 10:00), datetime!(2024-02-29 10:00))]
    #[case(datetime!(2024-01-01 00:00), datetime!(2023-12-31 00:00))]
    #[case(datetime!(2023-03-01 23:59), datetime!(2023-02-28 23:59))]
    fn test_previous_day(#[case] input: PrimitiveDateTime, #[case] expected: PrimitiveDateTime) {
        assert_eq!(previous_day(input), expected);
    }

    #[test]
    fn test_previous_day_does_not_mutate_input() {
        let timestamp = datetime!(2024-03-01 10:00);
        let earlier = previous_day(timestamp);
        assert_ne!(earlier, timestamp);
        assert_eq!(timestamp, datetime!(2024-03-01 10:00));
    }
}
