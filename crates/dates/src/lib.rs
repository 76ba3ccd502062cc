//! Logical days and daily note paths.
//!
//! Everything in this crate is pure: the only input from the outside world is
//! the wall-clock hour, and that comes through a [`Clock`].

mod boundary;
pub mod error;
mod format;
mod path;

pub use crate::boundary::{Clock, DayBoundary, FixedClock, SystemClock, previous_day, shift_back};
pub use crate::format::DateFormat;
pub use crate::path::{
    DailyNotePath, NOTE_EXTENSION, daily_note_path, format_timestamp, is_valid_format, month_dir, note_name,
    parse_daily_note_path,
};
