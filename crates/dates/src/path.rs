//! Daily note naming and month-bucketed paths.
//!
//! A daily note lives at `{root}/{YYYY}/{Mon}/{name}.md`, where `{name}` is
//! the logical day rendered with the configured [`DateFormat`] and `{Mon}` is
//! the three-letter English month abbreviation.

use crate::boundary::{Clock, DayBoundary, SystemClock, shift_back};
use crate::error::{ErrorKind, Result};
use crate::format::DateFormat;
use exn::ResultExt;
use std::path::{Component, Path};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};
use tracing::instrument;

/// Extension of every note in the vault.
pub const NOTE_EXTENSION: &str = "md";

const MONTH_DIR_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]/[month repr:short]");

/// Location of a daily note.
///
/// Only constructible from its parts, so that `full_path` is always
/// `month_dir/note_name.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DailyNotePath {
    month_dir: String,
    note_name: String,
    full_path: String,
}

impl DailyNotePath {
    pub fn new(month_dir: impl Into<String>, note_name: impl Into<String>) -> Self {
        let month_dir = month_dir.into();
        let note_name = note_name.into();
        let full_path = format!("{month_dir}/{note_name}.{NOTE_EXTENSION}");
        Self { month_dir, note_name, full_path }
    }

    /// `{root}/{YYYY}/{Mon}`
    pub fn month_dir(&self) -> &str {
        &self.month_dir
    }

    /// The rendered logical day, without extension.
    pub fn note_name(&self) -> &str {
        &self.note_name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

/// Renders the note name for `timestamp`.
///
/// When `apply_boundary` is set and the clock's *current* hour is before the
/// boundary, the day before `timestamp` is rendered instead.
pub fn note_name(
    clock: &impl Clock,
    boundary: DayBoundary,
    format: &DateFormat,
    timestamp: PrimitiveDateTime,
    apply_boundary: bool,
) -> Result<String> {
    let shift = apply_boundary && boundary.shifts_note_name(clock.hour());
    format.render(shift_back(timestamp, shift))
}

/// Computes `{root}/{YYYY}/{Mon}` for `timestamp`.
///
/// Uses the [month directory rule](DayBoundary::shifts_month_dir), which
/// shifts one hour earlier than the note name rule does.
pub fn month_dir(
    clock: &impl Clock,
    root_dir: &str,
    boundary: DayBoundary,
    timestamp: PrimitiveDateTime,
    apply_boundary: bool,
) -> Result<String> {
    let shift = apply_boundary && boundary.shifts_month_dir(clock.hour());
    let bucket = shift_back(timestamp, shift).format(MONTH_DIR_FORMAT).or_raise(|| ErrorKind::Render)?;
    Ok(join_root(root_dir, &bucket))
}

/// Full location of the daily note for `timestamp`, boundary rule applied.
#[instrument(level = "debug", skip(clock, format), fields(format = %format))]
pub fn daily_note_path(
    clock: &impl Clock,
    root_dir: &str,
    boundary: DayBoundary,
    format: &DateFormat,
    timestamp: PrimitiveDateTime,
) -> Result<DailyNotePath> {
    let month_dir = month_dir(clock, root_dir, boundary, timestamp, true)?;
    let note_name = note_name(clock, boundary, format, timestamp, true)?;
    Ok(DailyNotePath::new(month_dir, note_name))
}

/// Renders `timestamp` with a format string.
pub fn format_timestamp(format: &str, timestamp: PrimitiveDateTime) -> Result<String> {
    format.parse::<DateFormat>()?.render(timestamp)
}

/// Whether `format` can be used to name daily notes.
///
/// Formats containing `/` would create extra directories and are always
/// rejected. Anything else is accepted if it can render the current time.
pub fn is_valid_format(format: &str) -> bool {
    if format.contains('/') {
        return false;
    }
    match format_timestamp(format, SystemClock.now()) {
        Ok(_) => true,
        Err(e) => {
            let kind: &ErrorKind = &e;
            tracing::debug!(format, error = %kind, "Rejecting date format");
            false
        },
    }
}

/// Decodes the logical day from the path of a daily note.
///
/// Returns `None` unless the file name (extension stripped) strictly matches
/// `format`, the path has a directory component, and the decoded date exists.
///
/// ```
/// use daybook_dates::parse_daily_note_path;
/// use time::macros::date;
///
/// assert_eq!(parse_daily_note_path("notes/2024-01-15.md", "YYYY-MM-DD"), Some(date!(2024-01-15)));
/// assert_eq!(parse_daily_note_path("2024-01-15.md", "YYYY-MM-DD"), None);
/// ```
pub fn parse_daily_note_path(path: &str, format: &str) -> Option<Date> {
    let path = Path::new(path);
    if path.components().filter(|c| matches!(c, Component::Normal(_))).count() < 2 {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    format.parse::<DateFormat>().ok()?.parse_date(stem)
}

fn join_root(root_dir: &str, rest: &str) -> String {
    match root_dir.trim_matches('/') {
        "" => rest.to_string(),
        root => format!("{root}/{rest}"),
    }
}
