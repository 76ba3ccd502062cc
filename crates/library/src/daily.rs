//! Today's daily note.

use crate::error::{ErrorKind, Result};
use daybook_config::Settings;
use daybook_dates::{Clock, DailyNotePath, daily_note_path};
use daybook_storage::BackendHandle;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Today's note and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNote {
    pub path: DailyNotePath,
    pub created: bool,
}

/// Computes the daily note path for the clock's current time.
pub fn today(clock: &impl Clock, settings: &Settings) -> Result<DailyNotePath> {
    let format = settings.note_format().or_raise(|| ErrorKind::DailyNotePath)?;
    daily_note_path(clock, &settings.root_dir, settings.day_boundary(), &format, clock.now())
        .or_raise(|| ErrorKind::DailyNotePath)
}

/// Makes sure today's note exists, creating its month folder and an empty
/// note when needed.
///
/// Anything already at the note's path is left alone, even a directory.
#[instrument(level = "info", skip_all, fields(backend = backend.name()))]
pub async fn open_daily_note(backend: &BackendHandle, clock: &impl Clock, settings: &Settings) -> Result<DailyNote> {
    let path = today(clock, settings)?;
    if backend.exists(Path::new(path.full_path())).await.or_raise(|| ErrorKind::Storage)? {
        tracing::debug!(path = path.full_path(), "Daily note already exists");
        return Ok(DailyNote { path, created: false });
    }
    backend.create_dir_all(Path::new(path.month_dir())).await.or_raise(|| ErrorKind::Storage)?;
    backend.write(Path::new(path.full_path()), b"").await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(path = path.full_path(), "Created daily note");
    Ok(DailyNote { path, created: true })
}
