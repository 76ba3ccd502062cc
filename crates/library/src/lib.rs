//! Attachment intake and daily notes for a markdown vault.
//!
//! [`Intake`] takes files dropped or pasted into a document, saves them next
//! to it and inserts embeds; [`open_daily_note`] makes sure today's note
//! exists. Both work against a [`BackendHandle`](daybook_storage::BackendHandle)
//! and the host collaborators in [`host`].

mod daily;
pub mod error;
pub mod host;
pub mod intake;
pub mod models;
pub mod naming;

pub use crate::daily::{DailyNote, open_daily_note, today};
pub use crate::intake::{BatchOutcome, FileOutcome, Intake, Rejection};
pub use crate::models::{IncomingFile, SavedAttachment};
