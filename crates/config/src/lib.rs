//! Layered configuration for daybook.
//!
//! Settings come from compiled defaults, the user's `config.toml`, an
//! optional explicit file and `DAYBOOK_*` environment variables, in that
//! order, and are validated once after merging.

pub mod error;
mod load;
mod settings;

pub use crate::load::{ENV_PREFIX, extract, figment, load, user_config_path};
pub use crate::settings::{FileHandling, Settings};
