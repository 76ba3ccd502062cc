use crate::error::{ErrorKind, Result};
use crate::settings::Settings;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override settings
/// (`DAYBOOK_DAY_BOUNDARY_HOUR=4`).
pub const ENV_PREFIX: &str = "DAYBOOK_";

/// `config.toml` in the platform's configuration directory, if the platform
/// has one.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "daybook").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Builds the layered configuration.
///
/// Later layers win:
/// 1. compiled defaults,
/// 2. `user_file` (skipped when it doesn't exist),
/// 3. `explicit`, which must exist and be TOML, YAML or JSON,
/// 4. `DAYBOOK_*` environment variables.
pub fn figment(user_file: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    if let Some(path) = user_file.filter(|p| p.is_file()) {
        tracing::debug!(path = %path.display(), "Merging user configuration");
        figment = figment.merge(Toml::file_exact(path));
    }
    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "Merging explicit configuration");
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file_exact(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        };
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
}

/// Extracts and validates settings from a prepared [`Figment`].
pub fn extract(figment: &Figment) -> Result<Settings> {
    let settings: Settings = figment.extract().or_raise(|| ErrorKind::Load)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from every layer, with an optional explicit file.
#[tracing::instrument(level = "debug")]
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let user_file = user_config_path();
    extract(&figment(user_file.as_deref(), explicit)?)
}
