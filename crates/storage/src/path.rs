//! Path validation for vault-relative paths.
//!
//! Every backend funnels paths through [`validate`] so that nothing a note
//! or a dropped file names can reach outside the vault root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a vault path for security and correctness.
/// Ensures that paths don't escape the vault root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use daybook_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("Daily/2024/Jan/2024-01-15.md").is_ok());
/// assert!(validate_path("Daily/2024/Jan/../Feb/images").is_ok()); // (never leaves vault root)
/// // Invalid paths
/// assert!(validate_path("../outside.md").is_err());
/// assert!(validate_path("Daily/../../outside.md").is_err());
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("/Daily//2024/./Jan/images/").unwrap(),
///     Path::new("Daily/2024/Jan/images")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            // Vault paths are always relative; a leading slash is the vault root.
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Renders a vault path the way notes refer to it: `/`-separated, relative to
/// the vault root.
///
/// Returns [`InvalidPath`](crate::error::ErrorKind::InvalidPath) for paths
/// that don't [validate](validate) or aren't UTF-8.
pub fn to_vault_string(path: impl AsRef<Path>) -> Result<String> {
    let validated = validate(path.as_ref())?;
    let segments = validated
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| exn::Exn::from(ErrorKind::InvalidPath(validated.clone())))?;
    Ok(segments.join("/"))
}
