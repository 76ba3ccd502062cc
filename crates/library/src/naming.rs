//! Collision-free attachment names.
//!
//! Images are numbered per document (`note-image.png`, `note-image-1.png`,
//! ...); other files keep their original name behind the document's.

use daybook_dates::NOTE_EXTENSION;

/// Counts attachments under `dir` whose path contains `prefix`.
///
/// Notes (`.md`) never count. The directory match is a plain string prefix,
/// so `dir` is usually given without a trailing `/`.
///
/// ```
/// use daybook_library::naming::count_siblings_with_prefix;
///
/// let paths = [
///     "Daily/2024/Jan/2024-01-15.md",
///     "Daily/2024/Jan/images/2024-01-15-image.png",
///     "Daily/2024/Jan/images/2024-01-15-image-1.png",
///     "Daily/2024/Feb/images/2024-01-15-image.png",
/// ];
/// assert_eq!(count_siblings_with_prefix(paths, "Daily/2024/Jan", "2024-01-15-image"), 2);
/// ```
pub fn count_siblings_with_prefix<'a>(paths: impl IntoIterator<Item = &'a str>, dir: &str, prefix: &str) -> usize {
    let note_suffix = format!(".{NOTE_EXTENSION}");
    paths
        .into_iter()
        .filter(|path| path.starts_with(dir) && path.contains(prefix) && !path.ends_with(&note_suffix))
        .count()
}

/// The prefix shared by every image attached to `document_basename`.
pub fn image_prefix(document_basename: &str) -> String {
    format!("{document_basename}-image")
}

/// `{document}-image.{ext}` for the first image, `{document}-image-{n}.{ext}`
/// after that.
pub fn image_name(document_basename: &str, existing: usize, extension: &str) -> String {
    let prefix = image_prefix(document_basename);
    match existing {
        0 => format!("{prefix}.{extension}"),
        n => format!("{prefix}-{n}.{extension}"),
    }
}

/// `{document}-{original stem}.{ext}`.
pub fn other_name(document_basename: &str, original_stem: &str, extension: &str) -> String {
    format!("{document_basename}-{original_stem}.{extension}")
}

/// Joins vault path segments with `/`, skipping empty ones.
pub(crate) fn join(segments: &[&str]) -> String {
    segments.iter().map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()).collect::<Vec<_>>().join("/")
}
