//! Values flowing through the intake pipeline.

use std::fmt::{Debug, Formatter, Result as FmtResult};

/// MIME types accepted besides `image/*`.
pub const ALLOWED_DOCUMENT_TYPES: [&str; 2] = ["application/zip", "application/pdf"];

/// A file dropped or pasted into a document.
#[derive(Clone, PartialEq, Eq)]
pub struct IncomingFile {
    /// File name as reported by the host, e.g. `Screenshot 2024-01-15.png`.
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), mime_type: mime_type.into(), data: data.into() }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Whether the intake pipeline accepts this type at all.
    pub fn is_allowed(&self) -> bool {
        self.is_image() || ALLOWED_DOCUMENT_TYPES.contains(&self.mime_type.as_str())
    }

    /// The part of the name after the last `.`, or the MIME subtype when the
    /// name has no extension (`image/svg+xml` gives `svg`).
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => {
                let subtype = self.mime_type.rsplit_once('/').map_or(self.mime_type.as_str(), |(_, subtype)| subtype);
                subtype.split_once('+').map_or(subtype, |(base, _)| base)
            },
        }
    }

    /// The name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
            _ => &self.name,
        }
    }
}

impl Debug for IncomingFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("IncomingFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// An attachment saved (or found already saved) in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAttachment {
    /// Vault path, `/`-separated.
    pub path: String,
    /// The embed inserted into the document.
    pub link: String,
}

impl SavedAttachment {
    pub fn new(path: impl Into<String>, width: Option<u32>) -> Self {
        let path = path.into();
        let link = embed(&path, width);
        Self { path, link }
    }
}

/// `![[path]]`, or `![[path|width]]` when a display width is configured.
pub fn embed(path: &str, width: Option<u32>) -> String {
    match width {
        Some(width) => format!("![[{path}|{width}]]"),
        None => format!("![[{path}]]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.png", "image/png", "photo", "png")]
    #[case("archive.tar.gz", "application/zip", "archive.tar", "gz")]
    #[case("image", "image/jpeg", "image", "jpeg")]
    #[case(".hidden", "application/pdf", ".hidden", "pdf")]
    #[case("trailing.", "image/webp", "trailing.", "webp")]
    #[case("pasted", "image/svg+xml", "pasted", "svg")]
    fn test_stem_and_extension(#[case] name: &str, #[case] mime: &str, #[case] stem: &str, #[case] ext: &str) {
        let file = IncomingFile::new(name, mime, Vec::new());
        assert_eq!(file.stem(), stem);
        assert_eq!(file.extension(), ext);
    }

    #[rstest]
    #[case("image/png", true)]
    #[case("image/svg+xml", true)]
    #[case("application/pdf", true)]
    #[case("application/zip", true)]
    #[case("application/x-zip-compressed", false)]
    #[case("text/plain", false)]
    #[case("", false)]
    fn test_is_allowed(#[case] mime: &str, #[case] allowed: bool) {
        assert_eq!(IncomingFile::new("f", mime, Vec::new()).is_allowed(), allowed);
    }

    #[test]
    fn test_embed() {
        assert_eq!(embed("Daily/images/a.png", None), "![[Daily/images/a.png]]");
        assert_eq!(embed("Daily/images/a.png", Some(300)), "![[Daily/images/a.png|300]]");
        assert_eq!(SavedAttachment::new("a.pdf", Some(10)).link, "![[a.pdf|10]]");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let file = IncomingFile::new("a.png", "image/png", vec![0u8; 2048]);
        assert_eq!(format!("{file:?}"), r#"IncomingFile { name: "a.png", mime_type: "image/png", bytes: 2048 }"#);
    }
}
