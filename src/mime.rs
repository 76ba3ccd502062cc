//! Content type detection for files attached from the command line.

use std::path::Path;

/// Used when neither the content nor the extension says anything.
pub const UNKNOWN: &str = "application/octet-stream";

/// Sniffs the MIME type from magic bytes, falling back to the extension for
/// formats that are easy to misdetect or have no signature (SVG).
pub fn detect(path: &Path, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("svg") => "image/svg+xml",
        _ => UNKNOWN,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("shot.png", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR", "image/png")]
    #[case("photo", b"\xFF\xD8\xFF\xE0\0\x10JFIF\0", "image/jpeg")]
    #[case("doc.bin", b"%PDF-1.7\n", "application/pdf")]
    #[case("bundle.zip", b"PK\x03\x04", "application/zip")]
    #[case("broken.PDF", b"", "application/pdf")]
    #[case("notes.txt", b"hello", UNKNOWN)]
    fn test_detect(#[case] name: &str, #[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(detect(Path::new(name), data), expected);
    }
}
