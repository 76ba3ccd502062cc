use crate::error::{ErrorKind, Result};
use daybook_dates::{DateFormat, DayBoundary, is_valid_format};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Which documents dropped or pasted files are handled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileHandling {
    /// Never intercept files.
    Disabled,
    /// Only intercept files dropped into a daily note.
    #[default]
    DailyNotesOnly,
    /// Intercept files dropped into any note.
    AllNotes,
}

/// Every user-facing setting.
///
/// Loaded with [`load`](crate::load); `-1` in `max_image_size_kb` and
/// `resize_width` means "not set" and is exposed as `None` by
/// [`image_size_limit_kb`](Self::image_size_limit_kb) and
/// [`embed_width`](Self::embed_width).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vault folder holding the `YYYY/Mon` month directories.
    pub root_dir: String,
    /// Hour (`0..=23`) before which the previous calendar day is still today.
    pub day_boundary_hour: u8,
    /// Moment-style token string used to name daily notes.
    pub date_format: String,
    pub file_handling: FileHandling,
    /// Folder, next to the note, that images are saved into.
    pub image_sub_dir: String,
    /// Folder, next to the note, that PDFs and archives are saved into.
    pub other_files_sub_dir: String,
    pub max_image_size_kb: i64,
    /// Keep EXIF metadata when images are compressed.
    pub preserve_exif_data: bool,
    pub resize_width: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: "Daily".to_string(),
            day_boundary_hour: 0,
            date_format: "YYYY-MM-DD".to_string(),
            file_handling: FileHandling::default(),
            image_sub_dir: "images".to_string(),
            other_files_sub_dir: "files".to_string(),
            max_image_size_kb: -1,
            preserve_exif_data: false,
            resize_width: -1,
        }
    }
}

impl Settings {
    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::new(self.day_boundary_hour)
    }

    /// The compiled daily note format.
    pub fn note_format(&self) -> Result<DateFormat> {
        self.date_format.parse::<DateFormat>().or_raise(|| ErrorKind::invalid("date_format", self.date_format.clone()))
    }

    /// Target size for image compression, `None` when images are kept as-is.
    pub fn image_size_limit_kb(&self) -> Option<u32> {
        sentinel(self.max_image_size_kb)
    }

    /// Width added to image embeds, `None` for a plain `![[path]]`.
    pub fn embed_width(&self) -> Option<u32> {
        sentinel(self.resize_width)
    }

    /// Checks every value that deserialized fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.day_boundary_hour > 23 {
            exn::bail!(ErrorKind::invalid("day_boundary_hour", "must be between 0 and 23"));
        }
        if !is_valid_format(&self.date_format) {
            exn::bail!(ErrorKind::invalid("date_format", format!("`{}` cannot name a daily note", self.date_format)));
        }
        check_vault_dir("root_dir", &self.root_dir, true)?;
        check_vault_dir("image_sub_dir", &self.image_sub_dir, false)?;
        check_vault_dir("other_files_sub_dir", &self.other_files_sub_dir, false)?;
        check_sentinel("max_image_size_kb", self.max_image_size_kb)?;
        check_sentinel("resize_width", self.resize_width)?;
        Ok(())
    }
}

fn sentinel(value: i64) -> Option<u32> {
    match value {
        -1 => None,
        value => u32::try_from(value).ok(),
    }
}

fn check_sentinel(key: &'static str, value: i64) -> Result<()> {
    if value == -1 || (value > 0 && u32::try_from(value).is_ok()) {
        return Ok(());
    }
    exn::bail!(ErrorKind::invalid(key, format!("expected -1 or a positive number, got {value}")))
}

/// Directories must stay inside the vault. `root_dir` may start with `/`
/// (it is trimmed), sub-directories are always relative to the note.
fn check_vault_dir(key: &'static str, dir: &str, allow_leading_slash: bool) -> Result<()> {
    for component in Path::new(dir).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {},
            Component::RootDir if allow_leading_slash => {},
            _ => exn::bail!(ErrorKind::invalid(key, format!("`{dir}` must be a relative path inside the vault"))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.image_size_limit_kb(), None);
        assert_eq!(settings.embed_width(), None);
        assert_eq!(settings.note_format().unwrap().as_str(), "YYYY-MM-DD");
    }

    #[rstest]
    #[case(-1, None)]
    #[case(500, Some(500))]
    #[case(1, Some(1))]
    fn test_sentinels(#[case] value: i64, #[case] expected: Option<u32>) {
        let settings = Settings { max_image_size_kb: value, resize_width: value, ..Settings::default() };
        assert_eq!(settings.image_size_limit_kb(), expected);
        assert_eq!(settings.embed_width(), expected);
    }

    #[rstest]
    #[case::boundary_too_late(Settings { day_boundary_hour: 24, ..Settings::default() }, "day_boundary_hour")]
    #[case::slash_in_format(Settings { date_format: "YYYY/MM/DD".into(), ..Settings::default() }, "date_format")]
    #[case::unsupported_token(Settings { date_format: "MMMM Do".into(), ..Settings::default() }, "date_format")]
    #[case::root_escapes(Settings { root_dir: "../Daily".into(), ..Settings::default() }, "root_dir")]
    #[case::absolute_sub_dir(Settings { image_sub_dir: "/images".into(), ..Settings::default() }, "image_sub_dir")]
    #[case::escaping_sub_dir(Settings { other_files_sub_dir: "../files".into(), ..Settings::default() }, "other_files_sub_dir")]
    #[case::zero_size(Settings { max_image_size_kb: 0, ..Settings::default() }, "max_image_size_kb")]
    #[case::negative_width(Settings { resize_width: -5, ..Settings::default() }, "resize_width")]
    fn test_validate_rejects(#[case] settings: Settings, #[case] key: &str) {
        let err = settings.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { key: k, .. } if *k == key), "{err:?}");
    }

    #[rstest]
    #[case(Settings { root_dir: "/Notes/Daily/".into(), ..Settings::default() })]
    #[case(Settings { root_dir: String::new(), ..Settings::default() })]
    #[case(Settings { image_sub_dir: String::new(), other_files_sub_dir: "attachments/pdf".into(), ..Settings::default() })]
    #[case(Settings { day_boundary_hour: 23, max_image_size_kb: 250, resize_width: 640, ..Settings::default() })]
    fn test_validate_accepts(#[case] settings: Settings) {
        settings.validate().unwrap();
    }

    #[test]
    fn test_file_handling_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: FileHandling,
        }
        let parse = |s: &str| figment::Figment::from(figment::providers::Serialized::default("mode", s))
            .extract::<Wrapper>()
            .unwrap()
            .mode;
        assert_eq!(parse("disabled"), FileHandling::Disabled);
        assert_eq!(parse("daily-notes-only"), FileHandling::DailyNotesOnly);
        assert_eq!(parse("all-notes"), FileHandling::AllNotes);
    }
}
