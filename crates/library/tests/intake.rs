use daybook_config::{FileHandling, Settings};
use daybook_library::host::{CompressOptions, Document, DocumentFile, ImageTransform, Notice, Notifier};
use daybook_library::intake::error::{ErrorKind, Result};
use daybook_library::{BatchOutcome, FileOutcome, IncomingFile, Intake, Rejection, SavedAttachment};
use daybook_storage::BackendHandle;
use daybook_storage::backend::{MockBackend, StorageBackend};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const NOTE: &str = "Daily/2024/Jan/2024-01-15.md";

struct Note {
    file: Option<DocumentFile>,
    inserted: Vec<String>,
}

impl Note {
    fn at(path: &str) -> Self {
        Self { file: Some(DocumentFile::from_path(path)), inserted: Vec::new() }
    }

    fn unsaved() -> Self {
        Self { file: None, inserted: Vec::new() }
    }
}

impl Document for Note {
    fn file(&self) -> Option<DocumentFile> {
        self.file.clone()
    }

    fn replace_selection(&mut self, text: &str) {
        self.inserted.push(text.to_string());
    }
}

#[derive(Default)]
struct Notices(Mutex<Vec<(String, Notice)>>);

impl Notices {
    fn all(&self) -> Vec<(String, Notice)> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Notices {
    fn notify(&self, message: &str, notice: Notice) {
        self.0.lock().unwrap().push((message.to_string(), notice));
    }
}

/// Shrinks images by renaming them to JPEG and truncating the payload.
#[derive(Default)]
struct Shrink {
    calls: Mutex<Vec<CompressOptions>>,
    fail: bool,
}

#[async_trait::async_trait]
impl ImageTransform for Shrink {
    async fn compress(&self, file: IncomingFile, options: CompressOptions) -> Result<IncomingFile> {
        self.calls.lock().unwrap().push(options);
        if self.fail {
            exn::bail!(ErrorKind::Transform(file.name));
        }
        let name = format!("{}.jpg", file.stem());
        Ok(IncomingFile::new(name, "image/jpeg", file.data[..1].to_vec()))
    }
}

struct Harness {
    mock: Arc<MockBackend>,
    notices: Arc<Notices>,
    intake: Intake,
}

fn harness(mock: MockBackend, settings: Settings) -> Harness {
    let mock = Arc::new(mock);
    let notices = Arc::new(Notices::default());
    let backend: BackendHandle = mock.clone();
    let intake = Intake::new(backend, settings, notices.clone());
    Harness { mock, notices, intake }
}

fn png(name: &str) -> IncomingFile {
    IncomingFile::new(name, "image/png", b"\x89PNG\r\n\x1a\n".to_vec())
}

fn pdf(name: &str) -> IncomingFile {
    IncomingFile::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}

fn with_note() -> MockBackend {
    MockBackend::with_files([(NOTE, "# Monday")])
}

#[tokio::test]
async fn test_batch_with_disallowed_type_is_rejected() {
    let h = harness(with_note(), Settings::default());
    let mut note = Note::at(NOTE);
    let files = vec![png("a.png"), IncomingFile::new("notes.txt", "text/plain", b"hi".to_vec())];

    let outcome = h.intake.handle(&mut note, files).await;

    assert_eq!(
        outcome,
        BatchOutcome::Rejected(Rejection::UnsupportedType {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string()
        })
    );
    assert!(h.mock.written().await.is_empty());
    assert!(note.inserted.is_empty());
    let notices = h.notices.all();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].0.contains("notes.txt"));
    assert_eq!(notices[0].1, Notice::Timed);
}

#[tokio::test]
async fn test_second_write_failure_is_contained() {
    let mock = with_note().with_failing_writes(["Daily/2024/Jan/images/2024-01-15-image-1.png"]);
    let h = harness(mock, Settings::default());
    let mut note = Note::at(NOTE);

    let outcome = h.intake.handle(&mut note, vec![png("first.png"), png("second.png")]).await;

    let BatchOutcome::PartialFailure(files) = &outcome else {
        panic!("expected a partial failure, got {outcome:?}");
    };
    assert_eq!(files[0], FileOutcome::Saved(SavedAttachment::new("Daily/2024/Jan/images/2024-01-15-image.png", None)));
    assert_eq!(
        files[1],
        FileOutcome::WriteFailed(SavedAttachment::new("Daily/2024/Jan/images/2024-01-15-image-1.png", None))
    );
    assert!(!files[1].is_success());
    assert_eq!(
        note.inserted,
        vec!["![[Daily/2024/Jan/images/2024-01-15-image.png]]", "![[Daily/2024/Jan/images/2024-01-15-image-1.png]]"]
    );
    assert_eq!(h.mock.written().await, vec![PathBuf::from("Daily/2024/Jan/images/2024-01-15-image.png")]);
    let notices = h.notices.all();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].1, Notice::Persistent);
}

#[tokio::test]
async fn test_existing_target_is_reused() {
    let mock = MockBackend::with_files([(NOTE, "# Monday"), ("Daily/2024/Jan/files/2024-01-15-invoice.pdf", "old")]);
    let h = harness(mock, Settings::default());
    let mut note = Note::at(NOTE);

    let outcome = h.intake.handle(&mut note, vec![pdf("invoice.pdf")]).await;

    assert_eq!(
        outcome,
        BatchOutcome::Completed(vec![FileOutcome::AlreadyExists(SavedAttachment::new(
            "Daily/2024/Jan/files/2024-01-15-invoice.pdf",
            None
        ))])
    );
    assert!(h.mock.written().await.is_empty());
    assert_eq!(h.mock.read(Path::new("Daily/2024/Jan/files/2024-01-15-invoice.pdf")).await.unwrap(), b"old");
    assert_eq!(note.inserted, vec!["![[Daily/2024/Jan/files/2024-01-15-invoice.pdf]]"]);
    assert_eq!(h.notices.all()[0].1, Notice::Timed);
}

#[tokio::test]
async fn test_images_and_documents_go_to_their_folders() {
    let settings = Settings { resize_width: 300, ..Settings::default() };
    let h = harness(with_note(), settings);
    let mut note = Note::at(NOTE);

    let files = vec![
        png("shot.png"),
        pdf("Quarterly report.pdf"),
        IncomingFile::new("bundle.zip", "application/zip", b"PK".to_vec()),
    ];
    let outcome = h.intake.handle(&mut note, files).await;

    assert!(matches!(outcome, BatchOutcome::Completed(_)));
    assert_eq!(
        note.inserted,
        vec![
            "![[Daily/2024/Jan/images/2024-01-15-image.png|300]]",
            "![[Daily/2024/Jan/files/2024-01-15-Quarterly report.pdf|300]]",
            "![[Daily/2024/Jan/files/2024-01-15-bundle.zip|300]]",
        ]
    );
    let directories = h.mock.directories().await;
    assert!(directories.contains(&PathBuf::from("Daily/2024/Jan/images")));
    assert!(directories.contains(&PathBuf::from("Daily/2024/Jan/files")));
}

#[tokio::test]
async fn test_image_numbering_counts_existing_attachments() {
    let mock = MockBackend::with_files([
        (NOTE, "# Monday"),
        ("Daily/2024/Jan/images/2024-01-15-image.png", "a"),
        ("Daily/2024/Jan/images/2024-01-15-image-1.png", "b"),
        ("Daily/2024/Jan/images/2024-01-16-image.png", "other note"),
        ("Daily/2024/Feb/images/2024-01-15-image.png", "other month"),
    ]);
    let h = harness(mock, Settings::default());
    let mut note = Note::at(NOTE);

    h.intake.handle(&mut note, vec![png("next.png")]).await;

    assert_eq!(h.mock.written().await, vec![PathBuf::from("Daily/2024/Jan/images/2024-01-15-image-2.png")]);
}

#[tokio::test]
async fn test_gate() {
    let disabled = harness(with_note(), Settings { file_handling: FileHandling::Disabled, ..Settings::default() });
    let daily_only = harness(with_note(), Settings::default());
    let all_notes = harness(with_note(), Settings { file_handling: FileHandling::AllNotes, ..Settings::default() });

    let rejected = |outcome: BatchOutcome| match outcome {
        BatchOutcome::Rejected(rejection) => rejection,
        other => panic!("expected a rejection, got {other:?}"),
    };

    assert_eq!(rejected(daily_only.intake.handle(&mut Note::at(NOTE), vec![]).await), Rejection::NoFiles);
    assert_eq!(rejected(daily_only.intake.handle(&mut Note::unsaved(), vec![png("a.png")]).await), Rejection::NoDocument);
    assert_eq!(rejected(disabled.intake.handle(&mut Note::at(NOTE), vec![png("a.png")]).await), Rejection::Disabled);
    assert_eq!(
        rejected(daily_only.intake.handle(&mut Note::at("Projects/plan.md"), vec![png("a.png")]).await),
        Rejection::NotDailyNote("Projects/plan.md".to_string())
    );

    let mut plan = Note::at("Projects/plan.md");
    let outcome = all_notes.intake.handle(&mut plan, vec![png("a.png")]).await;
    assert!(matches!(outcome, BatchOutcome::Completed(_)));
    assert_eq!(plan.inserted, vec!["![[Projects/images/plan-image.png]]"]);

    // Gate rejections are silent.
    assert!(disabled.notices.all().is_empty());
    assert!(daily_only.notices.all().is_empty());
}

#[tokio::test]
async fn test_note_at_vault_root() {
    let settings = Settings { file_handling: FileHandling::AllNotes, ..Settings::default() };
    let h = harness(MockBackend::with_files([("Inbox.md", "")]), settings);
    let mut inbox = Note::at("Inbox.md");

    h.intake.handle(&mut inbox, vec![png("a.png")]).await;

    assert_eq!(inbox.inserted, vec!["![[images/Inbox-image.png]]"]);
}

#[tokio::test]
async fn test_empty_file_is_aborted() {
    let h = harness(with_note(), Settings::default());
    let mut note = Note::at(NOTE);

    let files = vec![IncomingFile::new("blank.png", "image/png", Vec::new()), pdf("a.pdf")];
    let outcome = h.intake.handle(&mut note, files).await;

    assert_eq!(
        outcome.files(),
        &[
            FileOutcome::Aborted { name: "blank.png".to_string() },
            FileOutcome::Saved(SavedAttachment::new("Daily/2024/Jan/files/2024-01-15-a.pdf", None)),
        ]
    );
    assert!(matches!(outcome, BatchOutcome::PartialFailure(_)));
    assert_eq!(note.inserted, vec!["![[Daily/2024/Jan/files/2024-01-15-a.pdf]]"]);
    assert_eq!(h.notices.all(), vec![("Could not attach blank.png: blank.png is empty".to_string(), Notice::Persistent)]);
}

#[tokio::test]
async fn test_blocked_folder_aborts_the_file() {
    let mock = MockBackend::with_files([(NOTE, "# Monday"), ("Daily/2024/Jan/images", "not a folder")]);
    let h = harness(mock, Settings::default());
    let mut note = Note::at(NOTE);

    let outcome = h.intake.handle(&mut note, vec![png("a.png")]).await;

    assert_eq!(outcome, BatchOutcome::PartialFailure(vec![FileOutcome::Aborted { name: "a.png".to_string() }]));
    assert!(note.inserted.is_empty());
    assert_eq!(h.notices.all()[0].1, Notice::Persistent);
}

#[tokio::test]
async fn test_images_are_compressed_when_limited() {
    let settings = Settings { max_image_size_kb: 200, preserve_exif_data: true, ..Settings::default() };
    let shrink = Arc::new(Shrink::default());
    let mut h = harness(with_note(), settings);
    h.intake = h.intake.with_transform(shrink.clone());
    let mut note = Note::at(NOTE);

    h.intake.handle(&mut note, vec![png("photo.png"), pdf("a.pdf")]).await;

    assert_eq!(*shrink.calls.lock().unwrap(), vec![CompressOptions { target_size_kb: 200, preserve_metadata: true }]);
    assert_eq!(note.inserted[0], "![[Daily/2024/Jan/images/2024-01-15-image.jpg]]");
    assert_eq!(h.mock.read(Path::new("Daily/2024/Jan/images/2024-01-15-image.jpg")).await.unwrap(), b"\x89");
}

#[tokio::test]
async fn test_images_are_not_compressed_without_limit() {
    let shrink = Arc::new(Shrink::default());
    let mut h = harness(with_note(), Settings::default());
    h.intake = h.intake.with_transform(shrink.clone());

    h.intake.handle(&mut Note::at(NOTE), vec![png("photo.png")]).await;

    assert!(shrink.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_compression_aborts_the_file() {
    let settings = Settings { max_image_size_kb: 200, ..Settings::default() };
    let shrink = Arc::new(Shrink { fail: true, ..Shrink::default() });
    let mut h = harness(with_note(), settings);
    h.intake = h.intake.with_transform(shrink);
    let mut note = Note::at(NOTE);

    let outcome = h.intake.handle(&mut note, vec![png("photo.png"), png("other.png")]).await;

    assert_eq!(
        outcome,
        BatchOutcome::PartialFailure(vec![
            FileOutcome::Aborted { name: "photo.png".to_string() },
            FileOutcome::Aborted { name: "other.png".to_string() },
        ])
    );
    assert!(h.mock.written().await.is_empty());
    assert!(note.inserted.is_empty());
    assert_eq!(h.notices.all().len(), 2);
}
