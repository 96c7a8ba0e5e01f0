//! Knowledge Base
//!
//! The admin page that feeds documents and video links to the backend's
//! index, and lists what has been indexed.
//!
//! # Design Philosophy
//!
//! Local checks come first: only PDF and DOCX files can enter the upload
//! draft, and an empty draft is never sent. Network work (list, upload,
//! delete) runs on spawned tasks and is folded back in by `poll`, which
//! reports what happened as `KnowledgeEvent`s for the surface to announce.
//! A row disappears only after the server confirms its deletion.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::api::{ApiError, DeskApi, UploadFile, UploadRequest};
use crate::validation::ValidationError;

/// MIME type for PDF parts
pub const PDF_MIME: &str = "application/pdf";

/// MIME type for DOCX parts
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Shown under the link field when it does not look like a video link
pub const LINK_WARNING: &str = "Please enter a valid YouTube URL";

/// Kind of knowledge source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeType {
    /// PDF document
    Pdf,
    /// Word document
    Docx,
    /// Video transcript
    Youtube,
    /// Anything the server reports that this client does not know
    #[serde(other)]
    Other,
}

impl KnowledgeType {
    /// Short label for tables
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Youtube => "YouTube",
            Self::Other => "Other",
        }
    }
}

/// Indexing state of a source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    /// Searchable
    Indexed,
    /// Still being ingested
    Processing,
    /// Ingestion failed
    Error,
}

impl IndexStatus {
    /// Label for tables
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Indexed => "Indexed",
            Self::Processing => "Processing",
            Self::Error => "Error",
        }
    }
}

/// An indexed knowledge source as reported by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Server id (used for deletion)
    pub id: String,
    /// Display name
    pub name: String,
    /// Source kind
    #[serde(rename = "type")]
    pub kind: KnowledgeType,
    /// Indexing state
    pub status: IndexStatus,
    /// When the source was added, as sent by the server
    #[serde(rename = "dateAdded")]
    pub date_added: String,
    /// Human-readable size, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl KnowledgeItem {
    /// `dateAdded` as `Mon D, YYYY`, or verbatim if it does not parse
    #[must_use]
    pub fn display_date(&self) -> String {
        format_date(&self.date_added)
    }
}

/// Format an ISO-8601 or `YYYY-MM-DD HH:MM:SS` date as `Mon D, YYYY`
#[must_use]
pub fn format_date(raw: &str) -> String {
    const FORMAT: &str = "%b %-d, %Y";
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    raw.to_string()
}

/// Whether a link points at a video host the backend can transcribe
#[must_use]
pub fn is_video_link(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

// ============================================
// Upload draft
// ============================================

/// Accepted document formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.pdf`
    Pdf,
    /// `.docx`
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file name's extension, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// MIME type sent with the part
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }
}

/// A document waiting in the upload draft
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name without directories
    pub name: String,
    /// Detected format
    pub format: DocumentFormat,
    /// Contents
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    /// Size in megabytes with one decimal, e.g. `2.4 MB`
    #[must_use]
    pub fn size_label(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let megabytes = self.bytes.len() as f64 / (1024.0 * 1024.0);
        format!("{megabytes:.1} MB")
    }
}

/// Files and link the user is about to upload
#[derive(Clone, Debug, Default)]
pub struct UploadDraft {
    files: Vec<SelectedFile>,
    link: String,
}

impl UploadDraft {
    /// Selected documents
    #[must_use]
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Link text as typed
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Replace the link text
    pub fn set_link(&mut self, link: impl Into<String>) {
        self.link = link.into();
    }

    /// Warning to show under the link field, if any
    ///
    /// Advisory only; a mismatched link is still sent.
    #[must_use]
    pub fn link_warning(&self) -> Option<&'static str> {
        let link = self.link.trim();
        (!link.is_empty() && !is_video_link(link)).then_some(LINK_WARNING)
    }

    /// Add a document by name and contents
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        let format = DocumentFormat::from_name(&name)
            .ok_or_else(|| ValidationError::UnsupportedFile(name.clone()))?;
        self.files.push(SelectedFile {
            name,
            format,
            bytes,
        });
        Ok(())
    }

    /// Add a document from disk
    ///
    /// The extension is checked before the file is read.
    pub fn add_path(&mut self, path: &Path) -> Result<(), ValidationError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if DocumentFormat::from_name(&name).is_none() {
            return Err(ValidationError::UnsupportedFile(name));
        }
        let bytes = std::fs::read(path).map_err(|e| ValidationError::UnreadableFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.add_file(name, bytes)
    }

    /// Remove the document at `index`; out-of-range is ignored
    pub fn remove_file(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Whether there is nothing to upload
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.link.trim().is_empty()
    }

    /// Build the request, or reject an empty draft
    pub fn to_request(&self) -> Result<UploadRequest, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NothingToUpload);
        }
        let link = self.link.trim();
        Ok(UploadRequest {
            files: self
                .files
                .iter()
                .map(|f| UploadFile {
                    file_name: f.name.clone(),
                    mime: f.format.mime(),
                    bytes: f.bytes.clone(),
                })
                .collect(),
            youtube_url: (!link.is_empty()).then(|| link.to_string()),
        })
    }

    /// Empty the draft
    pub fn clear(&mut self) {
        self.files.clear();
        self.link.clear();
    }
}

// ============================================
// Knowledge base state
// ============================================

/// What finished since the last poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KnowledgeEvent {
    /// The source list was refreshed
    SourcesLoaded {
        /// Number of sources
        count: usize,
    },
    /// A list fetch finished after a newer one was started; its result was dropped
    SourcesSuperseded,
    /// The source list could not be fetched
    SourcesFailed {
        /// Error text for logs
        error: String,
    },
    /// The upload was accepted; a refresh has been started
    UploadSucceeded,
    /// The upload failed
    UploadFailed {
        /// Error text for logs
        error: String,
    },
    /// A source was deleted on the server and removed locally
    Deleted {
        /// Display name of the deleted source
        name: String,
    },
    /// A delete failed; the row stays
    DeleteFailed {
        /// Display name of the source
        name: String,
        /// Error text for logs
        error: String,
    },
}

#[derive(Debug)]
enum Completion {
    Listed {
        generation: u64,
        result: Result<Vec<KnowledgeItem>, ApiError>,
    },
    Uploaded(Result<(), ApiError>),
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Source list and upload draft of the knowledge-base page
pub struct KnowledgeBase<A: DeskApi + 'static> {
    api: Arc<A>,
    items: Vec<KnowledgeItem>,
    draft: UploadDraft,
    deleting: HashSet<String>,
    /// Generation of the newest list fetch started
    list_generation: u64,
    lists_in_flight: usize,
    /// Deletes confirmed while a fetch was out, with the newest generation at that point
    tombstones: HashMap<String, u64>,
    uploading: bool,
    /// Spawned operations not yet folded in
    in_flight: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<A: DeskApi + 'static> KnowledgeBase<A> {
    /// Create an empty knowledge base
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            items: Vec::new(),
            draft: UploadDraft::default(),
            deleting: HashSet::new(),
            list_generation: 0,
            lists_in_flight: 0,
            tombstones: HashMap::new(),
            uploading: false,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Sources as last reported by the server
    #[must_use]
    pub fn items(&self) -> &[KnowledgeItem] {
        &self.items
    }

    /// The upload draft
    #[must_use]
    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    /// The upload draft, for editing
    pub fn draft_mut(&mut self) -> &mut UploadDraft {
        &mut self.draft
    }

    /// Whether a delete of `id` is in flight
    #[must_use]
    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Whether a list fetch is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lists_in_flight > 0
    }

    /// Whether an upload is in flight
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Whether any spawned operation is unfinished
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Fetch the source list
    ///
    /// Only the newest fetch is applied. Rows deleted after a fetch started
    /// stay deleted when it lands.
    pub fn refresh(&mut self) {
        self.list_generation += 1;
        self.lists_in_flight += 1;
        let generation = self.list_generation;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            Completion::Listed {
                generation,
                result: api.list_sources().await,
            }
        });
    }

    /// Upload the draft and clear it
    ///
    /// An empty draft is rejected without a request.
    pub fn submit_upload(&mut self) -> Result<(), ValidationError> {
        let request = self.draft.to_request()?;
        self.draft.clear();
        self.uploading = true;

        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Uploaded(api.upload(&request).await) });
        Ok(())
    }

    /// Ask the server to delete a source
    ///
    /// Returns `false` for unknown ids and for deletes already in flight.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.deleting.contains(id) || !self.items.iter().any(|item| item.id == id) {
            return false;
        }
        self.deleting.insert(id.to_string());

        let api = Arc::clone(&self.api);
        let id = id.to_string();
        self.spawn(async move {
            let result = api.delete_source(&id).await;
            Completion::Deleted { id, result }
        });
        true
    }

    /// Fold in finished operations without waiting
    pub fn poll(&mut self) -> Vec<KnowledgeEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            events.push(self.apply(completion));
        }
        events
    }

    /// Wait for every spawned operation, including refreshes they trigger
    pub async fn settle(&mut self) -> Vec<KnowledgeEvent> {
        let mut events = self.poll();
        while self.in_flight > 0 {
            let Some(completion) = self.rx.recv().await else {
                break;
            };
            events.push(self.apply(completion));
        }
        events
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn apply(&mut self, completion: Completion) -> KnowledgeEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Listed { generation, result } => {
                self.lists_in_flight = self.lists_in_flight.saturating_sub(1);
                if generation < self.list_generation {
                    tracing::debug!(
                        generation,
                        latest = self.list_generation,
                        "Dropping superseded source list"
                    );
                    return KnowledgeEvent::SourcesSuperseded;
                }
                match result {
                    Ok(mut items) => {
                        // Fetches started before a delete was confirmed still list the row.
                        items.retain(|item| {
                            self.tombstones
                                .get(&item.id)
                                .is_none_or(|&confirmed_at| generation > confirmed_at)
                        });
                        self.tombstones.clear();
                        self.items = items;
                        tracing::debug!(
                            count = self.items.len(),
                            generation,
                            "Knowledge sources loaded"
                        );
                        KnowledgeEvent::SourcesLoaded {
                            count: self.items.len(),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not load knowledge sources");
                        KnowledgeEvent::SourcesFailed {
                            error: e.to_string(),
                        }
                    }
                }
            }
            Completion::Uploaded(Ok(())) => {
                self.uploading = false;
                tracing::info!("Knowledge base upload accepted");
                self.refresh();
                KnowledgeEvent::UploadSucceeded
            }
            Completion::Uploaded(Err(e)) => {
                self.uploading = false;
                tracing::warn!(error = %e, "Knowledge base upload failed");
                KnowledgeEvent::UploadFailed {
                    error: e.to_string(),
                }
            }
            Completion::Deleted { id, result } => {
                self.deleting.remove(&id);
                let name = self
                    .items
                    .iter()
                    .find(|item| item.id == id)
                    .map_or_else(|| id.clone(), |item| item.name.clone());
                match result {
                    Ok(()) => {
                        self.items.retain(|item| item.id != id);
                        if self.lists_in_flight > 0 {
                            self.tombstones.insert(id.clone(), self.list_generation);
                        }
                        tracing::info!(id = %id, "Knowledge source deleted");
                        KnowledgeEvent::Deleted { name }
                    }
                    Err(e) => {
                        tracing::warn!(id = %id, error = %e, "Could not delete knowledge source");
                        KnowledgeEvent::DeleteFailed {
                            name,
                            error: e.to_string(),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, MockOutcome};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn item(id: &str) -> KnowledgeItem {
        KnowledgeItem {
            id: id.to_string(),
            name: id.to_string(),
            kind: KnowledgeType::Pdf,
            status: IndexStatus::Indexed,
            date_added: "2024-01-15 10:30:00".to_string(),
            size: Some("2.4 KB".to_string()),
        }
    }

    #[test]
    fn test_document_format_detection() {
        assert_eq!(DocumentFormat::from_name("report.pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_name("REPORT.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_name("notes.DocX"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_name("notes.doc"), None);
        assert_eq!(DocumentFormat::from_name("pdf"), None);
        assert_eq!(DocumentFormat::Docx.mime(), DOCX_MIME);
    }

    #[test]
    fn test_draft_rejects_other_files() {
        let mut draft = UploadDraft::default();
        assert_eq!(
            draft.add_file("image.png", vec![1, 2, 3]),
            Err(ValidationError::UnsupportedFile("image.png".to_string()))
        );
        assert!(draft.files().is_empty());
    }

    #[test]
    fn test_draft_add_path_checks_extension_first() {
        let mut draft = UploadDraft::default();
        let result = draft.add_path(Path::new("/definitely/missing/slides.pptx"));
        assert_eq!(
            result,
            Err(ValidationError::UnsupportedFile("slides.pptx".to_string()))
        );
    }

    #[test]
    fn test_draft_add_path_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("manual.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let mut draft = UploadDraft::default();
        draft.add_path(&path).unwrap();
        assert_eq!(draft.files()[0].name, "manual.pdf");
        assert_eq!(draft.files()[0].bytes, b"%PDF-1.4".to_vec());
    }

    #[test]
    fn test_empty_draft_rejected() {
        let mut draft = UploadDraft::default();
        draft.set_link("   ");
        assert_eq!(draft.to_request(), Err(ValidationError::NothingToUpload));
    }

    #[test]
    fn test_link_only_draft() {
        let mut draft = UploadDraft::default();
        draft.set_link(" https://youtu.be/abc ");
        let request = draft.to_request().unwrap();
        assert!(request.files.is_empty());
        assert_eq!(request.youtube_url.as_deref(), Some("https://youtu.be/abc"));
    }

    #[test]
    fn test_link_warning_is_advisory() {
        let mut draft = UploadDraft::default();
        assert_eq!(draft.link_warning(), None);
        draft.set_link("https://vimeo.com/123");
        assert_eq!(draft.link_warning(), Some(LINK_WARNING));
        assert!(draft.to_request().is_ok());
        draft.set_link("https://www.youtube.com/watch?v=x");
        assert_eq!(draft.link_warning(), None);
    }

    #[test]
    fn test_remove_file() {
        let mut draft = UploadDraft::default();
        draft.add_file("a.pdf", vec![]).unwrap();
        draft.add_file("b.docx", vec![]).unwrap();
        assert!(draft.remove_file(5).is_none());
        assert_eq!(draft.remove_file(0).unwrap().name, "a.pdf");
        assert_eq!(draft.files().len(), 1);
    }

    #[test]
    fn test_size_label() {
        let file = SelectedFile {
            name: "a.pdf".to_string(),
            format: DocumentFormat::Pdf,
            bytes: vec![0; 1024 * 1024 * 3 / 2],
        };
        assert_eq!(file.size_label(), "1.5 MB");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15 10:30:00"), "Jan 15, 2024");
        assert_eq!(format_date("2024-03-05T08:00:00Z"), "Mar 5, 2024");
        assert_eq!(format_date("2024-12-01T23:59:59.123"), "Dec 1, 2024");
        assert_eq!(format_date("2024-07-04"), "Jul 4, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_item_wire_format() {
        let body = r#"{"id":"a.pdf","name":"a.pdf","type":"pdf","status":"indexed","dateAdded":"2024-01-15 10:30:00"}"#;
        let item: KnowledgeItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.kind, KnowledgeType::Pdf);
        assert_eq!(item.status, IndexStatus::Indexed);
        assert_eq!(item.size, None);
    }

    #[test]
    fn test_unknown_type_kept_as_other() {
        let body = r#"{"id":"x","name":"x","type":"webpage","status":"processing","dateAdded":""}"#;
        let item: KnowledgeItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.kind, KnowledgeType::Other);
    }

    #[tokio::test]
    async fn test_refresh_loads_items() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().extend([item("a.pdf"), item("b.pdf")]);
        let mut kb = KnowledgeBase::new(Arc::clone(&api));

        kb.refresh();
        assert!(kb.is_loading());
        let events = kb.settle().await;

        assert_eq!(events, vec![KnowledgeEvent::SourcesLoaded { count: 2 }]);
        assert_eq!(kb.items().len(), 2);
        assert!(!kb.is_loading());
    }

    #[tokio::test]
    async fn test_empty_submit_sends_nothing() {
        let api = Arc::new(MockApi::new());
        let mut kb = KnowledgeBase::new(Arc::clone(&api));

        assert_eq!(kb.submit_upload(), Err(ValidationError::NothingToUpload));
        assert!(!kb.is_busy());
        assert!(api.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_upload_clears_draft_and_refreshes() {
        let api = Arc::new(MockApi::new());
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.draft_mut().add_file("guide.pdf", b"pdf".to_vec()).unwrap();

        kb.submit_upload().unwrap();
        assert!(kb.draft().is_empty());
        assert!(kb.is_uploading());

        let events = kb.settle().await;
        assert_eq!(
            events,
            vec![
                KnowledgeEvent::UploadSucceeded,
                KnowledgeEvent::SourcesLoaded { count: 0 },
            ]
        );
        let uploads = api.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].files[0].file_name, "guide.pdf");
        assert_eq!(uploads[0].files[0].mime, PDF_MIME);
        assert_eq!(api.list_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_does_not_refresh() {
        let api = Arc::new(MockApi::new());
        *api.upload_outcome.lock() = MockOutcome::Server(500);
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.draft_mut().set_link("https://youtu.be/abc");

        kb.submit_upload().unwrap();
        let events = kb.settle().await;
        assert!(matches!(events[..], [KnowledgeEvent::UploadFailed { .. }]));
        assert_eq!(api.list_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_waits_for_server() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().push(item("a.pdf"));
        *api.delete_delay.lock() = Duration::from_millis(30);
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.refresh();
        kb.settle().await;

        assert!(kb.delete("a.pdf"));
        assert!(kb.is_deleting("a.pdf"));
        assert_eq!(kb.items().len(), 1);
        assert!(!kb.delete("a.pdf"));

        let events = kb.settle().await;
        assert_eq!(
            events,
            vec![KnowledgeEvent::Deleted {
                name: "a.pdf".to_string()
            }]
        );
        assert!(kb.items().is_empty());
        assert!(!kb.is_deleting("a.pdf"));
        assert_eq!(api.deletes(), vec!["a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_row() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().push(item("a.pdf"));
        *api.delete_outcome.lock() = MockOutcome::Status(404);
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.refresh();
        kb.settle().await;

        assert!(kb.delete("a.pdf"));
        let events = kb.settle().await;
        assert!(matches!(events[..], [KnowledgeEvent::DeleteFailed { .. }]));
        assert_eq!(kb.items().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_started_before_delete_keeps_row_deleted() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().extend([item("a.pdf"), item("b.pdf")]);
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.refresh();
        kb.settle().await;

        // The list is taken before the delete lands but arrives after it.
        api.push_list_delay(Duration::from_millis(100));
        *api.delete_delay.lock() = Duration::from_millis(5);
        kb.refresh();
        assert!(kb.delete("a.pdf"));

        let events = kb.settle().await;
        assert_eq!(
            events,
            vec![
                KnowledgeEvent::Deleted {
                    name: "a.pdf".to_string()
                },
                KnowledgeEvent::SourcesLoaded { count: 1 },
            ]
        );
        let names: Vec<&str> = kb.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b.pdf"]);
        assert!(!kb.is_loading());
    }

    #[tokio::test]
    async fn test_older_refresh_does_not_overwrite_newer() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().push(item("a.pdf"));
        let mut kb = KnowledgeBase::new(Arc::clone(&api));

        api.push_list_delay(Duration::from_millis(80));
        kb.refresh();
        // let the slow fetch take its snapshot
        tokio::time::sleep(Duration::from_millis(10)).await;
        api.sources.lock().push(item("b.pdf"));
        kb.refresh();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(kb.poll(), vec![KnowledgeEvent::SourcesLoaded { count: 2 }]);
        assert!(kb.is_loading());

        assert_eq!(kb.settle().await, vec![KnowledgeEvent::SourcesSuperseded]);
        assert_eq!(kb.items().len(), 2);
        assert!(!kb.is_loading());
    }

    #[tokio::test]
    async fn test_reuploaded_source_is_not_hidden() {
        let api = Arc::new(MockApi::new());
        api.sources.lock().push(item("a.pdf"));
        let mut kb = KnowledgeBase::new(Arc::clone(&api));
        kb.refresh();
        kb.settle().await;

        api.push_list_delay(Duration::from_millis(50));
        kb.refresh();
        assert!(kb.delete("a.pdf"));
        kb.settle().await;
        assert!(kb.items().is_empty());

        api.sources.lock().push(item("a.pdf"));
        kb.refresh();
        kb.settle().await;
        assert_eq!(kb.items().len(), 1);
    }

    #[test]
    fn test_delete_unknown_id() {
        let api = Arc::new(MockApi::new());
        let mut kb = KnowledgeBase::new(api);
        assert!(!kb.delete("missing"));
    }
}
