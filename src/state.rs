//! Extraction session lifecycle.
//!
//! [`ExtractorSession`] is a small state machine a host (the CLI, a
//! service handler) drives around the extraction pipeline. It owns the
//! currently selected file, the results of the last run, and the single
//! user-visible message for the current state. Events fired from a state
//! that does not accept them return [`ExtractError::InvalidTransition`]
//! and leave the session untouched.
//!
//! ```text
//!            select_file            start_extraction
//!   Idle ───────────────► FileSelected ───────────► Extracting
//!    ▲                        ▲  ▲                   │      │
//!    │          select_file ──┘  └── select_file     │      │
//!    │                        succeeded ◄────────────┘      │
//!    │                            │                         │
//!    └── (new session)          Done ◄──┐   Failed ◄────────┘
//!                                 │     │     │
//!                                 └─────┴─────┴── start_extraction (re-run)
//! ```

use crate::error::ExtractError;
use crate::output::ExtractionOutput;
use crate::pipeline::load;

/// A file the user has picked for extraction, with its declared MIME
/// type. The bytes are held in memory for the life of the session.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Original filename, used for display only.
    pub name: String,
    /// Declared MIME type, e.g. `application/pdf`.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Where a session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file selected yet.
    Idle,
    /// A valid PDF file is selected and ready to extract.
    FileSelected,
    /// An extraction run is in flight.
    Extracting,
    /// The last run finished; results (possibly none) are available.
    Done,
    /// The last run failed fatally; the message says why.
    Failed,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::FileSelected => "ready",
            SessionState::Extracting => "extracting",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        }
    }
}

/// Drives one file selection → extraction → results cycle.
///
/// Selecting a new file at any point (except mid-run) discards the
/// previous results and message, so stale output from an earlier file
/// can never be shown against a newer one.
#[derive(Debug)]
pub struct ExtractorSession {
    state: SessionState,
    file: Option<SelectedFile>,
    output: Option<ExtractionOutput>,
    failure: Option<String>,
}

impl Default for ExtractorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            file: None,
            output: None,
            failure: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The currently selected file, if any.
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Results of the last completed run.
    pub fn output(&self) -> Option<&ExtractionOutput> {
        self.output.as_ref()
    }

    /// Select a file for extraction.
    ///
    /// Accepted from every state except [`SessionState::Extracting`].
    /// Rejects files whose MIME type does not indicate a PDF without
    /// touching the session, so a prior result list survives a botched
    /// re-selection attempt.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), ExtractError> {
        if self.state == SessionState::Extracting {
            return Err(self.rejected("select a file"));
        }
        if !load::is_pdf_mime(&file.mime) {
            return Err(ExtractError::UnsupportedFileType { mime: file.mime });
        }

        self.file = Some(file);
        self.output = None;
        self.failure = None;
        self.state = SessionState::FileSelected;
        Ok(())
    }

    /// Begin an extraction run over the selected file.
    ///
    /// Accepted from [`SessionState::FileSelected`], and from
    /// [`SessionState::Done`] / [`SessionState::Failed`] to re-run the
    /// same file. Returns the file to extract; the caller runs the
    /// pipeline and reports back with [`Self::extraction_succeeded`] or
    /// [`Self::extraction_failed`].
    pub fn start_extraction(&mut self) -> Result<&SelectedFile, ExtractError> {
        match self.state {
            SessionState::FileSelected | SessionState::Done | SessionState::Failed => {}
            _ => return Err(self.rejected("start extraction")),
        }
        let Some(ref file) = self.file else {
            return Err(self.rejected("start extraction"));
        };

        self.output = None;
        self.failure = None;
        self.state = SessionState::Extracting;
        Ok(file)
    }

    /// Record a completed run. Only accepted while extracting.
    pub fn extraction_succeeded(&mut self, output: ExtractionOutput) -> Result<(), ExtractError> {
        if self.state != SessionState::Extracting {
            return Err(self.rejected("record results"));
        }
        self.output = Some(output);
        self.state = SessionState::Done;
        Ok(())
    }

    /// Record a fatally failed run. Only accepted while extracting.
    pub fn extraction_failed(&mut self, error: &ExtractError) -> Result<(), ExtractError> {
        if self.state != SessionState::Extracting {
            return Err(self.rejected("record a failure"));
        }
        self.failure = Some(error.to_string());
        self.state = SessionState::Failed;
        Ok(())
    }

    /// The single user-visible message for the current state, if any.
    ///
    /// A failed run yields its error message; a completed run that found
    /// nothing yields the informational empty notice. At most one of the
    /// two is ever present.
    pub fn message(&self) -> Option<&str> {
        match self.state {
            SessionState::Failed => self.failure.as_deref(),
            SessionState::Done => self.output.as_ref().and_then(|o| o.notice()),
            _ => None,
        }
    }

    fn rejected(&self, event: &'static str) -> ExtractError {
        ExtractError::InvalidTransition {
            event,
            state: self.state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DocumentMetadata, ExtractionStats};

    fn pdf_file() -> SelectedFile {
        SelectedFile::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec())
    }

    fn empty_output() -> ExtractionOutput {
        ExtractionOutput {
            images: vec![],
            metadata: DocumentMetadata::default(),
            stats: ExtractionStats::default(),
        }
    }

    #[test]
    fn fresh_session_is_idle_with_no_message() {
        let session = ExtractorSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.file().is_none());
        assert!(session.message().is_none());
    }

    #[test]
    fn selecting_a_pdf_moves_to_file_selected() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("valid PDF");
        assert_eq!(session.state(), SessionState::FileSelected);
        assert_eq!(session.file().map(|f| f.name.as_str()), Some("report.pdf"));
    }

    #[test]
    fn selecting_a_non_pdf_is_rejected_and_state_unchanged() {
        let mut session = ExtractorSession::new();
        let err = session
            .select_file(SelectedFile::new("photo.png", "image/png", vec![]))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn start_extraction_requires_a_selected_file() {
        let mut session = ExtractorSession::new();
        let err = session.start_extraction().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidTransition { .. }));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn full_happy_path() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("select");
        session.start_extraction().expect("start");
        assert_eq!(session.state(), SessionState::Extracting);
        session
            .extraction_succeeded(empty_output())
            .expect("succeed");
        assert_eq!(session.state(), SessionState::Done);
        assert!(session.output().is_some());
    }

    #[test]
    fn empty_result_yields_informational_notice() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("select");
        session.start_extraction().expect("start");
        session
            .extraction_succeeded(empty_output())
            .expect("succeed");
        // Empty is a normal outcome, not a failure.
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(
            session.message(),
            Some("No extractable content was found in this PDF.")
        );
    }

    #[test]
    fn failure_records_message_and_allows_rerun() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("select");
        session.start_extraction().expect("start");
        session
            .extraction_failed(&ExtractError::PasswordProtected)
            .expect("record failure");
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session
            .message()
            .is_some_and(|m| m.contains("password protected")));

        // Same file can be retried straight from Failed.
        session.start_extraction().expect("re-run");
        assert_eq!(session.state(), SessionState::Extracting);
        assert!(session.message().is_none());
    }

    #[test]
    fn selecting_a_new_file_discards_previous_results() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("select");
        session.start_extraction().expect("start");
        session
            .extraction_succeeded(empty_output())
            .expect("succeed");

        session
            .select_file(SelectedFile::new(
                "other.pdf",
                "application/pdf",
                b"%PDF-1.4".to_vec(),
            ))
            .expect("re-select");
        assert_eq!(session.state(), SessionState::FileSelected);
        assert!(session.output().is_none());
        assert!(session.message().is_none());
    }

    #[test]
    fn rejected_reselection_keeps_previous_results() {
        let mut session = ExtractorSession::new();
        session.select_file(pdf_file()).expect("select");
        session.start_extraction().expect("start");
        session
            .extraction_succeeded(empty_output())
            .expect("succeed");

        let err = session
            .select_file(SelectedFile::new("notes.txt", "text/plain", vec![]))
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
        assert_eq!(session.state(), SessionState::Done);
        assert!(session.output().is_some());
    }

    #[test]
    fn events_out_of_order_are_rejected() {
        let mut session = ExtractorSession::new();
        assert!(session.extraction_succeeded(empty_output()).is_err());
        assert!(session
            .extraction_failed(&ExtractError::PasswordProtected)
            .is_err());

        session.select_file(pdf_file()).expect("select");
        // Can't record an outcome before starting.
        assert!(session.extraction_succeeded(empty_output()).is_err());

        session.start_extraction().expect("start");
        // Can't select or re-start mid-run.
        assert!(session.select_file(pdf_file()).is_err());
        assert!(session.start_extraction().is_err());
        assert_eq!(session.state(), SessionState::Extracting);
    }
}
