use crate::papers::error::SearchError;
use crate::papers::upload::check_candidate;
use crate::papers::{
    FilterCriteria, MetadataForm, PaperMetadata, PaperRecord, UploadCandidate, UploadError,
};
use tracing::{debug, warn};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload successful ✔";

/// Lifecycle of one operation kind. A settled operation is back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    InFlight,
}

/// Issued when a search starts; needed to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Everything needed to send one upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub metadata: PaperMetadata,
    pub file: UploadCandidate,
}

/// State of the papers view: both forms, the result list and the status line.
///
/// Search owns `papers` and its own phase. Upload owns its phase, the
/// selected file and the form; both write `message`.
#[derive(Debug, Default)]
pub struct ViewState {
    pub filters: FilterCriteria,
    pub form: MetadataForm,
    papers: Vec<PaperRecord>,
    file: Option<UploadCandidate>,
    message: String,
    search_phase: Phase,
    upload_phase: Phase,
    last_issued: u64,
    last_settled: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected_file(&self) -> Option<&UploadCandidate> {
        self.file.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.search_phase == Phase::InFlight
    }

    pub fn is_uploading(&self) -> bool {
        self.upload_phase == Phase::InFlight
    }

    /// Whether the search trigger is enabled.
    pub fn can_search(&self) -> bool {
        !self.is_searching()
    }

    /// Whether the upload trigger is enabled.
    pub fn can_upload(&self) -> bool {
        !self.is_uploading() && !self.file.as_ref().is_some_and(UploadCandidate::exceeds_limit)
    }

    /// Whether the status line should be shown as an error.
    pub fn message_is_error(&self) -> bool {
        self.file.as_ref().is_some_and(UploadCandidate::exceeds_limit)
    }

    /// Replace the selected file and describe it in the status line.
    pub fn select_file(&mut self, file: Option<UploadCandidate>) {
        self.message = match &file {
            Some(f) => f.selection_message(),
            None => String::new(),
        };
        self.file = file;
    }

    /// Start a search. Does not consult `can_search`; the caller gates user triggers.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.last_issued += 1;
        self.search_phase = Phase::InFlight;
        SearchTicket(self.last_issued)
    }

    /// Apply a settled search.
    ///
    /// Failures are logged and leave the list alone. A response older than
    /// one already settled, successful or not, is dropped.
    pub fn settle_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<PaperRecord>, SearchError>,
    ) {
        if ticket.0 == self.last_issued {
            self.search_phase = Phase::Idle;
        }

        let stale = ticket.0 < self.last_settled;
        self.last_settled = self.last_settled.max(ticket.0);

        match result {
            Ok(_) if stale => {
                debug!(
                    ticket = ticket.0,
                    settled = self.last_settled,
                    "dropping stale search response"
                );
            }
            Ok(papers) => self.papers = papers,
            Err(e) => warn!("search failed: {e}"),
        }
    }

    /// Start an upload from the current form and selection.
    ///
    /// On a failed precondition the status line is set and nothing starts.
    /// Returns `None` as well while another upload is in flight.
    pub fn begin_upload(&mut self) -> Option<UploadRequest> {
        if self.is_uploading() {
            return None;
        }

        match self.prepare_upload() {
            Ok(request) => {
                self.upload_phase = Phase::InFlight;
                Some(request)
            }
            Err(e) => {
                self.message = e.to_string();
                None
            }
        }
    }

    fn prepare_upload(&self) -> Result<UploadRequest, UploadError> {
        let file = check_candidate(self.file.as_ref())?.clone();
        let metadata = self.form.parse()?;
        Ok(UploadRequest { metadata, file })
    }

    /// Apply a settled upload. Returns true when the list should be refreshed.
    ///
    /// Success clears the form and the selection; failure leaves both.
    pub fn settle_upload(&mut self, result: Result<(), UploadError>) -> bool {
        self.upload_phase = Phase::Idle;
        match result {
            Ok(()) => {
                self.message = UPLOAD_SUCCESS_MESSAGE.to_string();
                self.file = None;
                self.form.clear();
                true
            }
            Err(e) => {
                self.message = e.to_string();
                false
            }
        }
    }
}
