use super::state::ViewState;
use crate::papers::PaperRepository;
use tracing::debug;

/// How a submitted upload ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Another upload was still in flight; nothing happened.
    Busy,
    Succeeded,
    /// See the status message for why.
    Failed,
}

/// Drives a [`ViewState`] against a paper repository.
pub struct Session<R> {
    repo: R,
    state: ViewState,
}

impl<R: PaperRepository> Session<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Initial load when the view opens: one search with the current filters.
    pub async fn open(&mut self) {
        self.load().await;
    }

    /// User-triggered search. Returns false when a search is already running.
    pub async fn search(&mut self) -> bool {
        if !self.state.can_search() {
            debug!("search already in flight");
            return false;
        }
        self.load().await;
        true
    }

    /// User-triggered upload; refreshes the list after a success.
    pub async fn upload(&mut self) -> UploadOutcome {
        if self.state.is_uploading() {
            return UploadOutcome::Busy;
        }
        let Some(request) = self.state.begin_upload() else {
            return UploadOutcome::Failed;
        };

        let result = self.repo.upload(&request.metadata, &request.file).await;
        if self.state.settle_upload(result) {
            self.load().await;
            UploadOutcome::Succeeded
        } else {
            UploadOutcome::Failed
        }
    }

    async fn load(&mut self) {
        let ticket = self.state.begin_search();
        let criteria = self.state.filters.clone();
        let result = self.repo.search(&criteria).await;
        self.state.settle_search(ticket, result);
    }
}
