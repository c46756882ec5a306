//! Submission controller
//!
//! Drives one submission at a time through
//! `Validating -> Uploading(n) -> Finalizing -> Succeeded | Failed`.
//! State lives in a single `SubmissionState` published on a watch channel;
//! every transition is also pushed to registered listeners in order.

use std::sync::{Arc, Mutex};

use syllabus_core::{
    classify, FileSelectionStore, OperationTarget, SelectedFile, SubmissionOptions,
    SubmissionState, ValidationError,
};
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use crate::download::{DownloadTrigger, SavedDownload};
use crate::error::SubmitError;
use crate::progress::UploadProgress;
use crate::request::SubmissionRequest;
use crate::ApiClient;

pub struct SubmissionController {
    client: ApiClient,
    downloads: Arc<dyn DownloadTrigger>,
    state: watch::Sender<SubmissionState>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<SubmissionState>>>,
}

impl SubmissionController {
    pub fn new(client: ApiClient, downloads: Arc<dyn DownloadTrigger>) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            client,
            downloads,
            state,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receiver that always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Receiver of every state transition, in order, from now on.
    pub fn transitions(&self) -> mpsc::UnboundedReceiver<SubmissionState> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(tx);
        }
        rx
    }

    /// Return a finished submission to `Idle`. In-flight states are left alone.
    pub fn reset(&self) {
        let reset = self.state.send_if_modified(|state| {
            if state.is_terminal() && *state != SubmissionState::Idle {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
        if reset {
            self.notify(SubmissionState::Idle);
        }
    }

    /// Submit the selected files and save the returned artifact.
    ///
    /// On success the selection is cleared and the options reset. On failure
    /// both are left as they were so the user can retry. Rejected with
    /// `SubmitError::Busy` while another submission is in flight.
    pub async fn submit(
        &self,
        files: &mut FileSelectionStore,
        options: &mut SubmissionOptions,
    ) -> Result<SavedDownload, SubmitError> {
        if !self.begin() {
            tracing::warn!(state = ?self.state(), "Submission rejected, another one is in flight");
            return Err(SubmitError::Busy);
        }
        let in_flight = InFlight { controller: self };

        if files.is_empty() {
            let err = ValidationError::NoFilesSelected;
            in_flight.finish(SubmissionState::Failed(err.to_string()));
            return Err(err.into());
        }

        let target = OperationTarget::from_options(options);
        let span = tracing::info_span!("submission", %target, files = files.len());

        match self.run(files.files(), options).instrument(span).await {
            Ok(saved) => {
                in_flight.finish(SubmissionState::Succeeded(saved.filename.clone()));
                files.clear();
                options.reset();
                Ok(saved)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                in_flight.finish(SubmissionState::Failed(err.user_message()));
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        files: &[SelectedFile],
        options: &SubmissionOptions,
    ) -> Result<SavedDownload, SubmitError> {
        self.transition(SubmissionState::Uploading(0));

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let request = SubmissionRequest::build(files, options, progress_tx)?;
        let mut progress = UploadProgress::new(request.total_bytes);

        tracing::info!(
            path = request.target.path(),
            bytes = request.total_bytes,
            semester_start = ?request.semester_start,
            "Uploading files"
        );

        let send = self
            .client
            .post_multipart(request.target.path(), request.form);
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                biased;
                Some(sent) = progress_rx.recv() => {
                    if let Some(percent) = progress.record(sent) {
                        self.transition(SubmissionState::Uploading(percent));
                    }
                }
                result = &mut send => break result,
            }
        };
        while let Ok(sent) = progress_rx.try_recv() {
            if let Some(percent) = progress.record(sent) {
                self.transition(SubmissionState::Uploading(percent));
            }
        }
        let result = result?;

        if let Some(percent) = progress.complete() {
            self.transition(SubmissionState::Uploading(percent));
        }
        self.transition(SubmissionState::Finalizing);

        let output = classify(&result);
        tracing::debug!(
            filename = %output.filename,
            mime_type = %output.mime_type,
            format = ?output.format,
            "Classified response"
        );

        let saved = self
            .downloads
            .save(result.bytes, &output.mime_type, &output.filename)
            .await?;
        Ok(saved)
    }

    /// Move from a terminal state to `Validating`, atomically.
    fn begin(&self) -> bool {
        let started = self.state.send_if_modified(|state| {
            if state.is_terminal() {
                *state = SubmissionState::Validating;
                true
            } else {
                false
            }
        });
        if started {
            self.notify(SubmissionState::Validating);
        }
        started
    }

    fn transition(&self, next: SubmissionState) {
        tracing::debug!(state = ?next, "Submission state changed");
        self.state.send_replace(next.clone());
        self.notify(next);
    }

    fn notify(&self, state: SubmissionState) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|tx| tx.send(state.clone()).is_ok());
        }
    }
}

pub const INTERRUPTED_MESSAGE: &str = "Submission was interrupted.";

/// Held by `submit` between `begin` and a terminal transition. Dropping it
/// unfinished (the `submit` future was dropped) marks the submission failed
/// so the single-flight guard is released.
struct InFlight<'a> {
    controller: &'a SubmissionController,
}

impl InFlight<'_> {
    fn finish(self, state: SubmissionState) {
        self.controller.transition(state);
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        tracing::warn!("Submission dropped before completion");
        self.controller
            .transition(SubmissionState::Failed(INTERRUPTED_MESSAGE.to_string()));
    }
}
