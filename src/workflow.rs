//! Submission lifecycle state machine
//!
//! One [`SubmissionWorkflow`] owns the entire mutable state of a submission:
//! field values, validation errors, the selected archive, the lifecycle
//! status, and any received artifact or failure. Every mutation goes through
//! a transition method; nothing else touches the aggregate, which is what
//! keeps the status invariants enforceable.
//!
//! The `Submitting` status is the only concurrency control: a submit attempt
//! while one is in flight is a no-op, guaranteeing at most one request per
//! workflow instance.

use crate::config::Config;
use crate::delivery::ArtifactDeliveryManager;
use crate::error::{Error, Result};
use crate::file_guard::FileSelectionGuard;
use crate::transport::{ConversionTransport, HttpTransport};
use crate::types::{
    DownloadArtifact, Event, Field, FieldErrorMap, FormFields, ServerFailure, SubmissionStatus,
    UploadedFile,
};
use crate::validation::{form_is_valid, validate_field, validate_form};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// Capacity of the lifecycle event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of a [`SubmissionWorkflow::submit`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Conversion succeeded; an artifact is waiting for delivery
    Completed,
    /// Validation rejected the form or file; no network call was made
    Invalid,
    /// A submission was already in flight; this attempt was a no-op
    InFlight,
    /// A converted artifact is still waiting for delivery; this attempt was
    /// a no-op and the artifact remains available
    AwaitingDelivery,
    /// The conversion service or transport failed
    Failed(ServerFailure),
}

/// The consolidated mutable state of one submission.
#[derive(Debug)]
struct WorkflowState {
    fields: FormFields,
    errors: FieldErrorMap,
    file: Option<UploadedFile>,
    file_error: String,
    status: SubmissionStatus,
    artifact: Option<DownloadArtifact>,
    failure: Option<ServerFailure>,
}

impl WorkflowState {
    fn initial() -> Self {
        Self {
            fields: FormFields::default(),
            errors: FieldErrorMap::new(),
            file: None,
            file_error: String::new(),
            status: SubmissionStatus::Idle,
            artifact: None,
            failure: None,
        }
    }

    /// A stale failure must not linger once the user acts on the form.
    fn clear_failure_on_edit(&mut self) {
        if self.status == SubmissionStatus::Failed {
            self.status = SubmissionStatus::Idle;
            self.failure = None;
        }
    }
}

/// The submission workflow for one conversion request at a time.
///
/// Methods take `&self`; state lives behind a mutex that is never held
/// across an await, so a workflow can be shared (e.g. in an `Arc`) between
/// the event loop that edits fields and the task that awaits the submission.
pub struct SubmissionWorkflow<T: ConversionTransport> {
    transport: T,
    guard: FileSelectionGuard,
    state: Mutex<WorkflowState>,
    event_tx: broadcast::Sender<Event>,
}

impl SubmissionWorkflow<HttpTransport> {
    /// Build a workflow with the HTTP transport from a configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let guard = FileSelectionGuard::new(config.archive_extension.clone());
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(transport, guard))
    }
}

impl<T: ConversionTransport> SubmissionWorkflow<T> {
    /// Create a workflow over an arbitrary transport.
    pub fn new(transport: T, guard: FileSelectionGuard) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            guard,
            state: Mutex::new(WorkflowState::initial()),
            event_tx,
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        // A poisoned lock only means another thread panicked mid-update of
        // plain data; the state itself is still coherent enough to surface.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Set a field value, validating it eagerly.
    ///
    /// Editing any field while in `Failed` returns the workflow to `Idle`
    /// and clears the stored failure.
    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let error = {
            let mut state = self.lock();
            state.fields.set(field, value);
            let error = validate_field(&state.fields, field);
            state.errors.insert(field, error.clone());
            state.clear_failure_on_edit();
            error
        };
        self.emit(Event::FieldChanged { field, error });
    }

    /// Select (or replace) the archive, validating it eagerly.
    pub fn select_file(&self, file: UploadedFile) {
        let (name, error) = {
            let mut state = self.lock();
            let error = self.guard.validate_file(Some(&file));
            let name = file.name.clone();
            state.file = Some(file);
            state.file_error = error.clone();
            state.clear_failure_on_edit();
            (name, error)
        };
        self.emit(Event::FileSelected { name, error });
    }

    /// Clear the current file selection.
    pub fn clear_file(&self) {
        {
            let mut state = self.lock();
            state.file = None;
            state.file_error.clear();
            state.clear_failure_on_edit();
        }
        self.emit(Event::FileCleared);
    }

    /// Reset everything back to the initial defaults.
    pub fn reset(&self) {
        *self.lock() = WorkflowState::initial();
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SubmissionStatus {
        self.lock().status
    }

    /// Snapshot of the current field values.
    pub fn fields(&self) -> FormFields {
        self.lock().fields.clone()
    }

    /// Snapshot of the per-field validation errors.
    pub fn errors(&self) -> FieldErrorMap {
        self.lock().errors.clone()
    }

    /// The current file selection error, empty when the selection is fine.
    pub fn file_error(&self) -> String {
        self.lock().file_error.clone()
    }

    /// Name of the currently selected archive, if any.
    pub fn selected_file_name(&self) -> Option<String> {
        self.lock().file.as_ref().map(|f| f.name.clone())
    }

    /// The stored failure from the last submission, if the workflow is `Failed`.
    pub fn failure(&self) -> Option<ServerFailure> {
        self.lock().failure.clone()
    }

    /// Filename of the artifact waiting for delivery, if any.
    pub fn ready_artifact_name(&self) -> Option<String> {
        self.lock().artifact.as_ref().map(|a| a.file_name.clone())
    }

    /// Validate and submit the form.
    ///
    /// Invalid input never reaches the network: the workflow drops back to
    /// `Idle` with the error map retained for display. While a request is in
    /// flight, or while a converted artifact is still waiting for delivery,
    /// further submit calls are no-ops. On success the form resets to its
    /// initial defaults; on failure fields and file selection are preserved
    /// untouched so the user can correct and resubmit.
    pub async fn submit(&self) -> SubmitOutcome {
        // Validation phase, under the lock
        let (fields, file) = {
            let mut state = self.lock();
            match state.status {
                SubmissionStatus::Submitting => {
                    tracing::debug!("submit ignored: a submission is already in flight");
                    return SubmitOutcome::InFlight;
                }
                SubmissionStatus::ReadyToDownload => {
                    tracing::debug!("submit ignored: an artifact is waiting for delivery");
                    return SubmitOutcome::AwaitingDelivery;
                }
                _ => {}
            }

            state.status = SubmissionStatus::Validating;
            state.errors = validate_form(&state.fields);
            state.file_error = self.guard.validate_file(state.file.as_ref());

            if !form_is_valid(&state.errors) || !state.file_error.is_empty() {
                state.status = SubmissionStatus::Idle;
                let event = Event::ValidationFailed {
                    errors: state.errors.clone(),
                    file_error: state.file_error.clone(),
                };
                drop(state);
                tracing::info!("submission rejected by validation");
                self.emit(event);
                return SubmitOutcome::Invalid;
            }

            state.status = SubmissionStatus::Submitting;
            let fields = state.fields.clone();
            // The guard just passed, so a file is present.
            let file = match state.file.clone() {
                Some(file) => file,
                None => {
                    state.status = SubmissionStatus::Idle;
                    return SubmitOutcome::Invalid;
                }
            };
            (fields, file)
        };
        self.emit(Event::Submitting);

        // Network phase, lock released
        let result = self.transport.submit(&fields, &file).await;

        // Resolution phase
        let mut state = self.lock();
        match result {
            Ok(artifact) => {
                let event = Event::Converted {
                    file_name: artifact.file_name.clone(),
                    size_bytes: artifact.bytes.len() as u64,
                };
                state.status = SubmissionStatus::ReadyToDownload;
                state.artifact = Some(artifact);
                state.fields = FormFields::default();
                state.file = None;
                state.errors.clear();
                state.file_error.clear();
                state.failure = None;
                drop(state);
                self.emit(event);
                SubmitOutcome::Completed
            }
            Err(failure) => {
                let event = Event::SubmitFailed {
                    kind: failure.kind,
                    message: failure.message.clone(),
                };
                state.status = SubmissionStatus::Failed;
                state.failure = Some(failure.clone());
                drop(state);
                self.emit(event);
                SubmitOutcome::Failed(failure)
            }
        }
    }

    /// Deliver the ready artifact and return to `Idle`.
    ///
    /// Errors with [`Error::InvalidState`] unless the workflow is in
    /// `ReadyToDownload`. The artifact leaves the workflow either way; a
    /// delivery failure is reported to the caller, not retried.
    pub fn deliver(&self, manager: &ArtifactDeliveryManager) -> Result<PathBuf> {
        let artifact = {
            let mut state = self.lock();
            if state.status != SubmissionStatus::ReadyToDownload {
                return Err(Error::InvalidState {
                    operation: "deliver".to_string(),
                    status: state.status,
                });
            }
            state.status = SubmissionStatus::Idle;
            match state.artifact.take() {
                Some(artifact) => artifact,
                None => {
                    return Err(Error::InvalidState {
                        operation: "deliver".to_string(),
                        status: SubmissionStatus::ReadyToDownload,
                    })
                }
            }
        };

        let path = manager.deliver(&artifact)?;
        self.emit(Event::Delivered {
            file_name: artifact.file_name,
        });
        Ok(path)
    }
}
