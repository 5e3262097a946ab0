//! Core types for ziptozim-client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A metadata field recognized by the conversion service.
///
/// Each variant maps to a fixed wire name in the multipart payload
/// (see [`Field::wire_name`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Path of the main HTML page inside the archive (e.g. `index.html`)
    WelcomePage,
    /// Path of the site icon inside the archive (e.g. `favicon.png`)
    Favicon,
    /// ISO 639-3 language code of the content
    Language,
    /// Title of the produced ZIM file
    Title,
    /// Short description of the content (optional)
    Description,
    /// Creator(s) of the content (optional)
    Creator,
    /// Publisher of the ZIM file itself (optional)
    Publisher,
}

impl Field {
    /// All fields, in the order they appear on the wire.
    pub const ALL: [Field; 7] = [
        Field::WelcomePage,
        Field::Favicon,
        Field::Language,
        Field::Title,
        Field::Description,
        Field::Creator,
        Field::Publisher,
    ];

    /// The fields that must be non-empty and well-formed before submission.
    pub const REQUIRED: [Field; 4] = [
        Field::WelcomePage,
        Field::Favicon,
        Field::Language,
        Field::Title,
    ];

    /// The parameter name the conversion service expects for this field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::WelcomePage => "welcomePage",
            Field::Favicon => "favicon",
            Field::Language => "language",
            Field::Title => "title",
            Field::Description => "description",
            Field::Creator => "creator",
            Field::Publisher => "publisher",
        }
    }

    /// Whether this field must validate before a submission is allowed.
    pub fn is_required(&self) -> bool {
        Field::REQUIRED.contains(self)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The current value of every form field.
///
/// Values are always owned strings, never absent; a field is *empty* iff its
/// trimmed value has zero length. Optional fields carry non-empty default
/// sentinel values so the service always receives something meaningful.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    /// Main HTML page path
    pub welcome_page: String,
    /// Icon path
    pub favicon: String,
    /// Content language code
    pub language: String,
    /// ZIM title
    pub title: String,
    /// Content description (default `_`)
    pub description: String,
    /// Content creator (default `_`)
    pub creator: String,
    /// ZIM publisher (default `ZiptoZim`)
    pub publisher: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            welcome_page: String::new(),
            favicon: String::new(),
            language: String::new(),
            title: String::new(),
            description: "_".to_string(),
            creator: "_".to_string(),
            publisher: "ZiptoZim".to_string(),
        }
    }
}

impl FormFields {
    /// Get the current value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::WelcomePage => &self.welcome_page,
            Field::Favicon => &self.favicon,
            Field::Language => &self.language,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Creator => &self.creator,
            Field::Publisher => &self.publisher,
        }
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::WelcomePage => self.welcome_page = value,
            Field::Favicon => self.favicon = value,
            Field::Language => self.language = value,
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Creator => self.creator = value,
            Field::Publisher => self.publisher = value,
        }
    }

    /// Whether a field's trimmed value has zero length.
    pub fn is_empty(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Iterate over all fields and their current values in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}

/// The archive the user selected for conversion.
///
/// Replaced wholesale on re-selection; cleared on successful submission or
/// explicit reset. Exclusively owned by one workflow instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename, including extension
    pub name: String,
    /// MIME type as declared by the host environment; informational only,
    /// validation goes by filename (see the file guard)
    pub mime_type: String,
    /// Payload size in bytes
    pub size_bytes: u64,
    /// Raw archive bytes
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create a new uploaded file descriptor; the size is derived from the payload.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }
}

/// Per-field validation results.
///
/// A field present with an empty string has been validated and has no error;
/// a field that is absent has not been validated yet.
pub type FieldErrorMap = HashMap<Field, String>;

/// Submission lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Waiting for input; nothing in flight
    Idle,
    /// Checking field and file validity before submitting
    Validating,
    /// Request in flight; new submissions are rejected until it resolves
    Submitting,
    /// Conversion succeeded; an artifact is waiting for delivery
    ReadyToDownload,
    /// The last submission failed; fields are preserved for correction
    Failed,
}

/// Classification of a failed conversion response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server rejected the icon/favicon asset
    IconError,
    /// The server rejected the welcome/main page asset
    WelcomePageError,
    /// Anything else, including transport failures and unparseable bodies
    GenericError,
}

/// A classified failure from the conversion service or transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFailure {
    /// Which asset (if any) the server complained about
    pub kind: FailureKind,
    /// Human-readable message, surfaced verbatim to the user
    pub message: String,
}

impl ServerFailure {
    /// Create a failure with an explicit classification.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a generic failure.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(FailureKind::GenericError, message)
    }
}

impl std::fmt::Display for ServerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The converted binary returned by the service, ready for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Output filename (input name with the packaging extension replaced by
    /// the output extension, or the name the server supplied)
    pub file_name: String,
    /// Raw artifact bytes
    pub bytes: Vec<u8>,
    /// When the artifact was received
    pub received_at: DateTime<Utc>,
}

impl DownloadArtifact {
    /// Create an artifact received now.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            received_at: Utc::now(),
        }
    }
}

/// Event emitted during the submission lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A field value changed; `error` is the eager per-field validation result
    FieldChanged {
        /// The field that changed
        field: Field,
        /// Validation message, empty when the new value is valid
        error: String,
    },

    /// An archive was selected; `error` is the file guard's verdict
    FileSelected {
        /// Selected filename
        name: String,
        /// File validation message, empty when the file is acceptable
        error: String,
    },

    /// The file selection was cleared
    FileCleared,

    /// A submit attempt was rejected by validation (no network call was made)
    ValidationFailed {
        /// The full error map at rejection time
        errors: FieldErrorMap,
        /// File selection error, empty when the file was fine
        file_error: String,
    },

    /// The request is in flight
    Submitting,

    /// Conversion succeeded and an artifact is ready for delivery
    Converted {
        /// Output filename of the artifact
        file_name: String,
        /// Artifact size in bytes
        size_bytes: u64,
    },

    /// The submission failed
    SubmitFailed {
        /// Failure classification
        kind: FailureKind,
        /// Human-readable message
        message: String,
    },

    /// The artifact was delivered to local storage
    Delivered {
        /// Output filename of the delivered artifact
        file_name: String,
    },
}
