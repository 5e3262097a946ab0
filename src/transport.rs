//! Request orchestration against the conversion service
//!
//! Builds the multipart submission, issues the single HTTP POST, and
//! normalizes the response: a success body is opaque binary, a failure body
//! is JSON, and the transport assumes neither shape until the status code is
//! known. Failed responses are classified into a [`ServerFailure`] by
//! inspecting the server's message.

use crate::config::Config;
use crate::error::Result;
use crate::types::{DownloadArtifact, FailureKind, FormFields, ServerFailure, UploadedFile};
use async_trait::async_trait;
use serde::Deserialize;

/// Message used when no response was received at all (timeout, connection drop).
const TRANSPORT_FAILURE_MESSAGE: &str =
    "Could not reach the conversion service; check the connection and submit again";

/// Message used when a failure response carried no usable JSON message.
const GENERIC_FAILURE_MESSAGE: &str = "The conversion service rejected the request";

/// Abstraction over the conversion service.
///
/// The state machine talks only to this trait, so tests can count calls and
/// script outcomes without a network.
#[async_trait]
pub trait ConversionTransport: Send + Sync {
    /// Submit the form and archive; exactly one attempt, no retries.
    ///
    /// `Ok` carries the converted artifact; `Err` carries a classified,
    /// user-facing failure. Transport-level problems are folded into
    /// [`FailureKind::GenericError`]; the caller never sees a panic or a
    /// raw I/O error.
    async fn submit(
        &self,
        fields: &FormFields,
        file: &UploadedFile,
    ) -> std::result::Result<DownloadArtifact, ServerFailure>;
}

/// HTTP implementation of [`ConversionTransport`] backed by reqwest.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Config,
}

impl HttpTransport {
    /// Create a transport, validating the configuration up front.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn build_form(&self, fields: &FormFields, file: &UploadedFile) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (field, value) in fields.iter() {
            form = form.text(field.wire_name(), value.to_string());
        }

        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone());
        // A malformed declared MIME type falls back to octet-stream; the
        // server only cares about the bytes.
        let part = match part.mime_str(&file.mime_type) {
            Ok(part) => part,
            Err(_) => reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone()),
        };
        form.part(self.config.file_field.clone(), part)
    }
}

#[async_trait]
impl ConversionTransport for HttpTransport {
    async fn submit(
        &self,
        fields: &FormFields,
        file: &UploadedFile,
    ) -> std::result::Result<DownloadArtifact, ServerFailure> {
        let form = self.build_form(fields, file);

        tracing::info!(
            endpoint = %self.config.endpoint,
            file = %file.name,
            size_bytes = file.size_bytes,
            "submitting archive for conversion"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "conversion request failed before a response arrived");
                ServerFailure::generic(TRANSPORT_FAILURE_MESSAGE)
            })?;

        let status = response.status();
        if status.is_success() {
            let served_name = filename_from_content_disposition(response.headers());
            let bytes = response.bytes().await.map_err(|e| {
                tracing::warn!(error = %e, "failed to read artifact body");
                ServerFailure::generic(TRANSPORT_FAILURE_MESSAGE)
            })?;

            let file_name = served_name.unwrap_or_else(|| {
                derive_output_name(
                    &file.name,
                    &self.config.archive_extension,
                    &self.config.output_extension,
                )
            });
            tracing::debug!(file_name = %file_name, size_bytes = bytes.len(), "conversion succeeded");
            return Ok(DownloadArtifact::new(file_name, bytes.to_vec()));
        }

        // Failure body is expected to be JSON, but read it as raw text first;
        // the server is not trusted to honor its own contract.
        let body = response.text().await.unwrap_or_default();
        let failure = if body.trim().is_empty() {
            ServerFailure::generic(format!("{GENERIC_FAILURE_MESSAGE} (HTTP {status})"))
        } else {
            classify_failure(&body)
        };
        tracing::warn!(
            status = %status,
            kind = ?failure.kind,
            message = %failure.message,
            "conversion failed"
        );
        Err(failure)
    }
}

/// The JSON shape the service uses for failure bodies.
#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Classify a failure body by its message content.
///
/// This is a best-effort heuristic: the service documents no message format,
/// so the classification matches substrings and degrades to
/// [`FailureKind::GenericError`] for anything unrecognized, including bodies
/// that are not JSON at all.
pub fn classify_failure(body: &str) -> ServerFailure {
    let message = match serde_json::from_str::<FailureBody>(body) {
        Ok(parsed) => match parsed.message.or(parsed.error) {
            Some(message) if !message.trim().is_empty() => message,
            _ => return ServerFailure::generic(GENERIC_FAILURE_MESSAGE),
        },
        Err(_) => return ServerFailure::generic(GENERIC_FAILURE_MESSAGE),
    };

    let lower = message.to_lowercase();
    let kind = if lower.contains("favicon") || lower.contains("icon") || lower.contains("illustration")
    {
        FailureKind::IconError
    } else if lower.contains("welcome") || lower.contains("main page") {
        FailureKind::WelcomePageError
    } else {
        FailureKind::GenericError
    };
    ServerFailure::new(kind, message)
}

/// Derive the output filename from the input archive name.
///
/// Replaces the packaging extension with the output extension,
/// case-insensitively (`MySite.ZIP` → `MySite.zim`). A name that does not
/// carry the packaging extension (possible only if the file guard was
/// bypassed) gets the output extension appended.
pub fn derive_output_name(input: &str, archive_ext: &str, output_ext: &str) -> String {
    let suffix = format!(".{}", archive_ext.to_lowercase());
    let stem = if input.to_lowercase().ends_with(&suffix) {
        &input[..input.len() - suffix.len()]
    } else {
        input
    };
    format!("{stem}.{output_ext}")
}

/// Extract a full filename from a Content-Disposition header, if present.
///
/// Handles `filename="..."`, bare `filename=...`, and RFC 5987
/// `filename*=charset''encoded` forms. Names containing path separators are
/// rejected; the server must not pick where the artifact lands.
fn filename_from_content_disposition(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let value = headers.get("content-disposition")?.to_str().ok()?;

    for part in value.split(';') {
        let part = part.trim();
        if let Some(encoded) = part.strip_prefix("filename*=") {
            // Format: charset'lang'encoded-filename
            if let Some(idx) = encoded.rfind('\'') {
                if let Ok(decoded) = urlencoding::decode(&encoded[idx + 1..]) {
                    return sanitize_filename(&decoded);
                }
            }
        } else if let Some(name) = part.strip_prefix("filename=") {
            return sanitize_filename(name.trim_matches('"'));
        }
    }
    None
}

fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return None;
    }
    Some(name.to_string())
}
