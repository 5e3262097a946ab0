//! # ziptozim-client
//!
//! Client library for submitting zipped websites to a ZiptoZim conversion
//! service and receiving the resulting ZIM archive.
//!
//! ## Design Philosophy
//!
//! ziptozim-client is designed to be:
//! - **Validation-first** - Invalid input never reaches the network
//! - **Sensible defaults** - Works against a local service with zero configuration
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to lifecycle events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use ziptozim_client::{
//!     ArtifactDeliveryManager, Config, Field, SubmissionWorkflow, UploadedFile,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let delivery = ArtifactDeliveryManager::new(config.delivery.clone());
//!     let workflow = SubmissionWorkflow::from_config(config)?;
//!
//!     // Subscribe to lifecycle events
//!     let mut events = workflow.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     workflow.set_field(Field::WelcomePage, "index.html");
//!     workflow.set_field(Field::Favicon, "favicon.png");
//!     workflow.set_field(Field::Language, "eng");
//!     workflow.set_field(Field::Title, "Our Website");
//!     workflow.select_file(UploadedFile::new(
//!         "mysite.zip",
//!         "application/zip",
//!         std::fs::read("mysite.zip")?,
//!     ));
//!
//!     workflow.submit().await;
//!     let path = workflow.deliver(&delivery)?;
//!     println!("ZIM written to {}", path.display());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Language catalog for the content-language field
pub mod catalog;
/// Configuration types
pub mod config;
/// Artifact delivery to local storage
pub mod delivery;
/// Error types
pub mod error;
/// Archive file selection guard
pub mod file_guard;
/// HTTP transport to the conversion service
pub mod transport;
/// Core types and events
pub mod types;
/// Declarative field validation
pub mod validation;
/// Submission lifecycle state machine
pub mod workflow;

// Re-export commonly used types
pub use catalog::{LanguageCatalog, LanguageEntry};
pub use config::{Config, DeliveryConfig, FileCollisionAction};
pub use delivery::ArtifactDeliveryManager;
pub use error::{DeliveryError, Error, Result};
pub use file_guard::FileSelectionGuard;
pub use transport::{ConversionTransport, HttpTransport};
pub use types::{
    DownloadArtifact, Event, FailureKind, Field, FieldErrorMap, FormFields, ServerFailure,
    SubmissionStatus, UploadedFile,
};
pub use validation::{form_is_valid, validate_field, validate_form};
pub use workflow::{SubmissionWorkflow, SubmitOutcome};
