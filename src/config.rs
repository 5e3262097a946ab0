//! Configuration types for ziptozim-client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Main configuration for the submission workflow
///
/// All fields have working defaults matching the reference deployment of the
/// conversion service, so `Config::default()` works out of the box against a
/// local server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Conversion service endpoint (default: `http://localhost:3019/upload`)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Multipart parameter name the service expects for the archive
    /// (default: `inputFile`)
    #[serde(default = "default_file_field")]
    pub file_field: String,

    /// Packaging extension of the input archive, without the dot
    /// (default: `zip`)
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Extension of the delivered artifact, without the dot (default: `zim`)
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Request timeout for one submission (default: 600 seconds)
    ///
    /// Conversions of large archives are slow; the timeout bounds how long a
    /// submission can block the workflow, since there is no cancellation.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Artifact delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            file_field: default_file_field(),
            archive_extension: default_archive_extension(),
            output_extension: default_output_extension(),
            request_timeout: default_request_timeout(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::config("endpoint", format!("invalid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.file_field.trim().is_empty() {
            return Err(Error::config("file_field", "must not be empty"));
        }
        for (key, ext) in [
            ("archive_extension", &self.archive_extension),
            ("output_extension", &self.output_extension),
        ] {
            if ext.trim().is_empty() {
                return Err(Error::config(key, "must not be empty"));
            }
            if ext.starts_with('.') {
                return Err(Error::config(key, "must not include the leading dot"));
            }
        }
        Ok(())
    }
}

/// Artifact delivery configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Directory the delivered artifact is written to (default: "./downloads")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File collision handling when the destination already exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to filename (default)
    #[default]
    Rename,
    /// Overwrite existing file
    Overwrite,
    /// Fail the delivery, keep existing
    Skip,
}

// Default value functions
fn default_endpoint() -> String {
    "http://localhost:3019/upload".to_string()
}

fn default_file_field() -> String {
    "inputFile".to_string()
}

fn default_archive_extension() -> String {
    "zip".to_string()
}

fn default_output_extension() -> String {
    "zim".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(600)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_reference_deployment() {
        let config = Config::default();

        assert_eq!(config.endpoint, "http://localhost:3019/upload");
        assert_eq!(config.file_field, "inputFile");
        assert_eq!(config.archive_extension, "zip");
        assert_eq!(config.output_extension, "zim");
        assert_eq!(config.request_timeout, Duration::from_secs(600));
        assert_eq!(config.delivery.output_dir, PathBuf::from("downloads"));
        assert_eq!(config.delivery.file_collision, FileCollisionAction::Rename);
    }

    #[test]
    fn default_config_validates() {
        Config::default().validate().expect("defaults must be valid");
    }

    #[test]
    fn validate_rejects_unparseable_endpoint() {
        let config = Config {
            endpoint: "not a url".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let config = Config {
            endpoint: "ftp://example.com/upload".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn validate_rejects_empty_file_field() {
        let config = Config {
            file_field: "  ".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_extension_with_leading_dot() {
        let config = Config {
            archive_extension: ".zip".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("leading dot"));
    }

    #[test]
    fn config_default_survives_json_round_trip() {
        let original = Config::default();

        let json = serde_json::to_string(&original).expect("Config must serialize to JSON");
        let restored: Config =
            serde_json::from_str(&json).expect("Config must deserialize from its own JSON");

        assert_eq!(restored.endpoint, original.endpoint);
        assert_eq!(restored.file_field, original.file_field);
        assert_eq!(restored.archive_extension, original.archive_extension);
        assert_eq!(restored.output_extension, original.output_extension);
        assert_eq!(restored.request_timeout, original.request_timeout);
        assert_eq!(restored.delivery.output_dir, original.delivery.output_dir);
        assert_eq!(
            restored.delivery.file_collision,
            original.delivery.file_collision
        );
    }

    #[test]
    fn duration_serde_serializes_as_seconds() {
        let config = Config {
            request_timeout: Duration::from_secs(120),
            ..Config::default()
        };

        let json = serde_json::to_value(&config).expect("serialize failed");
        assert_eq!(json["request_timeout"], 120);
    }

    #[test]
    fn duration_serde_deserializes_from_seconds() {
        let config: Config =
            serde_json::from_str(r#"{"request_timeout": 30}"#).expect("deserialize failed");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");
        assert_eq!(config.endpoint, default_endpoint());
        assert_eq!(config.delivery.file_collision, FileCollisionAction::Rename);
    }

    #[test]
    fn duration_serde_rejects_string_instead_of_integer() {
        let result = serde_json::from_str::<Config>(r#"{"request_timeout": "soon"}"#);
        assert!(
            result.is_err(),
            "string value for a Duration field must produce a serde error"
        );
    }
}
