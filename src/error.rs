//! Error types shared across the codec, generator and settings layers.

use thiserror::Error;

/// Failure to turn one URI into a [`ProxyRecord`](crate::models::ProxyRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed URI: {0}")]
    MalformedUri(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid numeric field: {0}")]
    InvalidNumericField(&'static str),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Failure to build an outbound from a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigGenerationError {
    #[error("record has an empty host")]
    EmptyHost,
}

/// Failure to load [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported settings format: {0}")]
    UnknownFormat(String),
}
