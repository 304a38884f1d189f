use std::path::PathBuf;

use thiserror::Error;

/// Malformed tagged-table input.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("metadata block is opened but never closed")]
    UnterminatedMetadata,
    #[error("metadata block is not valid key/value data")]
    Metadata(#[source] serde_yaml::Error),
    #[error("metadata key is not a string")]
    MetadataKey,
    #[error("metadata value for `{key}` is not a scalar")]
    MetadataScalar { key: String },
    #[error("missing metadata key `{key}`")]
    MissingMetadata { key: String },
    #[error("metadata key `{key}` is not a {expected}")]
    MetadataType { key: String, expected: &'static str },
    #[error("row {row}: column `{column}` missing or mistyped")]
    BadColumn { row: usize, column: &'static str },
    #[error("malformed table body")]
    Body(#[from] csv::Error),
}

/// Input that parsed but cannot describe a renderable draw.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("entity index {index} outside roster of {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("observation pairs entity {index} with itself")]
    SelfPair { index: usize },
    #[error("simulation trial count must be positive")]
    NoTrials,
    #[error("unrecognized competition code `{0}`")]
    UnknownCompetition(String),
}

/// Remote or cached asset could not be produced.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("request for {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for {url} returned http {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("asset i/o failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset `{id}` is not a decodable image")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },
}
