use std::{io, path::PathBuf};

use async_openai::error::OpenAIError;
use thiserror::Error;

/// Failures that stop the run before or between evaluation passes.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("cannot read dataset '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset '{path}' has no '{column}' column")]
    Schema { path: PathBuf, column: String },
    #[error("dataset '{path}' is malformed: {source}")]
    MalformedDataset {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot write results to '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A single classifier call that produced no usable completion.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error(transparent)]
    Api(#[from] OpenAIError),
    #[error("completion had no message content")]
    EmptyResponse,
}
