//! Error types for the bibgraph-ingest crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Malformed row {line} in {file}: {reason}")]
    MalformedRow {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Missing input file: {0}")]
    MissingFile(PathBuf),

    #[error("Not a usable CSV path: {0}")]
    InvalidPath(PathBuf),

    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] bibgraph_graph::GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
