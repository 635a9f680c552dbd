//! Configuration for the bibgraph ingestion pipeline.
//!
//! Loaded from `bibgraph.toml` (`[pipeline]` section) or `BIBGRAPH__`
//! environment variables. The CSV directory and all query parameters are
//! required; a missing value is fatal at startup.

use serde::Deserialize;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for `*.csv` input files.
    pub csv_dir: String,

    /// File the flattened query records are appended to.
    #[serde(default = "default_results_log")]
    pub results_log: String,

    /// Parameters for the four fixed queries.
    pub queries: QueryParams,
}

/// One parameter set per fixed query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    /// Q1: paper title.
    pub paper_title: String,
    /// Q2: conference name.
    pub conference_name: String,
    /// Q3: author surname.
    pub author_surname: String,
    /// Q4: journal name.
    pub journal_name: String,
    /// Q4: journal volume (numeric).
    pub journal_volume: i64,
}

impl PipelineConfig {
    /// Fold all query parameters to lower case.
    ///
    /// Preprocessing lower-cases every stored value, so exact-match lookups
    /// only work with lower-cased parameters. Doing this in the loader means
    /// callers cannot get it wrong.
    pub fn lowercased(mut self) -> Self {
        self.queries.paper_title = self.queries.paper_title.to_lowercase();
        self.queries.conference_name = self.queries.conference_name.to_lowercase();
        self.queries.author_surname = self.queries.author_surname.to_lowercase();
        self.queries.journal_name = self.queries.journal_name.to_lowercase();
        self
    }
}

fn default_results_log() -> String {
    "results.log".to_string()
}
