//! bibgraph-ingest: CSV → Neo4j ingestion pipeline and fixed lookup queries.
//!
//! Normalizes bibliographic CSV extracts (conference papers, journal papers,
//! author-reviewer friendships), merges them into the graph one transaction
//! per file category, then runs the four fixed queries and appends flattened
//! records to the results log.

pub mod config;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod preprocess;
pub mod report;
