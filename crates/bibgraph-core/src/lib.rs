//! bibgraph-core: Shared domain types for the bibliographic graph.
//!
//! This crate provides the types used across the bibgraph components:
//! - Node types (Paper, Author, Conference, Journal, Reviewer) with their
//!   natural keys
//! - Relationship types (WROTE, HAS, REVIEWED, IS_FRIEND)
//! - The two paper-key variants used by conference vs journal ingestion

pub mod types;

pub use types::{Author, Conference, Journal, PaperKey, RelType, Reviewer, YEAR_SENTINEL};
