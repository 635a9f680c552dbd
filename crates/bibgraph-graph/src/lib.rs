//! bibgraph-graph: Neo4j client for the bibliographic graph.
//!
//! This crate is the single mutation point for the graph. All reads and
//! writes flow through it so that node identity stays pinned to natural keys
//! and edges stay keyed by (source, relationship type, target).

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
