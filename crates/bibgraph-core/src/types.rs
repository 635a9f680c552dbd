//! Core domain types for the bibliographic graph.
//!
//! Every node is identified by its natural key — the property tuple that
//! uniquely names the entity (e.g. `Author.surname`). There are no surrogate
//! ids: re-ingesting the same input must land on the same nodes.

use serde::{Deserialize, Serialize};

// ── Relationships ─────────────────────────────────────────────────

/// Directed, typed edges of the bibliographic graph.
///
/// Edge identity is (source key, relationship type, target key); edges carry
/// no key properties of their own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RelType {
    /// Author → Paper
    Wrote,
    /// Conference | Journal → Paper
    Has,
    /// Reviewer → Paper
    Reviewed,
    /// Author → Reviewer
    IsFriend,
}

impl RelType {
    /// The Cypher relationship type for this edge.
    pub fn as_cypher(&self) -> &'static str {
        match self {
            Self::Wrote => "WROTE",
            Self::Has => "HAS",
            Self::Reviewed => "REVIEWED",
            Self::IsFriend => "IS_FRIEND",
        }
    }
}

// ── Papers ────────────────────────────────────────────────────────

/// Sentinel stored in `Paper.year` (and `Conference.year`) when the source
/// row carried no usable year.
pub const YEAR_SENTINEL: &str = "none";

/// Natural key for a Paper node.
///
/// Conference ingestion keys papers by (title, year), falling back to the
/// [`YEAR_SENTINEL`] when the year is absent; journal ingestion keys papers
/// by title alone and stores no year property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaperKey {
    TitleAndYear { title: String, year: Option<i64> },
    Title { title: String },
}

impl PaperKey {
    pub fn title(&self) -> &str {
        match self {
            Self::TitleAndYear { title, .. } | Self::Title { title } => title,
        }
    }
}

// ── Nodes ─────────────────────────────────────────────────────────

/// An author, keyed by surname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Author {
    pub surname: String,
}

/// A reviewer, keyed by surname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Reviewer {
    pub surname: String,
}

/// A conference, keyed by (name, city, year).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Conference {
    pub name: String,
    pub city: String,
    /// `None` keys on the [`YEAR_SENTINEL`], matching the paper it carries.
    pub year: Option<i64>,
}

/// A journal, keyed by (name, volume). Volume is numeric in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Journal {
    pub name: String,
    pub volume: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_type_cypher_names() {
        assert_eq!(RelType::Wrote.as_cypher(), "WROTE");
        assert_eq!(RelType::Has.as_cypher(), "HAS");
        assert_eq!(RelType::Reviewed.as_cypher(), "REVIEWED");
        assert_eq!(RelType::IsFriend.as_cypher(), "IS_FRIEND");
    }

    #[test]
    fn paper_key_title_accessor() {
        let conf = PaperKey::TitleAndYear {
            title: "title1".into(),
            year: Some(2020),
        };
        let journal = PaperKey::Title {
            title: "title2".into(),
        };
        assert_eq!(conf.title(), "title1");
        assert_eq!(journal.title(), "title2");
    }
}
