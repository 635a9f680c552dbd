//! Read operations: the four fixed pattern queries plus count helpers.
//!
//! Query parameters are always bound through the driver (`$param`), never
//! spliced into the Cypher text. Values stored by ingestion are lower-cased,
//! so callers must pass lower-cased parameters (the config loader does this).

use neo4rs::query;

use bibgraph_core::RelType;

use crate::client::{GraphClient, GraphError};

/// Q1 row: an (author, reviewer) pair connected to a paper via WROTE/REVIEWED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperContributorRow {
    pub paper: String,
    pub author: String,
    pub reviewer: String,
}

/// Q2 row: a paper presented at a conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferencePaperRow {
    pub conference: String,
    pub paper: String,
}

/// Q3 row: a paper written by an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPaperRow {
    pub author: String,
    pub paper: String,
}

/// Q4 row: a journal paper whose author is friends with a reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendReviewRow {
    pub paper: String,
    pub author: String,
    pub reviewer: String,
}

impl GraphClient {
    /// Q1: all (author, reviewer) pairs for the paper with the given title.
    pub async fn paper_contributors(
        &self,
        title: &str,
    ) -> Result<Vec<PaperContributorRow>, GraphError> {
        let q = query(
            "MATCH (a:Author)-[:WROTE]->(p:Paper)<-[:REVIEWED]-(rev:Reviewer)
             WHERE p.title = $title
             RETURN p.title AS paper, a.surname AS author, rev.surname AS reviewer",
        )
        .param("title", title);

        let rows = self.query_rows(q).await?;
        rows.into_iter()
            .map(|row| {
                Ok(PaperContributorRow {
                    paper: get_string(&row, "paper")?,
                    author: get_string(&row, "author")?,
                    reviewer: get_string(&row, "reviewer")?,
                })
            })
            .collect()
    }

    /// Q2: all papers held by the conference with the given name.
    pub async fn conference_papers(
        &self,
        name: &str,
    ) -> Result<Vec<ConferencePaperRow>, GraphError> {
        let q = query(
            "MATCH (c:Conference)-[:HAS]->(p:Paper)
             WHERE c.name = $name
             RETURN c.name AS conference, p.title AS paper",
        )
        .param("name", name);

        let rows = self.query_rows(q).await?;
        rows.into_iter()
            .map(|row| {
                Ok(ConferencePaperRow {
                    conference: get_string(&row, "conference")?,
                    paper: get_string(&row, "paper")?,
                })
            })
            .collect()
    }

    /// Q3: all papers written by the author with the given surname.
    pub async fn author_papers(&self, surname: &str) -> Result<Vec<AuthorPaperRow>, GraphError> {
        let q = query(
            "MATCH (a:Author {surname: $surname})-[:WROTE]->(p:Paper)
             RETURN a.surname AS author, p.title AS paper",
        )
        .param("surname", surname);

        let rows = self.query_rows(q).await?;
        rows.into_iter()
            .map(|row| {
                Ok(AuthorPaperRow {
                    author: get_string(&row, "author")?,
                    paper: get_string(&row, "paper")?,
                })
            })
            .collect()
    }

    /// Q4: (paper, author, reviewer) triples for a journal where the author
    /// is friends with the reviewer. Volume binds as an integer.
    pub async fn journal_friend_reviews(
        &self,
        name: &str,
        volume: i64,
    ) -> Result<Vec<FriendReviewRow>, GraphError> {
        let q = query(
            "MATCH (j:Journal {name: $name, volume: $volume})-[:HAS]->(p:Paper)
                   <-[:WROTE]-(a:Author)-[:IS_FRIEND]->(rev:Reviewer)
             RETURN p.title AS paper, a.surname AS author, rev.surname AS reviewer",
        )
        .param("name", name)
        .param("volume", volume);

        let rows = self.query_rows(q).await?;
        rows.into_iter()
            .map(|row| {
                Ok(FriendReviewRow {
                    paper: get_string(&row, "paper")?,
                    author: get_string(&row, "author")?,
                    reviewer: get_string(&row, "reviewer")?,
                })
            })
            .collect()
    }

    // ── Counts ───────────────────────────────────────────────────

    /// Count nodes with the given label. Labels come from the fixed schema
    /// (Paper, Author, Conference, Journal, Reviewer), never user input.
    pub async fn count_nodes(&self, label: &str) -> Result<i64, GraphError> {
        let cypher = format!("MATCH (n:{label}) RETURN count(n) AS cnt");
        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count edges of the given relationship type.
    pub async fn count_edges(&self, rel: RelType) -> Result<i64, GraphError> {
        let cypher = format!(
            "MATCH ()-[r:{rel}]->() RETURN count(r) AS cnt",
            rel = rel.as_cypher()
        );
        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}

fn get_string(row: &neo4rs::Row, column: &str) -> Result<String, GraphError> {
    row.get::<String>(column)
        .map_err(|e| GraphError::RowDecode(format!("column {column}: {e}")))
}
