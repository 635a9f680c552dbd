//! Write operations for the bibliographic graph.
//!
//! All mutations use MERGE (upsert) semantics so repeated ingestion of the
//! same input lands on the same nodes and edges. Nodes merge on their natural
//! key properties only; edges merge on (source, relationship type, target)
//! and carry no key properties of their own. Load timestamps are set outside
//! the merge key via ON CREATE / ON MATCH.
//!
//! The builders return [`neo4rs::Query`] values so the ingestion planner can
//! run them inside a single transaction per file category.

use chrono::Utc;
use neo4rs::{query, BoltType, Query};

use bibgraph_core::{Conference, Journal, PaperKey, RelType, YEAR_SENTINEL};

// ── Node upserts ─────────────────────────────────────────────────

/// Upsert a Paper by its natural key (see [`PaperKey`] for the two variants).
pub fn merge_paper(key: &PaperKey) -> Query {
    let cypher = format!(
        "MERGE {paper}
         ON CREATE SET p.first_loaded = $now, p.last_loaded = $now
         ON MATCH SET p.last_loaded = $now",
        paper = paper_pattern(key),
    );
    bind_paper(query(&cypher), key).param("now", now())
}

/// Upsert an Author keyed by surname.
pub fn merge_author(surname: &str) -> Query {
    query(
        "MERGE (a:Author {surname: $surname})
         ON CREATE SET a.first_loaded = $now, a.last_loaded = $now
         ON MATCH SET a.last_loaded = $now",
    )
    .param("surname", surname)
    .param("now", now())
}

/// Upsert a Reviewer keyed by surname.
pub fn merge_reviewer(surname: &str) -> Query {
    query(
        "MERGE (rev:Reviewer {surname: $rev_surname})
         ON CREATE SET rev.first_loaded = $now, rev.last_loaded = $now
         ON MATCH SET rev.last_loaded = $now",
    )
    .param("rev_surname", surname)
    .param("now", now())
}

/// Upsert a Conference keyed by (name, city, year).
pub fn merge_conference(conf: &Conference) -> Query {
    query(
        "MERGE (c:Conference {name: $name, city: $city, year: $conf_year})
         ON CREATE SET c.first_loaded = $now, c.last_loaded = $now
         ON MATCH SET c.last_loaded = $now",
    )
    .param("name", conf.name.as_str())
    .param("city", conf.city.as_str())
    .param("conf_year", year_value(conf.year))
    .param("now", now())
}

/// Upsert a Journal keyed by (name, volume). Volume binds as an integer.
pub fn merge_journal(journal: &Journal) -> Query {
    query(
        "MERGE (j:Journal {name: $name, volume: $volume})
         ON CREATE SET j.first_loaded = $now, j.last_loaded = $now
         ON MATCH SET j.last_loaded = $now",
    )
    .param("name", journal.name.as_str())
    .param("volume", journal.volume)
    .param("now", now())
}

// ── Edge upserts ─────────────────────────────────────────────────

/// Upsert a WROTE edge from an Author to a Paper.
pub fn merge_wrote(author_surname: &str, paper: &PaperKey) -> Query {
    let cypher = format!(
        "MATCH (a:Author {{surname: $surname}})
         MATCH {paper}
         MERGE (a)-[r:{rel}]->(p)
         ON CREATE SET r.first_loaded = $now, r.last_loaded = $now
         ON MATCH SET r.last_loaded = $now",
        paper = paper_pattern(paper),
        rel = RelType::Wrote.as_cypher(),
    );
    bind_paper(query(&cypher), paper)
        .param("surname", author_surname)
        .param("now", now())
}

/// Upsert a HAS edge from a Conference to a Paper.
pub fn merge_conference_has(conf: &Conference, paper: &PaperKey) -> Query {
    let cypher = format!(
        "MATCH (c:Conference {{name: $name, city: $city, year: $conf_year}})
         MATCH {paper}
         MERGE (c)-[r:{rel}]->(p)
         ON CREATE SET r.first_loaded = $now, r.last_loaded = $now
         ON MATCH SET r.last_loaded = $now",
        paper = paper_pattern(paper),
        rel = RelType::Has.as_cypher(),
    );
    bind_paper(query(&cypher), paper)
        .param("name", conf.name.as_str())
        .param("city", conf.city.as_str())
        .param("conf_year", year_value(conf.year))
        .param("now", now())
}

/// Upsert a HAS edge from a Journal to a Paper.
pub fn merge_journal_has(journal: &Journal, paper: &PaperKey) -> Query {
    let cypher = format!(
        "MATCH (j:Journal {{name: $name, volume: $volume}})
         MATCH {paper}
         MERGE (j)-[r:{rel}]->(p)
         ON CREATE SET r.first_loaded = $now, r.last_loaded = $now
         ON MATCH SET r.last_loaded = $now",
        paper = paper_pattern(paper),
        rel = RelType::Has.as_cypher(),
    );
    bind_paper(query(&cypher), paper)
        .param("name", journal.name.as_str())
        .param("volume", journal.volume)
        .param("now", now())
}

/// Upsert a REVIEWED edge from a Reviewer to a Paper.
pub fn merge_reviewed(reviewer_surname: &str, paper: &PaperKey) -> Query {
    let cypher = format!(
        "MATCH (rev:Reviewer {{surname: $rev_surname}})
         MATCH {paper}
         MERGE (rev)-[r:{rel}]->(p)
         ON CREATE SET r.first_loaded = $now, r.last_loaded = $now
         ON MATCH SET r.last_loaded = $now",
        paper = paper_pattern(paper),
        rel = RelType::Reviewed.as_cypher(),
    );
    bind_paper(query(&cypher), paper)
        .param("rev_surname", reviewer_surname)
        .param("now", now())
}

/// Upsert an IS_FRIEND edge from an Author to a Reviewer.
pub fn merge_is_friend(author_surname: &str, reviewer_surname: &str) -> Query {
    let cypher = format!(
        "MATCH (a:Author {{surname: $surname}})
         MATCH (rev:Reviewer {{surname: $rev_surname}})
         MERGE (a)-[r:{rel}]->(rev)
         ON CREATE SET r.first_loaded = $now, r.last_loaded = $now
         ON MATCH SET r.last_loaded = $now",
        rel = RelType::IsFriend.as_cypher(),
    );
    query(&cypher)
        .param("surname", author_surname)
        .param("rev_surname", reviewer_surname)
        .param("now", now())
}

// ── Helpers ──────────────────────────────────────────────────────

/// Cypher match/merge pattern for a paper, per key variant.
fn paper_pattern(key: &PaperKey) -> &'static str {
    match key {
        PaperKey::TitleAndYear { .. } => "(p:Paper {title: $title, year: $year})",
        PaperKey::Title { .. } => "(p:Paper {title: $title})",
    }
}

/// Bind the paper key parameters onto a query.
fn bind_paper(q: Query, key: &PaperKey) -> Query {
    match key {
        PaperKey::TitleAndYear { title, year } => q
            .param("title", title.as_str())
            .param("year", year_value(*year)),
        PaperKey::Title { title } => q.param("title", title.as_str()),
    }
}

/// A year binds as an integer when present, the sentinel string otherwise.
fn year_value(year: Option<i64>) -> BoltType {
    match year {
        Some(y) => BoltType::from(y),
        None => BoltType::from(YEAR_SENTINEL.to_string()),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}
