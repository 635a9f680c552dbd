//! Graph ingestion planner: one all-or-nothing transaction per file category.
//!
//! Each category reads its normalized CSV file and fans every row out into
//! idempotent MERGE operations (see `bibgraph_graph::mutations`). A failure
//! anywhere in a category rolls back that category's transaction only; the
//! remaining categories are still attempted.

use std::path::Path;

use serde::Deserialize;

use bibgraph_core::{Conference, Journal, PaperKey};
use bibgraph_graph::{mutations, GraphClient, GraphError};

use crate::error::{PipelineError, Result};
use crate::preprocess::PROCESSED_PREFIX;

/// The three input file kinds, each with its own upsert plan and transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Conferences,
    Journals,
    Friendships,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Conferences,
        Category::Journals,
        Category::Friendships,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Conferences => "conferences",
            Self::Journals => "journals",
            Self::Friendships => "friendships",
        }
    }

    /// Normalized file the planner reads for this category.
    pub fn processed_file(&self) -> String {
        format!("{PROCESSED_PREFIX}{}.csv", self.name())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConferenceRow {
    title: String,
    authors: String,
    conference_name: String,
    city: String,
    year: String,
    reviewer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JournalRow {
    title: String,
    authors: String,
    journal_name: String,
    volume: String,
    reviewer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FriendshipRow {
    reviewer: String,
    author: String,
}

/// Ingest one category's normalized file inside a single transaction.
/// Returns the number of rows applied.
pub async fn ingest_category(
    graph: &GraphClient,
    dir: &Path,
    category: Category,
) -> Result<usize> {
    let path = dir.join(category.processed_file());
    if !path.is_file() {
        return Err(PipelineError::MissingFile(path));
    }

    let mut txn = graph.start_txn().await?;
    match apply_category(&mut txn, &path, category).await {
        Ok(rows) => {
            txn.commit().await.map_err(GraphError::from)?;
            Ok(rows)
        }
        Err(e) => {
            // Surface the row error; a rollback failure is only worth a warning.
            if let Err(rb_err) = txn.rollback().await {
                tracing::warn!(category = category.name(), error = %rb_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn apply_category(txn: &mut neo4rs::Txn, path: &Path, category: Category) -> Result<usize> {
    let file = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| PipelineError::Csv {
        file: file.clone(),
        source: e,
    })?;
    let mut rows = 0;

    match category {
        Category::Conferences => {
            for result in reader.deserialize::<ConferenceRow>() {
                let row = result.map_err(|e| PipelineError::Csv {
                    file: file.clone(),
                    source: e,
                })?;
                apply_conference_row(txn, &row).await?;
                rows += 1;
            }
        }
        Category::Journals => {
            for (idx, result) in reader.deserialize::<JournalRow>().enumerate() {
                let row = result.map_err(|e| PipelineError::Csv {
                    file: file.clone(),
                    source: e,
                })?;
                let volume = row.volume.trim().parse::<i64>().map_err(|_| {
                    PipelineError::MalformedRow {
                        file: file.clone(),
                        line: idx + 2,
                        reason: format!("journal volume is not numeric: {:?}", row.volume),
                    }
                })?;
                apply_journal_row(txn, &row, volume).await?;
                rows += 1;
            }
        }
        Category::Friendships => {
            for result in reader.deserialize::<FriendshipRow>() {
                let row = result.map_err(|e| PipelineError::Csv {
                    file: file.clone(),
                    source: e,
                })?;
                apply_friendship_row(txn, &row).await?;
                rows += 1;
            }
        }
    }

    Ok(rows)
}

async fn apply_conference_row(txn: &mut neo4rs::Txn, row: &ConferenceRow) -> Result<()> {
    let year = parse_year(&row.year);
    let paper = PaperKey::TitleAndYear {
        title: row.title.clone(),
        year,
    };
    run(txn, mutations::merge_paper(&paper)).await?;

    for author in split_authors(&row.authors) {
        run(txn, mutations::merge_author(&author)).await?;
        run(txn, mutations::merge_wrote(&author, &paper)).await?;
    }

    let conf = Conference {
        name: row.conference_name.clone(),
        city: row.city.clone(),
        year,
    };
    run(txn, mutations::merge_conference(&conf)).await?;
    run(txn, mutations::merge_conference_has(&conf, &paper)).await?;

    run(txn, mutations::merge_reviewer(&row.reviewer)).await?;
    run(txn, mutations::merge_reviewed(&row.reviewer, &paper)).await?;
    Ok(())
}

async fn apply_journal_row(txn: &mut neo4rs::Txn, row: &JournalRow, volume: i64) -> Result<()> {
    // Journal papers key on title alone.
    let paper = PaperKey::Title {
        title: row.title.clone(),
    };
    run(txn, mutations::merge_paper(&paper)).await?;

    let journal = Journal {
        name: row.journal_name.clone(),
        volume,
    };
    run(txn, mutations::merge_journal(&journal)).await?;
    run(txn, mutations::merge_journal_has(&journal, &paper)).await?;

    for author in split_authors(&row.authors) {
        run(txn, mutations::merge_author(&author)).await?;
        run(txn, mutations::merge_wrote(&author, &paper)).await?;
    }

    run(txn, mutations::merge_reviewer(&row.reviewer)).await?;
    run(txn, mutations::merge_reviewed(&row.reviewer, &paper)).await?;
    Ok(())
}

async fn apply_friendship_row(txn: &mut neo4rs::Txn, row: &FriendshipRow) -> Result<()> {
    run(txn, mutations::merge_reviewer(&row.reviewer)).await?;
    run(txn, mutations::merge_author(&row.author)).await?;
    run(txn, mutations::merge_is_friend(&row.author, &row.reviewer)).await?;
    Ok(())
}

async fn run(txn: &mut neo4rs::Txn, query: neo4rs::Query) -> Result<()> {
    txn.run(query).await.map_err(GraphError::from)?;
    Ok(())
}

/// Split a `;`-separated author list, dropping empty entries.
fn split_authors(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// A year is kept when numeric; anything else keys on the sentinel.
fn parse_year(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
