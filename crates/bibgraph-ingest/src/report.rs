//! Flattening query results into single-line log records.
//!
//! The four fixed queries return two result shapes: Q1–Q3 collapse all rows
//! into one aggregated record, Q4 emits one record per row. One formatter
//! handles both, driven by a [`ResultShape`] descriptor.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

/// How a query's row stream flattens into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// One record for the whole result set: the primary column from the
    /// first row, the collected column from every row in result order and,
    /// when `trailer` is set, the trailer column from the *last* row. With
    /// multiple distinct trailer values only the last one survives; that
    /// mirrors the historical output and has not been confirmed as intended.
    /// `dedup` drops repeated collected values, keeping first occurrence;
    /// without it duplicates appear as often as they matched.
    Aggregated { trailer: bool, dedup: bool },
    /// One record per row, `width` columns each. An empty result set still
    /// yields a single record with empty placeholder columns.
    PerRow { width: usize },
}

/// Flatten a query's rows into log record lines.
///
/// Rows are positional: column 0 is the primary value, column 1 the
/// collected value, column 2 the optional trailer (aggregated shape), or
/// simply the record columns in order (per-row shape).
pub fn flatten(tag: &str, shape: ResultShape, rows: &[Vec<String>]) -> Vec<String> {
    match shape {
        ResultShape::Aggregated { trailer, dedup } => {
            let primary = rows
                .first()
                .and_then(|row| row.first())
                .map(String::as_str)
                .unwrap_or("");

            let mut collected: Vec<&str> = Vec::new();
            for row in rows {
                let value = row.get(1).map(String::as_str).unwrap_or("");
                if !dedup || !collected.contains(&value) {
                    collected.push(value);
                }
            }

            let mut line = format!("{tag}: {primary},[{}]", collected.join(", "));
            if trailer {
                let last = rows
                    .last()
                    .and_then(|row| row.get(2))
                    .map(String::as_str)
                    .unwrap_or("");
                line.push(',');
                line.push_str(last);
            }
            vec![line]
        }
        ResultShape::PerRow { width } => {
            if rows.is_empty() {
                let placeholders = vec![""; width];
                return vec![format!("{tag}: [{}]", placeholders.join(", "))];
            }
            rows.iter()
                .map(|row| format!("{tag}: [{}]", row.join(", ")))
                .collect()
        }
    }
}

/// Append-only results log; one line per record, prior content kept.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append records and flush before returning.
    pub fn append(&self, records: &[String]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            writeln!(file, "{record}")?;
        }
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn aggregated_collapses_all_rows_into_one_record() {
        let rows = vec![
            row(&["title1", "auth1", "rev1"]),
            row(&["title1", "auth2", "rev1"]),
        ];
        let records = flatten(
            "Q1",
            ResultShape::Aggregated {
                trailer: true,
                dedup: true,
            },
            &rows,
        );
        assert_eq!(records, vec!["Q1: title1,[auth1, auth2],rev1"]);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let rows = vec![
            row(&["title1", "auth2", "rev1"]),
            row(&["title1", "auth1", "rev1"]),
            row(&["title1", "auth2", "rev1"]),
        ];
        let records = flatten(
            "Q1",
            ResultShape::Aggregated {
                trailer: true,
                dedup: true,
            },
            &rows,
        );
        assert_eq!(records, vec!["Q1: title1,[auth2, auth1],rev1"]);
    }

    #[test]
    fn without_dedup_repeated_values_appear_per_matched_row() {
        // Two distinct papers can share a title (conference papers key on
        // (title, year), journal papers on title alone); the title is then
        // listed once per matching row.
        let rows = vec![
            row(&["auth1", "title1"]),
            row(&["auth1", "title1"]),
            row(&["auth1", "title2"]),
        ];
        let records = flatten(
            "Q3",
            ResultShape::Aggregated {
                trailer: false,
                dedup: false,
            },
            &rows,
        );
        assert_eq!(records, vec!["Q3: auth1,[title1, title1, title2]"]);
    }

    #[test]
    fn last_trailer_value_wins() {
        let rows = vec![
            row(&["title1", "auth1", "rev1"]),
            row(&["title1", "auth2", "rev2"]),
        ];
        let records = flatten(
            "Q1",
            ResultShape::Aggregated {
                trailer: true,
                dedup: true,
            },
            &rows,
        );
        assert_eq!(records, vec!["Q1: title1,[auth1, auth2],rev2"]);
    }

    #[test]
    fn aggregated_empty_result_yields_placeholder_record() {
        let with_trailer = flatten(
            "Q1",
            ResultShape::Aggregated {
                trailer: true,
                dedup: true,
            },
            &[],
        );
        assert_eq!(with_trailer, vec!["Q1: ,[],"]);

        let without = flatten(
            "Q2",
            ResultShape::Aggregated {
                trailer: false,
                dedup: false,
            },
            &[],
        );
        assert_eq!(without, vec!["Q2: ,[]"]);
    }

    #[test]
    fn per_row_emits_one_record_per_row() {
        let rows = vec![
            row(&["paper1", "auth1", "rev1"]),
            row(&["paper2", "auth2", "rev1"]),
        ];
        let records = flatten("Q4", ResultShape::PerRow { width: 3 }, &rows);
        assert_eq!(
            records,
            vec!["Q4: [paper1, auth1, rev1]", "Q4: [paper2, auth2, rev1]"]
        );
    }

    #[test]
    fn per_row_empty_result_yields_one_placeholder_record() {
        let records = flatten("Q4", ResultShape::PerRow { width: 3 }, &[]);
        assert_eq!(records, vec!["Q4: [, , ]"]);
    }

    #[test]
    fn results_log_appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.log");
        let log = ResultsLog::new(&path);

        log.append(&["Q1: a,[b],c".to_string()]).unwrap();
        log.append(&["Q2: d,[e]".to_string()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Q1: a,[b],c\nQ2: d,[e]\n");
    }
}
