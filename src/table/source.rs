//! Classification table reader
//!
//! The column map is resolved against the header row once; every data row is
//! then read by index into a typed [`MatchRecord`].

use crate::config::ColumnMap;
use crate::error::RankingError;
use crate::types::{MatchOutcome, MatchRecord};
use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Header positions of the three match roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedColumns {
    entity_a: usize,
    entity_b: usize,
    outcome_for_a: usize,
}

impl ResolvedColumns {
    fn resolve(headers: &StringRecord, columns: &ColumnMap) -> crate::error::Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = columns
            .names()
            .into_iter()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RankingError::config(format!(
                "The following columns mentioned in the column map are not present in the table: {}",
                missing.join(", ")
            ))
            .into());
        }

        let lookup = |name: &str| {
            position(name).ok_or_else(|| RankingError::config(format!("missing column {}", name)))
        };

        Ok(Self {
            entity_a: lookup(columns.entity_a.as_str())?,
            entity_b: lookup(columns.entity_b.as_str())?,
            outcome_for_a: lookup(columns.outcome_for_a.as_str())?,
        })
    }

    fn field<'r>(
        &self,
        row: &'r StringRecord,
        index: usize,
        line: usize,
    ) -> crate::error::Result<&'r str> {
        row.get(index).ok_or_else(|| {
            RankingError::InvalidMatchRecord {
                reason: format!("row {} has no field at position {}", line, index),
            }
            .into()
        })
    }

    fn to_match(&self, row: &StringRecord, line: usize) -> crate::error::Result<MatchRecord> {
        let entity_a = self.field(row, self.entity_a, line)?;
        let entity_b = self.field(row, self.entity_b, line)?;
        if entity_a.is_empty() || entity_b.is_empty() {
            return Err(RankingError::InvalidMatchRecord {
                reason: format!("row {} has an empty entity id", line),
            }
            .into());
        }

        let outcome: MatchOutcome = self
            .field(row, self.outcome_for_a, line)?
            .parse()
            .map_err(|e: RankingError| RankingError::InvalidMatchRecord {
                reason: format!("row {}: {}", line, e),
            })?;

        Ok(MatchRecord::new(entity_a, entity_b, outcome))
    }
}

/// Reads match records from a delimited classifications table
#[derive(Debug, Clone)]
pub struct MatchSource {
    columns: ColumnMap,
    delimiter: u8,
}

impl MatchSource {
    /// Create a reader for tables with the given column map and delimiter
    pub fn new(columns: ColumnMap, delimiter: char) -> crate::error::Result<Self> {
        if !delimiter.is_ascii() {
            return Err(RankingError::config(format!(
                "Delimiter {:?} is not an ASCII character",
                delimiter
            ))
            .into());
        }

        Ok(Self {
            columns,
            delimiter: delimiter as u8,
        })
    }

    /// Read every match from a file
    pub fn read_path(&self, path: &Path) -> crate::error::Result<Vec<MatchRecord>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open classifications {}", path.display()))?;
        let matches = self
            .read(file)
            .with_context(|| format!("Failed to load classifications {}", path.display()))?;

        info!(
            path = %path.display(),
            matches = matches.len(),
            "Loaded classifications"
        );
        Ok(matches)
    }

    /// Read every match from any reader, in row order
    ///
    /// A column map naming absent columns is a configuration error; a
    /// malformed row is an invalid match record naming its 1-based row.
    pub fn read<R: Read>(&self, reader: R) -> crate::error::Result<Vec<MatchRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers().context("Failed to read table header")?.clone();
        let resolved = ResolvedColumns::resolve(&headers, &self.columns)?;

        let mut matches = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let line = index + 1;
            let row = row.with_context(|| format!("Failed to read row {}", line))?;
            matches.push(resolved.to_match(&row, line)?);
        }

        Ok(matches)
    }
}
