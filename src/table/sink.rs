//! Results table writer

use crate::config::{OutputFormat, OutputSettings};
use crate::error::RankingError;
use crate::rating::{RatingRecord, RatingSnapshot};
use crate::types::EntityId;
use anyhow::Context;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

/// Header of the results table, in [`SnapshotRow`] field order
pub const RESULT_COLUMNS: [&str; 5] = ["entity_id", "score", "k_value", "count", "std_dev"];

/// One line of the results table
///
/// The recent-score history is internal to the engine and not exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub entity_id: EntityId,
    pub score: f64,
    pub k_value: f64,
    pub count: u64,
    pub std_dev: f64,
}

impl From<&RatingRecord> for SnapshotRow {
    fn from(record: &RatingRecord) -> Self {
        Self {
            entity_id: record.entity_id.clone(),
            score: record.score,
            k_value: record.k_value,
            count: record.count,
            std_dev: record.std_dev,
        }
    }
}

/// Rows in entity id order
pub fn snapshot_rows(snapshot: &RatingSnapshot) -> Vec<SnapshotRow> {
    snapshot.ratings.values().map(SnapshotRow::from).collect()
}

/// Write the snapshot as a delimited table with a header row
pub fn write_csv<W: Write>(
    snapshot: &RatingSnapshot,
    writer: W,
    delimiter: char,
) -> crate::error::Result<()> {
    if !delimiter.is_ascii() {
        return Err(RankingError::config(format!(
            "Delimiter {:?} is not an ASCII character",
            delimiter
        ))
        .into());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .from_writer(writer);

    // Written up front so an empty snapshot still yields a header
    writer
        .write_record(RESULT_COLUMNS)
        .context("Failed to write results header")?;
    for row in snapshot_rows(snapshot) {
        writer.serialize(&row).context("Failed to write results row")?;
    }
    writer.flush().context("Failed to flush results")?;

    Ok(())
}

/// Write the snapshot as a pretty-printed JSON array of rows
pub fn write_json<W: Write>(snapshot: &RatingSnapshot, mut writer: W) -> crate::error::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &snapshot_rows(snapshot))
        .context("Failed to serialize results")?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write the snapshot to the configured file in the configured format
pub fn save_snapshot(
    snapshot: &RatingSnapshot,
    settings: &OutputSettings,
) -> crate::error::Result<()> {
    let file = File::create(&settings.path)
        .with_context(|| format!("Failed to create {}", settings.path.display()))?;
    let writer = BufWriter::new(file);

    match settings.format {
        OutputFormat::Csv => write_csv(snapshot, writer, settings.delimiter)?,
        OutputFormat::Json => write_json(snapshot, writer)?,
    }

    info!(
        path = %settings.path.display(),
        format = %settings.format,
        entities = snapshot.len(),
        "Saved ratings"
    );
    Ok(())
}
