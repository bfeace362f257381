use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::model::Dataset;
use crate::error::IngestError;

/// Rows whose `confidence` is below this are skipped.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

const CONFIDENCE_COLUMN: &str = "confidence";

/// Row counts from one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows appended to every channel.
    pub accepted: usize,
    /// Rows skipped for low confidence.
    pub rejected: usize,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Append one sample per channel of every target dataset for each accepted
/// row of the CSV at `path`.
pub fn ingest_path(path: &Path, targets: &mut [&mut Dataset]) -> Result<IngestReport, IngestError> {
    if !path.is_file() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| {
        log::debug!("cannot open {}: {e}", path.display());
        IngestError::NotFound(path.to_path_buf())
    })?;
    log::debug!("ingesting {}", path.display());
    ingest_reader(file, targets)
}

/// CSV layout: header row with column names, one row per video frame.
/// Names and values are trimmed; empty fields count as absent.
///
/// A row is read in full before anything is appended, so a failing row never
/// leaves channels with unequal lengths.
pub fn ingest_reader<R: Read>(input: R, targets: &mut [&mut Dataset]) -> Result<IngestReport, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();

    let confidence_idx = index.get(CONFIDENCE_COLUMN).copied();

    // Column index for every channel of every target, in channel order.
    let plan: Vec<Vec<(String, Option<usize>)>> = targets
        .iter()
        .map(|ds| {
            ds.names()
                .iter()
                .map(|name| (name.clone(), index.get(name.as_str()).copied()))
                .collect()
        })
        .collect();

    let mut report = IngestReport::default();
    let mut row_values: Vec<f64> = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();

        let confidence = parse_field(&record, confidence_idx, CONFIDENCE_COLUMN, line)?;
        if confidence < CONFIDENCE_THRESHOLD {
            report.rejected += 1;
            continue;
        }

        row_values.clear();
        for columns in &plan {
            for (name, idx) in columns {
                row_values.push(parse_field(&record, *idx, name, line)?);
            }
        }

        let mut values = row_values.iter();
        for (dataset, columns) in targets.iter_mut().zip(&plan) {
            for ((name, _), value) in columns.iter().zip(values.by_ref()) {
                if let Some(channel) = dataset.channel_mut(name) {
                    channel.values.push(*value);
                }
            }
        }
        report.accepted += 1;
    }

    log::info!(
        "ingested {} rows, {} rejected below confidence {CONFIDENCE_THRESHOLD}",
        report.accepted,
        report.rejected
    );
    if report.rejected > report.accepted {
        log::warn!("most rows were rejected for low tracking confidence");
    }

    Ok(report)
}

fn parse_field(
    record: &csv::StringRecord,
    idx: Option<usize>,
    column: &str,
    line: usize,
) -> Result<f64, IngestError> {
    let raw = idx
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| IngestError::MissingColumn(column.to_string()))?;

    raw.parse::<f64>().map_err(|_| IngestError::InvalidValue {
        column: column.to_string(),
        row: line,
        value: raw.to_string(),
    })
}
