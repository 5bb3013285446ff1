//! Bootstrap loader
//!
//! Populates a store from a tabular text source with a header row:
//! `id,name,quantity,price,date`. Rows are inserted in file order, one
//! engine call per row — duplicate keys are rejected by the engine and
//! reported back, never filtered out up front.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::engine::Engine;
use crate::error::{Result, StoreError};
use crate::record::Record;

/// Outcome of one bootstrap run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows inserted into the tree
    pub inserted: usize,

    /// Rows the engine rejected as duplicate keys
    pub rejected: usize,
}

/// Load every row of `path` into the engine
///
/// Malformed rows fail the whole load with `Corrupt` — garbage input is
/// surfaced, not dropped. Duplicate-key rows are counted in the report
/// and logged; all other engine errors abort the load.
pub fn load_csv(engine: &Engine, path: &Path) -> Result<LoadReport> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut report = LoadReport::default();

    // Line 1 is the header row.
    for (line_no, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_row(&line, line_no + 1)?;
        let key = record.id;

        match engine.insert(record) {
            Ok(()) => report.inserted += 1,
            Err(StoreError::DuplicateKey { .. }) => {
                tracing::warn!(key, line = line_no + 1, "duplicate key rejected by engine");
                report.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        inserted = report.inserted,
        rejected = report.rejected,
        "bootstrap load finished"
    );
    Ok(report)
}

/// Parse one `id,name,quantity,price,date` row
fn parse_row(line: &str, line_no: usize) -> Result<Record> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 5 {
        return Err(StoreError::Corrupt(format!(
            "line {}: expected 5 fields, got {}",
            line_no,
            fields.len()
        )));
    }

    let id = parse_field(fields[0], line_no, "id")?;
    let quantity = parse_field(fields[2], line_no, "quantity")?;
    let price = parse_field(fields[3], line_no, "price")?;

    Ok(Record::new(id, fields[1], quantity, price, fields[4]))
}

fn parse_field<T: std::str::FromStr>(raw: &str, line_no: usize, name: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        StoreError::Corrupt(format!("line {}: invalid {}: {:?}", line_no, name, raw))
    })
}
