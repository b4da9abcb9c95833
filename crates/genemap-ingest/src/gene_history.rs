//! Gene history ledger loader
//!
//! Columns are read by position: `tax_id`, `GeneID`, `Discontinued_GeneID`,
//! `Discontinued_Symbol`. Trailing columns (discontinue date) are ignored.

use crate::gene_table::csv_error;
use crate::source::{cell, display_name, open_source};
use genemap_common::{GenemapError, Result};
use genemap_core::HistoryRow;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

const MIN_COLUMNS: usize = 4;

/// Load the history ledger, keeping only rows for `taxon` when given
#[instrument(skip_all, fields(path = %path.as_ref().display(), taxon = ?taxon))]
pub fn load_history(path: impl AsRef<Path>, taxon: Option<u32>) -> Result<Vec<HistoryRow>> {
    let path = path.as_ref();
    parse_history(open_source(path)?, taxon, &display_name(path))
}

pub fn parse_history<R: Read>(reader: R, taxon: Option<u32>, source_name: &str) -> Result<Vec<HistoryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let taxon = taxon.map(|t| t.to_string());
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() < MIN_COLUMNS {
            return Err(GenemapError::source_format(
                source_name,
                line,
                format!("expected at least {MIN_COLUMNS} columns, found {}", record.len()),
            ));
        }

        if let Some(taxon) = &taxon {
            if record[0].trim() != taxon {
                skipped += 1;
                continue;
            }
        }

        let current_entrez_id = match cell(&record[1]) {
            None => None,
            Some(raw) => Some(parse_id(raw, source_name, line)?),
        };
        let retired_raw = cell(&record[2]).ok_or_else(|| {
            GenemapError::source_format(source_name, line, "missing discontinued Entrez ID")
        })?;
        let retired_entrez_id = parse_id(retired_raw, source_name, line)?;

        rows.push(HistoryRow::new(
            current_entrez_id,
            retired_entrez_id,
            record[3].trim(),
        ));
    }

    debug!(skipped, "rows outside the requested taxon");
    info!(source = source_name, rows = rows.len(), "gene history loaded");
    Ok(rows)
}

fn parse_id(raw: &str, source_name: &str, line: u64) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        GenemapError::source_format(source_name, line, format!("invalid Entrez ID '{raw}'"))
    })
}
