//! Raw gene table loader
//!
//! Reads a tab-delimited gene table into [`GeneRow`]s according to a
//! [`SourceLayout`]. Any malformed row aborts the load: a half-read table
//! would silently degrade every lookup made against the resulting dictionary.

use crate::layout::SourceLayout;
use crate::source::{cell, display_name, list, open_source};
use genemap_common::{GenemapError, Result};
use genemap_core::GeneRow;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Load and parse a gene table from disk (`.gz` accepted)
#[instrument(skip_all, fields(path = %path.as_ref().display(), layout = %layout))]
pub fn load_gene_table(path: impl AsRef<Path>, layout: &SourceLayout) -> Result<Vec<GeneRow>> {
    let path = path.as_ref();
    parse_gene_table(open_source(path)?, layout, &display_name(path))
}

/// Parse a gene table from any reader
pub fn parse_gene_table<R: Read>(
    reader: R,
    layout: &SourceLayout,
    source_name: &str,
) -> Result<Vec<GeneRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .quoting(layout.quoted)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();
    let columns = Columns::resolve(&headers, layout, source_name)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        let line = record.position().map_or(0, |p| p.line());
        rows.push(columns.row(&record, source_name, line)?);
    }

    info!(source = source_name, rows = rows.len(), "gene table loaded");
    Ok(rows)
}

pub(crate) fn csv_error(source_name: &str, err: csv::Error) -> GenemapError {
    let line = err.position().map_or(0, |p| p.line());
    GenemapError::source_format(source_name, line, err.to_string())
}

struct Columns {
    symbol: usize,
    entrez_id: usize,
    alias_symbol: usize,
    prev_symbol: Option<usize>,
    uniprot: Option<usize>,
    ensembl_gene_id: Option<usize>,
    db_xrefs: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, layout: &SourceLayout, source_name: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().trim_start_matches('#') == name)
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                GenemapError::source_format(
                    source_name,
                    1,
                    format!("missing required column '{name}' for layout {layout}"),
                )
            })
        };
        let optional = |name: &Option<String>| {
            let name = name.as_deref()?;
            let idx = find(name);
            if idx.is_none() {
                warn!(source = source_name, column = name, "optional column not present");
            }
            idx
        };

        Ok(Self {
            symbol: required(&layout.symbol)?,
            entrez_id: required(&layout.entrez_id)?,
            alias_symbol: required(&layout.alias_symbol)?,
            prev_symbol: optional(&layout.prev_symbol),
            uniprot: optional(&layout.uniprot),
            ensembl_gene_id: optional(&layout.ensembl_gene_id),
            db_xrefs: optional(&layout.db_xrefs),
        })
    }

    fn row(&self, record: &csv::StringRecord, source_name: &str, line: u64) -> Result<GeneRow> {
        let get = |idx: usize| record.get(idx).unwrap_or("");
        let get_opt = |idx: Option<usize>| idx.and_then(|i| record.get(i)).and_then(cell);

        let symbol = cell(get(self.symbol))
            .ok_or_else(|| GenemapError::source_format(source_name, line, "missing gene symbol"))?;

        let entrez_id = match cell(get(self.entrez_id)) {
            None => None,
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                GenemapError::source_format(source_name, line, format!("invalid Entrez ID '{raw}'"))
            })?),
        };

        let ensembl_gene_id = get_opt(self.ensembl_gene_id)
            .map(str::to_string)
            .or_else(|| get_opt(self.db_xrefs).and_then(ensembl_from_xrefs));

        Ok(GeneRow {
            symbol: symbol.to_string(),
            entrez_id,
            alias_symbols: list(get(self.alias_symbol)),
            prev_symbols: self.prev_symbol.map(|i| list(get(i))).unwrap_or_default(),
            uniprot: get_opt(self.uniprot).and_then(|ids| list(ids).into_iter().next()),
            ensembl_gene_id,
        })
    }
}

/// First `Ensembl:` cross-reference in a `dbXrefs` cell
fn ensembl_from_xrefs(xrefs: &str) -> Option<String> {
    xrefs
        .split('|')
        .find_map(|xref| xref.trim().strip_prefix("Ensembl:"))
        .map(str::to_string)
}
