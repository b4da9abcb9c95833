//! Opening source tables, compressed or not

use flate2::read::MultiGzDecoder;
use genemap_common::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Open `path` for reading, transparently gunzipping `*.gz` files
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);

    if is_gzip(path) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Short name used in error messages and snapshot metadata
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A single cell is absent when it is empty or the `-` placeholder
pub(crate) fn cell(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

/// Split a pipe-delimited cell, dropping placeholders
pub(crate) fn list(value: &str) -> Vec<String> {
    value
        .split('|')
        .filter_map(cell)
        .map(str::to_string)
        .collect()
}
