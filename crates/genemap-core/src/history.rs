//! Historical index over retired gene identifiers
//!
//! Built from the gene history ledger, where each row records that a
//! discontinued Entrez ID (and the symbol it carried) was either merged into a
//! current gene or dropped outright.

use crate::model::{GeneValue, KeyType, QueryValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One row of the history ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// `None` when the ledger has a dash: the record was dropped, not merged
    pub current_entrez_id: Option<u64>,
    pub retired_entrez_id: u64,
    pub retired_symbol: String,
}

impl HistoryRow {
    pub fn new(
        current_entrez_id: Option<u64>,
        retired_entrez_id: u64,
        retired_symbol: impl Into<String>,
    ) -> Self {
        Self {
            current_entrez_id,
            retired_entrez_id,
            retired_symbol: retired_symbol.into(),
        }
    }
}

/// Where a retired identifier went. Lists tolerate a key showing up on
/// several ledger rows; resolution always uses the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Succession {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub current_entrez_ids: Vec<u64>,
    /// Retired ID recorded on the same row as a dropped symbol
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_entrez_ids: Vec<u64>,
    /// Retired symbol recorded on the same row as a dropped ID
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_symbols: Vec<String>,
}

impl Succession {
    pub fn current(&self) -> Option<u64> {
        self.current_entrez_ids.first().copied()
    }

    /// Same-generation value of type `field`, if the ledger recorded one
    pub fn peer(&self, field: KeyType) -> Option<GeneValue> {
        match field {
            KeyType::EntrezId => self.peer_entrez_ids.first().copied().map(GeneValue::Id),
            KeyType::Symbol => self.peer_symbols.first().cloned().map(GeneValue::Text),
            _ => None,
        }
    }
}

/// Retired identifiers that now point at a current gene
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predecessors {
    pub retired_entrez_ids: Vec<u64>,
    pub retired_symbols: Vec<String>,
}

impl Predecessors {
    pub fn first(&self, field: KeyType) -> Option<GeneValue> {
        match field {
            KeyType::EntrezId => self.retired_entrez_ids.first().copied().map(GeneValue::Id),
            KeyType::Symbol => self.retired_symbols.first().cloned().map(GeneValue::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalIndex {
    retired_entrez: HashMap<u64, Succession>,
    retired_symbols: HashMap<String, Succession>,
    /// Current gene -> everything retired into it. Inspection only.
    predecessors: HashMap<u64, Predecessors>,
    rows: usize,
}

impl HistoricalIndex {
    #[instrument(skip_all)]
    pub fn from_rows(rows: impl IntoIterator<Item = HistoryRow>) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.insert(row);
        }
        debug!(
            rows = index.rows,
            retired_ids = index.retired_entrez.len(),
            retired_symbols = index.retired_symbols.len(),
            "historical index built"
        );
        index
    }

    /// Append one ledger row. Existing entries are extended, never replaced.
    pub fn insert(&mut self, row: HistoryRow) {
        self.rows += 1;
        let by_id = self.retired_entrez.entry(row.retired_entrez_id).or_default();

        match row.current_entrez_id {
            Some(current) => {
                by_id.current_entrez_ids.push(current);
                if has_symbol(&row.retired_symbol) {
                    self.retired_symbols
                        .entry(row.retired_symbol.clone())
                        .or_default()
                        .current_entrez_ids
                        .push(current);
                }

                let predecessors = self.predecessors.entry(current).or_default();
                predecessors.retired_entrez_ids.push(row.retired_entrez_id);
                if has_symbol(&row.retired_symbol) {
                    predecessors.retired_symbols.push(row.retired_symbol);
                }
            }
            None => {
                if has_symbol(&row.retired_symbol) {
                    by_id.peer_symbols.push(row.retired_symbol.clone());
                    self.retired_symbols
                        .entry(row.retired_symbol)
                        .or_default()
                        .peer_entrez_ids
                        .push(row.retired_entrez_id);
                }
            }
        }
    }

    pub fn retired_entrez(&self, entrez_id: u64) -> Option<&Succession> {
        self.retired_entrez.get(&entrez_id)
    }

    pub fn retired_symbol(&self, symbol: &str) -> Option<&Succession> {
        self.retired_symbols.get(symbol)
    }

    /// Succession for `query` read as a retired identifier of `key_type`.
    /// Only symbols and Entrez IDs have a history.
    pub fn retired(&self, key_type: KeyType, query: &QueryValue) -> Option<&Succession> {
        match key_type {
            KeyType::EntrezId => query.as_id().and_then(|id| self.retired_entrez(id)),
            KeyType::Symbol => match query {
                QueryValue::Text(symbol) => self.retired_symbol(symbol),
                QueryValue::Id(id) => self.retired_symbol(&id.to_string()),
            },
            _ => None,
        }
    }

    pub fn predecessors(&self, entrez_id: u64) -> Option<&Predecessors> {
        self.predecessors.get(&entrez_id)
    }

    pub fn retired_entrez_count(&self) -> usize {
        self.retired_entrez.len()
    }

    pub fn retired_symbol_count(&self) -> usize {
        self.retired_symbols.len()
    }

    /// Number of ledger rows indexed
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

fn has_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != "-"
}
