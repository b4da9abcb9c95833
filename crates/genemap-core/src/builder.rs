//! Dictionary construction from gene table rows
//!
//! Every row becomes one [`GeneRecord`] in the dictionary arena. Each
//! configured key type then gets its own table pointing into that arena:
//!
//! - `symbol` is keyed by the canonical symbol *and* every alias and previous
//!   symbol, so a lookup by any name lands on the record. When two genes claim
//!   the same string, the gene whose canonical symbol it is owns the key;
//!   otherwise the first row to mention it keeps it.
//! - `alias_symbol` is keyed by alternate and previous symbols only, first row wins.
//! - `entrez_id`, `uniprot` and `ensembl_gene_id` are keyed by the row's single
//!   value; these are expected to be unique, so a repeat simply overwrites.

use crate::model::{Dictionary, GeneRecord, KeyType};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// One parsed row of the gene table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneRow {
    pub symbol: String,
    pub entrez_id: Option<u64>,
    pub alias_symbols: Vec<String>,
    pub prev_symbols: Vec<String>,
    pub uniprot: Option<String>,
    pub ensembl_gene_id: Option<String>,
}

impl GeneRow {
    pub fn new(symbol: impl Into<String>, entrez_id: Option<u64>) -> Self {
        Self {
            symbol: symbol.into(),
            entrez_id,
            ..Self::default()
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_symbols = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prev_symbols<I, S>(mut self, prev: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prev_symbols = prev.into_iter().map(Into::into).collect();
        self
    }

    fn to_record(&self) -> GeneRecord {
        GeneRecord::new(
            self.entrez_id,
            self.symbol.clone(),
            self.alias_symbols.iter().chain(&self.prev_symbols).cloned(),
        )
        .with_uniprot(self.uniprot.clone())
        .with_ensembl_gene_id(self.ensembl_gene_id.clone())
    }

    /// Keys this row contributes to the `key_type` table
    fn keys(&self, record: &GeneRecord, key_type: KeyType) -> Vec<String> {
        match key_type {
            KeyType::Symbol => record.aliases.iter().cloned().collect(),
            KeyType::AliasSymbol => self
                .alias_symbols
                .iter()
                .chain(&self.prev_symbols)
                .filter(|alias| !alias.is_empty())
                .cloned()
                .collect(),
            KeyType::EntrezId => self.entrez_id.map(|id| id.to_string()).into_iter().collect(),
            KeyType::Uniprot => self.uniprot.iter().cloned().collect(),
            KeyType::EnsemblGeneId => self.ensembl_gene_id.iter().cloned().collect(),
        }
    }
}

/// Which key types to build tables for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub key_types: Vec<KeyType>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            key_types: KeyType::REQUIRED.to_vec(),
        }
    }
}

impl BuildConfig {
    pub fn new(key_types: impl IntoIterator<Item = KeyType>) -> Self {
        Self {
            key_types: key_types.into_iter().collect(),
        }
    }

    /// Requested key types plus the required ones, deduplicated and ordered
    pub fn effective_key_types(&self) -> Vec<KeyType> {
        let mut key_types: Vec<KeyType> = KeyType::REQUIRED
            .into_iter()
            .chain(self.key_types.iter().copied())
            .collect();
        key_types.sort();
        key_types.dedup();
        key_types
    }
}

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub rows: usize,
    pub records: usize,
    pub table_sizes: BTreeMap<KeyType, usize>,
    /// Symbol keys taken over from another gene's alias by their canonical owner
    pub canonical_overrides: usize,
    /// Alias keys left with the earlier row that claimed them
    pub shadowed_aliases: usize,
}

/// Builds a [`Dictionary`] from gene rows
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    config: BuildConfig,
}

impl DictionaryBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn build(&self, rows: &[GeneRow]) -> (Dictionary, BuildStats) {
        let records: Vec<GeneRecord> = rows.iter().map(GeneRow::to_record).collect();
        let mut stats = BuildStats {
            rows: rows.len(),
            records: records.len(),
            ..BuildStats::default()
        };

        let mut tables = BTreeMap::new();
        for key_type in self.config.effective_key_types() {
            let table = build_table(rows, &records, key_type, &mut stats);
            debug!(key_type = %key_type, keys = table.len(), "table built");
            stats.table_sizes.insert(key_type, table.len());
            tables.insert(key_type, table);
        }

        info!(
            records = stats.records,
            symbol_keys = stats.table_sizes.get(&KeyType::Symbol).copied().unwrap_or(0),
            entrez_keys = stats.table_sizes.get(&KeyType::EntrezId).copied().unwrap_or(0),
            canonical_overrides = stats.canonical_overrides,
            shadowed_aliases = stats.shadowed_aliases,
            "dictionary built"
        );

        (Dictionary::from_parts(records, tables), stats)
    }
}

fn build_table(
    rows: &[GeneRow],
    records: &[GeneRecord],
    key_type: KeyType,
    stats: &mut BuildStats,
) -> HashMap<String, usize> {
    let mut table: HashMap<String, usize> = HashMap::new();

    for (idx, (row, record)) in rows.iter().zip(records).enumerate() {
        for key in row.keys(record, key_type) {
            match (key_type, table.entry(key)) {
                (_, Entry::Vacant(slot)) => {
                    slot.insert(idx);
                }
                (KeyType::Symbol, Entry::Occupied(mut slot)) => {
                    if slot.key() == &row.symbol {
                        if *slot.get() != idx {
                            stats.canonical_overrides += 1;
                        }
                        slot.insert(idx);
                    } else if *slot.get() != idx {
                        stats.shadowed_aliases += 1;
                    }
                }
                // A row repeating its own alias is not shadowing anything
                (KeyType::AliasSymbol, Entry::Occupied(slot)) => {
                    if *slot.get() != idx {
                        stats.shadowed_aliases += 1;
                    }
                }
                (_, Entry::Occupied(mut slot)) => {
                    slot.insert(idx);
                }
            }
        }
    }

    table
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{GeneValue, QueryValue};
    use proptest::prelude::*;

    fn lookup_symbol(dictionary: &Dictionary, key_type: KeyType, q: impl Into<QueryValue>) -> Option<String> {
        dictionary
            .get(key_type, &q.into())
            .unwrap()
            .map(|record| record.symbol.clone())
    }

    #[test]
    fn test_default_builds_symbol_and_entrez_tables() {
        let (dictionary, stats) = DictionaryBuilder::default()
            .build(&[GeneRow::new("A1BG", Some(1)).with_aliases(["A1B", "ABG"])]);

        assert_eq!(
            dictionary.key_types().collect::<Vec<_>>(),
            vec![KeyType::Symbol, KeyType::EntrezId]
        );
        assert_eq!(stats.table_sizes[&KeyType::Symbol], 3);
        assert_eq!(stats.table_sizes[&KeyType::EntrezId], 1);
        assert_eq!(lookup_symbol(&dictionary, KeyType::Symbol, "ABG").as_deref(), Some("A1BG"));
        assert_eq!(lookup_symbol(&dictionary, KeyType::EntrezId, 1u64).as_deref(), Some("A1BG"));
    }

    #[test]
    fn test_canonical_symbol_beats_earlier_alias() {
        let rows = [
            GeneRow::new("GENEA", Some(10)).with_aliases(["GENEB", "SHARED"]),
            GeneRow::new("GENEB", Some(20)),
            GeneRow::new("GENEC", Some(30)).with_aliases(["SHARED"]),
        ];
        let (dictionary, stats) = DictionaryBuilder::default().build(&rows);

        assert_eq!(lookup_symbol(&dictionary, KeyType::Symbol, "GENEB").as_deref(), Some("GENEB"));
        // Neither row owns SHARED canonically: the first mention keeps it
        assert_eq!(lookup_symbol(&dictionary, KeyType::Symbol, "SHARED").as_deref(), Some("GENEA"));
        assert_eq!(stats.canonical_overrides, 1);
        assert_eq!(stats.shadowed_aliases, 1);
    }

    #[test]
    fn test_repeated_alias_within_a_row_is_not_shadowed() {
        let rows = [
            GeneRow::new("KRAS", Some(3845))
                .with_aliases(["KRAS2", "KRAS2", "K-RAS"])
                .with_prev_symbols(["KRAS2"]),
            GeneRow::new("HRAS", Some(3265)).with_aliases(["K-RAS"]),
        ];
        let (dictionary, stats) =
            DictionaryBuilder::new(BuildConfig::new([KeyType::AliasSymbol])).build(&rows);

        assert_eq!(lookup_symbol(&dictionary, KeyType::AliasSymbol, "KRAS2").as_deref(), Some("KRAS"));
        // HRAS's K-RAS loses in both the symbol and alias_symbol tables
        assert_eq!(stats.shadowed_aliases, 2);
    }

    #[test]
    fn test_canonical_symbol_is_not_displaced_by_later_alias() {
        let rows = [
            GeneRow::new("GENEB", Some(20)),
            GeneRow::new("GENEA", Some(10)).with_aliases(["GENEB"]),
        ];
        let (dictionary, _) = DictionaryBuilder::default().build(&rows);
        assert_eq!(lookup_symbol(&dictionary, KeyType::Symbol, "GENEB").as_deref(), Some("GENEB"));
    }

    #[test]
    fn test_prev_symbols_are_aliases() {
        let row = GeneRow::new("KRAS", Some(3845))
            .with_aliases(["K-RAS"])
            .with_prev_symbols(["KRAS2"]);
        let (dictionary, _) = DictionaryBuilder::default().build(&[row]);

        assert_eq!(lookup_symbol(&dictionary, KeyType::Symbol, "KRAS2").as_deref(), Some("KRAS"));
        let record = dictionary.get(KeyType::Symbol, &"KRAS".into()).unwrap().unwrap();
        assert_eq!(record.aliases.len(), 3);
    }

    #[test]
    fn test_rows_without_entrez_are_skipped_for_entrez_table_only() {
        let rows = [
            GeneRow::new("LOC_NO_ID", None),
            GeneRow::new("TP53", Some(7157)),
        ];
        let (dictionary, stats) = DictionaryBuilder::default().build(&rows);

        assert_eq!(stats.table_sizes[&KeyType::EntrezId], 1);
        let record = dictionary.get(KeyType::Symbol, &"LOC_NO_ID".into()).unwrap().unwrap();
        assert_eq!(record.value(KeyType::EntrezId), None);
    }

    #[test]
    fn test_optional_key_types() {
        let mut row = GeneRow::new("TP53", Some(7157)).with_aliases(["P53", "LFS1"]);
        row.uniprot = Some("P04637".into());
        row.ensembl_gene_id = Some("ENSG00000141510".into());
        let mut other = GeneRow::new("TP53BP1", Some(7158)).with_aliases(["P53"]);
        other.uniprot = None;

        let config = BuildConfig::new([KeyType::AliasSymbol, KeyType::Uniprot, KeyType::EnsemblGeneId]);
        let (dictionary, stats) = DictionaryBuilder::new(config).build(&[row, other]);

        assert_eq!(dictionary.key_types().count(), 5);
        assert_eq!(lookup_symbol(&dictionary, KeyType::AliasSymbol, "P53").as_deref(), Some("TP53"));
        assert!(dictionary.get(KeyType::AliasSymbol, &"TP53".into()).unwrap().is_none());
        assert_eq!(lookup_symbol(&dictionary, KeyType::Uniprot, "P04637").as_deref(), Some("TP53"));
        assert_eq!(
            dictionary
                .get(KeyType::EnsemblGeneId, &"ENSG00000141510".into())
                .unwrap()
                .and_then(|r| r.value(KeyType::EntrezId)),
            Some(GeneValue::Id(7157))
        );
        assert_eq!(stats.table_sizes[&KeyType::Uniprot], 1);
    }

    #[test]
    fn test_effective_key_types_always_include_required() {
        let config = BuildConfig::new([KeyType::Uniprot, KeyType::Uniprot]);
        assert_eq!(
            config.effective_key_types(),
            vec![KeyType::Symbol, KeyType::EntrezId, KeyType::Uniprot]
        );
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<GeneRow>> {
        prop::collection::vec(prop::collection::vec(0usize..40, 0..4), 1..30).prop_map(|alias_picks| {
            alias_picks
                .into_iter()
                .enumerate()
                .map(|(i, picks)| {
                    GeneRow::new(format!("G{i}"), Some(i as u64 + 1))
                        .with_aliases(picks.into_iter().map(|p| format!("G{p}")))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_symbol_is_member_of_aliases(rows in rows_strategy()) {
            let (dictionary, _) = DictionaryBuilder::default().build(&rows);
            for record in dictionary.records() {
                prop_assert!(record.aliases.contains(&record.symbol));
            }
        }

        #[test]
        fn prop_canonical_symbol_resolves_to_own_record(rows in rows_strategy()) {
            let (dictionary, _) = DictionaryBuilder::default().build(&rows);
            for row in &rows {
                let record = dictionary.get(KeyType::Symbol, &row.symbol.as_str().into()).unwrap().unwrap();
                prop_assert_eq!(record.entrez_id, row.entrez_id);
                let back = dictionary.get(KeyType::EntrezId, &QueryValue::Id(row.entrez_id.unwrap())).unwrap().unwrap();
                prop_assert_eq!(&back.symbol, &row.symbol);
            }
        }
    }
}
