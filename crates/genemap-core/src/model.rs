//! Gene records, key types and the lookup dictionary

use genemap_common::{GenemapError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identifier namespace a lookup table is keyed by, and a record field a
/// translation can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// Canonical symbol, plus every alias and previous symbol of the gene
    Symbol,
    EntrezId,
    /// Alternate and previous symbols only
    AliasSymbol,
    Uniprot,
    EnsemblGeneId,
}

impl KeyType {
    pub const ALL: [KeyType; 5] = [
        KeyType::Symbol,
        KeyType::EntrezId,
        KeyType::AliasSymbol,
        KeyType::Uniprot,
        KeyType::EnsemblGeneId,
    ];

    /// Key types every dictionary is built with
    pub const REQUIRED: [KeyType; 2] = [KeyType::Symbol, KeyType::EntrezId];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Symbol => "symbol",
            KeyType::EntrezId => "entrez_id",
            KeyType::AliasSymbol => "alias_symbol",
            KeyType::Uniprot => "uniprot",
            KeyType::EnsemblGeneId => "ensembl_gene_id",
        }
    }

    /// Keys of this type are integers
    pub fn is_numeric(self) -> bool {
        matches!(self, KeyType::EntrezId)
    }

    /// Lookups of this type retry with upper- and lower-cased input
    pub fn is_case_folded(self) -> bool {
        matches!(self, KeyType::Symbol | KeyType::AliasSymbol)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyType {
    type Err = GenemapError;

    fn from_str(s: &str) -> Result<Self> {
        KeyType::ALL
            .into_iter()
            .find(|kt| kt.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenemapError::UnknownKeyType(s.to_string()))
    }
}

/// A single query value as handed to the translator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Id(u64),
    Text(String),
}

impl QueryValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            QueryValue::Id(_) => None,
        }
    }

    /// Integer form of the query, parsing text for numeric key types
    pub fn as_id(&self) -> Option<u64> {
        match self {
            QueryValue::Id(id) => Some(*id),
            QueryValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical form under `key_type`: numeric text becomes [`QueryValue::Id`]
    /// for numeric key types, so `"23"` and `23` name the same query.
    pub fn normalized(self, key_type: KeyType) -> QueryValue {
        match self.as_id() {
            Some(id) if key_type.is_numeric() => QueryValue::Id(id),
            _ => self,
        }
    }

    /// The table key this query addresses under `key_type`, if it can name one
    pub(crate) fn lookup_key(&self, key_type: KeyType) -> Option<Cow<'_, str>> {
        if key_type.is_numeric() {
            return self.as_id().map(|id| Cow::Owned(id.to_string()));
        }
        match self {
            QueryValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            QueryValue::Id(id) => Some(Cow::Owned(id.to_string())),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Id(id) => write!(f, "{id}"),
            QueryValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Text(value.clone())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::Id(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Id(u64::from(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        u64::try_from(value)
            .map(QueryValue::Id)
            .unwrap_or_else(|_| QueryValue::Text(value.to_string()))
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::from(i64::from(value))
    }
}

impl From<&GeneValue> for QueryValue {
    fn from(value: &GeneValue) -> Self {
        match value {
            GeneValue::Id(id) => QueryValue::Id(*id),
            other => QueryValue::Text(other.to_string()),
        }
    }
}

/// A field value read off a [`GeneRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneValue {
    Id(u64),
    Text(String),
    List(Vec<String>),
}

impl GeneValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GeneValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            GeneValue::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for GeneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneValue::Id(id) => write!(f, "{id}"),
            GeneValue::Text(s) => f.write_str(s),
            GeneValue::List(items) => f.write_str(&items.join("|")),
        }
    }
}

/// One canonical gene. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub entrez_id: Option<u64>,
    pub symbol: String,
    /// Canonical symbol plus every alternate and previous symbol
    pub aliases: BTreeSet<String>,
    pub uniprot: Option<String>,
    pub ensembl_gene_id: Option<String>,
}

impl GeneRecord {
    pub fn new<I, S>(entrez_id: Option<u64>, symbol: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbol = symbol.into();
        let mut aliases: BTreeSet<String> = aliases.into_iter().map(Into::into).collect();
        aliases.insert(symbol.clone());
        Self {
            entrez_id,
            symbol,
            aliases,
            uniprot: None,
            ensembl_gene_id: None,
        }
    }

    pub fn with_uniprot(mut self, uniprot: Option<String>) -> Self {
        self.uniprot = uniprot;
        self
    }

    pub fn with_ensembl_gene_id(mut self, ensembl_gene_id: Option<String>) -> Self {
        self.ensembl_gene_id = ensembl_gene_id;
        self
    }

    /// The value this record holds for `field`, `None` if the gene has none
    pub fn value(&self, field: KeyType) -> Option<GeneValue> {
        match field {
            KeyType::Symbol => Some(GeneValue::Text(self.symbol.clone())),
            KeyType::EntrezId => self.entrez_id.map(GeneValue::Id),
            KeyType::AliasSymbol => Some(GeneValue::List(self.aliases.iter().cloned().collect())),
            KeyType::Uniprot => self.uniprot.clone().map(GeneValue::Text),
            KeyType::EnsemblGeneId => self.ensembl_gene_id.clone().map(GeneValue::Text),
        }
    }
}

/// Read-only view of one lookup table
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    key_type: KeyType,
    records: &'a [GeneRecord],
    entries: &'a HashMap<String, usize>,
}

impl<'a> Table<'a> {
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn get(&self, key: &str) -> Option<&'a GeneRecord> {
        self.entries.get(key).and_then(|&idx| self.records.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records stored once in an arena; every table maps its keys to arena
/// indices, so all names of a gene share one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    records: Vec<GeneRecord>,
    tables: BTreeMap<KeyType, HashMap<String, usize>>,
}

impl Dictionary {
    pub(crate) fn from_parts(
        records: Vec<GeneRecord>,
        tables: BTreeMap<KeyType, HashMap<String, usize>>,
    ) -> Self {
        Self { records, tables }
    }

    /// Key types this dictionary was built with, in a stable order
    pub fn key_types(&self) -> impl Iterator<Item = KeyType> + '_ {
        self.tables.keys().copied()
    }

    pub fn contains_key_type(&self, key_type: KeyType) -> bool {
        self.tables.contains_key(&key_type)
    }

    /// Fails with `KeyTypeNotConfigured` when the dictionary has no such table
    pub fn ensure_key_type(&self, key_type: KeyType) -> Result<()> {
        if self.contains_key_type(key_type) {
            Ok(())
        } else {
            Err(GenemapError::KeyTypeNotConfigured {
                key_type: key_type.to_string(),
                available: self
                    .key_types()
                    .map(KeyType::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }

    pub fn table(&self, key_type: KeyType) -> Result<Table<'_>> {
        self.ensure_key_type(key_type)?;
        let entries = self
            .tables
            .get(&key_type)
            .ok_or_else(|| GenemapError::UnknownKeyType(key_type.to_string()))?;
        Ok(Table {
            key_type,
            records: &self.records,
            entries,
        })
    }

    /// Look up `query` in the `key_type` table with no fallbacks
    pub fn get(&self, key_type: KeyType, query: &QueryValue) -> Result<Option<&GeneRecord>> {
        let table = self.table(key_type)?;
        Ok(query.lookup_key(key_type).and_then(|key| table.get(&key)))
    }

    pub fn records(&self) -> &[GeneRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_parse_and_display() {
        assert_eq!("entrez_id".parse::<KeyType>().unwrap(), KeyType::EntrezId);
        assert_eq!("Symbol".parse::<KeyType>().unwrap(), KeyType::Symbol);
        assert_eq!(KeyType::EnsemblGeneId.to_string(), "ensembl_gene_id");

        let err = "hgnc_id".parse::<KeyType>().unwrap_err();
        assert!(matches!(err, GenemapError::UnknownKeyType(ref s) if s == "hgnc_id"));
    }

    #[test]
    fn test_record_always_contains_symbol() {
        let record = GeneRecord::new(Some(672), "BRCA1", ["RNF53", "PPP1R53"]);
        assert!(record.aliases.contains("BRCA1"));
        assert_eq!(record.aliases.len(), 3);
    }

    #[test]
    fn test_record_value() {
        let record = GeneRecord::new(None, "MIR6859-1", Vec::<String>::new())
            .with_ensembl_gene_id(Some("ENSG00000278267".into()));

        assert_eq!(record.value(KeyType::EntrezId), None);
        assert_eq!(
            record.value(KeyType::Symbol),
            Some(GeneValue::Text("MIR6859-1".into()))
        );
        assert_eq!(
            record.value(KeyType::AliasSymbol),
            Some(GeneValue::List(vec!["MIR6859-1".into()]))
        );
        assert_eq!(record.value(KeyType::Uniprot), None);
    }

    #[test]
    fn test_query_value_conversions() {
        assert_eq!(QueryValue::from(23u64), QueryValue::Id(23));
        assert_eq!(QueryValue::from(-5i64), QueryValue::Text("-5".into()));
        assert_eq!(QueryValue::from(" 23 ").as_id(), Some(23));
        assert_eq!(QueryValue::from("BRCA1").as_id(), None);
        assert_eq!(
            QueryValue::from(" 23 ").lookup_key(KeyType::EntrezId).as_deref(),
            Some("23")
        );
        assert_eq!(QueryValue::from("brca1").lookup_key(KeyType::EntrezId), None);
    }

    #[test]
    fn test_unconfigured_table_is_an_error() {
        let dictionary = Dictionary::from_parts(
            vec![GeneRecord::new(Some(1), "A1BG", ["A1B"])],
            BTreeMap::from([(KeyType::Symbol, HashMap::from([("A1BG".to_string(), 0)]))]),
        );

        assert!(dictionary.table(KeyType::Symbol).is_ok());
        let err = dictionary.table(KeyType::Uniprot).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("available: symbol"));
    }
}
