//! Query translation between identifier namespaces
//!
//! Each query is run through [`RESOLUTION_ORDER`] until a strategy claims it:
//!
//! 1. [`Strategy::Direct`]: exact key in the query-type table
//! 2. [`Strategy::UpperCase`], [`Strategy::LowerCase`]: case-folded retries,
//!    symbol-like key types only
//! 3. [`Strategy::RetiredToCurrent`]: the query is a retired identifier merged
//!    into a gene that is still in the dictionary
//! 4. [`Strategy::RetiredPeer`]: the query is a retired identifier of a dropped
//!    gene, answered from the ledger row itself
//! 5. [`Strategy::CurrentPredecessor`]: Entrez queries only, the first retired
//!    identifier recorded against that ID
//!
//! A strategy that finds a gene lacking the requested field still claims the
//! query; that outcome is reported as a missing translation, not as not found.

use crate::history::HistoricalIndex;
use crate::model::{Dictionary, GeneRecord, GeneValue, KeyType, QueryValue};
use genemap_common::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// One step of the resolution chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Direct,
    UpperCase,
    LowerCase,
    RetiredToCurrent,
    RetiredPeer,
    CurrentPredecessor,
}

pub const RESOLUTION_ORDER: [Strategy; 6] = [
    Strategy::Direct,
    Strategy::UpperCase,
    Strategy::LowerCase,
    Strategy::RetiredToCurrent,
    Strategy::RetiredPeer,
    Strategy::CurrentPredecessor,
];

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::UpperCase => "upper_case",
            Strategy::LowerCase => "lower_case",
            Strategy::RetiredToCurrent => "retired_to_current",
            Strategy::RetiredPeer => "retired_peer",
            Strategy::CurrentPredecessor => "current_predecessor",
        }
    }

    /// Run this single strategy. `None` means it did not apply to `query`.
    pub fn attempt(
        self,
        dictionary: &Dictionary,
        history: &HistoricalIndex,
        query: &QueryValue,
        query_type: KeyType,
        return_type: KeyType,
    ) -> Option<Resolution> {
        let claim = |record: &GeneRecord| Resolution::from_record(record, return_type, self);

        match self {
            Strategy::Direct => dictionary.get(query_type, query).ok().flatten().map(claim),
            Strategy::UpperCase | Strategy::LowerCase => {
                if !query_type.is_case_folded() {
                    return None;
                }
                let text = query.as_text()?;
                let folded = if self == Strategy::UpperCase {
                    text.to_uppercase()
                } else {
                    text.to_lowercase()
                };
                if folded == text {
                    return None;
                }
                dictionary
                    .get(query_type, &QueryValue::Text(folded))
                    .ok()
                    .flatten()
                    .map(claim)
            }
            Strategy::RetiredToCurrent => {
                let current = history.retired(query_type, query)?.current()?;
                dictionary
                    .get(KeyType::EntrezId, &QueryValue::Id(current))
                    .ok()
                    .flatten()
                    .map(claim)
            }
            Strategy::RetiredPeer => history
                .retired(query_type, query)?
                .peer(return_type)
                .map(|value| Resolution::Translated {
                    value,
                    strategy: self,
                }),
            Strategy::CurrentPredecessor => {
                if query_type != KeyType::EntrezId {
                    return None;
                }
                history
                    .predecessors(query.as_id()?)?
                    .first(return_type)
                    .map(|value| Resolution::Translated {
                        value,
                        strategy: self,
                    })
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single query ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Translated { value: GeneValue, strategy: Strategy },
    /// A gene was found but has no value for the requested field
    MissingField { strategy: Strategy },
    NotFound,
}

impl Resolution {
    fn from_record(record: &GeneRecord, return_type: KeyType, strategy: Strategy) -> Self {
        match record.value(return_type) {
            Some(value) => Resolution::Translated { value, strategy },
            None => Resolution::MissingField { strategy },
        }
    }

    pub fn value(&self) -> Option<&GeneValue> {
        match self {
            Resolution::Translated { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<GeneValue> {
        match self {
            Resolution::Translated { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            Resolution::Translated { strategy, .. } | Resolution::MissingField { strategy } => {
                Some(*strategy)
            }
            Resolution::NotFound => None,
        }
    }
}

/// Queries that could not be translated, by reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationReport {
    /// No gene found by any strategy
    pub not_found: Vec<QueryValue>,
    /// Gene found, requested field absent
    pub missing_translation: Vec<QueryValue>,
}

impl TranslationReport {
    pub fn is_clean(&self) -> bool {
        self.not_found.is_empty() && self.missing_translation.is_empty()
    }

    fn record(&mut self, query: &QueryValue, resolution: &Resolution) {
        match resolution {
            Resolution::NotFound => self.not_found.push(query.clone()),
            Resolution::MissingField { .. } => self.missing_translation.push(query.clone()),
            Resolution::Translated { .. } => {}
        }
    }

    fn log(&self) {
        if !self.not_found.is_empty() {
            warn!(
                count = self.not_found.len(),
                queries = %join(&self.not_found),
                "{} genes were not found",
                self.not_found.len()
            );
        }
        if !self.missing_translation.is_empty() {
            warn!(
                count = self.missing_translation.len(),
                queries = %join(&self.missing_translation),
                "{} translations are missing",
                self.missing_translation.len()
            );
        }
    }
}

fn join(values: &[QueryValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Results of a bulk translation, in input order with duplicates collapsed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub results: IndexMap<QueryValue, Option<GeneValue>>,
    pub report: TranslationReport,
}

impl Translation {
    pub fn get(&self, query: impl Into<QueryValue>) -> Option<&GeneValue> {
        self.results.get(&query.into()).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Read-only translation context over a dictionary and its history
///
/// Build one at startup and share it by reference (or behind an `Arc`);
/// nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct Translator {
    dictionary: Dictionary,
    history: HistoricalIndex,
    verbose: bool,
}

impl Translator {
    pub fn new(dictionary: Dictionary, history: HistoricalIndex) -> Self {
        Self {
            dictionary,
            history,
            verbose: true,
        }
    }

    /// Turn the warn-level summary of unresolved queries on or off
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn history(&self) -> &HistoricalIndex {
        &self.history
    }

    /// Resolve one query, reporting which strategy answered it
    pub fn resolve(
        &self,
        query: &QueryValue,
        query_type: KeyType,
        return_type: KeyType,
    ) -> Result<Resolution> {
        self.check_types(query_type, return_type)?;
        Ok(self.resolve_unchecked(query, query_type, return_type))
    }

    /// Translate every query from `query_type` to `return_type`
    ///
    /// Fails only when either type is not configured in the dictionary.
    /// Unresolved queries map to `None` and are listed in the report.
    pub fn translate<I, Q>(&self, queries: I, query_type: KeyType, return_type: KeyType) -> Result<Translation>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QueryValue>,
    {
        self.check_types(query_type, return_type)?;

        let mut translation = Translation::default();
        for query in queries {
            let query = query.into().normalized(query_type);
            if translation.results.contains_key(&query) {
                continue;
            }
            let resolution = self.resolve_unchecked(&query, query_type, return_type);
            translation.report.record(&query, &resolution);
            translation.results.insert(query, resolution.into_value());
        }

        debug!(
            queries = translation.len(),
            from = %query_type,
            to = %return_type,
            not_found = translation.report.not_found.len(),
            missing = translation.report.missing_translation.len(),
            "translated"
        );
        if self.verbose {
            translation.report.log();
        }
        Ok(translation)
    }

    /// Translate a single value, returning the bare result
    pub fn translate_one(
        &self,
        query: impl Into<QueryValue>,
        query_type: KeyType,
        return_type: KeyType,
    ) -> Result<Option<GeneValue>> {
        let translation = self.translate(std::iter::once(query.into()), query_type, return_type)?;
        Ok(translation.results.into_values().next().flatten())
    }

    fn check_types(&self, query_type: KeyType, return_type: KeyType) -> Result<()> {
        self.dictionary.ensure_key_type(query_type)?;
        self.dictionary.ensure_key_type(return_type)
    }

    fn resolve_unchecked(&self, query: &QueryValue, query_type: KeyType, return_type: KeyType) -> Resolution {
        RESOLUTION_ORDER
            .iter()
            .find_map(|strategy| {
                strategy.attempt(&self.dictionary, &self.history, query, query_type, return_type)
            })
            .unwrap_or(Resolution::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::builder::{BuildConfig, DictionaryBuilder, GeneRow};
    use crate::history::HistoryRow;

    fn fixture() -> Translator {
        let rows = vec![
            GeneRow::new("A1BG", Some(1)).with_aliases(["A1B", "ABG", "GAB"]),
            GeneRow::new("AAA1", Some(23)).with_aliases(["ABCF1"]),
            GeneRow::new("BRCA1", Some(672)).with_aliases(["RNF53"]),
            GeneRow::new("ABCF1", Some(24)),
            GeneRow::new("C4orf36", Some(132989)),
            GeneRow::new("NOID1", None),
        ];
        let (dictionary, _) =
            DictionaryBuilder::new(BuildConfig::new([KeyType::AliasSymbol])).build(&rows);
        let history = HistoricalIndex::from_rows([
            HistoryRow::new(Some(672), 999, "BRCC1"),
            HistoryRow::new(None, 4, "A12M1"),
            HistoryRow::new(Some(555_555), 777, "GHOST"),
            HistoryRow::new(Some(888_888), 10, "PREDX"),
        ]);
        Translator::new(dictionary, history).with_verbosity(false)
    }

    #[test]
    fn test_translate_entrez_to_symbol() {
        let translator = fixture();
        let translation = translator
            .translate([23u64, 1], KeyType::EntrezId, KeyType::Symbol)
            .unwrap();

        assert_eq!(translation.get(23u64), Some(&GeneValue::Text("AAA1".into())));
        assert_eq!(translation.get(1u64), Some(&GeneValue::Text("A1BG".into())));
        assert!(translation.report.is_clean());
    }

    #[test]
    fn test_round_trip_symbol_entrez_symbol() {
        let translator = fixture();
        for symbol in ["A1BG", "AAA1", "BRCA1", "ABCF1", "C4orf36"] {
            let id = translator
                .translate_one(symbol, KeyType::Symbol, KeyType::EntrezId)
                .unwrap()
                .unwrap();
            let back = translator
                .translate_one(&id, KeyType::EntrezId, KeyType::Symbol)
                .unwrap();
            assert_eq!(back, Some(GeneValue::Text(symbol.into())));
        }
    }

    #[test]
    fn test_canonical_owner_wins_over_alias() {
        let translator = fixture();
        assert_eq!(
            translator.translate_one("ABCF1", KeyType::Symbol, KeyType::EntrezId).unwrap(),
            Some(GeneValue::Id(24))
        );
        // Through the alias-only table the earlier mention still owns it
        assert_eq!(
            translator.translate_one("ABCF1", KeyType::AliasSymbol, KeyType::EntrezId).unwrap(),
            Some(GeneValue::Id(23))
        );
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let translator = fixture();
        let upper = translator.translate_one("BRCA1", KeyType::Symbol, KeyType::EntrezId).unwrap();
        let lower = translator.translate_one("brca1", KeyType::Symbol, KeyType::EntrezId).unwrap();
        assert_eq!(upper, lower);

        let resolution = translator
            .resolve(&"c4ORF36".into(), KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        // Neither full upper nor lower case matches a mixed-case symbol
        assert_eq!(resolution, Resolution::NotFound);

        let resolution = translator
            .resolve(&"rnf53".into(), KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        assert_eq!(resolution.strategy(), Some(Strategy::UpperCase));
    }

    #[test]
    fn test_case_folding_never_applies_to_entrez() {
        let translator = fixture();
        assert_eq!(
            Strategy::UpperCase.attempt(
                translator.dictionary(),
                translator.history(),
                &"23".into(),
                KeyType::EntrezId,
                KeyType::Symbol
            ),
            None
        );
    }

    #[test]
    fn test_retired_entrez_resolves_to_current_record() {
        let translator = fixture();
        let resolution = translator
            .resolve(&QueryValue::Id(999), KeyType::EntrezId, KeyType::Symbol)
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Translated {
                value: GeneValue::Text("BRCA1".into()),
                strategy: Strategy::RetiredToCurrent,
            }
        );
        assert_eq!(
            translator.translate_one("BRCC1", KeyType::Symbol, KeyType::EntrezId).unwrap(),
            Some(GeneValue::Id(672))
        );
    }

    #[test]
    fn test_dropped_gene_resolves_to_peer() {
        let translator = fixture();
        let resolution = translator
            .resolve(&QueryValue::Id(4), KeyType::EntrezId, KeyType::Symbol)
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Translated {
                value: GeneValue::Text("A12M1".into()),
                strategy: Strategy::RetiredPeer,
            }
        );
        assert_eq!(
            translator.translate_one("A12M1", KeyType::Symbol, KeyType::EntrezId).unwrap(),
            Some(GeneValue::Id(4))
        );
    }

    #[test]
    fn test_merged_into_unknown_gene_is_not_found() {
        let translator = fixture();
        let translation = translator
            .translate([777u64], KeyType::EntrezId, KeyType::Symbol)
            .unwrap();
        assert_eq!(translation.results[&QueryValue::Id(777)], None);
        assert_eq!(translation.report.not_found, vec![QueryValue::Id(777)]);
    }

    #[test]
    fn test_current_id_outside_dictionary_falls_back_to_predecessor() {
        let translator = fixture();
        let resolution = translator
            .resolve(&QueryValue::Id(888_888), KeyType::EntrezId, KeyType::Symbol)
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Translated {
                value: GeneValue::Text("PREDX".into()),
                strategy: Strategy::CurrentPredecessor,
            }
        );
    }

    #[test]
    fn test_unresolvable_query_is_reported_not_raised() {
        let translator = fixture();
        let translation = translator
            .translate([999_999_999u64], KeyType::EntrezId, KeyType::Symbol)
            .unwrap();
        assert_eq!(translation.len(), 1);
        assert_eq!(translation.results[&QueryValue::Id(999_999_999)], None);
        assert_eq!(translation.report.not_found.len(), 1);
        assert!(translation.report.missing_translation.is_empty());
    }

    #[test]
    fn test_missing_field_is_reported_separately() {
        let translator = fixture();
        let translation = translator
            .translate(["NOID1", "NOPE"], KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        assert_eq!(translation.report.missing_translation, vec![QueryValue::from("NOID1")]);
        assert_eq!(translation.report.not_found, vec![QueryValue::from("NOPE")]);
        assert_eq!(translation.len(), 2);
    }

    #[test]
    fn test_single_scalar_returns_bare_value() {
        let translator = fixture();
        assert_eq!(
            translator.translate_one(23u64, KeyType::EntrezId, KeyType::Symbol).unwrap(),
            Some(GeneValue::Text("AAA1".into()))
        );
        assert_eq!(
            translator.translate_one(123_456_789u64, KeyType::EntrezId, KeyType::Symbol).unwrap(),
            None
        );
    }

    #[test]
    fn test_textual_entrez_query_is_parsed() {
        let translator = fixture();
        assert_eq!(
            translator.translate_one("672", KeyType::EntrezId, KeyType::Symbol).unwrap(),
            Some(GeneValue::Text("BRCA1".into()))
        );
    }

    #[test]
    fn test_textual_and_numeric_entrez_queries_are_one_key() {
        let translator = fixture();
        let translation = translator
            .translate(
                [QueryValue::from("23"), QueryValue::Id(23), QueryValue::from(" 23 ")],
                KeyType::EntrezId,
                KeyType::Symbol,
            )
            .unwrap();
        assert_eq!(translation.len(), 1);
        assert_eq!(translation.get(23u64), Some(&GeneValue::Text("AAA1".into())));
    }

    #[test]
    fn test_lower_case_fallback_reaches_lower_case_symbol() {
        let (dictionary, _) = DictionaryBuilder::default().build(&[GeneRow::new("mir-x", Some(50))]);
        let translator = Translator::new(dictionary, HistoricalIndex::default()).with_verbosity(false);

        let resolution = translator
            .resolve(&"MIR-X".into(), KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Translated {
                value: GeneValue::Id(50),
                strategy: Strategy::LowerCase,
            }
        );
    }

    #[test]
    fn test_historical_hit_without_field_is_missing_translation() {
        let mut tp53 = GeneRow::new("TP53", Some(7157));
        tp53.uniprot = Some("P04637".into());
        let rows = [GeneRow::new("BRCA1", Some(672)), tp53];
        let (dictionary, _) = DictionaryBuilder::new(BuildConfig::new([KeyType::Uniprot])).build(&rows);
        let history = HistoricalIndex::from_rows([HistoryRow::new(Some(672), 999, "BRCC1")]);
        let translator = Translator::new(dictionary, history).with_verbosity(false);

        let resolution = translator
            .resolve(&QueryValue::Id(999), KeyType::EntrezId, KeyType::Uniprot)
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::MissingField {
                strategy: Strategy::RetiredToCurrent
            }
        );

        let translation = translator
            .translate([999u64], KeyType::EntrezId, KeyType::Uniprot)
            .unwrap();
        assert_eq!(translation.get(999u64), None);
        assert_eq!(translation.report.missing_translation, vec![QueryValue::Id(999)]);
        assert!(translation.report.not_found.is_empty());
    }

    #[test]
    fn test_duplicates_collapse_and_order_is_kept() {
        let translator = fixture();
        let translation = translator
            .translate(["BRCA1", "A1BG", "BRCA1"], KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        let keys: Vec<_> = translation.results.keys().cloned().collect();
        assert_eq!(keys, vec![QueryValue::from("BRCA1"), QueryValue::from("A1BG")]);
    }

    #[test]
    fn test_unconfigured_key_type_fails_fast() {
        let translator = fixture();
        let err = translator
            .translate(["BRCA1"], KeyType::Symbol, KeyType::Uniprot)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(translator
            .translate_one("P38398", KeyType::Uniprot, KeyType::Symbol)
            .is_err());
    }

    #[test]
    fn test_direct_match_precedes_history() {
        // A live gene whose symbol also appears as a retired symbol elsewhere
        let (dictionary, _) = DictionaryBuilder::default().build(&[GeneRow::new("GHOST", Some(42))]);
        let history = HistoricalIndex::from_rows([HistoryRow::new(Some(43), 41, "GHOST")]);
        let translator = Translator::new(dictionary, history).with_verbosity(false);

        let resolution = translator
            .resolve(&"GHOST".into(), KeyType::Symbol, KeyType::EntrezId)
            .unwrap();
        assert_eq!(resolution.strategy(), Some(Strategy::Direct));
        assert_eq!(resolution.value(), Some(&GeneValue::Id(42)));
    }
}
