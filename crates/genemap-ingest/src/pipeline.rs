//! Source tables to snapshot

use crate::gene_history::load_history;
use crate::gene_table::load_gene_table;
use crate::layout::SourceLayout;
use crate::source::display_name;
use genemap_common::Result;
use genemap_core::{
    BuildConfig, BuildStats, DictionaryBuilder, HistoricalIndex, KeyType, Snapshot, SourceInfo,
};
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub gene_info: PathBuf,
    pub history: PathBuf,
    pub layout: SourceLayout,
    pub taxon_id: Option<u32>,
    /// Optional key types on top of symbol and entrez_id
    pub key_types: Vec<KeyType>,
}

impl BuildRequest {
    pub fn new(gene_info: impl Into<PathBuf>, history: impl Into<PathBuf>) -> Self {
        Self {
            gene_info: gene_info.into(),
            history: history.into(),
            layout: SourceLayout::default(),
            taxon_id: None,
            key_types: Vec::new(),
        }
    }

    pub fn layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn taxon_id(mut self, taxon_id: Option<u32>) -> Self {
        self.taxon_id = taxon_id;
        self
    }

    pub fn key_types(mut self, key_types: impl IntoIterator<Item = KeyType>) -> Self {
        self.key_types = key_types.into_iter().collect();
        self
    }
}

/// Load both tables and assemble a snapshot ready to save
#[instrument(skip_all, fields(gene_info = %request.gene_info.display(), history = %request.history.display()))]
pub fn build_snapshot(request: &BuildRequest) -> Result<(Snapshot, BuildStats)> {
    let gene_rows = load_gene_table(&request.gene_info, &request.layout)?;
    let history_rows = load_history(&request.history, request.taxon_id)?;

    let builder = DictionaryBuilder::new(BuildConfig::new(request.key_types.iter().copied()));
    let (dictionary, stats) = builder.build(&gene_rows);
    let history_count = history_rows.len();
    let history = HistoricalIndex::from_rows(history_rows);

    let source = SourceInfo {
        gene_table: display_name(&request.gene_info),
        history_table: display_name(&request.history),
        layout: request.layout.name.clone(),
        taxon_id: request.taxon_id,
        gene_rows: gene_rows.len(),
        history_rows: history_count,
    };

    info!(
        records = dictionary.len(),
        retired_ids = history.retired_entrez_count(),
        retired_symbols = history.retired_symbol_count(),
        "dictionary assembled"
    );
    Ok((Snapshot::new(source, dictionary, history), stats))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use genemap_core::GeneValue;
    use tempfile::TempDir;

    #[test]
    fn test_build_snapshot_from_files() {
        let dir = TempDir::new().unwrap();
        let gene_info = dir.path().join("Homo_sapiens.gene_info");
        let history = dir.path().join("gene_history");
        std::fs::write(
            &gene_info,
            "#tax_id\tGeneID\tSymbol\tLocusTag\tSynonyms\tdbXrefs\n\
             9606\t672\tBRCA1\t-\tRNF53|BRCC1\tEnsembl:ENSG00000012048\n\
             9606\t1\tA1BG\t-\tA1B\t-\n",
        )
        .unwrap();
        std::fs::write(
            &history,
            "#tax_id\tGeneID\tDiscontinued_GeneID\tDiscontinued_Symbol\n\
             9606\t672\t999\tBRCAOLD\n\
             10090\t5\t6\tMouse1\n",
        )
        .unwrap();

        let request = BuildRequest::new(&gene_info, &history)
            .taxon_id(Some(9606))
            .key_types([KeyType::EnsemblGeneId]);
        let (snapshot, stats) = build_snapshot(&request).unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(snapshot.source.gene_table, "Homo_sapiens.gene_info");
        assert_eq!(snapshot.source.history_rows, 1);
        assert!(snapshot.dictionary.contains_key_type(KeyType::EnsemblGeneId));

        let translator = snapshot.into_translator().with_verbosity(false);
        assert_eq!(
            translator.translate_one(999u64, KeyType::EntrezId, KeyType::Symbol).unwrap(),
            Some(GeneValue::Text("BRCA1".into()))
        );
        assert_eq!(
            translator
                .translate_one("ENSG00000012048", KeyType::EnsemblGeneId, KeyType::EntrezId)
                .unwrap(),
            Some(GeneValue::Id(672))
        );
    }
}
