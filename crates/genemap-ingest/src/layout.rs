//! Column layouts of supported gene tables

use genemap_common::GenemapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maps the fields the dictionary needs onto a gene table's column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    pub name: String,
    pub symbol: String,
    pub entrez_id: String,
    pub alias_symbol: String,
    pub prev_symbol: Option<String>,
    pub uniprot: Option<String>,
    pub ensembl_gene_id: Option<String>,
    /// Cross-reference column (`Ensembl:ENSG...|MIM:...`) to mine for an
    /// Ensembl ID when there is no dedicated column
    pub db_xrefs: Option<String>,
    /// Whether cells may be double-quoted
    pub quoted: bool,
}

impl SourceLayout {
    /// NCBI `<Organism>.gene_info`
    pub fn ncbi_gene_info() -> Self {
        Self {
            name: "ncbi_gene_info".to_string(),
            symbol: "Symbol".to_string(),
            entrez_id: "GeneID".to_string(),
            alias_symbol: "Synonyms".to_string(),
            prev_symbol: None,
            uniprot: None,
            ensembl_gene_id: None,
            db_xrefs: Some("dbXrefs".to_string()),
            quoted: false,
        }
    }

    /// HGNC `hgnc_complete_set.txt`
    pub fn hgnc_complete_set() -> Self {
        Self {
            name: "hgnc_complete_set".to_string(),
            symbol: "symbol".to_string(),
            entrez_id: "entrez_id".to_string(),
            alias_symbol: "alias_symbol".to_string(),
            prev_symbol: Some("prev_symbol".to_string()),
            uniprot: Some("uniprot_ids".to_string()),
            ensembl_gene_id: Some("ensembl_gene_id".to_string()),
            db_xrefs: None,
            quoted: true,
        }
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self::ncbi_gene_info()
    }
}

impl std::str::FromStr for SourceLayout {
    type Err = GenemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ncbi" | "ncbi_gene_info" | "gene_info" => Ok(Self::ncbi_gene_info()),
            "hgnc" | "hgnc_complete_set" => Ok(Self::hgnc_complete_set()),
            _ => Err(GenemapError::config(format!(
                "unknown gene table layout '{s}' (expected 'ncbi' or 'hgnc')"
            ))),
        }
    }
}

impl fmt::Display for SourceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_str() {
        assert_eq!("ncbi".parse::<SourceLayout>().unwrap(), SourceLayout::ncbi_gene_info());
        assert_eq!("HGNC".parse::<SourceLayout>().unwrap().name, "hgnc_complete_set");
        assert!("ensembl".parse::<SourceLayout>().is_err());
    }
}
