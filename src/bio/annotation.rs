use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by KEGG orthology ids in EggNOG output
pub const KEGG_PREFIX: &str = "ko:";

/// Kind of functional term a record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TermType {
    Go,
    Kegg,
    Pathway,
    Pfam,
}

impl TermType {
    /// Column name used in per-term and per-gene tables
    pub fn label(&self) -> &'static str {
        match self {
            TermType::Go => "GO",
            TermType::Kegg => "KEGG",
            TermType::Pathway => "Pathway",
            TermType::Pfam => "PFAM",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "gos" => Some(TermType::Go),
            "kegg" | "kegg_ko" => Some(TermType::Kegg),
            "pathway" | "pathways" | "kegg_pathway" => Some(TermType::Pathway),
            "pfam" | "pfams" => Some(TermType::Pfam),
            _ => None,
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annotation tool that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceTool {
    KofamScan,
    InterProScan,
    EggnogV5,
    EggnogV7,
    Fantasia,
}

impl SourceTool {
    /// Tag used in output file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            SourceTool::KofamScan => "kofamscan",
            SourceTool::InterProScan => "interproscan",
            SourceTool::EggnogV5 => "eggnog_v5",
            SourceTool::EggnogV7 => "eggnog_v7",
            SourceTool::Fantasia => "fantasia",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SourceTool::KofamScan => "KofamScan",
            SourceTool::InterProScan => "InterProScan",
            SourceTool::EggnogV5 => "EggNOG v5",
            SourceTool::EggnogV7 => "EggNOG v7",
            SourceTool::Fantasia => "FANTASIA",
        }
    }

    /// Term columns of this tool's per-gene table
    pub fn term_types(&self) -> &'static [TermType] {
        match self {
            SourceTool::KofamScan => &[TermType::Kegg],
            SourceTool::InterProScan => &[TermType::Go, TermType::Pathway],
            SourceTool::EggnogV5 => &[TermType::Go, TermType::Kegg, TermType::Pathway, TermType::Pfam],
            SourceTool::EggnogV7 => &[TermType::Go, TermType::Kegg],
            SourceTool::Fantasia => &[TermType::Go],
        }
    }

    /// FANTASIA keeps repeated GO ids per gene; every other tool merges them.
    pub fn is_list_like(&self) -> bool {
        matches!(self, SourceTool::Fantasia)
    }
}

impl fmt::Display for SourceTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One functional term assigned to one gene by one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    pub gene_id: String,
    pub term_id: String,
    pub term_type: TermType,
    pub score: Option<f64>,
    pub source: SourceTool,
    /// FANTASIA model suffix the record was selected for
    pub model: Option<String>,
}

impl TermRecord {
    /// Build a record, returning `None` for blank or placeholder values.
    pub fn new(gene_id: &str, term_id: &str, term_type: TermType, source: SourceTool) -> Option<Self> {
        let gene_id = clean_value(gene_id)?;
        let mut term_id = clean_value(term_id)?;
        if term_type == TermType::Kegg {
            term_id = clean_value(strip_kegg_prefix(term_id))?;
        }

        Some(Self {
            gene_id: gene_id.to_string(),
            term_id: term_id.to_string(),
            term_type,
            score: None,
            source,
            model: None,
        })
    }

    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}

/// Trimmed value, or `None` when blank or the `-` placeholder
pub fn clean_value(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

/// Strip leading `ko:` prefixes from a KEGG id. Applying it twice changes nothing.
pub fn strip_kegg_prefix(term: &str) -> &str {
    let mut term = term.trim();
    while let Some(rest) = term.strip_prefix(KEGG_PREFIX) {
        term = rest.trim();
    }
    term
}

/// Coerce a cell to a number, treating blanks and garbage as missing
pub fn parse_score(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}
