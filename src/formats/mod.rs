//! Readers for the raw output of each annotation tool.
//!
//! Every dialect turns one file into [`TermRecord`]s. Parsing never fails
//! past [`parse`]: missing files, rejected headers and read errors are logged
//! and reported through [`FileStatus`] alongside whatever was collected.

pub mod eggnog;
pub mod eggnog7;
pub mod fantasia;
pub mod interproscan;
pub mod kofamscan;

use crate::bio::annotation::{SourceTool, TermRecord};
use crate::utils::io::{open_gzip, open_text};
use indexmap::{IndexMap, IndexSet};
use std::io::{BufRead, ErrorKind};
use std::path::{Path, PathBuf};

pub use fantasia::FantasiaVariant;

/// Supported input dialects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialect {
    KofamScan,
    InterProScan,
    EggnogV5,
    EggnogV7,
    Fantasia {
        /// Column suffix of the model to select, e.g. `ESM_L0`
        model: Option<String>,
        variant: FantasiaVariant,
    },
}

impl Dialect {
    pub fn fantasia(model: Option<&str>) -> Self {
        Dialect::Fantasia {
            model: model.map(str::to_string),
            variant: FantasiaVariant::PerTerm,
        }
    }

    pub fn source(&self) -> SourceTool {
        match self {
            Dialect::KofamScan => SourceTool::KofamScan,
            Dialect::InterProScan => SourceTool::InterProScan,
            Dialect::EggnogV5 => SourceTool::EggnogV5,
            Dialect::EggnogV7 => SourceTool::EggnogV7,
            Dialect::Fantasia { .. } => SourceTool::Fantasia,
        }
    }

    fn model(&self) -> Option<&str> {
        match self {
            Dialect::Fantasia { model, .. } => model.as_deref(),
            _ => None,
        }
    }

    /// Parse already-opened text. Used by [`parse`] and handy for in-memory input.
    pub fn parse_reader<R: BufRead>(&self, reader: R, label: &str) -> ParseOutput {
        let mut output = ParseOutput::new(PathBuf::from(label), self.source(), self.model());
        let result = match self {
            Dialect::KofamScan => kofamscan::parse_reader(reader, &mut output),
            Dialect::InterProScan => interproscan::parse_reader(reader, &mut output),
            Dialect::EggnogV5 => eggnog::parse_reader(reader, &mut output),
            Dialect::EggnogV7 => eggnog7::parse_reader(reader, &mut output),
            Dialect::Fantasia { model, variant } => {
                fantasia::parse_reader(reader, model.as_deref(), *variant, &mut output)
            }
        };

        if let Err(e) = result {
            tracing::warn!(
                "Stopped reading {} after {} records: {}",
                label,
                output.records.len(),
                e
            );
            output.status = FileStatus::ReadError(e.to_string());
        }

        output
    }
}

/// How far parsing of one file got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Parsed,
    Missing,
    /// Header lacked required columns; the file was abandoned
    HeaderRejected { expected: Vec<String> },
    ReadError(String),
}

/// Everything one file yielded
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub path: PathBuf,
    pub source: SourceTool,
    pub model: Option<String>,
    pub records: Vec<TermRecord>,
    /// Every gene seen on a data row, annotated or not
    pub genes: IndexSet<String>,
    /// Descriptive per-gene fields that are not terms (EggNOG descriptions, ortholog ids)
    pub gene_metadata: IndexMap<String, IndexMap<String, String>>,
    pub skipped_rows: usize,
    pub status: FileStatus,
}

impl ParseOutput {
    pub fn new(path: PathBuf, source: SourceTool, model: Option<&str>) -> Self {
        Self {
            path,
            source,
            model: model.map(str::to_string),
            records: Vec::new(),
            genes: IndexSet::new(),
            gene_metadata: IndexMap::new(),
            skipped_rows: 0,
            status: FileStatus::Parsed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a gene and return it, ignoring blank ids
    pub(crate) fn see_gene<'a>(&mut self, gene: &'a str) -> Option<&'a str> {
        let gene = gene.trim();
        if gene.is_empty() {
            return None;
        }
        if !self.genes.contains(gene) {
            self.genes.insert(gene.to_string());
        }
        Some(gene)
    }

    pub(crate) fn push(&mut self, record: Option<TermRecord>) {
        if let Some(mut record) = record {
            if record.model.is_none() {
                record.model = self.model.clone();
            }
            self.records.push(record);
        }
    }

    pub(crate) fn set_metadata(&mut self, gene: &str, key: &str, value: &str) {
        if let Some(value) = crate::bio::annotation::clean_value(value) {
            self.gene_metadata
                .entry(gene.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
    }

    pub(crate) fn skip_row(&mut self) {
        self.skipped_rows += 1;
    }
}

/// Parse one annotation file.
///
/// Never returns an error: problems are logged and show up as a shorter
/// record list plus a non-[`FileStatus::Parsed`] status.
pub fn parse<P: AsRef<Path>>(path: P, dialect: &Dialect) -> ParseOutput {
    let path = path.as_ref();
    let label = path.display().to_string();

    let opened = match dialect {
        Dialect::EggnogV7 => open_gzip(path),
        _ => open_text(path),
    };

    let reader = match opened {
        Ok(reader) => reader,
        Err(e) => {
            let mut output = ParseOutput::new(path.to_path_buf(), dialect.source(), dialect.model());
            if e.kind() == ErrorKind::NotFound {
                tracing::warn!("File not found: {}", label);
                output.status = FileStatus::Missing;
            } else {
                tracing::warn!("Could not open {}: {}", label, e);
                output.status = FileStatus::ReadError(e.to_string());
            }
            return output;
        }
    };

    let mut output = dialect.parse_reader(reader, &label);
    output.path = path.to_path_buf();

    tracing::debug!(
        "Parsed {} ({}): {} records, {} genes, {} skipped rows",
        label,
        dialect.source(),
        output.records.len(),
        output.genes.len(),
        output.skipped_rows
    );

    output
}

/// Split a tab-delimited line without its terminator
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    crate::utils::io::chomp(line).split('\t').collect()
}

/// Value of the first listed column that is present and non-empty.
///
/// Mirrors the historical renames in tool output (`GOs` vs `GO_terms` ...).
pub(crate) fn lookup<'a>(row: &IndexMap<&str, &'a str>, candidates: &[&str]) -> &'a str {
    candidates
        .iter()
        .filter_map(|name| row.get(name).copied())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or("")
}
