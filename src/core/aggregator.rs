//! Per-gene grouping of term records.
//!
//! Set-like tools split every contributing cell on `,` and `|` and keep each
//! term once in first-seen order. FANTASIA is list-like: one cell per
//! (gene, model), terms kept as they came, duplicates included.

use crate::bio::annotation::{clean_value, strip_kegg_prefix, SourceTool, TermRecord, TermType};
use crate::formats::ParseOutput;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Separator used when a cell is rendered as text
pub const CELL_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerGeneRow {
    pub gene_id: String,
    pub model: Option<String>,
    pub source: SourceTool,
    pub cells: BTreeMap<TermType, Vec<String>>,
    pub metadata: IndexMap<String, String>,
}

impl PerGeneRow {
    fn new(gene_id: &str, model: Option<&str>, source: SourceTool) -> Self {
        Self {
            gene_id: gene_id.to_string(),
            model: model.map(str::to_string),
            source,
            cells: BTreeMap::new(),
            metadata: IndexMap::new(),
        }
    }

    pub fn terms(&self, term_type: TermType) -> &[String] {
        self.cells.get(&term_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn joined(&self, term_type: TermType) -> String {
        self.terms(term_type).join(CELL_SEPARATOR)
    }

    /// True when any of `types` has at least one term
    pub fn has_annotation(&self, types: &[TermType]) -> bool {
        types.iter().any(|t| !self.terms(*t).is_empty())
    }

    fn add(&mut self, record: &TermRecord) {
        let cell = self.cells.entry(record.term_type).or_default();
        if record.source.is_list_like() {
            cell.push(record.term_id.clone());
            return;
        }

        for part in record.term_id.split([',', '|']) {
            let Some(mut term) = clean_value(part) else {
                continue;
            };
            if record.term_type == TermType::Kegg {
                term = strip_kegg_prefix(term);
            }
            if !term.is_empty() && !cell.iter().any(|t| t == term) {
                cell.push(term.to_string());
            }
        }
    }
}

type RowKey = (String, Option<String>, SourceTool);

#[derive(Default)]
struct Accumulator {
    rows: BTreeMap<RowKey, PerGeneRow>,
}

impl Accumulator {
    fn row(&mut self, gene_id: &str, model: Option<&str>, source: SourceTool) -> &mut PerGeneRow {
        self.rows
            .entry((gene_id.to_string(), model.map(str::to_string), source))
            .or_insert_with(|| PerGeneRow::new(gene_id, model, source))
    }

    fn finish(self) -> Vec<PerGeneRow> {
        self.rows.into_values().collect()
    }
}

/// Group records into one row per (gene, model, tool), sorted by gene id.
pub fn aggregate(records: &[TermRecord]) -> Vec<PerGeneRow> {
    let mut acc = Accumulator::default();
    for record in records {
        acc.row(&record.gene_id, record.model.as_deref(), record.source)
            .add(record);
    }
    acc.finish()
}

/// Like [`aggregate`], but genes seen without terms get an empty row and
/// per-gene metadata is attached. FANTASIA rows come from records only.
pub fn aggregate_parsed(output: &ParseOutput) -> Vec<PerGeneRow> {
    let mut acc = Accumulator::default();
    let model = output.model.as_deref();

    if !output.source.is_list_like() {
        for gene in &output.genes {
            let row = acc.row(gene, model, output.source);
            if let Some(metadata) = output.gene_metadata.get(gene) {
                row.metadata = metadata.clone();
            }
        }
    }

    for record in &output.records {
        acc.row(&record.gene_id, record.model.as_deref(), record.source)
            .add(record);
    }
    acc.finish()
}

/// Genes with at least one term of `types`
pub fn annotated_genes(rows: &[PerGeneRow], types: &[TermType]) -> BTreeSet<String> {
    rows.iter()
        .filter(|row| row.has_annotation(types))
        .map(|row| row.gene_id.clone())
        .collect()
}
