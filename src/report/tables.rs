//! Per-term and per-gene tables: building them from records and reading
//! annotated-gene sets back out of them.

use crate::bio::annotation::{parse_score, SourceTool, TermRecord, TermType};
use crate::core::aggregator::PerGeneRow;
use crate::core::table::DelimitedTable;
use crate::IntegratorError;
use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::path::Path;

pub const GENE: &str = "gene";
pub const TERM: &str = "term";
pub const TERM_TYPE: &str = "term_type";
pub const SCORE: &str = "score";
pub const MODEL: &str = "model";

/// One row per record: `gene, term, term_type, score[, model]`
pub fn per_term_table(records: &[TermRecord], with_model: bool) -> DelimitedTable {
    let mut headers = vec![GENE, TERM, TERM_TYPE, SCORE];
    if with_model {
        headers.push(MODEL);
    }

    let mut table = DelimitedTable::new(headers);
    for record in records {
        let mut row = vec![
            record.gene_id.clone(),
            record.term_id.clone(),
            record.term_type.label().to_string(),
            record.score.map(|s| s.to_string()).unwrap_or_default(),
        ];
        if with_model {
            row.push(record.model.clone().unwrap_or_default());
        }
        table.push_row(row);
    }
    table
}

/// One row per gene: `gene[, model]`, one column per term type of `source`,
/// then any per-gene metadata columns in first-seen order.
pub fn per_gene_table(rows: &[PerGeneRow], source: SourceTool, with_model: bool) -> DelimitedTable {
    let metadata_keys: IndexSet<&str> = rows
        .iter()
        .flat_map(|row| row.metadata.keys().map(String::as_str))
        .collect();

    let mut headers = vec![GENE];
    if with_model {
        headers.push(MODEL);
    }
    headers.extend(source.term_types().iter().map(|t| t.label()));
    headers.extend(metadata_keys.iter().copied());

    let mut table = DelimitedTable::new(headers);
    for row in rows {
        let mut cells = vec![row.gene_id.clone()];
        if with_model {
            cells.push(row.model.clone().unwrap_or_default());
        }
        cells.extend(source.term_types().iter().map(|t| row.joined(*t)));
        cells.extend(
            metadata_keys
                .iter()
                .map(|key| row.metadata.get(*key).cloned().unwrap_or_default()),
        );
        table.push_row(cells);
    }
    table
}

/// Records back out of a per-term table. Rows with an unknown term type or no term are dropped.
pub fn records_from_per_term(table: &DelimitedTable, source: SourceTool) -> Vec<TermRecord> {
    let (Some(gene), Some(term), Some(term_type)) = (table.column(GENE), table.column(TERM), table.column(TERM_TYPE))
    else {
        tracing::warn!("Per-term table lacks {}/{}/{} columns", GENE, TERM, TERM_TYPE);
        return Vec::new();
    };
    let score = table.column(SCORE);
    let model = table.column(MODEL);

    (0..table.len())
        .filter_map(|row| {
            let term_type = TermType::from_label(table.cell(row, term_type))?;
            let record = TermRecord::new(table.cell(row, gene), table.cell(row, term), term_type, source)?
                .with_score(score.and_then(|col| parse_score(table.cell(row, col))));
            Some(match model.map(|col| table.cell(row, col)).filter(|m| !m.is_empty()) {
                Some(m) => record.with_model(m),
                None => record,
            })
        })
        .collect()
}

/// Genes of a per-gene table with a non-empty cell in any of `types`.
///
/// A missing file is an error so callers can tell "absent" from "empty".
pub fn annotated_genes_in<P: AsRef<Path>>(path: P, types: &[TermType]) -> Result<BTreeSet<String>, IntegratorError> {
    let table = DelimitedTable::read_tsv(path.as_ref())?;
    let Some(gene) = table.column(GENE) else {
        tracing::warn!("No {} column in {}", GENE, path.as_ref().display());
        return Ok(BTreeSet::new());
    };

    let columns: Vec<usize> = types.iter().filter_map(|t| table.column(t.label())).collect();
    Ok((0..table.len())
        .filter(|row| columns.iter().any(|col| !table.cell(*row, *col).trim().is_empty()))
        .map(|row| table.cell(row, gene).to_string())
        .filter(|g| !g.is_empty())
        .collect())
}
