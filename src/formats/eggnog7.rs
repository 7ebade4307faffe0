//! eggNOG 7 annotator output (`.eggnog.tsv.gz`, always gzipped).
//!
//! Rows are read positionally when wide enough; shorter rows fall back to
//! the `#query` header. GO and KEGG cells hold `;`-separated `TERM|SCORE`
//! items.

use super::eggnog::{header_columns, HEADER_MARKER};
use super::{lookup, split_fields, ParseOutput};
use crate::bio::annotation::{clean_value, parse_score, SourceTool, TermRecord, TermType};
use crate::IntegratorError;
use indexmap::IndexMap;
use std::io::BufRead;

pub const POSITIONAL_MIN_COLUMNS: usize = 15;

pub const COL_GENE: usize = 0;
pub const COL_PROTEIN_ID: usize = 1;
pub const COL_KEGG: usize = 12;
pub const COL_GO: usize = 14;

const QUERY: &[&str] = &["query", "query_name"];
const PROTEIN_ID: &[&str] = &["seed_ortholog", "seed_eggNOG_ortholog"];
const KEGG: &[&str] = &["KEGG_ko", "KEGG_KO"];
const GO: &[&str] = &["GOs", "GO"];

pub const PROTEIN_ID_KEY: &str = "eggnog_protein_ID";

/// Split a `TERM|SCORE;TERM|SCORE` cell into terms and optional scores
pub fn split_scored_terms(cell: &str) -> Vec<(&str, Option<f64>)> {
    cell.split(';')
        .filter_map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            match item.split_once('|') {
                Some((term, score)) => Some((term.trim(), parse_score(score))),
                None => Some((item, None)),
            }
        })
        .collect()
}

pub(crate) fn parse_reader<R: BufRead>(reader: R, output: &mut ParseOutput) -> Result<(), IntegratorError> {
    let mut header: Option<Vec<String>> = None;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            if line.starts_with(HEADER_MARKER) {
                header = Some(header_columns(&line));
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        // Only the terminator is stripped: an empty GO column is still a column
        let fields = split_fields(&line);
        if fields.len() < 2 {
            output.skip_row();
            continue;
        }

        let (gene, protein_id, kegg, go) = if fields.len() >= POSITIONAL_MIN_COLUMNS {
            (fields[COL_GENE], fields[COL_PROTEIN_ID], fields[COL_KEGG], fields[COL_GO])
        } else if let Some(columns) = header.as_ref().filter(|h| h.len() == fields.len()) {
            let row: IndexMap<&str, &str> = columns
                .iter()
                .map(String::as_str)
                .zip(fields.iter().copied())
                .collect();
            (lookup(&row, QUERY), lookup(&row, PROTEIN_ID), lookup(&row, KEGG), lookup(&row, GO))
        } else {
            output.skip_row();
            continue;
        };

        let Some(gene) = output.see_gene(gene) else {
            output.skip_row();
            continue;
        };
        output.set_metadata(gene, PROTEIN_ID_KEY, protein_id);

        for (cell, term_type) in [(go, TermType::Go), (kegg, TermType::Kegg)] {
            let Some(cell) = clean_value(cell) else { continue };
            for (term, score) in split_scored_terms(cell) {
                output.push(
                    TermRecord::new(gene, term, term_type, SourceTool::EggnogV7).map(|r| r.with_score(score)),
                );
            }
        }
    }

    Ok(())
}
