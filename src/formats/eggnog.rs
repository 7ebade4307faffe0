//! eggNOG-mapper v5 `.emapper.annotations` (optionally gzipped).
//!
//! The column header is the `#query` comment line. eggNOG-mapper has renamed
//! several columns between releases, so every field is looked up through a
//! list of historical names.

use super::{lookup, split_fields, ParseOutput};
use crate::bio::annotation::{SourceTool, TermRecord, TermType};
use crate::IntegratorError;
use indexmap::IndexMap;
use std::io::BufRead;

pub const HEADER_MARKER: &str = "#query";

pub const QUERY: &[&str] = &["query", "query_name"];
pub const DESCRIPTION: &[&str] = &["Description", "eggNOG_desc"];
pub const GO_TERMS: &[&str] = &["GOs", "GO_terms"];
pub const KEGG_KO: &[&str] = &["KEGG_ko", "KEGG_KO"];
pub const KEGG_PATHWAY: &[&str] = &["KEGG_Pathway", "KEGG_pathway"];
pub const KEGG_REACTION: &[&str] = &["KEGG_Reaction", "KEGG_reaction"];
pub const KEGG_RCLASS: &[&str] = &["KEGG_rclass"];
pub const PFAM: &[&str] = &["PFAMs", "PFAM"];

/// Term-bearing columns, each a comma-separated list
const TERM_COLUMNS: &[(&[&str], TermType)] = &[
    (GO_TERMS, TermType::Go),
    (KEGG_KO, TermType::Kegg),
    (KEGG_PATHWAY, TermType::Pathway),
    (PFAM, TermType::Pfam),
];

const METADATA_COLUMNS: &[(&[&str], &str)] = &[
    (DESCRIPTION, "Description"),
    (KEGG_REACTION, "KEGG_Reaction"),
    (KEGG_RCLASS, "KEGG_rclass"),
];

/// Column names from a `#query` line, leading `#` removed
pub(crate) fn header_columns(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('#')
        .split('\t')
        .map(|c| c.trim().to_string())
        .collect()
}

pub(crate) fn parse_reader<R: BufRead>(reader: R, output: &mut ParseOutput) -> Result<(), IntegratorError> {
    let mut header: Option<Vec<String>> = None;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            // The most recent #query line wins
            if line.starts_with(HEADER_MARKER) {
                header = Some(header_columns(&line));
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(&line);
        let Some(columns) = header.as_ref().filter(|h| h.len() == fields.len()) else {
            output.skip_row();
            continue;
        };

        let row: IndexMap<&str, &str> = columns
            .iter()
            .map(String::as_str)
            .zip(fields.iter().copied())
            .collect();

        let Some(gene) = output.see_gene(lookup(&row, QUERY)) else {
            output.skip_row();
            continue;
        };

        for &(names, key) in METADATA_COLUMNS {
            output.set_metadata(gene, key, lookup(&row, names));
        }

        for &(names, term_type) in TERM_COLUMNS {
            for term in lookup(&row, names).split(',') {
                output.push(TermRecord::new(gene, term, term_type, SourceTool::EggnogV5));
            }
        }
    }

    Ok(())
}
