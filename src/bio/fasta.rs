//! Header-only FASTA scanning.
//!
//! Annotation integration never needs residues, only the identifiers on the
//! `>` lines: the full gene universe for coverage percentages and the
//! `gene=` attribute that maps protein accessions back to genes.

use crate::utils::io::open_text;
use crate::IntegratorError;
use indexmap::IndexSet;
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::space1,
    combinator::{opt, rest},
    sequence::preceded,
    IResult,
};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Identifier and attributes from one `>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaHeader {
    pub id: String,
    pub description: Option<String>,
}

impl FastaHeader {
    /// Value of the first `gene=` token in the description
    pub fn gene(&self) -> Option<&str> {
        self.description.as_deref().and_then(extract_gene_attribute)
    }
}

/// Parse a FASTA header line (without line terminator)
fn parse_header(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = tag(">")(input)?;
    let (input, _) = opt(space1)(input)?;
    let (input, id) = take_till1(|c: char| c.is_whitespace())(input)?;
    let (input, description) = opt(preceded(space1, rest))(input)?;
    Ok((input, (id, description.map(str::trim).filter(|d| !d.is_empty()))))
}

/// Extract `gene=<id>` from a header description
fn extract_gene_attribute(description: &str) -> Option<&str> {
    description
        .split_whitespace()
        .find(|part| part.starts_with("gene="))
        .and_then(|part| part.split('=').nth(1))
        .filter(|gene| !gene.is_empty())
}

/// Read every header of a FASTA file (supports .gz compression)
pub fn read_headers<P: AsRef<Path>>(path: P) -> Result<Vec<FastaHeader>, IntegratorError> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    let mut headers = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('>') {
            continue;
        }
        match parse_header(line.trim_end()) {
            Ok((_, (id, description))) => headers.push(FastaHeader {
                id: id.to_string(),
                description: description.map(str::to_string),
            }),
            Err(_) => {
                tracing::debug!("Skipping header without identifier in {}", path.display());
            }
        }
    }

    Ok(headers)
}

/// Distinct gene/protein identifiers in first-seen order
pub fn gene_ids<P: AsRef<Path>>(path: P) -> Result<IndexSet<String>, IntegratorError> {
    Ok(read_headers(path)?.into_iter().map(|h| h.id).collect())
}

/// Map protein accessions to the `gene=` attribute of their header.
///
/// Headers without the attribute map to themselves.
pub fn protein_to_gene<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, IntegratorError> {
    let headers = read_headers(path)?;
    let mut mapping = HashMap::with_capacity(headers.len());

    for header in headers {
        let gene = header.gene().unwrap_or(&header.id).to_string();
        mapping.insert(header.id, gene);
    }

    Ok(mapping)
}
