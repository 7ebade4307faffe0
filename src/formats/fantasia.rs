/// FANTASIA GO predictions: header row, one row per (protein, GO term),
/// one `final_score_<model>` column per embedding model
use super::{split_fields, FileStatus, ParseOutput};
use crate::bio::annotation::{clean_value, parse_score, SourceTool, TermRecord, TermType};
use crate::IntegratorError;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

pub const ACCESSION: &str = "accession";
pub const GO_ID: &str = "go_id";
pub const PROTEINS: &str = "proteins";
pub const SCORE_PREFIX: &str = "final_score_";

/// Which FANTASIA table a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FantasiaVariant {
    /// Wide summary table without the `proteins` column
    Summary,
    /// Raw per-term predictions
    PerTerm,
}

impl FantasiaVariant {
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            FantasiaVariant::Summary => &[ACCESSION, GO_ID],
            FantasiaVariant::PerTerm => &[ACCESSION, GO_ID, PROTEINS],
        }
    }
}

/// Score column for a model suffix, e.g. `final_score_ESM_L0`
pub fn score_column(model_suffix: &str) -> String {
    format!("{}{}", SCORE_PREFIX, model_suffix)
}

pub(crate) fn parse_reader<R: BufRead>(
    reader: R,
    model: Option<&str>,
    variant: FantasiaVariant,
    output: &mut ParseOutput,
) -> Result<(), IntegratorError> {
    let mut lines = reader.lines();
    let required = variant.required_columns();

    let header: Vec<String> = loop {
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        break split_fields(&line).iter().map(|c| c.trim().to_string()).collect();
    };

    if !required.iter().all(|col| header.iter().any(|h| h == col)) {
        tracing::warn!(
            "Missing required columns in {}. Expected: {}",
            output.path.display(),
            required.join(", ")
        );
        output.status = FileStatus::HeaderRejected {
            expected: required.iter().map(|c| c.to_string()).collect(),
        };
        return Ok(());
    }

    let position = |name: &str| header.iter().position(|h| h == name);
    let accession_col = position(ACCESSION);
    let go_col = position(GO_ID);
    let score_col = model.and_then(|m| position(&score_column(m)));

    if let (Some(m), None) = (model, score_col) {
        tracing::warn!(
            "{} has no {} column; no rows will be selected for model {}",
            output.path.display(),
            score_column(m),
            m
        );
    }

    for line in lines {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }

        let fields = split_fields(&line);
        if fields.len() != header.len() {
            output.skip_row();
            continue;
        }

        let cell = |col: Option<usize>| col.and_then(|c| fields.get(c).copied()).unwrap_or("");
        let Some(gene) = output.see_gene(cell(accession_col)) else {
            output.skip_row();
            continue;
        };

        let Some(go_id) = clean_value(cell(go_col)) else {
            continue;
        };

        // With a model selected, rows that model did not score do not exist for it
        let score = match model {
            Some(_) => match cell(score_col).trim() {
                "" => continue,
                raw => parse_score(raw),
            },
            None => None,
        };

        output.push(TermRecord::new(gene, go_id, TermType::Go, SourceTool::Fantasia).map(|r| r.with_score(score)));
    }

    Ok(())
}
