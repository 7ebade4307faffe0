/// KofamScan mapper output: `gene[\tKO]` per line
use super::{split_fields, ParseOutput};
use crate::bio::annotation::{SourceTool, TermRecord, TermType};
use crate::IntegratorError;
use std::io::BufRead;

pub(crate) fn parse_reader<R: BufRead>(reader: R, output: &mut ParseOutput) -> Result<(), IntegratorError> {
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(&line);
        let Some(gene) = output.see_gene(fields[0]) else {
            output.skip_row();
            continue;
        };

        // A gene listed without a KO is present but unannotated
        if let Some(ko) = fields.get(1) {
            output.push(TermRecord::new(gene, ko, TermType::Kegg, SourceTool::KofamScan));
        }
    }

    Ok(())
}
