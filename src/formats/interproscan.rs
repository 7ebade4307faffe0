/// InterProScan TSV: one line per signature hit, read positionally
use super::{split_fields, ParseOutput};
use crate::bio::annotation::{SourceTool, TermRecord, TermType};
use crate::IntegratorError;
use std::io::BufRead;

pub const MIN_COLUMNS: usize = 4;

pub const COL_PROTEIN: usize = 0;
pub const COL_ANALYSIS: usize = 3;
pub const COL_SCORE: usize = 8;
pub const COL_INTERPRO_ACCESSION: usize = 11;
pub const COL_INTERPRO_DESCRIPTION: usize = 12;
pub const COL_GO: usize = 13;
pub const COL_PATHWAYS: usize = 14;

/// Hit-level fields that are not terms
const HIT_METADATA: &[(usize, &str)] = &[
    (COL_ANALYSIS, "analysis"),
    (COL_SCORE, "score"),
    (COL_INTERPRO_ACCESSION, "InterPro_accession"),
    (COL_INTERPRO_DESCRIPTION, "InterPro_description"),
];

/// GO and pathway cells are emitted raw, one record per hit; splitting on
/// `,`/`|` and deduplication happen at aggregation.
pub(crate) fn parse_reader<R: BufRead>(reader: R, output: &mut ParseOutput) -> Result<(), IntegratorError> {
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(&line);
        if fields.len() < MIN_COLUMNS {
            output.skip_row();
            continue;
        }

        let Some(gene) = output.see_gene(fields[COL_PROTEIN]) else {
            output.skip_row();
            continue;
        };

        for &(col, key) in HIT_METADATA {
            if let Some(value) = fields.get(col) {
                output.set_metadata(gene, key, value);
            }
        }

        let cell = |col: usize| fields.get(col).copied().unwrap_or("");
        output.push(TermRecord::new(gene, cell(COL_GO), TermType::Go, SourceTool::InterProScan));
        output.push(TermRecord::new(gene, cell(COL_PATHWAYS), TermType::Pathway, SourceTool::InterProScan));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::formats::Dialect;
    use crate::TermType;

    fn hit(gene: &str, go: &str, pathways: &str) -> String {
        format!(
            "{gene}\tmd5\t300\tPfam\tPF00001\tdesc\t1\t100\t1.2E-10\tT\t01-01-2024\tIPR000001\tKinase\t{go}\t{pathways}\n"
        )
    }

    #[test]
    fn test_raw_cells_are_emitted_once_per_hit() {
        let input = hit("P1", "GO:0005515|GO:0003677", "-");
        let output = Dialect::InterProScan.parse_reader(input.as_bytes(), "ips.tsv");

        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].term_id, "GO:0005515|GO:0003677");
        assert_eq!(output.records[0].term_type, TermType::Go);
        assert_eq!(output.gene_metadata["P1"]["analysis"], "Pfam");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let input = format!("P1\tmd5\t300\n{}", hit("P2", "", "MetaCyc: PWY-1"));
        let output = Dialect::InterProScan.parse_reader(input.as_bytes(), "ips.tsv");

        assert_eq!(output.skipped_rows, 1);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].term_type, TermType::Pathway);
        assert!(!output.genes.contains("P1"));
    }

    #[test]
    fn test_rows_without_term_columns_keep_the_gene() {
        let output = Dialect::InterProScan.parse_reader(&b"P3\tmd5\t300\tPfam\n"[..], "ips.tsv");
        assert!(output.records.is_empty());
        assert!(output.genes.contains("P3"));
    }
}
