/// File-level parser behavior: compression, missing files, rejected headers
/// and the KEGG/GO shapes each tool emits.
mod common;

use annotation_integrator::formats::{FantasiaVariant, FileStatus};
use annotation_integrator::{aggregate, parse, Dialect, SourceTool, TermType};
use common::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_kofamscan_present_but_unannotated_gene() {
    let env = TestEnvironment::new();
    let path = env.write("k_kofam_mapper.tsv", "# gene\tKO\nGENE1\tK00001\nGENE2\n");

    let output = parse(&path, &Dialect::KofamScan);
    assert_eq!(output.status, FileStatus::Parsed);
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].gene_id, "GENE1");
    assert!(output.genes.contains("GENE2"));

    let rows = aggregate(&output.records);
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_interproscan_go_cell_yields_two_distinct_terms() {
    let env = TestEnvironment::new();
    let path = env.write(
        "ips.tsv",
        "P1\tmd5\t300\tPfam\tPF1\td\t1\t9\t1e-5\tT\tdate\tIPR1\tdesc\tGO:0005515|GO:0003677\t-\n",
    );

    let rows = aggregate(&parse(&path, &Dialect::InterProScan).records);
    assert_eq!(rows[0].terms(TermType::Go), ["GO:0005515", "GO:0003677"]);
}

#[test]
fn test_eggnog_v5_plain_and_gzipped_agree() {
    let env = TestEnvironment::new();
    let plain = env.write("s1.emapper.annotations", EGGNOG_V5);
    let gzipped = env.write_gz("s1.emapper.annotations.gz", EGGNOG_V5);

    let a = parse(&plain, &Dialect::EggnogV5);
    let b = parse(&gzipped, &Dialect::EggnogV5);
    assert_eq!(a.records, b.records);
    assert_eq!(a.records.len(), 6);
    assert!(a.records.iter().all(|r| !r.term_id.starts_with("ko:")));
}

#[test]
fn test_eggnog_v7_scored_kegg_cell() {
    let env = TestEnvironment::new();
    let path = env.write_gz(
        "s1.eggnog.tsv.gz",
        &eggnog7_row("GENE1", "ko:K00001|46.22;K00002|50.00", "-"),
    );

    let output = parse(&path, &Dialect::EggnogV7);
    let kegg: Vec<(&str, Option<f64>)> = output
        .records
        .iter()
        .map(|r| (r.term_id.as_str(), r.score))
        .collect();
    assert_eq!(kegg, vec![("K00001", Some(46.22)), ("K00002", Some(50.0))]);
    assert_eq!(output.gene_metadata["GENE1"]["eggnog_protein_ID"], "GENE1.orth");
}

#[test]
fn test_eggnog_v7_requires_gzip() {
    let env = TestEnvironment::new();
    let path = env.write("s1.eggnog.tsv.gz", &eggnog7_row("GENE1", "K00001|1", "-"));

    let output = parse(&path, &Dialect::EggnogV7);
    assert!(output.is_empty());
    assert!(matches!(output.status, FileStatus::ReadError(_)));
}

#[test_case(Dialect::KofamScan ; "kofamscan")]
#[test_case(Dialect::InterProScan ; "interproscan")]
#[test_case(Dialect::EggnogV5 ; "eggnog v5")]
#[test_case(Dialect::EggnogV7 ; "eggnog v7")]
#[test_case(Dialect::fantasia(Some("ESM_L0")) ; "fantasia")]
fn test_missing_file_is_empty_not_an_error(dialect: Dialect) {
    let env = TestEnvironment::new();
    let output = parse(env.path("absent.tsv"), &dialect);

    assert!(output.is_empty());
    assert_eq!(output.status, FileStatus::Missing);
    assert_eq!(output.source, dialect.source());
}

#[test]
fn test_fantasia_header_without_proteins_is_rejected_for_per_term() {
    let env = TestEnvironment::new();
    let path = env.write("f.tsv", "accession\tgo_id\tfinal_score_ESM_L0\nGENE1\tGO:1\t0.5\n");

    let output = parse(&path, &Dialect::fantasia(Some("ESM_L0")));
    assert!(output.is_empty());
    assert_eq!(
        output.status,
        FileStatus::HeaderRejected {
            expected: vec!["accession".to_string(), "go_id".to_string(), "proteins".to_string()]
        }
    );

    let summary = Dialect::Fantasia {
        model: Some("ESM_L0".to_string()),
        variant: FantasiaVariant::Summary,
    };
    assert_eq!(parse(&path, &summary).records.len(), 1);
}

#[test]
fn test_fantasia_models_see_different_rows() {
    let env = TestEnvironment::new();
    let path = env.write("f.tsv", FANTASIA_TSV);

    let prot = parse(&path, &Dialect::fantasia(Some("Prot-T5_L0")));
    let prost = parse(&path, &Dialect::fantasia(Some("Prost-T5_L0")));

    let genes = |o: &annotation_integrator::ParseOutput| -> Vec<String> {
        o.records.iter().map(|r| r.gene_id.clone()).collect()
    };
    assert_eq!(genes(&prot), vec!["GENE1", "GENE6"]);
    assert_eq!(genes(&prost), vec!["GENE1", "GENE7"]);
    assert!(prot.records.iter().all(|r| r.source == SourceTool::Fantasia));
}
