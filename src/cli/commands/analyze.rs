use crate::bio::annotation::{SourceTool, TermType};
use crate::bio::fasta::gene_ids;
use crate::cli::visualize::{coverage_bars, create_spinner};
use crate::core::config::Config;
use crate::core::consensus::ThresholdTable;
use crate::core::coverage::CoverageSummary;
use crate::core::layout::{filtered_per_gene_name, per_gene_name, table_tag, THRESHOLDS_FILE};
use crate::core::overlap::{compute_overlaps, EGGNOG_COMBINED, FANTASIA_POST, INTERPROSCAN, KOFAMSCAN};
use crate::core::table::DelimitedTable;
use crate::report::tables::annotated_genes_in;
use crate::report::text::generate_overlap_summary;
use crate::report::{AnalysisReport, Format};
use crate::IntegratorError;
use anyhow::Context;
use clap::Args;
use colored::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Protein FASTA defining the full gene set
    #[arg(short, long, value_name = "FILE")]
    pub fasta: PathBuf,

    /// Directory with the per-gene tables written by `normalize` and `filter`
    #[arg(short, long, value_name = "DIR")]
    pub tables_dir: PathBuf,

    /// Sample prefix of the table file names
    #[arg(short, long)]
    pub sample: String,

    /// Output directory (default: the tables directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Report format printed to stdout (text, json)
    #[arg(long, default_value = "text")]
    pub format: Format,
}

pub fn run(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    if !args.fasta.is_file() {
        return Err(IntegratorError::MissingInput(format!("FASTA not found: {}", args.fasta.display())).into());
    }
    if !args.tables_dir.is_dir() {
        return Err(IntegratorError::MissingInput(format!(
            "tables directory not found: {}",
            args.tables_dir.display()
        ))
        .into());
    }
    let out_dir = args.output.clone().unwrap_or_else(|| args.tables_dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let spinner = create_spinner(&format!("Reading {}...", args.fasta.display()));
    let total = gene_ids(&args.fasta)
        .with_context(|| format!("Failed to read FASTA {}", args.fasta.display()))?
        .len();
    spinner.finish_with_message(format!("Found {} genes", total));

    let report = analyze(&args.tables_dir, &args.sample, total, config)?;

    let summary_path = out_dir.join(format!("{}_annotation_summary.csv", args.sample));
    report
        .coverage
        .write_csv(&summary_path)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    let overlap_path = out_dir.join(format!("{}_overlap_summary.txt", args.sample));
    std::fs::write(&overlap_path, generate_overlap_summary(&report.overlaps)?)
        .with_context(|| format!("Failed to write {}", overlap_path.display()))?;

    match args.format {
        Format::Text => {
            print!("{}", report.render(Format::Text)?);
            println!();
            print!("{}", coverage_bars(&report.coverage.rows, true));
            println!();
            println!("{} Saved summary: {}", "✓".green(), summary_path.display());
            println!("{} Saved overlap summary: {}", "✓".green(), overlap_path.display());
        }
        Format::Json => println!("{}", report.render(Format::Json)?),
    }

    Ok(())
}

/// Annotated genes of one per-gene table, or `None` when the table does not exist
fn read_set(path: &Path, types: &[TermType]) -> anyhow::Result<Option<BTreeSet<String>>> {
    if !path.is_file() {
        tracing::warn!("Table not found: {}", path.display());
        return Ok(None);
    }
    let genes = annotated_genes_in(path, types).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(genes))
}

/// Thresholds written by `filter` into `tables_dir`, empty when it has not run there
fn filtered_models(tables_dir: &Path) -> anyhow::Result<ThresholdTable> {
    let path = tables_dir.join(THRESHOLDS_FILE);
    if !path.is_file() {
        return Ok(ThresholdTable::new());
    }
    let table = DelimitedTable::read_tsv(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ThresholdTable::from_table(&table))
}

/// Coverage and overlap for every tool table of `sample` found in `tables_dir`
pub fn analyze(tables_dir: &Path, sample: &str, total: usize, config: &Config) -> anyhow::Result<AnalysisReport> {
    let table = |tag: &str| tables_dir.join(per_gene_name(sample, tag));

    let mut coverage = CoverageSummary::new(total);
    let mut gene_sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    if let Some(genes) = read_set(&table(SourceTool::KofamScan.file_tag()), &[TermType::Kegg])? {
        coverage.add(KOFAMSCAN, &genes);
        gene_sets.insert(KOFAMSCAN.to_string(), genes);
    }

    if let Some(genes) = read_set(
        &table(SourceTool::InterProScan.file_tag()),
        &[TermType::Go, TermType::Pathway],
    )? {
        coverage.add(INTERPROSCAN, &genes);
        gene_sets.insert(INTERPROSCAN.to_string(), genes);
    }

    // v5 is preferred when both EggNOG versions were normalized
    let eggnog = [SourceTool::EggnogV5, SourceTool::EggnogV7]
        .iter()
        .map(|source| table(source.file_tag()))
        .find(|path| path.is_file());
    match eggnog {
        Some(path) => {
            let go = read_set(&path, &[TermType::Go])?.unwrap_or_default();
            let kegg = read_set(&path, &[TermType::Kegg])?.unwrap_or_default();
            coverage.add("EggNOG (GO)", &go);
            coverage.add("EggNOG (KEGG)", &kegg);
            gene_sets.insert(EGGNOG_COMBINED.to_string(), go.union(&kegg).cloned().collect());
        }
        None => tracing::warn!("No EggNOG per-gene table for sample {}", sample),
    }

    let filtered_models = filtered_models(tables_dir)?;

    let mut pre_rows = Vec::new();
    let mut post_rows = Vec::new();
    let mut post_union = BTreeSet::new();
    let mut any_fantasia = false;

    for model in &config.fantasia.models {
        let tag = table_tag(SourceTool::Fantasia, Some(model));
        let pre = read_set(&table(&tag), &[TermType::Go])?;
        any_fantasia |= pre.is_some();
        let pre = pre.unwrap_or_default();

        let post_path = tables_dir.join(filtered_per_gene_name(sample, &tag));
        let post = if post_path.is_file() {
            read_set(&post_path, &[TermType::Go])?.unwrap_or_default()
        } else if filtered_models.get(&model.score_column()).is_some() {
            // Thresholded, but every row was removed
            BTreeSet::new()
        } else {
            pre.clone()
        };

        post_union.extend(post.iter().cloned());
        pre_rows.push((format!("FANTASIA {} (pre)", model.name), pre));
        post_rows.push((format!("FANTASIA {} (post)", model.name), post));
    }

    for (tool, genes) in pre_rows.iter().chain(&post_rows) {
        coverage.add(tool, genes);
    }
    if any_fantasia {
        gene_sets.insert(FANTASIA_POST.to_string(), post_union);
    }

    let overlaps = compute_overlaps(&gene_sets);
    Ok(AnalysisReport {
        sample: sample.to_string(),
        coverage,
        overlaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_config;
    use std::fs;

    #[test]
    fn test_analyze_reads_tables_by_sample_name() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("s1_kofamscan_per_gene.tsv"), "gene\tKEGG\ng1\tK1\ng2\t\n").unwrap();
        fs::write(d.join("s1_interproscan_per_gene.tsv"), "gene\tGO\tPathway\ng1\t\tPWY\ng3\tGO:1\t\n").unwrap();
        fs::write(d.join("s1_eggnog_v7_per_gene.tsv"), "gene\tGO\tKEGG\ng1\tGO:1\t\ng4\t\tK2\n").unwrap();
        fs::write(d.join("s1_fantasia_ESM-2_per_gene.tsv"), "gene\tmodel\tGO\ng1\tESM_L0\tGO:1\ng5\tESM_L0\tGO:2\n").unwrap();

        let report = analyze(d, "s1", 10, &default_config()).unwrap();

        let tools: Vec<&str> = report.coverage.rows.iter().map(|r| r.tool.as_str()).collect();
        assert_eq!(&tools[..4], ["KofamScan", "InterProScan", "EggNOG (GO)", "EggNOG (KEGG)"]);
        assert_eq!(tools.len(), 4 + 2 * 5);
        assert_eq!(report.coverage.rows[1].annotated, 2);
        // post falls back to pre without a filtered table
        assert_eq!(report.coverage.rows[4 + 5].annotated, 2);

        assert_eq!(report.overlaps.main_tools_union.count, 3);
        assert_eq!(report.overlaps.main_tools_intersection.count, 1);
        assert_eq!(report.overlaps.fantasia_exclusive.genes, BTreeSet::from(["g5".to_string()]));
    }

    #[test]
    fn test_model_filtered_to_nothing_has_empty_post_set() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("s1_kofamscan_per_gene.tsv"), "gene\tKEGG\ng1\tK1\n").unwrap();
        fs::write(
            d.join("s1_fantasia_ESM-2_per_term.tsv"),
            "gene\tterm\tterm_type\tscore\tmodel\ng5\tGO:1\tGO\t0.1\tESM_L0\ng6\tGO:2\tGO\t0.2\tESM_L0\n",
        )
        .unwrap();
        fs::write(d.join("s1_fantasia_ESM-2_per_gene.tsv"), "gene\tmodel\tGO\ng5\tESM_L0\tGO:1\ng6\tESM_L0\tGO:2\n").unwrap();

        let config = default_config();
        let mut thresholds = ThresholdTable::new();
        thresholds.insert("final_score_ESM_L0", 0.9);
        thresholds.to_table().write_tsv(d.join(THRESHOLDS_FILE)).unwrap();
        let outcomes = crate::cli::commands::filter::filter_tables(d, d, &thresholds, &config).unwrap();
        assert_eq!(outcomes, vec![crate::cli::commands::filter::TableOutcome::AllRemoved]);

        let report = analyze(d, "s1", 10, &config).unwrap();
        let row = |tool: &str| report.coverage.rows.iter().find(|r| r.tool == tool).unwrap().annotated;
        assert_eq!(row("FANTASIA ESM-2 (pre)"), 2);
        assert_eq!(row("FANTASIA ESM-2 (post)"), 0);
        assert!(report.overlaps.fantasia_exclusive.genes.is_empty());
    }
}
