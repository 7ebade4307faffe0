use crate::bio::annotation::SourceTool;
use crate::bio::fasta::protein_to_gene;
use crate::cli::visualize::{create_spinner, vote_histogram};
use crate::core::aggregator::aggregate;
use crate::core::config::Config;
use crate::core::consensus::{consensus, filter_per_term, remap_gene_ids, thresholds, ThresholdTable};
use crate::core::layout::{
    fantasia_per_term_tables, filtered_name, filtered_per_gene_name_for, model_from_file_name, CONSENSUS_FILE,
    THRESHOLDS_FILE,
};
use crate::core::table::DelimitedTable;
use crate::formats::FantasiaVariant;
use crate::report::tables::{per_gene_table, records_from_per_term};
use crate::report::text::generate_consensus_report;
use crate::IntegratorError;
use anyhow::Context;
use clap::Args;
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// FANTASIA wide summary table (tab-separated, one final_score column per model)
    #[arg(short, long, value_name = "FILE")]
    pub summary: PathBuf,

    /// Directory with the FANTASIA per-term tables written by `normalize`
    #[arg(short, long, value_name = "DIR")]
    pub tables_dir: PathBuf,

    /// Output directory (default: the tables directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Protein FASTA whose `gene=` attributes map accessions to gene ids
    #[arg(long, value_name = "FILE")]
    pub fasta: Option<PathBuf>,
}

/// Outcome of filtering one per-term table
#[derive(Debug, Clone, PartialEq)]
pub enum TableOutcome {
    Filtered { path: PathBuf, kept: usize, original: usize },
    AllRemoved,
    NoModel,
    NoThreshold(String),
}

pub fn run(args: FilterArgs, config: &Config) -> anyhow::Result<()> {
    if !args.summary.is_file() {
        return Err(IntegratorError::MissingInput(format!(
            "FANTASIA summary not found: {}",
            args.summary.display()
        ))
        .into());
    }
    let out_dir = args.output.clone().unwrap_or_else(|| args.tables_dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let spinner = create_spinner(&format!("Loading {}...", args.summary.display()));
    let summary = DelimitedTable::read_tsv(&args.summary)
        .with_context(|| format!("Failed to read summary {}", args.summary.display()))?;
    spinner.finish_with_message(format!("Loaded summary with {} rows", summary.len()));
    check_summary_columns(&summary, &args.summary)?;

    let model_thresholds = thresholds(&summary, &config.fantasia.score_columns(), config.consensus.quantile);
    let thresholds_path = out_dir.join(THRESHOLDS_FILE);
    model_thresholds
        .to_table()
        .write_tsv(&thresholds_path)
        .with_context(|| format!("Failed to write {}", thresholds_path.display()))?;

    println!("{}", "Filtering per-term tables".bold());
    filter_tables(&args.tables_dir, &out_dir, &model_thresholds, config)?;

    println!("{}", "Consensus filtering".bold());
    let result = consensus(&summary, &model_thresholds, config.consensus.min_votes);
    let mut majority = result.consensus.clone();

    if let Some(fasta) = &args.fasta {
        if fasta.is_file() {
            let mapping = protein_to_gene(fasta)
                .with_context(|| format!("Failed to read FASTA {}", fasta.display()))?;
            if remap_gene_ids(&mut majority, &mapping) {
                println!("  Mapped {} proteins to genes", mapping.len());
            }
        } else {
            tracing::warn!("FASTA file not found: {}; gene ids not mapped", fasta.display());
        }
    }

    let consensus_path = out_dir.join(CONSENSUS_FILE);
    majority
        .write_tsv(&consensus_path)
        .with_context(|| format!("Failed to write {}", consensus_path.display()))?;

    print!("{}", generate_consensus_report(&model_thresholds, &result)?);
    print!("{}", vote_histogram(&result.vote_distribution, true));
    println!("{} Saved consensus result: {}", "✓".green(), consensus_path.display());

    Ok(())
}

/// The summary must carry the columns of the FANTASIA summary layout
fn check_summary_columns(summary: &DelimitedTable, path: &Path) -> Result<(), IntegratorError> {
    let required = FantasiaVariant::Summary.required_columns();
    let missing: Vec<&str> = required.iter().copied().filter(|c| summary.column(c).is_none()).collect();
    if missing.is_empty() {
        return Ok(());
    }
    tracing::warn!(
        "Missing required columns in {}. Expected: {}",
        path.display(),
        required.join(", ")
    );
    Err(IntegratorError::Parse(format!(
        "{} lacks column(s): {}",
        path.display(),
        missing.join(", ")
    )))
}

/// Threshold-filter every FANTASIA per-term table in `tables_dir`
pub fn filter_tables(
    tables_dir: &Path,
    out_dir: &Path,
    model_thresholds: &ThresholdTable,
    config: &Config,
) -> anyhow::Result<Vec<TableOutcome>> {
    let tables = fantasia_per_term_tables(tables_dir)?;
    if tables.is_empty() {
        println!("  No FANTASIA per-term tables found in {}", tables_dir.display());
        return Ok(Vec::new());
    }

    let mut outcomes = Vec::with_capacity(tables.len());
    for path in tables {
        let outcome = filter_table(&path, out_dir, model_thresholds, config)?;
        match &outcome {
            TableOutcome::Filtered { path, kept, original } => println!(
                "  {} {}: kept {}/{} rows (removed {})",
                "✓".green(),
                path.display(),
                kept,
                original,
                original - kept
            ),
            TableOutcome::AllRemoved => {
                tracing::warn!("All rows filtered out for {}", path.display())
            }
            TableOutcome::NoModel => tracing::warn!("Could not determine model for {}", path.display()),
            TableOutcome::NoThreshold(column) => tracing::warn!("No threshold found for {}", column),
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn filter_table(
    path: &Path,
    out_dir: &Path,
    model_thresholds: &ThresholdTable,
    config: &Config,
) -> anyhow::Result<TableOutcome> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(model) = model_from_file_name(&file_name, &config.fantasia.models) else {
        return Ok(TableOutcome::NoModel);
    };
    let column = model.score_column();
    let Some(threshold) = model_thresholds.get(&column) else {
        return Ok(TableOutcome::NoThreshold(column));
    };

    let table = DelimitedTable::read_tsv(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filtered = filter_per_term(&table, threshold);
    if filtered.is_empty() {
        return Ok(TableOutcome::AllRemoved);
    }

    let (Some(term_name), Some(gene_name)) = (filtered_name(&file_name), filtered_per_gene_name_for(&file_name)) else {
        return Ok(TableOutcome::NoModel);
    };
    let term_path = out_dir.join(term_name);
    filtered
        .write_tsv(&term_path)
        .with_context(|| format!("Failed to write {}", term_path.display()))?;

    let rows = aggregate(&records_from_per_term(&filtered, SourceTool::Fantasia));
    let gene_path = out_dir.join(gene_name);
    per_gene_table(&rows, SourceTool::Fantasia, true)
        .write_tsv(&gene_path)
        .with_context(|| format!("Failed to write {}", gene_path.display()))?;

    Ok(TableOutcome::Filtered {
        path: term_path,
        kept: filtered.len(),
        original: table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_config;
    use std::fs;

    const PER_TERM: &str = "gene\tterm\tterm_type\tscore\tmodel\n\
                            g1\tGO:1\tGO\t0.9\tESM_L0\n\
                            g2\tGO:2\tGO\t0.1\tESM_L0\n";

    #[test]
    fn test_per_term_table_is_filtered_and_regrouped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s1_fantasia_ESM-2_per_term.tsv"), PER_TERM).unwrap();

        let mut thresholds = ThresholdTable::new();
        thresholds.insert("final_score_ESM_L0", 0.5);
        let outcomes = filter_tables(dir.path(), dir.path(), &thresholds, &default_config()).unwrap();

        assert!(matches!(outcomes[0], TableOutcome::Filtered { kept: 1, original: 2, .. }));
        let per_gene = fs::read_to_string(dir.path().join("s1_fantasia_ESM-2_per_gene_filtered.tsv")).unwrap();
        assert_eq!(per_gene, "gene\tmodel\tGO\ng1\tESM_L0\tGO:1\n");
    }

    #[test]
    fn test_model_without_threshold_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s1_fantasia_ProtT5_per_term.tsv"), PER_TERM).unwrap();

        let outcomes = filter_tables(dir.path(), dir.path(), &ThresholdTable::new(), &default_config()).unwrap();
        assert_eq!(outcomes, vec![TableOutcome::NoThreshold("final_score_Prot-T5_L0".to_string())]);
    }

    #[test]
    fn test_summary_without_accession_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.tsv");
        fs::write(&summary, "protein\tgo_id\tfinal_score_ESM_L0\np1\tGO:1\t0.5\n").unwrap();

        let args = FilterArgs {
            summary,
            tables_dir: dir.path().to_path_buf(),
            output: None,
            fasta: None,
        };
        let err = run(args, &default_config()).unwrap_err();
        assert!(matches!(err.downcast_ref::<IntegratorError>(), Some(IntegratorError::Parse(_))));
        assert!(!dir.path().join(CONSENSUS_FILE).exists());
    }

    #[test]
    fn test_everything_below_threshold_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s1_fantasia_ESM-2_per_term.tsv"), PER_TERM).unwrap();

        let mut thresholds = ThresholdTable::new();
        thresholds.insert("final_score_ESM_L0", 5.0);
        let outcomes = filter_tables(dir.path(), dir.path(), &thresholds, &default_config()).unwrap();

        assert_eq!(outcomes, vec![TableOutcome::AllRemoved]);
        assert!(!dir.path().join("s1_fantasia_ESM-2_per_term_filtered.tsv").exists());
    }
}
