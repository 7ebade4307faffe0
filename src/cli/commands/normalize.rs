use crate::bio::annotation::SourceTool;
use crate::cli::visualize::create_spinner;
use crate::core::aggregator::aggregate_parsed;
use crate::core::config::{Config, ModelSpec};
use crate::core::layout::{base_name, per_gene_name, per_term_name, table_tag, ResultsLayout};
use crate::formats::{parse, Dialect, FileStatus, ParseOutput};
use crate::report::tables::{per_gene_table, per_term_table};
use crate::utils::parallel::map_ordered;
use crate::IntegratorError;
use anyhow::Context;
use clap::{Args, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Results root with one sub-directory per tool
    #[arg(short, long, value_name = "DIR")]
    pub results: PathBuf,

    /// Directory for the per-term and per-gene tables
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Only process these tools (repeatable; default: all)
    #[arg(long = "tool", value_name = "TOOL")]
    pub tools: Vec<ToolSelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToolSelector {
    Kofamscan,
    Interproscan,
    /// Both EggNOG v5 and v7 outputs
    Eggnog,
    Fantasia,
}

impl ToolSelector {
    fn sources(&self) -> &'static [SourceTool] {
        match self {
            ToolSelector::Kofamscan => &[SourceTool::KofamScan],
            ToolSelector::Interproscan => &[SourceTool::InterProScan],
            ToolSelector::Eggnog => &[SourceTool::EggnogV5, SourceTool::EggnogV7],
            ToolSelector::Fantasia => &[SourceTool::Fantasia],
        }
    }
}

/// One file parsed with one dialect
struct Job {
    path: PathBuf,
    dialect: Dialect,
    model: Option<ModelSpec>,
}

/// Tables written for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub per_term: PathBuf,
    pub per_gene: PathBuf,
    pub term_rows: usize,
    pub gene_rows: usize,
}

pub fn run(args: NormalizeArgs, config: &Config) -> anyhow::Result<()> {
    if !args.results.is_dir() {
        return Err(IntegratorError::MissingInput(format!(
            "results directory not found: {}",
            args.results.display()
        ))
        .into());
    }
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let selected: Vec<SourceTool> = if args.tools.is_empty() {
        vec![
            SourceTool::KofamScan,
            SourceTool::InterProScan,
            SourceTool::EggnogV5,
            SourceTool::EggnogV7,
            SourceTool::Fantasia,
        ]
    } else {
        args.tools.iter().flat_map(|t| t.sources().iter().copied()).collect()
    };

    let layout = ResultsLayout::new(&args.results, &config.layout);
    let mut written = Vec::new();

    for source in selected {
        println!("{} {}", "►".cyan().bold(), source.display_name().bold());
        let files = layout.discover(source)?;
        if files.is_empty() {
            println!("  {} No {} files found", "⚠".yellow(), source);
            continue;
        }

        let jobs = jobs_for(source, &files, config);
        let spinner = create_spinner(&format!("Parsing {} {} file(s)...", files.len(), source));
        let outputs = map_ordered(&jobs, |job| parse(&job.path, &job.dialect));
        spinner.finish_and_clear();

        for (job, output) in jobs.iter().zip(&outputs) {
            match write_tables(&args.output, job, output)? {
                Some(w) => {
                    println!(
                        "  {} {} ({} rows), {} ({} genes)",
                        "✓".green(),
                        w.per_term.display(),
                        w.term_rows,
                        w.per_gene.display(),
                        w.gene_rows
                    );
                    written.push(w);
                }
                None => {
                    let label = job.model.as_ref().map(|m| m.name.as_str()).unwrap_or("file");
                    println!("  {} Skipping {}: no annotations in {}", "⚠".yellow(), label, job.path.display());
                }
            }
        }
    }

    tracing::info!("Wrote {} table pair(s) to {}", written.len(), args.output.display());
    Ok(())
}

/// FANTASIA files are parsed once per configured model
fn jobs_for(source: SourceTool, files: &[PathBuf], config: &Config) -> Vec<Job> {
    files
        .iter()
        .flat_map(|path| -> Vec<Job> {
            match source {
                SourceTool::Fantasia => config
                    .fantasia
                    .models
                    .iter()
                    .map(|model| Job {
                        path: path.clone(),
                        dialect: Dialect::fantasia(Some(&model.suffix)),
                        model: Some(model.clone()),
                    })
                    .collect(),
                _ => vec![Job {
                    path: path.clone(),
                    dialect: dialect_for(source),
                    model: None,
                }],
            }
        })
        .collect()
}

fn dialect_for(source: SourceTool) -> Dialect {
    match source {
        SourceTool::KofamScan => Dialect::KofamScan,
        SourceTool::InterProScan => Dialect::InterProScan,
        SourceTool::EggnogV5 => Dialect::EggnogV5,
        SourceTool::EggnogV7 => Dialect::EggnogV7,
        SourceTool::Fantasia => Dialect::fantasia(None),
    }
}

/// Write the per-term and per-gene tables of one parsed file.
///
/// Nothing is written for a rejected file or a FANTASIA model without rows.
fn write_tables(out_dir: &Path, job: &Job, output: &ParseOutput) -> anyhow::Result<Option<Written>> {
    if let FileStatus::HeaderRejected { .. } = output.status {
        return Ok(None);
    }
    let source = output.source;
    if source.is_list_like() && output.is_empty() {
        return Ok(None);
    }

    let base = base_name(&job.path, source);
    let tag = table_tag(source, job.model.as_ref());
    let with_model = source.is_list_like();

    let per_term = out_dir.join(per_term_name(&base, &tag));
    let term_table = per_term_table(&output.records, with_model);
    term_table
        .write_tsv(&per_term)
        .with_context(|| format!("Failed to write {}", per_term.display()))?;

    let per_gene = out_dir.join(per_gene_name(&base, &tag));
    let gene_table = per_gene_table(&aggregate_parsed(output), source, with_model);
    gene_table
        .write_tsv(&per_gene)
        .with_context(|| format!("Failed to write {}", per_gene.display()))?;

    Ok(Some(Written {
        per_term,
        per_gene,
        term_rows: term_table.len(),
        gene_rows: gene_table.len(),
    }))
}
