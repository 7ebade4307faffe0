use crate::core::consensus::{ConsensusResult, ThresholdTable};
use crate::core::overlap::OverlapResult;
use crate::report::AnalysisReport;
use anyhow::Result;
use std::fmt::Write;

/// FANTASIA-only genes listed as examples in the overlap summary
pub const EXAMPLE_GENES: usize = 10;

const RULE: usize = 60;

fn banner(output: &mut String, title: &str, ch: char) -> std::fmt::Result {
    writeln!(output, "{}", ch.to_string().repeat(RULE))?;
    writeln!(output, "{}", title)?;
    writeln!(output, "{}", ch.to_string().repeat(RULE))
}

/// Plain-text overlap summary written next to the coverage table
pub fn generate_overlap_summary(overlaps: &OverlapResult) -> Result<String> {
    let mut output = String::new();

    banner(&mut output, "Gene Annotation Overlap Analysis", '=')?;
    writeln!(&mut output)?;
    writeln!(&mut output, "All tools combined: {} genes", overlaps.all_tools_union.count)?;
    writeln!(
        &mut output,
        "Genes annotated by ALL tools: {} genes",
        overlaps.all_tools_intersection.count
    )?;
    writeln!(&mut output)?;

    banner(&mut output, "KofamScan + InterProScan + EggNOG Analysis:", '-')?;
    writeln!(&mut output, "Combined (union): {} genes", overlaps.main_tools_union.count)?;
    writeln!(
        &mut output,
        "Overlap (intersection): {} genes",
        overlaps.main_tools_intersection.count
    )?;
    writeln!(&mut output)?;

    banner(&mut output, "FANTASIA Unique Contributions:", '-')?;
    writeln!(
        &mut output,
        "Genes uniquely annotated by FANTASIA: {} genes",
        overlaps.fantasia_exclusive.count
    )?;
    writeln!(
        &mut output,
        "(These genes were not annotated by KofamScan, InterProScan, or EggNOG)"
    )?;

    if overlaps.fantasia_exclusive.count > 0 {
        writeln!(&mut output)?;
        writeln!(
            &mut output,
            "Example FANTASIA-unique gene IDs (first {}):",
            EXAMPLE_GENES
        )?;
        for gene in overlaps.fantasia_exclusive.genes.iter().take(EXAMPLE_GENES) {
            writeln!(&mut output, "  - {}", gene)?;
        }
    }

    Ok(output)
}

/// Coverage table followed by the overlap figures
pub fn generate_text_report(report: &AnalysisReport) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "Annotation Summary: {}", report.sample)?;
    writeln!(&mut output, "{}", "=".repeat(20 + report.sample.len()))?;
    writeln!(&mut output, "Total genes: {}", report.coverage.total_genes)?;
    writeln!(&mut output)?;

    let width = report
        .coverage
        .rows
        .iter()
        .map(|row| row.tool.len())
        .max()
        .unwrap_or(4)
        .max(4);
    writeln!(&mut output, "{:<width$}  {:>9}  {:>10}", "Tool", "Annotated", "Percentage")?;
    for row in &report.coverage.rows {
        writeln!(
            &mut output,
            "{:<width$}  {:>9}  {:>10}",
            row.tool,
            row.annotated,
            row.percentage_label()
        )?;
    }
    writeln!(&mut output)?;

    output.push_str(&generate_overlap_summary(&report.overlaps)?);
    Ok(output)
}

/// Thresholds and vote distribution of a consensus run
pub fn generate_consensus_report(thresholds: &ThresholdTable, result: &ConsensusResult) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "Model Thresholds")?;
    writeln!(&mut output, "----------------")?;
    for (column, threshold) in thresholds.iter() {
        writeln!(&mut output, "- {}: {:.4}", column, threshold)?;
    }
    writeln!(&mut output)?;

    writeln!(
        &mut output,
        "Consensus (>= {}/{} models)",
        result.min_votes, result.models_used
    )?;
    writeln!(&mut output, "-----------------------------")?;
    for (votes, rows) in &result.vote_distribution {
        writeln!(&mut output, "- {} votes: {:6} rows", votes, rows)?;
    }
    writeln!(
        &mut output,
        "Kept {} of {} rows",
        result.consensus.len(),
        result.voted.len()
    )?;

    Ok(output)
}
