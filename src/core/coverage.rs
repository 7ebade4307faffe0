use super::table::DelimitedTable;
use crate::IntegratorError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

pub const SUMMARY_HEADERS: [&str; 5] = ["Tool", "Annotated Genes", "Total Genes", "Percentage", "Percentage_Value"];

/// Share of the proteome one tool (or model) annotated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub tool: String,
    pub annotated: usize,
    pub total: usize,
    pub percentage: f64,
}

impl CoverageRow {
    pub fn new(tool: &str, genes: &BTreeSet<String>, total: usize) -> Self {
        let annotated = genes.len();
        let percentage = if total > 0 {
            annotated as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            tool: tool.to_string(),
            annotated,
            total,
            percentage,
        }
    }

    pub fn percentage_label(&self) -> String {
        format!("{:.2}%", self.percentage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_genes: usize,
    pub rows: Vec<CoverageRow>,
}

impl CoverageSummary {
    pub fn new(total_genes: usize) -> Self {
        Self {
            total_genes,
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, tool: &str, genes: &BTreeSet<String>) {
        self.rows.push(CoverageRow::new(tool, genes, self.total_genes));
    }

    pub fn to_table(&self) -> DelimitedTable {
        let mut table = DelimitedTable::new(SUMMARY_HEADERS);
        for row in &self.rows {
            table.push_row(vec![
                row.tool.clone(),
                row.annotated.to_string(),
                row.total.to_string(),
                row.percentage_label(),
                row.percentage.to_string(),
            ]);
        }
        table
    }

    /// Comma-separated summary with a header row
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), IntegratorError> {
        self.to_table().write_delimited(path, b',')
    }
}
