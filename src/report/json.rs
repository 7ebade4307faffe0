use crate::report::AnalysisReport;
use anyhow::Result;

pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
