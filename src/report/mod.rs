use crate::core::coverage::CoverageSummary;
use crate::core::overlap::OverlapResult;
use anyhow::Result;
use serde::Serialize;

pub mod json;
pub mod tables;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Everything the analyze step found for one sample
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub sample: String,
    pub coverage: CoverageSummary,
    pub overlaps: OverlapResult,
}

impl AnalysisReport {
    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Text => text::generate_text_report(self),
            Format::Json => json::generate_json_report(self),
        }
    }
}
