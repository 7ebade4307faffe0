//! Where tool outputs live under a results root, and how derived tables are named.

use super::config::{LayoutConfig, ModelSpec};
use crate::bio::annotation::SourceTool;
use crate::IntegratorError;
use glob::glob;
use std::path::{Path, PathBuf};

pub const PER_TERM_SUFFIX: &str = "_per_term.tsv";
pub const PER_GENE_SUFFIX: &str = "_per_gene.tsv";
pub const FILTERED_PER_TERM_SUFFIX: &str = "_per_term_filtered.tsv";
pub const FILTERED_PER_GENE_SUFFIX: &str = "_per_gene_filtered.tsv";

pub const CONSENSUS_FILE: &str = "fantasia_consensus_majority.tsv";
pub const THRESHOLDS_FILE: &str = "fantasia_thresholds.tsv";

/// Glob patterns (relative to the tool directory) and the suffix stripped to get a base name
fn patterns(source: SourceTool) -> (&'static [&'static str], &'static [&'static str]) {
    match source {
        SourceTool::KofamScan => (&["*_kofam_mapper.tsv"], &["_kofam_mapper.tsv"]),
        SourceTool::InterProScan => (&["*.tsv"], &[".tsv"]),
        SourceTool::EggnogV5 => (
            &["**/*.emapper.annotations", "**/*.emapper.annotations.gz"],
            &[".emapper.annotations.gz", ".emapper.annotations"],
        ),
        SourceTool::EggnogV7 => (&["*.eggnog.tsv.gz"], &[".eggnog.tsv.gz"]),
        SourceTool::Fantasia => (&["*.tsv"], &[".tsv"]),
    }
}

#[derive(Debug, Clone)]
pub struct ResultsLayout {
    root: PathBuf,
    dirs: LayoutConfig,
}

impl ResultsLayout {
    pub fn new<P: AsRef<Path>>(root: P, dirs: &LayoutConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dirs: dirs.clone(),
        }
    }

    pub fn tool_dir(&self, source: SourceTool) -> PathBuf {
        let dir = match source {
            SourceTool::KofamScan => &self.dirs.kofamscan_dir,
            SourceTool::InterProScan => &self.dirs.interproscan_dir,
            SourceTool::EggnogV5 => &self.dirs.eggnog_v5_dir,
            SourceTool::EggnogV7 => &self.dirs.eggnog_v7_dir,
            SourceTool::Fantasia => &self.dirs.fantasia_dir,
        };
        self.root.join(dir)
    }

    /// Output files of one tool, sorted. A missing tool directory yields none.
    pub fn discover(&self, source: SourceTool) -> Result<Vec<PathBuf>, IntegratorError> {
        let dir = self.tool_dir(source);
        if !dir.is_dir() {
            tracing::warn!("{} directory not found: {}", source, dir.display());
            return Ok(Vec::new());
        }

        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        let mut files = Vec::new();
        for pattern in patterns(source).0 {
            let full = format!("{}/{}", escaped, pattern);
            let entries = glob(&full).map_err(|e| IntegratorError::Other(format!("Bad pattern {}: {}", full, e)))?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Skipping unreadable path: {}", e),
                }
            }
        }

        files.sort();
        files.dedup();
        tracing::debug!("Found {} {} file(s) in {}", files.len(), source, dir.display());
        Ok(files)
    }
}

/// File name without the tool-specific suffix, e.g. `sample` for `sample_kofam_mapper.tsv`
pub fn base_name(path: &Path, source: SourceTool) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    patterns(source)
        .1
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or(name)
}

/// Tag identifying a table's producer in file names
pub fn table_tag(source: SourceTool, model: Option<&ModelSpec>) -> String {
    match model {
        Some(model) => format!("{}_{}", source.file_tag(), model.name),
        None => source.file_tag().to_string(),
    }
}

pub fn per_term_name(base: &str, tag: &str) -> String {
    format!("{}_{}{}", base, tag, PER_TERM_SUFFIX)
}

pub fn per_gene_name(base: &str, tag: &str) -> String {
    format!("{}_{}{}", base, tag, PER_GENE_SUFFIX)
}

pub fn filtered_per_gene_name(base: &str, tag: &str) -> String {
    format!("{}_{}{}", base, tag, FILTERED_PER_GENE_SUFFIX)
}

/// `x_per_term.tsv` -> `x_per_term_filtered.tsv`
pub fn filtered_name(per_term_file: &str) -> Option<String> {
    per_term_file
        .strip_suffix(PER_TERM_SUFFIX)
        .map(|stem| format!("{}{}", stem, FILTERED_PER_TERM_SUFFIX))
}

/// `x_per_term.tsv` -> `x_per_gene_filtered.tsv`
pub fn filtered_per_gene_name_for(per_term_file: &str) -> Option<String> {
    per_term_file
        .strip_suffix(PER_TERM_SUFFIX)
        .map(|stem| format!("{}{}", stem, FILTERED_PER_GENE_SUFFIX))
}

/// Model whose `_fantasia_<name>_` tag appears in a table's file name
pub fn model_from_file_name<'a>(file_name: &str, models: &'a [ModelSpec]) -> Option<&'a ModelSpec> {
    models
        .iter()
        .find(|m| file_name.contains(&format!("_{}_", table_tag(SourceTool::Fantasia, Some(m)))))
}

/// FANTASIA per-term tables (unfiltered) in a directory, sorted
pub fn fantasia_per_term_tables(dir: &Path) -> Result<Vec<PathBuf>, IntegratorError> {
    let pattern = format!(
        "{}/*_{}_*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        SourceTool::Fantasia.file_tag(),
        PER_TERM_SUFFIX
    );
    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| IntegratorError::Other(format!("Bad pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
