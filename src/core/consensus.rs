//! Two-stage FANTASIA consensus: a per-model threshold taken as a quantile
//! of that model's positive scores, then a majority vote across models.

use super::table::DelimitedTable;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const VOTE_COLUMN: &str = "consensus_vote";
pub const GENE_ID_COLUMN: &str = "gene_id";
pub const ACCESSION_COLUMN: &str = "accession";

/// Score columns tried, in order, when filtering a per-term table
pub const PER_TERM_SCORE_COLUMNS: &[&str] = &["final_score", "score"];

/// Score column name -> threshold, in model order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThresholdTable {
    values: IndexMap<String, f64>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, threshold: f64) {
        self.values.insert(column.to_string(), threshold);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_table(&self) -> DelimitedTable {
        let mut table = DelimitedTable::new(["model", "threshold"]);
        for (column, threshold) in self.iter() {
            table.push_row(vec![column.to_string(), threshold.to_string()]);
        }
        table
    }

    pub fn from_table(table: &DelimitedTable) -> Self {
        let mut thresholds = Self::new();
        let (Some(model), Some(value)) = (table.column("model"), table.column("threshold")) else {
            return thresholds;
        };
        for (row, threshold) in table.numeric(value).into_iter().enumerate() {
            if let Some(threshold) = threshold {
                thresholds.insert(table.cell(row, model), threshold);
            }
        }
        thresholds
    }
}

/// Quantile `q` of `values` with linear interpolation between order
/// statistics. `None` for an empty population.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Threshold for one population of scores: the quantile of its strictly
/// positive values, 0.0 when there are none.
pub fn threshold_for(scores: &[Option<f64>], q: f64) -> (f64, usize) {
    let positive: Vec<f64> = scores.iter().flatten().copied().filter(|s| *s > 0.0).collect();
    (percentile(&positive, q).unwrap_or(0.0), positive.len())
}

/// Per-model thresholds. Columns absent from the table are skipped with a warning.
pub fn thresholds(table: &DelimitedTable, model_columns: &[String], quantile: f64) -> ThresholdTable {
    let mut result = ThresholdTable::new();

    for column in model_columns {
        let Some(col) = table.column(column) else {
            tracing::warn!("Column {} not found in score table", column);
            continue;
        };

        let (threshold, population) = threshold_for(&table.numeric(col), quantile);
        tracing::info!(
            "{}: Q{} = {:.4} (from {} positive scores)",
            column,
            quantile,
            threshold,
            population
        );
        result.insert(column, threshold);
    }

    result
}

/// Rows of a per-term table whose score reaches `threshold`.
///
/// Without a score column every row passes. Missing or non-numeric scores fail.
pub fn filter_per_term(table: &DelimitedTable, threshold: f64) -> DelimitedTable {
    let Some(col) = table.find_column(PER_TERM_SCORE_COLUMNS) else {
        tracing::warn!(
            "No score column ({}) in per-term table; keeping all {} rows",
            PER_TERM_SCORE_COLUMNS.join("/"),
            table.len()
        );
        return table.clone();
    };

    let scores = table.numeric(col);
    table.select_rows(|i, _| scores[i].is_some_and(|s| s >= threshold))
}

/// Number of models whose score is present and reaches their threshold
pub fn vote(scores: &[Option<f64>], thresholds: &[f64]) -> usize {
    scores
        .iter()
        .zip(thresholds)
        .filter(|(score, threshold)| score.is_some_and(|s| s >= **threshold))
        .count()
}

#[derive(Debug, Clone)]
pub struct ConsensusResult {
    /// The input table with a `consensus_vote` column
    pub voted: DelimitedTable,
    /// Rows of `voted` with at least `min_votes`
    pub consensus: DelimitedTable,
    /// Vote count -> number of rows, for every count from 0 to the model count
    pub vote_distribution: BTreeMap<usize, usize>,
    pub models_used: usize,
    pub min_votes: usize,
}

/// Majority vote over every model column present in both the table and `thresholds`.
pub fn consensus(table: &DelimitedTable, thresholds: &ThresholdTable, min_votes: usize) -> ConsensusResult {
    let models: Vec<(Vec<Option<f64>>, f64)> = thresholds
        .iter()
        .filter_map(|(column, threshold)| table.column(column).map(|col| (table.numeric(col), threshold)))
        .collect();
    let limits: Vec<f64> = models.iter().map(|(_, t)| *t).collect();

    let votes: Vec<usize> = (0..table.len())
        .map(|row| {
            let scores: Vec<Option<f64>> = models.iter().map(|(column, _)| column[row]).collect();
            vote(&scores, &limits)
        })
        .collect();

    let mut vote_distribution: BTreeMap<usize, usize> = (0..=models.len()).map(|v| (v, 0)).collect();
    for v in &votes {
        *vote_distribution.entry(*v).or_default() += 1;
    }
    for (v, rows) in &vote_distribution {
        tracing::info!("  {} votes: {} rows", v, rows);
    }

    let mut voted = table.clone();
    voted.set_column(VOTE_COLUMN, votes.iter().map(|v| v.to_string()).collect());
    let consensus = voted.select_rows(|i, _| votes[i] >= min_votes);

    tracing::info!(
        "Consensus: {} of {} rows reach {}/{} votes",
        consensus.len(),
        table.len(),
        min_votes,
        models.len()
    );

    ConsensusResult {
        voted,
        consensus,
        vote_distribution,
        models_used: models.len(),
        min_votes,
    }
}

/// Add a `gene_id` column mapped from `accession`, falling back to the accession.
///
/// Does nothing when the mapping is empty or the table has no accession column.
pub fn remap_gene_ids(table: &mut DelimitedTable, protein_to_gene: &HashMap<String, String>) -> bool {
    if protein_to_gene.is_empty() {
        return false;
    }
    let Some(col) = table.column(ACCESSION_COLUMN) else {
        tracing::warn!("No {} column; gene ids not mapped", ACCESSION_COLUMN);
        return false;
    };

    let genes: Vec<String> = table
        .rows
        .iter()
        .map(|row| {
            let accession = row[col].as_str();
            protein_to_gene
                .get(accession)
                .cloned()
                .unwrap_or_else(|| accession.to_string())
        })
        .collect();
    table.set_column(GENE_ID_COLUMN, genes);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary() -> DelimitedTable {
        let mut table = DelimitedTable::new(["accession", "go_id", "final_score_A", "final_score_B"]);
        for row in [
            ["p1", "GO:1", "0.9", "0.8"],
            ["p2", "GO:2", "0.1", ""],
            ["p3", "GO:3", "0", "0.5"],
            ["p4", "GO:4", "x", "0.7"],
        ] {
            table.push_row(row.iter().map(|s| s.to_string()).collect());
        }
        table
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 0.25), Some(1.75));
        assert_eq!(percentile(&[4.0, 1.0, 3.0, 2.0], 0.5), Some(2.5));
        assert_eq!(percentile(&[7.0], 0.25), Some(7.0));
        assert_eq!(percentile(&[], 0.25), None);
    }

    #[test]
    fn test_thresholds_ignore_non_positive_and_missing_columns() {
        let columns = vec!["final_score_A".to_string(), "final_score_B".to_string(), "final_score_C".to_string()];
        let thresholds = thresholds(&summary(), &columns, 0.25);

        assert_eq!(thresholds.len(), 2);
        // A: positives [0.1, 0.9] -> 0.1 + 0.8 * 0.25
        assert!((thresholds.get("final_score_A").unwrap() - 0.3).abs() < 1e-12);
        // B: positives [0.5, 0.7, 0.8] -> 0.5 + 0.2 * 0.5
        assert!((thresholds.get("final_score_B").unwrap() - 0.6).abs() < 1e-12);
        assert_eq!(thresholds.get("final_score_C"), None);
    }

    #[test]
    fn test_no_positive_scores_gives_zero_threshold() {
        assert_eq!(threshold_for(&[Some(0.0), None, Some(-1.0)], 0.25), (0.0, 0));
    }

    #[test]
    fn test_five_models_three_votes() {
        let scores = [Some(5.0), Some(0.0), Some(12.0), Some(0.0), Some(8.0)];
        assert_eq!(vote(&scores, &[4.0; 5]), 3);
    }

    #[test]
    fn test_consensus_attaches_votes_and_keeps_majority() {
        let mut thresholds = ThresholdTable::new();
        thresholds.insert("final_score_A", 0.3);
        thresholds.insert("final_score_B", 0.6);
        thresholds.insert("final_score_missing", 0.1);

        let result = consensus(&summary(), &thresholds, 2);

        assert_eq!(result.models_used, 2);
        let col = result.voted.column(VOTE_COLUMN).unwrap();
        let votes: Vec<&str> = (0..4).map(|r| result.voted.cell(r, col)).collect();
        assert_eq!(votes, vec!["2", "0", "0", "1"]);
        assert_eq!(result.consensus.len(), 1);
        assert_eq!(result.consensus.cell(0, 0), "p1");
        assert_eq!(result.vote_distribution, BTreeMap::from([(0, 2), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_filter_per_term() {
        let mut table = DelimitedTable::new(["gene", "term", "score"]);
        for (gene, score) in [("g1", "0.9"), ("g2", "0.2"), ("g3", ""), ("g4", "0.5")] {
            table.push_row(vec![gene.into(), "GO:1".into(), score.into()]);
        }

        let kept = filter_per_term(&table, 0.5);
        let genes: Vec<&str> = (0..kept.len()).map(|r| kept.cell(r, 0)).collect();
        assert_eq!(genes, vec!["g1", "g4"]);

        let unscored = DelimitedTable::new(["gene", "term"]);
        assert_eq!(filter_per_term(&unscored, 0.5), unscored);
    }

    #[test]
    fn test_gene_ids_fall_back_to_accession() {
        let mut table = summary();
        let mapping = HashMap::from([("p1".to_string(), "GENE_A".to_string())]);
        assert!(remap_gene_ids(&mut table, &mapping));

        let col = table.column(GENE_ID_COLUMN).unwrap();
        assert_eq!(table.cell(0, col), "GENE_A");
        assert_eq!(table.cell(1, col), "p2");
        assert!(!remap_gene_ids(&mut table, &HashMap::new()));
    }

    #[test]
    fn test_threshold_table_round_trips_through_rows() {
        let mut thresholds = ThresholdTable::new();
        thresholds.insert("final_score_A", 0.25);
        assert_eq!(ThresholdTable::from_table(&thresholds.to_table()), thresholds);
    }
}
