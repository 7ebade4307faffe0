use crate::formats::fantasia::score_column;
use crate::IntegratorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub consensus: ConsensusConfig,
    #[serde(default)]
    pub fantasia: FantasiaConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Quantile of positive scores used as each model's threshold
    pub quantile: f64,
    /// Models that must clear their threshold for a row to be kept
    pub min_votes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FantasiaConfig {
    pub models: Vec<ModelSpec>,
}

/// A FANTASIA embedding model: display name and score column suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub suffix: String,
}

/// Tool sub-directories of a results root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub kofamscan_dir: String,
    pub interproscan_dir: String,
    pub eggnog_v5_dir: String,
    pub eggnog_v7_dir: String,
    pub fantasia_dir: String,
}

impl ModelSpec {
    pub fn new(name: &str, suffix: &str) -> Self {
        Self {
            name: name.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn score_column(&self) -> String {
        score_column(&self.suffix)
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            quantile: 0.25,
            min_votes: 3,
        }
    }
}

impl Default for FantasiaConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ModelSpec::new("ESM-2", "ESM_L0"),
                ModelSpec::new("ProtT5", "Prot-T5_L0"),
                ModelSpec::new("ProstT5", "Prost-T5_L0"),
                ModelSpec::new("Ankh3-Large", "Ankh3-Large_L0"),
                ModelSpec::new("ESM3c", "ESM3c_L0"),
            ],
        }
    }
}

impl FantasiaConfig {
    /// `final_score_<suffix>` for every model, in registry order
    pub fn score_columns(&self) -> Vec<String> {
        self.models.iter().map(ModelSpec::score_column).collect()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            kofamscan_dir: "kofamscan".to_string(),
            interproscan_dir: "interproscan".to_string(),
            eggnog_v5_dir: "eggnog/v5".to_string(),
            eggnog_v7_dir: "eggnog7".to_string(),
            fantasia_dir: "fantasia".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            fantasia: FantasiaConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), IntegratorError> {
        let quantile = self.consensus.quantile;
        if !(0.0..=1.0).contains(&quantile) {
            return Err(IntegratorError::Config(format!(
                "consensus.quantile must be within [0, 1], got {}",
                quantile
            )));
        }
        if self.consensus.min_votes == 0 {
            return Err(IntegratorError::Config(
                "consensus.min_votes must be at least 1".to_string(),
            ));
        }
        if self.fantasia.models.is_empty() {
            return Err(IntegratorError::Config(
                "fantasia.models must list at least one model".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, IntegratorError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| IntegratorError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), IntegratorError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| IntegratorError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
