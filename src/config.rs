use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const DEFAULT_CLUSTERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Requested k. Clamped into `[1, matches]` at clustering time.
    pub clusters: usize,
    /// Z-score the feature matrix before clustering.
    pub standardize: bool,
    /// Fixed seed for centroid selection; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            standardize: true,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Reads `TACTICS_CLUSTERS`, `TACTICS_STANDARDIZE` and `TACTICS_SEED`.
    /// Absent or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let clusters = std::env::var("TACTICS_CLUSTERS")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_CLUSTERS)
            .max(1);
        let standardize = std::env::var("TACTICS_STANDARDIZE")
            .ok()
            .and_then(|val| parse_flag(&val))
            .unwrap_or(true);
        let seed = std::env::var("TACTICS_SEED")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok());
        Self {
            clusters,
            standardize,
            seed,
        }
    }

    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters.max(1);
        self
    }

    pub fn with_standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Strict variant for explicit user input (CLI flags).
    pub fn parse_clusters(raw: &str) -> Result<usize> {
        match raw.trim().parse::<usize>() {
            Ok(k) if k >= 1 => Ok(k),
            _ => Err(AnalysisError::InvalidConfig(format!(
                "cluster count must be a positive integer, got {raw:?}"
            ))),
        }
    }

    pub fn parse_seed(raw: &str) -> Result<u64> {
        raw.trim()
            .parse::<u64>()
            .map_err(|_| AnalysisError::InvalidConfig(format!("seed must be a u64, got {raw:?}")))
    }
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag(" no "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn explicit_cluster_count_must_be_positive() {
        assert_eq!(AnalysisConfig::parse_clusters("4"), Ok(4));
        assert!(AnalysisConfig::parse_clusters("0").is_err());
        assert!(AnalysisConfig::parse_clusters("three").is_err());
        assert_eq!(AnalysisConfig::default().with_clusters(0).clusters, 1);
    }
}
