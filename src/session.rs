use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::explorer::{self, DatasetStats, MatchFilter, MatchTable};
use crate::features::{self, Feature};
use crate::insight::{self, InsightSet, MatchupPlan, RadarAxis, RivalReport};
use crate::kmeans::{self, KMeansResult};
use crate::metrics::{self, DerivedMatchRecord};
use crate::profile::{self, TeamProfile};
use crate::record::RawRecord;
use crate::schema::{self, CanonicalColumnMap};

/// Everything one analysis pass produced. Immutable once built; a re-run
/// produces a new snapshot instead of touching this one.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot {
    pub generated_at: String,
    pub config: AnalysisConfig,
    pub columns: CanonicalColumnMap,
    pub numeric_columns: Vec<String>,
    pub features: Vec<Feature>,
    pub clustering: KMeansResult,
    pub derived: Vec<DerivedMatchRecord>,
    pub teams: Vec<String>,
    pub profiles: BTreeMap<String, TeamProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub own: String,
    pub rival: String,
    pub insights: InsightSet,
    pub matchup: MatchupPlan,
    pub radar: Vec<RadarAxis>,
}

/// Runs mapping, derivation, clustering and aggregation over `records`.
pub fn run_analysis<R: Rng + ?Sized>(
    records: &[RawRecord],
    config: &AnalysisConfig,
    rng: &mut R,
) -> AnalysisSnapshot {
    let columns = schema::resolve_dataset(records);
    let numeric_columns = features::detect_numeric_columns(records);
    let derived = metrics::derive_records(records, &columns);

    let selected = features::select_features(&derived);
    let matrix = features::prepare_matrix(
        features::build_matrix(&derived, &selected),
        config.standardize,
    );
    let clustering = kmeans::kmeans(&matrix, config.clusters, rng);
    let derived = metrics::with_clusters(&derived, &clustering.labels);

    let teams = profile::extract_teams(&derived);
    let profiles = profile::build_profiles(&derived);

    info!(
        "analysis: {} matches, {}/{} columns resolved, {} features, k={} ({} iterations), {} teams",
        derived.len(),
        columns.resolved_count(),
        schema::COLUMN_PATTERNS.len(),
        selected.len(),
        clustering.k,
        clustering.iterations,
        profiles.len()
    );

    AnalysisSnapshot {
        generated_at: chrono::Utc::now().to_rfc3339(),
        config: *config,
        columns,
        numeric_columns,
        features: selected,
        clustering,
        derived,
        teams,
        profiles,
    }
}

impl AnalysisSnapshot {
    pub fn empty(config: AnalysisConfig) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            config,
            columns: CanonicalColumnMap::default(),
            numeric_columns: Vec::new(),
            features: Vec::new(),
            clustering: KMeansResult::empty(),
            derived: Vec::new(),
            teams: Vec::new(),
            profiles: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            total_matches: self.derived.len(),
            total_teams: self.teams.len(),
            numeric_columns: self.numeric_columns.len(),
            features_selected: self.features.len(),
        }
    }

    pub fn profile(&self, team: &str) -> Result<&TeamProfile> {
        self.lookup(team, "own")
    }

    fn lookup(&self, team: &str, role: &'static str) -> Result<&TeamProfile> {
        let team = team.trim();
        if team.is_empty() {
            return Err(AnalysisError::SelectionRequired { role });
        }
        self.profiles
            .get(team)
            .ok_or_else(|| AnalysisError::MissingProfile {
                team: team.to_string(),
            })
    }

    pub fn compare(&self, own: &str, rival: &str) -> Result<Comparison> {
        let own = self.lookup(own, "own")?;
        let rival = self.lookup(rival, "rival")?;
        Ok(Comparison {
            own: own.name.clone(),
            rival: rival.name.clone(),
            insights: insight::compare_teams(own, rival),
            matchup: insight::matchup_plan(own, rival),
            radar: insight::radar_axes(&own.avg_stats, &rival.avg_stats),
        })
    }

    pub fn rival_report(&self, rival: &str) -> Result<RivalReport> {
        Ok(insight::rival_report(self.lookup(rival, "rival")?))
    }

    pub fn filter_matches(&self, filter: &MatchFilter) -> MatchTable {
        explorer::filter_matches(&self.derived, filter)
    }

    /// Argentina vs Brazil when both are present, otherwise the first team on each side.
    pub fn default_matchup(&self) -> Option<(String, String)> {
        let first = self.teams.first()?;
        let own = find_team(&self.teams, &["argentina"]).unwrap_or(first);
        let rival = find_team(&self.teams, &["brazil", "brasil"]).unwrap_or(first);
        Some((own.clone(), rival.clone()))
    }
}

fn find_team<'a>(teams: &'a [String], needles: &[&str]) -> Option<&'a String> {
    teams.iter().find(|team| {
        let lower = team.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}

/// Caller-owned analysis context. Readers hold `Arc` snapshots, so a re-run
/// swaps in a complete new generation and never exposes a half-built one.
pub struct AnalysisSession {
    config: AnalysisConfig,
    records: Vec<RawRecord>,
    snapshot: Arc<AnalysisSnapshot>,
}

impl AnalysisSession {
    pub fn new(records: Vec<RawRecord>, config: AnalysisConfig) -> Self {
        Self {
            snapshot: Arc::new(AnalysisSnapshot::empty(config)),
            config,
            records,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Recomputes everything with the configured seed (or OS entropy when unset).
    pub fn rerun(&mut self) -> Arc<AnalysisSnapshot> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.rerun_with_rng(&mut rng)
    }

    pub fn rerun_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Arc<AnalysisSnapshot> {
        let next = Arc::new(run_analysis(&self.records, &self.config, rng));
        self.snapshot = Arc::clone(&next);
        next
    }

    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn require_snapshot(&self) -> Result<Arc<AnalysisSnapshot>> {
        if self.snapshot.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }
        Ok(self.snapshot())
    }
}
