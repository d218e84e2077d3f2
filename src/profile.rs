use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;
use serde::{Serialize, Serializer};

use crate::metrics::{DerivedMatchRecord, PASS_COMPLETION_RATIO};

pub const RECENT_MATCHES: usize = 5;

// Per-match stand-ins for zero or missing team figures.
const FALLBACK_POSSESSION: f64 = 50.0;
const FALLBACK_PASSES: f64 = 300.0;
const FALLBACK_FOULS: f64 = 10.0;
const FALLBACK_YELLOW: f64 = 1.0;
const FALLBACK_CORNERS: f64 = 5.0;
const FALLBACK_INTENSITY: f64 = 5.0;
const FALLBACK_PASS_COMPLETION: f64 = 85.0;

/// A value rounded to the precision it is reported with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounded {
    pub value: f64,
    pub decimals: u8,
}

impl Rounded {
    pub fn new(raw: f64, decimals: u8) -> Self {
        let factor = 10f64.powi(i32::from(decimals));
        let value = if raw.is_finite() {
            (raw * factor).round() / factor
        } else {
            0.0
        };
        Self { value, decimals }
    }

    pub fn or_if_zero(self, fallback: f64) -> f64 {
        if self.value == 0.0 { fallback } else { self.value }
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", usize::from(self.decimals), self.value)
    }
}

impl Serialize for Rounded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvgStats {
    pub goals_per_match: Rounded,
    pub shots_per_match: Rounded,
    pub shots_on_target_per_match: Rounded,
    pub possession_avg: Rounded,
    pub passes_per_match: Rounded,
    pub pass_completion: Rounded,
    pub fouls_per_match: Rounded,
    pub yellow_per_match: Rounded,
    pub corners_per_match: Rounded,
    pub intensity_avg: Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    #[serde(rename = "V")]
    Win,
    #[serde(rename = "D")]
    Loss,
    #[serde(rename = "E")]
    Draw,
}

impl MatchResult {
    pub fn from_goals(own: f64, opponent: f64) -> Self {
        if own > opponent {
            MatchResult::Win
        } else if own < opponent {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }

    pub fn code(self) -> char {
        match self {
            MatchResult::Win => 'V',
            MatchResult::Loss => 'D',
            MatchResult::Draw => 'E',
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentMatch {
    pub opponent: String,
    pub result: MatchResult,
    pub cluster: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub name: String,
    pub total_matches: usize,
    pub clusters: BTreeMap<u32, usize>,
    pub main_cluster: u32,
    pub avg_stats: AvgStats,
    pub last_matches: Vec<RecentMatch>,
}

pub fn extract_teams(records: &[DerivedMatchRecord]) -> Vec<String> {
    let mut teams = BTreeSet::new();
    for record in records {
        for name in [&record.team1, &record.team2] {
            let name = name.trim();
            if !name.is_empty() {
                teams.insert(name.to_string());
            }
        }
    }
    teams.into_iter().collect()
}

fn cluster_of(record: &DerivedMatchRecord) -> u32 {
    record.cluster.unwrap_or(1)
}

// Lowest label wins ties.
pub fn main_cluster(histogram: &BTreeMap<u32, usize>) -> u32 {
    let mut best = 1;
    let mut best_count = 0;
    for (&label, &count) in histogram {
        if count > best_count {
            best = label;
            best_count = count;
        }
    }
    best
}

#[derive(Debug, Default)]
struct StatTotals {
    goals: f64,
    shots: f64,
    shots_on_target: f64,
    possession: f64,
    passes: f64,
    passes_completed: f64,
    fouls: f64,
    yellow: f64,
    corners: f64,
    intensity: f64,
}

fn nonzero_or(value: f64, fallback: f64) -> f64 {
    if value != 0.0 && value.is_finite() {
        value
    } else {
        fallback
    }
}

impl StatTotals {
    fn add(&mut self, record: &DerivedMatchRecord, team: &str) {
        let Some((own, _)) = record.sides_for(team) else {
            return;
        };
        let passes = nonzero_or(own.passes, FALLBACK_PASSES);
        self.goals += own.goals;
        self.shots += own.shots;
        self.shots_on_target += own.shots_on_target;
        self.possession += nonzero_or(own.possession, FALLBACK_POSSESSION);
        self.passes += passes;
        self.passes_completed += nonzero_or(own.passes_completed, passes * PASS_COMPLETION_RATIO);
        self.fouls += nonzero_or(own.fouls, FALLBACK_FOULS);
        self.yellow += nonzero_or(own.yellow, FALLBACK_YELLOW);
        self.corners += nonzero_or(own.corners, FALLBACK_CORNERS);
        self.intensity += nonzero_or(record.intensity_index, FALLBACK_INTENSITY);
    }

    fn averages(&self, matches: usize) -> AvgStats {
        let n = matches as f64;
        let pass_completion = if self.passes > 0.0 {
            self.passes_completed / self.passes * 100.0
        } else {
            FALLBACK_PASS_COMPLETION
        };
        AvgStats {
            goals_per_match: Rounded::new(self.goals / n, 2),
            shots_per_match: Rounded::new(self.shots / n, 1),
            shots_on_target_per_match: Rounded::new(self.shots_on_target / n, 1),
            possession_avg: Rounded::new(self.possession / n, 1),
            passes_per_match: Rounded::new(self.passes / n, 0),
            pass_completion: Rounded::new(pass_completion, 1),
            fouls_per_match: Rounded::new(self.fouls / n, 1),
            yellow_per_match: Rounded::new(self.yellow / n, 2),
            corners_per_match: Rounded::new(self.corners / n, 1),
            intensity_avg: Rounded::new(self.intensity / n, 2),
        }
    }
}

pub fn build_profile(team: &str, records: &[DerivedMatchRecord]) -> Option<TeamProfile> {
    let matches: Vec<&DerivedMatchRecord> = records.iter().filter(|r| r.involves(team)).collect();
    if matches.is_empty() {
        return None;
    }

    let mut clusters = BTreeMap::new();
    let mut totals = StatTotals::default();
    for record in &matches {
        *clusters.entry(cluster_of(record)).or_insert(0) += 1;
        totals.add(record, team);
    }

    let last_matches = matches[matches.len().saturating_sub(RECENT_MATCHES)..]
        .iter()
        .filter_map(|record| {
            let (own, opp) = record.sides_for(team)?;
            Some(RecentMatch {
                opponent: record.opponent_of(team)?.to_string(),
                result: MatchResult::from_goals(own.goals, opp.goals),
                cluster: cluster_of(record),
            })
        })
        .collect();

    Some(TeamProfile {
        name: team.to_string(),
        total_matches: matches.len(),
        main_cluster: main_cluster(&clusters),
        clusters,
        avg_stats: totals.averages(matches.len()),
        last_matches,
    })
}

pub fn build_profiles(records: &[DerivedMatchRecord]) -> BTreeMap<String, TeamProfile> {
    let mut profiles = BTreeMap::new();
    for team in extract_teams(records) {
        let Some(profile) = build_profile(&team, records) else {
            continue;
        };
        debug!(
            "profile {}: {} matches, main cluster {}, {} goals/match",
            profile.name, profile.total_matches, profile.main_cluster, profile.avg_stats.goals_per_match
        );
        profiles.insert(team, profile);
    }
    profiles
}
