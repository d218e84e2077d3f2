use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Team1,
    Team2,
    Goals1,
    Goals2,
    Possession1,
    Possession2,
    Shots1,
    Shots2,
    ShotsOnTarget1,
    ShotsOnTarget2,
    Passes1,
    Passes2,
    PassesCompleted1,
    PassesCompleted2,
    Fouls1,
    Fouls2,
    Yellow1,
    Yellow2,
    Corners1,
    Corners2,
}

impl CanonicalField {
    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::Team1 => "team1",
            CanonicalField::Team2 => "team2",
            CanonicalField::Goals1 => "goals1",
            CanonicalField::Goals2 => "goals2",
            CanonicalField::Possession1 => "possession1",
            CanonicalField::Possession2 => "possession2",
            CanonicalField::Shots1 => "shots1",
            CanonicalField::Shots2 => "shots2",
            CanonicalField::ShotsOnTarget1 => "shots_on_target1",
            CanonicalField::ShotsOnTarget2 => "shots_on_target2",
            CanonicalField::Passes1 => "passes1",
            CanonicalField::Passes2 => "passes2",
            CanonicalField::PassesCompleted1 => "passes_completed1",
            CanonicalField::PassesCompleted2 => "passes_completed2",
            CanonicalField::Fouls1 => "fouls1",
            CanonicalField::Fouls2 => "fouls2",
            CanonicalField::Yellow1 => "yellow1",
            CanonicalField::Yellow2 => "yellow2",
            CanonicalField::Corners1 => "corners1",
            CanonicalField::Corners2 => "corners2",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonical field -> candidate column-name fragments, tried in order.
/// This table is a compatibility contract with existing CSV exports; keep it verbatim.
pub const COLUMN_PATTERNS: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::Team1,
        &["team1", "team_1", "home_team", "home team", "home", "team"],
    ),
    (
        CanonicalField::Team2,
        &["team2", "team_2", "away_team", "away team", "away"],
    ),
    (
        CanonicalField::Goals1,
        &[
            "number of goals team1",
            "number_of_goals_team1",
            "goals_team1",
            "goals1",
            "goals team1",
            "score1",
        ],
    ),
    (
        CanonicalField::Goals2,
        &[
            "number of goals team2",
            "number_of_goals_team2",
            "goals_team2",
            "goals2",
            "goals team2",
            "score2",
        ],
    ),
    (
        CanonicalField::Possession1,
        &[
            "possession team1",
            "possession_team1",
            "possessionteam1",
            "team1 possession",
            "possesion team1",
        ],
    ),
    (
        CanonicalField::Possession2,
        &[
            "possession team2",
            "possession_team2",
            "possessionteam2",
            "team2 possession",
            "possesion team2",
        ],
    ),
    (
        CanonicalField::Shots1,
        &[
            "total attempts team1",
            "total_attempts_team1",
            "shots_team1",
            "team1 shots",
            "shots team1",
            "attempts team1",
        ],
    ),
    (
        CanonicalField::Shots2,
        &[
            "total attempts team2",
            "total_attempts_team2",
            "shots_team2",
            "team2 shots",
            "shots team2",
            "attempts team2",
        ],
    ),
    (
        CanonicalField::ShotsOnTarget1,
        &[
            "on target attempts team1",
            "on_target_attempts_team1",
            "shots on target team1",
            "on target team1",
        ],
    ),
    (
        CanonicalField::ShotsOnTarget2,
        &[
            "on target attempts team2",
            "on_target_attempts_team2",
            "shots on target team2",
            "on target team2",
        ],
    ),
    (
        CanonicalField::Passes1,
        &["passes team1", "passes_team1", "team1 passes", "total passes team1"],
    ),
    (
        CanonicalField::Passes2,
        &["passes team2", "passes_team2", "team2 passes", "total passes team2"],
    ),
    (
        CanonicalField::PassesCompleted1,
        &[
            "passes_completed_team1",
            "completed_passes_team1",
            "completed passes team1",
            "accurate passes team1",
        ],
    ),
    (
        CanonicalField::PassesCompleted2,
        &[
            "passes_completed_team2",
            "completed_passes_team2",
            "completed passes team2",
            "accurate passes team2",
        ],
    ),
    (
        CanonicalField::Fouls1,
        &[
            "fouls team1",
            "fouls_team1",
            "fouls_committed_team1",
            "team1 fouls",
            "fouls committed team1",
        ],
    ),
    (
        CanonicalField::Fouls2,
        &[
            "fouls team2",
            "fouls_team2",
            "fouls_committed_team2",
            "team2 fouls",
            "fouls committed team2",
        ],
    ),
    (
        CanonicalField::Yellow1,
        &[
            "yellow cards team1",
            "yellow_cards_team1",
            "team1 yellow cards",
            "yellow team1",
        ],
    ),
    (
        CanonicalField::Yellow2,
        &[
            "yellow cards team2",
            "yellow_cards_team2",
            "team2 yellow cards",
            "yellow team2",
        ],
    ),
    (
        CanonicalField::Corners1,
        &["corners team1", "corners_team1", "team1 corners", "corner kicks team1"],
    ),
    (
        CanonicalField::Corners2,
        &["corners team2", "corners_team2", "team2 corners", "corner kicks team2"],
    ),
];

/// Resolved source column per canonical field. Unresolved fields are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalColumnMap {
    resolved: BTreeMap<CanonicalField, String>,
}

impl CanonicalColumnMap {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.resolved.get(&field).map(String::as_str)
    }

    pub fn is_resolved(&self, field: CanonicalField) -> bool {
        self.resolved.contains_key(&field)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn unresolved(&self) -> Vec<CanonicalField> {
        COLUMN_PATTERNS
            .iter()
            .map(|(field, _)| *field)
            .filter(|field| !self.resolved.contains_key(field))
            .collect()
    }
}

/// First column (in source order) whose lowercased name contains a pattern,
/// trying patterns in their listed order.
pub fn find_column<'a>(columns: &[&'a str], patterns: &[&str]) -> Option<&'a str> {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
    for pattern in patterns {
        let needle = pattern.to_lowercase();
        if let Some(idx) = lowered.iter().position(|c| c.contains(&needle)) {
            return Some(columns[idx]);
        }
    }
    None
}

pub fn resolve_columns(columns: &[&str]) -> CanonicalColumnMap {
    let mut resolved = BTreeMap::new();
    for (field, patterns) in COLUMN_PATTERNS {
        match find_column(columns, patterns) {
            Some(column) => {
                debug!("column {field} resolved to {column:?}");
                resolved.insert(*field, column.to_string());
            }
            None => warn!("column {field} not found, falling back to defaults"),
        }
    }
    CanonicalColumnMap { resolved }
}

/// Resolves against the columns of the first record; an empty dataset resolves nothing.
pub fn resolve_dataset(records: &[RawRecord]) -> CanonicalColumnMap {
    let Some(first) = records.first() else {
        return CanonicalColumnMap::default();
    };
    let columns: Vec<&str> = first.columns().collect();
    resolve_columns(&columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_cup_headers_resolve() {
        let columns = [
            "team1",
            "team2",
            "possession team1",
            "possession team2",
            "number of goals team1",
            "number of goals team2",
            "total attempts team1",
            "total attempts team2",
            "on target attempts team1",
            "on target attempts team2",
            "passes team1",
            "passes team2",
            "passes completed team1",
            "passes completed team2",
            "fouls against team1",
            "fouls against team2",
            "yellow cards team1",
            "yellow cards team2",
            "corners team1",
            "corners team2",
        ];
        let map = resolve_columns(&columns);
        assert_eq!(map.get(CanonicalField::Team1), Some("team1"));
        assert_eq!(map.get(CanonicalField::Goals2), Some("number of goals team2"));
        assert_eq!(map.get(CanonicalField::Passes1), Some("passes team1"));
        assert_eq!(map.get(CanonicalField::Shots2), Some("total attempts team2"));
        // "fouls against" and "passes completed" match none of the listed fragments.
        assert!(!map.is_resolved(CanonicalField::Fouls1));
        assert!(!map.is_resolved(CanonicalField::PassesCompleted2));
        assert_eq!(map.resolved_count(), 16);
    }

    #[test]
    fn pattern_order_beats_column_order() {
        let columns = ["Home", "Away", "Home Team"];
        // "home team" is tried before the bare "home", so the later column wins.
        assert_eq!(
            find_column(&columns, &["home_team", "home team", "home"]),
            Some("Home Team")
        );
        assert_eq!(find_column(&columns, &["away"]), Some("Away"));
        assert_eq!(find_column(&columns, &["visitor"]), None);
    }

    #[test]
    fn empty_dataset_resolves_nothing() {
        let map = resolve_dataset(&[]);
        assert_eq!(map.resolved_count(), 0);
        assert_eq!(map.unresolved().len(), COLUMN_PATTERNS.len());
    }
}
