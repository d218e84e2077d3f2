use serde::Serialize;

use crate::record::{RawRecord, RawValue};
use crate::schema::{CanonicalColumnMap, CanonicalField};

pub const SHOTS_ON_TARGET_RATIO: f64 = 0.35;
pub const PASS_COMPLETION_RATIO: f64 = 0.85;
pub const DEFAULT_POSSESSION: f64 = 50.0;
pub const DEFAULT_PASS_COMPLETION_PCT: f64 = 85.0;
pub const DEFAULT_SHOTS_ON_TARGET_PCT: f64 = 35.0;

/// Null, blank, `-` and anything unparseable read as zero.
pub fn parse_cell(value: &RawValue) -> f64 {
    match value {
        RawValue::Null => 0.0,
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) => 0.0,
        RawValue::Text(raw) => parse_numeric_text(raw).unwrap_or(0.0),
    }
}

pub fn parse_numeric_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    let cleaned = trimmed.replacen('%', "", 1).replacen(',', ".", 1);
    cleaned.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn cell_text(value: &RawValue) -> String {
    match value {
        RawValue::Null => String::new(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => s.trim().to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TeamStatBlock {
    pub goals: f64,
    pub shots: f64,
    pub shots_on_target: f64,
    pub possession: f64,
    pub passes: f64,
    pub passes_completed: f64,
    pub fouls: f64,
    pub yellow: f64,
    pub corners: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMatchRecord {
    pub index: usize,
    pub team1: String,
    pub team2: String,
    pub match_label: Option<String>,
    pub team1_stats: TeamStatBlock,
    pub team2_stats: TeamStatBlock,
    pub total_goals: f64,
    pub total_shots: f64,
    pub total_shots_on_target: f64,
    pub total_fouls: f64,
    pub total_yellow: f64,
    pub total_corners: f64,
    pub possession_mean: f64,
    pub passes_completed_pct: f64,
    pub intensity_index: f64,
    pub goal_difference: f64,
    pub shot_efficiency: f64,
    pub shots_on_target_pct: f64,
    pub cluster: Option<u32>,
}

impl DerivedMatchRecord {
    pub fn display_label(&self) -> String {
        self.match_label
            .clone()
            .unwrap_or_else(|| format!("Match {}", self.index + 1))
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn sides_for(&self, team: &str) -> Option<(&TeamStatBlock, &TeamStatBlock)> {
        if self.team1 == team {
            Some((&self.team1_stats, &self.team2_stats))
        } else if self.team2 == team {
            Some((&self.team2_stats, &self.team1_stats))
        } else {
            None
        }
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.team1 == team {
            Some(self.team2.as_str())
        } else if self.team2 == team {
            Some(self.team1.as_str())
        } else {
            None
        }
    }
}

struct Cells<'a> {
    row: &'a RawRecord,
    columns: &'a CanonicalColumnMap,
}

impl Cells<'_> {
    fn num(&self, field: CanonicalField) -> f64 {
        self.columns
            .get(field)
            .and_then(|column| self.row.get(column))
            .map(parse_cell)
            .unwrap_or(0.0)
    }

    // None when the column was never resolved.
    fn resolved_num(&self, field: CanonicalField) -> Option<f64> {
        self.columns.get(field).map(|column| {
            self.row.get(column).map(parse_cell).unwrap_or(0.0)
        })
    }

    fn text(&self, field: CanonicalField) -> Option<String> {
        let column = self.columns.get(field)?;
        Some(self.row.get(column).map(cell_text).unwrap_or_default())
    }
}

pub fn derive_record(index: usize, row: &RawRecord, columns: &CanonicalColumnMap) -> DerivedMatchRecord {
    use CanonicalField as F;

    let cells = Cells { row, columns };

    let (team1, team2, match_label) = match (cells.text(F::Team1), cells.text(F::Team2)) {
        (Some(t1), Some(t2)) => {
            let label = format!("{t1} vs {t2}");
            (t1, t2, Some(label))
        }
        _ => (String::new(), String::new(), None),
    };

    let goals1 = cells.num(F::Goals1);
    let goals2 = cells.num(F::Goals2);
    let shots1 = cells.num(F::Shots1);
    let shots2 = cells.num(F::Shots2);
    let on_target1 = cells.num(F::ShotsOnTarget1);
    let on_target2 = cells.num(F::ShotsOnTarget2);
    let possession1 = cells.num(F::Possession1);
    let possession2 = cells.num(F::Possession2);
    let passes1 = cells.num(F::Passes1);
    let passes2 = cells.num(F::Passes2);
    let completed1 = cells
        .resolved_num(F::PassesCompleted1)
        .unwrap_or(passes1 * PASS_COMPLETION_RATIO);
    let completed2 = cells
        .resolved_num(F::PassesCompleted2)
        .unwrap_or(passes2 * PASS_COMPLETION_RATIO);
    let fouls1 = cells.num(F::Fouls1);
    let fouls2 = cells.num(F::Fouls2);
    let yellow1 = cells.num(F::Yellow1);
    let yellow2 = cells.num(F::Yellow2);
    let corners1 = cells.num(F::Corners1);
    let corners2 = cells.num(F::Corners2);

    let total_shots = shots1 + shots2;
    let total_passes = passes1 + passes2;
    let possession_sum = possession1 + possession2;

    DerivedMatchRecord {
        index,
        team1,
        team2,
        match_label,
        team1_stats: TeamStatBlock {
            goals: goals1,
            shots: shots1,
            shots_on_target: estimate_on_target(on_target1, shots1),
            possession: if possession1 > 0.0 { possession1 } else { DEFAULT_POSSESSION },
            passes: passes1,
            passes_completed: completed1,
            fouls: fouls1,
            yellow: yellow1,
            corners: corners1,
        },
        team2_stats: TeamStatBlock {
            goals: goals2,
            shots: shots2,
            shots_on_target: estimate_on_target(on_target2, shots2),
            possession: if possession2 > 0.0 { possession2 } else { DEFAULT_POSSESSION },
            passes: passes2,
            passes_completed: completed2,
            fouls: fouls2,
            yellow: yellow2,
            corners: corners2,
        },
        total_goals: goals1 + goals2,
        total_shots,
        total_shots_on_target: on_target1 + on_target2,
        total_fouls: fouls1 + fouls2,
        total_yellow: yellow1 + yellow2,
        total_corners: corners1 + corners2,
        possession_mean: if possession_sum > 0.0 {
            possession_sum / 2.0
        } else {
            DEFAULT_POSSESSION
        },
        passes_completed_pct: if total_passes > 0.0 {
            (completed1 + completed2) / total_passes * 100.0
        } else {
            DEFAULT_PASS_COMPLETION_PCT
        },
        intensity_index: (shots1 + shots2 + fouls1 + fouls2 + yellow1 + yellow2) / 6.0,
        goal_difference: (goals1 - goals2).abs(),
        shot_efficiency: if total_shots > 0.0 {
            (goals1 + goals2) / total_shots * 100.0
        } else {
            0.0
        },
        shots_on_target_pct: if total_shots > 0.0 {
            (on_target1 + on_target2) / total_shots * 100.0
        } else {
            DEFAULT_SHOTS_ON_TARGET_PCT
        },
        cluster: None,
    }
}

fn estimate_on_target(on_target: f64, shots: f64) -> f64 {
    if on_target > 0.0 {
        on_target
    } else {
        shots * SHOTS_ON_TARGET_RATIO
    }
}

pub fn derive_records(rows: &[RawRecord], columns: &CanonicalColumnMap) -> Vec<DerivedMatchRecord> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| derive_record(idx, row, columns))
        .collect()
}

pub fn with_clusters(records: &[DerivedMatchRecord], labels: &[u32]) -> Vec<DerivedMatchRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| DerivedMatchRecord {
            cluster: labels.get(i).copied(),
            ..record.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::resolve_columns;

    fn columns() -> CanonicalColumnMap {
        resolve_columns(&[
            "team1",
            "team2",
            "number of goals team1",
            "number of goals team2",
            "total attempts team1",
            "total attempts team2",
            "possession team1",
            "possession team2",
            "passes team1",
            "passes team2",
        ])
    }

    #[test]
    fn parse_cell_handles_loader_noise() {
        assert_eq!(parse_cell(&RawValue::from("58%")), 58.0);
        assert_eq!(parse_cell(&RawValue::from("1,5")), 1.5);
        assert_eq!(parse_cell(&RawValue::from(" 12 ")), 12.0);
        assert_eq!(parse_cell(&RawValue::from("-")), 0.0);
        assert_eq!(parse_cell(&RawValue::from("")), 0.0);
        assert_eq!(parse_cell(&RawValue::from("n/a")), 0.0);
        assert_eq!(parse_cell(&RawValue::from("NaN")), 0.0);
        assert_eq!(parse_cell(&RawValue::Null), 0.0);
        assert_eq!(parse_cell(&RawValue::Number(3.0)), 3.0);
        assert_eq!(parse_cell(&RawValue::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn derives_totals_and_estimates() {
        let row = RawRecord::new()
            .with("team1", "ARGENTINA")
            .with("team2", "FRANCE")
            .with("number of goals team1", "3")
            .with("number of goals team2", "3")
            .with("total attempts team1", "20")
            .with("total attempts team2", "10")
            .with("possession team1", "46%")
            .with("possession team2", "40%")
            .with("passes team1", "600")
            .with("passes team2", "400");
        let d = derive_record(0, &row, &columns());

        assert_eq!(d.match_label.as_deref(), Some("ARGENTINA vs FRANCE"));
        assert_eq!(d.total_goals, 6.0);
        assert_eq!(d.goal_difference, 0.0);
        assert_eq!(d.total_shots, 30.0);
        assert!((d.shot_efficiency - 20.0).abs() < 1e-9);
        assert!((d.possession_mean - 43.0).abs() < 1e-9);
        // No on-target column: match total stays raw, team blocks are estimated.
        assert_eq!(d.total_shots_on_target, 0.0);
        assert_eq!(d.shots_on_target_pct, 0.0);
        assert!((d.team1_stats.shots_on_target - 7.0).abs() < 1e-9);
        // No completed-pass column: estimated at 85%.
        assert!((d.team2_stats.passes_completed - 340.0).abs() < 1e-9);
        assert!((d.passes_completed_pct - 85.0).abs() < 1e-9);
        assert!((d.intensity_index - 5.0).abs() < 1e-9);
        assert_eq!(d.cluster, None);
    }

    #[test]
    fn empty_row_yields_fallbacks() {
        let d = derive_record(4, &RawRecord::new(), &CanonicalColumnMap::default());
        assert_eq!(d.display_label(), "Match 5");
        assert_eq!(d.total_goals, 0.0);
        assert_eq!(d.possession_mean, DEFAULT_POSSESSION);
        assert_eq!(d.passes_completed_pct, DEFAULT_PASS_COMPLETION_PCT);
        assert_eq!(d.shots_on_target_pct, DEFAULT_SHOTS_ON_TARGET_PCT);
        assert_eq!(d.shot_efficiency, 0.0);
        assert_eq!(d.team1_stats.possession, DEFAULT_POSSESSION);
        assert!(d.team1.is_empty() && d.team2.is_empty());
    }

    #[test]
    fn with_clusters_leaves_input_untouched() {
        let records = derive_records(&[RawRecord::new(), RawRecord::new()], &columns());
        let labelled = with_clusters(&records, &[2, 1]);
        assert_eq!(records[0].cluster, None);
        assert_eq!(labelled[0].cluster, Some(2));
        assert_eq!(labelled[1].cluster, Some(1));
    }
}
