use serde::Serialize;

use crate::metrics::{DerivedMatchRecord, parse_numeric_text};
use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TotalGoals,
    TotalShots,
    TotalShotsOnTarget,
    TotalFouls,
    TotalYellow,
    TotalCorners,
    PossessionMean,
    PassesCompletedPct,
    IntensityIndex,
    GoalDifference,
    ShotEfficiency,
    ShotsOnTargetPct,
}

pub const CANDIDATE_FEATURES: [Feature; 12] = [
    Feature::TotalGoals,
    Feature::TotalShots,
    Feature::TotalShotsOnTarget,
    Feature::TotalFouls,
    Feature::TotalYellow,
    Feature::TotalCorners,
    Feature::PossessionMean,
    Feature::PassesCompletedPct,
    Feature::IntensityIndex,
    Feature::GoalDifference,
    Feature::ShotEfficiency,
    Feature::ShotsOnTargetPct,
];

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::TotalGoals => "total_goals",
            Feature::TotalShots => "total_shots",
            Feature::TotalShotsOnTarget => "total_shots_on_target",
            Feature::TotalFouls => "total_fouls",
            Feature::TotalYellow => "total_yellow",
            Feature::TotalCorners => "total_corners",
            Feature::PossessionMean => "possession_mean",
            Feature::PassesCompletedPct => "passes_completed_pct",
            Feature::IntensityIndex => "intensity_index",
            Feature::GoalDifference => "goal_difference",
            Feature::ShotEfficiency => "shot_efficiency",
            Feature::ShotsOnTargetPct => "shots_on_target_pct",
        }
    }

    pub fn value(self, record: &DerivedMatchRecord) -> f64 {
        match self {
            Feature::TotalGoals => record.total_goals,
            Feature::TotalShots => record.total_shots,
            Feature::TotalShotsOnTarget => record.total_shots_on_target,
            Feature::TotalFouls => record.total_fouls,
            Feature::TotalYellow => record.total_yellow,
            Feature::TotalCorners => record.total_corners,
            Feature::PossessionMean => record.possession_mean,
            Feature::PassesCompletedPct => record.passes_completed_pct,
            Feature::IntensityIndex => record.intensity_index,
            Feature::GoalDifference => record.goal_difference,
            Feature::ShotEfficiency => record.shot_efficiency,
            Feature::ShotsOnTargetPct => record.shots_on_target_pct,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureMatrix {
    pub features: Vec<Feature>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[j])
    }
}

// All-zero columns are dropped.
pub fn select_features(records: &[DerivedMatchRecord]) -> Vec<Feature> {
    CANDIDATE_FEATURES
        .iter()
        .copied()
        .filter(|f| {
            records.iter().any(|r| {
                let v = f.value(r);
                v.is_finite() && v != 0.0
            })
        })
        .collect()
}

pub fn build_matrix(records: &[DerivedMatchRecord], features: &[Feature]) -> FeatureMatrix {
    let rows = records
        .iter()
        .map(|r| {
            features
                .iter()
                .map(|f| {
                    let v = f.value(r);
                    if v.is_finite() { v } else { 0.0 }
                })
                .collect()
        })
        .collect();
    FeatureMatrix {
        features: features.to_vec(),
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnScale {
    pub mean: f64,
    /// Population standard deviation, with zero replaced by 1.
    pub std_dev: f64,
}

pub fn standardize(matrix: &FeatureMatrix) -> (FeatureMatrix, Vec<ColumnScale>) {
    if matrix.is_empty() {
        return (matrix.clone(), Vec::new());
    }

    let n = matrix.n_rows() as f64;
    let scales: Vec<ColumnScale> = (0..matrix.n_cols())
        .map(|j| {
            let mean = matrix.column(j).sum::<f64>() / n;
            let sd = (matrix.column(j).map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();
            ColumnScale {
                mean,
                std_dev: if sd > 0.0 { sd } else { 1.0 },
            }
        })
        .collect();

    let rows = matrix
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&scales)
                .map(|(v, scale)| (v - scale.mean) / scale.std_dev)
                .collect()
        })
        .collect();

    (
        FeatureMatrix {
            features: matrix.features.clone(),
            rows,
        },
        scales,
    )
}

pub fn prepare_matrix(matrix: FeatureMatrix, scale: bool) -> FeatureMatrix {
    if scale {
        standardize(&matrix).0
    } else {
        matrix
    }
}

const NUMERIC_SAMPLE_ROWS: usize = 30;

/// A column is numeric when at least `min(10, 0.4 * rows)` sampled cells parse.
pub fn detect_numeric_columns(records: &[RawRecord]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let sample = &records[..records.len().min(NUMERIC_SAMPLE_ROWS)];
    let threshold = 10f64.min(records.len() as f64 * 0.4);

    first
        .columns()
        .filter(|column| {
            let hits = sample
                .iter()
                .filter_map(|row| row.get(column))
                .filter(|cell| !cell.is_blank())
                .filter(|cell| match cell.as_text() {
                    Some(text) => parse_numeric_text(text).is_some(),
                    None => true,
                })
                .count();
            hits as f64 >= threshold
        })
        .map(str::to_string)
        .collect()
}
