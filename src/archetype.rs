use std::fmt;

use serde::Serialize;

/// Fixed tactical taxonomy. Labels 1..=3 always carry these meanings, whatever
/// `k` the clustering ran with; anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Archetype {
    ClosedTactical,
    IntenseBalanced,
    DominantHighScoring,
    Other(u32),
}

impl Archetype {
    pub fn from_label(label: u32) -> Self {
        match label {
            1 => Archetype::ClosedTactical,
            2 => Archetype::IntenseBalanced,
            3 => Archetype::DominantHighScoring,
            other => Archetype::Other(other),
        }
    }

    pub fn label(self) -> u32 {
        match self {
            Archetype::ClosedTactical => 1,
            Archetype::IntenseBalanced => 2,
            Archetype::DominantHighScoring => 3,
            Archetype::Other(label) => label,
        }
    }

    pub fn name(self) -> String {
        match self {
            Archetype::ClosedTactical => "Closed & Tactical".to_string(),
            Archetype::IntenseBalanced => "Intense & Balanced".to_string(),
            Archetype::DominantHighScoring => "Dominant or High-Scoring".to_string(),
            Archetype::Other(label) => format!("Cluster {label}"),
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Archetype::ClosedTactical => "#3498db",
            Archetype::IntenseBalanced => "#e74c3c",
            Archetype::DominantHighScoring => "#2ecc71",
            Archetype::Other(_) => "#95a5a6",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Archetype::ClosedTactical => {
                "Matches with few goals, shots, fouls and cards. Controlled tempo and a defensive focus."
            }
            Archetype::IntenseBalanced => {
                "High intensity with many shots, fouls and cards. Contested possession and a fast tempo."
            }
            Archetype::DominantHighScoring => {
                "High goal counts and wide margins. One side clearly in control."
            }
            Archetype::Other(_) => {
                "Behavioural group without a predefined tactical profile. Read it through the team averages."
            }
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Cluster {})", self.name(), self.label())
    }
}
