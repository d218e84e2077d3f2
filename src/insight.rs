use serde::Serialize;

use crate::archetype::Archetype;
use crate::profile::{AvgStats, TeamProfile};

// Comparison thresholds. Output compatibility depends on these exact values.
const POSSESSION_MARGIN: f64 = 5.0;
const PASS_ACCURACY_MARGIN: f64 = 3.0;
const INTENSITY_MARGIN: f64 = 1.0;
const FOULS_MARGIN: f64 = 2.0;
const GOALS_MARGIN: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSet {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub general_insights: Vec<String>,
}

impl InsightSet {
    /// No rule fired in either direction. `general_insights` is not consulted since it
    /// always ends with the matchup line.
    pub fn is_balanced(&self) -> bool {
        self.strengths.is_empty() && self.weaknesses.is_empty()
    }
}

/// Profile averages as the comparison reads them, with zero replaced by a neutral value.
#[derive(Debug, Clone, Copy)]
struct ComparedStats {
    possession: f64,
    pass_accuracy: f64,
    intensity: f64,
    fouls: f64,
    goals: f64,
}

impl ComparedStats {
    fn from_avg(stats: &AvgStats) -> Self {
        Self {
            possession: stats.possession_avg.or_if_zero(50.0),
            pass_accuracy: stats.pass_completion.or_if_zero(85.0),
            intensity: stats.intensity_avg.or_if_zero(5.0),
            fouls: stats.fouls_per_match.or_if_zero(10.0),
            goals: stats.goals_per_match.or_if_zero(1.2),
        }
    }
}

/// Rule-based comparison of `own` against `rival`. Every rule is evaluated
/// independently and the closing line always names both dominant clusters.
pub fn compare_teams(own: &TeamProfile, rival: &TeamProfile) -> InsightSet {
    let mut out = InsightSet::default();
    let o = ComparedStats::from_avg(&own.avg_stats);
    let r = ComparedStats::from_avg(&rival.avg_stats);

    if o.possession > r.possession + POSSESSION_MARGIN {
        out.strengths.push("Possession superiority".to_string());
        out.general_insights.push(format!(
            "Your team dominates possession ({:.1}% vs {:.1}%). Consider a control-based game.",
            o.possession, r.possession
        ));
    } else if r.possession > o.possession + POSSESSION_MARGIN {
        out.weaknesses.push("Possession inferiority".to_string());
        out.general_insights.push(format!(
            "The rival usually has more of the ball ({:.1}% vs {:.1}%). Prepare to defend in an organised block.",
            r.possession, o.possession
        ));
    }

    if o.pass_accuracy > r.pass_accuracy + PASS_ACCURACY_MARGIN {
        out.strengths.push("Better passing accuracy".to_string());
        out.general_insights.push(format!(
            "Your team passes more accurately ({:.1}% vs {:.1}%).",
            o.pass_accuracy, r.pass_accuracy
        ));
    } else if r.pass_accuracy > o.pass_accuracy + PASS_ACCURACY_MARGIN {
        out.weaknesses.push("Worse passing accuracy".to_string());
        out.general_insights.push(format!(
            "The rival passes more accurately ({:.1}% vs {:.1}%). Consider a high press to force errors.",
            r.pass_accuracy, o.pass_accuracy
        ));
    }

    if r.intensity > o.intensity + INTENSITY_MARGIN {
        out.weaknesses.push("Lower playing intensity".to_string());
        out.general_insights.push(format!(
            "The rival plays with more intensity ({:.2} vs {:.2}). Prepare for a physical match.",
            r.intensity, o.intensity
        ));
    } else if o.intensity > r.intensity + INTENSITY_MARGIN {
        out.strengths.push("Higher playing intensity".to_string());
        out.general_insights.push(format!(
            "Your team plays with more intensity ({:.2} vs {:.2}). Use it to impose the tempo.",
            o.intensity, r.intensity
        ));
    }

    // Only the rival's indiscipline is an opportunity; ours is not flagged.
    if r.fouls > o.fouls + FOULS_MARGIN {
        out.strengths
            .push("The rival commits more fouls. Exploit set pieces.".to_string());
        out.general_insights.push(format!(
            "The rival is prone to fouling ({:.1} vs {:.1} per match). Rehearse set-piece routines.",
            r.fouls, o.fouls
        ));
    }

    if o.goals > r.goals + GOALS_MARGIN {
        out.strengths.push("Greater attacking effectiveness".to_string());
        out.general_insights.push(format!(
            "Your team scores more goals per match ({:.2} vs {:.2}).",
            o.goals, r.goals
        ));
    } else if r.goals > o.goals + GOALS_MARGIN {
        out.weaknesses.push("Lower attacking effectiveness".to_string());
        out.general_insights.push(format!(
            "The rival scores more goals per match ({:.2} vs {:.2}). Reinforce the defence.",
            r.goals, o.goals
        ));
    }

    out.general_insights.push(format!(
        "Matchup: {} vs {}",
        Archetype::from_label(own.main_cluster),
        Archetype::from_label(rival.main_cluster)
    ));

    out
}

pub fn matchup_description(own: Archetype, rival: Archetype) -> &'static str {
    use Archetype::*;
    match (own, rival) {
        (ClosedTactical, ClosedTactical) => {
            "Clash of two tactical sides. Expect a tight match with few chances."
        }
        (ClosedTactical, IntenseBalanced) => {
            "Tactical team vs intense team. Risk of being overrun physically."
        }
        (ClosedTactical, DominantHighScoring) => {
            "Tactical team vs dominant team. Maximum defensive concentration required."
        }
        (IntenseBalanced, ClosedTactical) => {
            "Intense team vs tactical team. Chance to impose the match tempo."
        }
        (IntenseBalanced, IntenseBalanced) => {
            "Intense clash between two balanced sides. Physical match with many stoppages."
        }
        (IntenseBalanced, DominantHighScoring) => {
            "Intense team vs dominant team. A duel of contrasting styles."
        }
        (DominantHighScoring, ClosedTactical) => {
            "Dominant team vs tactical team. Chance to show technical superiority."
        }
        (DominantHighScoring, IntenseBalanced) => {
            "Dominant team vs intense team. Risk of losing control of the tempo."
        }
        (DominantHighScoring, DominantHighScoring) => {
            "Clash of two attacking sides. Expect a high-scoring match."
        }
        _ => "Clash of contrasting styles.",
    }
}

/// The three factors that tend to decide this pairing, most important first.
pub fn key_factors(own: Archetype, rival: Archetype) -> [&'static str; 3] {
    use Archetype::*;
    match (own, rival) {
        (ClosedTactical, IntenseBalanced) => [
            "Keeping defensive concentration",
            "Efficiency on the counter-attack",
            "Managing set pieces",
        ],
        (IntenseBalanced, ClosedTactical) => [
            "Physical intensity from kick-off",
            "A high press to force errors",
            "Speed in transitions",
        ],
        (IntenseBalanced, DominantHighScoring) => [
            "Keeping possession under pressure",
            "Effectiveness in the final third",
            "Managing the match tempo",
        ],
        (DominantHighScoring, IntenseBalanced) => [
            "Control of the space between the lines",
            "Precision in the final pass",
            "Patience in build-up play",
        ],
        (ClosedTactical, DominantHighScoring) => [
            "Compact defensive organisation",
            "Effectiveness on the counter-attack",
            "Managing the match tempo",
        ],
        (DominantHighScoring, ClosedTactical) => [
            "Patience in build-up play",
            "Creating space in the rival defence",
            "Effectiveness in the final third",
        ],
        _ => [
            "Tactical adaptability",
            "Concentration at key moments",
            "Effectiveness from rehearsed plays",
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub defensive: String,
    pub offensive: String,
    pub preparation: String,
    pub substitutions: String,
    pub critical_points: String,
}

/// Game-plan text keyed on the rival's dominant archetype, filled with both teams' averages.
pub fn recommendations(rival_archetype: Archetype, own: &AvgStats, rival: &AvgStats) -> Recommendations {
    use Archetype::*;

    let defensive = match rival_archetype {
        ClosedTactical => format!(
            "Tactical side: keep the defensive shape and avoid gaps between the lines. The rival waits for positioning errors (it averages only {} goals per match).",
            rival.goals_per_match
        ),
        IntenseBalanced => format!(
            "Intense side: prepare compact defensive lines. The rival averages {} fouls per match, so rehearse set pieces and free-kick routines.",
            rival.fouls_per_match
        ),
        DominantHighScoring => format!(
            "Dominant side: press high in midfield. The rival averages {}% possession, so cut its circulation with coordinated pressing.",
            rival.possession_avg
        ),
        Other(_) => format!(
            "Keep the defensive shape and adapt as the match unfolds. The rival averages {} fouls per match, so watch out for set pieces.",
            rival.fouls_per_match
        ),
    };

    let offensive = match rival_archetype {
        ClosedTactical => format!(
            "Exploit the spaces in transition. The rival is organised but not very intense ({}/10). Look for quick plays after recoveries.",
            rival.intensity_avg
        ),
        IntenseBalanced => format!(
            "Quick, direct play. The rival commits {} fouls per match, so make the most of free kicks with specific routines.",
            rival.fouls_per_match
        ),
        DominantHighScoring => format!(
            "Possession control and patience. The rival dominates with {}% possession, so look for errors in its build-up and attack the space after winning the ball.",
            rival.possession_avg
        ),
        Other(_) => format!(
            "Adapt the attack to the weaknesses detected. Your team averages {} shots on target per match, so keep that effectiveness.",
            own.shots_on_target_per_match
        ),
    };

    let preparation = match rival_archetype {
        ClosedTactical => "Emphasise tactical patience and defensive concentration. Sessions on possession under pressure and quick transitions.".to_string(),
        IntenseBalanced => format!(
            "Intense physical preparation. The rival averages {}/10 intensity, so simulate high-pressure scenarios and fast recovery.",
            rival.intensity_avg
        ),
        DominantHighScoring => format!(
            "Collective pressing work. The rival completes {}% of its passes, so practise coordinated pressing and cutting passing lanes.",
            rival.pass_completion
        ),
        Other(_) => "General preparation focused on tactical adaptability. Work on attack-defence transitions and tactical variations.".to_string(),
    };

    let substitutions = match rival_archetype {
        ClosedTactical => "Tactical substitutions to change the tempo. Consider attacking changes if the match stays closed, with players who can beat a man.".to_string(),
        IntenseBalanced => format!(
            "Frequent rotations to sustain intensity. The rival is physical ({}/10), so plan energetic changes in midfield and attack.",
            rival.intensity_avg
        ),
        DominantHighScoring => "Substitutions to keep possession and control in the final minutes. Fresh legs to press high and keep the ball.".to_string(),
        Other(_) => "Plan substitutions around how the match develops. Consider changes that can shift the tempo.".to_string(),
    };

    let critical_points = match rival_archetype {
        ClosedTactical => format!(
            "The rival is defensively organised (only {} goals per match on average). Creativity in attack and patience in build-up are needed.",
            rival.goals_per_match
        ),
        IntenseBalanced => format!(
            "High physical intensity ({}/10). Risk of injuries and cards. Emotional control and physical preparation are key.",
            rival.intensity_avg
        ),
        DominantHighScoring => format!(
            "Possession dominance ({}%). Efficient pressing and fast counter-attacks are needed. Attack-defence transitions will be decisive.",
            rival.possession_avg
        ),
        Other(_) => format!(
            "Read the match to find weak points. The rival completes {}% of its passes, so a high press could force errors.",
            rival.pass_completion
        ),
    };

    Recommendations {
        defensive,
        offensive,
        preparation,
        substitutions,
        critical_points,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPlan {
    pub own_cluster: u32,
    pub rival_cluster: u32,
    pub own_archetype: Archetype,
    pub rival_archetype: Archetype,
    pub description: String,
    pub key_factors: Vec<String>,
    pub recommendations: Recommendations,
}

pub fn matchup_plan(own: &TeamProfile, rival: &TeamProfile) -> MatchupPlan {
    let own_archetype = Archetype::from_label(own.main_cluster);
    let rival_archetype = Archetype::from_label(rival.main_cluster);
    MatchupPlan {
        own_cluster: own.main_cluster,
        rival_cluster: rival.main_cluster,
        own_archetype,
        rival_archetype,
        description: matchup_description(own_archetype, rival_archetype).to_string(),
        key_factors: key_factors(own_archetype, rival_archetype)
            .iter()
            .map(|f| f.to_string())
            .collect(),
        recommendations: recommendations(rival_archetype, &own.avg_stats, &rival.avg_stats),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GaugeLevel {
    Low,
    Medium,
    High,
}

/// A bounded reading such as "intensity out of 10".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gauge {
    pub value: f64,
    pub max: f64,
    pub percentage: f64,
    pub level: GaugeLevel,
}

impl Gauge {
    /// Zero or NaN readings sit at the midpoint instead of an empty bar.
    pub fn new(value: f64, max: f64) -> Self {
        let value = if value.is_nan() || value == 0.0 {
            max * 0.5
        } else {
            value
        };
        let percentage = (value / max * 100.0).min(100.0);
        let level = if percentage < 33.0 {
            GaugeLevel::Low
        } else if percentage < 66.0 {
            GaugeLevel::Medium
        } else {
            GaugeLevel::High
        };
        Self {
            value,
            max,
            percentage,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RivalReport {
    pub name: String,
    pub main_cluster: u32,
    pub archetype: Archetype,
    pub archetype_name: String,
    pub archetype_description: String,
    pub total_matches: usize,
    pub cluster_distribution: Vec<String>,
    pub goals_per_match: String,
    pub shots_on_target_per_match: String,
    pub possession: String,
    pub fouls_per_match: String,
    pub intensity: Gauge,
    pub discipline: Gauge,
    pub precision: Gauge,
}

pub fn rival_report(profile: &TeamProfile) -> RivalReport {
    let archetype = Archetype::from_label(profile.main_cluster);
    let stats = &profile.avg_stats;
    RivalReport {
        name: profile.name.clone(),
        main_cluster: profile.main_cluster,
        archetype,
        archetype_name: archetype.name(),
        archetype_description: archetype.description().to_string(),
        total_matches: profile.total_matches,
        cluster_distribution: profile
            .clusters
            .iter()
            .map(|(label, count)| format!("Cluster {label}: {count} matches"))
            .collect(),
        goals_per_match: stats.goals_per_match.to_string(),
        shots_on_target_per_match: stats.shots_on_target_per_match.to_string(),
        possession: format!("{}%", stats.possession_avg),
        fouls_per_match: stats.fouls_per_match.to_string(),
        intensity: Gauge::new(stats.intensity_avg.or_if_zero(5.0), 10.0),
        discipline: Gauge::new(stats.fouls_per_match.or_if_zero(10.0), 20.0),
        precision: Gauge::new(stats.pass_completion.or_if_zero(85.0), 100.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: &'static str,
    pub own: f64,
    pub rival: f64,
}

/// Side-by-side axes for a radar comparison, zero readings replaced per axis.
pub fn radar_axes(own: &AvgStats, rival: &AvgStats) -> Vec<RadarAxis> {
    let axes: [(&'static str, fn(&AvgStats) -> f64); 8] = [
        ("Goals/Match", |s| s.goals_per_match.or_if_zero(0.0)),
        ("Shots on Target", |s| s.shots_on_target_per_match.or_if_zero(0.0)),
        ("Possession %", |s| s.possession_avg.or_if_zero(50.0)),
        ("Pass Accuracy %", |s| s.pass_completion.or_if_zero(85.0)),
        ("Fouls/Match", |s| s.fouls_per_match.or_if_zero(10.0)),
        ("Intensity", |s| s.intensity_avg.or_if_zero(5.0)),
        ("Corners", |s| s.corners_per_match.or_if_zero(5.0)),
        ("Yellow Cards/Match", |s| s.yellow_per_match.or_if_zero(1.0)),
    ];
    axes.iter()
        .map(|&(label, read)| RadarAxis {
            label,
            own: read(own),
            rival: read(rival),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_uses_midpoint_for_missing_values() {
        let g = Gauge::new(0.0, 20.0);
        assert_eq!(g.value, 10.0);
        assert_eq!(g.level, GaugeLevel::Medium);
        let g = Gauge::new(9.0, 10.0);
        assert_eq!(g.level, GaugeLevel::High);
        let g = Gauge::new(250.0, 100.0);
        assert_eq!(g.percentage, 100.0);
        assert_eq!(Gauge::new(2.0, 10.0).level, GaugeLevel::Low);
    }

    #[test]
    fn unknown_pairs_fall_back_to_generic_text() {
        let other = Archetype::from_label(5);
        assert_eq!(
            matchup_description(other, Archetype::ClosedTactical),
            "Clash of contrasting styles."
        );
        assert_eq!(
            key_factors(Archetype::ClosedTactical, Archetype::ClosedTactical)[0],
            "Tactical adaptability"
        );
    }
}
