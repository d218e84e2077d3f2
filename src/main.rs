use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::warn;

use wc22_tactics::archetype::Archetype;
use wc22_tactics::config::AnalysisConfig;
use wc22_tactics::csv_ingest;
use wc22_tactics::explorer::MatchFilter;
use wc22_tactics::insight::Gauge;
use wc22_tactics::session::{AnalysisSession, AnalysisSnapshot};

const DEFAULT_DATA_PATH: &str = "data/worldcup2022.csv";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = parse_data_path_arg()
        .or_else(|| std::env::var("TACTICS_DATA").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let config = config_from_args(AnalysisConfig::from_env())?;

    let records = csv_ingest::load_csv(&path)?;
    let mut session = AnalysisSession::new(records, config);
    session.rerun();
    let snapshot = session
        .require_snapshot()
        .with_context(|| format!("nothing to analyse in {}", path.display()))?;

    if has_flag("--json") {
        let out = serde_json::to_string_pretty(snapshot.as_ref())
            .context("unable to serialise analysis snapshot")?;
        println!("{out}");
        return Ok(());
    }

    print_overview(&snapshot);

    let (default_own, default_rival) = snapshot
        .default_matchup()
        .ok_or_else(|| anyhow!("dataset has no team names"))?;
    let own = parse_string_arg("--own").unwrap_or(default_own);
    let rival = parse_string_arg("--rival").unwrap_or(default_rival);
    if own == rival {
        warn!("own and rival are both {own}; the comparison will be symmetric");
    }

    print_rival_report(&snapshot, &rival)?;
    print_comparison(&snapshot, &own, &rival)?;

    let filter = MatchFilter {
        cluster: parse_u32_arg("--cluster"),
        team: parse_string_arg("--team").unwrap_or_default(),
    };
    if filter.cluster.is_some() || !filter.team.is_empty() {
        print_matches(&snapshot, &filter);
    }

    Ok(())
}

fn config_from_args(mut config: AnalysisConfig) -> Result<AnalysisConfig> {
    if let Some(raw) = parse_string_arg("--k") {
        config = config.with_clusters(AnalysisConfig::parse_clusters(&raw)?);
    }
    if has_flag("--no-scale") {
        config = config.with_standardize(false);
    }
    if let Some(raw) = parse_string_arg("--seed") {
        config = config.with_seed(AnalysisConfig::parse_seed(&raw)?);
    }
    Ok(config)
}

fn print_overview(snapshot: &AnalysisSnapshot) {
    let stats = snapshot.stats();
    println!("World Cup tactical analysis");
    println!("Generated: {}", snapshot.generated_at);
    println!(
        "Matches: {}  Teams: {}  Numeric columns: {}  Features: {}",
        stats.total_matches, stats.total_teams, stats.numeric_columns, stats.features_selected
    );
    println!(
        "k={} ({} iterations, standardize={})",
        snapshot.clustering.k, snapshot.clustering.iterations, snapshot.config.standardize
    );
    for (idx, size) in snapshot.clustering.cluster_sizes().iter().enumerate() {
        let archetype = Archetype::from_label(idx as u32 + 1);
        println!("  {archetype} {}: {size} matches", archetype.color());
    }
    let unresolved = snapshot.columns.unresolved();
    if !unresolved.is_empty() {
        let names = unresolved
            .iter()
            .map(|f| f.key())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Unresolved fields: {names}");
    }
}

fn print_rival_report(snapshot: &AnalysisSnapshot, rival: &str) -> Result<()> {
    let report = snapshot.rival_report(rival)?;
    println!();
    println!("Rival: {} ({} matches)", report.name, report.total_matches);
    println!("  Style: {}", report.archetype);
    println!("  {}", report.archetype_description);
    for line in &report.cluster_distribution {
        println!("  {line}");
    }
    println!(
        "  Goals/match {}  Shots on target/match {}  Possession {}  Fouls/match {}",
        report.goals_per_match,
        report.shots_on_target_per_match,
        report.possession,
        report.fouls_per_match
    );
    println!("  Intensity  {}", gauge_text(&report.intensity));
    println!("  Discipline {}", gauge_text(&report.discipline));
    println!("  Precision  {}", gauge_text(&report.precision));
    Ok(())
}

fn gauge_text(gauge: &Gauge) -> String {
    format!(
        "{:.1}/{:.0} ({:.0}%, {:?})",
        gauge.value, gauge.max, gauge.percentage, gauge.level
    )
}

fn print_comparison(snapshot: &AnalysisSnapshot, own: &str, rival: &str) -> Result<()> {
    let cmp = snapshot.compare(own, rival)?;
    println!();
    println!("{} vs {}", cmp.own, cmp.rival);
    print_list("Strengths", &cmp.insights.strengths);
    print_list("Weaknesses", &cmp.insights.weaknesses);
    print_list("Insights", &cmp.insights.general_insights);

    let plan = &cmp.matchup;
    println!();
    println!("Matchup: {} vs {}", plan.own_archetype, plan.rival_archetype);
    println!("  {}", plan.description);
    print_list("Key factors", &plan.key_factors);
    let recs = &plan.recommendations;
    println!("Recommendations");
    println!("  Defensive: {}", recs.defensive);
    println!("  Offensive: {}", recs.offensive);
    println!("  Preparation: {}", recs.preparation);
    println!("  Substitutions: {}", recs.substitutions);
    println!("  Critical points: {}", recs.critical_points);

    println!();
    println!("{:<20} {:>8} {:>8}", "", cmp.own, cmp.rival);
    for axis in &cmp.radar {
        println!("{:<20} {:>8.2} {:>8.2}", axis.label, axis.own, axis.rival);
    }
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title}");
    for item in items {
        println!("  - {item}");
    }
}

fn print_matches(snapshot: &AnalysisSnapshot, filter: &MatchFilter) {
    let table = snapshot.filter_matches(filter);
    println!();
    println!("{}", table.summary());
    for row in &table.rows {
        let cluster = row
            .cluster
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<32} c{} goals={} shots={} poss={:.1} fouls={} intensity={:.2}",
            row.label, cluster, row.goals, row.shots, row.possession, row.fouls, row.intensity
        );
    }
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

/// First positional argument that is not a flag value.
fn parse_data_path_arg() -> Option<PathBuf> {
    const VALUE_FLAGS: &[&str] = &["--k", "--seed", "--own", "--rival", "--cluster", "--team"];
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        if !arg.trim().is_empty() {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

fn parse_string_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&format!("{name}="))
            && !v.trim().is_empty()
        {
            return Some(v.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_u32_arg(name: &str) -> Option<u32> {
    parse_string_arg(name).and_then(|raw| raw.parse::<u32>().ok())
}
