use serde::Serialize;

use crate::metrics::DerivedMatchRecord;

/// Rows handed to a table view at most.
pub const TABLE_ROW_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub cluster: Option<u32>,
    /// Case-insensitive substring matched against either team name. Empty matches all.
    pub team: String,
}

impl MatchFilter {
    pub fn matches(&self, record: &DerivedMatchRecord) -> bool {
        if let Some(cluster) = self.cluster
            && record.cluster != Some(cluster)
        {
            return false;
        }
        let needle = self.team.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record.team1.to_lowercase().contains(&needle) || record.team2.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub label: String,
    pub cluster: Option<u32>,
    pub goals: f64,
    pub shots: f64,
    pub possession: f64,
    pub fouls: f64,
    pub intensity: f64,
}

impl From<&DerivedMatchRecord> for MatchRow {
    fn from(record: &DerivedMatchRecord) -> Self {
        Self {
            label: record.display_label(),
            cluster: record.cluster,
            goals: record.total_goals,
            shots: record.total_shots,
            possession: record.possession_mean,
            fouls: record.total_fouls,
            intensity: record.intensity_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTable {
    pub rows: Vec<MatchRow>,
    /// Records passing the filter, before the row limit.
    pub matched: usize,
    pub total: usize,
}

impl MatchTable {
    pub fn summary(&self) -> String {
        format!("Showing {} of {} matches", self.matched, self.total)
    }
}

pub fn filter_matches(records: &[DerivedMatchRecord], filter: &MatchFilter) -> MatchTable {
    let matched: Vec<&DerivedMatchRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    MatchTable {
        rows: matched
            .iter()
            .take(TABLE_ROW_LIMIT)
            .map(|r| MatchRow::from(*r))
            .collect(),
        matched: matched.len(),
        total: records.len(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_matches: usize,
    pub total_teams: usize,
    pub numeric_columns: usize,
    pub features_selected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{derive_records, with_clusters};
    use crate::record::RawRecord;
    use crate::schema::resolve_dataset;

    fn records() -> Vec<DerivedMatchRecord> {
        let rows: Vec<RawRecord> = [("QATAR", "ECUADOR"), ("ENGLAND", "IRAN"), ("SENEGAL", "NETHERLANDS")]
            .iter()
            .map(|(a, b)| RawRecord::new().with("team1", *a).with("team2", *b))
            .collect();
        let derived = derive_records(&rows, &resolve_dataset(&rows));
        with_clusters(&derived, &[1, 2, 1])
    }

    #[test]
    fn filters_by_cluster_and_team() {
        let records = records();
        let by_cluster = filter_matches(&records, &MatchFilter { cluster: Some(1), team: String::new() });
        assert_eq!(by_cluster.matched, 2);
        assert_eq!(by_cluster.rows[1].label, "SENEGAL vs NETHERLANDS");

        let by_team = filter_matches(&records, &MatchFilter { cluster: Some(1), team: "qat".to_string() });
        assert_eq!(by_team.matched, 1);
        assert_eq!(by_team.summary(), "Showing 1 of 3 matches");

        let none = filter_matches(&records, &MatchFilter { cluster: Some(3), team: String::new() });
        assert!(none.rows.is_empty());
    }
}
