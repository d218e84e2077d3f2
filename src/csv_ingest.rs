use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::record::{RawRecord, RawValue};

/// Reads a headed CSV into raw records. Every cell stays text; blank cells
/// become `Null` so column detection can skip them.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("csv header row missing or unreadable")?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("csv row {} unreadable", line + 1))?;
        if row.len() != headers.len() {
            warn!(
                "csv row {} has {} cells, header has {}",
                line + 1,
                row.len(),
                headers.len()
            );
        }
        // Short rows still carry every header so column resolution sees the full set.
        let record = headers
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let value = match row.get(idx) {
                    Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.to_string()),
                    _ => RawValue::Null,
                };
                (column.clone(), value)
            })
            .collect::<RawRecord>();
        records.push(record);
    }
    Ok(records)
}

pub fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    let records =
        read_records(file).with_context(|| format!("unable to parse {}", path.display()))?;
    info!("loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive_records;
    use crate::schema::{CanonicalField, resolve_dataset};

    #[test]
    fn keeps_header_order_and_blank_cells() {
        let raw = "team1,team2,possession team1\nQATAR,ECUADOR,42%\nENGLAND,IRAN,\n";
        let records = read_records(raw.as_bytes()).expect("valid csv");
        assert_eq!(records.len(), 2);
        let columns = records[0].columns().collect::<Vec<_>>();
        assert_eq!(columns, vec!["team1", "team2", "possession team1"]);
        assert_eq!(records[0].get("possession team1"), Some(&RawValue::from("42%")));
        assert_eq!(records[1].get("possession team1"), Some(&RawValue::Null));
    }

    #[test]
    fn short_first_row_keeps_every_header() {
        let raw = "team1,team2,number of goals team1,number of goals team2\nA,B\nC,D,3,1\n";
        let records = read_records(raw.as_bytes()).expect("valid csv");
        assert_eq!(records[0].len(), 4);
        assert_eq!(records[0].get("number of goals team2"), Some(&RawValue::Null));

        let columns = resolve_dataset(&records);
        assert!(columns.is_resolved(CanonicalField::Goals1));
        let derived = derive_records(&records, &columns);
        assert_eq!(derived[0].total_goals, 0.0);
        assert_eq!(derived[1].total_goals, 4.0);
    }

    #[test]
    fn header_only_file_is_empty() {
        let records = read_records("team1,team2\n".as_bytes()).expect("valid csv");
        assert!(records.is_empty());
    }
}
