use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::records::{InputFormat, RawRecord, Record, load_records};

use super::countries::{CountryRanking, RankedCountry};
use super::graph::CoauthorGraph;

#[derive(Clone, Debug)]
pub struct Dataset {
    pub source: PathBuf,
    pub record_count: usize,
    pub graph: CoauthorGraph,
    pub countries: CountryRanking,
}

#[derive(Clone, Debug, Serialize)]
pub struct GraphSummary {
    pub source: String,
    pub records: usize,
    pub authors: usize,
    pub coauthorships: usize,
    pub connected_authors: usize,
    pub top_countries: Vec<RankedCountry>,
}

pub fn collect_dataset(path: &Path, format: Option<InputFormat>) -> Result<Dataset> {
    let raw: Vec<RawRecord> = load_records(path, format)
        .with_context(|| format!("failed to load records from {}", path.display()))?;
    let records = raw.iter().map(Record::parse).collect::<Vec<_>>();

    let dataset = Dataset::from_records(path.to_path_buf(), &records);
    info!(
        source = %path.display(),
        records = dataset.record_count,
        authors = dataset.graph.node_count(),
        coauthorships = dataset.graph.edge_count(),
        countries = dataset.countries.distinct(),
        "built co-authorship graph"
    );
    Ok(dataset)
}

impl Dataset {
    pub fn from_records(source: PathBuf, records: &[Record]) -> Self {
        Self {
            source,
            record_count: records.len(),
            graph: CoauthorGraph::build(records),
            countries: CountryRanking::from_records(records),
        }
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            source: self.source.display().to_string(),
            records: self.record_count,
            authors: self.graph.node_count(),
            coauthorships: self.graph.edge_count(),
            connected_authors: self.graph.connected().nodes.len(),
            top_countries: self.countries.top().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RawRecord;

    #[test]
    fn summary_counts_connected_authors_only() {
        let raw = [
            RawRecord {
                authors: Some("A, B".to_owned()),
                publisher: Some("P1".to_owned()),
                country: Some("US".to_owned()),
                ..RawRecord::default()
            },
            RawRecord {
                authors: Some("Solo".to_owned()),
                country: Some("US".to_owned()),
                ..RawRecord::default()
            },
        ];
        let records = raw.iter().map(Record::parse).collect::<Vec<_>>();
        let summary = Dataset::from_records(PathBuf::from("mem.csv"), &records).summary();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.authors, 3);
        assert_eq!(summary.coauthorships, 1);
        assert_eq!(summary.connected_authors, 2);
        assert_eq!(
            summary.top_countries,
            vec![RankedCountry {
                country: "US".to_owned(),
                count: 2
            }]
        );

        let json = serde_json::to_value(&summary).expect("serializes");
        assert_eq!(json["connected_authors"], 2);
    }
}
