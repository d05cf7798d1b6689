use crate::coauthor::Dataset;

use super::super::encode::VisualEncoding;
use super::super::physics::{ForceConfig, LayoutEngine, LayoutTopology};
use super::super::{RenderEdge, RenderGraph, RenderNode, ViewScratch};

impl RenderGraph {
    /// Lays out only authors with at least one co-authorship.
    pub(in crate::app) fn build(dataset: &Dataset, forces: ForceConfig) -> Self {
        let graph = &dataset.graph;
        let connected = graph.connected();
        if connected.is_empty() {
            tracing::warn!(
                records = dataset.record_count,
                "no record lists more than one author; nothing to lay out"
            );
        }
        let encoding = VisualEncoding::new(graph, &connected, &dataset.countries);

        let nodes = connected
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(position, &author)| {
                let node = graph.node_at(author)?;
                Some(RenderNode {
                    author,
                    name: node.name.clone(),
                    group: node.group,
                    degree: encoding.degrees[position],
                    radius: encoding.radii[position],
                    fill: encoding.fills[position],
                })
            })
            .collect::<Vec<_>>();

        let edges = connected
            .edges
            .iter()
            .zip(&encoding.stroke_widths)
            .map(|(edge, &stroke_width)| RenderEdge {
                edge: edge.edge,
                source: edge.source,
                target: edge.target,
                stroke_width,
            })
            .collect::<Vec<_>>();

        let links = edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect::<Vec<_>>();
        let topology = LayoutTopology::new(nodes.iter().map(|node| node.radius).collect(), &links);

        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            "render graph built"
        );

        Self {
            nodes,
            edges,
            engine: LayoutEngine::new(topology, forces),
            view_scratch: ViewScratch::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::records::{RawRecord, Record};

    fn dataset(rows: &[&str]) -> Dataset {
        let records = rows
            .iter()
            .enumerate()
            .map(|(index, authors)| {
                Record::parse(&RawRecord {
                    authors: Some((*authors).to_owned()),
                    publisher: Some(format!("P{index}")),
                    authors_with_affiliations: None,
                    country: Some("US".to_owned()),
                })
            })
            .collect::<Vec<_>>();
        Dataset::from_records(PathBuf::from("test.csv"), &records)
    }

    #[test]
    fn isolated_authors_are_not_rendered() {
        let dataset = dataset(&["A, B", "C", "B, D"]);
        let render = RenderGraph::build(&dataset, ForceConfig::default());

        let names = render
            .nodes
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A", "B", "D"]);
        assert_eq!(render.edges.len(), 2);
        assert_eq!((render.edges[1].source, render.edges[1].target), (1, 2));
        assert_eq!(render.engine.body_count(), 3);
        assert_eq!(render.engine.frame().edge_segments.len(), 2);
        assert_eq!(render.nodes[2].author, 3);
    }

    #[test]
    fn empty_dataset_builds_an_empty_layout() {
        let dataset = dataset(&["Solo"]);
        let render = RenderGraph::build(&dataset, ForceConfig::default());
        assert!(render.nodes.is_empty());
        assert!(render.edges.is_empty());
        assert_eq!(render.engine.body_count(), 0);
    }
}
