use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::records::{Record, resolve_affiliation};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorNode {
    pub name: String,
    pub affiliation: String,
    /// Index of the record in which the author was first observed.
    pub group: usize,
    pub country: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoauthorEdge {
    pub source: String,
    pub target: String,
    /// One publisher per shared record, in record order.
    pub publishers: Vec<String>,
}

impl CoauthorEdge {
    pub fn weight(&self) -> usize {
        self.publishers.len()
    }

    pub fn touches(&self, name: &str) -> bool {
        self.source == name || self.target == name
    }

    pub fn other(&self, name: &str) -> &str {
        if self.source == name {
            &self.target
        } else {
            &self.source
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PairKey(String, String);

impl PairKey {
    fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_owned(), b.to_owned())
        } else {
            Self(b.to_owned(), a.to_owned())
        }
    }
}

/// Authors and aggregated co-authorships folded from a record sequence.
#[derive(Clone, Debug, Default)]
pub struct CoauthorGraph {
    nodes: IndexMap<String, AuthorNode>,
    edges: IndexMap<PairKey, CoauthorEdge>,
}

/// The subgraph restricted to authors with at least one co-author.
///
/// `nodes` holds indices into [`CoauthorGraph::node_at`]; edge endpoints are
/// positions within `nodes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectedGraph {
    pub nodes: Vec<usize>,
    pub edges: Vec<ConnectedEdge>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectedEdge {
    pub edge: usize,
    pub source: usize,
    pub target: usize,
}

impl CoauthorGraph {
    pub fn build(records: &[Record]) -> Self {
        let mut graph = Self::default();
        for (index, record) in records.iter().enumerate() {
            graph.fold_record(index, record);
        }
        graph
    }

    fn fold_record(&mut self, group: usize, record: &Record) {
        let affiliations = record.affiliation_map();

        for author in &record.authors {
            if self.nodes.contains_key(author) {
                continue;
            }
            self.nodes.insert(
                author.clone(),
                AuthorNode {
                    name: author.clone(),
                    affiliation: resolve_affiliation(&affiliations, author),
                    group,
                    country: record.country.clone(),
                },
            );
        }

        for (i, source) in record.authors.iter().enumerate() {
            for target in &record.authors[i + 1..] {
                match self.edges.entry(PairKey::new(source, target)) {
                    Entry::Occupied(mut entry) => {
                        entry.get_mut().publishers.push(record.publisher.clone());
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(CoauthorEdge {
                            source: source.clone(),
                            target: target.clone(),
                            publishers: vec![record.publisher.clone()],
                        });
                    }
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AuthorNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &CoauthorEdge> {
        self.edges.values()
    }

    pub fn node(&self, name: &str) -> Option<&AuthorNode> {
        self.nodes.get(name)
    }

    pub fn node_at(&self, index: usize) -> Option<&AuthorNode> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    pub fn edge_at(&self, index: usize) -> Option<&CoauthorEdge> {
        self.edges.get_index(index).map(|(_, edge)| edge)
    }

    pub fn connected(&self) -> ConnectedGraph {
        let mut touched = HashSet::new();
        for edge in self.edges.values() {
            touched.insert(edge.source.as_str());
            touched.insert(edge.target.as_str());
        }

        let nodes = self
            .nodes()
            .enumerate()
            .filter(|(_, node)| touched.contains(node.name.as_str()))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let position_by_name = nodes
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                self.node_at(index)
                    .map(|node| (node.name.as_str(), position))
            })
            .collect::<HashMap<_, _>>();

        let edges = self
            .edges
            .values()
            .enumerate()
            .filter_map(|(index, edge)| {
                let source = *position_by_name.get(edge.source.as_str())?;
                let target = *position_by_name.get(edge.target.as_str())?;
                Some(ConnectedEdge {
                    edge: index,
                    source,
                    target,
                })
            })
            .collect();

        ConnectedGraph { nodes, edges }
    }
}

impl ConnectedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct edges touching each node, by position.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for edge in &self.edges {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::records::RawRecord;

    fn edge_between<'a>(graph: &'a CoauthorGraph, a: &str, b: &str) -> Option<&'a CoauthorEdge> {
        graph
            .edges()
            .find(|edge| edge.touches(a) && edge.other(a) == b)
    }

    fn record(authors: &str, publisher: &str, country: Option<&str>) -> Record {
        Record::parse(&RawRecord {
            authors: Some(authors.to_owned()),
            publisher: Some(publisher.to_owned()),
            authors_with_affiliations: None,
            country: country.map(str::to_owned),
        })
    }

    fn names(graph: &CoauthorGraph, connected: &ConnectedGraph) -> Vec<String> {
        connected
            .nodes
            .iter()
            .filter_map(|&index| graph.node_at(index))
            .map(|node| node.name.clone())
            .collect()
    }

    #[test]
    fn chain_of_two_records() {
        let records = vec![
            record("A, B", "P1", Some("US")),
            record("B, C", "P2", Some("US")),
        ];
        let graph = CoauthorGraph::build(&records);
        let connected = graph.connected();

        assert_eq!(names(&graph, &connected), vec!["A", "B", "C"]);
        assert_eq!(graph.edge_count(), 2);
        let ab = edge_between(&graph, "B", "A").expect("edge A-B");
        assert_eq!((ab.weight(), ab.publishers.clone()), (1, vec!["P1".to_owned()]));
        let bc = edge_between(&graph, "B", "C").expect("edge B-C");
        assert_eq!((bc.weight(), bc.publishers.clone()), (1, vec!["P2".to_owned()]));
        assert_eq!(connected.degrees(), vec![1, 2, 1]);
    }

    #[test]
    fn repeated_pair_accumulates_publishers() {
        let records = vec![record("A, B", "P1", None), record("B, A", "P2", None)];
        let graph = CoauthorGraph::build(&records);

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge_at(0).expect("single edge");
        assert_eq!(edge.source, "A");
        assert_eq!(edge.target, "B");
        assert_eq!(edge.weight(), 2);
        assert_eq!(edge.publishers, vec!["P1", "P2"]);
    }

    #[test]
    fn solo_author_is_built_but_not_connected() {
        let records = vec![record("SoloAuthor", "P", Some("FR")), record("A, B", "P", None)];
        let graph = CoauthorGraph::build(&records);

        assert!(graph.node("SoloAuthor").is_some());
        assert_eq!(names(&graph, &graph.connected()), vec!["A", "B"]);
    }

    #[test]
    fn first_observation_fixes_node_attributes() {
        let first = Record::parse(&RawRecord {
            authors: Some("Lima Ana, Chen Bo".to_owned()),
            publisher: Some("P1".to_owned()),
            authors_with_affiliations: Some("Lima, Ana, USP".to_owned()),
            country: Some("Brazil".to_owned()),
        });
        let second = Record::parse(&RawRecord {
            authors: Some("Chen Bo, Lima Ana".to_owned()),
            publisher: Some("P2".to_owned()),
            authors_with_affiliations: Some("Chen, Bo, MIT; Lima, Ana, UFPE".to_owned()),
            country: Some("USA".to_owned()),
        });
        let graph = CoauthorGraph::build(&[first, second]);

        let lima = graph.node("Lima Ana").expect("node");
        assert_eq!(lima.affiliation, "Ana, USP");
        assert_eq!(lima.group, 0);
        assert_eq!(lima.country.as_deref(), Some("Brazil"));

        let chen = graph.node("Chen Bo").expect("node");
        assert_eq!(chen.affiliation, "Unknown affiliation");
        assert_eq!(chen.group, 0);
    }

    #[test]
    fn duplicate_name_in_one_record_pairs_positionally() {
        let graph = CoauthorGraph::build(&[record("A, A, B", "P", None)]);
        let connected = graph.connected();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(edge_between(&graph, "A", "A").map(CoauthorEdge::weight), Some(1));
        assert_eq!(edge_between(&graph, "A", "B").map(CoauthorEdge::weight), Some(2));
        assert_eq!(connected.degrees(), vec![3, 1]);
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let graph = CoauthorGraph::build(&[]);
        assert!(graph.connected().is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    fn arb_records() -> impl Strategy<Value = Vec<(Vec<usize>, usize)>> {
        prop::collection::vec(
            (prop::collection::vec(0usize..8, 0..5), 0usize..4),
            0..12,
        )
    }

    fn to_records(raw: &[(Vec<usize>, usize)]) -> Vec<Record> {
        raw.iter()
            .map(|(authors, publisher)| Record {
                authors: authors.iter().map(|author| format!("Author {author}")).collect(),
                publisher: format!("Pub {publisher}"),
                affiliation_entries: Vec::new(),
                country: Some(format!("Country {}", publisher % 2)),
            })
            .collect()
    }

    proptest! {
        #[test]
        fn connected_nodes_are_unique_and_touch_an_edge(raw in arb_records()) {
            let graph = CoauthorGraph::build(&to_records(&raw));
            let connected = graph.connected();
            let rendered = names(&graph, &connected);

            let unique = rendered.iter().collect::<HashSet<_>>();
            prop_assert_eq!(unique.len(), rendered.len());
            for name in &rendered {
                prop_assert!(graph.edges().any(|edge| edge.touches(name)));
            }
            prop_assert_eq!(connected.edges.len(), graph.edge_count());
        }

        #[test]
        fn node_group_is_first_record_with_the_author(raw in arb_records()) {
            let records = to_records(&raw);
            let graph = CoauthorGraph::build(&records);

            for node in graph.nodes() {
                let first = records
                    .iter()
                    .position(|record| record.authors.contains(&node.name));
                prop_assert_eq!(Some(node.group), first);
                prop_assert_eq!(&node.country, &records[node.group].country);
            }
        }

        #[test]
        fn edge_weight_counts_pairwise_cooccurrences(raw in arb_records()) {
            let records = to_records(&raw);
            let graph = CoauthorGraph::build(&records);

            for edge in graph.edges() {
                let mut expected = Vec::new();
                for record in &records {
                    for (i, a) in record.authors.iter().enumerate() {
                        for b in &record.authors[i + 1..] {
                            let same = (a == &edge.source && b == &edge.target)
                                || (a == &edge.target && b == &edge.source);
                            if same {
                                expected.push(record.publisher.clone());
                            }
                        }
                    }
                }
                prop_assert_eq!(edge.weight(), expected.len());
                prop_assert_eq!(&edge.publishers, &expected);
            }
        }

        #[test]
        fn rebuilding_is_idempotent(raw in arb_records()) {
            let records = to_records(&raw);
            let first = CoauthorGraph::build(&records);
            let second = CoauthorGraph::build(&records);

            prop_assert_eq!(first.nodes().collect::<Vec<_>>(), second.nodes().collect::<Vec<_>>());
            prop_assert_eq!(first.edges().collect::<Vec<_>>(), second.edges().collect::<Vec<_>>());
            prop_assert_eq!(first.connected(), second.connected());
        }
    }
}
