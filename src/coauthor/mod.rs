mod collect;
mod countries;
mod graph;

pub use collect::{Dataset, collect_dataset};
pub use countries::CountryRanking;
pub use graph::{CoauthorGraph, ConnectedGraph};
