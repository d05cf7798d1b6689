use eframe::egui::{self, RichText, Ui};

use crate::coauthor::Dataset;

use super::super::{CoauthorEntry, DetailsPanelCache, RenderGraph, ViewModel};

/// Direct co-authors of `name`, most shared publications first.
fn direct_coauthors(dataset: &Dataset, render: &RenderGraph, name: &str) -> Vec<CoauthorEntry> {
    let mut coauthors = dataset
        .graph
        .edges()
        .filter(|edge| edge.touches(name) && edge.source != edge.target)
        .map(|edge| {
            let other = edge.other(name);
            CoauthorEntry {
                name: other.to_owned(),
                shared_publications: edge.weight(),
                render_index: render.nodes.iter().position(|node| node.name == other),
            }
        })
        .collect::<Vec<_>>();
    coauthors.sort_by(|a, b| {
        b.shared_publications
            .cmp(&a.shared_publications)
            .then_with(|| a.name.cmp(&b.name))
    });
    coauthors
}

impl ViewModel {
    fn coauthors_for_details(&mut self, selected: usize, name: &str) -> Vec<CoauthorEntry> {
        if let Some(cache) = &self.details_panel_cache
            && cache.selected == selected
        {
            return cache.coauthors.clone();
        }

        let coauthors = direct_coauthors(&self.dataset, &self.graph_cache, name);
        self.details_panel_cache = Some(DetailsPanelCache {
            selected,
            coauthors: coauthors.clone(),
        });
        coauthors
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Author Details");
        ui.add_space(6.0);

        let Some(selected) = self.selected else {
            ui.label("Click an author in the graph to see details.");
            return;
        };

        let Some(render_node) = self.graph_cache.nodes.get(selected) else {
            ui.label("Selected author is no longer in the graph.");
            return;
        };
        let degree = render_node.degree;
        let Some(node) = self.dataset.graph.node_at(render_node.author).cloned() else {
            ui.label("Selected author is no longer in the graph.");
            return;
        };

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.label(format!("Affiliation: {}", node.affiliation));
        match node.country.as_deref() {
            Some(country) => ui.label(format!(
                "Country: {country} ({} records)",
                self.dataset.countries.count(country)
            )),
            None => ui.label("Country: unknown"),
        };
        ui.label(format!("First seen in record #{}", node.group));
        ui.label(format!("Degree: {degree}"));

        let coauthors = self.coauthors_for_details(selected, &node.name);
        ui.separator();
        ui.label(RichText::new(format!("Co-authors ({})", coauthors.len())).strong());

        egui::ScrollArea::vertical()
            .id_salt("coauthor_scroll")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for coauthor in &coauthors {
                    let label = format!(
                        "{}  ({} shared)",
                        coauthor.name, coauthor.shared_publications
                    );
                    match coauthor.render_index {
                        Some(index) => {
                            let affiliation = self
                                .dataset
                                .graph
                                .node(&coauthor.name)
                                .map_or("", |node| node.affiliation.as_str());
                            if ui.link(label).on_hover_text(affiliation).clicked() {
                                self.set_selected(Some(index));
                            }
                        }
                        None => {
                            ui.label(label);
                        }
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::app::physics::ForceConfig;
    use crate::records::{RawRecord, Record};

    #[test]
    fn coauthors_are_ranked_by_shared_publications() {
        let records = ["A, B", "A, C", "C, A", "B, D", "A, A"]
            .iter()
            .enumerate()
            .map(|(index, authors)| {
                Record::parse(&RawRecord {
                    authors: Some((*authors).to_owned()),
                    publisher: Some(format!("P{index}")),
                    authors_with_affiliations: None,
                    country: None,
                })
            })
            .collect::<Vec<_>>();
        let dataset = Dataset::from_records(PathBuf::from("records.csv"), &records);
        let render = RenderGraph::build(&dataset, ForceConfig::default());

        let coauthors = direct_coauthors(&dataset, &render, "A");
        let summary = coauthors
            .iter()
            .map(|entry| (entry.name.as_str(), entry.shared_publications))
            .collect::<Vec<_>>();
        assert_eq!(summary, vec![("C", 2), ("B", 1)]);
        assert!(coauthors.iter().all(|entry| entry.render_index.is_some()));

        assert!(direct_coauthors(&dataset, &render, "Nobody").is_empty());
    }
}
