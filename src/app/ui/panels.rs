use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use crate::coauthor::Dataset;

use super::super::encode::country_legend;
use super::super::highlight::SearchMatches;
use super::super::interaction::{InteractionState, Viewport};
use super::super::physics::ForceConfig;
use super::super::{RenderGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(dataset: Dataset, forces: ForceConfig) -> Self {
        let graph_cache = RenderGraph::build(&dataset, forces);
        let legend = country_legend(&dataset.countries);

        Self {
            dataset,
            graph_cache,
            legend,
            search: String::new(),
            search_matches: SearchMatches::default(),
            selected: None,
            details_panel_cache: None,
            viewport: Viewport::default(),
            interaction: InteractionState::default(),
            live_physics: true,
            show_labels: true,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Co-authorship network");
                    ui.separator();
                    ui.label(format!("source: {}", source.display()));
                    ui.label(format!("records: {}", self.dataset.record_count));
                    ui.label(format!("authors: {}", self.dataset.graph.node_count()));
                    ui.label(format!(
                        "co-authorships: {}",
                        self.dataset.graph.edge_count()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload records"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("zoom: {:.2}x", self.viewport.zoom()));
                        ui.label(format!(
                            "visible: {} nodes / {} edges",
                            self.visible_node_count, self.visible_edge_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.draw_details(ui);
                ui.separator();
                self.draw_legend(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading co-authorship records...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.details_panel_cache = None;
    }
}
