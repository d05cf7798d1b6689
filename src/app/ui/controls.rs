use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::physics::{ForceConfig, ForceParameter, SimulationState};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search authors")
            .on_hover_text("Fuzzy-highlight matching authors without changing the graph.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matching authors are outlined in blue.");

        ui.separator();
        ui.label(RichText::new("Physics").strong());

        let config = self.graph_cache.engine.config();
        for parameter in ForceParameter::ALL {
            let mut value = config.get(parameter);
            let changed = ui
                .add(
                    egui::Slider::new(&mut value, parameter.range())
                        .text(parameter.label())
                        .step_by(parameter.step())
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text(parameter.hover_text())
                .changed();
            if changed {
                self.graph_cache.engine.reconfigure(parameter, value);
                ui.ctx().request_repaint();
            }
        }

        ui.horizontal(|ui| {
            if ui
                .button("Reset physics")
                .on_hover_text("Restore the default force coefficients and restart the layout.")
                .clicked()
            {
                self.graph_cache.engine.replace_config(ForceConfig::default());
                ui.ctx().request_repaint();
            }
            if ui
                .button("Restart layout")
                .on_hover_text("Reheat the simulation without changing any force.")
                .clicked()
            {
                self.graph_cache.engine.restart();
                ui.ctx().request_repaint();
            }
        });

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Pause or resume the layout. Pausing keeps the current forces.");
        ui.checkbox(&mut self.show_labels, "Show author labels");

        if ui.button("Reset view").clicked() {
            self.viewport.reset();
        }

        ui.add_space(6.0);
        let state = match self.graph_cache.engine.state() {
            SimulationState::Converging if self.live_physics => "converging",
            SimulationState::Converging => "paused",
            SimulationState::Idle => "settled",
        };
        ui.small(format!(
            "layout: {state}  |  alpha {:.3}",
            self.graph_cache.engine.alpha()
        ));
        ui.small(format!(
            "{} connected authors, {} co-authorships",
            self.graph_cache.engine.body_count(),
            self.graph_cache.edges.len()
        ));
    }
}
