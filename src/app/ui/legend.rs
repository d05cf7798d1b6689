use eframe::egui::{Color32, RichText, Sense, Ui, vec2};

use super::super::ViewModel;
use super::super::encode::FALLBACK_FILL;

fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

impl ViewModel {
    pub(in crate::app) fn draw_legend(&self, ui: &mut Ui) {
        ui.label(RichText::new("Top countries").strong());
        if self.legend.is_empty() {
            ui.label("No country information in the loaded records.");
            return;
        }

        for entry in &self.legend {
            ui.horizontal(|ui| {
                swatch(ui, entry.color);
                ui.label(format!("{} ({})", entry.country, entry.count));
            });
        }
        ui.horizontal(|ui| {
            swatch(ui, FALLBACK_FILL);
            ui.label("Other or unknown");
        });
        ui.small(format!(
            "{} countries across all records",
            self.dataset.countries.distinct()
        ));
    }
}
