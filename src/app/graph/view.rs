use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::coauthor::Dataset;

use super::super::interaction::{Hit, Viewport, tooltip_anchor_offset};
use super::super::render_utils::{blend_color, draw_background, edge_visible, fade_color};
use super::super::{RenderGraph, ViewModel};

const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(102, 102, 102, 153);
const EDGE_HOVER_COLOR: Color32 = Color32::from_rgba_premultiplied(73, 73, 73, 220);
const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const INACTIVE_OPACITY: f32 = 0.2;

pub(in crate::app) fn edge_tooltip_text(
    dataset: &Dataset,
    render: &RenderGraph,
    index: usize,
) -> String {
    let publishers = render
        .edges
        .get(index)
        .and_then(|edge| dataset.graph.edge_at(edge.edge))
        .map(|edge| edge.publishers.join(", "))
        .unwrap_or_default();
    format!("Shared publications: {publishers}")
}

pub(in crate::app) fn node_tooltip_text(
    dataset: &Dataset,
    render: &RenderGraph,
    index: usize,
) -> String {
    match render
        .nodes
        .get(index)
        .and_then(|node| dataset.graph.node_at(node.author))
    {
        Some(node) => format!(
            "Author: {}\nAuthors with affiliations: {}",
            node.name, node.affiliation
        ),
        None => String::new(),
    }
}

impl RenderGraph {
    fn update_screen_space(&mut self, viewport: &Viewport, rect: egui::Rect) {
        let scale = viewport.scale(rect);
        let frame = self.engine.frame();
        let scratch = &mut self.view_scratch;

        scratch.screen_positions.clear();
        scratch.screen_positions.extend(
            frame
                .node_positions
                .iter()
                .map(|&world| viewport.world_to_screen(rect, world)),
        );
        scratch.screen_radii.clear();
        scratch
            .screen_radii
            .extend(self.nodes.iter().map(|node| (node.radius * scale).max(1.5)));
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.viewport.set_content_bounds(rect, self.graph_cache.layout_bounds());
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(rect, &response);
        draw_background(&painter, rect, self.viewport.canvas_rect(rect));

        let search_matches = self.current_search_matches();
        let scale = self.viewport.scale(rect);

        if self.graph_cache.nodes.is_empty() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No co-authorships found in the loaded records.",
                FontId::proportional(14.0),
                Color32::from_gray(90),
            );
            return;
        }

        let physics_moving = self.live_physics && self.graph_cache.engine.tick();
        if physics_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.graph_cache.update_screen_space(&self.viewport, rect);
        self.graph_cache.collect_visible_indices(rect);
        self.visible_node_count = self.graph_cache.view_scratch.visible_indices.len();

        let pointer = response.hover_pos();
        let hit = pointer.and_then(|pointer| self.graph_cache.hit_test(pointer, scale));
        match pointer {
            Some(pointer) if response.hovered() => {
                let (dataset, render) = (&self.dataset, &self.graph_cache);
                self.interaction.pointer_over(hit, pointer, |index| {
                    edge_tooltip_text(dataset, render, index)
                });
            }
            _ => self.interaction.pointer_left(),
        }

        if hit.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if ui.input(|input| input.key_pressed(egui::Key::Escape)) {
            self.interaction.dismiss_tooltip();
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let (dataset, render) = (&self.dataset, &self.graph_cache);
            self.interaction.clicked(hit, pointer, |index| {
                node_tooltip_text(dataset, render, index)
            });
            self.set_selected(match hit {
                Some(Hit::Node { index, .. }) => Some(index),
                Some(Hit::Edge(_)) => self.selected,
                None => None,
            });
        }

        let hovered_edge = match self.interaction.hovered() {
            Some(Hit::Edge(index)) => Some(index),
            _ => None,
        };
        let highlight = *self.interaction.highlight();
        let cache = &self.graph_cache;
        let scratch = &cache.view_scratch;

        let mut visible_edge_count = 0usize;
        let segments = &cache.engine.frame().edge_segments;
        for (index, (edge, &(source, target))) in cache.edges.iter().zip(segments).enumerate() {
            let start = self.viewport.world_to_screen(rect, source);
            let end = self.viewport.world_to_screen(rect, target);
            let width = (edge.stroke_width * scale).max(0.5);
            if !scratch.visible_mask[edge.source]
                && !scratch.visible_mask[edge.target]
                && !edge_visible(rect, start, end, width)
            {
                continue;
            }

            let color = if hovered_edge == Some(index) {
                EDGE_HOVER_COLOR
            } else {
                EDGE_COLOR
            };
            painter.line_segment([start, end], Stroke::new(width, color));
            visible_edge_count += 1;
        }

        let label_size = (10.0 * scale).clamp(6.0, 16.0);
        for &index in &scratch.visible_indices {
            let node = &cache.nodes[index];
            let position = scratch.screen_positions[index];
            let radius = scratch.screen_radii[index];
            let inactive = highlight.is_inactive(node.group);
            let is_match = search_matches.contains(&index);
            let is_selected = self.selected == Some(index);

            let mut fill = if is_match {
                blend_color(node.fill, SEARCH_MATCH_COLOR, 0.6)
            } else {
                node.fill
            };
            if inactive {
                fill = fade_color(fill, INACTIVE_OPACITY);
            }
            painter.circle_filled(position, radius, fill);

            if is_selected {
                painter.circle_stroke(position, radius + 2.5, Stroke::new(2.0, SELECTED_COLOR));
            } else if is_match {
                painter.circle_stroke(position, radius, Stroke::new(1.5, SEARCH_MATCH_COLOR));
            }

            if self.show_labels {
                let text_color = if inactive {
                    Color32::from_rgba_unmultiplied(30, 30, 30, 50)
                } else {
                    Color32::from_gray(30)
                };
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    node.name.as_str(),
                    FontId::proportional(label_size),
                    text_color,
                );
            }
        }
        self.visible_edge_count = visible_edge_count;

        if let Some(tooltip) = self.interaction.tooltip() {
            let galley = painter.layout_no_wrap(
                tooltip.text.clone(),
                FontId::proportional(13.0),
                Color32::from_gray(20),
            );
            let anchor = tooltip_anchor_offset(tooltip.anchor);
            let frame = egui::Rect::from_min_size(anchor, galley.size() + vec2(12.0, 8.0));
            painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(255, 255, 255, 235));
            painter.rect_stroke(
                frame,
                4.0,
                Stroke::new(1.0, Color32::from_gray(160)),
                egui::StrokeKind::Inside,
            );
            painter.galley(anchor + vec2(6.0, 4.0), galley, Color32::from_gray(20));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::app::physics::ForceConfig;
    use crate::records::{RawRecord, Record};

    #[test]
    fn tooltips_describe_publications_and_authors() {
        let rows = [
            ("A, B", "Journal X", Some("A Univ One, Dept; B Lab Two")),
            ("B, A", "Journal Y", None),
        ];
        let records = rows
            .iter()
            .map(|(authors, publisher, affiliations)| {
                Record::parse(&RawRecord {
                    authors: Some((*authors).to_owned()),
                    publisher: Some((*publisher).to_owned()),
                    authors_with_affiliations: affiliations.map(str::to_owned),
                    country: None,
                })
            })
            .collect::<Vec<_>>();
        let dataset = Dataset::from_records(PathBuf::from("papers.json"), &records);
        let render = RenderGraph::build(&dataset, ForceConfig::default());

        assert_eq!(
            edge_tooltip_text(&dataset, &render, 0),
            "Shared publications: Journal X, Journal Y"
        );
        assert_eq!(
            node_tooltip_text(&dataset, &render, 0),
            format!(
                "Author: A\nAuthors with affiliations: {}",
                dataset.graph.node("A").map_or("", |node| node.affiliation.as_str())
            )
        );
        assert_eq!(edge_tooltip_text(&dataset, &render, 9), "Shared publications: ");
        assert!(node_tooltip_text(&dataset, &render, 9).is_empty());
    }
}
