use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::interaction::Hit;
use super::super::render_utils::{circle_visible, distance_to_segment};
use super::super::{RenderGraph, ViewModel};

const EDGE_HIT_SLOP: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.viewport.zoom_at(rect, pointer, zoom_factor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, rect: Rect, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport.pan_by(rect, response.drag_delta());
        }
    }
}

impl RenderGraph {
    pub(in crate::app) fn collect_visible_indices(&mut self, rect: Rect) {
        let scratch = &mut self.view_scratch;
        scratch.visible_indices.clear();
        scratch.visible_mask.clear();
        scratch.visible_mask.resize(self.nodes.len(), false);

        for index in 0..scratch.screen_positions.len() {
            if circle_visible(
                rect,
                scratch.screen_positions[index],
                scratch.screen_radii[index],
            ) {
                scratch.visible_indices.push(index);
                scratch.visible_mask[index] = true;
            }
        }
    }

    /// Layout-space box around every node circle, or `None` before any node exists.
    pub(in crate::app) fn layout_bounds(&self) -> Option<Rect> {
        let positions = &self.engine.frame().node_positions;
        let mut bounds: Option<Rect> = None;
        for (node, &position) in self.nodes.iter().zip(positions) {
            let circle = Rect::from_center_size(position.to_pos2(), Vec2::splat(node.radius * 2.0));
            bounds = Some(bounds.map_or(circle, |bounds| bounds.union(circle)));
        }
        bounds
    }

    /// Nodes win over edges; among nodes the closest center wins.
    pub(in crate::app) fn hit_test(&self, pointer: Pos2, edge_scale: f32) -> Option<Hit> {
        let scratch = &self.view_scratch;
        let node = scratch
            .visible_indices
            .iter()
            .filter_map(|&index| {
                let distance = scratch.screen_positions[index].distance(pointer);
                (distance <= scratch.screen_radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((index, _)) = node {
            return Some(Hit::Node {
                index,
                group: self.nodes[index].group,
            });
        }

        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.source != edge.target)
            .filter_map(|(index, edge)| {
                let start = *scratch.screen_positions.get(edge.source)?;
                let end = *scratch.screen_positions.get(edge.target)?;
                let distance = distance_to_segment(pointer, start, end);
                let reach = (edge.stroke_width * edge_scale).max(1.0) * 0.5 + EDGE_HIT_SLOP;
                (distance <= reach).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| Hit::Edge(index))
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::app::physics::{ForceConfig, LayoutEngine, LayoutTopology};
    use crate::app::{RenderEdge, RenderNode, ViewScratch};

    fn two_nodes() -> RenderGraph {
        let nodes = (0..2)
            .map(|index| RenderNode {
                author: index,
                name: format!("N{index}"),
                group: index * 10,
                degree: 1,
                radius: 5.0,
                fill: egui::Color32::GRAY,
            })
            .collect();
        let mut graph = RenderGraph {
            nodes,
            edges: vec![RenderEdge {
                edge: 0,
                source: 0,
                target: 1,
                stroke_width: 2.0,
            }],
            engine: LayoutEngine::new(
                LayoutTopology::new(vec![5.0, 5.0], &[(0, 1)]),
                ForceConfig::default(),
            ),
            view_scratch: ViewScratch::default(),
        };
        graph.view_scratch.screen_positions = vec![pos2(10.0, 10.0), pos2(110.0, 10.0)];
        graph.view_scratch.screen_radii = vec![5.0, 5.0];
        graph.collect_visible_indices(Rect::from_min_max(pos2(0.0, 0.0), pos2(200.0, 200.0)));
        graph
    }

    #[test]
    fn nodes_take_priority_over_edges() {
        let graph = two_nodes();
        assert_eq!(
            graph.hit_test(pos2(12.0, 10.0), 1.0),
            Some(Hit::Node { index: 0, group: 0 })
        );
        assert_eq!(
            graph.hit_test(pos2(109.0, 11.0), 1.0),
            Some(Hit::Node { index: 1, group: 10 })
        );
        assert_eq!(graph.hit_test(pos2(60.0, 12.0), 1.0), Some(Hit::Edge(0)));
        assert_eq!(graph.hit_test(pos2(60.0, 40.0), 1.0), None);
    }

    #[test]
    fn layout_bounds_cover_every_node_circle() {
        let graph = two_nodes();
        let bounds = graph.layout_bounds().unwrap();
        assert_eq!(graph.engine.frame().node_positions.len(), 2);
        for &position in &graph.engine.frame().node_positions {
            assert!(bounds.contains(position.to_pos2()));
            assert!(bounds.min.x <= position.x - 5.0 && bounds.max.x >= position.x + 5.0);
            assert!(bounds.min.y <= position.y - 5.0 && bounds.max.y >= position.y + 5.0);
        }

        let empty = RenderGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            engine: LayoutEngine::new(LayoutTopology::new(Vec::new(), &[]), ForceConfig::default()),
            view_scratch: ViewScratch::default(),
        };
        assert_eq!(empty.layout_bounds(), None);
    }

    #[test]
    fn offscreen_nodes_are_not_visible() {
        let mut graph = two_nodes();
        graph.collect_visible_indices(Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 50.0)));
        assert_eq!(graph.view_scratch.visible_indices, vec![0]);
        assert_eq!(graph.view_scratch.visible_mask, vec![true, false]);
    }
}
