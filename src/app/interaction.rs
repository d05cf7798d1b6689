use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use super::highlight::GroupHighlight;

pub(in crate::app) const CANVAS_EXTENT: f32 = 2200.0;
pub(in crate::app) const ZOOM_MIN: f32 = 1.0;
pub(in crate::app) const ZOOM_MAX: f32 = 8.0;

fn canvas_bounds() -> Rect {
    Rect::from_center_size(Pos2::ZERO, Vec2::splat(CANVAS_EXTENT))
}

/// Pan/zoom transform from layout space onto the graph panel.
///
/// The square canvas is first fitted into the panel, then zoomed and panned.
/// Panning is confined to the canvas grown by the current layout bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pan: Vec2,
    zoom: f32,
    extent: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: ZOOM_MIN,
            extent: canvas_bounds(),
        }
    }
}

impl Viewport {
    pub(in crate::app) fn zoom(&self) -> f32 {
        self.zoom
    }

    pub(in crate::app) fn scale(&self, rect: Rect) -> f32 {
        (rect.width().min(rect.height()) / CANVAS_EXTENT) * self.zoom
    }

    pub(in crate::app) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.scale(rect)
    }

    pub(in crate::app) fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.scale(rect)
    }

    pub(in crate::app) fn canvas_rect(&self, rect: Rect) -> Rect {
        let half = CANVAS_EXTENT * 0.5;
        Rect::from_min_max(
            self.world_to_screen(rect, vec2(-half, -half)),
            self.world_to_screen(rect, vec2(half, half)),
        )
    }

    /// Multiplies the zoom by `factor`, keeping the world point under `anchor` fixed.
    pub(in crate::app) fn zoom_at(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let world_before = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = anchor - rect.center() - world_before * self.scale(rect);
        self.confine(rect);
    }

    pub(in crate::app) fn pan_by(&mut self, rect: Rect, delta: Vec2) {
        self.pan += delta;
        self.confine(rect);
    }

    pub(in crate::app) fn reset(&mut self) {
        let extent = self.extent;
        *self = Self::default();
        self.extent = extent;
    }

    /// Grows the pannable area to cover nodes that settled outside the canvas.
    pub(in crate::app) fn set_content_bounds(&mut self, rect: Rect, layout: Option<Rect>) {
        let canvas = canvas_bounds();
        self.extent = layout.map_or(canvas, |layout| canvas.union(layout));
        self.confine(rect);
    }

    fn confine(&mut self, rect: Rect) {
        let scale = self.scale(rect);
        let center = rect.center();
        let extent = self.extent;
        // Content narrower than the panel is centered on that axis.
        let axis = |pan: f32, low: f32, high: f32, center: f32, min: f32, max: f32| {
            let lower = high - center - max * scale;
            let upper = low - center - min * scale;
            if lower > upper {
                (lower + upper) * 0.5
            } else {
                pan.clamp(lower, upper)
            }
        };
        self.pan = vec2(
            axis(
                self.pan.x,
                rect.left(),
                rect.right(),
                center.x,
                extent.min.x,
                extent.max.x,
            ),
            axis(
                self.pan.y,
                rect.top(),
                rect.bottom(),
                center.y,
                extent.min.y,
                extent.max.y,
            ),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Hit {
    Node { index: usize, group: usize },
    Edge(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum TooltipSource {
    Edge(usize),
    Node(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Tooltip {
    pub(in crate::app) text: String,
    pub(in crate::app) anchor: Pos2,
    pub(in crate::app) source: TooltipSource,
}

/// Hover, tooltip and group-highlight state driven by pointer events.
#[derive(Default)]
pub(in crate::app) struct InteractionState {
    hovered: Option<Hit>,
    tooltip: Option<Tooltip>,
    highlight: GroupHighlight,
}

impl InteractionState {
    pub(in crate::app) fn hovered(&self) -> Option<Hit> {
        self.hovered
    }

    pub(in crate::app) fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub(in crate::app) fn highlight(&self) -> &GroupHighlight {
        &self.highlight
    }

    /// Applies the enter/leave transitions for whatever is now under the pointer.
    pub(in crate::app) fn pointer_over(
        &mut self,
        hit: Option<Hit>,
        pointer: Pos2,
        edge_text: impl FnOnce(usize) -> String,
    ) {
        let previous = self.hovered;
        if previous != hit {
            match previous {
                Some(Hit::Edge(edge)) => {
                    if self.tooltip.as_ref().map(|tooltip| &tooltip.source)
                        == Some(&TooltipSource::Edge(edge))
                    {
                        self.tooltip = None;
                    }
                }
                Some(Hit::Node { .. }) => self.highlight.clear(),
                None => {}
            }

            match hit {
                Some(Hit::Edge(edge)) => {
                    self.tooltip = Some(Tooltip {
                        text: edge_text(edge),
                        anchor: pointer,
                        source: TooltipSource::Edge(edge),
                    });
                }
                Some(Hit::Node { group, .. }) => self.highlight.activate(group),
                None => {}
            }
            self.hovered = hit;
        }

        if let (Some(Hit::Edge(edge)), Some(tooltip)) = (hit, self.tooltip.as_mut())
            && tooltip.source == TooltipSource::Edge(edge)
        {
            tooltip.anchor = pointer;
        }
    }

    pub(in crate::app) fn pointer_left(&mut self) {
        if let Some(Hit::Edge(_)) = self.hovered {
            self.tooltip = None;
        }
        self.highlight.clear();
        self.hovered = None;
    }

    /// Pins an author tooltip at the click point; a click on empty canvas dismisses it.
    pub(in crate::app) fn clicked(
        &mut self,
        hit: Option<Hit>,
        pointer: Pos2,
        node_text: impl FnOnce(usize) -> String,
    ) {
        match hit {
            Some(Hit::Node { index, .. }) => {
                self.tooltip = Some(Tooltip {
                    text: node_text(index),
                    anchor: pointer,
                    source: TooltipSource::Node(index),
                });
            }
            Some(Hit::Edge(_)) => {}
            None => self.tooltip = None,
        }
    }

    pub(in crate::app) fn dismiss_tooltip(&mut self) {
        self.tooltip = None;
    }
}

pub(in crate::app) fn tooltip_anchor_offset(anchor: Pos2) -> Pos2 {
    pos2(anchor.x + 10.0, anchor.y - 10.0)
}
