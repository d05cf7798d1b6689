use eframe::egui::Color32;

use crate::coauthor::{CoauthorGraph, ConnectedGraph, CountryRanking};

use super::render_utils::blend_color;

pub(in crate::app) const RADIUS_RANGE: (f32, f32) = (3.0, 12.0);
pub(in crate::app) const STROKE_WIDTH_RANGE: (f32, f32) = (1.0, 5.0);

pub(in crate::app) const GRADIENT_LOW: Color32 = Color32::from_rgb(0xff, 0xcc, 0xcc);
pub(in crate::app) const GRADIENT_MID: Color32 = Color32::from_rgb(0xff, 0x66, 0x66);
pub(in crate::app) const GRADIENT_HIGH: Color32 = Color32::from_rgb(0x00, 0x55, 0xff);
pub(in crate::app) const FALLBACK_FILL: Color32 = Color32::from_rgb(0xa9, 0xa9, 0xa9);

/// Maps `[min, max]` of the input onto an output range.
///
/// A collapsed input domain maps everything to the middle of the output range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    pub(in crate::app) fn from_extent(
        values: impl IntoIterator<Item = f32>,
        range: (f32, f32),
    ) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for value in values {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 0.0;
        }

        Self {
            domain: (min, max),
            range,
        }
    }

    pub(in crate::app) fn apply(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() <= f32::EPSILON {
            return (r0 + r1) * 0.5;
        }
        r0 + ((value - d0) / span) * (r1 - r0)
    }
}

/// Square-root scale: area, not radius, grows linearly with the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SqrtScale(LinearScale);

impl SqrtScale {
    pub(in crate::app) fn from_extent(
        values: impl IntoIterator<Item = f32>,
        range: (f32, f32),
    ) -> Self {
        Self(LinearScale::from_extent(
            values.into_iter().map(|value| value.max(0.0).sqrt()),
            range,
        ))
    }

    pub(in crate::app) fn apply(&self, value: f32) -> f32 {
        self.0.apply(value.max(0.0).sqrt())
    }
}

/// Piecewise-linear gradient over the stops `0`, `ranked / 2` and `ranked - 1`.
///
/// A collapsed upper segment (one or two ranked countries) sits halfway
/// between the mid and high stops.
pub(in crate::app) fn gradient_color(rank: usize, ranked: usize) -> Color32 {
    let last = ranked.saturating_sub(1) as f32;
    let mid = (ranked / 2) as f32;
    let rank = (rank as f32).min(last);
    if rank < mid {
        blend_color(GRADIENT_LOW, GRADIENT_MID, rank / mid)
    } else if last > mid {
        blend_color(GRADIENT_MID, GRADIENT_HIGH, (rank - mid) / (last - mid))
    } else {
        blend_color(GRADIENT_MID, GRADIENT_HIGH, 0.5)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct LegendEntry {
    pub(in crate::app) country: String,
    pub(in crate::app) count: usize,
    pub(in crate::app) color: Color32,
}

pub(in crate::app) fn country_legend(countries: &CountryRanking) -> Vec<LegendEntry> {
    let ranked = countries.top().len();
    countries
        .top()
        .iter()
        .enumerate()
        .map(|(rank, entry)| LegendEntry {
            country: entry.country.clone(),
            count: entry.count,
            color: gradient_color(rank, ranked),
        })
        .collect()
}

/// Per-node and per-edge visual attributes for the connected subgraph.
pub(in crate::app) struct VisualEncoding {
    pub(in crate::app) degrees: Vec<usize>,
    pub(in crate::app) radii: Vec<f32>,
    pub(in crate::app) stroke_widths: Vec<f32>,
    pub(in crate::app) fills: Vec<Color32>,
}

impl VisualEncoding {
    pub(in crate::app) fn new(
        graph: &CoauthorGraph,
        connected: &ConnectedGraph,
        countries: &CountryRanking,
    ) -> Self {
        let degrees = connected.degrees();
        let radius_scale =
            SqrtScale::from_extent(degrees.iter().map(|&degree| degree as f32), RADIUS_RANGE);
        let radii = degrees
            .iter()
            .map(|&degree| radius_scale.apply(degree as f32))
            .collect();

        let weights = connected
            .edges
            .iter()
            .map(|edge| graph.edge_at(edge.edge).map_or(0, |edge| edge.weight()) as f32)
            .collect::<Vec<_>>();
        let stroke_scale = LinearScale::from_extent(weights.iter().copied(), STROKE_WIDTH_RANGE);
        let stroke_widths = weights
            .iter()
            .map(|&weight| stroke_scale.apply(weight))
            .collect();

        let ranked = countries.top().len();
        let fills = connected
            .nodes
            .iter()
            .map(|&index| {
                graph
                    .node_at(index)
                    .and_then(|node| node.country.as_deref())
                    .and_then(|country| countries.rank_of(country))
                    .map_or(FALLBACK_FILL, |rank| gradient_color(rank, ranked))
            })
            .collect();

        Self {
            degrees,
            radii,
            stroke_widths,
            fills,
        }
    }
}
