use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::QuadNode;

const BARNES_HUT_THETA_SQ: f32 = 0.9 * 0.9;
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;
const CENTERING_STRENGTH: f32 = 0.1;
const COLLISION_STRENGTH: f32 = 1.0;

/// Tiny deterministic offset for separating coincident points.
pub(super) fn jiggle(seed: usize) -> f32 {
    let phase = ((seed as f32) * 0.618_034 + 0.37).fract();
    (phase - 0.5) * 1e-6
}

fn separate(delta: Vec2, seed: usize) -> Vec2 {
    vec2(
        if delta.x == 0.0 { jiggle(seed) } else { delta.x },
        if delta.y == 0.0 { jiggle(seed.wrapping_mul(31)) } else { delta.y },
    )
}

pub(super) fn apply_centering(bodies: &mut [Body], alpha: f32) {
    let pull = CENTERING_STRENGTH * alpha;
    for body in bodies {
        body.velocity -= body.position * pull;
    }
}

pub(super) fn apply_charge(bodies: &mut [Body], positions: &[Vec2], strength: f32, alpha: f32) {
    if strength == 0.0 {
        return;
    }
    let Some(tree) = QuadNode::build(positions, &[]) else {
        return;
    };

    let scale = strength * alpha;
    for (index, body) in bodies.iter_mut().enumerate() {
        let mut change = Vec2::ZERO;
        accumulate_charge(&tree, index, positions, scale, &mut change);
        body.velocity += change;
    }
}

fn charge_from(delta: Vec2, weight: f32, seed: usize) -> Vec2 {
    let mut delta = delta;
    let mut distance_sq = delta.length_sq();
    if distance_sq == 0.0 {
        delta = separate(delta, seed);
        distance_sq = delta.length_sq();
    }
    if distance_sq < CHARGE_DISTANCE_MIN_SQ {
        distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
    }
    delta * (weight / distance_sq)
}

fn accumulate_charge(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    scale: f32,
    change: &mut Vec2,
) {
    if cell.count <= 0.0 {
        return;
    }

    let point = positions[index];
    if cell.is_leaf() {
        for &other in &cell.members {
            if other != index {
                *change += charge_from(positions[other] - point, scale, index ^ other);
            }
        }
        return;
    }

    let delta = cell.centroid - point;
    let width = cell.bounds.width();
    if width * width / BARNES_HUT_THETA_SQ < delta.length_sq() {
        *change += charge_from(delta, scale * cell.count, index);
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, scale, change);
    }
}

/// Pushes apart nodes whose circles overlap at their predicted next positions.
pub(super) fn apply_collision(bodies: &mut [Body], radii: &[f32], scratch: &mut CollisionScratch) {
    scratch.predicted.clear();
    scratch
        .predicted
        .extend(bodies.iter().map(|body| body.position + body.velocity));
    scratch.changes.clear();
    scratch.changes.resize(bodies.len(), Vec2::ZERO);

    let Some(tree) = QuadNode::build(&scratch.predicted, radii) else {
        return;
    };
    collide_cells(&tree, &tree, &scratch.predicted, radii, &mut scratch.changes);

    for (body, change) in bodies.iter_mut().zip(&scratch.changes) {
        body.velocity += *change;
    }
}

#[derive(Default)]
pub(super) struct CollisionScratch {
    predicted: Vec<Vec2>,
    changes: Vec<Vec2>,
}

fn collide_pair(from: usize, to: usize, predicted: &[Vec2], radii: &[f32], changes: &mut [Vec2]) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq == 0.0 {
        delta = separate(delta, from.wrapping_mul(7) ^ to);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * COLLISION_STRENGTH);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    changes[from] += push * share;
    changes[to] -= push * (1.0 - share);
}

fn collide_cells(
    cell_a: &QuadNode,
    cell_b: &QuadNode,
    predicted: &[Vec2],
    radii: &[f32],
    changes: &mut [Vec2],
) {
    let reach = cell_a.max_radius + cell_b.max_radius;
    if cell_a.bounds.gap_sq(cell_b.bounds) > reach * reach {
        return;
    }

    let same = std::ptr::eq(cell_a, cell_b);
    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same {
            for (offset, &from) in cell_a.members.iter().enumerate() {
                for &to in &cell_a.members[offset + 1..] {
                    collide_pair(from, to, predicted, radii, changes);
                }
            }
        } else {
            for &from in &cell_a.members {
                for &to in &cell_b.members {
                    collide_pair(from, to, predicted, radii, changes);
                }
            }
        }
        return;
    }

    if same {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            collide_cells(child, child, predicted, radii, changes);
            for other in &children[offset + 1..] {
                collide_cells(child, other, predicted, radii, changes);
            }
        }
        return;
    }

    let split_a = !cell_a.is_leaf()
        && (cell_b.is_leaf() || cell_a.bounds.half_extent >= cell_b.bounds.half_extent);
    if split_a {
        for child in cell_a.children() {
            collide_cells(child, cell_b, predicted, radii, changes);
        }
    } else {
        for child in cell_b.children() {
            collide_cells(cell_a, child, predicted, radii, changes);
        }
    }
}

/// Springs along edges, shared between endpoints by their link counts.
pub(super) fn apply_links(
    bodies: &mut [Body],
    links: &[SpringLink],
    rest_length: f32,
    strength: f32,
    alpha: f32,
) {
    for (index, link) in links.iter().enumerate() {
        let (source, target) = (link.source, link.target);
        if source == target || source >= bodies.len() || target >= bodies.len() {
            continue;
        }

        let mut delta = (bodies[target].position + bodies[target].velocity)
            - (bodies[source].position + bodies[source].velocity);
        if delta.length_sq() == 0.0 {
            delta = separate(delta, index);
        }
        let distance = delta.length();
        let correction = delta * ((distance - rest_length) / distance * alpha * strength);

        bodies[target].velocity -= correction * link.bias;
        bodies[source].velocity += correction * (1.0 - link.bias);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct SpringLink {
    pub(super) source: usize,
    pub(super) target: usize,
    /// Share of the correction taken by the target.
    pub(super) bias: f32,
}

impl SpringLink {
    pub(super) fn with_bias(links: &[(usize, usize)], node_count: usize) -> Vec<Self> {
        let mut counts = vec![0usize; node_count];
        for &(source, target) in links {
            counts[source] += 1;
            counts[target] += 1;
        }

        links
            .iter()
            .map(|&(source, target)| {
                let total = counts[source] + counts[target];
                Self {
                    source,
                    target,
                    bias: if total == 0 {
                        0.5
                    } else {
                        counts[source] as f32 / total as f32
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body {
            position: vec2(x, y),
            velocity: Vec2::ZERO,
        }
    }

    #[test]
    fn centering_pulls_toward_origin_per_axis() {
        let mut bodies = vec![body(10.0, -20.0)];
        apply_centering(&mut bodies, 1.0);
        assert_eq!(bodies[0].velocity, vec2(-1.0, 2.0));
    }

    #[test]
    fn negative_charge_repels_and_positive_attracts() {
        let positions = vec![vec2(-5.0, 0.0), vec2(5.0, 0.0)];
        let mut bodies = positions.iter().map(|p| body(p.x, p.y)).collect::<Vec<_>>();
        apply_charge(&mut bodies, &positions, -50.0, 1.0);
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
        // inverse distance: 50 / 10
        assert!((bodies[1].velocity.x - 5.0).abs() < 1e-4);

        let mut bodies = positions.iter().map(|p| body(p.x, p.y)).collect::<Vec<_>>();
        apply_charge(&mut bodies, &positions, 30.0, 1.0);
        assert!(bodies[0].velocity.x > 0.0);
        assert!(bodies[1].velocity.x < 0.0);
    }

    #[test]
    fn far_cluster_charge_matches_pairwise_sum() {
        let mut positions = (0..20)
            .map(|index| vec2(1000.0 + (index % 5) as f32, (index / 5) as f32))
            .collect::<Vec<_>>();
        positions.push(vec2(-1000.0, 0.0));
        let sample = positions.len() - 1;
        let mut bodies = positions.iter().map(|p| body(p.x, p.y)).collect::<Vec<_>>();

        apply_charge(&mut bodies, &positions, -10.0, 1.0);

        let exact = positions[..sample]
            .iter()
            .map(|other| {
                let delta = *other - positions[sample];
                delta * (-10.0 / delta.length_sq())
            })
            .fold(Vec2::ZERO, |sum, change| sum + change);
        assert!((bodies[sample].velocity.x - exact.x).abs() < exact.x.abs() * 0.01);
    }

    #[test]
    fn overlapping_circles_are_separated_by_area_share() {
        let mut bodies = vec![body(0.0, 0.0), body(4.0, 0.0)];
        let radii = [3.0, 3.0];
        apply_collision(&mut bodies, &radii, &mut CollisionScratch::default());

        // overlap of 2 split evenly for equal radii
        assert!((bodies[0].velocity.x + 1.0).abs() < 1e-5);
        assert!((bodies[1].velocity.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn distant_circles_do_not_collide() {
        let mut bodies = vec![body(0.0, 0.0), body(40.0, 0.0)];
        apply_collision(&mut bodies, &[3.0, 3.0], &mut CollisionScratch::default());
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
        assert_eq!(bodies[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn springs_pull_long_links_and_push_short_ones() {
        let links = SpringLink::with_bias(&[(0, 1)], 2);
        assert_eq!(links[0].bias, 0.5);

        let mut bodies = vec![body(0.0, 0.0), body(300.0, 0.0)];
        apply_links(&mut bodies, &links, 150.0, 0.5, 1.0);
        assert!((bodies[0].velocity.x - 37.5).abs() < 1e-3);
        assert!((bodies[1].velocity.x + 37.5).abs() < 1e-3);

        let mut bodies = vec![body(0.0, 0.0), body(50.0, 0.0)];
        apply_links(&mut bodies, &links, 150.0, 0.5, 1.0);
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
    }

    #[test]
    fn self_links_are_ignored() {
        let links = SpringLink::with_bias(&[(0, 0)], 1);
        let mut bodies = vec![body(3.0, 4.0)];
        apply_links(&mut bodies, &links, 150.0, 1.0, 1.0);
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn bias_favors_the_busier_endpoint() {
        let links = SpringLink::with_bias(&[(0, 1), (0, 2), (0, 3)], 4);
        // source has 3 links, target 1: target moves more
        assert!((links[0].bias - 0.75).abs() < 1e-6);
    }
}
