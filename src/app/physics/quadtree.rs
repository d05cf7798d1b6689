use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = vec2(
            if quadrant & 1 == 0 { -quarter } else { quarter },
            if quadrant & 2 == 0 { -quarter } else { quarter },
        );

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    pub(super) fn width(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx * dx + dy * dy
    }
}

/// Region quadtree over node positions.
///
/// Every cell tracks its point count and centroid for Barnes-Hut
/// approximation and the largest member radius for collision pruning.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) centroid: Vec2,
    pub(super) count: f32,
    pub(super) max_radius: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(points: &[Vec2], radii: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::enclosing(points)?;
        let members = (0..points.len()).collect::<Vec<_>>();
        Some(Self::build_cell(bounds, members, points, radii, 0))
    }

    fn build_cell(
        bounds: QuadBounds,
        members: Vec<usize>,
        points: &[Vec2],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let mut centroid = Vec2::ZERO;
        let mut max_radius = 0.0_f32;
        for &index in &members {
            centroid += points[index];
            max_radius = max_radius.max(radii.get(index).copied().unwrap_or(0.0));
        }

        let count = members.len() as f32;
        if count > 0.0 {
            centroid /= count;
        }

        let mut cell = Self {
            bounds,
            centroid,
            count,
            max_radius,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || cell.members.len() <= QUADTREE_LEAF_CAPACITY {
            return cell;
        }

        let mut buckets = std::array::from_fn::<Vec<usize>, 4, _>(|_| Vec::new());
        for &index in &cell.members {
            buckets[bounds.quadrant_of(points[index])].push(index);
        }

        // coincident points would recurse forever
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            cell.children[quadrant] = Some(Box::new(Self::build_cell(
                bounds.quadrant(quadrant),
                bucket,
                points,
                radii,
                depth + 1,
            )));
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}
