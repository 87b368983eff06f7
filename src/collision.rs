use crate::grid::Grid;
use crate::types::Vec3;

/// Circle-vs-grid queries on the XZ plane.
///
/// Resolution is a single discrete pass per call. Nothing is swept, so an
/// entity moving more than its radius in one tick can pass through a thin
/// wall; callers keep per-tick steps small.
#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver<'a> {
    grid: &'a Grid,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Points outside the grid count as blocked.
    pub fn is_blocked(&self, point: Vec3) -> bool {
        let (x, z) = self.grid.cell_of_point(point);
        self.cell_blocks(x, z)
    }

    fn cell_blocks(&self, x: i32, z: i32) -> bool {
        !self.grid.is_passable(x, z)
    }

    fn neighborhood_span(&self, radius: f32) -> i32 {
        ((radius / self.grid.cell_size()).ceil() as i32).max(1)
    }

    /// True if any blocking cell lies strictly closer than `radius`.
    pub fn overlaps(&self, position: Vec3, radius: f32) -> bool {
        let span = self.neighborhood_span(radius);
        let (cx, cz) = self.grid.cell_of_point(position);
        for z in (cz - span)..=(cz + span) {
            for x in (cx - span)..=(cx + span) {
                if !self.cell_blocks(x, z) {
                    continue;
                }
                let (px, pz) = self.closest_point(x, z, position);
                let dx = position.x - px;
                let dz = position.z - pz;
                if (dx * dx + dz * dz).sqrt() < radius {
                    return true;
                }
            }
        }
        false
    }

    pub fn resolve(&self, position: Vec3, radius: f32) -> Vec3 {
        let span = self.neighborhood_span(radius);
        let (cx, cz) = self.grid.cell_of_point(position);
        let mut out = position;

        for z in (cz - span)..=(cz + span) {
            for x in (cx - span)..=(cx + span) {
                if !self.cell_blocks(x, z) {
                    continue;
                }
                let (px, pz) = self.closest_point(x, z, out);
                let dx = out.x - px;
                let dz = out.z - pz;
                let distance = (dx * dx + dz * dz).sqrt();
                // distance == 0: center inside the cell, no usable push direction
                if distance <= 0.0 || distance >= radius {
                    continue;
                }
                let push = (radius - distance) / distance;
                out.x += dx * push;
                out.z += dz * push;
            }
        }

        out
    }

    /// Moves along X, resolves, then along Z, resolves. A wall on one axis
    /// leaves motion on the other axis intact.
    pub fn move_sliding(&self, position: Vec3, delta: Vec3, radius: f32) -> Vec3 {
        let mut next = position;
        next.x += delta.x;
        next = self.resolve(next, radius);
        next.z += delta.z;
        next = self.resolve(next, radius);
        next
    }

    fn closest_point(&self, x: i32, z: i32, position: Vec3) -> (f32, f32) {
        let (min_x, min_z, max_x, max_z) = self.grid.cell_bounds(x, z);
        (
            position.x.clamp(min_x, max_x),
            position.z.clamp(min_z, max_z),
        )
    }
}
