use std::f32::consts::{PI, TAU};

use crate::grid::Grid;
use crate::types::{CellPos, Vec3};

pub(super) fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

pub(super) fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Camera-relative movement: `intent.1` is forward along `yaw`, `intent.0` strafes right.
pub(super) fn movement_delta(yaw: f32, intent: (f32, f32), speed: f32, dt_sec: f32) -> Vec3 {
    let forward = Vec3::from_heading(yaw);
    let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());
    (right * intent.0 + forward * intent.1) * (speed * dt_sec)
}

pub(super) fn cell_of(grid: &Grid, position: Vec3) -> CellPos {
    let (x, z) = grid.cell_of_point(position);
    CellPos::new(x, z)
}

/// Heading that faces from `from` toward `to` on the ground plane.
pub(super) fn heading_toward(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
        let wrapped = wrap_angle(100.0);
        assert!((-PI..PI).contains(&wrapped));
    }

    #[test]
    fn movement_follows_yaw() {
        let forward = movement_delta(0.0, (0.0, 1.0), 5.0, 0.2);
        assert!((forward.z - 1.0).abs() < 1e-6);
        assert!(forward.x.abs() < 1e-6);

        let strafe = movement_delta(0.0, (1.0, 0.0), 5.0, 0.2);
        assert!((strafe.x - 1.0).abs() < 1e-6);

        let turned = movement_delta(PI / 2.0, (0.0, 1.0), 5.0, 0.2);
        assert!((turned.x - 1.0).abs() < 1e-5);
        assert!(turned.z.abs() < 1e-5);
    }

    #[test]
    fn heading_toward_matches_from_heading() {
        let from = Vec3::new(1.0, 0.0, 1.0);
        let to = Vec3::new(-3.0, 0.0, 4.0);
        let dir = Vec3::from_heading(heading_toward(from, to));
        let expected = (to - from).normalized_xz().expect("distinct points");
        assert!((dir.x - expected.x).abs() < 1e-5);
        assert!((dir.z - expected.z).abs() < 1e-5);
    }
}
