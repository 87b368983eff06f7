use crate::grid::Grid;
use crate::rng::Rng;
use crate::types::CellPos;

use super::{carve_cell, GenerationParams, Layout, Rect};

/// City blocks: a lattice of roads every `block_pitch` cells, with the lots in
/// between either left standing as buildings or cleared as open yards.
///
/// Every road row crosses every road column, and each lot touches the road on
/// its low-x and low-z sides, so everything carved is connected to `(1, 1)`.
pub(super) fn carve(grid: &mut Grid, params: &GenerationParams, rng: &mut Rng) -> Layout {
    let pitch = params.block_pitch;
    let max_x = grid.width() - 2;
    let max_z = grid.height() - 2;

    for z in 1..=max_z {
        for x in 1..=max_x {
            if is_road(x, pitch) || is_road(z, pitch) {
                carve_cell(grid, x, z);
            }
        }
    }

    let mut yards = Vec::new();
    let mut lot_z = 2;
    while lot_z <= max_z {
        let mut lot_x = 2;
        while lot_x <= max_x {
            let lot = Rect::new(
                lot_x,
                lot_z,
                (pitch - 1).min(max_x - lot_x + 1),
                (pitch - 1).min(max_z - lot_z + 1),
            );
            if !rng.bool(params.building_chance) {
                for z in lot.z..lot.z + lot.h {
                    for x in lot.x..lot.x + lot.w {
                        carve_cell(grid, x, z);
                    }
                }
                yards.push(lot);
            }
            lot_x += pitch;
        }
        lot_z += pitch;
    }

    Layout {
        rooms: yards,
        spawn: CellPos::new(1, 1),
        exit: None,
    }
}

fn is_road(coord: i32, pitch: i32) -> bool {
    (coord - 1) % pitch == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::types::Vec3;

    #[test]
    fn roads_follow_the_pitch_and_buildings_stay_solid() {
        let mut grid = Grid::filled(12, 12, 4.0, Vec3::ZERO, Cell::Solid);
        let params = GenerationParams {
            block_pitch: 5,
            building_chance: 1.0,
            ..GenerationParams::default()
        };
        let layout = carve(&mut grid, &params, &mut Rng::new(3));

        assert!(layout.rooms.is_empty());
        assert!(grid.is_passable(1, 7));
        assert!(grid.is_passable(6, 3));
        assert!(grid.is_passable(10, 6));
        assert!(!grid.is_passable(3, 3));
        assert!(!grid.is_passable(8, 9));
        assert!(!grid.is_passable(11, 1));
    }

    #[test]
    fn cleared_lots_become_yards() {
        let mut grid = Grid::filled(12, 12, 4.0, Vec3::ZERO, Cell::Solid);
        let params = GenerationParams {
            block_pitch: 5,
            building_chance: 0.0,
            ..GenerationParams::default()
        };
        let layout = carve(&mut grid, &params, &mut Rng::new(3));

        assert_eq!(layout.rooms.len(), 4);
        assert_eq!(layout.rooms[0], Rect::new(2, 2, 4, 4));
        // the last lot is clipped to the interior
        assert_eq!(layout.rooms[3], Rect::new(7, 7, 4, 4));
        for z in 1..=10 {
            for x in 1..=10 {
                assert!(grid.is_passable(x, z));
            }
        }
    }
}
