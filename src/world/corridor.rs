use crate::error::SimIssue;
use crate::grid::{Cell, Grid};
use crate::rng::Rng;
use crate::types::CellPos;

use super::{carve_cell, is_interior, GenerationParams, Layout, Rect};

const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const BRANCH_TURN_CHANCE: f32 = 0.25;
const SIDE_ROOM_MIN: i32 = 2;
const SIDE_ROOM_MAX: i32 = 3;

/// Rooms joined in placement order by L-shaped corridors, with a few dead-end
/// branches. Spawn is the first room, the exit the last.
pub(super) fn carve(
    grid: &mut Grid,
    params: &GenerationParams,
    rng: &mut Rng,
    notices: &mut Vec<SimIssue>,
) -> Layout {
    let mut rooms = place_rooms(grid, params, rng);
    if rooms.len() < params.room_count {
        notices.push(SimIssue::GenerationExhausted {
            what: "rooms",
            placed: rooms.len(),
            requested: params.room_count,
        });
    }
    if rooms.is_empty() {
        rooms.push(fallback_room(grid));
    }

    for room in &rooms {
        carve_rect(grid, room);
    }

    for pair in rooms.windows(2) {
        let horizontal_first = rng.bool(0.5);
        carve_l(
            grid,
            pair[0].center(),
            pair[1].center(),
            params.corridor_width,
            horizontal_first,
        );
    }

    for room in &rooms {
        if rng.bool(params.branch_chance) {
            carve_branch(grid, room.center(), params, rng);
        }
    }

    let spawn = rooms[0].center();
    let exit = pick_exit(grid, &rooms, spawn);
    grid.set(exit.x, exit.z, Cell::Exit);

    Layout {
        rooms,
        spawn,
        exit: Some(exit),
    }
}

fn place_rooms(grid: &Grid, params: &GenerationParams, rng: &mut Rng) -> Vec<Rect> {
    let max_x = grid.width() - 2;
    let max_z = grid.height() - 2;
    let mut rooms: Vec<Rect> = Vec::new();
    let mut attempts = 0;

    while rooms.len() < params.room_count && attempts < params.room_attempts {
        attempts += 1;
        let w = rng.int(params.room_min_size, params.room_max_size).min(max_x);
        let h = rng.int(params.room_min_size, params.room_max_size).min(max_z);
        let x = rng.int(1, max_x - w + 1);
        let z = rng.int(1, max_z - h + 1);
        let candidate = Rect::new(x, z, w, h);
        if rooms
            .iter()
            .any(|room| room.expanded(params.room_margin).intersects(&candidate))
        {
            continue;
        }
        rooms.push(candidate);
    }

    rooms
}

fn fallback_room(grid: &Grid) -> Rect {
    let w = 3.min(grid.width() - 2);
    let h = 3.min(grid.height() - 2);
    Rect::new((grid.width() - w) / 2, (grid.height() - h) / 2, w, h)
}

fn carve_rect(grid: &mut Grid, rect: &Rect) {
    for z in rect.z..rect.z + rect.h {
        for x in rect.x..rect.x + rect.w {
            carve_cell(grid, x, z);
        }
    }
}

fn carve_brush(grid: &mut Grid, x: i32, z: i32, width: i32) {
    for dz in 0..width {
        for dx in 0..width {
            carve_cell(grid, x + dx, z + dz);
        }
    }
}

fn carve_segment(grid: &mut Grid, a: CellPos, b: CellPos, width: i32) {
    for z in a.z.min(b.z)..=a.z.max(b.z) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            carve_brush(grid, x, z, width);
        }
    }
}

fn carve_l(grid: &mut Grid, from: CellPos, to: CellPos, width: i32, horizontal_first: bool) {
    let corner = if horizontal_first {
        CellPos::new(to.x, from.z)
    } else {
        CellPos::new(from.x, to.z)
    };
    carve_segment(grid, from, corner, width);
    carve_segment(grid, corner, to, width);
}

fn carve_branch(grid: &mut Grid, start: CellPos, params: &GenerationParams, rng: &mut Rng) {
    let mut cursor = start;
    let mut dir = DIRECTIONS[rng.pick_index(DIRECTIONS.len())];

    for _ in 0..params.branch_length {
        if rng.bool(BRANCH_TURN_CHANCE) {
            dir = DIRECTIONS[rng.pick_index(DIRECTIONS.len())];
        }
        let next = CellPos::new(cursor.x + dir.0, cursor.z + dir.1);
        if !is_interior(grid, next.x, next.z) {
            break;
        }
        cursor = next;
        carve_brush(grid, cursor.x, cursor.z, params.corridor_width);
    }

    if rng.bool(params.side_room_chance) {
        let w = rng.int(SIDE_ROOM_MIN, SIDE_ROOM_MAX);
        let h = rng.int(SIDE_ROOM_MIN, SIDE_ROOM_MAX);
        // clipped rectangle around the cursor; the cursor cell is always inside it
        carve_rect(grid, &Rect::new(cursor.x - w / 2, cursor.z - h / 2, w, h));
    }
}

fn pick_exit(grid: &mut Grid, rooms: &[Rect], spawn: CellPos) -> CellPos {
    let candidate = match rooms {
        [only] => CellPos::new(only.x + only.w - 1, only.z + only.h - 1),
        [.., last] => last.center(),
        [] => spawn,
    };
    if candidate != spawn {
        return candidate;
    }
    let neighbor = spawn
        .neighbors4()
        .into_iter()
        .find(|cell| is_interior(grid, cell.x, cell.z))
        .unwrap_or(spawn);
    carve_cell(grid, neighbor.x, neighbor.z);
    neighbor
}
