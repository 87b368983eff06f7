use std::collections::HashSet;

use crate::behavior::Enemy;
use crate::constants::{NOTE_LINES, POSTER_IMAGE_COUNT};
use crate::error::SimIssue;
use crate::grid::{Cell, KeyId};
use crate::rng::{derive_seed, Rng};
use crate::types::{CellPos, ItemKind};

use super::{Area, Door, GenerationParams, Item, KeyPickup, Note, Poster};

const KEY_SALT_BASE: u32 = 0x6b65_7900;

/// Places the gameplay objects on top of a carved grid. Every object kind has
/// its own attempt budget; shortfalls are recorded on the area, never fatal.
pub(super) fn populate(area: &mut Area, params: &GenerationParams, rng: &mut Rng) {
    let mut occupied = HashSet::from([area.spawn]);

    place_doors(area, params, rng);
    place_keys(area, params, rng, &mut occupied);
    place_items(area, params, rng, &mut occupied);
    place_notes(area, params, rng, &mut occupied);
    place_posters(area, params, rng);
    place_enemies(area, params, rng, &mut occupied);
}

fn record_shortfall(area: &mut Area, what: &'static str, placed: usize, requested: usize) {
    if placed < requested {
        area.notices.push(SimIssue::GenerationExhausted {
            what,
            placed,
            requested,
        });
    }
}

/// Non-border solid cells with an open floor cell on one side.
fn door_candidates(area: &Area) -> Vec<(CellPos, CellPos)> {
    let grid = &area.grid;
    let mut out = Vec::new();
    for z in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            if grid.cell(x, z) != Some(Cell::Solid) {
                continue;
            }
            let cell = CellPos::new(x, z);
            let approach = cell
                .neighbors4()
                .into_iter()
                .find(|n| grid.cell(n.x, n.z) == Some(Cell::Empty));
            if let Some(approach) = approach {
                out.push((cell, approach));
            }
        }
    }
    out
}

/// Key ids are drawn from the area seed so a key never matches a door of
/// another area. Zero and ids already used in this area are skipped.
fn next_key_id(seed: u32, salt: &mut u32, used: &[Door]) -> KeyId {
    loop {
        *salt = salt.wrapping_add(1);
        let id = derive_seed(seed, KEY_SALT_BASE.wrapping_add(*salt));
        if id != 0 && !used.iter().any(|door| door.key_id == Some(id)) {
            return id;
        }
    }
}

fn place_doors(area: &mut Area, params: &GenerationParams, rng: &mut Rng) {
    let mut candidates = door_candidates(area);
    let mut key_salt = 0;

    while area.doors.len() < params.door_count && !candidates.is_empty() {
        let (cell, approach) = candidates.swap_remove(rng.pick_index(candidates.len()));
        let crowded = area
            .doors
            .iter()
            .any(|door| (door.cell.x - cell.x).abs() <= 1 && (door.cell.z - cell.z).abs() <= 1);
        if crowded {
            continue;
        }

        let locked = rng.bool(params.lock_chance);
        let key_id = locked.then(|| next_key_id(area.seed, &mut key_salt, &area.doors));
        area.grid.set(cell.x, cell.z, Cell::Door { locked, key_id });
        area.doors.push(Door {
            cell,
            approach,
            locked,
            key_id,
            open: false,
        });
    }

    let placed = area.doors.len();
    record_shortfall(area, "doors", placed, params.door_count);
}

fn sample_floor_cell(
    area: &Area,
    occupied: &HashSet<CellPos>,
    attempts: &mut usize,
    budget: usize,
    rng: &mut Rng,
    accept: impl Fn(CellPos) -> bool,
) -> Option<CellPos> {
    let grid = &area.grid;
    while *attempts < budget {
        *attempts += 1;
        let cell = CellPos::new(
            rng.int(1, grid.width() - 2),
            rng.int(1, grid.height() - 2),
        );
        if grid.cell(cell.x, cell.z) == Some(Cell::Empty)
            && !occupied.contains(&cell)
            && accept(cell)
        {
            return Some(cell);
        }
    }
    None
}

fn place_keys(
    area: &mut Area,
    params: &GenerationParams,
    rng: &mut Rng,
    occupied: &mut HashSet<CellPos>,
) {
    let key_ids: Vec<KeyId> = area.doors.iter().filter_map(|door| door.key_id).collect();
    let mut attempts = 0;
    for &key_id in &key_ids {
        let Some(cell) = sample_floor_cell(
            area,
            occupied,
            &mut attempts,
            params.placement_attempts,
            rng,
            |_| true,
        ) else {
            break;
        };
        occupied.insert(cell);
        area.keys.push(KeyPickup { key_id, cell });
    }
    let placed = area.keys.len();
    record_shortfall(area, "keys", placed, key_ids.len());
}

fn roll_item_kind(rng: &mut Rng) -> ItemKind {
    let roll = rng.next_f32();
    if roll < 0.45 {
        ItemKind::Medkit
    } else if roll < 0.85 {
        ItemKind::Pills
    } else {
        ItemKind::Corrupted
    }
}

fn place_items(
    area: &mut Area,
    params: &GenerationParams,
    rng: &mut Rng,
    occupied: &mut HashSet<CellPos>,
) {
    let mut attempts = 0;
    while area.items.len() < params.item_count {
        let Some(cell) = sample_floor_cell(
            area,
            occupied,
            &mut attempts,
            params.placement_attempts,
            rng,
            |_| true,
        ) else {
            break;
        };
        occupied.insert(cell);
        let kind = roll_item_kind(rng);
        area.items.push(Item { kind, cell });
    }
    let placed = area.items.len();
    record_shortfall(area, "items", placed, params.item_count);
}

fn place_notes(
    area: &mut Area,
    params: &GenerationParams,
    rng: &mut Rng,
    occupied: &mut HashSet<CellPos>,
) {
    let mut attempts = 0;
    while area.notes.len() < params.note_count {
        let Some(cell) = sample_floor_cell(
            area,
            occupied,
            &mut attempts,
            params.placement_attempts,
            rng,
            |_| true,
        ) else {
            break;
        };
        occupied.insert(cell);
        let text = NOTE_LINES[rng.pick_index(NOTE_LINES.len())].to_string();
        let cursed = rng.bool(params.cursed_note_chance);
        area.notes.push(Note {
            text,
            cell,
            cursed,
            read: false,
        });
    }
    let placed = area.notes.len();
    record_shortfall(area, "notes", placed, params.note_count);
}

fn place_posters(area: &mut Area, params: &GenerationParams, rng: &mut Rng) {
    let mut attempts = 0;
    let mut walls = HashSet::new();
    let grid_w = area.grid.width();
    let grid_h = area.grid.height();

    while area.posters.len() < params.poster_count && attempts < params.placement_attempts {
        attempts += 1;
        let wall = CellPos::new(rng.int(0, grid_w - 1), rng.int(0, grid_h - 1));
        if area.grid.cell(wall.x, wall.z) != Some(Cell::Solid) || walls.contains(&wall) {
            continue;
        }
        let facing = wall
            .neighbors4()
            .into_iter()
            .find(|n| area.grid.cell(n.x, n.z) == Some(Cell::Empty));
        let Some(facing) = facing else {
            continue;
        };
        walls.insert(wall);
        let image = rng.pick_index(POSTER_IMAGE_COUNT);
        area.posters.push(Poster {
            wall,
            facing,
            image,
        });
    }
    let placed = area.posters.len();
    record_shortfall(area, "posters", placed, params.poster_count);
}

fn place_enemies(
    area: &mut Area,
    params: &GenerationParams,
    rng: &mut Rng,
    occupied: &mut HashSet<CellPos>,
) {
    let spawn = area.spawn;
    let min_distance = params.enemy_min_spawn_distance;
    let mut attempts = 0;
    while area.enemies.len() < params.enemy_count {
        let Some(cell) = sample_floor_cell(
            area,
            occupied,
            &mut attempts,
            params.placement_attempts,
            rng,
            |cell| cell.manhattan(spawn) >= min_distance,
        ) else {
            break;
        };
        occupied.insert(cell);
        let id = area.enemies.len() as u32 + 1;
        let position = area.grid.cell_center(cell.x, cell.z);
        let heading = rng.angle();
        area.enemies.push(Enemy::new(id, position, heading));
    }
    let placed = area.enemies.len();
    record_shortfall(area, "enemies", placed, params.enemy_count);
}
