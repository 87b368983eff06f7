mod block;
mod corridor;
mod placement;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::behavior::Enemy;
use crate::constants::{
    BLOCK_PITCH, BRANCH_CHANCE, BRANCH_LENGTH, BUILDING_CHANCE, CELL_SIZE, CORRIDOR_WIDTH,
    CURSED_NOTE_CHANCE, DOOR_COUNT, ENEMY_COUNT, ENEMY_MIN_SPAWN_DISTANCE, ITEM_COUNT, LOCK_CHANCE,
    MIN_GRID_SIDE, NOTE_COUNT, PLACEMENT_ATTEMPTS, POSTER_COUNT, ROOM_ATTEMPTS, ROOM_COUNT,
    ROOM_MARGIN, ROOM_MAX_SIZE, ROOM_MIN_SIZE, SIDE_ROOM_CHANCE,
};
use crate::error::{check_range, ConfigError, ConfigResult, SimIssue};
use crate::grid::{Cell, Grid, KeyId};
use crate::interaction::Interactable;
use crate::rng::Rng;
use crate::types::{
    AreaInit, AreaSummary, CellPos, DoorView, GenerationMode, ItemKind, PosterView, Vec3,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, z: i32, w: i32, h: i32) -> Self {
        Self { x, z, w, h }
    }

    pub fn center(&self) -> CellPos {
        CellPos::new(self.x + self.w / 2, self.z + self.h / 2)
    }

    pub fn expanded(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.z - margin,
            self.w + margin * 2,
            self.h + margin * 2,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.z < other.z + other.h
            && other.z < self.z + self.h
    }

    pub fn contains(&self, cell: CellPos) -> bool {
        cell.x >= self.x && cell.x < self.x + self.w && cell.z >= self.z && cell.z < self.z + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID_SIDE,
            });
        }
        Ok(())
    }
}

/// Generation tuning. The same struct drives both modes; each mode reads the
/// fields that apply to it.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationParams {
    pub cell_size: f32,
    pub block_pitch: i32,
    pub building_chance: f32,
    pub room_count: usize,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub room_margin: i32,
    pub room_attempts: usize,
    pub corridor_width: i32,
    pub branch_chance: f32,
    pub branch_length: i32,
    pub side_room_chance: f32,
    pub door_count: usize,
    pub lock_chance: f32,
    pub item_count: usize,
    pub note_count: usize,
    pub poster_count: usize,
    pub enemy_count: usize,
    pub placement_attempts: usize,
    pub cursed_note_chance: f32,
    pub enemy_min_spawn_distance: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            block_pitch: BLOCK_PITCH,
            building_chance: BUILDING_CHANCE,
            room_count: ROOM_COUNT,
            room_min_size: ROOM_MIN_SIZE,
            room_max_size: ROOM_MAX_SIZE,
            room_margin: ROOM_MARGIN,
            room_attempts: ROOM_ATTEMPTS,
            corridor_width: CORRIDOR_WIDTH,
            branch_chance: BRANCH_CHANCE,
            branch_length: BRANCH_LENGTH,
            side_room_chance: SIDE_ROOM_CHANCE,
            door_count: DOOR_COUNT,
            lock_chance: LOCK_CHANCE,
            item_count: ITEM_COUNT,
            note_count: NOTE_COUNT,
            poster_count: POSTER_COUNT,
            enemy_count: ENEMY_COUNT,
            placement_attempts: PLACEMENT_ATTEMPTS,
            cursed_note_chance: CURSED_NOTE_CHANCE,
            enemy_min_spawn_distance: ENEMY_MIN_SPAWN_DISTANCE,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("cell_size", self.cell_size, 0.25, 64.0)?;
        check_range("building_chance", self.building_chance, 0.0, 1.0)?;
        check_range("branch_chance", self.branch_chance, 0.0, 1.0)?;
        check_range("side_room_chance", self.side_room_chance, 0.0, 1.0)?;
        check_range("lock_chance", self.lock_chance, 0.0, 1.0)?;
        check_range("cursed_note_chance", self.cursed_note_chance, 0.0, 1.0)?;
        if self.block_pitch < 2 {
            return Err(ConfigError::invalid("block_pitch", "must be at least 2"));
        }
        if self.room_min_size < 1 || self.room_max_size < self.room_min_size {
            return Err(ConfigError::invalid(
                "room_min_size",
                format!(
                    "room sizes must satisfy 1 <= min <= max, got {}..{}",
                    self.room_min_size, self.room_max_size
                ),
            ));
        }
        if self.room_margin < 1 {
            return Err(ConfigError::invalid("room_margin", "must be at least 1"));
        }
        if self.corridor_width < 1 {
            return Err(ConfigError::invalid("corridor_width", "must be at least 1"));
        }
        if self.branch_length < 0 {
            return Err(ConfigError::invalid("branch_length", "must not be negative"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct AreaRequest {
    pub seed: Option<u32>,
    pub size: GridSize,
    pub mode: GenerationMode,
    pub params: GenerationParams,
}

impl AreaRequest {
    pub fn new(seed: u32, size: GridSize, mode: GenerationMode) -> Self {
        Self {
            seed: Some(seed),
            size,
            mode,
            params: GenerationParams::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Door {
    pub cell: CellPos,
    /// Passable cell the door is entered from.
    pub approach: CellPos,
    pub locked: bool,
    pub key_id: Option<KeyId>,
    pub open: bool,
}

#[derive(Clone, Debug)]
pub struct KeyPickup {
    pub key_id: KeyId,
    pub cell: CellPos,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub cell: CellPos,
}

#[derive(Clone, Debug)]
pub struct Note {
    pub text: String,
    pub cell: CellPos,
    pub cursed: bool,
    pub read: bool,
}

#[derive(Clone, Debug)]
pub struct Poster {
    pub wall: CellPos,
    pub facing: CellPos,
    pub image: usize,
}

/// One generated level. Replaced wholesale on every transition.
#[derive(Clone, Debug)]
pub struct Area {
    pub seed: u32,
    pub mode: GenerationMode,
    pub grid: Grid,
    pub rooms: Vec<Rect>,
    pub doors: Vec<Door>,
    pub keys: Vec<KeyPickup>,
    pub items: Vec<Item>,
    pub notes: Vec<Note>,
    pub posters: Vec<Poster>,
    pub enemies: Vec<Enemy>,
    pub interactables: Vec<Interactable>,
    pub spawn: CellPos,
    pub exit: Option<CellPos>,
    pub notices: Vec<SimIssue>,
}

impl Area {
    pub fn spawn_position(&self) -> Vec3 {
        self.grid.cell_center(self.spawn.x, self.spawn.z)
    }

    /// World-space midpoint of the edge shared by two 4-adjacent cells.
    pub fn face_midpoint(&self, a: CellPos, b: CellPos) -> Vec3 {
        let ca = self.grid.cell_center(a.x, a.z);
        let cb = self.grid.cell_center(b.x, b.z);
        Vec3::new((ca.x + cb.x) * 0.5, ca.y, (ca.z + cb.z) * 0.5)
    }

    pub fn summary(&self) -> AreaSummary {
        AreaSummary {
            mode: self.mode,
            seed: self.seed,
            width: self.grid.width(),
            height: self.grid.height(),
            cell_size: self.grid.cell_size(),
        }
    }

    pub fn init_view(&self) -> AreaInit {
        AreaInit {
            summary: self.summary(),
            origin: self.grid.origin(),
            tiles: self.grid.rows(),
            doors: self
                .doors
                .iter()
                .map(|door| DoorView {
                    cell: door.cell,
                    locked: door.locked,
                    open: door.open,
                })
                .collect(),
            posters: self
                .posters
                .iter()
                .map(|poster| PosterView {
                    wall: poster.wall,
                    facing: poster.facing,
                    image: poster_image_key(poster.image),
                })
                .collect(),
            exit: self.exit,
            spawn: self.spawn,
        }
    }

    pub fn door_index_at(&self, cell: CellPos) -> Option<usize> {
        self.doors.iter().position(|door| door.cell == cell)
    }

    pub fn next_enemy_id(&self) -> u32 {
        self.enemies.iter().map(|enemy| enemy.id + 1).max().unwrap_or(1)
    }
}

pub fn poster_image_key(image: usize) -> String {
    format!("poster_{image}")
}

/// Builds a complete area from `(seed, size, mode, params)`. Identical inputs
/// give identical areas; one rng stream drives every random decision.
pub fn generate_area(request: &AreaRequest) -> Result<Area, ConfigError> {
    let seed = request.seed.ok_or(ConfigError::MissingSeed)?;
    request.size.validate()?;
    request.params.validate()?;

    let params = &request.params;
    let size = request.size;
    let mut rng = Rng::new(seed);
    let origin = Vec3::new(
        -(size.width as f32) * params.cell_size * 0.5,
        0.0,
        -(size.height as f32) * params.cell_size * 0.5,
    );
    let mut grid = Grid::filled(size.width, size.height, params.cell_size, origin, Cell::Solid);
    let mut notices = Vec::new();

    let layout = match request.mode {
        GenerationMode::Block => block::carve(&mut grid, params, &mut rng),
        GenerationMode::Corridor => corridor::carve(&mut grid, params, &mut rng, &mut notices),
    };
    grid.force_border_solid();

    let mut area = Area {
        seed,
        mode: request.mode,
        grid,
        rooms: layout.rooms,
        doors: Vec::new(),
        keys: Vec::new(),
        items: Vec::new(),
        notes: Vec::new(),
        posters: Vec::new(),
        enemies: Vec::new(),
        interactables: Vec::new(),
        spawn: layout.spawn,
        exit: layout.exit,
        notices,
    };
    placement::populate(&mut area, params, &mut rng);

    for notice in &area.notices {
        warn!(seed, mode = ?area.mode, "{notice}");
    }
    info!(
        seed,
        mode = ?area.mode,
        width = size.width,
        height = size.height,
        rooms = area.rooms.len(),
        doors = area.doors.len(),
        keys = area.keys.len(),
        items = area.items.len(),
        notes = area.notes.len(),
        posters = area.posters.len(),
        enemies = area.enemies.len(),
        "area generated"
    );

    Ok(area)
}

/// Carved layout handed from a mode's carver to the shared placement pass.
pub(crate) struct Layout {
    pub rooms: Vec<Rect>,
    pub spawn: CellPos,
    pub exit: Option<CellPos>,
}

pub(crate) fn is_interior(grid: &Grid, x: i32, z: i32) -> bool {
    x >= 1 && z >= 1 && x <= grid.width() - 2 && z <= grid.height() - 2
}

pub(crate) fn carve_cell(grid: &mut Grid, x: i32, z: i32) {
    if is_interior(grid, x, z) {
        grid.set(x, z, Cell::Empty);
    }
}
