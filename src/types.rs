use std::ops::{Add, Mul, Sub};

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane vector from a heading angle in radians.
    pub fn from_heading(heading: f32) -> Self {
        Self::new(heading.sin(), 0.0, heading.cos())
    }

    pub fn length_xz(self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    pub fn distance_xz(self, other: Vec3) -> f32 {
        (other - self).length_xz()
    }

    pub fn normalized_xz(self) -> Option<Vec3> {
        let len = self.length_xz();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Vec3::new(self.x / len, 0.0, self.z / len))
    }

    pub fn dot_xz(self, other: Vec3) -> f32 {
        self.x * other.x + self.z * other.z
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellPos {
    pub x: i32,
    pub z: i32,
}

impl CellPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn manhattan(self, other: CellPos) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    pub fn neighbors4(self) -> [CellPos; 4] {
        [
            CellPos::new(self.x, self.z - 1),
            CellPos::new(self.x + 1, self.z),
            CellPos::new(self.x, self.z + 1),
            CellPos::new(self.x - 1, self.z),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Block,
    Corridor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyState {
    Wander,
    Chase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Trauma,
    Corruption,
}

impl TerminalReason {
    pub fn key(self) -> &'static str {
        match self {
            Self::Trauma => "trauma",
            Self::Corruption => "corruption",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Medkit,
    Pills,
    Corrupted,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Medkit => "First aid kit",
            Self::Pills => "Unlabeled pills",
            Self::Corrupted => "Something that was pills once",
        }
    }
}

/// One tick of player intent, independent of device bindings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub move_x: f32,
    pub move_z: f32,
    pub look_yaw: f32,
    pub look_pitch: f32,
    pub interact: bool,
    pub primary: bool,
    pub secondary: bool,
    pub quick_use: bool,
}

impl InputFrame {
    /// Movement intent clamped to unit length; non-finite components count as zero.
    pub fn movement_intent(&self) -> (f32, f32) {
        let x = if self.move_x.is_finite() { self.move_x } else { 0.0 };
        let z = if self.move_z.is_finite() { self.move_z } else { 0.0 };
        let len = (x * x + z * z).sqrt();
        if len > 1.0 {
            (x / len, z / len)
        } else {
            (x, z)
        }
    }

    pub fn clear_actions(&mut self) {
        self.interact = false;
        self.primary = false;
        self.secondary = false;
        self.quick_use = false;
        self.look_yaw = 0.0;
        self.look_pitch = 0.0;
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TransformView {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub state: EnemyState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechCause {
    Note,
    Damage,
    Door,
    Item,
    Dialogue,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeakRequest {
    pub text: String,
    pub cause: SpeechCause,
    #[serde(rename = "atMs")]
    pub at_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderFrame {
    pub fear: f32,
    pub glitch: f32,
    #[serde(rename = "flashlightOn")]
    pub flashlight_on: bool,
    pub player: TransformView,
    pub enemies: Vec<EnemyView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AudioFrame {
    #[serde(rename = "fearTarget")]
    pub fear_target: f32,
    pub speak: Vec<SpeakRequest>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MinimapView {
    #[serde(rename = "originX")]
    pub origin_x: i32,
    #[serde(rename = "originZ")]
    pub origin_z: i32,
    pub rows: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct InventoryView {
    pub keys: Vec<u32>,
    pub items: Vec<ItemKind>,
    pub selected: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HudFrame {
    pub health: f32,
    pub sanity: f32,
    #[serde(rename = "playerPosition")]
    pub player_position: (f32, f32),
    #[serde(rename = "playerCell")]
    pub player_cell: CellPos,
    pub minimap: MinimapView,
    #[serde(rename = "enemyPositions")]
    pub enemy_positions: Vec<(f32, f32)>,
    #[serde(rename = "lieProbability")]
    pub lie_probability: f32,
    #[serde(rename = "targetText")]
    pub target_text: Option<String>,
    pub inventory: InventoryView,
}

#[derive(Clone, Debug, Serialize)]
pub struct AreaSummary {
    pub mode: GenerationMode,
    pub seed: u32,
    pub width: i32,
    pub height: i32,
    #[serde(rename = "cellSize")]
    pub cell_size: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DoorView {
    pub cell: CellPos,
    pub locked: bool,
    pub open: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PosterView {
    pub wall: CellPos,
    pub facing: CellPos,
    pub image: String,
}

/// Full layout sent to the render collaborator once per area.
#[derive(Clone, Debug, Serialize)]
pub struct AreaInit {
    pub summary: AreaSummary,
    pub origin: Vec3,
    pub tiles: Vec<String>,
    pub doors: Vec<DoorView>,
    pub posters: Vec<PosterView>,
    pub exit: Option<CellPos>,
    pub spawn: CellPos,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    AreaEntered {
        mode: GenerationMode,
        seed: u32,
    },
    AreaReady {
        #[serde(rename = "placeholderAssets")]
        placeholder_assets: usize,
    },
    DoorUnlocked {
        door: usize,
    },
    DoorLocked {
        door: usize,
    },
    DoorOpened {
        door: usize,
    },
    KeyTaken {
        #[serde(rename = "keyId")]
        key_id: u32,
    },
    ItemTaken {
        item: ItemKind,
    },
    ItemUsed {
        item: ItemKind,
    },
    NoteOpened {
        text: String,
    },
    PosterStare {
        poster: usize,
    },
    Dialogue {
        text: String,
    },
    PlayerHit {
        #[serde(rename = "enemyId")]
        enemy_id: u32,
        health: f32,
        sanity: f32,
    },
    EnemySpawned {
        #[serde(rename = "enemyId")]
        enemy_id: u32,
    },
    EnemyDesync {
        #[serde(rename = "enemyId")]
        enemy_id: u32,
    },
    SessionEnded {
        reason: TerminalReason,
    },
    Notice {
        message: String,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub area: AreaSummary,
    pub loading: bool,
    pub render: RenderFrame,
    pub audio: AudioFrame,
    pub hud: HudFrame,
    pub events: Vec<RuntimeEvent>,
    pub terminal: Option<TerminalReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_intent_is_clamped_to_unit_length() {
        let input = InputFrame {
            move_x: 3.0,
            move_z: 4.0,
            ..InputFrame::default()
        };
        let (x, z) = input.movement_intent();
        assert!((x - 0.6).abs() < 1e-6);
        assert!((z - 0.8).abs() < 1e-6);

        let small = InputFrame {
            move_x: 0.3,
            move_z: f32::NAN,
            ..InputFrame::default()
        };
        assert_eq!(small.movement_intent(), (0.3, 0.0));
    }

    #[test]
    fn normalized_xz_rejects_zero_length() {
        assert!(Vec3::ZERO.normalized_xz().is_none());
        let unit = Vec3::new(0.0, 5.0, -2.0)
            .normalized_xz()
            .expect("non-zero ground vector");
        assert_eq!(unit, Vec3::new(0.0, 0.0, -1.0));
    }
}
