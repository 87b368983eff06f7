pub const TICK_RATE: u32 = 30;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

pub const AFFECT_MAX: f32 = 100.0;
pub const SANITY_DECAY_PER_SEC: f32 = 0.2;
pub const GLITCH_DECAY_PER_SEC: f32 = 0.6;
pub const GLITCH_NOTE: f32 = 0.35;
pub const GLITCH_POSTER: f32 = 0.5;
pub const GLITCH_DAMAGE: f32 = 0.6;
pub const GLITCH_CORRUPTED: f32 = 0.4;
pub const AUDIO_FEAR_TIME_CONSTANT_MS: f32 = 100.0;

pub const PLAYER_RADIUS: f32 = 0.6;
pub const PLAYER_WALK_SPEED: f32 = 5.0;
pub const PLAYER_EYE_HEIGHT: f32 = 1.6;
pub const PLAYER_LOOK_PITCH_LIMIT: f32 = 1.4;

pub const ENEMY_RADIUS: f32 = 0.7;
pub const ENEMY_SPEED: f32 = 3.6;
pub const AGGRO_RADIUS_BASE: f32 = 18.0;
pub const AGGRO_RADIUS_FEAR_BONUS: f32 = 14.0;
pub const ATTACK_RADIUS: f32 = 1.8;
pub const ATTACK_COOLDOWN_SEC: f32 = 1.5;
pub const ATTACK_HEALTH_DAMAGE: f32 = 15.0;
pub const ATTACK_SANITY_DAMAGE: f32 = 6.0;
pub const CHASE_FEAR_SPEEDUP: f32 = 0.8;
pub const WANDER_SPEED_FACTOR: f32 = 0.4;
pub const WANDER_INTERVAL_MIN_SEC: f32 = 2.0;
pub const WANDER_INTERVAL_MAX_SEC: f32 = 5.0;
/// Per-tick desync probability at full fear; scaled by `fear²`.
pub const DESYNC_CHANCE_AT_FULL_FEAR: f32 = 0.004;
pub const DESYNC_DISTANCE_MIN: f32 = 4.0;
pub const DESYNC_DISTANCE_MAX: f32 = 8.0;
pub const SCRIPTED_SPAWN_DISTANCE_MIN: f32 = 6.0;
pub const SCRIPTED_SPAWN_DISTANCE_MAX: f32 = 10.0;

pub const ACTIVATION_RADIUS: f32 = 3.2;
pub const FACING_ALIGNMENT_THRESHOLD: f32 = 0.8;
pub const POSTER_ACTIVATION_RADIUS: f32 = 6.0;
pub const POSTER_FACING_ALIGNMENT_THRESHOLD: f32 = 0.9;
pub const POSTER_TRIGGER_CHANCE: f32 = 0.01;
pub const LOCKED_DOOR_SANITY_PENALTY: f32 = 3.0;
pub const NOTE_SANITY_PENALTY: f32 = 4.0;
pub const POSTER_SANITY_PENALTY: f32 = 2.0;
pub const MEDKIT_HEALTH: f32 = 35.0;
pub const PILLS_SANITY: f32 = 25.0;
pub const CORRUPTED_SANITY: f32 = 40.0;

pub const SPEECH_MIN_GAP_MS: u64 = 1_500;
pub const SPEECH_WINDOW_MS: u64 = 10_000;
pub const SPEECH_MAX_PER_WINDOW: usize = 4;
pub const SPEECH_MAX_TEXT_LEN: usize = 240;

pub const MINIMAP_RADIUS: i32 = 6;
pub const MAX_LIE_PROBABILITY: f32 = 0.75;

pub const MIN_GRID_SIDE: i32 = 5;
pub const CELL_SIZE: f32 = 4.0;
pub const AREA_SIDE: i32 = 40;
pub const BLOCK_PITCH: i32 = 5;
pub const BUILDING_CHANCE: f32 = 0.7;
pub const ROOM_COUNT: usize = 7;
pub const ROOM_MIN_SIZE: i32 = 3;
pub const ROOM_MAX_SIZE: i32 = 7;
pub const ROOM_MARGIN: i32 = 2;
pub const ROOM_ATTEMPTS: usize = 240;
pub const CORRIDOR_WIDTH: i32 = 1;
pub const BRANCH_CHANCE: f32 = 0.35;
pub const BRANCH_LENGTH: i32 = 6;
pub const SIDE_ROOM_CHANCE: f32 = 0.3;
pub const DOOR_COUNT: usize = 6;
pub const LOCK_CHANCE: f32 = 0.4;
pub const ITEM_COUNT: usize = 5;
pub const NOTE_COUNT: usize = 4;
pub const POSTER_COUNT: usize = 4;
pub const ENEMY_COUNT: usize = 3;
pub const PLACEMENT_ATTEMPTS: usize = 200;
pub const CURSED_NOTE_CHANCE: f32 = 0.25;
pub const ENEMY_MIN_SPAWN_DISTANCE: i32 = 6;
pub const POSTER_IMAGE_COUNT: usize = 4;

pub const NOTE_LINES: [&str; 8] = [
    "The hallway was shorter yesterday.",
    "Do not count the doors. They notice.",
    "If you hear your own footsteps behind you, keep walking.",
    "The map lies when you are afraid. Trust the walls.",
    "I left the key where the light does not reach.",
    "It only moves when you stop looking.",
    "Day 14. The exit sign was pointing at me.",
    "Someone keeps rearranging the rooms while I sleep.",
];
