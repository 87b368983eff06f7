use tracing::{debug, info, warn};

use crate::affect::{lie_probability, AffectModel, GlitchEvent, SmoothedValue};
use crate::assets::{AssetManifest, LoadedAssets};
use crate::behavior::{Attack, BehaviorContext, BehaviorController, Enemy};
use crate::collision::CollisionResolver;
use crate::config::{AreaConfig, SimConfig};
use crate::constants::{ENEMY_RADIUS, SCRIPTED_SPAWN_DISTANCE_MAX, SCRIPTED_SPAWN_DISTANCE_MIN};
use crate::error::ConfigError;
use crate::interaction::{
    attach_interactables, ActivationOutcome, InteractionContext, InteractionRouter,
};
use crate::inventory::Inventory;
use crate::rng::{derive_seed, Rng};
use crate::speech::SpeechLimiter;
use crate::types::{
    AreaInit, AudioFrame, CellPos, GenerationMode, HudFrame, InputFrame, MinimapView,
    RenderFrame, RuntimeEvent, Snapshot, SpeechCause, TerminalReason, TransformView, Vec3,
};
use crate::world::{generate_area, Area, AreaRequest};

mod spawn_system;
mod utils;

use self::utils::{cell_of, finite_or_zero, heading_toward, movement_delta, wrap_angle};

const RUNTIME_SEED_SALT: u32 = 0x5eed;

/// Assets for the current area are either still loading or settled.
/// Ticking is suspended while loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaGate {
    Loading,
    Ready,
}

#[derive(Clone, Debug)]
struct PlayerInternal {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    radius: f32,
    flashlight_on: bool,
}

impl PlayerInternal {
    fn facing(&self) -> Vec3 {
        Vec3::from_heading(self.yaw)
    }
}

pub struct GameEngine {
    pub config: SimConfig,
    pub area: Area,

    session_seed: u32,
    rng: Rng,
    player: PlayerInternal,
    affect: AffectModel,
    behavior: BehaviorController,
    router: InteractionRouter,
    inventory: Inventory,
    speech: SpeechLimiter,
    audio_fear: SmoothedValue,
    gate: AreaGate,
    /// Surface cell to come back to when leaving a pocket.
    return_cell: Option<CellPos>,
    events: Vec<RuntimeEvent>,

    elapsed_ms: u64,
    tick_counter: u64,
    ended: bool,
    end_reason: Option<TerminalReason>,
}

fn area_request(seed: u32, mode: GenerationMode, area: &AreaConfig) -> AreaRequest {
    AreaRequest {
        seed: Some(seed),
        size: area.size,
        mode,
        params: area.params.clone(),
    }
}

impl GameEngine {
    pub fn new(config: SimConfig, seed: Option<u32>) -> Result<Self, ConfigError> {
        let seed = seed.ok_or(ConfigError::MissingSeed)?;
        config.validate()?;

        let mut area = generate_area(&area_request(
            seed,
            GenerationMode::Block,
            &config.surface,
        ))?;
        attach_interactables(&mut area, &config.interaction);

        let player = PlayerInternal {
            position: area.spawn_position(),
            yaw: 0.0,
            pitch: 0.0,
            radius: config.player.radius,
            flashlight_on: true,
        };

        let mut engine = Self {
            session_seed: seed,
            rng: Rng::new(derive_seed(seed, RUNTIME_SEED_SALT)),
            player,
            affect: AffectModel::new(config.affect.clone()),
            behavior: BehaviorController::new(config.behavior.clone()),
            router: InteractionRouter::new(config.interaction.clone()),
            inventory: Inventory::default(),
            speech: SpeechLimiter::new(config.speech),
            audio_fear: SmoothedValue::new(0.0, config.affect.audio_fear_time_constant_ms),
            gate: AreaGate::Loading,
            return_cell: None,
            events: Vec::new(),
            elapsed_ms: 0,
            tick_counter: 0,
            ended: false,
            end_reason: None,
            config,
            area,
        };
        engine.announce_area();
        info!(seed, "session started");
        Ok(engine)
    }

    /// Fresh session with the same config. Affect, inventory and areas all reset.
    pub fn new_session(&mut self, seed: Option<u32>) -> Result<(), ConfigError> {
        *self = Self::new(self.config.clone(), seed)?;
        Ok(())
    }

    pub fn session_seed(&self) -> u32 {
        self.session_seed
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn end_reason(&self) -> Option<TerminalReason> {
        self.end_reason
    }

    pub fn is_loading(&self) -> bool {
        self.gate == AreaGate::Loading
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn affect(&self) -> &AffectModel {
        &self.affect
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn player_position(&self) -> Vec3 {
        self.player.position
    }

    pub fn player_cell(&self) -> CellPos {
        cell_of(&self.area.grid, self.player.position)
    }

    pub fn area_init(&self) -> AreaInit {
        self.area.init_view()
    }

    pub fn asset_manifest(&self) -> AssetManifest {
        AssetManifest::for_area(&self.area)
    }

    /// Opens the gate once the current area's assets have settled.
    pub fn complete_area_load(&mut self, loaded: &LoadedAssets) {
        if self.gate == AreaGate::Ready {
            return;
        }
        for issue in &loaded.issues {
            self.events.push(RuntimeEvent::Notice {
                message: issue.to_string(),
            });
        }
        let placeholder_assets = loaded.placeholder_count();
        self.events
            .push(RuntimeEvent::AreaReady { placeholder_assets });
        self.gate = AreaGate::Ready;
        info!(
            seed = self.area.seed,
            mode = ?self.area.mode,
            placeholder_assets,
            "area ready"
        );
    }

    pub fn step(&mut self, dt_ms: u64, input: &InputFrame) {
        if self.ended || self.gate == AreaGate::Loading {
            return;
        }
        self.tick_counter += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let dt_sec = dt_ms as f32 / 1000.0;
        let now_ms = self.elapsed_ms;

        self.update_look(input);
        self.update_player_movement(input, dt_sec);
        if self.check_exit() {
            // the surface is loading again; only the affect clock keeps running
            if let Some(reason) = self.affect.tick(dt_sec) {
                self.end_session(reason);
            }
            return;
        }
        self.update_enemies(dt_sec, now_ms);

        if let Some(reason) = self.affect.tick(dt_sec) {
            self.end_session(reason);
            return;
        }

        self.update_interaction(input, now_ms);
        if let Some(reason) = self.affect.check_terminal() {
            self.end_session(reason);
            return;
        }

        self.audio_fear.update(self.affect.fear(), dt_sec);
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let affect = self.affect.snapshot();
        let player = &self.player;
        let enemies = self.area.enemies.iter().map(Enemy::view).collect();
        let speak = if include_events {
            self.speech.drain()
        } else {
            self.speech.pending().to_vec()
        };

        Snapshot {
            tick: self.tick_counter,
            elapsed_ms: self.elapsed_ms,
            area: self.area.summary(),
            loading: self.gate == AreaGate::Loading,
            render: RenderFrame {
                fear: affect.fear,
                glitch: affect.glitch,
                flashlight_on: player.flashlight_on,
                player: TransformView {
                    x: player.position.x,
                    y: player.position.y + self.config.player.eye_height,
                    z: player.position.z,
                    yaw: player.yaw,
                    pitch: player.pitch,
                },
                enemies,
            },
            audio: AudioFrame {
                fear_target: self.audio_fear.value(),
                speak,
            },
            hud: self.build_hud(),
            events: if include_events {
                std::mem::take(&mut self.events)
            } else {
                self.events.clone()
            },
            terminal: self.end_reason,
        }
    }

    fn build_hud(&self) -> HudFrame {
        let cell = self.player_cell();
        let radius = self.config.hud.minimap_radius;
        HudFrame {
            health: self.affect.health(),
            sanity: self.affect.sanity(),
            player_position: (self.player.position.x, self.player.position.z),
            player_cell: cell,
            minimap: MinimapView {
                origin_x: cell.x - radius,
                origin_z: cell.z - radius,
                rows: self.area.grid.window_rows(cell, radius),
            },
            enemy_positions: self
                .area
                .enemies
                .iter()
                .map(|enemy| (enemy.position.x, enemy.position.z))
                .collect(),
            lie_probability: lie_probability(
                self.affect.fear(),
                self.config.hud.max_lie_probability,
            ),
            target_text: self.router.display_text(&self.area).map(str::to_string),
            inventory: self.inventory.view(),
        }
    }

    fn update_look(&mut self, input: &InputFrame) {
        let limit = self.config.player.look_pitch_limit;
        self.player.yaw = wrap_angle(self.player.yaw + finite_or_zero(input.look_yaw));
        self.player.pitch = (self.player.pitch + finite_or_zero(input.look_pitch)).clamp(-limit, limit);
    }

    fn update_player_movement(&mut self, input: &InputFrame, dt_sec: f32) {
        let delta = movement_delta(
            self.player.yaw,
            input.movement_intent(),
            self.config.player.walk_speed,
            dt_sec,
        );
        let collision = CollisionResolver::new(&self.area.grid);
        self.player.position =
            collision.move_sliding(self.player.position, delta, self.player.radius);
    }

    fn check_exit(&mut self) -> bool {
        let Some(exit) = self.area.exit else {
            return false;
        };
        if self.player_cell() != exit {
            return false;
        }
        self.return_to_surface();
        true
    }

    fn update_enemies(&mut self, dt_sec: f32, now_ms: u64) {
        let ctx = BehaviorContext {
            collision: CollisionResolver::new(&self.area.grid),
            player_position: self.player.position,
            affect: self.affect.snapshot(),
            now_sec: now_ms as f32 / 1000.0,
            dt_sec,
        };

        let mut attacks: Vec<Attack> = Vec::new();
        let mut desynced = Vec::new();
        for enemy in &mut self.area.enemies {
            let outcome = self.behavior.update(enemy, &ctx, &mut self.rng);
            if let Some(attack) = outcome.attack {
                attacks.push(attack);
            }
            if outcome.desynced {
                desynced.push(enemy.id);
            }
        }

        for enemy_id in desynced {
            debug!(enemy = enemy_id, "enemy desync");
            self.events.push(RuntimeEvent::EnemyDesync { enemy_id });
        }
        for attack in attacks {
            self.apply_attack(attack, now_ms);
        }
    }

    fn apply_attack(&mut self, attack: Attack, now_ms: u64) {
        let health = self.affect.apply_health(-attack.health_damage);
        let sanity = self.affect.apply_sanity(-attack.sanity_damage);
        self.affect.boost_glitch(GlitchEvent::EnemyDamage);
        debug!(enemy = attack.enemy_id, health, sanity, "player hit");
        self.speech
            .request("Get away from me!", SpeechCause::Damage, now_ms);
        self.events.push(RuntimeEvent::PlayerHit {
            enemy_id: attack.enemy_id,
            health,
            sanity,
        });
    }

    fn update_interaction(&mut self, input: &InputFrame, now_ms: u64) {
        self.router.scan(
            &self.area.interactables,
            self.player.position,
            self.player.facing(),
        );

        let mut ctx = InteractionContext {
            area: &mut self.area,
            affect: &mut self.affect,
            inventory: &mut self.inventory,
            speech: &mut self.speech,
            events: &mut self.events,
            now_ms,
        };
        self.router.tick_passive(&mut ctx, &mut self.rng);

        let outcome = if input.interact {
            self.router.activate(&mut ctx)
        } else {
            ActivationOutcome::Nothing
        };
        if input.quick_use {
            self.router.quick_use(&mut ctx);
        }
        if input.secondary {
            self.inventory.cycle();
        }
        if input.primary {
            self.player.flashlight_on = !self.player.flashlight_on;
        }

        match outcome {
            ActivationOutcome::EnterPocket { door } => self.enter_pocket(door),
            ActivationOutcome::Summon { note } => {
                self.spawn_summoned_enemy(note);
            }
            ActivationOutcome::Nothing | ActivationOutcome::Handled => {}
        }
    }

    fn enter_pocket(&mut self, door_idx: usize) {
        let Some(door) = self.area.doors.get(door_idx) else {
            return;
        };
        let return_cell = door.approach;
        let seed = derive_seed(self.area.seed, door_idx as u32 + 1);
        let request = area_request(seed, GenerationMode::Corridor, &self.config.pocket);
        if self.replace_area(&request) {
            self.return_cell = Some(return_cell);
        }
    }

    fn return_to_surface(&mut self) {
        let request = area_request(
            self.session_seed,
            GenerationMode::Block,
            &self.config.surface,
        );
        let return_cell = self.return_cell.take();
        if !self.replace_area(&request) {
            return;
        }
        if let Some(cell) = return_cell {
            self.player.position = self.area.grid.cell_center(cell.x, cell.z);
        }
    }

    /// Swaps the whole area out and closes the gate until assets settle.
    fn replace_area(&mut self, request: &AreaRequest) -> bool {
        let mut area = match generate_area(request) {
            Ok(area) => area,
            Err(err) => {
                warn!(mode = ?request.mode, "area generation failed: {err}");
                self.events.push(RuntimeEvent::Notice {
                    message: err.to_string(),
                });
                return false;
            }
        };
        attach_interactables(&mut area, &self.config.interaction);
        self.area = area;
        self.player.position = self.area.spawn_position();
        self.inventory.drop_keys();
        self.router.clear();
        self.gate = AreaGate::Loading;
        self.announce_area();
        true
    }

    fn announce_area(&mut self) {
        for notice in &self.area.notices {
            self.events.push(RuntimeEvent::Notice {
                message: notice.to_string(),
            });
        }
        self.events.push(RuntimeEvent::AreaEntered {
            mode: self.area.mode,
            seed: self.area.seed,
        });
        info!(seed = self.area.seed, mode = ?self.area.mode, "entered area");
    }

    fn end_session(&mut self, reason: TerminalReason) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.end_reason = Some(reason);
        self.events.push(RuntimeEvent::SessionEnded { reason });
        info!(
            reason = reason.key(),
            elapsed_ms = self.elapsed_ms,
            tick = self.tick_counter,
            "session ended"
        );
    }
}
