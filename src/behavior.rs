use serde::{Deserialize, Serialize};

use crate::affect::AffectSnapshot;
use crate::collision::CollisionResolver;
use crate::constants::{
    AGGRO_RADIUS_BASE, AGGRO_RADIUS_FEAR_BONUS, ATTACK_COOLDOWN_SEC, ATTACK_HEALTH_DAMAGE,
    ATTACK_RADIUS, ATTACK_SANITY_DAMAGE, CHASE_FEAR_SPEEDUP, DESYNC_CHANCE_AT_FULL_FEAR,
    DESYNC_DISTANCE_MAX, DESYNC_DISTANCE_MIN, ENEMY_RADIUS, ENEMY_SPEED, WANDER_INTERVAL_MAX_SEC,
    WANDER_INTERVAL_MIN_SEC, WANDER_SPEED_FACTOR,
};
use crate::error::{check_range, ConfigError, ConfigResult};
use crate::rng::Rng;
use crate::types::{EnemyState, EnemyView, Vec3};

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub speed: f32,
    pub state: EnemyState,
    pub attack_cooldown: f32,
    pub wander_heading: f32,
    pub next_wander_change_sec: f32,
}

impl Enemy {
    pub fn new(id: u32, position: Vec3, heading: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            radius: ENEMY_RADIUS,
            speed: ENEMY_SPEED,
            state: EnemyState::Wander,
            attack_cooldown: 0.0,
            wander_heading: heading,
            next_wander_change_sec: 0.0,
        }
    }

    pub fn view(&self) -> EnemyView {
        EnemyView {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            state: self.state,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorParams {
    pub aggro_radius_base: f32,
    pub aggro_radius_fear_bonus: f32,
    pub attack_radius: f32,
    pub attack_cooldown_sec: f32,
    pub attack_health_damage: f32,
    pub attack_sanity_damage: f32,
    /// `k` in `speed * (1 + k * fear)` while chasing.
    pub chase_fear_speedup: f32,
    pub wander_speed_factor: f32,
    pub wander_interval_min_sec: f32,
    pub wander_interval_max_sec: f32,
    pub desync_chance_at_full_fear: f32,
    pub desync_distance_min: f32,
    pub desync_distance_max: f32,
    pub speed_scale: f32,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            aggro_radius_base: AGGRO_RADIUS_BASE,
            aggro_radius_fear_bonus: AGGRO_RADIUS_FEAR_BONUS,
            attack_radius: ATTACK_RADIUS,
            attack_cooldown_sec: ATTACK_COOLDOWN_SEC,
            attack_health_damage: ATTACK_HEALTH_DAMAGE,
            attack_sanity_damage: ATTACK_SANITY_DAMAGE,
            chase_fear_speedup: CHASE_FEAR_SPEEDUP,
            wander_speed_factor: WANDER_SPEED_FACTOR,
            wander_interval_min_sec: WANDER_INTERVAL_MIN_SEC,
            wander_interval_max_sec: WANDER_INTERVAL_MAX_SEC,
            desync_chance_at_full_fear: DESYNC_CHANCE_AT_FULL_FEAR,
            desync_distance_min: DESYNC_DISTANCE_MIN,
            desync_distance_max: DESYNC_DISTANCE_MAX,
            speed_scale: 1.0,
        }
    }
}

impl BehaviorParams {
    /// Grows monotonically with fear.
    pub fn aggro_radius(&self, fear: f32) -> f32 {
        self.aggro_radius_base + self.aggro_radius_fear_bonus * fear.clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_range("behavior.aggro_radius_base", self.aggro_radius_base, 0.0, 1_000.0)?;
        check_range(
            "behavior.aggro_radius_fear_bonus",
            self.aggro_radius_fear_bonus,
            0.0,
            1_000.0,
        )?;
        check_range("behavior.attack_radius", self.attack_radius, 0.0, 100.0)?;
        check_range("behavior.attack_cooldown_sec", self.attack_cooldown_sec, 0.0, 60.0)?;
        check_range("behavior.attack_health_damage", self.attack_health_damage, 0.0, 100.0)?;
        check_range("behavior.attack_sanity_damage", self.attack_sanity_damage, 0.0, 100.0)?;
        check_range("behavior.chase_fear_speedup", self.chase_fear_speedup, 0.0, 10.0)?;
        check_range("behavior.wander_speed_factor", self.wander_speed_factor, 0.0, 1.0)?;
        check_range(
            "behavior.desync_chance_at_full_fear",
            self.desync_chance_at_full_fear,
            0.0,
            1.0,
        )?;
        check_range("behavior.speed_scale", self.speed_scale, 0.0, 10.0)?;
        if self.wander_interval_min_sec <= 0.0
            || self.wander_interval_max_sec < self.wander_interval_min_sec
        {
            return Err(ConfigError::invalid(
                "behavior.wander_interval_min_sec",
                "wander interval must satisfy 0 < min <= max",
            ));
        }
        if self.desync_distance_min < 0.0 || self.desync_distance_max < self.desync_distance_min {
            return Err(ConfigError::invalid(
                "behavior.desync_distance_min",
                "desync distance must satisfy 0 <= min <= max",
            ));
        }
        Ok(())
    }
}

/// Chase iff strictly inside the aggro radius. There is no band between the
/// two thresholds, so an enemy sitting on the boundary flips every tick.
pub fn next_state(distance: f32, aggro_radius: f32) -> EnemyState {
    if distance < aggro_radius {
        EnemyState::Chase
    } else {
        EnemyState::Wander
    }
}

pub struct BehaviorContext<'a> {
    pub collision: CollisionResolver<'a>,
    pub player_position: Vec3,
    pub affect: AffectSnapshot,
    pub now_sec: f32,
    pub dt_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attack {
    pub enemy_id: u32,
    pub health_damage: f32,
    pub sanity_damage: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BehaviorOutcome {
    pub attack: Option<Attack>,
    pub desynced: bool,
    pub state_changed: bool,
}

/// Per-enemy Wander/Chase machine. Damage is reported, never applied here;
/// the caller routes it through the affect model.
#[derive(Clone, Debug)]
pub struct BehaviorController {
    params: BehaviorParams,
}

impl BehaviorController {
    pub fn new(params: BehaviorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BehaviorParams {
        &self.params
    }

    pub fn update(
        &self,
        enemy: &mut Enemy,
        ctx: &BehaviorContext<'_>,
        rng: &mut Rng,
    ) -> BehaviorOutcome {
        let mut outcome = BehaviorOutcome::default();
        let dt = if ctx.dt_sec.is_finite() {
            ctx.dt_sec.max(0.0)
        } else {
            0.0
        };
        let fear = ctx.affect.fear;

        enemy.attack_cooldown = (enemy.attack_cooldown - dt).max(0.0);

        let distance = enemy.position.distance_xz(ctx.player_position);
        let state = next_state(distance, self.params.aggro_radius(fear));
        if state != enemy.state {
            enemy.state = state;
            outcome.state_changed = true;
        }

        match enemy.state {
            EnemyState::Wander => self.wander(enemy, ctx, dt, rng),
            EnemyState::Chase => outcome.attack = self.chase(enemy, ctx, dt, fear),
        }

        let desync_chance = self.params.desync_chance_at_full_fear * fear * fear;
        if rng.bool(desync_chance) {
            self.desync(enemy, ctx.player_position, rng);
            outcome.desynced = true;
        }

        outcome
    }

    fn wander(&self, enemy: &mut Enemy, ctx: &BehaviorContext<'_>, dt: f32, rng: &mut Rng) {
        if ctx.now_sec >= enemy.next_wander_change_sec {
            enemy.wander_heading = rng.angle();
            enemy.next_wander_change_sec = ctx.now_sec
                + rng.range(
                    self.params.wander_interval_min_sec,
                    self.params.wander_interval_max_sec,
                );
        }

        let step = enemy.speed * self.params.speed_scale * self.params.wander_speed_factor * dt;
        let delta = Vec3::from_heading(enemy.wander_heading) * step;
        let start = enemy.position;
        enemy.position = ctx.collision.move_sliding(start, delta, enemy.radius);
        enemy.velocity = velocity_between(start, enemy.position, dt);

        // blocked: pick a new heading on the next tick
        if step > 0.0 && start.distance_xz(enemy.position) < step * 0.5 {
            enemy.next_wander_change_sec = ctx.now_sec;
        }
    }

    fn chase(
        &self,
        enemy: &mut Enemy,
        ctx: &BehaviorContext<'_>,
        dt: f32,
        fear: f32,
    ) -> Option<Attack> {
        let start = enemy.position;
        let to_player = ctx.player_position - start;
        if let Some(dir) = to_player.normalized_xz() {
            let speed = enemy.speed
                * self.params.speed_scale
                * (1.0 + self.params.chase_fear_speedup * fear);
            let step = (speed * dt).min(to_player.length_xz());
            enemy.position = ctx.collision.move_sliding(start, dir * step, enemy.radius);
        }
        enemy.velocity = velocity_between(start, enemy.position, dt);

        let distance = enemy.position.distance_xz(ctx.player_position);
        if distance < self.params.attack_radius && enemy.attack_cooldown <= 0.0 {
            enemy.attack_cooldown = self.params.attack_cooldown_sec;
            return Some(Attack {
                enemy_id: enemy.id,
                health_damage: self.params.attack_health_damage,
                sanity_damage: self.params.attack_sanity_damage,
            });
        }
        None
    }

    /// Teleports next to the player, ignoring walls.
    fn desync(&self, enemy: &mut Enemy, player: Vec3, rng: &mut Rng) {
        let angle = rng.angle();
        let distance = rng.range(
            self.params.desync_distance_min,
            self.params.desync_distance_max,
        );
        let offset = Vec3::from_heading(angle) * distance;
        enemy.position = Vec3::new(player.x + offset.x, enemy.position.y, player.z + offset.z);
        enemy.velocity = Vec3::ZERO;
    }
}

fn velocity_between(from: Vec3, to: Vec3, dt: f32) -> Vec3 {
    if dt <= 0.0 {
        return Vec3::ZERO;
    }
    (to - from) * (1.0 / dt)
}
