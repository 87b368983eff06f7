use serde::{Deserialize, Serialize};

use crate::constants::{
    AFFECT_MAX, AUDIO_FEAR_TIME_CONSTANT_MS, GLITCH_CORRUPTED, GLITCH_DAMAGE, GLITCH_DECAY_PER_SEC,
    GLITCH_NOTE, GLITCH_POSTER, SANITY_DECAY_PER_SEC,
};
use crate::error::{check_range, ConfigResult};
use crate::types::TerminalReason;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AffectParams {
    pub sanity_decay_per_sec: f32,
    pub glitch_decay_per_sec: f32,
    pub glitch_note: f32,
    pub glitch_poster: f32,
    pub glitch_damage: f32,
    pub glitch_corrupted: f32,
    pub audio_fear_time_constant_ms: f32,
}

impl Default for AffectParams {
    fn default() -> Self {
        Self {
            sanity_decay_per_sec: SANITY_DECAY_PER_SEC,
            glitch_decay_per_sec: GLITCH_DECAY_PER_SEC,
            glitch_note: GLITCH_NOTE,
            glitch_poster: GLITCH_POSTER,
            glitch_damage: GLITCH_DAMAGE,
            glitch_corrupted: GLITCH_CORRUPTED,
            audio_fear_time_constant_ms: AUDIO_FEAR_TIME_CONSTANT_MS,
        }
    }
}

impl AffectParams {
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("affect.sanity_decay_per_sec", self.sanity_decay_per_sec, 0.0, AFFECT_MAX)?;
        check_range("affect.glitch_decay_per_sec", self.glitch_decay_per_sec, 0.0, 100.0)?;
        check_range("affect.glitch_note", self.glitch_note, 0.0, 1.0)?;
        check_range("affect.glitch_poster", self.glitch_poster, 0.0, 1.0)?;
        check_range("affect.glitch_damage", self.glitch_damage, 0.0, 1.0)?;
        check_range("affect.glitch_corrupted", self.glitch_corrupted, 0.0, 1.0)?;
        check_range(
            "affect.audio_fear_time_constant_ms",
            self.audio_fear_time_constant_ms,
            1.0,
            10_000.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlitchEvent {
    NoteRead,
    PosterStare,
    EnemyDamage,
    CorruptedItem,
}

/// Read-only view handed to every other subsystem for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffectSnapshot {
    pub health: f32,
    pub sanity: f32,
    pub fear: f32,
    pub glitch: f32,
    pub terminal: Option<TerminalReason>,
}

pub fn fear_from_sanity(sanity: f32) -> f32 {
    (1.0 - sanity / AFFECT_MAX).clamp(0.0, 1.0)
}

fn clamp_affect(value: f32) -> f32 {
    value.clamp(0.0, AFFECT_MAX)
}

/// Sole owner of health, sanity and glitch. Every mutation clamps.
#[derive(Clone, Debug)]
pub struct AffectModel {
    params: AffectParams,
    health: f32,
    sanity: f32,
    glitch: f32,
    terminal: Option<TerminalReason>,
}

impl AffectModel {
    pub fn new(params: AffectParams) -> Self {
        Self {
            params,
            health: AFFECT_MAX,
            sanity: AFFECT_MAX,
            glitch: 0.0,
            terminal: None,
        }
    }

    pub fn reset(&mut self) {
        self.health = AFFECT_MAX;
        self.sanity = AFFECT_MAX;
        self.glitch = 0.0;
        self.terminal = None;
    }

    pub fn params(&self) -> &AffectParams {
        &self.params
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn sanity(&self) -> f32 {
        self.sanity
    }

    pub fn glitch(&self) -> f32 {
        self.glitch
    }

    pub fn fear(&self) -> f32 {
        fear_from_sanity(self.sanity)
    }

    pub fn terminal(&self) -> Option<TerminalReason> {
        self.terminal
    }

    /// Non-finite deltas are ignored.
    pub fn apply_health(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.health = clamp_affect(self.health + delta);
        }
        self.health
    }

    pub fn apply_sanity(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.sanity = clamp_affect(self.sanity + delta);
        }
        self.sanity
    }

    pub fn boost_glitch(&mut self, event: GlitchEvent) -> f32 {
        let amount = match event {
            GlitchEvent::NoteRead => self.params.glitch_note,
            GlitchEvent::PosterStare => self.params.glitch_poster,
            GlitchEvent::EnemyDamage => self.params.glitch_damage,
            GlitchEvent::CorruptedItem => self.params.glitch_corrupted,
        };
        self.glitch = (self.glitch + amount).clamp(0.0, 1.0);
        self.glitch
    }

    /// Passive sanity drain and glitch decay, then the death check.
    pub fn tick(&mut self, dt_sec: f32) -> Option<TerminalReason> {
        if self.terminal.is_some() {
            return self.terminal;
        }
        let dt_sec = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        self.apply_sanity(-self.params.sanity_decay_per_sec * dt_sec);
        self.glitch = (self.glitch - self.params.glitch_decay_per_sec * dt_sec).clamp(0.0, 1.0);
        self.check_terminal()
    }

    /// Health is checked before sanity; the first reason found is latched.
    pub fn check_terminal(&mut self) -> Option<TerminalReason> {
        if self.terminal.is_none() {
            self.terminal = if self.health <= 0.0 {
                Some(TerminalReason::Trauma)
            } else if self.sanity <= 0.0 {
                Some(TerminalReason::Corruption)
            } else {
                None
            };
        }
        self.terminal
    }

    pub fn snapshot(&self) -> AffectSnapshot {
        AffectSnapshot {
            health: self.health,
            sanity: self.sanity,
            fear: self.fear(),
            glitch: self.glitch,
            terminal: self.terminal,
        }
    }
}

/// Fear-derived probability that the minimap misreports; the HUD decides how.
pub fn lie_probability(fear: f32, max_lie: f32) -> f32 {
    let fear = fear.clamp(0.0, 1.0);
    (max_lie * fear * fear).clamp(0.0, 1.0)
}

/// First-order low-pass toward a moving target.
#[derive(Clone, Debug)]
pub struct SmoothedValue {
    value: f32,
    time_constant_sec: f32,
}

impl SmoothedValue {
    pub fn new(initial: f32, time_constant_ms: f32) -> Self {
        Self {
            value: initial,
            time_constant_sec: (time_constant_ms / 1000.0).max(f32::EPSILON),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }

    pub fn update(&mut self, target: f32, dt_sec: f32) -> f32 {
        if !target.is_finite() || !dt_sec.is_finite() || dt_sec <= 0.0 {
            return self.value;
        }
        let alpha = 1.0 - (-dt_sec / self.time_constant_sec).exp();
        self.value += (target - self.value) * alpha;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn model() -> AffectModel {
        AffectModel::new(AffectParams::default())
    }

    #[test]
    fn sanity_clamps_at_zero() {
        let mut affect = model();
        affect.apply_sanity(-90.0);
        assert_eq!(affect.sanity(), 10.0);
        assert_eq!(affect.apply_sanity(-50.0), 0.0);
    }

    #[test]
    fn health_clamps_at_max() {
        let mut affect = model();
        affect.apply_health(-30.0);
        assert_eq!(affect.apply_health(500.0), 100.0);
    }

    #[test]
    fn passive_drain_lowers_sanity_each_tick() {
        let mut affect = AffectModel::new(AffectParams {
            sanity_decay_per_sec: 2.0,
            ..AffectParams::default()
        });
        affect.tick(0.5);
        affect.tick(0.5);
        assert!((affect.sanity() - 98.0).abs() < 1e-5);
        assert!((affect.fear() - 0.02).abs() < 1e-5);
    }

    #[test]
    fn glitch_boosts_clamp_and_decay_to_zero() {
        let mut affect = model();
        affect.boost_glitch(GlitchEvent::EnemyDamage);
        affect.boost_glitch(GlitchEvent::EnemyDamage);
        assert_eq!(affect.glitch(), 1.0);
        affect.tick(1.0);
        assert!((affect.glitch() - 0.4).abs() < 1e-5);
        affect.tick(10.0);
        assert_eq!(affect.glitch(), 0.0);
    }

    #[test]
    fn trauma_wins_when_both_reach_zero() {
        let mut affect = model();
        affect.apply_health(-100.0);
        affect.apply_sanity(-100.0);
        assert_eq!(affect.tick(0.1), Some(TerminalReason::Trauma));
        affect.apply_health(50.0);
        assert_eq!(affect.check_terminal(), Some(TerminalReason::Trauma));
    }

    #[test]
    fn corruption_reported_when_only_sanity_is_gone() {
        let mut affect = model();
        affect.apply_sanity(-100.0);
        assert_eq!(affect.tick(0.0), Some(TerminalReason::Corruption));
    }

    #[test]
    fn smoothed_value_converges_within_a_few_time_constants() {
        let mut smoothed = SmoothedValue::new(0.0, 100.0);
        for _ in 0..30 {
            smoothed.update(1.0, 1.0 / 60.0);
        }
        // 0.5s = 5 time constants
        assert!(smoothed.value() > 0.99);
        assert!(smoothed.value() <= 1.0);
    }

    #[test]
    fn lie_probability_grows_with_fear() {
        assert_eq!(lie_probability(0.0, 0.75), 0.0);
        assert!(lie_probability(0.5, 0.75) < lie_probability(0.9, 0.75));
        assert!((lie_probability(1.0, 0.75) - 0.75).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn mutators_stay_in_range_and_follow_delta_sign(
            start_health in 0.0f32..=100.0,
            start_sanity in 0.0f32..=100.0,
            delta in -250.0f32..250.0,
        ) {
            let mut affect = model();
            affect.apply_health(start_health - 100.0);
            affect.apply_sanity(start_sanity - 100.0);
            let before_health = affect.health();
            let before_sanity = affect.sanity();

            let health = affect.apply_health(delta);
            let sanity = affect.apply_sanity(delta);

            prop_assert!((0.0..=100.0).contains(&health));
            prop_assert!((0.0..=100.0).contains(&sanity));
            if delta >= 0.0 {
                prop_assert!(health >= before_health);
                prop_assert!(sanity >= before_sanity);
            } else {
                prop_assert!(health <= before_health);
                prop_assert!(sanity <= before_sanity);
            }
        }

        #[test]
        fn fear_is_exactly_one_minus_sanity_fraction(sanity in 0.0f32..=100.0) {
            let fear = fear_from_sanity(sanity);
            prop_assert_eq!(fear, 1.0 - sanity / 100.0);
            prop_assert!((0.0..=1.0).contains(&fear));
        }
    }
}
