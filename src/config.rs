use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::affect::AffectParams;
use crate::behavior::BehaviorParams;
use crate::constants::{
    AREA_SIDE, MAX_LIE_PROBABILITY, MINIMAP_RADIUS, PLAYER_EYE_HEIGHT, PLAYER_LOOK_PITCH_LIMIT,
    PLAYER_RADIUS, PLAYER_WALK_SPEED,
};
use crate::error::{check_range, ConfigError, ConfigResult};
use crate::interaction::InteractionParams;
use crate::speech::SpeechOptions;
use crate::world::{GenerationParams, GridSize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerParams {
    pub walk_speed: f32,
    pub radius: f32,
    pub eye_height: f32,
    pub look_pitch_limit: f32,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            walk_speed: PLAYER_WALK_SPEED,
            radius: PLAYER_RADIUS,
            eye_height: PLAYER_EYE_HEIGHT,
            look_pitch_limit: PLAYER_LOOK_PITCH_LIMIT,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HudParams {
    pub minimap_radius: i32,
    pub max_lie_probability: f32,
}

impl Default for HudParams {
    fn default() -> Self {
        Self {
            minimap_radius: MINIMAP_RADIUS,
            max_lie_probability: MAX_LIE_PROBABILITY,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AreaConfig {
    pub size: GridSize,
    pub params: GenerationParams,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            size: GridSize::new(AREA_SIDE, AREA_SIDE),
            params: GenerationParams::default(),
        }
    }
}

impl AreaConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.size.validate()?;
        self.params.validate()
    }
}

/// Everything tunable about a session. Every section is optional in TOML.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    pub player: PlayerParams,
    pub affect: AffectParams,
    pub behavior: BehaviorParams,
    pub interaction: InteractionParams,
    pub speech: SpeechOptions,
    pub hud: HudParams,
    pub surface: AreaConfig,
    pub pocket: AreaConfig,
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: SimConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_range("player.walk_speed", self.player.walk_speed, 0.0, 100.0)?;
        check_range("player.radius", self.player.radius, 0.01, 10.0)?;
        check_range("player.look_pitch_limit", self.player.look_pitch_limit, 0.0, 1.57)?;
        check_range("hud.max_lie_probability", self.hud.max_lie_probability, 0.0, 1.0)?;
        if self.hud.minimap_radius < 0 {
            return Err(ConfigError::invalid("hud.minimap_radius", "must not be negative"));
        }
        self.affect.validate()?;
        self.behavior.validate()?;
        self.interaction.validate()?;
        self.speech.validate()?;
        self.surface.validate()?;
        self.pocket.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [behavior]
            aggro_radius_base = 12.0

            [pocket.size]
            width = 24
            height = 18

            [pocket.params]
            room_count = 4
            "#,
        )
        .expect("valid config");

        assert_eq!(config.behavior.aggro_radius_base, 12.0);
        assert_eq!(config.behavior.attack_radius, BehaviorParams::default().attack_radius);
        assert_eq!(config.pocket.size, GridSize::new(24, 18));
        assert_eq!(config.pocket.params.room_count, 4);
        assert_eq!(config.surface.size, GridSize::new(AREA_SIDE, AREA_SIDE));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = SimConfig::from_toml_str("[surface.params]\nlock_chance = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParam {
                name: "lock_chance",
                ..
            }
        ));

        let err = SimConfig::from_toml_str("[pocket.size]\nwidth = 3\nheight = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::GridTooSmall { width: 3, .. }));
    }

    #[test]
    fn malformed_toml_and_missing_files_surface_as_errors() {
        assert!(matches!(
            SimConfig::from_toml_str("[behavior\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            SimConfig::load("/no/such/liminal.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
