use thiserror::Error;

/// Malformed construction parameters. The only failures allowed to stop a
/// session before it starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min} cells, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32, min: i32 },

    #[error("a generation seed is required")]
    MissingSeed,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name,
            reason: reason.into(),
        }
    }
}

/// Conditions that are handled where they occur and never abort a tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimIssue {
    #[error("placed {placed} of {requested} {what} before the attempt budget ran out")]
    GenerationExhausted {
        what: &'static str,
        placed: usize,
        requested: usize,
    },

    #[error("asset `{key}` failed to load: {reason}")]
    AssetLoadFailed { key: String, reason: String },

    #[error("grid query outside bounds at ({x}, {z})")]
    OutOfBoundsQuery { x: i32, z: i32 },

    #[error("interactable {id} was already consumed")]
    ActionOnConsumedEntity { id: usize },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Checks a tuning value that must be finite and inside `[min, max]`.
pub fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> ConfigResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::invalid(
            name,
            format!("expected a value in [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_rejects_nan_and_out_of_range() {
        assert!(check_range("x", 0.5, 0.0, 1.0).is_ok());
        assert!(check_range("x", f32::NAN, 0.0, 1.0).is_err());
        let err = check_range("lock_chance", 1.5, 0.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("lock_chance"));
    }

    #[test]
    fn issues_render_readable_messages() {
        let issue = SimIssue::GenerationExhausted {
            what: "keys",
            placed: 1,
            requested: 3,
        };
        assert_eq!(
            issue.to_string(),
            "placed 1 of 3 keys before the attempt budget ran out"
        );
    }
}
