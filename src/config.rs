//! Controller configuration parsing from controller.toml files

use rapier3d::prelude::Group;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::locomotion as consts;

/// Planar movement tuning. All speeds and the acceleration are in world
/// units; `air_control` scales the acceleration budget while airborne.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MovementConfig {
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_sprint_speed")]
    pub sprint_speed: f32,
    /// Planar acceleration in units/s²
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,
    /// Fraction of `acceleration` available while airborne, in [0, 1]
    #[serde(default = "default_air_control")]
    pub air_control: f32,
}

/// Jump-feel tuning: apex height plus the two forgiveness windows and the
/// gravity scaling that shapes the arc.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JumpConfig {
    /// Apex height of a full jump, in units
    #[serde(default = "default_jump_height")]
    pub jump_height: f32,
    /// How long an early jump press stays valid, in seconds
    #[serde(default = "default_jump_buffer")]
    pub jump_buffer_seconds: f32,
    /// How long after leaving ground a jump is still permitted, in seconds
    #[serde(default = "default_coyote")]
    pub coyote_seconds: f32,
    /// Scaling applied to the world gravity magnitude
    #[serde(default = "default_gravity_multiplier")]
    pub gravity_multiplier: f32,
}

/// Ground probe placement and contact filter.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GroundProbeConfig {
    /// Probe sphere center relative to the body origin, rotated by the body
    /// orientation before use
    #[serde(default = "default_probe_offset")]
    pub offset: [f32; 3],
    /// Probe sphere radius, accepted range 0.05..=1.0
    #[serde(default = "default_probe_radius")]
    pub radius: f32,
    /// Collision-group bitmask of surfaces that count as ground
    #[serde(default = "default_ground_groups")]
    pub ground_groups: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: default_walk_speed(),
            sprint_speed: default_sprint_speed(),
            acceleration: default_acceleration(),
            air_control: default_air_control(),
        }
    }
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_height: default_jump_height(),
            jump_buffer_seconds: default_jump_buffer(),
            coyote_seconds: default_coyote(),
            gravity_multiplier: default_gravity_multiplier(),
        }
    }
}

impl Default for GroundProbeConfig {
    fn default() -> Self {
        Self {
            offset: default_probe_offset(),
            radius: default_probe_radius(),
            ground_groups: default_ground_groups(),
        }
    }
}

fn default_walk_speed() -> f32 {
    consts::DEFAULT_WALK_SPEED
}

fn default_sprint_speed() -> f32 {
    consts::DEFAULT_SPRINT_SPEED
}

fn default_acceleration() -> f32 {
    consts::DEFAULT_ACCELERATION
}

fn default_air_control() -> f32 {
    consts::DEFAULT_AIR_CONTROL
}

fn default_jump_height() -> f32 {
    consts::DEFAULT_JUMP_HEIGHT
}

fn default_jump_buffer() -> f32 {
    consts::DEFAULT_JUMP_BUFFER_SECS
}

fn default_coyote() -> f32 {
    consts::DEFAULT_COYOTE_SECS
}

fn default_gravity_multiplier() -> f32 {
    consts::DEFAULT_GRAVITY_MULTIPLIER
}

fn default_probe_offset() -> [f32; 3] {
    consts::DEFAULT_PROBE_OFFSET
}

fn default_probe_radius() -> f32 {
    consts::DEFAULT_PROBE_RADIUS
}

fn default_ground_groups() -> u32 {
    crate::physics::GROUP_STATIC.bits()
}

impl MovementConfig {
    /// Reject negative speeds/acceleration and out-of-range air control.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("movement.walk_speed", self.walk_speed)?;
        check_non_negative("movement.sprint_speed", self.sprint_speed)?;
        check_non_negative("movement.acceleration", self.acceleration)?;
        if !(0.0..=1.0).contains(&self.air_control) {
            return Err(ConfigError::InvalidValue {
                field: "movement.air_control",
                value: self.air_control,
            });
        }
        Ok(())
    }
}

impl JumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("jump.jump_height", self.jump_height)?;
        check_non_negative("jump.jump_buffer_seconds", self.jump_buffer_seconds)?;
        check_non_negative("jump.coyote_seconds", self.coyote_seconds)?;
        check_non_negative("jump.gravity_multiplier", self.gravity_multiplier)?;
        Ok(())
    }
}

impl GroundProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(consts::MIN_PROBE_RADIUS..=consts::MAX_PROBE_RADIUS).contains(&self.radius) {
            return Err(ConfigError::InvalidValue {
                field: "ground_probe.radius",
                value: self.radius,
            });
        }
        for component in self.offset {
            if !component.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "ground_probe.offset",
                    value: component,
                });
            }
        }
        Ok(())
    }

    /// Contact filter as rapier collision groups. `None` when the mask selects
    /// nothing, which the controller treats as an unavailable ground query.
    pub fn ground_filter(&self) -> Option<Group> {
        let group = Group::from_bits_truncate(self.ground_groups);
        if group.is_empty() {
            None
        } else {
            Some(group)
        }
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// Controller configuration from controller.toml
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ControllerConfig {
    /// Planar movement section
    #[serde(default)]
    pub movement: MovementConfig,
    /// Jump-feel section
    #[serde(default)]
    pub jump: JumpConfig,
    /// Ground probe section
    #[serde(default)]
    pub ground_probe: GroundProbeConfig,
}

impl ControllerConfig {
    /// Load and validate controller configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.jump.validate()?;
        self.ground_probe.validate()?;
        Ok(())
    }
}

/// Errors that can occur when loading controller configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    InvalidValue { field: &'static str, value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => {
                write!(f, "Failed to read {}: {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value for {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: ControllerConfig = toml::from_str("").unwrap();
        assert_eq!(config.movement.walk_speed, 6.0);
        assert_eq!(config.movement.sprint_speed, 10.0);
        assert_eq!(config.jump.jump_height, 3.0);
        assert_eq!(config.ground_probe.radius, 0.25);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [movement]
            walk_speed = 4.5
            sprint_speed = 8.0
            acceleration = 30.0
            air_control = 0.25

            [jump]
            jump_height = 2.0
            jump_buffer_seconds = 0.15
            coyote_seconds = 0.2
            gravity_multiplier = 2.0

            [ground_probe]
            offset = [0.0, -0.8, 0.0]
            radius = 0.3
            ground_groups = 3
        "#;
        let config: ControllerConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.movement.walk_speed, 4.5);
        assert_eq!(config.movement.air_control, 0.25);
        assert_eq!(config.jump.coyote_seconds, 0.2);
        assert_eq!(config.ground_probe.offset[1], -0.8);
        assert_eq!(config.ground_probe.ground_groups, 3);
    }

    #[test]
    fn test_reject_negative_walk_speed() {
        let config = MovementConfig {
            walk_speed: -1.0,
            ..MovementConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "movement.walk_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_reject_air_control_above_one() {
        let config = MovementConfig {
            air_control: 1.5,
            ..MovementConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_probe_radius_out_of_range() {
        let too_small = GroundProbeConfig {
            radius: 0.01,
            ..GroundProbeConfig::default()
        };
        assert!(too_small.validate().is_err());

        let too_large = GroundProbeConfig {
            radius: 1.5,
            ..GroundProbeConfig::default()
        };
        assert!(too_large.validate().is_err());
    }

    #[test]
    fn test_reject_negative_jump_height() {
        let config = JumpConfig {
            jump_height: -3.0,
            ..JumpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ground_mask_yields_no_filter() {
        let config = GroundProbeConfig {
            ground_groups: 0,
            ..GroundProbeConfig::default()
        };
        assert!(config.ground_filter().is_none());
        assert!(GroundProbeConfig::default().ground_filter().is_some());
    }
}
