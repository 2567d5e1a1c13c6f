//! World configuration: arena bounds, gravity, physics option flags

use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY_DEFAULT;

/// Static/semi-static simulation parameters.
///
/// Replacing `width`/`height` (viewport resize) does not move existing
/// planets or notes; rescaling positions is a layout concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Arena width in pixels
    pub width: f32,
    /// Arena height in pixels
    pub height: f32,
    /// Gravitational constant
    pub gravity: f32,
    /// Split each external tick into sub-steps for integration accuracy
    pub ultra_physics: bool,
    /// Reflect off arena edges; when false, leaving the arena ends the run
    pub walls_bounce: bool,
    /// Slow the local clock near massive planets
    pub time_dilation: bool,
}

impl WorldConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            gravity: GRAVITY_DEFAULT,
            ultra_physics: true,
            walls_bounce: true,
            time_dilation: true,
        }
    }

    /// Merge a partial options patch, field by field
    pub fn apply(&mut self, patch: &OptionsPatch) {
        if let Some(v) = patch.ultra_physics {
            self.ultra_physics = v;
        }
        if let Some(v) = patch.walls_bounce {
            self.walls_bounce = v;
        }
        if let Some(v) = patch.time_dilation {
            self.time_dilation = v;
        }
    }
}

/// Partial option update; absent fields leave the current value alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultra_physics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls_bounce: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dilation: Option<bool>,
}

impl OptionsPatch {
    pub fn ultra_physics(v: bool) -> Self {
        Self {
            ultra_physics: Some(v),
            ..Default::default()
        }
    }

    pub fn walls_bounce(v: bool) -> Self {
        Self {
            walls_bounce: Some(v),
            ..Default::default()
        }
    }

    pub fn time_dilation(v: bool) -> Self {
        Self {
            time_dilation: Some(v),
            ..Default::default()
        }
    }
}
