//! Scene configuration, loaded from JSON. Every field has a default, so a
//! partial (or empty) object is valid.

use crate::error::SceneError;
use cr_core::color::Color;
use cr_core::lighting::LightSlot;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Update/render passes per second.
    pub frames_per_second: u32,
    /// Display cards the shelf holds (bound to keys 1-9).
    pub shelf_capacity: usize,
    /// Hardware light slot the lamp drives.
    pub lamp_light: u8,
    /// Lamp emission as `#RRGGBB`.
    pub lamp_color: String,
    /// Slices of the lamp's cylinder.
    pub lamp_sides: usize,
    /// Scale of newly added trees.
    pub tree_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            shelf_capacity: 9,
            lamp_light: 0,
            lamp_color: "#A0A0A0".to_string(),
            lamp_sides: 32,
            tree_scale: 0.25,
        }
    }
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.light_slot()?;
        self.lamp_emission()?;
        if self.frames_per_second == 0 {
            return Err(SceneError::InvalidConfig(
                "frames_per_second must be positive".into(),
            ));
        }
        if self.lamp_sides < 3 {
            return Err(SceneError::InvalidConfig(format!(
                "lamp_sides must be at least 3, got {}",
                self.lamp_sides
            )));
        }
        Ok(())
    }

    pub fn light_slot(&self) -> Result<LightSlot, SceneError> {
        LightSlot::new(self.lamp_light).ok_or_else(|| {
            SceneError::InvalidConfig(format!("lamp_light {} is not in 0..=7", self.lamp_light))
        })
    }

    pub fn lamp_emission(&self) -> Result<Color, SceneError> {
        Color::from_hex(&self.lamp_color).ok_or_else(|| {
            SceneError::InvalidConfig(format!("lamp_color {:?} is not a hex color", self.lamp_color))
        })
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(r#"{ "shelf_capacity": 4 }"#).unwrap();
        assert_eq!(config.shelf_capacity, 4);
        assert_eq!(config.frames_per_second, 60);
        assert_eq!(config.lamp_emission().unwrap(), Color::grey8(160));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "lamp_light": 9 }"#),
            Err(SceneError::InvalidConfig(_))
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "lamp_color": "yellow" }"#),
            Err(SceneError::InvalidConfig(_))
        ));
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SceneError::Config(_))
        ));
    }
}
