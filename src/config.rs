//! Scene configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! {
//!   "window": { "width": 1280, "height": 720 },
//!   "animation": { "enabled": true },
//!   "textures": { "ground": "assets/grass.png" }
//! }
//! ```
//!
//! Command-line flags are applied on top of the loaded file by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::animation::AnimationParams;
use crate::error::{PaddockError, Result};

/// Top-level configuration for a paddock scene.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub controls: ControlsConfig,
    pub textures: TextureConfig,
    pub layout: LayoutConfig,
}

impl SceneConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PaddockError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| PaddockError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Window title and initial size.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Paddock".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Initial camera state. See [`Camera`](crate::Camera).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    /// Eye-to-center vector; its length is the look-at distance.
    pub look: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub step: f32,
    /// Degrees per keyboard pan.
    pub pan_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.6, 3.0),
            look: Vec3::new(0.0, 0.0, -100.0),
            up: Vec3::Y,
            fov: 60.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 1000.0,
            step: 0.2,
            pan_step: 5.0,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Whether the models move as soon as the scene starts.
    pub enabled: bool,
    pub params: AnimationParams,
}

/// Tuning for the rotation keys and pointer pan.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Degrees the global rotation changes per `[` / `]` press.
    pub rotation_step: f32,
    /// Degrees of pan for a pointer sweep across half the window width.
    pub pointer_pan_scale: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotation_step: 5.0,
            pointer_pan_scale: 10.0,
        }
    }
}

/// Optional image files for the two texture units. Procedural textures are
/// used for any unit left unset or failing to load.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Texture unit A, used by the ground.
    pub ground: Option<PathBuf>,
    /// Texture unit B, used by the skybox.
    pub sky: Option<PathBuf>,
}

/// Where the models stand in the world.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub sheep: Vec3,
    pub dog: Vec3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sheep: Vec3::ZERO,
            dog: Vec3::new(1.2, 0.0, -0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.window.width, 800);
        assert!(!config.animation.enabled);
        assert_eq!(config.camera.fov, 60.0);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = SceneConfig::from_json(
            r#"{
                "window": { "width": 1280 },
                "camera": { "eye": [1.0, 2.0, 3.0] },
                "animation": { "enabled": true, "params": { "tail_wag": { "amplitude": 50.0, "frequency": 4.0 } } },
                "textures": { "sky": "sky.png" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.step, 0.2);
        assert!(config.animation.enabled);
        assert_eq!(config.animation.params.tail_wag.amplitude, 50.0);
        assert_eq!(config.animation.params.tail_wag.frequency, 4.0);
        assert_eq!(config.animation.params.tail_wag.phase, 0.0);
        assert_eq!(config.animation.params.leg_swing.frequency, 3.0);
        assert_eq!(config.textures.sky, Some(PathBuf::from("sky.png")));
        assert_eq!(config.textures.ground, None);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = SceneConfig::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PaddockError::ConfigRead { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(SceneConfig::from_json("{ \"window\": 3 }").is_err());
    }
}
