use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::error::ConfigError;
use constants::sprite::MAX_SPRITE_RESOLUTION;

/// Runtime scene parameters, read from `scene_config.json`.
///
/// Every field falls back to the compile-time default in the `constants` crate,
/// so a partial file only overrides what it names.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Asset, TypePath)]
#[serde(default)]
pub struct SceneConfig {
    pub amount: usize,
    pub featured_count: usize,
    pub min_distance: f32,
    pub shell_inner_radius: f32,
    pub shell_thickness: f32,
    pub max_attempts: u32,
    pub colour_rate: f32,
    pub pick_threshold: f32,
    pub rotation_speed: f32,
    /// Fixed seed for reproducible layouts. Entropy-seeded when absent.
    pub seed: Option<u64>,
    pub background: BackgroundConfig,
    pub sprite: SpriteConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub count: usize,
    pub radius: f32,
    pub velocity_span: f32,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Optional image under `assets/` replacing the built-in crane outline.
    pub path: Option<String>,
    pub size: f32,
    pub resolution: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use constants::sampling::*;
        Self {
            amount: AMOUNT,
            featured_count: FEATURED_COUNT,
            min_distance: MIN_DISTANCE,
            shell_inner_radius: SHELL_INNER_RADIUS,
            shell_thickness: SHELL_THICKNESS,
            max_attempts: MAX_ATTEMPTS,
            colour_rate: COLOUR_RATE,
            pick_threshold: PICK_THRESHOLD,
            rotation_speed: CLOUD_ROTATION_SPEED,
            seed: None,
            background: BackgroundConfig::default(),
            sprite: SpriteConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        use constants::background::*;
        Self {
            count: PARTICLE_COUNT,
            radius: FIELD_RADIUS,
            velocity_span: VELOCITY_SPAN,
            size: PARTICLE_SIZE,
            opacity: PARTICLE_OPACITY,
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: constants::render_settings::CRANE_SPRITE_SIZE,
            resolution: constants::sprite::SPRITE_RESOLUTION,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        use constants::camera::*;
        Self {
            fov_degrees: FOV_DEGREES,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            distance: START_DISTANCE,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            damping: DAMPING_FACTOR,
        }
    }
}

impl SceneConfig {
    /// Reject values the sampler, field or camera cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.amount == 0 {
            return Err(ConfigError::EmptyCloud);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        non_negative("min_distance", self.min_distance)?;
        non_negative("shell_thickness", self.shell_thickness)?;
        positive("shell_inner_radius", self.shell_inner_radius)?;
        positive("pick_threshold", self.pick_threshold)?;
        unit_range("colour_rate", self.colour_rate)?;

        positive("background.radius", self.background.radius)?;
        non_negative("background.velocity_span", self.background.velocity_span)?;
        positive("background.size", self.background.size)?;
        unit_range("background.opacity", self.background.opacity)?;

        positive("sprite.size", self.sprite.size)?;
        if self.sprite.resolution == 0 {
            return Err(ConfigError::NotPositive {
                field: "sprite.resolution",
                value: 0.0,
            });
        }
        if self.sprite.resolution > MAX_SPRITE_RESOLUTION {
            return Err(ConfigError::TooLarge {
                field: "sprite.resolution",
                value: self.sprite.resolution,
                max: MAX_SPRITE_RESOLUTION,
            });
        }

        let camera = &self.camera;
        positive("camera.fov_degrees", camera.fov_degrees)?;
        positive("camera.near", camera.near)?;
        positive("camera.min_distance", camera.min_distance)?;
        unit_range("camera.damping", camera.damping)?;
        if camera.near >= camera.far {
            return Err(ConfigError::InvertedClipPlanes {
                near: camera.near,
                far: camera.far,
            });
        }
        if camera.min_distance > camera.max_distance {
            return Err(ConfigError::InvertedDistanceRange {
                min: camera.min_distance,
                max: camera.max_distance,
            });
        }

        Ok(())
    }

    /// Featured cranes actually created: the request clamped to the cloud size.
    pub fn effective_featured_count(&self) -> usize {
        self.featured_count.min(self.amount)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
