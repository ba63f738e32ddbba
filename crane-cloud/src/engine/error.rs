//! Error types for configuration and sprite preparation.

use thiserror::Error;

/// Rejected values in `scene_config.json`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be in (0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("camera distance range is inverted: min {min} > max {max}")]
    InvertedDistanceRange { min: f32, max: f32 },

    #[error("camera clip planes are inverted: near {near} >= far {far}")]
    InvertedClipPlanes { near: f32, far: f32 },

    #[error("amount must be at least one crane")]
    EmptyCloud,

    #[error("max_attempts must be at least one")]
    NoAttempts,

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Failures while turning outline data or image files into the crane sprite.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpriteError {
    #[error("unexpected character '{0}' in path data")]
    UnexpectedCharacter(char),

    #[error("invalid number '{0}' in path data")]
    InvalidNumber(String),

    #[error("path command '{command}' is missing operands")]
    MissingOperands { command: char },

    #[error("number without a preceding command in path data")]
    DanglingNumber,

    #[error("path data must start with a move command, found '{0}'")]
    MissingMoveTo(char),

    #[error("path data contains no fillable shapes")]
    Empty,

    #[error("sprite resolution must be greater than zero")]
    ZeroResolution,

    #[error("sprite resolution {resolution} exceeds the {max} pixel limit")]
    ResolutionTooLarge { resolution: u32, max: u32 },

    #[error("sprite image '{path}' failed to load: {reason}")]
    Decode { path: String, reason: String },
}
