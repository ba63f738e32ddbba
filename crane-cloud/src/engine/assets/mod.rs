//! Loadable scene data and the crane sprite.

/// JSON scene configuration with defaults for every field.
pub mod scene_config;

/// Built-in crane outlines rasterised to sprite textures.
pub mod sprite;
