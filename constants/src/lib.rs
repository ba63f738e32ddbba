//! Compile-time defaults shared by the crane cloud engine.
//!
//! Every value here can be overridden at runtime through `scene_config.json`
//! except the palette and the built-in sprite outlines.

pub mod background;
pub mod camera;
pub mod palette;
pub mod path;
pub mod render_settings;
pub mod sampling;
pub mod sprite;
