//! Orbit camera for viewing the crane cloud.
//!
//! Damped left-drag rotation around the origin and wheel zoom clamped to a
//! distance band, with lens settings taken from the scene configuration.

/// Orbit camera resource, controller system and camera spawning.
pub mod orbit_camera;
