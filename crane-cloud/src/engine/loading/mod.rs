//! Startup loading stages for the crane cloud.
//!
//! Settles the scene configuration, prepares the crane sprite texture and
//! records progress for the `AppState` transitions.

/// Scene configuration loading with fallback to compiled defaults.
pub mod config_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// Crane sprite preparation from the built-in outline or a configured image.
pub mod sprite_loader;
