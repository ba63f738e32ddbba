//! Application wiring and lifecycle.
//!
//! Builds the app, owns the loading state machine and the window setup for
//! native and WASM targets.

/// Plugin setup and frame loop ordering.
pub mod app_setup;

/// Loading states from configuration through sprite and cloud build to running.
pub mod app_state;

/// Canvas integration for web targets and vsync settings.
pub mod window_config;
