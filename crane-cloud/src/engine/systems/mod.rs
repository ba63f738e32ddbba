//! Runtime systems driving each frame and reporting to the host page.
//!
//! Pointer tracking, hover updates, click activation, FPS diagnostics and
//! event forwarding over RPC.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Pointer ray hit testing feeding the hover state machine.
pub mod frame;

/// Interaction events forwarded to the host page as RPC notifications.
pub mod notifications;

/// Pointer position, viewport size and click activation.
pub mod pointer;
