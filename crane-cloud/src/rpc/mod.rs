//! JSON-RPC 2.0 bridge between the crane cloud and the page embedding it.
//!
//! The canvas runs inside an iframe. The parent window posts requests as JSON
//! strings, and the engine answers and pushes notifications with `postMessage`.
//! Messages without an `id` are notifications and never get a reply.
//!
//! ```text
//! parent window                          crane cloud (iframe)
//!   request {id} ─────────────────────>  HostInbox -> dispatch
//!   <───────────────────── response {id}  flushed after notifications
//!   <──────────────── notification {method, params}
//! ```
//!
//! ## Request Handling
//!
//! Handlers are plain functions of an `RpcContext`, a borrowed snapshot of the
//! scene resources. Requests that need the crane cloud answer `-32000` until it
//! has been built. Standard codes: `-32600` invalid request, `-32601` method not
//! found, `-32602` params passed to a parameterless method.
//!
//! ## Existing Methods
//!
//! ### Requests
//! - `get_fps`: Retrieve current frame rate
//! - `get_hovered_point`: Focused crane index, whether it is featured, cranes still fading
//! - `get_featured_points`: Indices eligible for click activation
//! - `get_scene_summary`: Loading stage, sprite source, seed and cloud statistics
//!
//! ### Notifications
//! - `featured_point_activated`: A featured crane was clicked (`{index}`)
//! - `hover_changed`: Hover focus moved (`{index}` or `null`)
//! - `fps_update`: Smoothed frame rate every half second
//! - `loading_state`: Startup stage changed (`{state}`)
//! - `debug_message`: A host message could not be parsed

/// Wire types, the `message` listener, request dispatch and the per-frame flush.
pub mod web_rpc;
