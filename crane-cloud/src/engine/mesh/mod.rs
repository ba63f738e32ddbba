//! Mesh generation for camera-facing sprite quads.
//!
//! Both the crane cloud and the background field are a single mesh of quads
//! whose corners are rewritten from the camera basis each frame.

pub mod billboard_mesh;
