//! Scene content: the crane cloud and the particle field behind it.

/// Drifting background particles recycled inside a bounding sphere.
pub mod background;

/// Crane cloud entity creation, billboarding, colour upload and rotation.
pub mod crane_cloud;
