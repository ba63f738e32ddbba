/// Number of drifting background stars.
pub const PARTICLE_COUNT: usize = 1000;

/// Stars escaping this radius are recycled back inside it.
pub const FIELD_RADIUS: f32 = 60.0;

/// Per-axis velocity span, velocities are drawn from [-span/2, span/2).
pub const VELOCITY_SPAN: f32 = 0.01;

/// Edge length of a star quad.
pub const PARTICLE_SIZE: f32 = 0.08;

/// Star opacity under additive blending.
pub const PARTICLE_OPACITY: f32 = 0.4;
