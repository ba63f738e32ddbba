/// Number of cranes placed on the shell.
pub const AMOUNT: usize = 600;

/// The first `FEATURED_COUNT` cranes by creation order are featured.
pub const FEATURED_COUNT: usize = 200;

/// Minimum distance between two accepted cranes.
pub const MIN_DISTANCE: f32 = 1.0;

/// Inner radius of the annulus candidates are drawn from.
pub const SHELL_INNER_RADIUS: f32 = 8.0;

/// Radial thickness of the annulus, so radii fall in [8, 9).
pub const SHELL_THICKNESS: f32 = 1.0;

/// Candidate attempts per crane before the last one is accepted regardless.
pub const MAX_ATTEMPTS: u32 = 100;

/// Fraction of the remaining colour distance covered per frame.
pub const COLOUR_RATE: f32 = 0.1;

/// Per-channel distance under which a colour counts as arrived.
pub const CONVERGENCE_TOLERANCE: f32 = 0.01;

/// Ray picking tolerance in world units.
pub const PICK_THRESHOLD: f32 = 1.0;

/// Radians the cloud turns about +Y every frame.
pub const CLOUD_ROTATION_SPEED: f32 = 0.0004;
