/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 55.0;

pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 1000.0;

/// Initial distance of the camera from the origin along +Z.
pub const START_DISTANCE: f32 = 20.0;

/// Orbit zoom clamp.
pub const MIN_DISTANCE: f32 = 10.0;
pub const MAX_DISTANCE: f32 = 20.0;

/// Fraction of pending orbit motion applied per frame.
pub const DAMPING_FACTOR: f32 = 0.05;

/// Scale applied per wheel line when zooming.
pub const ZOOM_BASE: f32 = 0.95;

/// Polar angle margin keeping the camera off the poles.
pub const POLAR_EPSILON: f32 = 1.0e-6;
