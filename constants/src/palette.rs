use bevy::prelude::*;

/// Resting colour of ordinary cranes (linear RGB).
pub const NORMAL_COLOUR: LinearRgba = LinearRgba::rgb(146.0 / 255.0, 159.0 / 255.0, 229.0 / 255.0);

/// Resting colour of cranes in the featured set.
pub const FEATURED_COLOUR: LinearRgba = LinearRgba::rgb(0.49, 0.18, 0.25);

/// Colour a crane fades toward while the pointer is over it.
pub const HOVER_COLOUR: LinearRgba = LinearRgba::rgb(1.0, 0.5, 0.0);

/// Viewport clear colour, `#232121`.
pub const CLEAR_COLOUR: Color = Color::srgb(35.0 / 255.0, 33.0 / 255.0, 33.0 / 255.0);

/// Background star colour, `#88ccff`.
pub const BACKGROUND_PARTICLE_COLOUR: Color = Color::srgb(136.0 / 255.0, 204.0 / 255.0, 1.0);
