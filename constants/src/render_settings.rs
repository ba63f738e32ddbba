/// Edge length of a crane sprite quad in world units.
pub const CRANE_SPRITE_SIZE: f32 = 1.85;

/// Sprite texels with alpha below this are discarded.
pub const ALPHA_MASK_CUTOFF: f32 = 0.5;

/// Interval between FPS notifications to the host page, in seconds.
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;
