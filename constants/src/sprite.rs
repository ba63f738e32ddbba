/// Default edge length of the rasterised crane sprite, in pixels.
pub const SPRITE_RESOLUTION: u32 = 256;

/// Largest sprite edge accepted from configuration.
pub const MAX_SPRITE_RESOLUTION: u32 = 4096;

/// Fill colour of the crane outline, `#929FE5`.
pub const SPRITE_FILL: [u8; 4] = [0x92, 0x9f, 0xe5, 0xff];

/// Side view of the crane, drawn in a 114x114 view box.
pub const CRANE_SIDE_VIEW_BOX: f32 = 114.0;
pub const CRANE_SIDE_PATH: &str = "M65.2144 66.2889L52.7884 39.4239L88.8556 20.3532L65.2144 66.2889ZM22.4622 37.7277L24.4573 44.2193L13.9619 49.3335L22.4622 37.7277ZM81.9745 36.4388L92.1353 36.1612L71.7556 56.3097L81.9745 36.4399V36.4388ZM44.1919 52.4389L34.1082 71.3619L23.8303 37.925L44.1919 52.4389ZM71.6628 83.2601L34.8661 72.5853L51.9408 40.5618L71.6628 83.259V83.2601ZM75.506 76L99.5484 80.5441L89.4636 85.1527L75.506 76ZM68.1646 72.6676L100.086 93.6172L73.2904 83.7488L68.1689 72.676L68.1646 72.6676Z";

/// Mirrored view of the crane, drawn in a 142x142 view box.
pub const CRANE_MIRRORED_VIEW_BOX: f32 = 142.0;
pub const CRANE_MIRRORED_PATH: &str = "M60.7681 82.5703L76.2461 49.107L31.3202 25.3522L60.7681 82.5703ZM114.021 46.9941L111.536 55.0802L124.609 61.4505L114.021 46.9941ZM39.8915 45.3887L27.2351 45.0429L52.6202 70.1401L39.8915 45.39V45.3887ZM86.954 65.3187L99.5144 88.8893L112.317 47.24L86.954 65.3187ZM52.7359 103.71L98.5704 90.4132L77.3019 50.5244L52.7359 103.709V103.71ZM47.9487 94.6666L18.0011 100.327L30.5629 106.067L47.9487 94.6666ZM57.0932 90.5158L17.3319 116.611L50.7085 104.319L57.088 90.5263L57.0932 90.5158Z";
