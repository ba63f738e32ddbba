//! Built-in crane sprite: outline path data rasterised into a texture.
//!
//! The outlines only use absolute and relative `M`, `L`, `H`, `V` and `Z`
//! commands, so the parser stops there rather than pulling in a full vector
//! graphics stack.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::Rng;

use crate::engine::error::SpriteError;
use constants::sprite::{
    CRANE_MIRRORED_PATH, CRANE_MIRRORED_VIEW_BOX, CRANE_SIDE_PATH, CRANE_SIDE_VIEW_BOX,
    MAX_SPRITE_RESOLUTION, SPRITE_FILL,
};

/// Which of the two crane drawings a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraneVariant {
    Side,
    Mirrored,
}

impl CraneVariant {
    /// Either drawing with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            CraneVariant::Side
        } else {
            CraneVariant::Mirrored
        }
    }

    pub fn path_data(self) -> &'static str {
        match self {
            CraneVariant::Side => CRANE_SIDE_PATH,
            CraneVariant::Mirrored => CRANE_MIRRORED_PATH,
        }
    }

    pub fn view_box(self) -> f32 {
        match self {
            CraneVariant::Side => CRANE_SIDE_VIEW_BOX,
            CraneVariant::Mirrored => CRANE_MIRRORED_VIEW_BOX,
        }
    }
}

/// Closed polygons in view box coordinates (y down).
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub view_box: f32,
    pub polygons: Vec<Vec<Vec2>>,
}

impl Outline {
    pub fn crane(variant: CraneVariant) -> Result<Self, SpriteError> {
        Ok(Self {
            view_box: variant.view_box(),
            polygons: parse_path(variant.path_data())?,
        })
    }

    /// Even-odd test per polygon, union across polygons.
    pub fn contains(&self, point: Vec2) -> bool {
        self.polygons
            .iter()
            .any(|polygon| polygon_contains(polygon, point))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f32),
}

fn tokenize(data: &str) -> Result<Vec<Token>, SpriteError> {
    let mut tokens = Vec::new();
    let mut chars = data.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
        } else if c.is_ascii_alphabetic() {
            if !"MmLlHhVvZz".contains(c) {
                return Err(SpriteError::UnexpectedCharacter(c));
            }
            tokens.push(Token::Command(c));
            chars.next();
        } else if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() {
            let mut end = start + c.len_utf8();
            let mut seen_dot = c == '.';
            chars.next();
            while let Some(&(index, next)) = chars.peek() {
                if next.is_ascii_digit() || (next == '.' && !seen_dot) {
                    seen_dot |= next == '.';
                    end = index + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &data[start..end];
            let value = text
                .parse::<f32>()
                .map_err(|_| SpriteError::InvalidNumber(text.to_string()))?;
            tokens.push(Token::Number(value));
        } else {
            return Err(SpriteError::UnexpectedCharacter(c));
        }
    }

    Ok(tokens)
}

/// Parse path data into closed polygons.
///
/// Subpaths are closed implicitly when a new `M` starts or the data ends.
pub fn parse_path(data: &str) -> Result<Vec<Vec<Vec2>>, SpriteError> {
    let tokens = tokenize(data)?;
    let mut polygons = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut cursor = Vec2::ZERO;
    let mut subpath_start = Vec2::ZERO;
    let mut command: Option<char> = None;
    let mut index = 0;

    let next_number = |index: &mut usize, command: char| -> Result<f32, SpriteError> {
        match tokens.get(*index) {
            Some(Token::Number(value)) => {
                *index += 1;
                Ok(*value)
            }
            _ => Err(SpriteError::MissingOperands { command }),
        }
    };

    while index < tokens.len() {
        let active = match tokens[index] {
            Token::Command(c) => {
                index += 1;
                c
            }
            // Bare numbers repeat the previous command, `M` repeats as `L`.
            Token::Number(_) => match command {
                Some('M') => 'L',
                Some('m') => 'l',
                Some(c) if !c.eq_ignore_ascii_case(&'z') => c,
                _ => return Err(SpriteError::DanglingNumber),
            },
        };

        if command.is_none() && !active.eq_ignore_ascii_case(&'m') {
            return Err(SpriteError::MissingMoveTo(active));
        }

        match active {
            'M' | 'm' => {
                flush_polygon(&mut current, &mut polygons);
                let x = next_number(&mut index, active)?;
                let y = next_number(&mut index, active)?;
                cursor = if active == 'm' {
                    cursor + Vec2::new(x, y)
                } else {
                    Vec2::new(x, y)
                };
                subpath_start = cursor;
                current.push(cursor);
            }
            'L' | 'l' => {
                reopen_subpath(&mut current, cursor);
                let x = next_number(&mut index, active)?;
                let y = next_number(&mut index, active)?;
                cursor = if active == 'l' {
                    cursor + Vec2::new(x, y)
                } else {
                    Vec2::new(x, y)
                };
                current.push(cursor);
            }
            'H' | 'h' => {
                reopen_subpath(&mut current, cursor);
                let x = next_number(&mut index, active)?;
                cursor.x = if active == 'h' { cursor.x + x } else { x };
                current.push(cursor);
            }
            'V' | 'v' => {
                reopen_subpath(&mut current, cursor);
                let y = next_number(&mut index, active)?;
                cursor.y = if active == 'v' { cursor.y + y } else { y };
                current.push(cursor);
            }
            _ => {
                flush_polygon(&mut current, &mut polygons);
                cursor = subpath_start;
            }
        }

        command = Some(active);
    }

    flush_polygon(&mut current, &mut polygons);

    if polygons.is_empty() {
        return Err(SpriteError::Empty);
    }
    Ok(polygons)
}

/// Drawing after `Z` without a new `M` continues from the subpath start.
fn reopen_subpath(current: &mut Vec<Vec2>, cursor: Vec2) {
    if current.is_empty() {
        current.push(cursor);
    }
}

fn flush_polygon(current: &mut Vec<Vec2>, polygons: &mut Vec<Vec<Vec2>>) {
    let polygon = std::mem::take(current);
    if polygon.len() >= 3 {
        polygons.push(polygon);
    }
}

fn polygon_contains(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let mut previous = polygon[polygon.len() - 1];
    for &vertex in polygon {
        if (vertex.y > point.y) != (previous.y > point.y) {
            let crossing_x =
                (previous.x - vertex.x) * (point.y - vertex.y) / (previous.y - vertex.y) + vertex.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        previous = vertex;
    }
    inside
}

/// Rasterise an outline into straight RGBA8 pixels with 2x2 coverage sampling.
pub fn rasterise(outline: &Outline, resolution: u32, fill: [u8; 4]) -> Result<Vec<u8>, SpriteError> {
    if resolution == 0 {
        return Err(SpriteError::ZeroResolution);
    }
    if resolution > MAX_SPRITE_RESOLUTION {
        return Err(SpriteError::ResolutionTooLarge {
            resolution,
            max: MAX_SPRITE_RESOLUTION,
        });
    }

    const SAMPLE_OFFSETS: [Vec2; 4] = [
        Vec2::new(0.25, 0.25),
        Vec2::new(0.75, 0.25),
        Vec2::new(0.25, 0.75),
        Vec2::new(0.75, 0.75),
    ];

    let scale = outline.view_box / resolution as f32;
    let edge = resolution as usize;
    let mut pixels = vec![0u8; edge * edge * 4];

    for y in 0..edge {
        for x in 0..edge {
            let covered = SAMPLE_OFFSETS
                .iter()
                .filter(|offset| {
                    let sample = (Vec2::new(x as f32, y as f32) + **offset) * scale;
                    outline.contains(sample)
                })
                .count();

            if covered == 0 {
                continue;
            }

            let offset = (y * edge + x) * 4;
            pixels[offset..offset + 3].copy_from_slice(&fill[..3]);
            pixels[offset + 3] = (fill[3] as usize * covered / SAMPLE_OFFSETS.len()) as u8;
        }
    }

    Ok(pixels)
}

/// Build the crane sprite texture for a variant.
///
/// Texel values are used as-is (no sRGB decode), so lit texels carry the fill
/// colour unchanged.
pub fn crane_sprite_image(variant: CraneVariant, resolution: u32) -> Result<Image, SpriteError> {
    let outline = Outline::crane(variant)?;
    let pixels = rasterise(&outline, resolution, SPRITE_FILL)?;

    let mut image = Image::new(
        Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::RENDER_WORLD,
    );
    configure_sprite_sampler(&mut image);
    Ok(image)
}

/// Nearest magnification keeps the paper folds crisp up close.
pub fn configure_sprite_sampler(image: &mut Image) {
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Linear,
        ..default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_both_crane_outlines() {
        let side = Outline::crane(CraneVariant::Side).unwrap();
        let mirrored = Outline::crane(CraneVariant::Mirrored).unwrap();

        assert_eq!(side.polygons.len(), 7);
        assert_eq!(mirrored.polygons.len(), 7);
        assert_eq!(side.polygons[0][0], Vec2::new(65.2144, 66.2889));
    }

    #[test]
    fn vertical_lineto_keeps_x() {
        let polygons = parse_path("M0 0L10 0L10 10V20Z").unwrap();
        assert_eq!(polygons[0][3], Vec2::new(10.0, 20.0));
    }

    #[test]
    fn relative_commands_accumulate() {
        let polygons = parse_path("m1 1 l4 0 0 4 h-4z").unwrap();
        assert_eq!(
            polygons[0],
            vec![
                Vec2::new(1.0, 1.0),
                Vec2::new(5.0, 1.0),
                Vec2::new(5.0, 5.0),
                Vec2::new(1.0, 5.0),
            ]
        );
    }

    #[test]
    fn rejects_unsupported_commands() {
        assert_eq!(
            parse_path("M0 0C1 1 2 2 3 3Z"),
            Err(SpriteError::UnexpectedCharacter('C'))
        );
    }

    #[test]
    fn rejects_truncated_operands() {
        assert_eq!(
            parse_path("M0 0L10"),
            Err(SpriteError::MissingOperands { command: 'L' })
        );
    }

    #[test]
    fn rejects_path_without_shapes() {
        assert_eq!(parse_path("M0 0L1 1Z"), Err(SpriteError::Empty));
    }

    #[test]
    fn square_outline_fills_interior_only() {
        let outline = Outline {
            view_box: 4.0,
            polygons: parse_path("M1 1H3V3H1Z").unwrap(),
        };
        let pixels = rasterise(&outline, 4, [10, 20, 30, 255]).unwrap();
        let alpha = |x: usize, y: usize| pixels[(y * 4 + x) * 4 + 3];

        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(1, 1), 255);
        assert_eq!(alpha(2, 2), 255);
        assert_eq!(alpha(3, 3), 0);
        assert_eq!(&pixels[(4 + 1) * 4..(4 + 1) * 4 + 3], &[10, 20, 30]);
    }

    #[test]
    fn crane_sprite_has_opaque_and_clear_texels() {
        let image = crane_sprite_image(CraneVariant::Side, 64).unwrap();
        let data = image.data.as_ref().unwrap();
        let alphas: Vec<u8> = data.chunks_exact(4).map(|texel| texel[3]).collect();

        assert_eq!(alphas.len(), 64 * 64);
        assert!(alphas.iter().any(|&a| a == 255));
        assert!(alphas.iter().any(|&a| a == 0));
    }

    #[test]
    fn zero_resolution_is_an_error() {
        let outline = Outline::crane(CraneVariant::Mirrored).unwrap();
        assert_eq!(
            rasterise(&outline, 0, SPRITE_FILL),
            Err(SpriteError::ZeroResolution)
        );
    }

    #[test]
    fn oversized_resolution_is_an_error() {
        let outline = Outline::crane(CraneVariant::Side).unwrap();
        assert_eq!(
            rasterise(&outline, 32768, SPRITE_FILL),
            Err(SpriteError::ResolutionTooLarge {
                resolution: 32768,
                max: MAX_SPRITE_RESOLUTION,
            })
        );
    }

    #[test]
    fn random_variant_is_reproducible() {
        let a = CraneVariant::random(&mut StdRng::seed_from_u64(3));
        let b = CraneVariant::random(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
