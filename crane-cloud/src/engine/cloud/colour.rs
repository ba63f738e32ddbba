use bevy::prelude::*;

use crate::engine::cloud::sampler::FeaturedSet;
use constants::palette::{FEATURED_COLOUR, HOVER_COLOUR, NORMAL_COLOUR};
use constants::sampling::CONVERGENCE_TOLERANCE;

/// The three colours a crane moves between.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CranePalette {
    pub normal: LinearRgba,
    pub featured: LinearRgba,
    pub hover: LinearRgba,
}

impl Default for CranePalette {
    fn default() -> Self {
        Self {
            normal: NORMAL_COLOUR,
            featured: FEATURED_COLOUR,
            hover: HOVER_COLOUR,
        }
    }
}

impl CranePalette {
    /// Colour a crane decays toward when nothing holds it.
    pub fn resting(&self, featured: bool) -> LinearRgba {
        if featured { self.featured } else { self.normal }
    }

    pub fn resting_for(&self, index: usize, featured_set: &FeaturedSet) -> LinearRgba {
        self.resting(featured_set.contains(index))
    }
}

/// Current colour of every crane, indexed like the cloud.
///
/// Pre-filled with resting colours, so an index is only ever written while it is
/// part of a hover transition. `dirty` tells the commit pass to re-upload.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColourBuffer {
    colours: Vec<LinearRgba>,
    dirty: bool,
}

impl ColourBuffer {
    pub fn from_resting(amount: usize, featured_set: &FeaturedSet, palette: &CranePalette) -> Self {
        Self {
            colours: (0..amount)
                .map(|index| palette.resting_for(index, featured_set))
                .collect(),
            dirty: true,
        }
    }

    pub fn get(&self, index: usize) -> Option<LinearRgba> {
        self.colours.get(index).copied()
    }

    pub fn as_slice(&self) -> &[LinearRgba] {
        &self.colours
    }

    /// Move `index` a fraction `rate` of the way toward `target`.
    ///
    /// Returns true once every channel is within the convergence tolerance.
    /// Out-of-range indices are ignored and report converged.
    pub fn step(&mut self, index: usize, target: LinearRgba, rate: f32) -> bool {
        let Some(current) = self.colours.get_mut(index) else {
            return true;
        };

        current.red += (target.red - current.red) * rate;
        current.green += (target.green - current.green) * rate;
        current.blue += (target.blue - current.blue) * rate;
        self.dirty = true;

        has_converged(*current, target)
    }

    /// Clears and returns the pending-upload flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

pub fn has_converged(current: LinearRgba, target: LinearRgba) -> bool {
    (target.red - current.red).abs() < CONVERGENCE_TOLERANCE
        && (target.green - current.green).abs() < CONVERGENCE_TOLERANCE
        && (target.blue - current.blue).abs() < CONVERGENCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_distances(a: LinearRgba, b: LinearRgba) -> [f32; 3] {
        [
            (a.red - b.red).abs(),
            (a.green - b.green).abs(),
            (a.blue - b.blue).abs(),
        ]
    }

    #[test]
    fn starts_at_resting_colours() {
        let palette = CranePalette::default();
        let featured = FeaturedSet::first(200, 600);
        let buffer = ColourBuffer::from_resting(600, &featured, &palette);

        let featured_count = buffer
            .as_slice()
            .iter()
            .filter(|c| **c == palette.featured)
            .count();
        let normal_count = buffer
            .as_slice()
            .iter()
            .filter(|c| **c == palette.normal)
            .count();

        assert_eq!(featured_count, 200);
        assert_eq!(normal_count, 400);
        assert_eq!(buffer.get(199), Some(palette.featured));
        assert_eq!(buffer.get(200), Some(palette.normal));
    }

    #[test]
    fn converges_monotonically_within_bound() {
        let palette = CranePalette {
            normal: LinearRgba::rgb(0.0, 0.0, 0.0),
            ..default()
        };
        let target = LinearRgba::rgb(1.0, 1.0, 1.0);
        let mut buffer = ColourBuffer::from_resting(1, &FeaturedSet::default(), &palette);

        let mut previous = channel_distances(buffer.get(0).unwrap(), target);
        let mut steps = 0;
        loop {
            steps += 1;
            let converged = buffer.step(0, target, 0.1);
            let current = channel_distances(buffer.get(0).unwrap(), target);
            for channel in 0..3 {
                assert!(current[channel] <= previous[channel]);
            }
            previous = current;
            if converged {
                break;
            }
            assert!(steps < 60, "no convergence after {steps} steps");
        }

        // ceil(ln 0.01 / ln 0.9) = 44
        assert!((43..=45).contains(&steps), "took {steps} steps");
    }

    #[test]
    fn step_moves_a_tenth_of_the_way() {
        let palette = CranePalette {
            normal: LinearRgba::rgb(0.0, 0.5, 1.0),
            ..default()
        };
        let mut buffer = ColourBuffer::from_resting(1, &FeaturedSet::default(), &palette);

        let converged = buffer.step(0, LinearRgba::rgb(1.0, 0.5, 0.0), 0.1);
        let colour = buffer.get(0).unwrap();

        assert!(!converged);
        approx::assert_relative_eq!(colour.red, 0.1, epsilon = 1e-6);
        approx::assert_relative_eq!(colour.green, 0.5, epsilon = 1e-6);
        approx::assert_relative_eq!(colour.blue, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn channels_stay_in_unit_range() {
        let palette = CranePalette::default();
        let mut buffer = ColourBuffer::from_resting(1, &FeaturedSet::default(), &palette);

        for target in [palette.hover, palette.featured, palette.normal, palette.hover] {
            for _ in 0..30 {
                buffer.step(0, target, 0.1);
                let c = buffer.get(0).unwrap();
                for channel in [c.red, c.green, c.blue] {
                    assert!((0.0..=1.0).contains(&channel));
                }
            }
        }
    }

    #[test]
    fn dirty_flag_tracks_writes() {
        let palette = CranePalette::default();
        let mut buffer = ColourBuffer::from_resting(3, &FeaturedSet::first(1, 3), &palette);

        assert!(buffer.take_dirty());
        assert!(!buffer.take_dirty());

        buffer.step(2, palette.hover, 0.1);
        assert!(buffer.take_dirty());
    }

    #[test]
    fn out_of_range_step_is_ignored() {
        let palette = CranePalette::default();
        let mut buffer = ColourBuffer::from_resting(2, &FeaturedSet::default(), &palette);
        buffer.take_dirty();

        assert!(buffer.step(7, palette.hover, 0.1));
        assert!(!buffer.take_dirty());
    }
}
