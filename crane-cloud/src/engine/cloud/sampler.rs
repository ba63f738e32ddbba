//! Crane placement by rejection sampling on a thick spherical shell.
//!
//! Each candidate lies on an annulus in the XY plane and is then rotated so the
//! annulus normal points along a uniformly random direction. A candidate closer
//! than `min_distance` to any accepted crane is rejected. The neighbour check is
//! a linear scan over accepted cranes.

use std::f32::consts::TAU;
use std::ops::Range;

use bevy::prelude::*;
use rand::Rng;

use crate::engine::assets::scene_config::SceneConfig;

/// Inputs of one sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerSettings {
    pub count: usize,
    pub featured_count: usize,
    pub min_distance: f32,
    pub inner_radius: f32,
    pub thickness: f32,
    pub max_attempts: u32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::from(&SceneConfig::default())
    }
}

impl From<&SceneConfig> for SamplerSettings {
    fn from(config: &SceneConfig) -> Self {
        Self {
            count: config.amount,
            featured_count: config.featured_count,
            min_distance: config.min_distance,
            inner_radius: config.shell_inner_radius,
            thickness: config.shell_thickness,
            max_attempts: config.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CranePoint {
    pub index: usize,
    pub position: Vec3,
    pub featured: bool,
}

/// Result of a sampling run.
///
/// `exhausted` lists, in creation order, the cranes that were accepted after the
/// attempt budget ran out and may sit closer than `min_distance` to a neighbour.
#[derive(Resource, Debug, Clone, Default)]
pub struct SampledCloud {
    pub points: Vec<CranePoint>,
    pub exhausted: Vec<usize>,
}

impl SampledCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|point| point.position).collect()
    }

    pub fn featured_set(&self) -> FeaturedSet {
        let featured = self.points.iter().take_while(|point| point.featured).count();
        FeaturedSet::first(featured, self.points.len())
    }
}

/// Indices eligible for click activation, fixed at startup.
///
/// Featured cranes are always the first ones created, so the set is a prefix
/// `[0, len)` of the cloud.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeaturedSet {
    len: usize,
}

impl FeaturedSet {
    /// The first `featured_count` of `amount` cranes.
    pub fn first(featured_count: usize, amount: usize) -> Self {
        Self {
            len: featured_count.min(amount),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn indices(&self) -> Range<usize> {
        0..self.len
    }
}

/// Place `settings.count` cranes.
///
/// Never loops unboundedly: each crane gets at most `max_attempts` candidates,
/// after which the last candidate is kept and reported in `exhausted`.
pub fn generate<R: Rng + ?Sized>(settings: &SamplerSettings, rng: &mut R) -> SampledCloud {
    let mut points: Vec<CranePoint> = Vec::with_capacity(settings.count);
    let mut exhausted = Vec::new();
    let max_attempts = settings.max_attempts.max(1);

    for index in 0..settings.count {
        let mut attempts = 0;
        let position = loop {
            let candidate = sample_candidate(rng, settings.inner_radius, settings.thickness);
            attempts += 1;

            if is_far_enough(candidate, &points, settings.min_distance) {
                break candidate;
            }
            if attempts >= max_attempts {
                warn!(
                    "Crane {} kept after {} attempts without clearing min distance {}",
                    index, attempts, settings.min_distance
                );
                exhausted.push(index);
                break candidate;
            }
        };

        points.push(CranePoint {
            index,
            position,
            featured: index < settings.featured_count,
        });
    }

    if !exhausted.is_empty() {
        warn!(
            "{} of {} cranes exhausted their placement budget",
            exhausted.len(),
            settings.count
        );
    }

    SampledCloud { points, exhausted }
}

/// Uniformly distributed unit vector.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..1.0);
    let angle: f32 = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * angle.cos(), ring * angle.sin(), z)
}

/// A point on the annulus `[inner, inner + thickness)` tilted to a random normal.
fn sample_candidate<R: Rng + ?Sized>(rng: &mut R, inner_radius: f32, thickness: f32) -> Vec3 {
    let angle: f32 = rng.gen_range(0.0..TAU);
    let radius = inner_radius + thickness * rng.gen_range(0.0..1.0_f32);
    let flat = Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);

    let normal = random_direction(rng);
    Quat::from_rotation_arc(Vec3::Z, normal) * flat
}

fn is_far_enough(candidate: Vec3, accepted: &[CranePoint], min_distance: f32) -> bool {
    let min_distance_sq = min_distance * min_distance;
    accepted
        .iter()
        .all(|point| point.position.distance_squared(candidate) >= min_distance_sq)
}
