//! Drifting particle field behind the crane cloud.
use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use rand::Rng;

use crate::engine::assets::scene_config::{BackgroundConfig, SceneConfig};
use crate::engine::core::app_setup::SceneRng;
use crate::engine::mesh::billboard_mesh::{create_billboard_mesh, write_billboard_positions};
use constants::palette::BACKGROUND_PARTICLE_COLOUR;

#[derive(Component)]
pub struct BackgroundParticles;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundParticle {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BackgroundField {
    particles: Vec<BackgroundParticle>,
    radius: f32,
    velocity_span: f32,
    size: f32,
}

impl BackgroundField {
    pub fn new<R: Rng + ?Sized>(config: &BackgroundConfig, rng: &mut R) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(config.count),
            radius: config.radius,
            velocity_span: config.velocity_span,
            size: config.size,
        };
        for _ in 0..config.count {
            let particle = field.spawn_particle(rng);
            field.particles.push(particle);
        }
        field
    }

    pub fn particles(&self) -> &[BackgroundParticle] {
        &self.particles
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Advance every particle by its velocity, respawning escapees inside the
    /// sphere with a fresh velocity. Returns the number respawned.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let radius_sq = self.radius * self.radius;
        let mut respawned = 0;

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.position += particle.velocity;
            if particle.position.length_squared() > radius_sq {
                let fresh = self.spawn_particle(rng);
                self.particles[i] = fresh;
                respawned += 1;
            }
        }

        respawned
    }

    fn spawn_particle<R: Rng + ?Sized>(&self, rng: &mut R) -> BackgroundParticle {
        BackgroundParticle {
            position: random_point_in_sphere(rng, self.radius),
            velocity: random_velocity(rng, self.velocity_span),
        }
    }
}

/// Radius is uniform rather than cube-root weighted, so the field thickens
/// toward the centre.
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta: f32 = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(-1.0_f32..1.0).acos();
    let r = rng.gen_range(0.0..1.0_f32) * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

fn random_velocity<R: Rng + ?Sized>(rng: &mut R, span: f32) -> Vec3 {
    let mut axis = || (rng.gen_range(0.0..1.0_f32) - 0.5) * span;
    Vec3::new(axis(), axis(), axis())
}

/// Build the field and its mesh once the configuration is settled.
pub fn spawn_background_field(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut rng: ResMut<SceneRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let field = BackgroundField::new(&config.background, &mut rng.0);

    let material = materials.add(StandardMaterial {
        base_color: BACKGROUND_PARTICLE_COLOUR.with_alpha(config.background.opacity),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        cull_mode: None,
        ..default()
    });

    let colours = vec![LinearRgba::WHITE; field.particles().len()];
    let mut mesh = create_billboard_mesh(&colours);
    write_billboard_positions(&mut mesh, &field.positions(), Vec3::X, Vec3::Y, field.size);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        BackgroundParticles,
        NoFrustumCulling,
    ));

    info!(
        "Background field spawned: {} particles within radius {}",
        field.particles().len(),
        field.radius()
    );
    commands.insert_resource(field);
}

pub fn drift_background_field(mut field: ResMut<BackgroundField>, mut rng: ResMut<SceneRng>) {
    let respawned = field.update(&mut rng.0);
    if respawned > 0 {
        debug!("{} background particles respawned", respawned);
    }
}

/// Rewrite particle quads from the current field and camera basis.
pub fn billboard_background_field(
    field: Res<BackgroundField>,
    camera_query: Query<&Transform, With<Camera3d>>,
    particle_query: Query<&Mesh3d, With<BackgroundParticles>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera_transform) = camera_query.single() else {
        return;
    };
    let Ok(mesh_handle) = particle_query.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };

    let right = camera_transform.right().as_vec3();
    let up = camera_transform.up().as_vec3();
    write_billboard_positions(mesh, &field.positions(), right, up, field.size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(count: usize) -> BackgroundConfig {
        BackgroundConfig {
            count,
            ..default()
        }
    }

    #[test]
    fn particles_start_inside_the_sphere() {
        let mut rng = StdRng::seed_from_u64(21);
        let field = BackgroundField::new(&config(1000), &mut rng);

        assert_eq!(field.particles().len(), 1000);
        for particle in field.particles() {
            assert!(particle.position.length() <= 60.0 + 1e-3);
            for axis in particle.velocity.to_array() {
                assert!(axis.abs() <= 0.005);
            }
        }
    }

    #[test]
    fn particles_stay_inside_after_updates() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = BackgroundField::new(&config(500), &mut rng);

        for _ in 0..200 {
            field.update(&mut rng);
            for particle in field.particles() {
                assert!(particle.position.length() <= field.radius() + 1e-3);
            }
        }
    }

    #[test]
    fn escaped_particle_is_respawned() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut field = BackgroundField::new(&config(1), &mut rng);
        field.particles[0] = BackgroundParticle {
            position: Vec3::new(59.999, 0.0, 0.0),
            velocity: Vec3::new(0.5, 0.0, 0.0),
        };

        assert_eq!(field.update(&mut rng), 1);
        assert!(field.particles()[0].position.length() <= 60.0 + 1e-3);
        assert_ne!(field.particles()[0].velocity, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn drifting_particle_keeps_its_velocity() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut field = BackgroundField::new(&config(1), &mut rng);
        let velocity = Vec3::new(0.002, -0.001, 0.004);
        field.particles[0] = BackgroundParticle {
            position: Vec3::ZERO,
            velocity,
        };

        assert_eq!(field.update(&mut rng), 0);
        assert_eq!(field.particles()[0].position, velocity);
        assert_eq!(field.particles()[0].velocity, velocity);
    }
}
