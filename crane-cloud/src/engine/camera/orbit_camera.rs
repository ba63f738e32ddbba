use std::f32::consts::{PI, TAU};

use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
    window::PrimaryWindow,
};

use crate::engine::assets::scene_config::{CameraConfig, SceneConfig};
use constants::camera::{POLAR_EPSILON, ZOOM_BASE};

/// Polar angle from +Y and azimuth about +Y measured from +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let ring = self.radius * self.phi.sin();
        Vec3::new(
            ring * self.theta.sin(),
            self.radius * self.phi.cos(),
            ring * self.theta.cos(),
        )
    }
}

/// Damped orbit around a fixed target with a clamped distance.
///
/// Drag input accumulates into a pending rotation that is released a fraction
/// `damping` per update, so motion eases out after the pointer stops. Zoom is
/// applied in full on the next update.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    spherical: Spherical,
    pending: Vec2,
    zoom_scale: f32,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            spherical: Spherical::from_offset(Vec3::new(0.0, 0.0, config.distance)),
            pending: Vec2::ZERO,
            zoom_scale: 1.0,
            damping: config.damping,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    /// Queue a drag of `delta` pixels; a full viewport height turns a full circle.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending.x -= TAU * delta.x / viewport_height;
        self.pending.y -= TAU * delta.y / viewport_height;
    }

    /// Positive `lines` move toward the target.
    pub fn zoom(&mut self, lines: f32) {
        self.zoom_scale *= ZOOM_BASE.powf(lines);
    }

    /// Advance one frame and return the new camera position.
    pub fn update(&mut self) -> Vec3 {
        self.spherical.theta += self.pending.x * self.damping;
        self.spherical.phi += self.pending.y * self.damping;
        self.spherical.phi = self.spherical.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        self.spherical.radius = (self.spherical.radius * self.zoom_scale)
            .clamp(self.min_distance, self.max_distance);

        self.pending *= 1.0 - self.damping;
        self.zoom_scale = 1.0;

        self.target + self.spherical.to_offset()
    }
}

/// Left drag orbits, wheel zooms.
pub fn orbit_camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        if let Ok(window) = windows.single() {
            orbit.rotate(mouse_delta, window.height());
        }
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        orbit.zoom(scroll_accum);
    }

    let position = orbit.update();
    let target = orbit.target;
    if let Ok(mut camera_transform) = camera_query.single_mut() {
        *camera_transform = Transform::from_translation(position).looking_at(target, Vec3::Y);
    }
}

pub fn perspective_from_config(config: &CameraConfig) -> Projection {
    Projection::from(PerspectiveProjection {
        fov: config.fov_degrees.to_radians(),
        near: config.near,
        far: config.far,
        ..default()
    })
}

pub fn spawn_camera(mut commands: Commands) {
    let config = CameraConfig::default();
    commands.spawn((
        Camera3d::default(),
        perspective_from_config(&config),
        Transform::from_xyz(0.0, 0.0, config.distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.insert_resource(OrbitCamera::from_config(&config));
}

/// Re-apply lens and orbit limits once the scene configuration is known.
pub fn configure_camera(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut camera_query: Query<(&mut Projection, &mut Transform), With<Camera3d>>,
) {
    let camera = &config.camera;
    if let Ok((mut projection, mut transform)) = camera_query.single_mut() {
        *projection = perspective_from_config(camera);
        *transform = Transform::from_xyz(0.0, 0.0, camera.distance).looking_at(Vec3::ZERO, Vec3::Y);
    }
    commands.insert_resource(OrbitCamera::from_config(camera));
    info!(
        "Camera configured: fov {}°, distance {} in [{}, {}]",
        camera.fov_degrees, camera.distance, camera.min_distance, camera.max_distance
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_on_positive_z() {
        let mut orbit = OrbitCamera::default();
        let position = orbit.update();

        assert_relative_eq!(position.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(position.z, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn drag_eases_out_to_full_rotation() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(100.0, 0.0), 800.0);

        let first = orbit.update();
        let after_first = orbit.spherical().theta;
        for _ in 0..600 {
            orbit.update();
        }

        let expected = -TAU * 100.0 / 800.0;
        assert_relative_eq!(after_first, expected * 0.05, epsilon = 1e-5);
        assert_relative_eq!(orbit.spherical().theta, expected, epsilon = 1e-3);
        assert_relative_eq!(first.length(), 20.0, epsilon = 1e-3);
    }

    #[test]
    fn distance_is_clamped() {
        let mut orbit = OrbitCamera::default();
        for _ in 0..100 {
            orbit.zoom(3.0);
            orbit.update();
        }
        assert_relative_eq!(orbit.distance(), 10.0);

        for _ in 0..100 {
            orbit.zoom(-3.0);
            orbit.update();
        }
        assert_relative_eq!(orbit.distance(), 20.0);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        for _ in 0..200 {
            let position = orbit.update();
            assert!(position.is_finite());
        }
        let phi = orbit.spherical().phi;
        assert!(phi >= POLAR_EPSILON && phi <= PI - POLAR_EPSILON);
    }

    #[test]
    fn spherical_round_trips_offsets() {
        let offset = Vec3::new(3.0, -4.0, 12.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-4);
    }
}
