//! Per-frame hover update: pointer ray, hit test, colour transitions.

use bevy::prelude::*;

use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::cloud::colour::{ColourBuffer, CranePalette};
use crate::engine::cloud::hover::{ColourTargets, HoverMachine, HoverStep};
use crate::engine::cloud::picking::{PickSettings, nearest_hit};
use crate::engine::cloud::sampler::FeaturedSet;
use crate::engine::scene::crane_cloud::{CraneCloud, CranePositions};
use crate::engine::systems::pointer::{HoverChanged, PointerState, ndc_to_viewport};

/// Hit test one ray against the cloud and feed the result to the hover machine.
pub fn pick_and_advance(
    ray: Option<Ray3d>,
    positions: &[Vec3],
    cloud_transform: &GlobalTransform,
    settings: PickSettings,
    hover: &mut HoverMachine,
    targets: &mut ColourTargets,
) -> HoverStep {
    let hit = ray
        .and_then(|ray| nearest_hit(ray, positions, cloud_transform, settings))
        .map(|hit| hit.index);

    hover.settle_fading(hit, targets);
    hover.advance(hit, targets)
}

/// Picking ignores the camera clip planes: any crane in front of the pointer counts.
pub fn hover_pick_settings(config: &SceneConfig) -> PickSettings {
    PickSettings {
        threshold: config.pick_threshold,
        near: 0.0,
        far: f32::INFINITY,
    }
}

pub fn update_hover(
    config: Res<SceneConfig>,
    pointer: Res<PointerState>,
    positions: Res<CranePositions>,
    featured: Res<FeaturedSet>,
    palette: Res<CranePalette>,
    mut colours: ResMut<ColourBuffer>,
    mut hover: ResMut<HoverMachine>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    cloud_query: Query<&GlobalTransform, With<CraneCloud>>,
    mut hover_changed: EventWriter<HoverChanged>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(cloud_transform) = cloud_query.single() else {
        return;
    };

    let ray = pointer.ndc.and_then(|ndc| {
        camera
            .viewport_to_world(camera_transform, ndc_to_viewport(ndc, pointer.viewport_size))
            .ok()
    });

    let settings = hover_pick_settings(&config);
    let mut targets = ColourTargets {
        colours: &mut colours,
        featured: &featured,
        palette: &palette,
        rate: config.colour_rate,
    };

    let before = hover.hovered();
    pick_and_advance(
        ray,
        &positions.0,
        cloud_transform,
        settings,
        &mut hover,
        &mut targets,
    );

    let after = hover.hovered();
    if before != after {
        hover_changed.write(HoverChanged { index: after });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: PickSettings = PickSettings {
        threshold: 1.0,
        near: 1.0,
        far: 1000.0,
    };

    #[test]
    fn ray_through_a_crane_focuses_it() {
        let positions = [Vec3::new(0.0, 0.0, 8.0), Vec3::new(3.0, 0.0, 0.0)];
        let featured = FeaturedSet::first(1, positions.len());
        let palette = CranePalette::default();
        let mut colours = ColourBuffer::from_resting(positions.len(), &featured, &palette);
        let mut hover = HoverMachine::default();
        let mut targets = ColourTargets {
            colours: &mut colours,
            featured: &featured,
            palette: &palette,
            rate: 0.1,
        };

        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 20.0), Dir3::NEG_Z);
        let step = pick_and_advance(
            Some(ray),
            &positions,
            &GlobalTransform::IDENTITY,
            SETTINGS,
            &mut hover,
            &mut targets,
        );

        assert_eq!(step.toward_hover, Some(0));
        assert_eq!(hover.hovered(), Some(0));
    }

    #[test]
    fn hover_picks_past_the_camera_clip_planes() {
        let config = SceneConfig::default();
        let settings = hover_pick_settings(&config);
        let positions = [Vec3::new(0.0, 0.0, 19.5)];
        let origin = Vec3::new(0.0, 0.0, 20.0);
        assert!(origin.z - positions[0].z < config.camera.near);

        let ray = Ray3d::new(origin, Dir3::NEG_Z);
        let hit = nearest_hit(ray, &positions, &GlobalTransform::IDENTITY, settings);
        assert_eq!(hit.map(|hit| hit.index), Some(0));

        let far_away = [Vec3::new(0.0, 0.0, 20.0 - config.camera.far * 2.0)];
        let hit = nearest_hit(ray, &far_away, &GlobalTransform::IDENTITY, settings);
        assert_eq!(hit.map(|hit| hit.index), Some(0));
    }

    #[test]
    fn no_pointer_means_no_hit() {
        let positions = [Vec3::ZERO];
        let featured = FeaturedSet::default();
        let palette = CranePalette::default();
        let mut colours = ColourBuffer::from_resting(1, &featured, &palette);
        let mut hover = HoverMachine::default();
        let mut targets = ColourTargets {
            colours: &mut colours,
            featured: &featured,
            palette: &palette,
            rate: 0.1,
        };

        let step = pick_and_advance(
            None,
            &positions,
            &GlobalTransform::IDENTITY,
            SETTINGS,
            &mut hover,
            &mut targets,
        );

        assert_eq!(step, HoverStep::default());
        assert_eq!(hover.hovered(), None);
    }
}
