use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;

use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::cloud::colour::{ColourBuffer, CranePalette};
use crate::engine::cloud::hover::HoverMachine;
use crate::engine::cloud::sampler::{SamplerSettings, generate};
use crate::engine::core::app_setup::SceneRng;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::sprite_loader::SpriteAssets;
use crate::engine::mesh::billboard_mesh::{
    create_billboard_mesh, write_billboard_colours, write_billboard_positions,
};
use constants::render_settings::ALPHA_MASK_CUTOFF;

#[derive(Component)]
pub struct CraneCloud;

/// Crane positions in cloud space, cached for billboarding and picking.
#[derive(Resource, Debug, Clone, Default)]
pub struct CranePositions(pub Vec<Vec3>);

/// Sample the cloud and spawn its mesh once the sprite is ready.
pub fn create_crane_cloud(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    config: Res<SceneConfig>,
    palette: Res<CranePalette>,
    sprite_assets: Res<SpriteAssets>,
    mut rng: ResMut<SceneRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cloud = generate(&SamplerSettings::from(&*config), &mut rng.0);
    let featured = cloud.featured_set();
    let colours = ColourBuffer::from_resting(cloud.len(), &featured, &palette);
    let positions = cloud.positions();

    let mut mesh = create_billboard_mesh(colours.as_slice());
    write_billboard_positions(&mut mesh, &positions, Vec3::X, Vec3::Y, config.sprite.size);

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(sprite_assets.texture.clone()),
        alpha_mode: AlphaMode::Mask(ALPHA_MASK_CUTOFF),
        unlit: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        CraneCloud,
        // Quads are rewritten every frame, so the cached bounds go stale.
        NoFrustumCulling,
    ));

    println!(
        "Crane cloud spawned: {} cranes, {} featured, {} placed past the attempt budget",
        cloud.len(),
        featured.len(),
        cloud.exhausted.len()
    );

    commands.insert_resource(CranePositions(positions));
    commands.insert_resource(featured);
    commands.insert_resource(colours);
    commands.insert_resource(HoverMachine::default());
    commands.insert_resource(cloud);
    loading_progress.cloud_built = true;
}

/// Turn every crane quad toward the camera.
///
/// The camera basis is taken into cloud space so the quads stay screen-aligned
/// while the cloud rotates. Reads local transforms, which are also world
/// transforms here, so this frame's orbit and spin are already included.
pub fn billboard_cranes(
    config: Res<SceneConfig>,
    positions: Res<CranePositions>,
    camera_query: Query<&Transform, With<Camera3d>>,
    cloud_query: Query<(&Mesh3d, &Transform), With<CraneCloud>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera_transform) = camera_query.single() else {
        return;
    };
    let Ok((mesh_handle, cloud_transform)) = cloud_query.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };

    let cloud_rotation = cloud_transform.rotation.inverse();
    let right = cloud_rotation * camera_transform.right().as_vec3();
    let up = cloud_rotation * camera_transform.up().as_vec3();
    write_billboard_positions(mesh, &positions.0, right, up, config.sprite.size);
}

/// Upload colours written by the hover transitions this frame.
pub fn commit_colours(
    mut colours: ResMut<ColourBuffer>,
    cloud_query: Query<&Mesh3d, With<CraneCloud>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(mesh_handle) = cloud_query.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };
    if colours.take_dirty() {
        write_billboard_colours(mesh, colours.as_slice());
    }
}

/// Slow spin about +Y, a fixed angle per frame.
pub fn rotate_cloud(
    config: Res<SceneConfig>,
    mut cloud_query: Query<&mut Transform, With<CraneCloud>>,
) {
    for mut transform in &mut cloud_query {
        transform.rotate_y(config.rotation_speed);
    }
}
