use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Crate engine modules
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::camera::orbit_camera::{configure_camera, orbit_camera_controller, spawn_camera};
use crate::engine::cloud::colour::CranePalette;
use crate::engine::core::app_state::{
    AppState, transition_to_building_cloud, transition_to_loading_sprite,
    transition_to_running, update_loading_frontend,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{
    ConfigLoader, check_config_loading, start_config_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::sprite_loader::{
    SpriteAssets, check_sprite_loading, start_sprite_loading,
};
use crate::engine::scene::background::{
    billboard_background_field, drift_background_field, spawn_background_field,
};
use crate::engine::scene::crane_cloud::{
    billboard_cranes, commit_colours, create_crane_cloud, rotate_cloud,
};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::frame::update_hover;
use crate::engine::systems::notifications::{forward_activations, forward_hover_changes};
use crate::engine::systems::pointer::{
    FeaturedPointActivated, HoverChanged, PointerState, handle_click, handle_window_resize,
    track_pointer,
};
use crate::rpc::web_rpc::WebRpcPlugin;
use constants::palette::CLEAR_COLOUR;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

const LOG_FILTER: &str = "wgpu=error,naga=warn,crane_cloud=info";

/// Session random source for sampling, sprite choice and the background field.
#[derive(Resource)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    /// Seeded for reproducible layouts, entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Stages of the running frame, executed in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStep {
    Field,
    Hover,
    Activation,
    Commit,
    Spin,
    Orbit,
    Billboard,
    Report,
}

impl FrameStep {
    pub const ORDER: [FrameStep; 8] = [
        FrameStep::Field,
        FrameStep::Hover,
        FrameStep::Activation,
        FrameStep::Commit,
        FrameStep::Spin,
        FrameStep::Orbit,
        FrameStep::Billboard,
        FrameStep::Report,
    ];
}

pub fn configure_frame_steps(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameStep::Field,
            FrameStep::Hover,
            FrameStep::Activation,
            FrameStep::Commit,
            FrameStep::Spin,
            FrameStep::Orbit,
            FrameStep::Billboard,
            FrameStep::Report,
        )
            .chain(),
    );
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SceneConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SceneConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(CLEAR_COLOUR));

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<SpriteAssets>()
        .init_resource::<PointerState>()
        .init_resource::<CranePalette>()
        .add_event::<FeaturedPointActivated>()
        .add_event::<HoverChanged>();

    // State-based system scheduling
    app.add_systems(Startup, (spawn_camera, start_config_loading))
        .add_systems(
            Update,
            (check_config_loading, transition_to_loading_sprite)
                .chain()
                .run_if(in_state(AppState::LoadingConfig)),
        )
        .add_systems(
            OnEnter(AppState::LoadingSprite),
            (configure_camera, spawn_background_field, start_sprite_loading).chain(),
        )
        .add_systems(
            Update,
            (check_sprite_loading, transition_to_building_cloud)
                .chain()
                .run_if(in_state(AppState::LoadingSprite)),
        )
        .add_systems(OnEnter(AppState::BuildingCloud), create_crane_cloud)
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::BuildingCloud)),
        );

    // Input bookkeeping runs from the first frame so the pointer is known on entry.
    app.add_systems(
        Update,
        (handle_window_resize, track_pointer, update_loading_frontend),
    );

    configure_frame_steps(&mut app);
    let runtime_systems = (
        drift_background_field.in_set(FrameStep::Field),
        update_hover.in_set(FrameStep::Hover),
        handle_click.in_set(FrameStep::Activation),
        commit_colours.in_set(FrameStep::Commit),
        rotate_cloud.in_set(FrameStep::Spin),
        orbit_camera_controller.in_set(FrameStep::Orbit),
        (billboard_cranes, billboard_background_field)
            .chain()
            .in_set(FrameStep::Billboard),
        (forward_activations, forward_hover_changes, fps_notification_system)
            .chain()
            .in_set(FrameStep::Report),
    );

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    // Native builds draw their own FPS overlay; the web host shows fps_update.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, create_native_overlays)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.57, 0.62, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.to_string(),
        level: Level::INFO,
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
