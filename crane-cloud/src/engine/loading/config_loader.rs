use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::core::app_setup::SceneRng;
use crate::engine::loading::progress::LoadingProgress;
use constants::path::SCENE_CONFIG_PATH;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<SceneConfig>>,
}

// Start the loading process
pub fn start_config_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading scene configuration from {}", SCENE_CONFIG_PATH);
    loader.handle = Some(asset_server.load(SCENE_CONFIG_PATH));
}

/// Settle the configuration once the JSON asset resolves either way.
pub fn check_config_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<SceneConfig>>,
    mut commands: Commands,
) {
    if loading_progress.config_settled {
        return;
    }

    let Some(handle) = &loader.handle else {
        return;
    };

    let config = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => resolve_config(configs.get(handle)),
        Some(LoadState::Failed(err)) => {
            warn!("Scene configuration unavailable ({}), using defaults", err);
            SceneConfig::default()
        }
        _ => return,
    };

    let rng = SceneRng::from_seed(config.seed);
    info!(
        "✓ Scene configuration settled: {} cranes, {} featured, seed {:?}",
        config.amount,
        config.effective_featured_count(),
        config.seed
    );

    commands.insert_resource(rng);
    commands.insert_resource(config);
    loading_progress.config_settled = true;
}

/// Validated configuration, or the defaults when the file is missing or rejected.
pub fn resolve_config(loaded: Option<&SceneConfig>) -> SceneConfig {
    let Some(config) = loaded else {
        warn!("Scene configuration asset missing after load, using defaults");
        return SceneConfig::default();
    };

    match config.validate() {
        Ok(()) => config.clone(),
        Err(err) => {
            warn!("Invalid scene configuration: {}. Using defaults", err);
            SceneConfig::default()
        }
    }
}
