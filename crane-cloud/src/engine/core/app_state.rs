use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

/// Startup sequence, then the interactive frame loop.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    LoadingConfig,
    LoadingSprite,
    BuildingCloud,
    Running,
}

#[derive(Component)]
pub struct FpsText;

pub fn transition_to_loading_sprite(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.config_settled {
        println!("→ Transitioning to LoadingSprite state");
        next_state.set(AppState::LoadingSprite);
    }
}

pub fn transition_to_building_cloud(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.sprite_ready {
        println!("→ Transitioning to BuildingCloud state");
        next_state.set(AppState::BuildingCloud);
    }
}

// Final transition to running state
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.cloud_built {
        println!("→ All systems ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Tell the host page whenever the loading stage moves on.
pub fn update_loading_frontend(
    loading_progress: Res<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_stage: Local<Option<&'static str>>,
) {
    let stage = loading_progress.stage();
    if *last_stage == Some(stage) {
        return;
    }

    rpc_interface.send_notification(
        "loading_state",
        serde_json::json!({
            "state": stage,
            "sprite": loading_progress.sprite_source,
        }),
    );
    *last_stage = Some(stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn state_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<LoadingProgress>()
            .init_resource::<WebRpcInterface>()
            .add_systems(
                Update,
                (
                    transition_to_loading_sprite.run_if(in_state(AppState::LoadingConfig)),
                    transition_to_building_cloud.run_if(in_state(AppState::LoadingSprite)),
                    transition_to_running.run_if(in_state(AppState::BuildingCloud)),
                    update_loading_frontend,
                ),
            );
        app
    }

    fn state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn waits_in_loading_config_until_settled() {
        let mut app = state_app();
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(state(&app), AppState::LoadingConfig);
    }

    #[test]
    fn milestones_walk_the_state_machine() {
        let mut app = state_app();
        app.world_mut().resource_mut::<LoadingProgress>().config_settled = true;
        app.update();
        app.update();
        assert_eq!(state(&app), AppState::LoadingSprite);

        app.world_mut().resource_mut::<LoadingProgress>().sprite_ready = true;
        app.update();
        app.update();
        assert_eq!(state(&app), AppState::BuildingCloud);

        app.world_mut().resource_mut::<LoadingProgress>().cloud_built = true;
        app.update();
        app.update();
        assert_eq!(state(&app), AppState::Running);
    }

    #[test]
    fn loading_stage_is_announced_once() {
        let mut app = state_app();
        app.update();
        app.update();

        let stages: Vec<String> = app
            .world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .iter()
            .filter(|n| n.method == "loading_state")
            .map(|n| n.params["state"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(stages, vec!["loading_config"]);
    }
}
