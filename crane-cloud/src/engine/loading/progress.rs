use bevy::prelude::*;

/// Startup milestones gating the `AppState` transitions.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingProgress {
    pub config_settled: bool,
    pub sprite_ready: bool,
    pub cloud_built: bool,
    /// Human readable description of the sprite in use, once chosen.
    pub sprite_source: Option<String>,
}

impl LoadingProgress {
    /// Stage name reported to the host page.
    pub fn stage(&self) -> &'static str {
        if self.cloud_built {
            "ready"
        } else if self.sprite_ready {
            "building_cloud"
        } else if self.config_settled {
            "loading_sprite"
        } else {
            "loading_config"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_follow_milestones() {
        let mut progress = LoadingProgress::default();
        assert_eq!(progress.stage(), "loading_config");

        progress.config_settled = true;
        assert_eq!(progress.stage(), "loading_sprite");

        progress.sprite_ready = true;
        assert_eq!(progress.stage(), "building_cloud");

        progress.cloud_built = true;
        assert_eq!(progress.stage(), "ready");
    }
}
