use bevy::asset::LoadState;
use bevy::prelude::*;
use rand::Rng;

use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::assets::sprite::{CraneVariant, configure_sprite_sampler, crane_sprite_image};
use crate::engine::core::app_setup::SceneRng;
use crate::engine::error::SpriteError;
use crate::engine::loading::progress::LoadingProgress;

/// Where the crane texture came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSource {
    BuiltIn(CraneVariant),
    File(String),
    /// Plain white quad, used only if the built-in outline cannot be rasterised.
    Blank,
}

impl std::fmt::Display for SpriteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpriteSource::BuiltIn(variant) => write!(f, "built-in {:?} crane", variant),
            SpriteSource::File(path) => write!(f, "{}", path),
            SpriteSource::Blank => write!(f, "blank quad"),
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpriteAssets {
    pub texture: Handle<Image>,
    pub source: Option<SpriteSource>,
}

/// Kick off the configured image load, or rasterise the built-in crane.
pub fn start_sprite_loading(
    mut sprite_assets: ResMut<SpriteAssets>,
    config: Res<SceneConfig>,
    mut rng: ResMut<SceneRng>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
) {
    match &config.sprite.path {
        Some(path) => {
            info!("Loading crane sprite image {}", path);
            sprite_assets.texture = asset_server.load(path.as_str());
            sprite_assets.source = Some(SpriteSource::File(path.clone()));
        }
        None => {
            let (texture, source) =
                built_in_sprite(&mut rng.0, config.sprite.resolution, &mut images);
            sprite_assets.texture = texture;
            sprite_assets.source = Some(source);
        }
    }
}

/// Resolve the sprite, falling back to the built-in crane when an image fails.
pub fn check_sprite_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    mut sprite_assets: ResMut<SpriteAssets>,
    config: Res<SceneConfig>,
    mut rng: ResMut<SceneRng>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
) {
    if loading_progress.sprite_ready {
        return;
    }

    let Some(source) = sprite_assets.source.clone() else {
        return;
    };

    if let SpriteSource::File(path) = source {
        match asset_server.get_load_state(&sprite_assets.texture) {
            Some(LoadState::Loaded) => {
                if let Some(image) = images.get_mut(&sprite_assets.texture) {
                    configure_sprite_sampler(image);
                }
            }
            Some(LoadState::Failed(err)) => {
                let failure = SpriteError::Decode {
                    path,
                    reason: err.to_string(),
                };
                error!("{}. Falling back to the built-in crane", failure);

                let (texture, source) =
                    built_in_sprite(&mut rng.0, config.sprite.resolution, &mut images);
                sprite_assets.texture = texture;
                sprite_assets.source = Some(source);
            }
            _ => return,
        }
    }

    let description = sprite_assets
        .source
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    println!("✓ Crane sprite ready: {}", description);
    loading_progress.sprite_source = Some(description);
    loading_progress.sprite_ready = true;
}

fn built_in_sprite<R: Rng + ?Sized>(
    rng: &mut R,
    resolution: u32,
    images: &mut Assets<Image>,
) -> (Handle<Image>, SpriteSource) {
    let variant = CraneVariant::random(rng);
    match crane_sprite_image(variant, resolution) {
        Ok(image) => (images.add(image), SpriteSource::BuiltIn(variant)),
        Err(err) => {
            error!("Built-in crane sprite failed: {}", err);
            (images.add(Image::default()), SpriteSource::Blank)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn built_in_sprite_is_added_to_assets() {
        let mut images = Assets::<Image>::default();
        let mut rng = StdRng::seed_from_u64(3);

        let (handle, source) = built_in_sprite(&mut rng, 64, &mut images);

        assert!(matches!(source, SpriteSource::BuiltIn(_)));
        let image = images.get(&handle).unwrap();
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 64);
    }

    #[test]
    fn zero_resolution_falls_back_to_blank() {
        let mut images = Assets::<Image>::default();
        let mut rng = StdRng::seed_from_u64(3);

        let (handle, source) = built_in_sprite(&mut rng, 0, &mut images);

        assert_eq!(source, SpriteSource::Blank);
        assert!(images.get(&handle).is_some());
    }

    #[test]
    fn sources_describe_themselves() {
        assert_eq!(
            SpriteSource::File("sprites/crane.png".into()).to_string(),
            "sprites/crane.png"
        );
        assert_eq!(
            SpriteSource::BuiltIn(CraneVariant::Side).to_string(),
            "built-in Side crane"
        );
    }
}
