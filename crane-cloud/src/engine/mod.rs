pub mod assets;
pub mod camera;
pub mod cloud;
pub mod core;
pub mod error;
pub mod loading;
pub mod mesh;
pub mod scene;
pub mod systems;
