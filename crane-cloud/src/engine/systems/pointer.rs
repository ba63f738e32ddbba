use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::engine::cloud::hover::HoverMachine;
use crate::engine::cloud::sampler::FeaturedSet;

/// Last known pointer position in normalised device coordinates.
///
/// `ndc` stays `None` until the pointer first moves over the canvas, and keeps
/// its last value after the pointer leaves.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub ndc: Option<Vec2>,
    pub viewport_size: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedPointActivated {
    pub index: usize,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChanged {
    pub index: Option<usize>,
}

/// Map a logical cursor position to [-1, 1]² with +Y up.
pub fn pointer_ndc(cursor: Vec2, viewport_size: Vec2) -> Option<Vec2> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        cursor.x / viewport_size.x * 2.0 - 1.0,
        1.0 - cursor.y / viewport_size.y * 2.0,
    ))
}

pub fn ndc_to_viewport(ndc: Vec2, viewport_size: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport_size.x,
        (1.0 - ndc.y) * 0.5 * viewport_size.y,
    )
}

pub fn track_pointer(
    mut pointer: ResMut<PointerState>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(cursor) = cursor_moved.read().last() else {
        return;
    };

    if pointer.viewport_size == Vec2::ZERO {
        if let Ok(window) = windows.single() {
            pointer.viewport_size = window.size();
        }
    }

    if let Some(ndc) = pointer_ndc(cursor.position, pointer.viewport_size) {
        pointer.ndc = Some(ndc);
    }
}

pub fn handle_window_resize(
    mut pointer: ResMut<PointerState>,
    mut resized: EventReader<WindowResized>,
) {
    if let Some(event) = resized.read().last() {
        pointer.viewport_size = Vec2::new(event.width, event.height);
        debug!("Viewport resized to {}x{}", event.width, event.height);
    }
}

/// A left click on a hovered featured crane activates it.
pub fn handle_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    hover: Res<HoverMachine>,
    featured: Res<FeaturedSet>,
    mut activations: EventWriter<FeaturedPointActivated>,
) {
    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }

    if let Some(index) = hover.hovered() {
        if featured.contains(index) {
            info!("Featured crane {} activated", index);
            activations.write(FeaturedPointActivated { index });
        }
    }
}
