//! Forwarding of interaction events to the host page.

use bevy::prelude::*;

use crate::engine::systems::pointer::{FeaturedPointActivated, HoverChanged};
use crate::rpc::web_rpc::WebRpcInterface;

pub fn forward_activations(
    mut activations: EventReader<FeaturedPointActivated>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for activation in activations.read() {
        rpc_interface.send_notification(
            "featured_point_activated",
            serde_json::json!({ "index": activation.index }),
        );
    }
}

pub fn forward_hover_changes(
    mut changes: EventReader<HoverChanged>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for change in changes.read() {
        rpc_interface.send_notification(
            "hover_changed",
            serde_json::json!({ "index": change.index }),
        );
    }
}
