use std::sync::{Arc, Mutex};

use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::cloud::hover::HoverMachine;
use crate::engine::cloud::sampler::{FeaturedSet, SampledCloud};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::fps_tracking::smoothed_fps;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const JSONRPC_VERSION: &str = "2.0";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// Absent for notifications, which never get a reply.
    pub id: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl RpcError {
    fn new(code: i32, message: &str, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.to_string(),
            data,
        }
    }

    pub fn invalid_request(jsonrpc: &str) -> Self {
        Self::new(-32600, "Invalid request", Some(serde_json::json!({ "jsonrpc": jsonrpc })))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, "Method not found", Some(serde_json::json!({ "method": method })))
    }

    pub fn invalid_params(method: &str, params: &Value) -> Self {
        Self::new(
            -32602,
            "Invalid params",
            Some(serde_json::json!({ "method": method, "params": params })),
        )
    }

    /// The query needs the crane cloud, which is still being built.
    pub fn not_ready(message: &str) -> Self {
        Self::new(-32000, message, None)
    }
}

/// Outbound traffic for the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last flush.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Host page bridge for the iframe deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<HostInbox>()
            .add_event::<HostMessage>()
            .add_systems(
                Update,
                (drain_host_inbox, dispatch_rpc_requests, flush_outgoing).chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_for_host_messages);
    }
}

/// Raw strings pushed by the `message` listener, shared with the JS callback.
#[derive(Resource, Default, Clone)]
struct HostInbox(Arc<Mutex<Vec<String>>>);

impl HostInbox {
    #[cfg(target_arch = "wasm32")]
    fn push(&self, raw: String) {
        if let Ok(mut inbox) = self.0.lock() {
            inbox.push(raw);
        }
    }

    fn take(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|mut inbox| std::mem::take(&mut *inbox))
            .unwrap_or_default()
    }
}

#[derive(Event)]
struct HostMessage {
    raw: String,
}

#[cfg(target_arch = "wasm32")]
fn listen_for_host_messages(inbox: Res<HostInbox>) {
    let inbox = inbox.clone();
    let on_message = Closure::wrap(Box::new(move |event: web_sys::MessageEvent| {
        // Only string payloads can carry JSON-RPC.
        let Ok(data) = event.data().dyn_into::<js_sys::JsString>() else {
            return;
        };
        let raw: String = data.into();
        if raw.contains("jsonrpc") {
            inbox.push(raw);
        }
    }) as Box<dyn FnMut(web_sys::MessageEvent)>);

    let Some(window) = web_sys::window() else {
        error!("Window object not available, host messages disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Lives as long as the page.
    on_message.forget();
}

fn drain_host_inbox(inbox: Res<HostInbox>, mut messages: EventWriter<HostMessage>) {
    for raw in inbox.take() {
        messages.write(HostMessage { raw });
    }
}

/// Read-only scene state the request handlers answer from.
///
/// Cloud resources are absent until the cloud is built.
pub struct RpcContext<'a> {
    pub fps: Option<f64>,
    pub config: Option<&'a SceneConfig>,
    pub progress: &'a LoadingProgress,
    pub hover: Option<&'a HoverMachine>,
    pub featured: Option<&'a FeaturedSet>,
    pub cloud: Option<&'a SampledCloud>,
}

fn dispatch_rpc_requests(
    mut messages: EventReader<HostMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    config: Option<Res<SceneConfig>>,
    progress: Res<LoadingProgress>,
    hover: Option<Res<HoverMachine>>,
    featured: Option<Res<FeaturedSet>>,
    cloud: Option<Res<SampledCloud>>,
) {
    let context = RpcContext {
        fps: smoothed_fps(&diagnostics),
        config: config.as_deref(),
        progress: &progress,
        hover: hover.as_deref(),
        featured: featured.as_deref(),
        cloud: cloud.as_deref(),
    };

    for message in messages.read() {
        debug!("Received RPC: {}", message.raw);

        let request = match serde_json::from_str::<RpcRequest>(&message.raw) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({ "message": format!("Parse error: {}", parse_error) }),
                );
                continue;
            }
        };

        if let Some(response) = handle_rpc_request(&request, &context) {
            rpc_interface.queue_response(response);
        }
    }
}

type RpcHandler = fn(&RpcContext) -> Result<Value, RpcError>;

fn params_are_empty(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Array(values) => values.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Answer one request. Notifications (no `id`) get `None`.
pub fn handle_rpc_request(request: &RpcRequest, context: &RpcContext) -> Option<RpcResponse> {
    let id = request.id.clone()?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Some(RpcResponse::failure(id, RpcError::invalid_request(&request.jsonrpc)));
    }

    let handler: RpcHandler = match request.method.as_str() {
        "get_fps" => handle_get_fps,
        "get_hovered_point" => handle_get_hovered_point,
        "get_featured_points" => handle_get_featured_points,
        "get_scene_summary" => handle_get_scene_summary,
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(RpcResponse::failure(id, RpcError::method_not_found(&request.method)));
        }
    };

    // Every query is parameterless.
    if !params_are_empty(&request.params) {
        let error = RpcError::invalid_params(&request.method, &request.params);
        return Some(RpcResponse::failure(id, error));
    }

    Some(match handler(context) {
        Ok(result) => RpcResponse::success(id, result),
        Err(error) => RpcResponse::failure(id, error),
    })
}

fn handle_get_fps(context: &RpcContext) -> Result<Value, RpcError> {
    Ok(serde_json::json!({
        "fps": context.fps.unwrap_or(0.0) as f32
    }))
}

fn handle_get_hovered_point(context: &RpcContext) -> Result<Value, RpcError> {
    let hover = context
        .hover
        .ok_or_else(|| RpcError::not_ready("Crane cloud is still loading"))?;
    let index = hover.hovered();
    let featured = index.is_some_and(|i| context.featured.is_some_and(|set| set.contains(i)));

    Ok(serde_json::json!({
        "index": index,
        "featured": featured,
        "fading": hover.fading(),
    }))
}

fn handle_get_featured_points(context: &RpcContext) -> Result<Value, RpcError> {
    let featured = context
        .featured
        .ok_or_else(|| RpcError::not_ready("Crane cloud is still loading"))?;

    Ok(serde_json::json!({
        "count": featured.len(),
        "indices": featured.indices().collect::<Vec<_>>(),
    }))
}

fn handle_get_scene_summary(context: &RpcContext) -> Result<Value, RpcError> {
    let mut summary = serde_json::json!({
        "state": context.progress.stage(),
        "sprite": context.progress.sprite_source,
    });

    if let Some(config) = context.config {
        summary["seed"] = serde_json::json!(config.seed);
        summary["background_particles"] = serde_json::json!(config.background.count);
    }
    if let Some(cloud) = context.cloud {
        summary["amount"] = serde_json::json!(cloud.len());
        summary["featured"] = serde_json::json!(cloud.featured_set().len());
        summary["exhausted"] = serde_json::json!(cloud.exhausted);
    }

    Ok(summary)
}

/// Notifications go out before responses within a frame.
fn flush_outgoing(mut rpc_interface: ResMut<WebRpcInterface>) {
    let notifications = std::mem::take(&mut rpc_interface.outgoing_notifications);
    let responses = std::mem::take(&mut rpc_interface.outgoing_responses);

    for notification in &notifications {
        post_to_host(notification);
    }
    for response in &responses {
        post_to_host(response);
    }
}

#[cfg(target_arch = "wasm32")]
fn post_to_host<T: Serialize>(message: &T) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize RPC message: {}", e);
            return;
        }
    };

    let Some(parent) = web_sys::window().and_then(|window| window.parent().ok().flatten()) else {
        warn!("No parent window to receive RPC message");
        return;
    };
    if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
        error!("Failed to post RPC message to parent: {:?}", e);
    }
}

// Native builds have no host page.
#[cfg(not(target_arch = "wasm32"))]
fn post_to_host<T: Serialize>(_message: &T) {}
