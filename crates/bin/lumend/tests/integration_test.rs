//! End-to-end smoke tests for the full lumend stack.
//!
//! Each test spins up the complete application (virtual lights, real
//! engine, real event bus, real axum router) and exercises the HTTP layer
//! via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use lumen_adapter_http_axum::router;
use lumen_adapter_http_axum::state::AppState;
use lumen_adapter_virtual::VirtualLights;
use lumen_app::engine::SceneEngine;
use lumen_app::event_bus::InProcessEventBus;
use lumen_app::ports::clock::ManualClock;
use lumen_domain::event::EventType;
use lumen_domain::id::EntityId;
use lumen_domain::light::{Attribute, AttributeValue};
use lumen_domain::scene::SceneDefinition;
use lumen_domain::time::TimeOfDay;

type Engine = SceneEngine<Arc<VirtualLights>, Arc<InProcessEventBus>, ManualClock>;

struct TestApp {
    router: axum::Router,
    engine: Arc<Engine>,
    lights: Arc<VirtualLights>,
    bus: Arc<InProcessEventBus>,
    clock: ManualClock,
}

fn entity(id: &str) -> EntityId {
    EntityId::new(id).unwrap()
}

fn at(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::from_hms(hour, minute, 0).unwrap()
}

/// Two scenes over two lights: a brightness ramp with power for the
/// living room plus a constant kitchen level, and a higher-priority
/// movie scene dimming the living room.
fn definitions() -> Vec<SceneDefinition> {
    serde_json::from_value(serde_json::json!([
        {
            "name": "daylight",
            "priority": 0,
            "entities": {
                "light.living_room": {
                    "brightness": [
                        {"at": "06:00", "value": 10.0},
                        {"at": "18:00", "value": 200.0}
                    ],
                    "power": [{"at": "06:00", "value": "on"}]
                },
                "light.kitchen": {
                    "brightness": [{"at": "00:00", "value": 80.0}]
                }
            }
        },
        {
            "name": "movie",
            "priority": 5,
            "entities": {
                "light.living_room": {
                    "brightness": [{"at": "00:00", "value": 30.0}]
                }
            }
        }
    ]))
    .unwrap()
}

/// Build a fully-wired router with the clock pinned to noon.
async fn app() -> TestApp {
    let clock = ManualClock::starting_at(at(12, 0));
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let entity_ids = vec![entity("light.living_room"), entity("light.kitchen")];
    let lights = Arc::new(VirtualLights::new(entity_ids.clone(), 64));

    let engine = Arc::new(SceneEngine::new(
        Arc::clone(&lights),
        Arc::clone(&event_bus),
        clock.clone(),
    ));
    engine.register_entities(entity_ids).await;
    engine.replace_scenes(definitions()).await.unwrap();

    let state = AppState::from_arcs(Arc::clone(&engine), Arc::clone(&event_bus));
    TestApp {
        router: router::build(state),
        engine,
        lights,
        bus: event_bus,
        clock,
    }
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap()
}

/// Pick one entity's status out of the `/api/entities` response.
fn status_of<'a>(statuses: &'a serde_json::Value, entity_id: &str) -> &'a serde_json::Value {
    statuses
        .as_array()
        .unwrap()
        .iter()
        .find(|status| status["entity_id"] == entity_id)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = app().await;

    let resp = app.router.oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

// ---------------------------------------------------------------------------
// Scene activation and arbitration over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_arbitrate_scenes_over_http() {
    let app = app().await;

    // Daylight for both lights: the living room ramp is halfway at noon.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room","light.kitchen"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.clone().oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    let living_room = status_of(&statuses, "light.living_room");
    assert_eq!(living_room["governing_scene"], "daylight");
    assert_eq!(living_room["last_commanded"]["brightness"], 105.0);
    assert_eq!(living_room["last_commanded"]["power"], "on");
    assert_eq!(status_of(&statuses, "light.kitchen")["last_commanded"]["brightness"], 80.0);

    // Movie outranks daylight for the living room.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"movie"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.clone().oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    let living_room = status_of(&statuses, "light.living_room");
    assert_eq!(living_room["governing_scene"], "movie");
    assert_eq!(living_room["last_commanded"]["brightness"], 30.0);

    // Deactivating movie falls back to daylight.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/unset_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"movie"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    let living_room = status_of(&statuses, "light.living_room");
    assert_eq!(living_room["governing_scene"], "daylight");
    assert_eq!(living_room["last_commanded"]["brightness"], 105.0);
}

#[tokio::test]
async fn should_skip_unknown_entities_in_service_calls() {
    let app = app().await;

    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room","light.ghost"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(statuses.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Manual override via the read-back channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_suspend_and_resume_after_manual_override() {
    let app = app().await;
    let mut readings = app.lights.subscribe_readings();

    app.router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();

    // The command's own echo must not suspend anything.
    let echo = readings.recv().await.unwrap();
    app.engine.observe_reading(echo).await;
    let resp = app.router.clone().oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(status_of(&statuses, "light.living_room")["suspended"], false);

    // Someone drags the brightness slider.
    let mut values = BTreeMap::new();
    values.insert(Attribute::Brightness, AttributeValue::Number(250.0));
    app.lights
        .simulate_external_change(&entity("light.living_room"), values);
    let manual = readings.recv().await.unwrap();
    app.engine.observe_reading(manual).await;

    let resp = app.router.clone().oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(status_of(&statuses, "light.living_room")["suspended"], true);

    // Resuming snaps the light back onto the curve.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/continue_adjustments",
            r#"{"entity_ids":["light.living_room"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let values = app.lights.values(&entity("light.living_room")).unwrap();
    assert_eq!(values[&Attribute::Brightness], AttributeValue::Number(105.0));

    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(status_of(&statuses, "light.living_room")["suspended"], false);
}

#[tokio::test]
async fn should_hold_values_while_adjustments_stopped() {
    let app = app().await;

    app.router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/stop_adjustments",
            r#"{"entity_ids":["light.living_room"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Time moves on but the stopped light does not.
    app.clock.set(at(17, 0));
    app.engine.tick().await;

    let values = app.lights.values(&entity("light.living_room")).unwrap();
    assert_eq!(values[&Attribute::Brightness], AttributeValue::Number(105.0));
}

// ---------------------------------------------------------------------------
// Periodic evaluation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_follow_curve_on_tick_after_time_advances() {
    let app = app().await;

    app.router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();

    app.clock.set(at(15, 0));
    app.engine.tick().await;

    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(
        status_of(&statuses, "light.living_room")["last_commanded"]["brightness"],
        152.5
    );
}

// ---------------------------------------------------------------------------
// Timeshift
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_apply_and_clamp_timeshift() {
    let app = app().await;

    app.router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();

    // +6 h: noon evaluates as 18:00, the top of the ramp.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/set_timeshift",
            r#"{"entity_ids":["light.living_room"],"timeshift":360}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.clone().oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    let living_room = status_of(&statuses, "light.living_room");
    assert_eq!(living_room["timeshift_minutes"], 360);
    assert_eq!(living_room["last_commanded"]["brightness"], 200.0);

    // Relative shifts saturate at the +12 h boundary.
    let resp = app
        .router
        .clone()
        .oneshot(post(
            "/api/services/shift_timeshift",
            r#"{"entity_ids":["light.living_room"],"shift":100000}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    assert_eq!(
        status_of(&statuses, "light.living_room")["timeshift_minutes"],
        720
    );
}

// ---------------------------------------------------------------------------
// Snapshot replacement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_replace_snapshot_over_http() {
    let app = app().await;

    app.router
        .clone()
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"movie"}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/scenes")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"[{"name":"evening","priority":1,"entities":{
                        "light.living_room":{"brightness":[{"at":"00:00","value":60.0}]}
                    }}]"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.router.clone().oneshot(get("/api/scenes")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let scenes = json_body(resp).await;
    let names: Vec<_> = scenes
        .as_array()
        .unwrap()
        .iter()
        .map(|scene| scene["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["evening"]);

    // The flag for the dropped movie scene is gone.
    let resp = app.router.oneshot(get("/api/entities")).await.unwrap();
    let statuses = json_body(resp).await;
    let living_room = status_of(&statuses, "light.living_room");
    assert_eq!(living_room["governing_scene"], serde_json::Value::Null);
    assert!(living_room["active_scenes"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Event stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_expose_event_stream() {
    let app = app().await;

    let resp = app
        .router
        .oneshot(get("/api/events/stream"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn should_publish_activation_events_in_order() {
    let app = app().await;
    let mut rx = app.bus.subscribe();

    app.router
        .oneshot(post(
            "/api/services/set_scene_condition_met",
            r#"{"entity_ids":["light.living_room"],"scene":"daylight"}"#,
        ))
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    assert_eq!(first.event_type, EventType::SceneActivated);
    assert_eq!(first.data["scene"], "daylight");

    let second = rx.recv().await.unwrap();
    assert_eq!(second.event_type, EventType::CommandIssued);
    assert_eq!(second.data["values"]["brightness"], 105.0);
}
