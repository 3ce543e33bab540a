//! Shared test helpers for dispatcher integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use moondust_bot::actions::Action;
use moondust_bot::dispatcher::Dispatcher;
use moondust_bot::routes;
use moondust_bot::state::AppState;
use moondust_core::model::{ActorId, ModeratorId};
use moondust_core::notify::Notifier;
use moondust_store::MemoryStore;
use moondust_test_support::{FixedClock, RecordingNotifier};

/// The moderator identity used across all integration tests.
pub const MODERATOR: ActorId = ActorId(99);

/// Fixed timestamp used across all integration tests: a Thursday, so
/// submissions are open.
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

/// A dispatcher wired to in-memory collaborators, with handles kept for
/// assertions.
pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Builds a harness with a recording notifier and the fixed Thursday clock.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(fixed_clock()),
        store.clone(),
        store.clone(),
        store.clone(),
        notifier.clone(),
        ModeratorId(MODERATOR),
    ));
    Harness {
        dispatcher,
        store,
        notifier,
    }
}

/// Builds a dispatcher with a custom clock and notifier, for tests that do
/// not assert on recorded notifications.
pub fn dispatcher_with(
    clock: FixedClock,
    notifier: Arc<dyn Notifier>,
) -> (Arc<Dispatcher>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(clock),
        store.clone(),
        store.clone(),
        store.clone(),
        notifier,
        ModeratorId(MODERATOR),
    ));
    (dispatcher, store)
}

/// Walks one actor through the whole intake workflow and returns the id of
/// the stored submission, extracted from the moderator's review buttons.
pub async fn submit_story(
    harness: &Harness,
    actor: ActorId,
    wallet: &str,
    story: &str,
) -> Uuid {
    let d = &harness.dispatcher;
    d.handle_text(actor, "tester", "/start").await.unwrap();
    d.handle_action(actor, "type_rekt").await.unwrap();
    d.handle_text(actor, "tester", wallet).await.unwrap();
    d.handle_text(actor, "tester", &"C".repeat(30)).await.unwrap();
    d.handle_text(actor, "tester", "$5000").await.unwrap();
    d.handle_text(actor, "tester", story).await.unwrap();
    d.handle_action(actor, "confirm_yes").await.unwrap();

    let notifications = harness.notifier.sent_to(MODERATOR);
    let latest = notifications.last().expect("moderator was notified");
    let Action::Review { submission_id, .. } =
        Action::decode(&latest.buttons[0]).expect("review button decodes")
    else {
        panic!("first moderator button is not a review action");
    };
    submission_id
}

/// Builds the HTTP app around a fresh harness, same structure as `main.rs`.
pub fn build_test_app() -> Router {
    let harness = harness();
    Router::new()
        .merge(routes::health::router())
        .with_state(AppState::new(harness.dispatcher))
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
