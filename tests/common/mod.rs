//! Shared harness for HTTP integration tests.
//!
//! Spawns the full router on an ephemeral port with an in-memory store and
//! drives it with `reqwest`.

use axum::Router;
use chrono::{Duration, Utc};
use reqwest::{Method, Response};
use serde_json::{Value, json};

use courtbook::api;
use courtbook::app_state::AppState;
use courtbook::domain::{EventBus, Role, User, WaitlistSkillGating};
use courtbook::identity::USER_ID_HEADER;
use courtbook::persistence::{MemoryStore, MembershipStore, StoreBackend};

/// A running server plus a client and a seeded court manager.
#[derive(Debug)]
pub struct TestServer {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub base: String,
    /// HTTP client.
    pub client: reqwest::Client,
    /// State shared with the server.
    pub state: AppState,
    /// A user allowed to schedule events.
    pub manager: User,
}

/// Starts a server with the given waitlist gating policy.
pub async fn spawn(gating: WaitlistSkillGating) -> TestServer {
    let state = AppState::new(
        StoreBackend::Memory(MemoryStore::new()),
        EventBus::new(1000),
        gating,
    );
    let manager = User::new("Court Manager", "ADVANCED_4_5").with_role(Role::CourtManager);
    let Ok(manager) = state
        .membership_service
        .store()
        .insert_user(manager)
        .await
    else {
        panic!("seeding manager failed");
    };

    let app = Router::new()
        .merge(api::build_router())
        .with_state(state.clone());
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        state,
        manager,
    }
}

impl TestServer {
    /// Sends a request, optionally as `caller`, with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = self.client.request(method, format!("{}{path}", self.base));
        if let Some(id) = caller {
            req = req.header(USER_ID_HEADER, id);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let Ok(resp) = req.send().await else {
            panic!("request to {path} failed");
        };
        resp
    }

    /// Registers a player and returns their id.
    pub async fn register(&self, name: &str, skill: &str) -> String {
        let resp = self
            .send(
                Method::POST,
                "/api/v1/users",
                None,
                Some(json!({ "name": name, "skill_level": skill })),
            )
            .await;
        assert_eq!(resp.status(), 201);
        let body = json_body(resp).await;
        let Some(id) = body["id"].as_str() else {
            panic!("user id missing: {body}");
        };
        id.to_string()
    }

    /// Schedules an event as the seeded manager and returns its id.
    pub async fn create_event(
        &self,
        max_players: u32,
        min_skill: Option<&str>,
        max_skill: Option<&str>,
    ) -> String {
        let start = Utc::now() + Duration::days(1);
        let manager = self.manager.id.to_string();
        let resp = self
            .send(
                Method::POST,
                "/api/v1/events",
                Some(&manager),
                Some(json!({
                    "title": "Evening open play",
                    "event_type": "OPEN_PLAY",
                    "start": start,
                    "end": start + Duration::hours(2),
                    "max_players": max_players,
                    "min_skill": min_skill,
                    "max_skill": max_skill,
                    "court_ids": [uuid::Uuid::new_v4()],
                })),
            )
            .await;
        assert_eq!(resp.status(), 201);
        let body = json_body(resp).await;
        let Some(id) = body["id"].as_str() else {
            panic!("event id missing: {body}");
        };
        id.to_string()
    }
}

/// Decodes a response body as JSON.
pub async fn json_body(resp: Response) -> Value {
    let Ok(value) = resp.json::<Value>().await else {
        panic!("response was not JSON");
    };
    value
}
