#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use pagedeck::config::AppConfig;
use pagedeck::domain::session::Session;
use pagedeck::AppState;

pub const TOKEN: &str = "test-access-token";
pub const ORG_ID: i64 = 1;
pub const USER_ID: i64 = 10;
pub const PAGE_SIZE: u32 = 2;
pub const UPLOAD_MAX_BYTES: usize = 1024;

// ---------------------------------------------------------------------------
// Fake content API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub organization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn query(&self) -> String {
        self.query.clone().unwrap_or_default()
    }
}

/// In-process stand-in for the content API. Answers with canned JSON keyed
/// by "METHOD /path" and records every request it sees.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    responses: Arc<Mutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    base_url: Arc<Mutex<Option<Url>>>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let fake = FakeUpstream::default();
        let app = Router::new().fallback(answer).with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake upstream");
        });

        *fake.base_url.lock().unwrap() =
            Some(Url::parse(&format!("http://{}/api", addr)).unwrap());
        fake
    }

    pub fn base_url(&self) -> Url {
        self.base_url.lock().unwrap().clone().expect("fake not started")
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{} /api/{}", method, path), (status, body));
    }

    /// Grants the test user the given role.
    pub fn permission(&self, role: i32, is_owner: bool, channel_ids: &[i64]) {
        self.respond(
            "GET",
            "permissions/check",
            200,
            json!({ "role": role, "isOwner": is_owner, "channelIds": channel_ids }),
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        let full = format!("/api/{}", path);
        self.requests()
            .into_iter()
            .filter(|req| req.method == method && req.path == full)
            .collect()
    }
}

async fn answer(
    State(fake): State<FakeUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    fake.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        organization: header("x-organization-id"),
        content_type: header("content-type"),
        body,
    });

    let key = format!("{} {}", method, uri.path());
    let canned = fake.responses.lock().unwrap().get(&key).cloned();
    match canned {
        Some((status, body)) => {
            (StatusCode::from_u16(status).unwrap(), Json(body)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no such record" })),
        )
            .into_response(),
    }
}

pub fn raw_post(id: i64, status: i32, channel_id: i64, scheduled: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": format!("Post {}", id),
        "content": format!("Body of post {}", id),
        "mediaUrls": [format!("https://cdn.example.com/{}.jpg", id)],
        "channel": { "id": channel_id, "name": "Page", "icon": "page.png" },
        "status": status,
        "scheduledTime": scheduled,
    })
}

pub fn session() -> Session {
    Session::new(TOKEN, ORG_ID, USER_ID)
}

pub fn test_config(upstream: Url) -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".to_string(),
        upstream_api_url: upstream,
        upstream_timeout_seconds: 5,
        page_size: PAGE_SIZE,
        search_debounce_ms: 500,
        permission_cache_ttl_seconds: 60,
        display_utc_offset_minutes: 0,
        upload_max_bytes: UPLOAD_MAX_BYTES,
    }
}

// ---------------------------------------------------------------------------
// TestApp: the dashboard router wired to a fresh fake upstream
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub upstream: FakeUpstream,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

pub async fn app() -> TestApp {
    let upstream = FakeUpstream::start().await;
    let config = test_config(upstream.base_url());
    let state = AppState::from_config(&config).expect("failed to build AppState");
    let router = pagedeck::http::router(state.clone());

    TestApp {
        router,
        state,
        upstream,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for (key, value) in headers {
            builder = builder.header(*key, value.as_str());
        }

        let request = builder.body(body.unwrap_or_else(Body::empty)).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    fn session_headers() -> Vec<(&'static str, String)> {
        vec![
            ("authorization", format!("Bearer {}", TOKEN)),
            ("x-organization-id", ORG_ID.to_string()),
            ("x-user-id", USER_ID.to_string()),
        ]
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &Self::session_headers())
            .await
    }

    /// GET as the test user, signed into another organization.
    pub async fn get_in_org(&self, path: &str, org_id: i64) -> TestResponse {
        let headers = vec![
            ("authorization", format!("Bearer {}", TOKEN)),
            ("x-organization-id", org_id.to_string()),
            ("x-user-id", USER_ID.to_string()),
        ];
        self.request(Method::GET, path, None, &headers).await
    }

    pub async fn get_anonymous(&self, path: &str, headers: &[(&str, String)]) -> TestResponse {
        self.request(Method::GET, path, None, headers).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> TestResponse {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None, &Self::session_headers())
            .await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None, &Self::session_headers())
            .await
    }

    pub async fn post_bytes(&self, path: &str, content_type: &str, data: Vec<u8>) -> TestResponse {
        let mut headers = Self::session_headers();
        headers.push(("content-type", content_type.to_string()));
        self.request(Method::POST, path, Some(Body::from(data)), &headers)
            .await
    }

    async fn send_json(&self, method: Method, path: &str, body: Value) -> TestResponse {
        let mut headers = Self::session_headers();
        headers.push(("content-type", "application/json".to_string()));
        let body = Body::from(serde_json::to_vec(&body).unwrap());
        self.request(method, path, Some(body), &headers).await
    }
}
