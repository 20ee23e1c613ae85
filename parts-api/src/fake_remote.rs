//! Local stand-in for the remote parts API, used by the HTTP tests.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct Behavior {
    pub login_status: u16,
    pub refresh_status: u16,
    pub expires_in: Option<u64>,
    pub auth_delay: Duration,
    pub catalog_status: u16,
    pub suppliers: Value,
    /// Logins for this user id are refused with 401
    pub reject_user: Option<String>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            login_status: 200,
            refresh_status: 200,
            expires_in: Some(3600),
            auth_delay: Duration::ZERO,
            catalog_status: 200,
            suppliers: json!([{ "store": { "id": 42, "name": "Main St Parts" } }]),
            reject_user: None,
        }
    }
}

#[derive(Default)]
pub(crate) struct Hits {
    pub login: AtomicUsize,
    pub refresh: AtomicUsize,
    pub authorized: AtomicUsize,
    pub last_login: Mutex<Option<Value>>,
    pub last_quote: Mutex<Option<Value>>,
    pub last_bearer: Mutex<Option<String>>,
}

impl Hits {
    pub fn logins(&self) -> usize {
        self.login.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refresh.load(Ordering::SeqCst)
    }
}

struct Shared {
    behavior: Behavior,
    hits: Arc<Hits>,
}

pub(crate) struct FakeRemote {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

impl FakeRemote {
    pub async fn spawn(behavior: Behavior) -> Self {
        let hits = Arc::new(Hits::default());
        let shared = Arc::new(Shared {
            behavior,
            hits: hits.clone(),
        });

        let app = Router::new()
            .route("/oauth/access", post(login))
            .route("/oauth/refresh", post(refresh))
            .route("/catalog/parts/{id}", get(part))
            .route("/catalog/quote", post(quote))
            .route("/profile/shop", get(shop))
            .route("/profile/shop/suppliers", get(suppliers))
            .route("/taxonomy/vehicles/{id}", get(vehicle))
            .route("/punchout/cart/create", post(cart_ok))
            .route("/punchout/cart/add-part", post(cart_ok))
            .route("/punchout/cart/remove-parts", delete(cart_ok))
            .route("/punchout/cart/info", get(cart_info))
            .with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }
}

/// A URL nothing is listening on
pub(crate) async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn token_body(prefix: &str, n: usize, expires_in: Option<u64>) -> Response {
    let mut body = json!({
        "accessToken": format!("{prefix}-{n}"),
        "refreshToken": format!("refresh-{n}"),
    });
    if let Some(expires_in) = expires_in {
        body["expiresIn"] = json!(expires_in);
    }
    Json(body).into_response()
}

async fn login(State(s): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    let n = s.hits.login.fetch_add(1, Ordering::SeqCst) + 1;
    let user = body["credentials"]["user"]["id"].as_str().map(str::to_string);
    *s.hits.last_login.lock().unwrap() = Some(body);
    tokio::time::sleep(s.behavior.auth_delay).await;
    if user.is_some() && user == s.behavior.reject_user {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }
    if s.behavior.login_status != 200 {
        return (status(s.behavior.login_status), "denied").into_response();
    }
    token_body("access", n, s.behavior.expires_in)
}

async fn refresh(State(s): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    let n = s.hits.refresh.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::time::sleep(s.behavior.auth_delay).await;
    if body.get("refreshToken").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, "missing refresh token").into_response();
    }
    if s.behavior.refresh_status != 200 {
        return (status(s.behavior.refresh_status), "expired").into_response();
    }
    token_body("refreshed", n, s.behavior.expires_in)
}

fn authorize(s: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    match bearer {
        Some(token) => {
            s.hits.authorized.fetch_add(1, Ordering::SeqCst);
            *s.hits.last_bearer.lock().unwrap() = Some(token);
            Ok(())
        }
        None => Err((StatusCode::UNAUTHORIZED, "no token").into_response()),
    }
}

fn catalog_failure(s: &Shared) -> Option<Response> {
    (s.behavior.catalog_status != 200).then(|| {
        (
            status(s.behavior.catalog_status),
            r#"{"error":"internal failure"}"#,
        )
            .into_response()
    })
}

async fn part(
    State(s): State<Arc<Shared>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    if let Some(failure) = catalog_failure(&s) {
        return failure;
    }
    if id == "BROKEN" {
        return (StatusCode::OK, "not json").into_response();
    }
    Json(json!({
        "partName": "Brake Pad Set",
        "partNumber": id,
        "images": [
            { "medium": "https://img.example/1.png" },
            { "medium": "https://img.example/2.png" },
            { "medium": "https://img.example/3.png" }
        ]
    }))
    .into_response()
}

async fn quote(
    State(s): State<Arc<Shared>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    if let Some(failure) = catalog_failure(&s) {
        return failure;
    }
    *s.hits.last_quote.lock().unwrap() = Some(body);
    Json(json!({
        "parts": [
            { "store": { "name": "Main St Parts" }, "price": { "list": 42.5 } }
        ]
    }))
    .into_response()
}

async fn shop(State(s): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    if let Some(failure) = catalog_failure(&s) {
        return failure;
    }
    Json(json!({
        "id": 7,
        "name": "Joe's Garage",
        "phone": "555-0100",
        "cellphone": "555-0101",
        "billingAddress": {
            "address1": "1 Main St",
            "address2": null,
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701",
            "country": "US"
        }
    }))
    .into_response()
}

async fn suppliers(State(s): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    Json(s.behavior.suppliers.clone()).into_response()
}

async fn vehicle(
    State(s): State<Arc<Shared>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    Json(json!({ "id": id, "year": 2012, "make": "Honda", "model": "Civic" })).into_response()
}

async fn cart_ok(State(s): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    StatusCode::OK.into_response()
}

async fn cart_info(State(s): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&s, &headers) {
        return denied;
    }
    Json(json!({ "parts": [ { "partId": "ABC123", "quantity": 2 } ] })).into_response()
}
