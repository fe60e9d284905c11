#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use pixeldex::config::ProxyConfig;
use pixeldex::proxy;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Chapters served by the fake feed for every manga.
pub const FEED_TOTAL: usize = 250;

pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub feed_hits: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn feed_hits(&self) -> usize {
        self.feed_hits.load(Ordering::SeqCst)
    }
}

fn query_value(raw: &Option<String>, key: &str) -> Option<String> {
    let raw = raw.as_deref()?;
    url::form_urlencoded::parse(raw.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

async fn root() -> Json<Value> {
    Json(json!({ "root": true }))
}

async fn manga_list(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "result": "ok",
        "data": [{
            "id": "m1",
            "type": "manga",
            "attributes": { "title": { "ja-ro": "Pikuseru", "en": "Pixel" }, "status": "ongoing" },
            "relationships": [
                { "id": "a1", "type": "author", "attributes": { "name": "Someone" } },
                { "id": "c1", "type": "cover_art", "attributes": { "fileName": "cover.png" } }
            ]
        }],
        "total": 1,
        "echo": query.unwrap_or_default()
    }))
}

/// Every manga is missing, except `flaky`, which hits a gateway that answers in HTML.
async fn manga_missing(Path(id): Path<String>) -> Response {
    if id == "flaky" {
        return (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "result": "error", "errors": [{ "status": 404 }] })),
    )
        .into_response()
}

async fn feed(
    State(hits): State<Arc<AtomicUsize>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    let offset: usize = query_value(&query, "offset").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = query_value(&query, "limit").and_then(|s| s.parse().ok()).unwrap_or(100);
    let data: Vec<Value> = (offset..(offset + limit).min(FEED_TOTAL))
        .map(|i| {
            json!({
                "id": format!("{}-c{}", id, i),
                "type": "chapter",
                "attributes": {
                    "chapter": (i + 1).to_string(),
                    "volume": null,
                    "pages": if i % 50 == 49 { 0 } else { 12 },
                    "translatedLanguage": "en",
                    "publishAt": "2024-05-01T00:00:00+00:00"
                }
            })
        })
        .collect();
    Json(json!({ "result": "ok", "data": data, "limit": limit, "offset": offset, "total": FEED_TOTAL }))
}

async fn at_home(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "result": "ok",
        "baseUrl": "https://node.example",
        "chapter": { "hash": format!("hash-{}", id), "data": [], "dataSaver": ["s1.jpg", "s2.jpg"] }
    }))
}

async fn echo_method(method: Method) -> Json<Value> {
    Json(json!({ "method": method.as_str() }))
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

pub async fn spawn_upstream() -> FakeUpstream {
    let feed_hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/", get(root))
        .route("/manga", get(manga_list))
        .route("/manga/:id", get(manga_missing))
        .route("/manga/:id/feed", get(feed))
        .route("/at-home/server/:id", get(at_home))
        .route("/method", any(echo_method))
        .route("/broken", get(not_json))
        .with_state(feed_hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeUpstream { addr, feed_hits }
}

pub async fn spawn_proxy(upstream_origin: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ProxyConfig {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
        upstream_origin,
        timeout_secs: 5,
        ..ProxyConfig::default()
    };
    tokio::spawn(async move {
        proxy::serve_with_listener(listener, &config).await.unwrap();
    });
    addr
}

/// An origin nobody is listening on.
pub async fn dead_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
