use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    routing::get,
};
use plsort::{
    paging::{FetchError, PageSource},
    spotify::{UserPlaylists, get_json},
    types::UserProfile,
};
use reqwest::Client;
use serde_json::{Value, json};

// Serves `app` on a free local port and returns its base url
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn playlists_page(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let offset = params.get("offset").cloned().unwrap_or_default();
    Json(json!({
        "items": [{
            "id": format!("p{}", offset),
            "name": format!("Playlist at {}", offset),
            "public": false,
            "owner": { "id": "alice", "display_name": "Alice", "uri": "spotify:user:alice", "href": "h" },
            "tracks": { "total": 4 }
        }],
        "limit": params.get("limit").and_then(|l| l.parse::<u32>().ok()).unwrap_or(0),
        "offset": offset.parse::<u32>().unwrap_or(0),
        "next": null,
        "total": 21
    }))
}

fn stub_api() -> Router {
    Router::new()
        .route("/me", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/users/alice/playlists", get(playlists_page))
        .route(
            "/users/busy/playlists",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "7")]) }),
        )
        .route(
            "/users/broken/playlists",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
}

#[tokio::test]
async fn test_unauthorized_response() {
    let base = serve(stub_api()).await;

    let result = get_json::<UserProfile>(&Client::new(), &format!("{}/me", base), "token").await;

    assert!(matches!(result, Err(FetchError::Unauthorized)));
}

#[tokio::test]
async fn test_rate_limited_response_carries_retry_after() {
    let base = serve(stub_api()).await;
    let source = UserPlaylists::with_api_url(base, "busy");

    let result = source.fetch_page("token", 0, 20).await;

    assert!(matches!(
        result,
        Err(FetchError::RateLimited {
            retry_after: Some(7)
        })
    ));
}

#[tokio::test]
async fn test_other_error_status() {
    let base = serve(stub_api()).await;
    let source = UserPlaylists::with_api_url(base, "broken");

    match source.fetch_page("token", 0, 20).await {
        Err(FetchError::Http(e)) => {
            assert_eq!(e.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
        }
        other => panic!("unexpected result: {:?}", other.map(|page| page.items.len())),
    }
}

#[tokio::test]
async fn test_playlists_page_is_decoded() {
    let base = serve(stub_api()).await;
    let source = UserPlaylists::with_api_url(base, "alice");

    let page = source.fetch_page("token", 20, 20).await.unwrap();

    assert_eq!(page.total, 21);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "p20");
    assert_eq!(page.items[0].owner_name(), "Alice");
}
