use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use mirror_api::{AppStateInner, router};
use mirror_db::Database;

fn setup() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(&dir.path().join("api.db"), 2).unwrap();
    (router(AppStateInner::new(db)), dir)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    ip: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ip) = ip {
        builder = builder.header("x-forwarded-for", ip);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_note(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, "POST", "/api/notes", Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

async fn create_sticker(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, "POST", "/api/wall/stickers", Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn root_and_health_respond() {
    let (app, _dir) = setup();

    let (status, json) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");

    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn anonymous_note_ignores_supplied_name() {
    let (app, _dir) = setup();
    let id = create_note(
        &app,
        json!({ "content": "test", "author_type": "anonymous", "author_name": "Bob" }),
    )
    .await;

    let (status, json) = send(&app, "GET", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["author_name"], "Anonymous");
    assert_eq!(json["data"]["author_type"], "anonymous");
    assert_eq!(json["data"]["like_count"], 0);
    assert_eq!(json["data"]["helped_count"], 0);
}

#[tokio::test]
async fn note_validation_errors_are_400() {
    let (app, _dir) = setup();

    let (status, json) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({ "content": "  " })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Content is required");

    let long = "x".repeat(1001);
    let (status, _) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({ "content": long })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({ "content": 5 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn missing_note_is_404_and_bad_id_is_400() {
    let (app, _dir) = setup();

    let (status, json) = send(&app, "GET", "/api/notes/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Note not found");

    let (status, _) = send(&app, "GET", "/api/notes/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notes_list_with_count() {
    let (app, _dir) = setup();
    let first = create_note(&app, json!({ "content": "first" })).await;
    let second = create_note(&app, json!({ "content": "second" })).await;

    let (status, json) = send(&app, "GET", "/api/notes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["id"], second);
    assert_eq!(json["data"][1]["id"], first);
}

#[tokio::test]
async fn like_once_per_caller() {
    let (app, _dir) = setup();
    let id = create_note(&app, json!({ "content": "hang in there" })).await;
    let like = format!("/api/notes/{id}/like");

    let (status, json) = send(&app, "POST", &like, None, Some("203.0.113.5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Liked successfully");

    let (status, json) = send(&app, "POST", &like, None, Some("203.0.113.5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Already liked");

    let (_, json) = send(&app, "GET", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(json["data"]["like_count"], 1);
    assert_eq!(json["data"]["helped_count"], 1);

    let (_, json) = send(
        &app,
        "GET",
        &format!("/api/notes/{id}/liked"),
        None,
        Some("203.0.113.5"),
    )
    .await;
    assert_eq!(json["data"]["liked"], true);
    let (_, json) = send(
        &app,
        "GET",
        &format!("/api/notes/{id}/liked"),
        None,
        Some("203.0.113.6"),
    )
    .await;
    assert_eq!(json["data"]["liked"], false);

    let (_, json) = send(&app, "GET", "/api/user/likes", None, Some("203.0.113.5")).await;
    assert_eq!(json["data"]["liked_notes"], json!([id]));
}

#[tokio::test]
async fn unlike_restores_and_floors_counters() {
    let (app, _dir) = setup();
    let id = create_note(&app, json!({ "content": "n" })).await;
    let like = format!("/api/notes/{id}/like");

    send(&app, "POST", &like, None, Some("203.0.113.5")).await;
    let (_, json) = send(&app, "DELETE", &like, None, Some("203.0.113.5")).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Unliked successfully");

    for _ in 0..2 {
        let (status, json) = send(&app, "DELETE", &like, None, Some("203.0.113.5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "No like found to remove");
    }

    let (_, json) = send(&app, "GET", &format!("/api/notes/{id}"), None, None).await;
    assert_eq!(json["data"]["like_count"], 0);
    assert_eq!(json["data"]["helped_count"], 0);
}

#[tokio::test]
async fn liking_missing_note_is_404() {
    let (app, _dir) = setup();
    let (status, _) = send(&app, "POST", "/api/notes/77/like", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sticker_intensity_is_clamped_at_the_boundary() {
    let (app, _dir) = setup();
    let id = create_sticker(
        &app,
        json!({ "text": "racing heart", "type": "mystery", "intensity": 9, "position_x": 12.5 }),
    )
    .await;

    let (status, json) = send(&app, "GET", &format!("/api/wall/stickers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["intensity"], 5);
    assert_eq!(json["data"]["type"], "anxiety");
    assert_eq!(json["data"]["position_x"], 12.5);
    assert_eq!(json["data"]["category"], "general");
}

#[tokio::test]
async fn sticker_text_is_required() {
    let (app, _dir) = setup();
    let (status, json) = send(
        &app,
        "POST",
        "/api/wall/stickers",
        Some(json!({ "text": "" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn sticker_position_and_delete() {
    let (app, _dir) = setup();
    let id = create_sticker(&app, json!({ "text": "shaky hands" })).await;
    let position = format!("/api/wall/stickers/{id}/position");

    let (status, _) = send(
        &app,
        "PUT",
        &position,
        Some(json!({ "position_x": 40.0, "position_y": 60.0, "rotation": -8.0 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        &position,
        Some(json!({ "position_x": 41.0, "position_y": 61.0 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "GET", &format!("/api/wall/stickers/{id}"), None, None).await;
    assert_eq!(json["data"]["position_x"], 41.0);
    assert_eq!(json["data"]["position_y"], 61.0);
    assert_eq!(json["data"]["rotation"], -8.0);

    let (status, _) = send(&app, "DELETE", &format!("/api/wall/stickers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/wall/stickers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "PUT",
        &position,
        Some(json!({ "position_x": 1.0, "position_y": 1.0 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filter_treats_support_as_type() {
    let (app, _dir) = setup();
    let support = create_sticker(
        &app,
        json!({ "text": "you got this", "type": "support", "category": "fear" }),
    )
    .await;
    let fear3 = create_sticker(
        &app,
        json!({ "text": "a", "category": "fear", "intensity": 3 }),
    )
    .await;
    create_sticker(&app, json!({ "text": "b", "category": "fear", "intensity": 4 })).await;
    create_sticker(&app, json!({ "text": "c", "category": "support", "intensity": 3 })).await;

    let (status, json) = send(
        &app,
        "GET",
        "/api/wall/stickers/filter?category=support&intensity=all",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["id"], support);

    let (_, json) = send(
        &app,
        "GET",
        "/api/wall/stickers/filter?category=fear&intensity=3",
        None,
        None,
    )
    .await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["id"], fear3);

    let (_, json) = send(&app, "GET", "/api/wall/stickers/filter", None, None).await;
    assert_eq!(json["count"], 4);

    let (status, _) = send(
        &app,
        "GET",
        "/api/wall/stickers/filter?intensity=high",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn connections_are_unordered_pairs() {
    let (app, _dir) = setup();
    let a = create_sticker(&app, json!({ "text": "a" })).await;
    let b = create_sticker(&app, json!({ "text": "b" })).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/wall/connections",
        Some(json!({ "sticker1_id": a, "sticker2_id": b })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);

    let (status, json) = send(
        &app,
        "POST",
        "/api/wall/connections",
        Some(json!({ "sticker1_id": b, "sticker2_id": a })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Connection already exists");

    let (_, json) = send(&app, "GET", "/api/wall/connections", None, None).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["sticker1_id"], a);

    let (_, json) = send(
        &app,
        "DELETE",
        "/api/wall/connections",
        Some(json!({ "sticker1_id": b, "sticker2_id": a })),
        None,
    )
    .await;
    assert_eq!(json["success"], true);

    let (_, json) = send(&app, "GET", "/api/wall/connections", None, None).await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn connection_self_loop_and_missing_sticker() {
    let (app, _dir) = setup();
    let a = create_sticker(&app, json!({ "text": "a" })).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/wall/connections",
        Some(json!({ "sticker1_id": a, "sticker2_id": a })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/wall/connections",
        Some(json!({ "sticker1_id": a, "sticker2_id": a + 1 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reaction_counts_aggregate_per_caller() {
    let (app, _dir) = setup();
    let id = create_sticker(&app, json!({ "text": "can't sleep" })).await;
    let reactions = format!("/api/wall/stickers/{id}/reactions");

    let (_, json) = send(
        &app,
        "POST",
        &reactions,
        Some(json!({ "reaction_type": "same" })),
        Some("198.51.100.1"),
    )
    .await;
    assert_eq!(json["success"], true);
    send(
        &app,
        "POST",
        &reactions,
        Some(json!({ "reaction_type": "great" })),
        Some("198.51.100.1"),
    )
    .await;
    send(
        &app,
        "POST",
        &reactions,
        Some(json!({ "reaction_type": "great" })),
        Some("198.51.100.2"),
    )
    .await;

    let (status, json) = send(
        &app,
        "POST",
        &reactions,
        Some(json!({ "reaction_type": "great" })),
        Some("198.51.100.2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Already reacted");

    let (_, json) = send(&app, "GET", &reactions, None, None).await;
    assert_eq!(json["data"], json!({ "same": 1, "great": 2 }));

    let (_, json) = send(&app, "GET", &format!("/api/wall/stickers/{id}"), None, None).await;
    assert_eq!(json["data"]["same_count"], 0);
    assert_eq!(json["data"]["great_count"], 0);

    let (_, json) = send(&app, "GET", "/api/wall/user/reactions", None, Some("198.51.100.1")).await;
    assert_eq!(json["data"][id.to_string()], json!(["same", "great"]));

    let (_, json) = send(
        &app,
        "DELETE",
        &reactions,
        Some(json!({ "reaction_type": "same" })),
        Some("198.51.100.1"),
    )
    .await;
    assert_eq!(json["success"], true);
    let (_, json) = send(
        &app,
        "DELETE",
        &reactions,
        Some(json!({ "reaction_type": "same" })),
        Some("198.51.100.1"),
    )
    .await;
    assert_eq!(json["success"], false);

    let (_, json) = send(&app, "GET", &reactions, None, None).await;
    assert_eq!(json["data"], json!({ "same": 0, "great": 2 }));
}

#[tokio::test]
async fn invalid_reaction_type_is_400() {
    let (app, _dir) = setup();
    let id = create_sticker(&app, json!({ "text": "x" })).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/wall/stickers/{id}/reactions"),
        Some(json!({ "reaction_type": "love" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (app, _dir) = setup();
    let (status, json) = send(&app, "GET", "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}
