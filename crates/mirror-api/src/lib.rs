//! HTTP layer for the wall: routing, caller identity, and error mapping.

pub mod connections;
pub mod error;
pub mod extract;
pub mod notes;
pub mod reactions;
pub mod service;
pub mod state;
pub mod stickers;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let note_routes = Router::new()
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/notes/{id}", get(notes::get_note))
        .route(
            "/api/notes/{id}/like",
            post(notes::like_note).delete(notes::unlike_note),
        )
        .route("/api/notes/{id}/liked", get(notes::check_note_liked))
        .route("/api/user/likes", get(notes::get_user_likes));

    let wall_routes = Router::new()
        .route(
            "/api/wall/stickers",
            get(stickers::list_stickers).post(stickers::create_sticker),
        )
        .route("/api/wall/stickers/filter", get(stickers::filter_stickers))
        .route(
            "/api/wall/stickers/{id}",
            get(stickers::get_sticker).delete(stickers::delete_sticker),
        )
        .route("/api/wall/stickers/{id}/position", put(stickers::update_position))
        .route(
            "/api/wall/stickers/{id}/reactions",
            get(reactions::get_reaction_counts)
                .post(reactions::add_reaction)
                .delete(reactions::remove_reaction),
        )
        .route(
            "/api/wall/connections",
            get(connections::list_connections)
                .post(connections::create_connection)
                .delete(connections::delete_connection),
        )
        .route("/api/wall/user/reactions", get(reactions::get_user_reactions));

    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .merge(note_routes)
        .merge(wall_routes)
        .fallback(service::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
