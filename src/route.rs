use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    handler::{
        delete_note_handler, delete_person_handler, fallback_handler, get_note_handler,
        get_person_handler, list_notes_handler, list_persons_handler, post_note_handler,
        post_person_handler, put_note_handler, put_person_handler, unknown_endpoint,
    },
    AppState,
};

/// Unregistered methods on a known path answer like unknown paths do, so the
/// fallbacks are attached per route as well as router-wide.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/persons",
            get(list_persons_handler)
                .post(post_person_handler)
                .fallback(unknown_endpoint),
        )
        .route(
            "/api/persons/:id",
            get(get_person_handler)
                .put(put_person_handler)
                .delete(delete_person_handler)
                .fallback(unknown_endpoint),
        )
        .route(
            "/api/notes",
            get(list_notes_handler)
                .post(post_note_handler)
                .fallback(unknown_endpoint),
        )
        .route(
            "/api/notes/:id",
            get(get_note_handler)
                .put(put_note_handler)
                .delete(delete_note_handler)
                .fallback(unknown_endpoint),
        )
        .fallback(fallback_handler)
        .with_state(app_state)
}
