use std::sync::Arc;

use axum::{
    body::{boxed, Body},
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::{
    error::AppError,
    model::{NewNote, NewPerson, NotePatch, PersonPatch},
    request::*,
    response::ErrorResponse,
    AppState,
};

type Payload<T> = Result<Json<T>, JsonRejection>;

fn found<T: serde::Serialize>(entity: Option<T>) -> Response {
    match entity {
        Some(entity) => Json(entity).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn list_persons_handler(
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let persons = data.store.list_persons().await?;
    Ok(Json(persons))
}

pub async fn get_person_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let person = data.store.find_person(&id).await?;
    Ok(found(person))
}

pub async fn post_person_handler(
    State(data): State<Arc<AppState>>,
    body: Payload<PostPerson>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let (Some(name), Some(number)) = (body.name, body.number) else {
        return Err(AppError::ContentMissing);
    };
    let person = data.store.insert_person(NewPerson { name, number }).await?;
    Ok(Json(person))
}

pub async fn put_person_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Payload<PutPerson>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let patch = PersonPatch {
        name: body.name,
        number: body.number,
    };
    let person = data.store.update_person(&id, patch).await?;
    Ok(found(person))
}

pub async fn delete_person_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    data.store.delete_person(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_notes_handler(
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let notes = data.store.list_notes().await?;
    Ok(Json(notes))
}

pub async fn get_note_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let note = data.store.find_note(&id).await?;
    Ok(found(note))
}

pub async fn post_note_handler(
    State(data): State<Arc<AppState>>,
    body: Payload<PostNote>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let new_note = NewNote {
        content: body.content.unwrap_or_default(),
        important: body.important.unwrap_or(false),
        date: Utc::now(),
    };
    let note = data.store.insert_note(new_note).await?;
    Ok(Json(note))
}

pub async fn put_note_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Payload<PutNote>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let patch = NotePatch {
        content: body.content,
        important: body.important,
    };
    let note = data.store.update_note(&id, patch).await?;
    Ok(found(note))
}

pub async fn delete_note_handler(
    State(data): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    data.store.delete_note(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unknown_endpoint() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("unknown endpoint")),
    )
}

/// Last stop for unmatched paths: the prebuilt frontend, then 404.
pub async fn fallback_handler(
    State(data): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    if let Some(dir) = &data.static_dir {
        if matches!(*request.method(), Method::GET | Method::HEAD) {
            let response = match ServeDir::new(dir).oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };
            if response.status() != StatusCode::NOT_FOUND {
                return response.map(boxed);
            }
        }
    }
    unknown_endpoint().await.into_response()
}
