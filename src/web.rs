//! HTTP surface: CRUD routes for destinations and reviews.
//!
//! Every mutating handler follows the same strict order: resolve the record
//! (404 fails closed), validate the payload (422 before any side effect),
//! store uploads, then touch the database. A rejected request never leaves
//! an orphaned blob or a half-written row.

use crate::blob::{self, BlobStore};
use crate::describe::DescriptionGenerator;
use crate::entities;
use crate::errors::{ApiError, Resource};
use crate::settings::Settings;
use crate::storage;
use crate::validate::{self, RawPayload, Upload};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use miette::IntoDiagnostic;
use sea_orm::{DatabaseConnection, EntityTrait, PrimaryKeyTrait};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseConnection,
    pub blobs: Arc<BlobStore>,
    pub describer: Arc<DescriptionGenerator>,
}

pub fn router(state: AppState) -> Router {
    let uploads_dir = state.blobs.root().to_path_buf();
    Router::new()
        .route("/destinations", get(list_destinations).post(create_destination))
        .route(
            "/destinations/{id}",
            get(show_destination)
                .put(update_destination)
                .patch(update_destination)
                .delete(destroy_destination),
        )
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/{id}",
            get(show_review)
                .put(update_review)
                .patch(update_review)
                .delete(destroy_review),
        )
        .route("/reviews-home", get(reviews_home))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
}

pub async fn serve(settings: Settings, db: DatabaseConnection) -> miette::Result<()> {
    let state = AppState {
        blobs: Arc::new(BlobStore::new(&settings.uploads.root)),
        describer: Arc::new(DescriptionGenerator::new()),
        settings: Arc::new(settings),
        db,
    };

    let addr: SocketAddr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    )
    .parse()
    .map_err(|e| miette::miette!("bad listen addr: {e}"))?;

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await.into_diagnostic()?;
    tracing::info!(%addr, "API listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": resource.not_found_message() })),
            )
                .into_response(),
            ApiError::Multipart(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": detail })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error." })),
                )
                    .into_response()
            }
        }
    }
}

/// Shared lookup-or-404 for show/update/destroy. A non-numeric id fails the
/// same way a missing row does: the resource-specific 404.
async fn find_or_404<E>(
    db: &DatabaseConnection,
    raw_id: &str,
    resource: Resource,
) -> Result<E::Model, ApiError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let id: i32 = raw_id.parse().map_err(|_| ApiError::NotFound(resource))?;
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound(resource))
}

async fn read_payload(mut multipart: Multipart) -> Result<RawPayload, ApiError> {
    let mut payload = RawPayload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Multipart(e.to_string()))?;
            payload.uploads.insert(
                name,
                Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::Multipart(e.to_string()))?;
            payload.values.insert(name, text);
        }
    }
    Ok(payload)
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    name: Option<String>,
}

async fn list_destinations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let rows = storage::list_destinations(&state.db, query.name.as_deref()).await?;
    if query.name.is_some() && rows.is_empty() {
        return Err(ApiError::NotFound(Resource::Destination));
    }
    Ok(Json(rows).into_response())
}

async fn create_destination(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let payload = read_payload(multipart).await?;
    let valid = validate::destination_create(payload).map_err(ApiError::Validation)?;

    let photo_1 = state.blobs.store(blob::DESTINATION_PHOTOS, &valid.photo_1)?;
    let photo_2 = state.blobs.store(blob::DESTINATION_PHOTOS, &valid.photo_2)?;
    let description = match valid.description {
        Some(text) => text,
        None => state.describer.generate(&valid.name),
    };

    let created = storage::create_destination(
        &state.db,
        storage::NewDestination {
            photo_1,
            photo_2,
            name: valid.name,
            price: valid.price,
            meta_description: valid.meta_description,
            description,
        },
    )
    .await?;
    tracing::info!(id = created.id, name = %created.name, "destination created");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn show_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let row = find_or_404::<entities::Destination>(&state.db, &id, Resource::Destination).await?;
    Ok(Json(row).into_response())
}

async fn update_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let stored =
        find_or_404::<entities::Destination>(&state.db, &id, Resource::Destination).await?;
    let payload = read_payload(multipart).await?;
    let changes = validate::destination_update(payload).map_err(ApiError::Validation)?;

    let patch = storage::DestinationPatch {
        photo_1: store_photo(&state, blob::DESTINATION_PHOTOS, changes.photo_1)?,
        photo_2: store_photo(&state, blob::DESTINATION_PHOTOS, changes.photo_2)?,
        name: changes.name,
        price: changes.price,
        meta_description: changes.meta_description,
        description: changes.description,
    };
    let updated = storage::update_destination(&state.db, stored, patch).await?;
    Ok(Json(updated).into_response())
}

async fn destroy_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let stored =
        find_or_404::<entities::Destination>(&state.db, &id, Resource::Destination).await?;
    storage::delete_destination(&state.db, stored).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let rows = storage::list_reviews(&state.db, query.name.as_deref()).await?;
    if query.name.is_some() && rows.is_empty() {
        return Err(ApiError::NotFound(Resource::Review));
    }
    Ok(Json(rows).into_response())
}

async fn reviews_home(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = storage::sample_reviews(&state.db, 3).await?;
    Ok(Json(rows).into_response())
}

async fn create_review(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let payload = read_payload(multipart).await?;
    let valid = validate::review_create(payload).map_err(ApiError::Validation)?;

    let photo = state.blobs.store(blob::REVIEW_PHOTOS, &valid.photo)?;
    let created = storage::create_review(
        &state.db,
        storage::NewReview {
            photo,
            review: valid.review,
            user_name: valid.user_name,
        },
    )
    .await?;
    tracing::info!(id = created.id, user_name = %created.user_name, "review created");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn show_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let row = find_or_404::<entities::Review>(&state.db, &id, Resource::Review).await?;
    Ok(Json(row).into_response())
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let stored = find_or_404::<entities::Review>(&state.db, &id, Resource::Review).await?;
    let payload = read_payload(multipart).await?;
    let changes = validate::review_update(payload).map_err(ApiError::Validation)?;

    let patch = storage::ReviewPatch {
        photo: store_photo(&state, blob::REVIEW_PHOTOS, changes.photo)?,
        review: changes.review,
        user_name: changes.user_name,
    };
    let updated = storage::update_review(&state.db, stored, patch).await?;
    Ok(Json(updated).into_response())
}

async fn destroy_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let stored = find_or_404::<entities::Review>(&state.db, &id, Resource::Review).await?;
    storage::delete_review(&state.db, stored).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn store_photo(
    state: &AppState,
    namespace: &str,
    upload: Option<Upload>,
) -> Result<Option<String>, ApiError> {
    upload
        .map(|upload| state.blobs.store(namespace, &upload))
        .transpose()
}
