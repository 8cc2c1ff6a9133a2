//! Record-store access for destinations and reviews.
//!
//! Thin sea-orm layer: one insert/list/update/delete set per resource.
//! Lookups that feed the 404 policy live in the web layer; this module only
//! reports what the database holds.

use crate::entities;
use crate::errors::ApiError;
use crate::settings::Database as DbCfg;
use chrono::Utc;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

pub async fn init(cfg: &DbCfg) -> Result<DatabaseConnection, ApiError> {
    let db = Database::connect(&cfg.url).await?;
    Ok(db)
}

#[derive(Debug, Clone)]
pub struct NewDestination {
    pub photo_1: String,
    pub photo_2: String,
    pub name: String,
    pub price: f64,
    pub meta_description: String,
    pub description: String,
}

/// Supplied-field patch; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct DestinationPatch {
    pub photo_1: Option<String>,
    pub photo_2: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub meta_description: Option<String>,
    pub description: Option<String>,
}

pub async fn create_destination(
    db: &DatabaseConnection,
    input: NewDestination,
) -> Result<entities::destination::Model, ApiError> {
    let now = Utc::now().timestamp();
    let row = entities::destination::ActiveModel {
        photo_1: Set(input.photo_1),
        photo_2: Set(input.photo_2),
        name: Set(input.name),
        price: Set(input.price),
        meta_description: Set(input.meta_description),
        description: Set(input.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Lists destinations in insertion order, optionally narrowed to names
/// containing the filter (case-insensitive for ASCII per SQL `LIKE`).
pub async fn list_destinations(
    db: &DatabaseConnection,
    name: Option<&str>,
) -> Result<Vec<entities::destination::Model>, ApiError> {
    use entities::destination::{Column, Entity};

    let mut query = Entity::find().order_by_asc(Column::Id);
    if let Some(name) = name {
        query = query.filter(Column::Name.contains(name));
    }
    Ok(query.all(db).await?)
}

pub async fn update_destination(
    db: &DatabaseConnection,
    stored: entities::destination::Model,
    patch: DestinationPatch,
) -> Result<entities::destination::Model, ApiError> {
    let mut row: entities::destination::ActiveModel = stored.into();
    if let Some(photo_1) = patch.photo_1 {
        row.photo_1 = Set(photo_1);
    }
    if let Some(photo_2) = patch.photo_2 {
        row.photo_2 = Set(photo_2);
    }
    if let Some(name) = patch.name {
        row.name = Set(name);
    }
    if let Some(price) = patch.price {
        row.price = Set(price);
    }
    if let Some(meta_description) = patch.meta_description {
        row.meta_description = Set(meta_description);
    }
    if let Some(description) = patch.description {
        row.description = Set(description);
    }
    row.updated_at = Set(Utc::now().timestamp());
    Ok(row.update(db).await?)
}

pub async fn delete_destination(
    db: &DatabaseConnection,
    stored: entities::destination::Model,
) -> Result<(), ApiError> {
    stored.delete(db).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub photo: String,
    pub review: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub photo: Option<String>,
    pub review: Option<String>,
    pub user_name: Option<String>,
}

pub async fn create_review(
    db: &DatabaseConnection,
    input: NewReview,
) -> Result<entities::review::Model, ApiError> {
    let now = Utc::now().timestamp();
    let row = entities::review::ActiveModel {
        photo: Set(input.photo),
        review: Set(input.review),
        user_name: Set(input.user_name),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

pub async fn list_reviews(
    db: &DatabaseConnection,
    name: Option<&str>,
) -> Result<Vec<entities::review::Model>, ApiError> {
    use entities::review::{Column, Entity};

    let mut query = Entity::find().order_by_asc(Column::Id);
    if let Some(name) = name {
        query = query.filter(Column::UserName.contains(name));
    }
    Ok(query.all(db).await?)
}

/// Uniform sample without replacement, drawn fresh on every call.
pub async fn sample_reviews(
    db: &DatabaseConnection,
    count: usize,
) -> Result<Vec<entities::review::Model>, ApiError> {
    let mut rows = entities::Review::find().all(db).await?;
    rows.shuffle(&mut rand::thread_rng());
    rows.truncate(count);
    Ok(rows)
}

pub async fn update_review(
    db: &DatabaseConnection,
    stored: entities::review::Model,
    patch: ReviewPatch,
) -> Result<entities::review::Model, ApiError> {
    let mut row: entities::review::ActiveModel = stored.into();
    if let Some(photo) = patch.photo {
        row.photo = Set(photo);
    }
    if let Some(review) = patch.review {
        row.review = Set(review);
    }
    if let Some(user_name) = patch.user_name {
        row.user_name = Set(user_name);
    }
    row.updated_at = Set(Utc::now().timestamp());
    Ok(row.update(db).await?)
}

pub async fn delete_review(
    db: &DatabaseConnection,
    stored: entities::review::Model,
) -> Result<(), ApiError> {
    stored.delete(db).await?;
    Ok(())
}
