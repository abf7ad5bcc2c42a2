//! Review handlers.

use axum::extract::{Path, State};
use devcamper_persistence::{DocumentStore, Filter, FindOptions, QueryOptions, SortDirective};
use serde_json::Value;
use tracing::{debug, info};

use super::aggregates::refresh_average_rating;
use super::listing::advanced_list;
use super::records::{
    build_record, delete_record, ensure_valid, fetch_live, insert_record, save_record,
};
use crate::auth::Role;
use crate::error::RestResult;
use crate::extractors::{AdvancedQuery, CurrentUser, JsonBody, record_id};
use crate::models::{Bootcamp, Entity, Review};
use crate::responses::Envelope;
use crate::state::AppState;

const PROTECTED: [&str; 2] = ["bootcamp", "user"];

const REVIEWERS: [Role; 2] = [Role::User, Role::Admin];

/// `GET /reviews`
pub async fn list_reviews<S>(
    State(state): State<AppState<S>>,
    AdvancedQuery(params): AdvancedQuery,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    advanced_list::<Review, S>(&state, &params, None).await
}

/// `GET /bootcamps/{id}/reviews`
///
/// A plain list of the bootcamp's live reviews, newest first.
pub async fn list_bootcamp_reviews<S>(
    State(state): State<AppState<S>>,
    Path(bootcamp_id): Path<String>,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let bootcamp_id = record_id::<Bootcamp>(&bootcamp_id)?;
    debug!(bootcamp_id = %bootcamp_id, "Processing list bootcamp reviews request");
    let _: Bootcamp = fetch_live(&state, &bootcamp_id).await?;

    let filter = Filter::live().with("bootcamp", bootcamp_id.as_str());
    let options = FindOptions::new().sort(SortDirective::parse_list(QueryOptions::DEFAULT_SORT));
    let reviews = state
        .storage()
        .find(Review::COLLECTION, &filter, &options)
        .await?
        .into_iter()
        .map(|doc| Review::from_document(doc)?.to_response())
        .collect::<RestResult<Vec<Value>>>()?;
    Ok(Envelope::list(reviews))
}

/// `GET /reviews/{id}`
pub async fn get_review<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let id = record_id::<Review>(&id)?;
    debug!(review_id = %id, "Processing get review request");
    let review: Review = fetch_live(&state, &id).await?;
    Ok(Envelope::ok(review.to_response()?))
}

/// `POST /bootcamps/{id}/reviews`
pub async fn create_review<S>(
    State(state): State<AppState<S>>,
    Path(bootcamp_id): Path<String>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&REVIEWERS)?;
    let bootcamp_id = record_id::<Bootcamp>(&bootcamp_id)?;
    debug!(bootcamp_id = %bootcamp_id, user_id = %current.id(), "Processing create review request");

    let bootcamp: Bootcamp = fetch_live(&state, &bootcamp_id).await?;

    let mut review: Review = build_record(None, body, &PROTECTED)?;
    review.bootcamp = bootcamp.id;
    review.user = current.id().to_string();
    ensure_valid(review.validate())?;

    let review = insert_record(&state, &review).await?;
    refresh_average_rating(&state, &review.bootcamp).await?;
    info!(review_id = %review.id, bootcamp_id = %review.bootcamp, "Review created");
    Ok(Envelope::created(review.to_response()?))
}

/// `PUT /reviews/{id}`
pub async fn update_review<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&REVIEWERS)?;
    let id = record_id::<Review>(&id)?;
    debug!(review_id = %id, user_id = %current.id(), "Processing update review request");

    let existing: Review = fetch_live(&state, &id).await?;
    current.authorize_owner(&existing.user)?;

    let review = build_record(Some(&existing), body, &PROTECTED)?;
    ensure_valid(review.validate())?;

    let review = save_record(&state, &review).await?;
    refresh_average_rating(&state, &review.bootcamp).await?;
    Ok(Envelope::ok(review.to_response()?))
}

/// `DELETE /reviews/{id}`
pub async fn delete_review<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&REVIEWERS)?;
    let id = record_id::<Review>(&id)?;
    debug!(review_id = %id, user_id = %current.id(), "Processing delete review request");

    let review: Review = fetch_live(&state, &id).await?;
    current.authorize_owner(&review.user)?;
    delete_record(&state, &review).await?;
    refresh_average_rating(&state, &review.bootcamp).await?;
    Ok(Envelope::empty())
}
