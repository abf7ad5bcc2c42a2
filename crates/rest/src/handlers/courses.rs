//! Course handlers.

use axum::extract::{Path, State};
use devcamper_persistence::DocumentStore;
use tracing::{debug, info};

use super::aggregates::refresh_average_cost;
use super::listing::{Scope, advanced_list};
use super::records::{
    build_record, delete_record, ensure_valid, fetch_live, insert_record, save_record,
};
use crate::auth::Role;
use crate::error::RestResult;
use crate::extractors::{AdvancedQuery, CurrentUser, JsonBody, record_id};
use crate::models::{Bootcamp, Course, Entity};
use crate::responses::Envelope;
use crate::state::AppState;

const PROTECTED: [&str; 2] = ["bootcamp", "user"];

const PUBLISHERS: [Role; 2] = [Role::Publisher, Role::Admin];

/// `GET /courses`
pub async fn list_courses<S>(
    State(state): State<AppState<S>>,
    AdvancedQuery(params): AdvancedQuery,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    advanced_list::<Course, S>(&state, &params, None).await
}

/// `GET /bootcamps/{id}/courses`
pub async fn list_bootcamp_courses<S>(
    State(state): State<AppState<S>>,
    Path(bootcamp_id): Path<String>,
    AdvancedQuery(params): AdvancedQuery,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let bootcamp_id = record_id::<Bootcamp>(&bootcamp_id)?;
    let _: Bootcamp = fetch_live(&state, &bootcamp_id).await?;
    let scope = Scope {
        field: "bootcamp",
        value: &bootcamp_id,
    };
    advanced_list::<Course, S>(&state, &params, Some(scope)).await
}

/// `GET /courses/{id}`
pub async fn get_course<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let id = record_id::<Course>(&id)?;
    debug!(course_id = %id, "Processing get course request");
    let course: Course = fetch_live(&state, &id).await?;
    Ok(Envelope::ok(course.to_response()?))
}

/// `POST /bootcamps/{id}/courses`
pub async fn create_course<S>(
    State(state): State<AppState<S>>,
    Path(bootcamp_id): Path<String>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&PUBLISHERS)?;
    let bootcamp_id = record_id::<Bootcamp>(&bootcamp_id)?;
    debug!(bootcamp_id = %bootcamp_id, user_id = %current.id(), "Processing create course request");

    let bootcamp: Bootcamp = fetch_live(&state, &bootcamp_id).await?;
    current.authorize_owner(&bootcamp.user)?;

    let mut course: Course = build_record(None, body, &PROTECTED)?;
    course.bootcamp = bootcamp.id;
    course.user = current.id().to_string();
    ensure_valid(course.validate())?;

    let course = insert_record(&state, &course).await?;
    refresh_average_cost(&state, &course.bootcamp).await?;
    info!(course_id = %course.id, bootcamp_id = %course.bootcamp, "Course created");
    Ok(Envelope::created(course.to_response()?))
}

/// `PUT /courses/{id}`
pub async fn update_course<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&PUBLISHERS)?;
    let id = record_id::<Course>(&id)?;
    debug!(course_id = %id, user_id = %current.id(), "Processing update course request");

    let existing: Course = fetch_live(&state, &id).await?;
    current.authorize_owner(&existing.user)?;

    let course = build_record(Some(&existing), body, &PROTECTED)?;
    ensure_valid(course.validate())?;

    let course = save_record(&state, &course).await?;
    refresh_average_cost(&state, &course.bootcamp).await?;
    Ok(Envelope::ok(course.to_response()?))
}

/// `DELETE /courses/{id}`
pub async fn delete_course<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&PUBLISHERS)?;
    let id = record_id::<Course>(&id)?;
    debug!(course_id = %id, user_id = %current.id(), "Processing delete course request");

    let course: Course = fetch_live(&state, &id).await?;
    current.authorize_owner(&course.user)?;
    delete_record(&state, &course).await?;
    refresh_average_cost(&state, &course.bootcamp).await?;
    Ok(Envelope::empty())
}
