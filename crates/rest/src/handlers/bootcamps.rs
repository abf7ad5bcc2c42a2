//! Bootcamp handlers.
//!
//! `GET /bootcamps` and `GET /bootcamps/{id}` are public. Creating requires
//! the publisher or admin role; updates and deletes require ownership or
//! admin.

use axum::extract::{Path, State};
use devcamper_persistence::{DocumentStore, Filter};
use tracing::{debug, info};

use super::listing::advanced_list;
use super::records::{
    build_record, delete_record, ensure_valid, fetch_live, insert_record, save_record,
};
use crate::auth::Role;
use crate::error::{RestError, RestResult};
use crate::extractors::{AdvancedQuery, CurrentUser, JsonBody, record_id};
use crate::models::{Bootcamp, Entity};
use crate::responses::Envelope;
use crate::state::AppState;

/// Body keys clients cannot write.
const PROTECTED: [&str; 5] = ["user", "slug", "location", "averageRating", "averageCost"];

/// Roles allowed to publish.
const PUBLISHERS: [Role; 2] = [Role::Publisher, Role::Admin];

/// `GET /bootcamps`
pub async fn list_bootcamps<S>(
    State(state): State<AppState<S>>,
    AdvancedQuery(params): AdvancedQuery,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    advanced_list::<Bootcamp, S>(&state, &params, None).await
}

/// `GET /bootcamps/{id}`
pub async fn get_bootcamp<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let id = record_id::<Bootcamp>(&id)?;
    debug!(bootcamp_id = %id, "Processing get bootcamp request");
    let bootcamp: Bootcamp = fetch_live(&state, &id).await?;
    Ok(Envelope::ok(bootcamp.to_response()?))
}

/// `POST /bootcamps`
pub async fn create_bootcamp<S>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&PUBLISHERS)?;
    debug!(user_id = %current.id(), "Processing create bootcamp request");

    if !current.is_admin() {
        let owned = Filter::live().with("user", current.id());
        if state.storage().exists(Bootcamp::COLLECTION, &owned).await? {
            return Err(RestError::bad_request(format!(
                "the user with id {} has already published a bootcamp",
                current.id()
            )));
        }
    }

    let mut bootcamp: Bootcamp = build_record(None, body, &PROTECTED)?;
    bootcamp.user = current.id().to_string();
    bootcamp.normalize();
    ensure_valid(bootcamp.validate(true))?;
    ensure_unique_name(&state, &bootcamp).await?;
    locate(&state, &mut bootcamp).await?;

    let bootcamp = insert_record(&state, &bootcamp).await?;
    info!(bootcamp_id = %bootcamp.id, name = %bootcamp.name, "Bootcamp created");
    Ok(Envelope::created(bootcamp.to_response()?))
}

/// `PUT /bootcamps/{id}`
pub async fn update_bootcamp<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let id = record_id::<Bootcamp>(&id)?;
    debug!(bootcamp_id = %id, user_id = %current.id(), "Processing update bootcamp request");

    let existing: Bootcamp = fetch_live(&state, &id).await?;
    current.authorize_owner(&existing.user)?;

    let readdressed = body.contains_key("address");
    let mut bootcamp = build_record(Some(&existing), body, &PROTECTED)?;
    bootcamp.normalize();
    ensure_valid(bootcamp.validate(false))?;
    if bootcamp.name != existing.name {
        ensure_unique_name(&state, &bootcamp).await?;
    }
    if readdressed {
        locate(&state, &mut bootcamp).await?;
    }

    let bootcamp = save_record(&state, &bootcamp).await?;
    Ok(Envelope::ok(bootcamp.to_response()?))
}

/// `DELETE /bootcamps/{id}`
pub async fn delete_bootcamp<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let id = record_id::<Bootcamp>(&id)?;
    debug!(bootcamp_id = %id, user_id = %current.id(), "Processing delete bootcamp request");

    let bootcamp: Bootcamp = fetch_live(&state, &id).await?;
    current.authorize_owner(&bootcamp.user)?;
    delete_record(&state, &bootcamp).await?;
    info!(bootcamp_id = %id, "Bootcamp deleted");
    Ok(Envelope::empty())
}

/// Rejects a name already used by another live bootcamp.
async fn ensure_unique_name<S: DocumentStore>(
    state: &AppState<S>,
    bootcamp: &Bootcamp,
) -> RestResult<()> {
    let filter = Filter::live().with("name", bootcamp.name.as_str());
    match state.storage().find_one(Bootcamp::COLLECTION, &filter).await? {
        Some(other) if other.id() != bootcamp.id => {
            Err(RestError::bad_request("duplicate field value entered"))
        }
        _ => Ok(()),
    }
}

/// Geocodes the address into `location` when a geocoder is configured.
///
/// The raw address is dropped once located.
async fn locate<S: DocumentStore>(state: &AppState<S>, bootcamp: &mut Bootcamp) -> RestResult<()> {
    let Some(geocoder) = state.geocoder() else {
        return Ok(());
    };
    let Some(address) = bootcamp.address.as_deref().filter(|a| !a.trim().is_empty()) else {
        return Ok(());
    };
    let location = geocoder.geocode(address).await?;
    bootcamp.location = Some(location);
    bootcamp.address = None;
    Ok(())
}
