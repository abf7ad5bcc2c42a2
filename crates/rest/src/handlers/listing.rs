//! Advanced listing.
//!
//! Shared by every `GET` collection route that accepts advanced queries:
//! the raw query string is compiled, the pagination total counted, the page
//! fetched and, when `select` is present, projected.

use devcamper_persistence::query::{RawParameters, project};
use devcamper_persistence::{DocumentStore, FilterValue};
use serde_json::Value;
use tracing::debug;

use crate::error::RestResult;
use crate::models::Entity;
use crate::responses::Envelope;
use crate::state::AppState;

/// Restricts a listing to records whose `field` equals `value`.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Field to match.
    pub field: &'a str,
    /// Required value.
    pub value: &'a str,
}

/// Runs an advanced query against `T`'s collection.
pub async fn advanced_list<T, S>(
    state: &AppState<S>,
    params: &RawParameters,
    scope: Option<Scope<'_>>,
) -> RestResult<Envelope>
where
    T: Entity,
    S: DocumentStore,
{
    let mut compiled = state.compiler().compile(params)?;
    if let Some(scope) = scope {
        compiled = compiled.scoped(scope.field, FilterValue::from(scope.value));
    }

    debug!(
        collection = T::COLLECTION,
        filter = %compiled.filter.to_json(),
        page = compiled.options.page,
        limit = compiled.options.limit,
        "Processing advanced list request"
    );

    let storage = state.storage();
    let total = storage
        .count(T::COLLECTION, &compiled.count_filter(state.count_mode()))
        .await?;

    // `select` is applied to typed records; field names match case-insensitively.
    let mut options = compiled.find_options();
    options.projection = None;
    let documents = storage.find(T::COLLECTION, &compiled.filter, &options).await?;
    let records = documents
        .into_iter()
        .map(T::from_document)
        .collect::<RestResult<Vec<T>>>()?;

    let data = match compiled.selected_fields() {
        Some(fields) => project(&records, fields)
            .into_iter()
            .map(Value::Object)
            .collect(),
        None => records
            .iter()
            .map(Entity::to_response)
            .collect::<RestResult<Vec<Value>>>()?,
    };

    Ok(Envelope::list(data).paginated(compiled.paginate(total)))
}
