//! Advanced query extractor.
//!
//! Collects the URL query string into [`RawParameters`], keeping repeated keys
//! and their order. Unlike `axum::extract::Query`, nothing is deserialized
//! here; bracketed keys are left for the query compiler.

use axum::{extract::FromRequestParts, http::request::Parts};
use devcamper_persistence::query::RawParameters;
use std::convert::Infallible;

/// Axum extractor for advanced-query parameters.
///
/// # Example
///
/// ```rust,ignore
/// use devcamper_rest::extractors::AdvancedQuery;
///
/// async fn list(AdvancedQuery(params): AdvancedQuery) {
///     for (key, values) in params.iter() {
///         println!("{} = {:?}", key, values);
///     }
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct AdvancedQuery(pub RawParameters);

impl AdvancedQuery {
    /// Parses an urlencoded query string.
    pub fn from_query_string(query: &str) -> Self {
        Self(url::form_urlencoded::parse(query.as_bytes()).collect())
    }

    /// Consumes the extractor and returns the parameters.
    pub fn into_inner(self) -> RawParameters {
        self.0
    }
}

impl<S> FromRequestParts<S> for AdvancedQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(Self::from_query_string)
            .unwrap_or_default())
    }
}
