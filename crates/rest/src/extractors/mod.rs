//! Axum extractors for the DevCamper API.
//!
//! - [`AdvancedQuery`] - raw query string as multi-valued [`RawParameters`]
//! - [`JsonBody`] - a JSON object request body
//! - [`CurrentUser`] - the authenticated caller
//! - [`record_id`] - path id validation
//!
//! [`RawParameters`]: devcamper_persistence::query::RawParameters

mod advanced_query;
mod current_user;
mod json_body;
mod record_id;

pub use advanced_query::AdvancedQuery;
pub use current_user::{CurrentUser, TOKEN_COOKIE, session_token};
pub use json_body::JsonBody;
pub use record_id::record_id;
