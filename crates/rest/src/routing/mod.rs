//! Route configuration for the DevCamper API.
//!
//! This module maps HTTP paths to handlers.

pub mod api_routes;

pub use api_routes::{API_PREFIX, create_routes};
