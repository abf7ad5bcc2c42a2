//! Common test utilities for REST API testing.
//!
//! - [`harness`] - test server construction and request helpers
//! - [`fixtures`] - request bodies for bootcamps, courses and reviews

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
