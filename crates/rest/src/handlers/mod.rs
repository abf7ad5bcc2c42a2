//! HTTP request handlers for the DevCamper API.
//!
//! - [`bootcamps`] - bootcamp CRUD
//! - [`courses`] - course CRUD, keeping bootcamp `averageCost` current
//! - [`reviews`] - review CRUD, keeping bootcamp `averageRating` current
//! - [`auth`] - registration, login and password management
//! - [`users`] - admin user management
//! - [`health`] - health check endpoint
//!
//! Collection routes share the advanced query pipeline in [`listing`].

mod accounts;
mod aggregates;
pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod health;
pub mod listing;
mod records;
pub mod reviews;
pub mod users;

pub use accounts::create_account;
pub use health::health_handler;
