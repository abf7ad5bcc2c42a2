//! DevCamper route configuration.

use axum::{
    Router,
    routing::{get, post, put},
};
use devcamper_persistence::DocumentStore;

use crate::handlers::{self, auth, bootcamps, courses, reviews, users};
use crate::state::AppState;

/// Prefix every route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Creates all API routes under [`API_PREFIX`].
///
/// # Routes
///
/// ## Bootcamps
/// - `GET|POST /bootcamps`
/// - `GET|PUT|DELETE /bootcamps/{id}`
/// - `GET|POST /bootcamps/{id}/courses`
/// - `GET|POST /bootcamps/{id}/reviews`
///
/// ## Courses and reviews
/// - `GET /courses`, `GET|PUT|DELETE /courses/{id}`
/// - `GET /reviews`, `GET|PUT|DELETE /reviews/{id}`
///
/// ## Auth
/// - `POST /auth/register`, `POST /auth/login`, `GET /auth/logout`
/// - `GET /auth/me`, `PUT /auth/updatedetails`, `PUT /auth/updatepassword`
/// - `POST /auth/forgotpassword`, `PUT /auth/resetpassword/{token}`
///
/// ## Users (admin)
/// - `GET|POST /users`, `GET|PUT|DELETE /users/{id}`
///
/// ## Misc
/// - `GET /health`
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    let api = Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        // Bootcamps
        .route(
            "/bootcamps",
            get(bootcamps::list_bootcamps::<S>).post(bootcamps::create_bootcamp::<S>),
        )
        .route(
            "/bootcamps/{id}",
            get(bootcamps::get_bootcamp::<S>)
                .put(bootcamps::update_bootcamp::<S>)
                .delete(bootcamps::delete_bootcamp::<S>),
        )
        .route(
            "/bootcamps/{id}/courses",
            get(courses::list_bootcamp_courses::<S>).post(courses::create_course::<S>),
        )
        .route(
            "/bootcamps/{id}/reviews",
            get(reviews::list_bootcamp_reviews::<S>).post(reviews::create_review::<S>),
        )
        // Courses
        .route("/courses", get(courses::list_courses::<S>))
        .route(
            "/courses/{id}",
            get(courses::get_course::<S>)
                .put(courses::update_course::<S>)
                .delete(courses::delete_course::<S>),
        )
        // Reviews
        .route("/reviews", get(reviews::list_reviews::<S>))
        .route(
            "/reviews/{id}",
            get(reviews::get_review::<S>)
                .put(reviews::update_review::<S>)
                .delete(reviews::delete_review::<S>),
        )
        // Auth
        .route("/auth/register", post(auth::register::<S>))
        .route("/auth/login", post(auth::login::<S>))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/updatedetails", put(auth::update_details::<S>))
        .route("/auth/updatepassword", put(auth::update_password::<S>))
        .route("/auth/forgotpassword", post(auth::forgot_password::<S>))
        .route("/auth/resetpassword/{token}", put(auth::reset_password::<S>))
        // Users
        .route(
            "/users",
            get(users::list_users::<S>).post(users::create_user::<S>),
        )
        .route(
            "/users/{id}",
            get(users::get_user::<S>)
                .put(users::update_user::<S>)
                .delete(users::delete_user::<S>),
        )
        .with_state(state);

    Router::new().nest(API_PREFIX, api)
}
