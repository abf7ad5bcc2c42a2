//! Success envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devcamper_persistence::Pagination;
use serde::Serialize;
use serde_json::{Value, json};

/// Body of every successful response.
///
/// ```json
/// {"success": true, "count": 2, "pagination": {"next": {"page": 2, "limit": 2}}, "data": [...]}
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    data: Value,
}

impl Envelope {
    /// 200 with a single value.
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }

    /// 201 with the created value.
    pub fn created(data: Value) -> Self {
        Self::ok(data).status(StatusCode::CREATED)
    }

    /// 200 with `data: {}`, used after deletes.
    pub fn empty() -> Self {
        Self::ok(json!({}))
    }

    /// 200 with a list and its `count`.
    pub fn list(items: Vec<Value>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(Value::Array(items))
        }
    }

    /// Attaches pagination links.
    pub fn paginated(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Overrides the status code.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
