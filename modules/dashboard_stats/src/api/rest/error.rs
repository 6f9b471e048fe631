use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
    request_id: Option<&str>,
) -> ProblemResponse {
    let mut problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.assistant.local/{code}"))
        .with_code(code)
        .with_instance(instance);
    if let Some(id) = request_id {
        problem = problem.with_request_id(id);
    }
    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(
    e: &DomainError,
    instance: &str,
    request_id: Option<&str>,
) -> ProblemResponse {
    match e {
        // The handler logs the cause; the client gets a generic detail.
        DomainError::Database { .. } => from_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_DB",
            "Internal error",
            "An internal database error occurred",
            instance,
            request_id,
        ),
    }
}
