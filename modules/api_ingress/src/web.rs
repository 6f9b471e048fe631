use axum::{
    extract::Extension,
    http::Uri,
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use modkit::{not_found, XRequestId};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Unmatched routes answer with a Problem instead of an empty 404.
pub async fn fallback(uri: Uri, rid: Option<Extension<XRequestId>>) -> Response {
    let mut p = not_found(format!("No route for {}", uri.path()))
        .0
        .with_instance(uri.path());
    if let Some(Extension(XRequestId(id))) = rid {
        p = p.with_request_id(id);
    }
    modkit::ProblemResponse(p).into_response()
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>API Docs</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
