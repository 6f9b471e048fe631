//! HTTP API helpers shared by REST modules.

pub mod problem;

/// Request id stored in request extensions by the ingress middleware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XRequestId(pub String);
