//! Bearer-token authentication.
//!
//! Handlers take a [`Principal`] argument; the extractor rejects the request
//! with `401 AUTH_UNAUTHENTICATED` before the handler runs when the caller
//! cannot be resolved. The resolver is looked up in request extensions as
//! `Arc<dyn TokenResolver>`, installed by the ingress.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use uuid::Uuid;

use crate::api::problem::{unauthorized, ProblemResponse};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
}

/// Maps a bearer token to a user id.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<Uuid>;
}

/// Resolver backed by a fixed token table (typically loaded from config).
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Uuid>,
}

impl StaticTokenResolver {
    pub fn new(tokens: HashMap<String, Uuid>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<(String, Uuid)> for StaticTokenResolver {
    fn from_iter<I: IntoIterator<Item = (String, Uuid)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl TokenResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Option<Uuid> {
        self.tokens.get(token).copied()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let raw = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let reject =
            |detail: &str| ProblemResponse(unauthorized(detail).0.with_instance(path.clone()));

        let Some(resolver) = parts.extensions.get::<Arc<dyn TokenResolver>>().cloned() else {
            tracing::warn!(path = %path, "no token resolver installed; rejecting request");
            return Err(reject("Authentication is not configured"));
        };

        let Some(token) = bearer_token(parts) else {
            tracing::debug!(path = %path, "missing or malformed Authorization header");
            return Err(reject("Missing bearer token"));
        };

        match resolver.resolve(token).await {
            Some(user_id) => Ok(Principal { user_id }),
            None => {
                tracing::debug!(path = %path, "bearer token did not resolve to a user");
                Err(reject("Invalid bearer token"))
            }
        }
    }
}
