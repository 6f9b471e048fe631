//! HTTP ingress: owns the listener, global middleware and docs endpoints.
//!
//! Feature modules hand over their routes and OpenAPI fragment; the ingress
//! wraps them with request-id propagation, tracing, timeouts, optional CORS,
//! a body size limit and bearer-token resolution.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    http::header, middleware::from_fn, response::IntoResponse, routing::get, Extension, Router,
};
use modkit::{ModuleCtx, StaticTokenResolver, TokenResolver};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::{ApiIngressConfig, AuthConfig};

pub const MODULE_NAME: &str = "api_ingress";

pub struct ApiIngress {
    config: ApiIngressConfig,
    resolver: Arc<dyn TokenResolver>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        let resolver = StaticTokenResolver::new(config.auth.tokens.clone());
        if resolver.is_empty() {
            tracing::warn!("no API tokens configured; authenticated routes will answer 401");
        }
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }

    /// Build from the `modules.api_ingress` config section.
    pub fn from_ctx(ctx: &ModuleCtx) -> Result<Self> {
        let cfg = ctx
            .clone()
            .for_module(MODULE_NAME)
            .module_config::<ApiIngressConfig>()?;
        tracing::debug!(
            bind_addr = %cfg.bind_addr,
            docs = cfg.enable_docs,
            "api_ingress configured"
        );
        Ok(Self::new(cfg))
    }

    /// Replace the token resolver (e.g. with an external identity lookup).
    pub fn with_resolver(mut self, resolver: Arc<dyn TokenResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Wrap module routes with health/docs endpoints and the middleware stack.
    ///
    /// Layers are listed innermost first; the request id is assigned by the
    /// outermost layer so every inner layer and handler can see it.
    pub fn build_router(&self, app: Router, openapi: utoipa::openapi::OpenApi) -> Router {
        let mut router = app
            .route("/health", get(web::health_check))
            .route("/healthz", get(|| async { "ok" }))
            .fallback(web::fallback);

        if self.config.enable_docs {
            let doc = Arc::new(self.finalize_openapi(openapi));
            tracing::info!(paths = doc.paths.paths.len(), "serving OpenAPI document");
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = doc.clone();
                        async move {
                            ([(header::CACHE_CONTROL, "no-store")], axum::Json((*doc).clone()))
                                .into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        let x_request_id = request_id::header();

        router = router
            .layer(Extension(self.resolver.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_sec,
            )))
            .layer(from_fn(request_id::push_req_id_to_extensions));
        router = request_id::with_trace_layer(router);

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    fn finalize_openapi(&self, mut doc: utoipa::openapi::OpenApi) -> utoipa::openapi::OpenApi {
        doc.info.title = "Assistant API".to_string();
        doc.info.version = env!("CARGO_PKG_VERSION").to_string();
        doc
    }

    /// Bind `bind_addr` and serve until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self.config.bind_addr.parse().map_err(|e| {
            anyhow::anyhow!("Invalid bind address '{}': {}", self.config.bind_addr, e)
        })?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);
        serve_on(listener, router, cancel).await
    }
}

/// Serve on an already bound listener with graceful shutdown on `cancel`.
pub async fn serve_on(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<()> {
    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
