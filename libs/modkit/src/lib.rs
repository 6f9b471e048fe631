//! # ModKit
//!
//! Small module toolkit shared by the server and its feature modules.
//!
//! - **Contracts**: `Module`, `DbModule`, `RestfulModule` phase traits
//! - **Context**: `ModuleCtx` carrying the database handle and module config
//! - **Auth**: `Principal` extractor resolving bearer tokens
//! - **Problems**: RFC 9457 error responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use modkit::{DbModule, Module, RestfulModule};
//!
//! #[derive(Default)]
//! pub struct StatsModule;
//!
//! // Implement the phases the module needs...
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod contracts;
pub use crate::contracts::*;

pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod api;
pub use api::XRequestId;
pub use api::problem::{
    not_found, unauthorized, Problem, ProblemResponse, APPLICATION_PROBLEM_JSON,
};

pub mod auth;
pub use auth::{Principal, StaticTokenResolver, TokenResolver};

pub mod runtime;
pub use runtime::shutdown::wait_for_shutdown;
