//! Metadata sampling from the vector store that backs conversation search.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::Instrument;

use super::CheckResult;
use crate::config::VectorStoreConfig;

pub const NAME: &str = "Vector Store Metadata";
pub const DEFAULT_SAMPLE_SIZE: u32 = 5;

pub type Metadata = Map<String, Value>;

/// Read access to per-record metadata of a collection.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Up to `limit` metadata maps; records without metadata are omitted.
    async fn sample_metadata(&self, limit: u32) -> Result<Vec<Metadata>>;
}

/// Chroma REST API client (`/api/v1`).
pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    metadatas: Option<Vec<Option<Metadata>>>,
}

impl ChromaStore {
    pub fn new(cfg: &VectorStoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_sec))
            .build()
            .context("cannot build HTTP client")?;
        Ok(Self {
            client,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            collection: cfg.collection.clone(),
        })
    }

    async fn collection_id(&self) -> Result<String> {
        let url = format!("{}/api/v1/collections/{}", self.base_url, self.collection);
        let span = tracing::debug_span!("outgoing_http", http.method = "GET", http.url = %url);

        let resp = self
            .client
            .get(&url)
            .send()
            .instrument(span)
            .await
            .with_context(|| format!("vector store unreachable at {}", self.base_url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("collection '{}' lookup failed ({status}): {body}", self.collection);
        }
        let c: Collection = resp.json().await.context("malformed collection response")?;
        Ok(c.id)
    }
}

#[async_trait]
impl MetadataStore for ChromaStore {
    async fn sample_metadata(&self, limit: u32) -> Result<Vec<Metadata>> {
        let id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{id}/get", self.base_url);
        let span = tracing::debug_span!("outgoing_http", http.method = "POST", http.url = %url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "limit": limit, "include": ["metadatas"] }))
            .send()
            .instrument(span)
            .await
            .context("vector store request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("collection get failed ({status}): {body}");
        }
        let body: GetResponse = resp.json().await.context("malformed get response")?;
        Ok(body.metadatas.unwrap_or_default().into_iter().flatten().collect())
    }
}

/// WARNING for an empty store or for sampled records still carrying `key`.
pub async fn check(store: &dyn MetadataStore, key: &str, sample_size: u32) -> Result<CheckResult> {
    let sample = store.sample_metadata(sample_size).await?;
    tracing::debug!(sampled = sample.len(), "vector store metadata sampled");

    if sample.is_empty() {
        return Ok(CheckResult::new(NAME).warn("No records in vector store (empty collection)"));
    }

    let carrying = sample.iter().filter(|m| m.contains_key(key)).count();
    Ok(if carrying > 0 {
        CheckResult::new(NAME)
            .warn(format!(
                "{carrying} of {} sampled records still have '{key}' metadata",
                sample.len()
            ))
            .note(format!(
                "Old entries may still have '{key}', but new entries should not"
            ))
    } else {
        CheckResult::new(NAME).pass(format!(
            "No '{key}' metadata in {} sampled records",
            sample.len()
        ))
    })
}

pub fn skipped() -> CheckResult {
    CheckResult::new(NAME).warn("Vector store not configured; check skipped")
}
