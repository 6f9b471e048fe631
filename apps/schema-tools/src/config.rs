use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use runtime::AppConfig;
use serde::{Deserialize, Serialize};

/// Config section name under `modules`.
pub const SECTION: &str = "schema_tools";

/// Target of the column removal and of the follow-up audit (`modules.schema_tools`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SchemaToolsConfig {
    pub table: String,
    pub column: String,
    /// Entity whose static column listing must not contain `column`.
    pub entity: String,
    /// Base directory for `source_files`; relative to the working directory.
    pub source_root: PathBuf,
    pub source_files: Vec<String>,
    /// Vector store holding per-record metadata; the check is skipped when unset.
    pub vector_store: Option<VectorStoreConfig>,
}

impl Default for SchemaToolsConfig {
    fn default() -> Self {
        Self {
            table: "interactions".to_string(),
            column: "mood".to_string(),
            entity: "interactions".to_string(),
            source_root: PathBuf::from("."),
            source_files: vec![
                "modules/dashboard_stats/src/infra/storage/entity/interactions.rs".to_string(),
                "modules/dashboard_stats/src/contract/model.rs".to_string(),
                "modules/dashboard_stats/src/api/rest/dto.rs".to_string(),
                "modules/dashboard_stats/src/api/rest/handlers.rs".to_string(),
            ],
            vector_store: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VectorStoreConfig {
    /// Base URL of a Chroma-compatible REST API, e.g. "http://127.0.0.1:8001".
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_sample_size")]
    pub sample_size: u32,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

fn default_collection() -> String {
    "conversations".to_string()
}

fn default_sample_size() -> u32 {
    5
}

fn default_timeout_sec() -> u64 {
    10
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub table: Option<String>,
    pub column: Option<String>,
    pub database_url: Option<String>,
}

/// Everything a tool run needs: the resolved database DSN and the tool section.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub database_url: String,
    pub tools: SchemaToolsConfig,
    pub home_dir: PathBuf,
}

impl ToolSettings {
    /// Load the layered app config (or defaults) and apply `overrides`.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let app = AppConfig::load_or_default(config_path)?;
        Self::from_app_config(&app, overrides)
    }

    pub fn from_app_config(app: &AppConfig, overrides: &Overrides) -> Result<Self> {
        let mut tools: SchemaToolsConfig = app.module_config(SECTION)?;
        if let Some(t) = &overrides.table {
            tools.table = t.clone();
        }
        if let Some(c) = &overrides.column {
            tools.column = c.clone();
        }

        let home_dir = PathBuf::from(&app.server.home_dir);
        let raw_url = match &overrides.database_url {
            Some(url) => url.clone(),
            None => app
                .database
                .as_ref()
                .map(|d| d.url.trim().to_string())
                .filter(|u| !u.is_empty())
                .context("Database URL not configured")?,
        };
        let database_url = if raw_url.starts_with("sqlite://") {
            db::absolutize_sqlite_dsn(&raw_url, &home_dir, false)
                .with_context(|| format!("invalid sqlite DSN '{raw_url}'"))?
        } else {
            raw_url
        };

        Ok(Self {
            database_url,
            tools,
            home_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app_with(modules: serde_json::Value, url: &str) -> AppConfig {
        let mut app = AppConfig::default();
        app.server.home_dir = "/srv/assistant".to_string();
        if let Some(db) = app.database.as_mut() {
            db.url = url.to_string();
        }
        if let serde_json::Value::Object(map) = modules {
            app.modules = map.into_iter().collect();
        }
        app
    }

    #[test]
    fn defaults_target_interactions_mood() {
        let cfg = SchemaToolsConfig::default();
        assert_eq!(cfg.table, "interactions");
        assert_eq!(cfg.column, "mood");
        assert_eq!(cfg.entity, "interactions");
        assert_eq!(cfg.source_files.len(), 4);
        assert!(cfg.vector_store.is_none());
    }

    #[test]
    fn section_and_overrides_are_merged() {
        let app = app_with(
            json!({
                "schema_tools": {
                    "column": "sentiment",
                    "vector_store": { "url": "http://127.0.0.1:8001" }
                }
            }),
            "postgres://u:p@localhost/assistant",
        );
        let overrides = Overrides {
            table: Some("messages".into()),
            ..Default::default()
        };

        let settings = ToolSettings::from_app_config(&app, &overrides).unwrap();
        assert_eq!(settings.tools.table, "messages");
        assert_eq!(settings.tools.column, "sentiment");
        assert_eq!(settings.database_url, "postgres://u:p@localhost/assistant");

        let vs = settings.tools.vector_store.unwrap();
        assert_eq!(vs.collection, "conversations");
        assert_eq!(vs.sample_size, 5);
    }

    #[test]
    fn relative_sqlite_path_resolves_against_home_dir() {
        let app = app_with(json!({}), "sqlite://database/assistant.db");
        let settings = ToolSettings::from_app_config(&app, &Overrides::default()).unwrap();
        assert_eq!(
            settings.database_url,
            "sqlite:///srv/assistant/database/assistant.db"
        );
    }

    #[test]
    fn missing_database_is_an_error() {
        let mut app = AppConfig::default();
        app.database = None;
        let err = ToolSettings::from_app_config(&app, &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("Database URL not configured"));
    }

    #[test]
    fn unknown_key_in_section_is_rejected() {
        let app = app_with(json!({ "schema_tools": { "colum": "x" } }), "sqlite::memory:");
        assert!(ToolSettings::from_app_config(&app, &Overrides::default()).is_err());
    }
}
