use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP ingress configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    pub enable_docs: bool,
    pub cors_enabled: bool,
    /// Handler timeout in seconds.
    pub request_timeout_sec: u64,
    pub body_limit_bytes: usize,
    pub auth: AuthConfig,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            enable_docs: false,
            cors_enabled: false,
            request_timeout_sec: 30,
            body_limit_bytes: 16 * 1024 * 1024,
            auth: AuthConfig::default(),
        }
    }
}

/// Static bearer tokens: token -> user id.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    pub tokens: HashMap<String, Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_section_keeps_defaults() {
        let user = Uuid::new_v4();
        let cfg: ApiIngressConfig = serde_json::from_value(json!({
            "enable_docs": true,
            "auth": { "tokens": { "secret": user } }
        }))
        .unwrap();

        assert!(cfg.enable_docs);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8000");
        assert_eq!(cfg.request_timeout_sec, 30);
        assert_eq!(cfg.auth.tokens.get("secret"), Some(&user));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let res = serde_json::from_value::<ApiIngressConfig>(json!({ "bind": "x" }));
        assert!(res.is_err());
    }
}
