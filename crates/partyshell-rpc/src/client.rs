//! Base JSON-RPC 2.0 HTTP client.
//!
//! Provides `call()` for JSON-RPC methods (POST to `/api/`).
//! Supports Basic auth and a configurable timeout. Every call is a single
//! attempt: the only retry this system permits is the gateway's one-shot
//! locked-wallet recovery, which lives a layer above this client.

use crate::error::{classify, RpcError};
use base64::Engine;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// JSON-RPC 2.0 request envelope.
#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Configuration for an RPC client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Base URL (e.g., `http://localhost:4120`).
    pub url: String,
    /// Optional username for Basic auth.
    pub username: Option<String>,
    /// Optional password for Basic auth.
    pub password: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification (self-signed daemon certs).
    pub accept_invalid_certs: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4120".to_string(),
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// Async JSON-RPC client for the wallet daemon.
pub struct RpcClient {
    client: reqwest::Client,
    config: RpcConfig,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client with the given URL.
    pub fn new(url: &str) -> Self {
        Self::with_config(RpcConfig {
            url: url.trim_end_matches('/').to_string(),
            ..Default::default()
        })
    }

    /// Create a new client with full configuration.
    pub fn with_config(config: RpcConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(4)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            config,
            request_id: AtomicU64::new(0),
        }
    }

    /// Get the configured base URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    fn auth_header(&self) -> Option<HeaderValue> {
        match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) => {
                let creds = format!("{}:{}", user, pass);
                let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
                HeaderValue::from_str(&format!("Basic {}", encoded)).ok()
            }
            _ => None,
        }
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = self.auth_header() {
            headers.insert(AUTHORIZATION, auth);
        }
        headers
    }

    /// Call a JSON-RPC 2.0 method (POST to `/api/`).
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let url = format!("{}/api/", self.config.url);
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id(),
            method,
            params,
        };

        debug!("rpc call `{}` -> {}", method, url);

        let resp = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&req)
            .send()
            .await
            .map_err(|e| RpcError::Http {
                method: method.to_string(),
                source: e,
            })?;

        let status = resp.status().as_u16();

        if status == 401 {
            return Err(RpcError::AuthFailed { url });
        }

        if status >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(RpcError::HttpStatus {
                method: method.to_string(),
                url,
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let body: JsonRpcResponse = resp.json().await.map_err(|e| RpcError::Http {
            method: method.to_string(),
            source: e,
        })?;

        if let Some(err) = body.error {
            return Err(classify(err.code, err.message, err.data, method));
        }

        body.result
            .ok_or_else(|| RpcError::NoResult(method.to_string()))
    }
}
