use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMethod {
    #[default]
    Post,
    Get,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub method: RequestMethod,

    /// content-type of POST requests; UTF-8 JSON when unset
    #[serde(default)]
    pub media_type: Option<String>,

    /// Extra headers sent with every request, e.g. authorization
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Cancel the request after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub insecure_skip_verify: bool,

    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// tracing filter directives, overriding RUST_LOG
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub log_json: bool,
}

fn default_pretty() -> bool {
    true
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults; the load error is handed back
    /// so it can be reported once logging is up
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Build the HTTP client the GraphQL client will own
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name {name:?}"))?;
            let header_value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header {name:?}"))?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .danger_accept_invalid_certs(self.insecure_skip_verify)
            .build()?;
        Ok(client)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: RequestMethod::default(),
            media_type: None,
            headers: BTreeMap::new(),
            timeout_secs: None,
            insecure_skip_verify: false,
            pretty: default_pretty(),
            log_filter: None,
            log_json: false,
        }
    }
}
