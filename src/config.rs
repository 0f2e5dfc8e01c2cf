// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page, tap and collector configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, DEFAULT_USER_AGENT};

/// Target substring of the live chat polling endpoint
pub const DEFAULT_MATCH_PATTERN: &str = "/youtubei/v1/live_chat/get_live_chat";

/// Port the local collector listens on
pub const DEFAULT_COLLECTOR_PORT: u16 = 8000;

/// Path the collector accepts envelopes on, without the leading slash
pub const DEFAULT_COLLECTOR_PATH: &str = "forwardedChats";

/// Query parameter of the watch page holding the video id
pub const DEFAULT_CONTEXT_PARAM: &str = "v";

/// Page configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout for navigation
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Keep cookies between requests
    pub persist_cookies: bool,
    /// Default headers
    pub default_headers: Vec<(String, String)>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            ignore_https_errors: false,
            proxy: None,
            persist_cookies: true,
            default_headers: vec![],
        }
    }
}

impl PageConfig {
    /// Create a new page config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// HTTP client settings for this page
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let mut config = HttpClientConfig {
            user_agent: self.user_agent.clone(),
            accept_invalid_certs: self.ignore_https_errors,
            handle_cookies: self.persist_cookies,
            proxy: self.proxy.clone(),
            ..Default::default()
        };
        for (name, value) in &self.default_headers {
            let name = reqwest::header::HeaderName::try_from(name.as_str())
                .map_err(|e| Error::config(format!("Invalid header name '{}': {}", name, e)))?;
            let value = reqwest::header::HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::config(format!("Invalid header value for '{}': {}", name, e)))?;
            config.default_headers.insert(name, value);
        }
        Ok(config)
    }
}

/// Interception and relay configuration
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// Substring a target URL must contain to be intercepted
    pub match_pattern: String,
    /// Where envelopes are POSTed
    pub relay_endpoint: String,
    /// Query parameter of the page address used as context id
    pub context_param: String,
    /// Timeout for a single relay POST
    pub relay_timeout: Duration,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            match_pattern: DEFAULT_MATCH_PATTERN.to_string(),
            relay_endpoint: format!(
                "http://localhost:{}/{}",
                DEFAULT_COLLECTOR_PORT, DEFAULT_COLLECTOR_PATH
            ),
            context_param: DEFAULT_CONTEXT_PARAM.to_string(),
            relay_timeout: Duration::from_secs(5),
        }
    }
}

impl TapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match substring
    pub fn match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.match_pattern = pattern.into();
        self
    }

    /// Set the relay endpoint
    pub fn relay_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.relay_endpoint = endpoint.into();
        self
    }

    /// Set the context query parameter
    pub fn context_param(mut self, param: impl Into<String>) -> Self {
        self.context_param = param.into();
        self
    }

    /// Set the relay timeout
    pub fn relay_timeout(mut self, timeout: Duration) -> Self {
        self.relay_timeout = timeout;
        self
    }

    /// Parsed relay endpoint
    pub fn relay_url(&self) -> Result<Url> {
        let url = Url::parse(&self.relay_endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Relay endpoint must be http(s): {}",
                self.relay_endpoint
            )));
        }
        Ok(url)
    }
}

/// Collector configuration
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Envelope path, without the leading slash
    pub path: String,
    /// Directory holding the database and packet dump
    pub data_dir: PathBuf,
    /// Append every raw payload to the packet dump
    pub dump_packets: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_COLLECTOR_PORT,
            path: DEFAULT_COLLECTOR_PATH.to_string(),
            data_dir: PathBuf::from("./data"),
            dump_packets: true,
        }
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bind port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the envelope path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into().trim_start_matches('/').to_string();
        self
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Enable/disable the packet dump
    pub fn dump_packets(mut self, dump: bool) -> Self {
        self.dump_packets = dump;
        self
    }

    /// Route the collector serves
    pub fn route(&self) -> String {
        format!("/{}", self.path)
    }

    /// SQLite database file
    pub fn db_file(&self) -> PathBuf {
        self.data_dir.join("chat_messages.db")
    }

    /// Packet dump file
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join("data.ndjson")
    }

    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid bind address: {}", e)))
    }
}
