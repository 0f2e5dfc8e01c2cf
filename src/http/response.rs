// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use std::fmt;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::body::Body;
use crate::error::{Error, Result};

/// Response type, mirroring the fetch `Response.type` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response
    #[default]
    Basic,
    /// Cross-origin response
    Cors,
    /// Synthesized without a network origin
    Default,
    /// Network error
    Error,
    /// Opaque cross-origin response
    Opaque,
    /// Opaque redirect
    OpaqueRedirect,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Default => "default",
            ResponseType::Error => "error",
            ResponseType::Opaque => "opaque",
            ResponseType::OpaqueRedirect => "opaqueredirect",
        };
        f.write_str(name)
    }
}

/// Everything a caller can observe about a response except its body
///
/// Fixed once headers have arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub ok: bool,
    pub redirected: bool,
    pub response_type: ResponseType,
    /// Final URL (after redirects)
    pub url: Url,
}

impl ResponseHead {
    /// Head for a plain same-origin response
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            ok: status.is_success(),
            redirected: false,
            response_type: ResponseType::Basic,
            url,
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }
}

/// HTTP response with a streaming body
#[derive(Debug)]
pub struct Response {
    head: ResponseHead,
    body: Body,
    /// Time to headers in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response
    pub fn new(head: ResponseHead, body: Body) -> Self {
        Self {
            head,
            body,
            response_time_ms: 0,
        }
    }

    /// Set the recorded response time
    pub fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = ms;
        self
    }

    /// Response head
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    /// Status reason phrase
    pub fn status_text(&self) -> &str {
        &self.head.status_text
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// The `ok` flag as reported by the source
    pub fn ok(&self) -> bool {
        self.head.ok
    }

    /// Whether the response went through a redirect
    pub fn redirected(&self) -> bool {
        self.head.redirected
    }

    /// Response type
    pub fn response_type(&self) -> ResponseType {
        self.head.response_type
    }

    /// Final URL
    pub fn url(&self) -> &Url {
        &self.head.url
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.head.status.as_u16()
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(super::headers::CONTENT_TYPE)
    }

    /// Check if content type is JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    /// Borrow the body for chunked reading
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Split into head and body
    pub fn into_parts(self) -> (ResponseHead, Body) {
        (self.head, self.body)
    }

    /// Read the whole body
    pub async fn bytes(self) -> Result<Bytes> {
        self.body.bytes().await
    }

    /// Read the whole body as text
    pub async fn text(self) -> Result<String> {
        self.body.text().await
    }

    /// Read the whole body and parse it as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.body.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}
