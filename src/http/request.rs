// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types and fetch input

use crate::error::Result;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        })
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(Bytes::from(json));
        self = self.header(super::headers::CONTENT_TYPE, "application/json");
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply fetch options on top of this request
    pub fn apply(mut self, init: RequestInit) -> Self {
        if let Some(method) = init.method {
            self.method = method;
        }
        for (name, value) in init.headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        if init.body.is_some() {
            self.body = init.body;
        }
        if init.timeout.is_some() {
            self.timeout = init.timeout;
        }
        self
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Optional request options accompanying a plain target
#[derive(Debug, Clone, Default)]
pub struct RequestInit {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl RequestInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a caller hands to a fetch entry point
///
/// Either a plain target with options, or a request that carries its own
/// target.
#[derive(Debug, Clone)]
pub enum FetchInput {
    /// Target URL plus options
    Target { url: String, init: RequestInit },
    /// Fully formed request
    Request(Request),
}

impl FetchInput {
    /// Plain target with default options
    pub fn target(url: impl Into<String>) -> Self {
        FetchInput::Target {
            url: url.into(),
            init: RequestInit::default(),
        }
    }

    /// Plain target with options
    pub fn with_init(url: impl Into<String>, init: RequestInit) -> Self {
        FetchInput::Target {
            url: url.into(),
            init,
        }
    }

    /// The effective target, whichever form was passed
    pub fn url(&self) -> &str {
        match self {
            FetchInput::Target { url, .. } => url,
            FetchInput::Request(request) => request.url.as_str(),
        }
    }

    /// Resolve into a concrete request
    pub fn into_request(self) -> Result<Request> {
        match self {
            FetchInput::Target { url, init } => Ok(Request::get(url)?.apply(init)),
            FetchInput::Request(request) => Ok(request),
        }
    }
}

impl From<&str> for FetchInput {
    fn from(url: &str) -> Self {
        FetchInput::target(url)
    }
}

impl From<String> for FetchInput {
    fn from(url: String) -> Self {
        FetchInput::target(url)
    }
}

impl From<&Url> for FetchInput {
    fn from(url: &Url) -> Self {
        FetchInput::target(url.as_str())
    }
}

impl From<Request> for FetchInput {
    fn from(request: Request) -> Self {
        FetchInput::Request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_request_json() {
        let req = Request::post("http://localhost:8000/forwardedChats")
            .unwrap()
            .json(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(
            req.headers.get("content-type").map(|v| v.to_str().unwrap()),
            Some("application/json")
        );
        assert_eq!(req.body.as_deref(), Some(&b"{\"a\":1}"[..]));
    }

    #[test]
    fn test_fetch_input_target_from_either_form() {
        let plain = FetchInput::from("https://www.youtube.com/youtubei/v1/live_chat/get_live_chat?k=1");
        assert_eq!(
            plain.url(),
            "https://www.youtube.com/youtubei/v1/live_chat/get_live_chat?k=1"
        );

        let request = Request::post("https://www.youtube.com/youtubei/v1/next").unwrap();
        let wrapped = FetchInput::from(request);
        assert_eq!(wrapped.url(), "https://www.youtube.com/youtubei/v1/next");
    }

    #[test]
    fn test_init_applied_to_target() {
        let input = FetchInput::with_init(
            "https://example.com/api",
            RequestInit::new()
                .method(Method::POST)
                .header("x-goog-visitor-id", "abc")
                .body("{}"),
        );
        let req = input.into_request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.headers.get("x-goog-visitor-id").unwrap(), "abc");
        assert_eq!(req.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_invalid_target() {
        assert!(FetchInput::from("not a url").into_request().is_err());
    }
}
