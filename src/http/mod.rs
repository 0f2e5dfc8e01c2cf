// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for livetap
//!
//! Streaming request/response types and the client that backs a page's
//! default fetch entry point.

mod body;
mod client;
mod request;
mod response;

pub use body::{Body, BodyWriter};
pub use client::{HttpClient, HttpClientConfig};
pub use request::{FetchInput, Request, RequestInit};
pub use response::{Response, ResponseHead, ResponseType};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
}
