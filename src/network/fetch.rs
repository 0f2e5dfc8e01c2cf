// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The fetch entry point abstraction
//!
//! A page routes every outbound call through one of these. The HTTP client
//! is the default; interception hooks wrap whatever was installed before.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{FetchInput, HttpClient, Response};

/// Outbound network entry point
///
/// Resolves once response headers are available; the body may still be
/// streaming.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, input: FetchInput) -> Result<Response>;
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, input: FetchInput) -> Result<Response> {
        self.execute(input.into_request()?).await
    }
}
