// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Best-effort relay of captured payloads to the local collector

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::duplicator::PayloadSink;
use super::fetch::Fetch;
use crate::browser::Location;
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::http::Request;

/// Captured payload tagged with the page context it was seen under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
    #[serde(default = "empty_data")]
    data: Value,
}

fn empty_data() -> Value {
    Value::Array(Vec::new())
}

impl Envelope {
    pub fn new(video_id: Option<String>, data: Value) -> Self {
        Self { video_id, data }
    }

    /// Context identifier, if the page had one
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Captured payload
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Take the payload
    pub fn into_data(self) -> Value {
        self.data
    }
}

/// Relay to a fixed collector endpoint
///
/// Deliveries go through the entry point captured at install time, so they
/// are never routed back through the hook.
pub struct Relay {
    entry_point: Arc<dyn Fetch>,
    endpoint: Url,
    context_param: String,
    location: Location,
    timeout: Duration,
}

impl Relay {
    pub fn new(entry_point: Arc<dyn Fetch>, location: Location, config: &TapConfig) -> Result<Self> {
        Ok(Self {
            entry_point,
            endpoint: config.relay_url()?,
            context_param: config.context_param.clone(),
            location,
            timeout: config.relay_timeout,
        })
    }

    /// Collector endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Pair a payload with the page's current context id
    pub fn build_envelope(&self, payload: Value) -> Envelope {
        Envelope::new(self.location.query_param(&self.context_param), payload)
    }

    /// POST an envelope to the collector once
    pub async fn deliver(&self, envelope: &Envelope) -> Result<()> {
        let request = Request::post(self.endpoint.as_str())?
            .json(envelope)?
            .timeout(self.timeout);

        let response = self
            .entry_point
            .fetch(request.into())
            .await
            .map_err(|e| Error::relay(self.endpoint.as_str(), e.to_string()))?;

        if !response.ok() {
            return Err(Error::relay_status(
                self.endpoint.as_str(),
                response.status_code(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PayloadSink for Relay {
    async fn accept(&self, source: &Url, payload: Value) {
        let envelope = self.build_envelope(payload);
        match self.deliver(&envelope).await {
            Ok(()) => tracing::debug!(
                endpoint = %self.endpoint,
                video_id = ?envelope.video_id(),
                "Payload relayed"
            ),
            Err(e) => tracing::error!(
                endpoint = %self.endpoint,
                source = %source,
                error = %e,
                "Forward failed"
            ),
        }
    }
}
