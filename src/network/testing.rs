// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Test doubles shared by the network tests

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use super::duplicator::PayloadSink;
use super::fetch::Fetch;
use crate::error::Result;
use crate::http::{Body, FetchInput, Response, ResponseHead, ResponseType};

pub(crate) const CHAT_URL: &str =
    "https://www.youtube.com/youtubei/v1/live_chat/get_live_chat?prettyPrint=false";

/// A 200 JSON response from the live chat endpoint
pub(crate) fn chat_response(chunks: Vec<&'static str>) -> Response {
    let chunks: Vec<_> = chunks
        .into_iter()
        .map(|c| Ok(Bytes::from_static(c.as_bytes())))
        .collect();
    response_with_body(Body::from_chunks(chunks))
}

pub(crate) fn response_with_body(body: Body) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", "application/json; charset=UTF-8".parse().unwrap());
    headers.insert("x-chat-shard", "7".parse().unwrap());
    let head = ResponseHead::new(StatusCode::OK, headers, Url::parse(CHAT_URL).unwrap())
        .with_redirected(true)
        .with_type(ResponseType::Cors);
    Response::new(head, body)
}

/// Sink that remembers every payload it was given
#[derive(Default)]
pub(crate) struct RecordingSink {
    payloads: Mutex<Vec<Value>>,
}

impl RecordingSink {
    pub(crate) fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().clone()
    }
}

#[async_trait]
impl PayloadSink for RecordingSink {
    async fn accept(&self, _source: &Url, payload: Value) {
        self.payloads.lock().push(payload);
    }
}

type Responder = dyn Fn(&FetchInput) -> Result<Response> + Send + Sync;

/// Entry point answering from a closure and recording every call
pub(crate) struct StubFetch {
    responder: Box<Responder>,
    calls: Mutex<Vec<FetchInput>>,
}

impl StubFetch {
    pub(crate) fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&FetchInput) -> Result<Response> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<FetchInput> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Fetch for StubFetch {
    async fn fetch(&self, input: FetchInput) -> Result<Response> {
        self.calls.lock().push(input.clone());
        (self.responder)(&input)
    }
}
