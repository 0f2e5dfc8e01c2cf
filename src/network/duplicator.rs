// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response stream duplication
//!
//! A network body can only be read once. [`duplicate`] hands the caller a
//! fresh response whose body is fed by a background drain task; the drain
//! reads the original body to the end, flushes the full text to the caller,
//! and then gives the parsed payload to a [`PayloadSink`].
//!
//! The drain decodes chunks as UTF-8 and re-encodes the accumulated text,
//! so only textual bodies survive unchanged. Invalid byte sequences are
//! replaced with U+FFFD.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Decoder, UTF_8};
use serde_json::Value;
use tokio::task::JoinHandle;
use url::Url;

use crate::http::{Body, BodyWriter, Response};

/// Consumer of fully drained payloads
#[async_trait]
pub trait PayloadSink: Send + Sync {
    /// Called once per drained body that parsed as JSON
    async fn accept(&self, source: &Url, payload: Value);
}

/// How a drain task finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Body flushed to the caller and payload handed to the sink
    Relayed { bytes: usize },
    /// Body flushed to the caller, but it was not JSON
    Malformed { bytes: usize, reason: String },
    /// Original body failed mid-read; the caller's body was aborted
    ReadFailed { reason: String },
}

/// A duplicated response and the task feeding it
#[derive(Debug)]
pub struct Duplicated {
    /// Response to hand back to the caller
    pub response: Response,
    /// Drain task; dropping it detaches the task
    pub drain: JoinHandle<DrainOutcome>,
}

/// Duplicate `original`, spawning the drain on the current tokio runtime
///
/// Returns without waiting for the body. The returned response has the same
/// head as the original; its body yields the complete text in one chunk
/// once the original body is exhausted.
pub fn duplicate(original: Response, sink: Arc<dyn PayloadSink>) -> Duplicated {
    let response_time_ms = original.response_time_ms;
    let (head, body) = original.into_parts();
    let source = head.url.clone();

    let (writer, forwarded) = Body::channel();
    let response = Response::new(head, forwarded).with_response_time(response_time_ms);

    let drain = tokio::spawn(drain(body, writer, source, sink));

    Duplicated { response, drain }
}

async fn drain(
    mut body: Body,
    mut writer: BodyWriter,
    source: Url,
    sink: Arc<dyn PayloadSink>,
) -> DrainOutcome {
    let mut decoder = UTF_8.new_decoder_without_bom_handling();
    let mut text = String::new();

    while let Some(chunk) = body.chunk().await {
        match chunk {
            Ok(chunk) => decode_into(&mut decoder, &chunk, &mut text, false),
            Err(e) => {
                tracing::warn!(url = %source, error = %e, "Intercepted body failed mid-read");
                let reason = e.to_string();
                writer.abort(e);
                return DrainOutcome::ReadFailed { reason };
            }
        }
    }
    decode_into(&mut decoder, &[], &mut text, true);

    let bytes = Bytes::from(text);
    let len = bytes.len();
    if !bytes.is_empty() && writer.write(bytes.clone()).is_err() {
        tracing::debug!(url = %source, "Caller dropped the duplicated body");
    }
    writer.close();

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) => {
            tracing::debug!(url = %source, bytes = len, "Intercepted body drained");
            sink.accept(&source, payload).await;
            DrainOutcome::Relayed { bytes: len }
        }
        Err(e) => {
            tracing::warn!(url = %source, error = %e, "Intercepted body is not JSON, skipping relay");
            DrainOutcome::Malformed {
                bytes: len,
                reason: e.to_string(),
            }
        }
    }
}

fn decode_into(decoder: &mut Decoder, chunk: &[u8], text: &mut String, last: bool) {
    let needed = decoder
        .max_utf8_buffer_length(chunk.len())
        .unwrap_or(chunk.len() * 3 + 4);
    text.reserve(needed);
    let _ = decoder.decode_to_string(chunk, text, last);
}
