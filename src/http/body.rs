// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Streaming response bodies
//!
//! A [`Body`] is a stream of byte chunks. Bodies coming off the network wrap
//! the transport stream; [`Body::channel`] creates a body whose chunks are
//! pushed by a [`BodyWriter`] held elsewhere.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::{Error, Result};

/// Chunked response body
pub struct Body {
    inner: BoxStream<'static, Result<Bytes>>,
}

impl Body {
    /// Create an empty body
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// Create a body holding a single chunk
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::empty();
        }
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }

    /// Create a body from a fixed sequence of chunks
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Result<Bytes>>,
        I::IntoIter: Send + 'static,
    {
        Self::from_stream(stream::iter(chunks))
    }

    /// Create a body from any chunk stream
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// Create a writable/readable pair
    ///
    /// The returned body yields whatever the writer pushes, ends when the
    /// writer is closed, and fails if the writer aborts or is dropped
    /// without closing.
    pub fn channel() -> (BodyWriter, Body) {
        let (tx, rx) = mpsc::unbounded_channel();
        let chunks = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        (BodyWriter { tx: Some(tx) }, Self::from_stream(chunks))
    }

    /// Read the next chunk, `None` once the body is exhausted
    pub async fn chunk(&mut self) -> Option<Result<Bytes>> {
        self.inner.next().await
    }

    /// Read the whole body
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunk().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Read the whole body as UTF-8 text
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }
}

impl Stream for Body {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from_bytes(text)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from_bytes(text)
    }
}

/// Writable end of [`Body::channel`]
pub struct BodyWriter {
    tx: Option<mpsc::UnboundedSender<Result<Bytes>>>,
}

impl BodyWriter {
    /// Push a chunk to the reader
    pub fn write(&mut self, chunk: impl Into<Bytes>) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| Error::stream("body writer already finished"))?;
        tx.send(Ok(chunk.into()))
            .map_err(|_| Error::stream("body reader dropped"))
    }

    /// End the body cleanly
    pub fn close(mut self) {
        self.tx.take();
    }

    /// End the body with an error
    pub fn abort(mut self, error: Error) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(error));
        }
    }

    /// Whether the reading side has gone away
    pub fn is_reader_dropped(&self) -> bool {
        self.tx.as_ref().map(|tx| tx.is_closed()).unwrap_or(true)
    }
}

impl Drop for BodyWriter {
    fn drop(&mut self) {
        // A writer that vanishes without close() must not look like a clean end.
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(Error::stream("body writer dropped before close")));
        }
    }
}

impl fmt::Debug for BodyWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyWriter")
            .field("open", &self.tx.is_some())
            .finish()
    }
}
