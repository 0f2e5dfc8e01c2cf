// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP endpoint receiving relayed envelopes

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use super::chat::extract_chat_messages;
use super::store::{ChatStore, PacketLog};
use crate::config::CollectorConfig;
use crate::error::{Error, ErrorContext, Result};
use crate::network::Envelope;

/// Largest envelope accepted
const MAX_ENVELOPE_BYTES: usize = 16 * 1024 * 1024;

/// Storage shared by request handlers
#[derive(Clone)]
pub struct CollectorState {
    store: Arc<ChatStore>,
    packets: Option<Arc<PacketLog>>,
}

impl CollectorState {
    pub fn new(store: Arc<ChatStore>, packets: Option<Arc<PacketLog>>) -> Self {
        Self { store, packets }
    }

    /// Prepare the data directory, database and packet dump
    pub fn open(config: &CollectorConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .context(&format!("create data directory {}", config.data_dir.display()))?;

        let store = ChatStore::open(&config.db_file())?;
        let packets = if config.dump_packets {
            Some(Arc::new(PacketLog::create(config.data_file())?))
        } else {
            None
        };
        Ok(Self::new(Arc::new(store), packets))
    }

    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    /// Dump the payload and save the chat messages it carries
    ///
    /// Returns the number of messages found. A missing video id is stored
    /// as an empty string.
    pub fn record(&self, envelope: &Envelope) -> Result<usize> {
        if let Some(packets) = &self.packets {
            packets.append(envelope.data())?;
        }

        let video_id = envelope.video_id().unwrap_or_default();
        let messages = extract_chat_messages(envelope.data());
        for message in &messages {
            if self.store.insert(video_id, message)? {
                info!(
                    video_id = %video_id,
                    sent_at = ?message.sent_at(),
                    "[Saved] {}: {}",
                    message.author_name,
                    message.text
                );
            } else {
                debug!(id = %message.id, "Message already stored");
            }
        }
        Ok(messages.len())
    }
}

/// Router serving `route`
///
/// Every other path answers 404. CORS allows any origin so a page on
/// another host can POST here.
pub fn router(route: &str, state: CollectorState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(route, post(forwarded_chats))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_ENVELOPE_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn forwarded_chats(State(state): State<CollectorState>, body: Bytes) -> Response {
    match ingest(state, body).await {
        Ok(count) => {
            debug!(messages = count, "Envelope stored");
            (StatusCode::OK, Json(json!({ "success": true }))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Rejected envelope");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn ingest(state: CollectorState, body: Bytes) -> Result<usize> {
    let envelope: Envelope = serde_json::from_slice(&body)?;
    tokio::task::spawn_blocking(move || state.record(&envelope))
        .await
        .map_err(|e| Error::other(format!("storage task failed: {}", e)))?
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "File Not Found")
}

/// Collector bound to its listening socket
pub struct Collector {
    route: String,
    state: CollectorState,
    listener: TcpListener,
}

impl Collector {
    /// Open storage and bind the configured address
    pub async fn bind(config: &CollectorConfig) -> Result<Self> {
        let state = CollectorState::open(config)?;
        let addr = config.addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .context(&format!("bind {}", addr))?;

        Ok(Self {
            route: config.route(),
            state,
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        self.run_until(ctrl_c()).await
    }

    /// Serve until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let app = router(&self.route, self.state);

        info!("Listening at http://{}{}", addr, self.route);
        info!("Server running. Waiting for forwarded packets...");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Collector stopped");
        Ok(())
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
