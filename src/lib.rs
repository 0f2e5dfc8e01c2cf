// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Livetap - Live Chat Response Tap
//!
//! Intercepts a page's live chat polling calls, hands the caller an
//! untouched copy of each response and relays the parsed payload to a local
//! collector that stores the chat messages.
//!
//! ## Features
//!
//! - Fetch hook: replaces a page's entry point, matching targets by substring
//! - Stream duplication: the caller's body is fed by a background drain
//! - Best-effort relay: `{"videoId", "data"}` POSTed once, failures only logged
//! - Collector: axum endpoint writing messages to SQLite and raw packets to ndjson
//!
//! ## Example
//!
//! ```rust,no_run
//! use livetap::{InterceptionHook, Page, PageConfig, Request, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let page = Page::new(PageConfig::default())?;
//!     page.set_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")?;
//!
//!     let hook = InterceptionHook::install(&page, &TapConfig::default())?;
//!
//!     let response = page
//!         .fetch(Request::post("https://www.youtube.com/youtubei/v1/live_chat/get_live_chat")?)
//!         .await?;
//!     println!("{}", response.text().await?);
//!
//!     hook.settled().await;
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod collector;
pub mod config;
pub mod error;
pub mod http;
pub mod network;

// Page
pub use browser::{Location, Page};

// Collector
pub use collector::{extract_chat_messages, ChatMessage, ChatStore, Collector, CollectorState, PacketLog};

// Configuration
pub use config::{CollectorConfig, PageConfig, TapConfig};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{Body, BodyWriter, FetchInput, HttpClient, Request, RequestInit, Response, ResponseHead, ResponseType};

// Interception
pub use network::{duplicate, DrainOutcome, Duplicated, Envelope, Fetch, InterceptionHook, PayloadSink, Relay};

/// Livetap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
