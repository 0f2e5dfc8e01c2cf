// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Local collector
//!
//! Receives relayed envelopes over HTTP, dumps the raw payloads and stores
//! the chat messages they carry in SQLite.

mod chat;
mod server;
mod store;

pub use chat::{extract_chat_messages, ChatMessage};
pub use server::{router, Collector, CollectorState};
pub use store::{ChatStore, PacketLog, StoredMessage};
