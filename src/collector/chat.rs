// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Chat message extraction from live chat continuation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One text message posted to a live chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub author_name: String,
    pub author_external_channel_id: String,
    pub timestamp_usec: String,
    pub author_photo_url: String,
}

impl ChatMessage {
    /// Post time in Unix milliseconds, 0 if the payload carried none
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_usec
            .parse::<i64>()
            .map(|usec| usec / 1000)
            .unwrap_or(0)
    }

    /// Post time
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms())
    }
}

/// Extract every text message from a `get_live_chat` response
///
/// Payloads without `continuationContents.liveChatContinuation.actions`
/// yield nothing. Actions that are not text messages (tickers, paid
/// messages, banners) are skipped.
pub fn extract_chat_messages(data: &Value) -> Vec<ChatMessage> {
    let Some(actions) = data
        .pointer("/continuationContents/liveChatContinuation/actions")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    actions.iter().filter_map(message_from_action).collect()
}

fn message_from_action(action: &Value) -> Option<ChatMessage> {
    let renderer = action.pointer("/addChatItemAction/item/liveChatTextMessageRenderer")?;
    let id = renderer.get("id")?.as_str()?.to_string();

    let text = renderer
        .pointer("/message/runs")
        .and_then(Value::as_array)
        .map(|runs| runs.iter().filter_map(render_run).collect::<String>())
        .unwrap_or_default();

    let has_badges = renderer
        .get("authorBadges")
        .and_then(Value::as_array)
        .map(|badges| !badges.is_empty())
        .unwrap_or(false);
    let author_photo_url = if has_badges {
        str_at(renderer, "/authorPhoto/thumbnails/0/url")
    } else {
        String::new()
    };

    Some(ChatMessage {
        id,
        text,
        author_name: str_at(renderer, "/authorName/simpleText"),
        author_external_channel_id: str_at(renderer, "/authorExternalChannelId"),
        timestamp_usec: str_at(renderer, "/timestampUsec"),
        author_photo_url,
    })
}

/// Render one segment of a message
fn render_run(run: &Value) -> Option<String> {
    if let Some(text) = run.get("text") {
        return Some(text.as_str().unwrap_or_default().to_string());
    }
    let emoji = run.get("emoji")?;

    let is_custom = emoji
        .get("isCustomEmoji")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if let (true, Some(shortcuts)) = (is_custom, emoji.get("shortcuts").and_then(Value::as_array)) {
        let shortcut = shortcuts
            .first()
            .and_then(Value::as_str)
            .unwrap_or("custom");
        return Some(format!(":{}:", shortcut.trim_matches(':')));
    }

    match emoji.get("emojiId") {
        Some(id) => Some(id.as_str().unwrap_or_default().to_string()),
        None => Some("[emoji]".to_string()),
    }
}

fn str_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
