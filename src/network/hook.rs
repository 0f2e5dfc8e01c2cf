// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interception hook installed in place of a page's fetch entry point

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::duplicator::{duplicate, Duplicated, PayloadSink};
use super::fetch::Fetch;
use super::relay::Relay;
use crate::browser::Page;
use crate::config::TapConfig;
use crate::error::Result;
use crate::http::{FetchInput, Response};

/// Fetch wrapper that tees matching responses into a [`PayloadSink`]
///
/// Calls whose target contains the pattern get a duplicated response whose
/// body is drained in the background; every other call is answered by the
/// wrapped entry point untouched.
pub struct InterceptionHook {
    inner: Arc<dyn Fetch>,
    pattern: String,
    sink: Arc<dyn PayloadSink>,
    in_flight: Arc<InFlight>,
}

/// Drains started by a hook that have not finished yet
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

impl InterceptionHook {
    pub fn new(inner: Arc<dyn Fetch>, pattern: impl Into<String>, sink: Arc<dyn PayloadSink>) -> Self {
        Self {
            inner,
            pattern: pattern.into(),
            sink,
            in_flight: Arc::default(),
        }
    }

    /// Replace `page`'s entry point with a hook relaying to the collector
    ///
    /// The hook and its relay both keep the entry point that was installed
    /// before. Installing twice stacks two hooks.
    pub fn install(page: &Page, config: &TapConfig) -> Result<Arc<Self>> {
        let original = page.entry_point();
        let relay = Relay::new(original.clone(), page.location().clone(), config)?;
        let endpoint = relay.endpoint().to_string();

        let hook = Arc::new(Self::new(original, config.match_pattern.clone(), Arc::new(relay)));
        page.replace_entry_point(hook.clone());

        tracing::info!(
            page = %page.id(),
            pattern = %config.match_pattern,
            relay = %endpoint,
            "Interception hook installed"
        );
        Ok(hook)
    }

    /// Whether calls to `target` are intercepted
    pub fn matches(&self, target: &str) -> bool {
        target.contains(&self.pattern)
    }

    /// Number of drains still running
    pub fn in_flight(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Wait until every drain started so far has finished, relay included
    pub async fn settled(&self) {
        loop {
            let idle = self.in_flight.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            idle.await;
        }
    }
}

#[async_trait]
impl Fetch for InterceptionHook {
    async fn fetch(&self, input: FetchInput) -> Result<Response> {
        let matched = self.matches(input.url());
        let pending = self.inner.fetch(input);

        if !matched {
            return pending.await;
        }

        let response = pending.await?;
        tracing::debug!(
            url = %response.url(),
            status = %response.status(),
            "Intercepted response"
        );

        let Duplicated { response, drain } = duplicate(response, self.sink.clone());

        // The caller never waits on the drain; a watcher only keeps count.
        self.in_flight.count.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            match drain.await {
                Ok(outcome) => tracing::debug!(?outcome, "Drain finished"),
                Err(e) => tracing::error!(error = %e, "Drain task failed"),
            }
            in_flight.finish();
        });

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::{Body, Request};
    use crate::network::testing::{chat_response, response_with_body, RecordingSink, StubFetch, CHAT_URL};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn wait_until<F: Fn() -> bool>(check: F) -> bool {
        for _ in 0..100 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        check()
    }

    fn two_chunk_body() -> Body {
        Body::from_chunks(vec![
            Ok(Bytes::from_static(b"{\"a\"")),
            Ok(Bytes::from_static(b":1}")),
        ])
    }

    #[test]
    fn test_matches_substring() {
        let hook = InterceptionHook::new(
            StubFetch::new(|_| Err(Error::other("unused"))),
            "/youtubei/v1/live_chat/get_live_chat",
            Arc::new(RecordingSink::default()),
        );
        assert!(hook.matches(CHAT_URL));
        assert!(!hook.matches("https://www.youtube.com/youtubei/v1/player"));
    }

    #[tokio::test]
    async fn test_non_matching_passes_through() {
        let stub = StubFetch::new(|_| Ok(response_with_body(two_chunk_body())));
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub.clone(), "/live_chat/", sink.clone());

        let mut response = hook
            .fetch(FetchInput::target("https://www.youtube.com/youtubei/v1/next"))
            .await
            .unwrap();

        // The original chunking is still visible, so nothing was duplicated.
        let body = response.body_mut();
        assert_eq!(body.chunk().await.unwrap().unwrap(), "{\"a\"");
        assert_eq!(body.chunk().await.unwrap().unwrap(), ":1}");
        assert!(body.chunk().await.is_none());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(sink.payloads().is_empty());
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_matching_call_is_duplicated() {
        let stub = StubFetch::new(|_| Ok(response_with_body(two_chunk_body())));
        let expected = response_with_body(Body::empty()).head().clone();
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub.clone(), "/live_chat/", sink.clone());

        let response = hook.fetch(FetchInput::target(CHAT_URL)).await.unwrap();

        assert_eq!(response.head(), &expected);
        assert!(response.redirected());
        assert_eq!(response.header("x-chat-shard"), Some("7"));
        assert_eq!(response.text().await.unwrap(), "{\"a\":1}");
        assert!(wait_until(|| sink.payloads() == vec![json!({"a": 1})]).await);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_object_is_matched_and_forwarded_unchanged() {
        let stub = StubFetch::new(|_| Ok(chat_response(vec!["{}"])));
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub.clone(), "/live_chat/", sink.clone());

        let request = Request::post(CHAT_URL)
            .unwrap()
            .header("x-goog-visitor-id", "visitor")
            .body("{\"context\":{}}");
        let response = hook.fetch(FetchInput::from(request)).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "{}");

        match &stub.calls()[0] {
            FetchInput::Request(sent) => {
                assert_eq!(sent.method, reqwest::Method::POST);
                assert_eq!(sent.headers.get("x-goog-visitor-id").unwrap(), "visitor");
                assert_eq!(sent.body.as_deref(), Some(&b"{\"context\":{}}"[..]));
            }
            other => panic!("expected request input, got {:?}", other),
        }
        assert!(wait_until(|| sink.payloads().len() == 1).await);
    }

    #[tokio::test]
    async fn test_upstream_error_is_returned() {
        let stub = StubFetch::new(|_| Err(Error::other("net::ERR_CONNECTION_RESET")));
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub, "/live_chat/", sink.clone());

        let err = hook.fetch(FetchInput::target(CHAT_URL)).await.unwrap_err();
        assert!(err.to_string().contains("ERR_CONNECTION_RESET"));
        assert!(sink.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_failing_stream_surfaces_to_caller() {
        let stub = StubFetch::new(|_| {
            Ok(response_with_body(Body::from_chunks(vec![
                Ok(Bytes::from_static(b"{\"a\"")),
                Err(Error::stream("aborted")),
            ])))
        });
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub, "/live_chat/", sink.clone());

        let response = hook.fetch(FetchInput::target(CHAT_URL)).await.unwrap();
        assert!(response.text().await.unwrap_err().is_stream());
        assert!(sink.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_settled_waits_for_drains() {
        let stub = StubFetch::new(|_| Ok(chat_response(vec!["{\"a\"", ":1}"])));
        let sink = Arc::new(RecordingSink::default());
        let hook = InterceptionHook::new(stub, "/live_chat/", sink.clone());

        let first = hook.fetch(FetchInput::target(CHAT_URL)).await.unwrap();
        let second = hook.fetch(FetchInput::target(CHAT_URL)).await.unwrap();
        drop(second);
        assert_eq!(first.text().await.unwrap(), "{\"a\":1}");

        hook.settled().await;
        assert_eq!(hook.in_flight(), 0);
        assert_eq!(sink.payloads().len(), 2);

        // Nothing running returns at once.
        hook.settled().await;
    }

    async fn relay_posts(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/forwardedChats")
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    async fn mount_chat(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/youtubei/v1/live_chat/get_live_chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{\"a\":1}", "application/json"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_installed_hook_relays_to_collector() {
        let server = MockServer::start().await;
        mount_chat(&server).await;
        Mock::given(method("POST"))
            .and(path("/forwardedChats"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let page = Page::new(Default::default()).unwrap();
        page.set_url("https://www.youtube.com/watch?v=vid42").unwrap();
        let config = TapConfig::new().relay_endpoint(format!("{}/forwardedChats", server.uri()));
        InterceptionHook::install(&page, &config).unwrap();

        let target = format!("{}/youtubei/v1/live_chat/get_live_chat?prettyPrint=false", server.uri());
        let response = page.fetch(Request::post(&target).unwrap()).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text().await.unwrap(), "{\"a\":1}");

        let mut posts = Vec::new();
        for _ in 0..100 {
            posts = relay_posts(&server).await;
            if !posts.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(posts, vec![json!({"videoId": "vid42", "data": {"a": 1}})]);
    }

    #[tokio::test]
    async fn test_collector_down_does_not_affect_caller() {
        let server = MockServer::start().await;
        mount_chat(&server).await;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = format!("http://127.0.0.1:{}/forwardedChats", listener.local_addr().unwrap().port());
        drop(listener);

        let page = Page::new(Default::default()).unwrap();
        InterceptionHook::install(&page, &TapConfig::new().relay_endpoint(dead)).unwrap();

        let target = format!("{}/youtubei/v1/live_chat/get_live_chat", server.uri());
        let response = page.fetch(Request::post(&target).unwrap()).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_non_matching_call_sends_nothing_to_collector() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtubei/v1/player"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{\"b\":2}", "application/json"))
            .mount(&server)
            .await;

        let page = Page::new(Default::default()).unwrap();
        let config = TapConfig::new().relay_endpoint(format!("{}/forwardedChats", server.uri()));
        InterceptionHook::install(&page, &config).unwrap();

        let response = page
            .fetch(format!("{}/youtubei/v1/player", server.uri()))
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "{\"b\":2}");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(relay_posts(&server).await.is_empty());
    }
}
