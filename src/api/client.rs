//! API client for the to-do list REST service.
//!
//! All outbound calls go through `ApiClient::call`, which layers four
//! policies over plain HTTP: a bearer token from the local store, a
//! short-lived response cache for GET calls, a serial FIFO queue with
//! fixed spacing between requests, and bounded retry with a fixed
//! delay.

// Allow dead code: CallOptions covers the full option surface even
// where the current pages only issue GETs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::storage::LocalStore;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the to-do list API
pub const DEFAULT_API_BASE: &str = "https://to-do-list-api-app.vercel.app/api/v1";

/// How long a cached GET response stays valid
const CACHE_DURATION: Duration = Duration::from_secs(30);

/// Spacing between queued requests, to avoid bursting the endpoint
const QUEUE_SPACING: Duration = Duration::from_millis(100);

/// Default per-call timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Maximum number of retries after a failed call
const MAX_RETRIES: u32 = 2;

/// Delay between retry attempts
const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Timeout for the health probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Session-level signals emitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A 401 response was observed; the stored token has been cleared
    /// and the UI should return to the login page.
    TokenExpired,
}

/// Per-call options. Every field has a stated default; `..Default::default()`
/// keeps call sites short.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub no_cache: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            no_cache: false,
        }
    }
}

impl CallOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Only GET calls without `no_cache` are served from / stored in
    /// the response cache.
    fn cacheable(&self) -> bool {
        self.method == Method::GET && !self.no_cache
    }

    fn cache_key(&self, path: &str) -> String {
        #[derive(Serialize)]
        struct KeyView<'a> {
            method: &'a str,
            headers: &'a [(String, String)],
            body: &'a Option<Value>,
            timeout_ms: u128,
            no_cache: bool,
        }
        let view = KeyView {
            method: self.method.as_str(),
            headers: &self.headers,
            body: &self.body,
            timeout_ms: self.timeout.as_millis(),
            no_cache: self.no_cache,
        };
        // KeyView has no unserializable fields, so this cannot fail
        let options = serde_json::to_string(&view).unwrap_or_default();
        format!("{}:{}", path, options)
    }
}

struct CacheEntry {
    data: Value,
    stored_at: Instant,
}

impl CacheEntry {
    fn new(data: Value) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > CACHE_DURATION
    }
}

enum CallOutcome {
    Json(Value),
    /// 401 observed: token cleared, redirect signalled. The value is
    /// moot once navigation happens, so the call resolves empty.
    Unauthorized,
}

/// API client for the to-do list service.
/// Clone is cheap - all state is shared behind an Arc.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    base_url: String,
    store: Arc<LocalStore>,
    cache: Mutex<HashMap<String, CacheEntry>>,
    /// tokio's Mutex is fair, so waiters are granted the lock in FIFO
    /// order - this is the serial request queue.
    queue: tokio::sync::Mutex<()>,
    events: UnboundedSender<SessionEvent>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<LocalStore>,
        events: UnboundedSender<SessionEvent>,
    ) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.into(),
                store,
                cache: Mutex::new(HashMap::new()),
                queue: tokio::sync::Mutex::new(()),
                events,
            }),
        })
    }

    /// Perform an API call with caching, queueing, and retry.
    ///
    /// Resolves to the parsed JSON body. Failures are retried up to
    /// `MAX_RETRIES` times regardless of kind (including 4xx responses);
    /// after that the last error propagates. A 401 is the exception: it
    /// is never retried and resolves to `Value::Null` after clearing
    /// the token and signalling the redirect.
    pub async fn call(&self, path: &str, options: CallOptions) -> Result<Value, ApiError> {
        let key = options.cache_key(path);

        if options.cacheable() {
            if let Some(hit) = self.cache_lookup(&key) {
                debug!(path, "cache hit");
                return Ok(hit);
            }
        }

        let mut retries_left = MAX_RETRIES;
        loop {
            match self.execute_queued(path, &options).await {
                Ok(CallOutcome::Json(value)) => {
                    if options.cacheable() {
                        self.cache_store(key, value.clone());
                    }
                    return Ok(value);
                }
                Ok(CallOutcome::Unauthorized) => return Ok(Value::Null),
                Err(err) => {
                    if retries_left == 0 {
                        warn!(path, error = %err, "call failed after {} retries", MAX_RETRIES);
                        return Err(err);
                    }
                    retries_left -= 1;
                    debug!(path, error = %err, retries_left, "call failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    /// Probe the service health endpoint, which lives at the origin
    /// root outside the versioned API prefix.
    pub async fn check_health(&self) -> bool {
        let origin = self.inner.base_url.trim_end_matches("/api/v1");
        let url = format!("{}/health", origin);
        match self
            .inner
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn clear_cache(&self) {
        self.cache_mut().clear();
    }

    // ===== Queue =====

    async fn execute_queued(
        &self,
        path: &str,
        options: &CallOptions,
    ) -> Result<CallOutcome, ApiError> {
        let _slot = self.inner.queue.lock().await;
        tokio::time::sleep(QUEUE_SPACING).await;
        self.execute(path, options).await
    }

    // ===== Request execution =====

    async fn execute(&self, path: &str, options: &CallOptions) -> Result<CallOutcome, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        let mut request = self
            .inner
            .http
            .request(options.method.clone(), &url)
            .timeout(options.timeout)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.inner.store.token() {
            request = request.bearer_auth(token);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();

        if status.as_u16() == 401 {
            warn!(path, "401 response, clearing stored token");
            self.inner.store.clear_token();
            let _ = self.inner.events.send(SessionEvent::TokenExpired);
            return Ok(CallOutcome::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await.map_err(ApiError::from_transport)?;
        let value = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(CallOutcome::Json(value))
    }

    // ===== Cache =====

    fn cache_lookup(&self, key: &str) -> Option<Value> {
        self.cache_lookup_at(key, Instant::now())
    }

    fn cache_lookup_at(&self, key: &str, now: Instant) -> Option<Value> {
        let mut cache = self.cache_mut();
        match cache.get(key) {
            Some(entry) if !entry.is_expired_at(now) => Some(entry.data.clone()),
            Some(_) => {
                // Expired entries are evicted lazily, on the read that
                // finds them stale
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    fn cache_store(&self, key: String, data: Value) {
        self.cache_mut().insert(key, CacheEntry::new(data));
    }

    fn cache_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.inner.cache.lock().expect("cache mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestRig {
        client: ApiClient,
        store: Arc<LocalStore>,
        events: UnboundedReceiver<SessionEvent>,
        _dir: TempDir,
    }

    fn rig(base_url: &str) -> TestRig {
        let dir = TempDir::new().expect("tempdir");
        let store = Arc::new(LocalStore::open(dir.path()).expect("store"));
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(base_url, store.clone(), tx).expect("client");
        TestRig {
            client,
            store,
            events: rx,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn get_calls_are_cached_within_the_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
            .expect(1)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let first = rig.client.call("/tasks", CallOptions::get()).await.unwrap();
        let second = rig.client.call("/tasks", CallOptions::get()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn no_cache_calls_always_hit_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
            .expect(2)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        rig.client
            .call("/tasks", CallOptions::get().no_cache())
            .await
            .unwrap();
        rig.client
            .call("/tasks", CallOptions::get().no_cache())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clear_cache_forces_a_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {}})))
            .expect(2)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        rig.client
            .call("/user/info", CallOptions::get())
            .await
            .unwrap();
        rig.client.clear_cache();
        rig.client
            .call("/user/info", CallOptions::get())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn expired_entries_are_evicted_on_read() {
        let rig = rig("http://unused.invalid");
        let key = CallOptions::get().cache_key("/tasks");
        rig.client.cache_store(key.clone(), json!({"stale": true}));

        let past_expiry = Instant::now() + CACHE_DURATION + Duration::from_secs(1);
        assert!(rig.client.cache_lookup_at(&key, past_expiry).is_none());
        // The stale entry was removed, not just skipped
        assert!(!rig.client.cache_mut().contains_key(&key));
    }

    #[tokio::test]
    async fn fresh_entries_are_served() {
        let rig = rig("http://unused.invalid");
        let key = CallOptions::get().cache_key("/tasks");
        rig.client.cache_store(key.clone(), json!({"fresh": true}));
        assert_eq!(rig.client.cache_lookup(&key), Some(json!({"fresh": true})));

        let just_inside = Instant::now() + CACHE_DURATION - Duration::from_secs(1);
        assert!(rig.client.cache_lookup_at(&key, just_inside).is_some());
    }

    #[test]
    fn cache_keys_distinguish_path_and_options() {
        let get = CallOptions::get();
        assert_ne!(get.cache_key("/tasks"), get.cache_key("/user/info"));
        assert_ne!(
            get.cache_key("/tasks"),
            CallOptions::get().no_cache().cache_key("/tasks")
        );
        assert_ne!(
            get.cache_key("/tasks"),
            CallOptions::post(json!({})).cache_key("/tasks")
        );
        // Deterministic for equal inputs
        assert_eq!(
            CallOptions::get().cache_key("/tasks"),
            CallOptions::get().cache_key("/tasks")
        );
    }

    #[tokio::test]
    async fn sends_bearer_token_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/info"))
            .and(header_eq("authorization", "Bearer tok-123"))
            .and(header_eq("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        rig.store.set_token("tok-123").unwrap();
        rig.client
            .call("/user/info", CallOptions::get())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn retries_twice_then_succeeds() {
        let server = MockServer::start().await;
        // First two attempts fail, third succeeds
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": [1]})))
            .expect(1)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let value = rig.client.call("/tasks", CallOptions::get()).await.unwrap();
        assert_eq!(value, json!({"tasks": [1]}));
    }

    #[tokio::test]
    async fn rejects_with_last_error_after_exhausting_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .expect(3)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let err = rig
            .client
            .call("/tasks", CallOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
    }

    #[tokio::test]
    async fn client_errors_are_retried_uniformly() {
        // 404s go through the same retry loop as 5xx failures
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .expect(3)
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let err = rig
            .client
            .call("/missing", CallOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_signals_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let mut rig = rig(&server.uri());
        rig.store.set_token("stale-token").unwrap();

        let value = rig.client.call("/tasks", CallOptions::get()).await.unwrap();
        assert_eq!(value, Value::Null);
        assert!(rig.store.token().is_none());
        assert_eq!(rig.events.try_recv().ok(), Some(SessionEvent::TokenExpired));

        // The empty result must not have been cached: a second call
        // reaches the network again (hence expect(2) above).
        let again = rig.client.call("/tasks", CallOptions::get()).await.unwrap();
        assert_eq!(again, Value::Null);
    }

    #[tokio::test]
    async fn slow_responses_surface_as_timeouts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let err = rig
            .client
            .call(
                "/tasks",
                CallOptions::get().timeout(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[tokio::test]
    async fn unparseable_bodies_are_invalid_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let rig = rig(&server.uri());
        let err = rig
            .client
            .call("/tasks", CallOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn health_probe_hits_origin_root() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let rig = rig(&format!("{}/api/v1", server.uri()));
        assert!(rig.client.check_health().await);
    }

    #[tokio::test]
    async fn health_probe_fails_closed() {
        let rig = rig("http://127.0.0.1:1/api/v1");
        assert!(!rig.client.check_health().await);
    }
}
