//! In-memory resource cache with in-flight de-duplication.
//!
//! Values are handed out as `Arc`s: a caller inside the fresh window
//! receives the same allocation the first caller got, and concurrent
//! callers during a load share one future instead of racing duplicate
//! requests. Errors are `Arc`'d too so a shared failure reaches every
//! waiter.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, CallOptions};
use crate::models::{parse_task_list, parse_user_info, AnalyticsBundle, Task, UserProfile};

/// How long a loaded resource stays fresh without re-fetching.
/// Independent of the API client's own response cache.
const FRESH_WINDOW: Duration = Duration::from_secs(30);

pub type LoadResult<T> = Result<Arc<T>, Arc<ApiError>>;

type InFlight<T> = Shared<BoxFuture<'static, LoadResult<T>>>;

struct FreshValue<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

impl<T> FreshValue<T> {
    fn new(value: Arc<T>) -> Self {
        Self {
            value,
            loaded_at: Instant::now(),
        }
    }

    fn is_fresh(&self) -> bool {
        self.loaded_at.elapsed() < FRESH_WINDOW
    }
}

#[derive(Default)]
struct DataState {
    user: Option<FreshValue<UserProfile>>,
    // Task freshness is scoped to the page it was loaded with
    tasks: Option<(FreshValue<Vec<Task>>, u32, u32)>,
    analytics: Option<Arc<AnalyticsBundle>>,
    user_inflight: Option<InFlight<UserProfile>>,
    tasks_inflight: Option<InFlight<Vec<Task>>>,
    analytics_inflight: Option<InFlight<AnalyticsBundle>>,
}

/// Data manager for the three named resources.
/// Clone is cheap - all state is shared behind an Arc.
#[derive(Clone)]
pub struct DataManager {
    inner: Arc<DataInner>,
}

struct DataInner {
    api: ApiClient,
    state: Mutex<DataState>,
}

impl DataManager {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(DataInner {
                api,
                state: Mutex::new(DataState::default()),
            }),
        }
    }

    /// Load the user profile, serving a fresh cached value unless
    /// `force_refresh` is set. Concurrent callers share one request.
    pub async fn load_user_info(&self, force_refresh: bool) -> LoadResult<UserProfile> {
        let fut = {
            let mut state = self.lock();
            if !force_refresh {
                if let Some(cached) = &state.user {
                    if cached.is_fresh() {
                        debug!("user info fresh, skipping network");
                        return Ok(cached.value.clone());
                    }
                }
            }
            if let Some(inflight) = &state.user_inflight {
                inflight.clone()
            } else {
                let mgr = self.clone();
                let fut: InFlight<UserProfile> = async move {
                    let result = mgr.fetch_user().await.map(Arc::new).map_err(Arc::new);
                    let mut state = mgr.lock();
                    state.user_inflight = None;
                    if let Ok(value) = &result {
                        state.user = Some(FreshValue::new(value.clone()));
                    }
                    result
                }
                .boxed()
                .shared();
                state.user_inflight = Some(fut.clone());
                fut
            }
        };
        fut.await
    }

    /// Load one page of tasks. A repeat call for the same page inside
    /// the fresh window returns the previously loaded list unchanged.
    pub async fn load_tasks(
        &self,
        force_refresh: bool,
        page: u32,
        page_size: u32,
    ) -> LoadResult<Vec<Task>> {
        let fut = {
            let mut state = self.lock();
            if !force_refresh {
                if let Some((cached, p, size)) = &state.tasks {
                    if *p == page && *size == page_size && cached.is_fresh() {
                        debug!(page, "task list fresh, skipping network");
                        return Ok(cached.value.clone());
                    }
                }
            }
            if let Some(inflight) = &state.tasks_inflight {
                inflight.clone()
            } else {
                let mgr = self.clone();
                let fut: InFlight<Vec<Task>> = async move {
                    let result = mgr
                        .fetch_tasks(page, page_size)
                        .await
                        .map(Arc::new)
                        .map_err(Arc::new);
                    let mut state = mgr.lock();
                    state.tasks_inflight = None;
                    if let Ok(value) = &result {
                        state.tasks = Some((FreshValue::new(value.clone()), page, page_size));
                    }
                    result
                }
                .boxed()
                .shared();
                state.tasks_inflight = Some(fut.clone());
                fut
            }
        };
        fut.await
    }

    /// Load the analytics bundle: three endpoints fanned out
    /// concurrently, each failure isolated to its own field. Concurrent
    /// callers share one fan-out; completed bundles are kept for
    /// rendering but every new call re-fetches.
    pub async fn load_analytics(&self) -> LoadResult<AnalyticsBundle> {
        let fut = {
            let mut state = self.lock();
            if let Some(inflight) = &state.analytics_inflight {
                inflight.clone()
            } else {
                let mgr = self.clone();
                let fut: InFlight<AnalyticsBundle> = async move {
                    let bundle = Arc::new(mgr.fetch_analytics().await);
                    let mut state = mgr.lock();
                    state.analytics_inflight = None;
                    state.analytics = Some(bundle.clone());
                    Ok(bundle)
                }
                .boxed()
                .shared();
                state.analytics_inflight = Some(fut.clone());
                fut
            }
        };
        fut.await
    }

    /// Drop all cached values and in-flight markers, and clear the
    /// underlying client's response cache. Used after mutations that
    /// invalidate prior reads.
    pub fn clear_cache(&self) {
        *self.lock() = DataState::default();
        self.inner.api.clear_cache();
    }

    // ===== Cached accessors (no network) =====

    pub fn cached_user(&self) -> Option<Arc<UserProfile>> {
        self.lock().user.as_ref().map(|c| c.value.clone())
    }

    pub fn cached_tasks(&self) -> Option<Arc<Vec<Task>>> {
        self.lock().tasks.as_ref().map(|(c, _, _)| c.value.clone())
    }

    pub fn cached_analytics(&self) -> Option<Arc<AnalyticsBundle>> {
        self.lock().analytics.clone()
    }

    // ===== Fetchers =====

    async fn fetch_user(&self) -> Result<UserProfile, ApiError> {
        let value = self.inner.api.call("/user/info", CallOptions::get()).await?;
        parse_user_info(value)
            .ok_or_else(|| ApiError::InvalidResponse("unrecognized user payload".to_string()))
    }

    async fn fetch_tasks(&self, page: u32, page_size: u32) -> Result<Vec<Task>, ApiError> {
        let path = format!("/tasks?page={}&pageSize={}", page, page_size);
        let value = self.inner.api.call(&path, CallOptions::get()).await?;
        Ok(parse_task_list(value))
    }

    async fn fetch_analytics(&self) -> AnalyticsBundle {
        let api = &self.inner.api;
        let (overview, tasks, habits) = tokio::join!(
            api.call("/analytics/overview", CallOptions::get()),
            api.call("/analytics/tasks", CallOptions::get()),
            api.call("/analytics/habits", CallOptions::get()),
        );

        AnalyticsBundle {
            overview: Self::sub_result("overview", overview)
                .and_then(|v| serde_json::from_value(v).ok()),
            tasks: Self::sub_result("tasks", tasks),
            habits: Self::sub_result("habits", habits),
        }
    }

    fn sub_result(name: &str, result: Result<Value, ApiError>) -> Option<Value> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(endpoint = name, error = %e, "analytics sub-call failed");
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DataState> {
        self.inner.state.lock().expect("data state mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::storage::LocalStore;

    fn manager_for(server_uri: &str, dir: &TempDir) -> DataManager {
        let store = Arc::new(LocalStore::open(dir.path()).expect("store"));
        let (tx, _rx) = mpsc::unbounded_channel();
        let api = ApiClient::new(server_uri, store, tx).expect("client");
        DataManager::new(api)
    }

    fn task_body() -> serde_json::Value {
        json!({ "tasks": [
            { "id": 1, "title": "One", "status": "pending" },
            { "id": 2, "title": "Two", "status": "completed" }
        ]})
    }

    #[tokio::test]
    async fn repeat_loads_inside_the_window_share_the_same_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let first = mgr.load_tasks(false, 1, 50).await.unwrap();
        let second = mgr.load_tasks(false, 1, 50).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_the_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body()))
            .expect(2)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        mgr.load_tasks(false, 1, 50).await.unwrap();
        // The client's own response cache would still serve the page,
        // so drop it to observe the second network call.
        // (force_refresh governs the manager's window only.)
        mgr.inner.api.clear_cache();
        mgr.load_tasks(true, 1, 50).await.unwrap();
    }

    #[tokio::test]
    async fn a_different_page_is_a_cache_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let page_one = mgr.load_tasks(false, 1, 50).await.unwrap();
        let page_two = mgr.load_tasks(false, 2, 50).await.unwrap();
        assert_eq!(page_one.len(), 2);
        assert!(page_two.is_empty());
    }

    #[tokio::test]
    async fn concurrent_loads_issue_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(task_body())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let (a, b, c) = tokio::join!(
            mgr.load_tasks(false, 1, 50),
            mgr.load_tasks(false, 1, 50),
            mgr.load_tasks(false, 1, 50),
        );
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn concurrent_failures_share_the_same_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/info"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            // One de-duplicated load = initial attempt + 2 retries
            .expect(3)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let (a, b) = tokio::join!(mgr.load_user_info(false), mgr.load_user_info(false));
        let (a, b) = (a.unwrap_err(), b.unwrap_err());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(matches!(*a, ApiError::ServerError(_)));
    }

    #[tokio::test]
    async fn analytics_isolates_sub_call_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/overview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_tasks": 10, "completed_tasks": 5
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/analytics/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"by_category": {}})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/analytics/habits"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let bundle = mgr.load_analytics().await.unwrap();
        let overview = bundle.overview.as_ref().expect("overview present");
        assert_eq!(overview.total_tasks, 10);
        assert!(bundle.tasks.is_some());
        assert!(bundle.habits.is_none());
    }

    #[tokio::test]
    async fn clear_cache_drops_fresh_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_body()))
            .expect(2)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        mgr.load_tasks(false, 1, 50).await.unwrap();
        assert!(mgr.cached_tasks().is_some());
        mgr.clear_cache();
        assert!(mgr.cached_tasks().is_none());
        mgr.load_tasks(false, 1, 50).await.unwrap();
    }

    #[tokio::test]
    async fn user_load_populates_cached_accessor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "username": "komkem" }
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mgr = manager_for(&server.uri(), &dir);

        let profile = mgr.load_user_info(false).await.unwrap();
        assert_eq!(profile.username, "komkem");
        assert!(mgr.cached_user().is_some());
    }
}
