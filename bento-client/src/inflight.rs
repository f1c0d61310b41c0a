//! Registry of requests currently on the wire.
//!
//! Identical requests issued while one is pending share its response rather
//! than hitting the network twice. Navigation cancels everything pending:
//! callers get [`ClientError::Cancelled`] and the late response is dropped
//! before anyone can act on it.

use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Identity of a request for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: HttpMethod,
    pub path: String,
    pub params: String,
}

impl RequestKey {
    pub fn new(method: HttpMethod, path: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: params.into(),
        }
    }
}

/// Params cover the query (sorted), every header the interceptor attached
/// (sorted, names lowercased) and the body, so calls made on behalf of
/// different users or projects never share a response.
impl From<&HttpRequest> for RequestKey {
    fn from(request: &HttpRequest) -> Self {
        let mut query: Vec<_> = request.query.iter().collect();
        query.sort();
        let mut headers: Vec<_> = request
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        headers.sort();

        let mut params = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        params.push('|');
        params.push_str(
            &headers
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect::<Vec<_>>()
                .join(";"),
        );
        if let Some(body) = &request.body {
            params.push('|');
            params.push_str(&body.to_string());
        }
        Self::new(request.method, request.path.clone(), params)
    }
}

type SharedCall = Shared<BoxFuture<'static, ClientResult<HttpResponse>>>;

struct PendingCall {
    generation: u64,
    call: SharedCall,
}

struct RegistryState {
    pending: HashMap<RequestKey, PendingCall>,
    token: CancellationToken,
    next_generation: u64,
}

#[derive(Clone)]
pub struct InflightRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl Default for InflightRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InflightRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InflightRegistry")
            .field("pending", &self.len())
            .finish()
    }
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState {
                pending: HashMap::new(),
                token: CancellationToken::new(),
                next_generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // The state is a plain map; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of distinct requests currently pending.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `call` unless an identical request is already pending, in which
    /// case wait for that one instead.
    pub async fn run<F>(&self, key: RequestKey, call: F) -> ClientResult<HttpResponse>
    where
        F: Future<Output = ClientResult<HttpResponse>> + Send + 'static,
    {
        let (generation, shared) = {
            let mut state = self.lock();
            if let Some(pending) = state.pending.get(&key) {
                tracing::debug!(method = %key.method, path = %key.path, "Joining in-flight request");
                (pending.generation, pending.call.clone())
            } else {
                let token = state.token.clone();
                let shared = async move {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => Err(ClientError::Cancelled),
                        result = call => result,
                    }
                }
                .boxed()
                .shared();

                let generation = state.next_generation;
                state.next_generation += 1;
                state.pending.insert(
                    key.clone(),
                    PendingCall {
                        generation,
                        call: shared.clone(),
                    },
                );
                (generation, shared)
            }
        };

        // Clears the entry even when this caller is dropped mid-await.
        let _guard = PendingGuard {
            registry: self,
            key,
            generation,
        };
        shared.await
    }

    fn finish(&self, key: &RequestKey, generation: u64) {
        let mut state = self.lock();
        let current = state
            .pending
            .get(key)
            .is_some_and(|pending| pending.generation == generation);
        if current {
            state.pending.remove(key);
        }
    }

    /// Cancel every pending request. Returns how many were pending.
    pub fn cancel_all(&self) -> usize {
        let mut state = self.lock();
        let cancelled = state.pending.len();
        let token = std::mem::replace(&mut state.token, CancellationToken::new());
        state.pending.clear();
        drop(state);

        token.cancel();
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled in-flight requests");
        }
        cancelled
    }
}

struct PendingGuard<'a> {
    registry: &'a InflightRegistry,
    key: RequestKey,
    generation: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.registry.finish(&self.key, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn slow_ok(counter: Arc<AtomicUsize>, delay: Duration) -> impl Future<Output = ClientResult<HttpResponse>> + Send {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    #[test]
    fn test_request_key_includes_params() {
        let a = HttpRequest::post("/x", json!({"a": 1}));
        let b = HttpRequest::post("/x", json!({"a": 2}));
        assert_ne!(RequestKey::from(&a), RequestKey::from(&b));
        assert_eq!(RequestKey::from(&a), RequestKey::from(&a.clone()));

        let q1 = HttpRequest::get("/x").with_query("page", "1");
        let q2 = HttpRequest::get("/x").with_query("page", "2");
        assert_ne!(RequestKey::from(&q1), RequestKey::from(&q2));
    }

    #[test]
    fn test_request_key_ignores_query_order() {
        let ab = HttpRequest::get("/x").with_query("a", "1").with_query("b", "2");
        let ba = HttpRequest::get("/x").with_query("b", "2").with_query("a", "1");
        assert_eq!(RequestKey::from(&ab), RequestKey::from(&ba));
    }

    #[test]
    fn test_request_key_includes_identity_headers() {
        let one = HttpRequest::get("/keys").with_header("x-project-id", "1");
        let two = HttpRequest::get("/keys").with_header("x-project-id", "2");
        assert_ne!(RequestKey::from(&one), RequestKey::from(&two));

        let upper = HttpRequest::get("/keys").with_header("X-Project-Id", "1");
        assert_eq!(RequestKey::from(&one), RequestKey::from(&upper));
    }

    #[tokio::test]
    async fn test_identical_requests_share_one_call() {
        let registry = InflightRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let key = RequestKey::new(HttpMethod::Get, "/k", "");

        let (a, b) = tokio::join!(
            registry.run(key.clone(), slow_ok(counter.clone(), Duration::from_millis(30))),
            registry.run(key.clone(), slow_ok(counter.clone(), Duration::from_millis(30))),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_requests_run_separately() {
        let registry = InflightRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            registry.run(
                RequestKey::new(HttpMethod::Get, "/a", ""),
                slow_ok(counter.clone(), Duration::from_millis(5))
            ),
            registry.run(
                RequestKey::new(HttpMethod::Get, "/b", ""),
                slow_ok(counter.clone(), Duration::from_millis(5))
            ),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancel_all_fails_pending_callers() {
        let registry = InflightRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let key = RequestKey::new(HttpMethod::Get, "/slow", "");

        let task = {
            let registry = registry.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                registry
                    .run(key, slow_ok(counter, Duration::from_secs(30)))
                    .await
            })
        };

        while registry.is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(registry.cancel_all(), 1);

        let result = task.await.unwrap();
        assert_eq!(result, Err(ClientError::Cancelled));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_waiter_releases_entry() {
        let registry = InflightRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let key = RequestKey::new(HttpMethod::Get, "/slow", "");

        let timed_out = tokio::time::timeout(
            Duration::from_millis(10),
            registry.run(key.clone(), slow_ok(counter.clone(), Duration::from_secs(30))),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(registry.is_empty());

        // The next identical request makes its own call.
        let result = registry
            .run(key, slow_ok(counter.clone(), Duration::from_millis(1)))
            .await;
        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_requests_after_cancel_proceed() {
        let registry = InflightRegistry::new();
        registry.cancel_all();
        let counter = Arc::new(AtomicUsize::new(0));
        let result = registry
            .run(
                RequestKey::new(HttpMethod::Get, "/after", ""),
                slow_ok(counter, Duration::from_millis(1)),
            )
            .await;
        assert!(result.is_ok());
    }
}
