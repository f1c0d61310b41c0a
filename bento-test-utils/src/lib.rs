//! Bento Test Utilities
//!
//! Shared test infrastructure for the Bento workspace:
//! - A scripted HTTP transport that records what the client sends
//! - Proptest generators for the entity types
//! - Fixtures for common session scenarios
//! - Assertions over client errors

pub use bento_client::{
    ApiClient, ClientError, ClientResult, HttpMethod, HttpRequest, HttpResponse, Transport,
    TransportError,
};
pub use bento_core::{
    ApiEnvelope, KeyId, KeyListing, KeyStatus, Language, Member, MemberRole, MemberStatus,
    Project, ProjectId, RoleId, TranslationKey, User, UserId,
};
pub use bento_storage::{Cache, CacheConfig, ManualClock, MemoryStorage};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
}

/// Transport that answers from a script keyed by method and path.
///
/// Unscripted routes answer 404. Every request is recorded, with the
/// headers the client attached, before the optional delay elapses.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a raw response for `method path`, replacing any earlier one.
    pub fn respond(&self, method: HttpMethod, path: &str, response: HttpResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Reply::Respond(response));
        self
    }

    pub fn respond_json(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        self.respond(method, path, HttpResponse::json(status, &body))
    }

    /// Make `method path` fail without a response, like a refused connection.
    pub fn fail(&self, method: HttpMethod, path: &str, reason: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Reply::Fail(reason.to_string()));
        self
    }

    /// Hold every response for `delay` before returning it.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.path.clone()))
            .cloned();
        self.requests.lock().unwrap().push(request);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(reason)) => Err(TransportError(reason)),
            None => Ok(HttpResponse::json(
                404,
                &serde_json::json!({"message": "No such route"}),
            )),
        }
    }
}

/// Client over a fresh [`MockTransport`], in-memory storage and a manual
/// clock, with handles to all three.
pub struct TestHarness {
    pub client: ApiClient,
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let cache = Cache::new(storage.clone(), clock.clone(), CacheConfig::default());
        let client = ApiClient::new(transport.clone(), cache);
        Self {
            client,
            transport,
            storage,
            clock,
        }
    }

    pub fn cache(&self) -> &Cache {
        self.client.cache()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Bento entity types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_language_code() -> impl Strategy<Value = String> {
        "[a-z]{2}"
    }

    pub fn arb_language() -> impl Strategy<Value = Language> {
        (arb_language_code(), "[A-Z][a-z]{2,10}( \\([A-Z]{2}\\))?")
            .prop_map(|(code, name)| Language::new(code, name))
    }

    pub fn arb_language_list() -> impl Strategy<Value = Vec<Language>> {
        prop::collection::vec(arb_language(), 0..12)
    }

    pub fn arb_project_id() -> impl Strategy<Value = ProjectId> {
        (1i64..10_000).prop_map(ProjectId::new)
    }

    pub fn arb_project() -> impl Strategy<Value = Project> {
        (arb_project_id(), "[A-Za-z ]{1,20}", 1i64..5, "(Admin|Developer|Translator|Viewer)")
            .prop_map(|(project_id, project_name, role_id, role_name)| Project {
                project_id,
                project_name,
                role_id: RoleId::new(role_id),
                role_name,
            })
    }

    pub fn arb_user() -> impl Strategy<Value = User> {
        (
            1i64..100_000,
            "[A-Z][a-z]{1,10}",
            "[A-Z][a-z]{1,10}",
            "[a-z]{1,10}@[a-z]{1,8}\\.com",
            prop::collection::vec(arb_project(), 0..4),
        )
            .prop_map(|(id, first_name, last_name, email, projects)| User {
                id: UserId::new(id),
                first_name,
                last_name,
                email,
                image_url: None,
                projects,
            })
    }

    pub fn arb_key_status() -> impl Strategy<Value = KeyStatus> {
        prop_oneof![
            Just(KeyStatus::Draft),
            Just(KeyStatus::Published),
            Just(KeyStatus::Archive),
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built payloads for common scenarios.

    use super::*;
    use serde_json::json;

    pub fn project(id: i64, name: &str) -> Project {
        Project {
            project_id: ProjectId::new(id),
            project_name: name.to_string(),
            role_id: RoleId::new(1),
            role_name: "Admin".to_string(),
        }
    }

    /// A user with two projects, "Website" (11) first.
    pub fn user_with_projects() -> User {
        User {
            id: UserId::new(42),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            image_url: None,
            projects: vec![project(11, "Website"), project(12, "Mobile App")],
        }
    }

    pub fn user_without_projects() -> User {
        User {
            projects: Vec::new(),
            ..user_with_projects()
        }
    }

    /// Wrap `data` in the backend's `{ message, data }` envelope.
    pub fn envelope<T: serde::Serialize>(message: &str, data: T) -> Value {
        json!({ "message": message, "data": data })
    }

    pub fn languages() -> Vec<Language> {
        vec![
            Language::new("en", "English"),
            Language::new("fr", "French"),
            Language::new("de", "German"),
        ]
    }

    pub fn translation_key(id: i64, key: &str, status: KeyStatus) -> TranslationKey {
        TranslationKey {
            key_id: KeyId::new(id),
            key: key.to_string(),
            tag: "web".to_string(),
            english: format!("Text for {}", key),
            status,
            last_updated_by: "Ada Lovelace".to_string(),
            last_updated_by_role: "Admin".to_string(),
            last_updated_at: "2023-12-01T09:30:00Z".to_string(),
        }
    }

    pub fn key_listing() -> KeyListing {
        KeyListing {
            translations: vec![
                translation_key(1, "home.title", KeyStatus::Published),
                translation_key(2, "home.subtitle", KeyStatus::Draft),
            ],
            projects: user_with_projects().projects,
            project_id: "11".to_string(),
            languages: languages(),
            ..KeyListing::default()
        }
    }

    pub fn members() -> Vec<Member> {
        vec![
            Member {
                id: "1".to_string(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                role: MemberRole::Admin,
                status: MemberStatus::Active,
                joined_at: "2023-11-02".to_string(),
            },
            Member {
                id: "2".to_string(),
                name: "Charles Babbage".to_string(),
                email: "charles@example.com".to_string(),
                role: MemberRole::Member,
                status: MemberStatus::Pending,
                joined_at: String::new(),
            },
        ]
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over client results.

    use super::*;
    use bento_client::Route;

    /// Assert the call failed as an expired session that sends the user to
    /// the login page.
    pub fn assert_unauthorized<T: std::fmt::Debug>(result: &ClientResult<T>) {
        match result {
            Err(err @ ClientError::Unauthorized { .. }) => {
                assert_eq!(err.redirect(), Some(Route::Login));
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    pub fn assert_cancelled<T: std::fmt::Debug>(result: &ClientResult<T>) {
        assert!(
            matches!(result, Err(ClientError::Cancelled)),
            "Expected Cancelled, got {:?}",
            result
        );
    }

    /// Assert no slot of the default namespace remains in `storage`.
    pub fn assert_cache_empty(storage: &MemoryStorage) {
        use bento_storage::StorageBackend;
        let keys = storage.keys().unwrap();
        assert!(
            keys.iter().all(|k| !k.starts_with(bento_storage::DEFAULT_NAMESPACE)),
            "Expected empty cache, found {:?}",
            keys
        );
    }
}
