//! API client with request and response interception.
//!
//! Every call passes through the same two hooks:
//!
//! - on the way out, the cached user id and project id are attached as
//!   `x-user-id` / `x-project-id` headers (omitted when not cached), plus a
//!   bearer token when one has been set;
//! - on the way back, 401 wipes the cache namespace and the token and
//!   surfaces [`ClientError::Unauthorized`], whose [`ClientError::redirect`]
//!   points at the login route. 403 is logged and surfaced as-is.
//!
//! Login is the exception: its 401 means bad credentials, not an expired
//! session, so it maps statuses itself and never touches the cache unless
//! the backend accepted the credentials.

use crate::cache_keys::{PROJECT_DATA, PROJECT_ID, SESSION_SLOTS, USER_DATA, USER_ID};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::inflight::{InflightRegistry, RequestKey};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
use bento_core::{
    ApiEnvelope, CreateKeyRequest, CreateProjectRequest, InviteMemberRequest, KeyDetails, KeyId,
    KeyListing, LoginRequest, Member, Project, RegisterRequest, UpdateKeyRequest, User,
};
use bento_storage::{Cache, FileStorage, SystemClock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const PROJECT_ID_HEADER: &str = "x-project-id";

pub const LOGIN_PATH: &str = "/auth/v1/login";
pub const REGISTER_PATH: &str = "/auth/v1/register";
pub const LIST_KEYS_PATH: &str = "/translations/v1/getAllKeys";
pub const KEY_DETAILS_PATH: &str = "/translations/v1/getKeyDetails";
pub const ADD_KEY_PATH: &str = "/translations/v1/addKey";
pub const UPDATE_KEY_PATH: &str = "/translations/v1/updateKey";
pub const MEMBERS_PATH: &str = "/projects/v1/members";
pub const INVITE_MEMBER_PATH: &str = "/projects/v1/members/invite";
pub const CREATE_PROJECT_PATH: &str = "/projects/v1/create";

/// Body of endpoints that only acknowledge. An empty body reads as the
/// default.
#[derive(Debug, Default, Deserialize)]
struct Ack {
    #[serde(default)]
    message: String,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    cache: Cache,
    auth_token: RwLock<Option<String>>,
    inflight: InflightRegistry,
}

/// Handle to the Bento backend. Clones share the cache, token and
/// in-flight registry.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("cache", &self.inner.cache)
            .field("inflight", &self.inner.inflight)
            .finish()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Cache) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                cache,
                auth_token: RwLock::new(None),
                inflight: InflightRegistry::new(),
            }),
        }
    }

    /// Client over reqwest with the cache persisted at the configured state
    /// file.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let state_file = config
            .state_file()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout())
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let storage = FileStorage::open(&state_file)?;
        let cache = Cache::new(Arc::new(storage), Arc::new(SystemClock), config.cache_config());
        Ok(Self::new(Arc::new(transport), cache))
    }

    pub fn cache(&self) -> &Cache {
        &self.inner.cache
    }

    pub fn inflight(&self) -> &InflightRegistry {
        &self.inner.inflight
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        let mut slot = self
            .inner
            .auth_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(token.into());
    }

    pub fn remove_auth_token(&self) {
        let mut slot = self
            .inner
            .auth_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }

    pub fn auth_token(&self) -> Option<String> {
        self.inner
            .auth_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Abort every pending request. Their callers see `Cancelled`.
    pub fn cancel_inflight(&self) -> usize {
        self.inner.inflight.cancel_all()
    }

    // ------------------------------------------------------------------------
    // Interception
    // ------------------------------------------------------------------------

    fn intercept_request(&self, mut request: HttpRequest) -> HttpRequest {
        let cache = &self.inner.cache;
        match cache.get(&USER_ID) {
            Ok(Some(user_id)) => request.headers.push((USER_ID_HEADER.to_string(), user_id.to_string())),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping user id header"),
        }
        match cache.get(&PROJECT_ID) {
            Ok(Some(project_id)) => request
                .headers
                .push((PROJECT_ID_HEADER.to_string(), project_id.to_string())),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping project id header"),
        }
        if let Some(token) = self.auth_token() {
            request
                .headers
                .push(("authorization".to_string(), format!("Bearer {}", token)));
        }
        request
    }

    fn intercept_response(
        &self,
        method: HttpMethod,
        path: &str,
        response: HttpResponse,
    ) -> ClientResult<Value> {
        if response.is_success() {
            return Ok(response.json_body()?);
        }

        let message = response.message();
        match response.status {
            401 => {
                tracing::warn!(%method, path, "Unauthorized response, clearing session");
                self.expire_session();
                Err(ClientError::Unauthorized {
                    message: message.unwrap_or_else(|| "Unauthorized".to_string()),
                })
            }
            403 => {
                tracing::warn!(%method, path, "Forbidden response");
                Err(ClientError::Forbidden {
                    message: message.unwrap_or_else(|| {
                        "You do not have permission to perform this action".to_string()
                    }),
                })
            }
            status => {
                tracing::error!(%method, path, status, "Request failed");
                Err(ClientError::Status {
                    status,
                    message: message
                        .unwrap_or_else(|| format!("Request failed with status {}", status)),
                })
            }
        }
    }

    fn expire_session(&self) {
        match self.inner.cache.clear() {
            Ok(removed) => tracing::debug!(removed, "Session cache cleared"),
            Err(e) => tracing::error!(error = %e, "Failed to clear session cache"),
        }
        self.remove_auth_token();
    }

    /// Send a request through the request interceptor and the in-flight
    /// registry, without interpreting the status.
    async fn dispatch(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let request = self.intercept_request(request);
        let key = RequestKey::from(&request);
        tracing::debug!(method = %request.method, path = %request.path, "Sending request");

        let transport = Arc::clone(&self.inner.transport);
        self.inner
            .inflight
            .run(key, async move {
                transport
                    .send(request)
                    .await
                    .map_err(|e| ClientError::Network(e.0))
            })
            .await
    }

    /// Send a request through both interceptors.
    pub async fn execute(&self, request: HttpRequest) -> ClientResult<Value> {
        let method = request.method;
        let path = request.path.clone();
        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(ClientError::Network(reason)) => {
                tracing::error!(%method, path = %path, reason = %reason, "No response received");
                return Err(ClientError::Network(reason));
            }
            Err(e) => return Err(e),
        };
        self.intercept_response(method, &path, response)
    }

    // ------------------------------------------------------------------------
    // Passthroughs
    // ------------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<T> {
        let mut request = HttpRequest::get(path);
        for (name, value) in query {
            request = request.with_query(*name, *value);
        }
        let value = self.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::post(path, serde_json::to_value(body)?);
        let value = self.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Authenticate and replace the cached session with the returned user.
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<User> {
        credentials.validate()?;
        let request = HttpRequest::post(LOGIN_PATH, serde_json::to_value(credentials)?);

        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(ClientError::Network(reason)) => {
                tracing::warn!(reason = %reason, "Login failed, no response");
                return Err(ClientError::Network(reason));
            }
            Err(e) => return Err(e),
        };

        if !response.is_success() {
            tracing::warn!(status = response.status, "Login rejected");
            return Err(if response.status == 401 {
                ClientError::InvalidCredentials
            } else {
                ClientError::Server
            });
        }

        let envelope: ApiEnvelope<User> = serde_json::from_str(&response.body)?;
        let user = envelope.into_data();
        self.start_session(&user)?;
        tracing::info!(user_id = %user.id, projects = user.projects.len(), "Logged in");
        Ok(user)
    }

    fn start_session(&self, user: &User) -> ClientResult<()> {
        let cache = &self.inner.cache;
        cache.clear()?;
        cache.set(&USER_DATA, user)?;
        cache.set(&USER_ID, &user.id)?;
        if let Some(project) = user.first_project() {
            cache.set(&PROJECT_ID, &project.project_id)?;
            cache.set(&PROJECT_DATA, project)?;
        }
        Ok(())
    }

    /// Create an account. The new user is cached without a project list and
    /// without a user id, so the session stays anonymous until login.
    pub async fn register(&self, registration: &RegisterRequest) -> ClientResult<User> {
        registration.validate()?;
        let envelope: ApiEnvelope<User> = self.post(REGISTER_PATH, registration).await?;
        let mut user = envelope.into_data();
        user.projects.clear();
        self.inner.cache.set(&USER_DATA, &user)?;
        tracing::info!(user_id = %user.id, "Registered");
        Ok(user)
    }

    pub fn logout(&self) -> ClientResult<()> {
        for slot in SESSION_SLOTS {
            self.inner.cache.remove_value(slot)?;
        }
        self.remove_auth_token();
        tracing::info!("Logged out");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------------

    /// Dashboard payload for the project in the `x-project-id` header.
    pub async fn list_keys(&self) -> ClientResult<KeyListing> {
        let envelope: ApiEnvelope<KeyListing> = self.post(LIST_KEYS_PATH, &json!({})).await?;
        Ok(envelope.into_data())
    }

    pub async fn key_details(&self, key_id: KeyId) -> ClientResult<KeyDetails> {
        let path = format!("{}/{}", KEY_DETAILS_PATH, key_id);
        let envelope: ApiEnvelope<Vec<KeyDetails>> = self.post(&path, &json!({})).await?;
        envelope
            .into_data()
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Status {
                status: 404,
                message: format!("Key {} not found", key_id),
            })
    }

    pub async fn add_key(&self, request: &CreateKeyRequest) -> ClientResult<String> {
        request.validate()?;
        let ack: Option<Ack> = self.post(ADD_KEY_PATH, request).await?;
        Ok(ack.unwrap_or_default().message)
    }

    pub async fn update_key(&self, key_id: KeyId, request: &UpdateKeyRequest) -> ClientResult<String> {
        request.validate()?;
        let path = format!("{}/{}", UPDATE_KEY_PATH, key_id);
        let ack: Option<Ack> = self.post(&path, request).await?;
        Ok(ack.unwrap_or_default().message)
    }

    pub async fn list_members(&self) -> ClientResult<Vec<Member>> {
        let envelope: ApiEnvelope<Vec<Member>> = self.get(MEMBERS_PATH, &[]).await?;
        Ok(envelope.into_data())
    }

    pub async fn invite_member(&self, request: &InviteMemberRequest) -> ClientResult<String> {
        request.validate()?;
        let ack: Option<Ack> = self.post(INVITE_MEMBER_PATH, request).await?;
        Ok(ack.unwrap_or_default().message)
    }

    pub async fn create_project(&self, request: &CreateProjectRequest) -> ClientResult<Project> {
        request.validate()?;
        let envelope: ApiEnvelope<Project> = self.post(CREATE_PROJECT_PATH, request).await?;
        Ok(envelope.into_data())
    }
}
