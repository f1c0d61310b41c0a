use bento_client::cache_keys::{PROJECT_DATA, PROJECT_ID, SUPPORTED_LANGUAGES, USER_DATA, USER_ID};
use bento_client::client::{LIST_KEYS_PATH, LOGIN_PATH, MEMBERS_PATH, REGISTER_PATH};
use bento_client::{ClientError, HttpMethod, Route, PROJECT_ID_HEADER, USER_ID_HEADER};
use bento_core::{Language, LoginRequest, ProjectId, RegisterRequest, UserId};
use bento_storage::StorageBackend;
use bento_test_utils::assertions::{assert_cache_empty, assert_cancelled, assert_unauthorized};
use bento_test_utils::fixtures;
use bento_test_utils::TestHarness;
use serde_json::{json, Value};
use std::time::Duration;

fn credentials() -> LoginRequest {
    LoginRequest::new("ada@example.com", "correct horse")
}

#[tokio::test]
async fn login_populates_user_and_first_project() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_with_projects()),
    );

    let user = h.client.login(&credentials()).await.unwrap();
    assert_eq!(user.id, UserId::new(42));

    let cache = h.cache();
    assert_eq!(cache.get(&USER_ID).unwrap(), Some(UserId::new(42)));
    assert_eq!(cache.get(&USER_DATA).unwrap(), Some(user.clone()));
    assert_eq!(cache.get(&PROJECT_ID).unwrap(), Some(ProjectId::new(11)));
    assert_eq!(
        cache.get(&PROJECT_DATA).unwrap().map(|p| p.project_name),
        Some("Website".to_string())
    );

    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.body, Some(json!({"email": "ada@example.com", "password": "correct horse"})));
}

#[tokio::test]
async fn login_without_projects_leaves_project_unset() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_without_projects()),
    );

    h.client.login(&credentials()).await.unwrap();
    assert_eq!(h.cache().get(&USER_ID).unwrap(), Some(UserId::new(42)));
    assert_eq!(h.cache().get(&PROJECT_ID).unwrap(), None);
}

#[tokio::test]
async fn login_replaces_previous_session() {
    let h = TestHarness::new();
    h.cache().set(&PROJECT_ID, &ProjectId::new(99)).unwrap();
    h.cache()
        .set(&SUPPORTED_LANGUAGES, &vec![Language::new("fr", "French")])
        .unwrap();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_without_projects()),
    );

    h.client.login(&credentials()).await.unwrap();
    assert_eq!(h.cache().get(&PROJECT_ID).unwrap(), None);
    assert_eq!(h.cache().get(&SUPPORTED_LANGUAGES).unwrap(), None);
}

#[tokio::test]
async fn invalid_credentials_leave_cache_untouched() {
    let h = TestHarness::new();
    h.cache().set(&USER_ID, &UserId::new(7)).unwrap();
    h.storage.set_item("theme", "dark").unwrap();
    let before = h.storage.keys().unwrap();

    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        401,
        json!({"message": "bad password"}),
    );

    let err = h.client.login(&credentials()).await.unwrap_err();
    assert_eq!(err, ClientError::InvalidCredentials);
    assert_eq!(err.user_message(), "Invalid email or password");
    assert_eq!(err.redirect(), None);
    assert_eq!(h.storage.keys().unwrap(), before);
    assert_eq!(h.cache().get(&USER_ID).unwrap(), Some(UserId::new(7)));
}

#[tokio::test]
async fn login_maps_server_and_network_failures() {
    let h = TestHarness::new();
    h.transport
        .respond_json(HttpMethod::Post, LOGIN_PATH, 500, json!({}));
    let err = h.client.login(&credentials()).await.unwrap_err();
    assert_eq!(err.user_message(), "Internal server error");

    h.transport
        .fail(HttpMethod::Post, LOGIN_PATH, "connection refused");
    let err = h.client.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.user_message(), "Network error occurred");
}

#[tokio::test]
async fn login_rejects_malformed_credentials_locally() {
    let h = TestHarness::new();
    let err = h
        .client
        .login(&LoginRequest::new("not-an-email", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn register_caches_user_but_stays_anonymous() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        REGISTER_PATH,
        201,
        fixtures::envelope("created", fixtures::user_with_projects()),
    );

    let registration = RegisterRequest {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        password: "secret".into(),
    };
    let user = h.client.register(&registration).await.unwrap();
    assert!(user.projects.is_empty());
    assert_eq!(h.cache().get(&USER_DATA).unwrap(), Some(user));
    assert_eq!(h.cache().get(&USER_ID).unwrap(), None);

    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.body.as_ref().unwrap()["firstName"], "Ada");
}

#[tokio::test]
async fn identity_headers_follow_the_cache() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Get,
        MEMBERS_PATH,
        200,
        fixtures::envelope("", fixtures::members()),
    );

    h.client.list_members().await.unwrap();
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.header(USER_ID_HEADER), None);
    assert_eq!(sent.header(PROJECT_ID_HEADER), None);

    h.cache().set(&USER_ID, &UserId::new(42)).unwrap();
    h.client.list_members().await.unwrap();
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.header(USER_ID_HEADER), Some("42"));
    assert_eq!(sent.header(PROJECT_ID_HEADER), None);

    h.cache().set(&PROJECT_ID, &ProjectId::new(11)).unwrap();
    h.client.list_members().await.unwrap();
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.header(PROJECT_ID_HEADER), Some("11"));
}

#[tokio::test]
async fn unauthorized_clears_cache_and_redirects_to_login() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_with_projects()),
    );
    h.client.login(&credentials()).await.unwrap();
    h.client.set_auth_token("abc");
    h.storage.set_item("unrelated", "kept").unwrap();

    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        401,
        json!({"message": "token expired"}),
    );
    let result = h.client.list_keys().await;
    assert_unauthorized(&result);
    assert_cache_empty(&h.storage);
    assert_eq!(h.storage.get_item("unrelated").unwrap().as_deref(), Some("kept"));
    assert_eq!(h.client.auth_token(), None);
    assert_eq!(result.unwrap_err().redirect(), Some(Route::Login));
}

#[tokio::test]
async fn forbidden_is_surfaced_without_touching_session() {
    let h = TestHarness::new();
    h.cache().set(&USER_ID, &UserId::new(42)).unwrap();
    h.transport.respond_json(
        HttpMethod::Get,
        MEMBERS_PATH,
        403,
        json!({"message": "Admins only"}),
    );

    let err = h.client.list_members().await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Forbidden {
            message: "Admins only".to_string()
        }
    );
    assert_eq!(err.redirect(), None);
    assert_eq!(h.cache().get(&USER_ID).unwrap(), Some(UserId::new(42)));
}

#[tokio::test]
async fn network_failure_is_reported() {
    let h = TestHarness::new();
    h.transport
        .fail(HttpMethod::Get, MEMBERS_PATH, "connection reset");
    let err = h.client.list_members().await.unwrap_err();
    assert_eq!(err, ClientError::Network("connection reset".to_string()));
}

#[tokio::test]
async fn identical_concurrent_requests_hit_network_once() {
    let h = TestHarness::new();
    h.transport.set_delay(Duration::from_millis(50));
    h.transport.respond_json(
        HttpMethod::Get,
        MEMBERS_PATH,
        200,
        fixtures::envelope("", fixtures::members()),
    );

    let (a, b) = tokio::join!(h.client.list_members(), h.client.list_members());
    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
    assert_eq!(h.transport.calls_to(MEMBERS_PATH), 1);

    // Once settled, the next request goes out again.
    h.client.list_members().await.unwrap();
    assert_eq!(h.transport.calls_to(MEMBERS_PATH), 2);
}

#[tokio::test]
async fn cancelled_request_discards_late_response() {
    let h = TestHarness::new();
    h.cache().set(&USER_ID, &UserId::new(42)).unwrap();
    h.transport.set_delay(Duration::from_secs(30));
    // Would wipe the session if it were ever processed.
    h.transport
        .respond_json(HttpMethod::Get, MEMBERS_PATH, 401, json!({}));

    let client = h.client.clone();
    let pending = tokio::spawn(async move { client.get::<Value>(MEMBERS_PATH, &[]).await });

    while h.client.inflight().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.client.cancel_inflight(), 1);

    let result = pending.await.unwrap();
    assert_cancelled(&result);
    assert_eq!(h.cache().get(&USER_ID).unwrap(), Some(UserId::new(42)));
}

#[tokio::test]
async fn pending_request_is_not_shared_across_projects() {
    let h = TestHarness::new();
    h.cache().set(&PROJECT_ID, &ProjectId::new(1)).unwrap();
    h.transport.set_delay(Duration::from_millis(50));
    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        200,
        fixtures::envelope("", fixtures::key_listing()),
    );

    let client = h.client.clone();
    let first = tokio::spawn(async move { client.list_keys().await });
    while h.client.inflight().is_empty() {
        tokio::task::yield_now().await;
    }

    h.cache().set(&PROJECT_ID, &ProjectId::new(2)).unwrap();
    h.client.list_keys().await.unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(h.transport.calls_to(LIST_KEYS_PATH), 2);
    let sent: Vec<_> = h
        .transport
        .requests()
        .iter()
        .map(|r| r.header(PROJECT_ID_HEADER).map(str::to_string))
        .collect();
    assert_eq!(sent, vec![Some("1".to_string()), Some("2".to_string())]);
}
