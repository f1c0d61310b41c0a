use bento_client::cache_keys::{PROJECT_ID, SUPPORTED_LANGUAGES, USER_ID};
use bento_client::client::{
    ADD_KEY_PATH, CREATE_PROJECT_PATH, INVITE_MEMBER_PATH, KEY_DETAILS_PATH, LIST_KEYS_PATH,
    LOGIN_PATH, MEMBERS_PATH, UPDATE_KEY_PATH,
};
use bento_client::{ClientError, Console, HttpMethod, Route, SessionState};
use bento_core::{
    CreateKeyRequest, CreateProjectRequest, InviteMemberRequest, KeyId, KeyListing, KeyStatus,
    Language, LoginRequest, MemberRole, ProjectId, UpdateKeyRequest,
};
use bento_test_utils::{fixtures, TestHarness};
use serde_json::json;
use std::time::Duration;

const DAY: Duration = Duration::from_millis(86_400_000);

async fn logged_in() -> (TestHarness, Console) {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_with_projects()),
    );
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    console
        .login(&LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();
    (h, console)
}

#[tokio::test]
async fn restore_without_session_goes_to_login() {
    let h = TestHarness::new();
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    assert_eq!(console.restore().unwrap(), SessionState::Anonymous);
    assert_eq!(console.route(), Route::Login);
    assert!(console.user().is_none());
}

#[tokio::test]
async fn login_lands_on_dashboard_and_restores_later() {
    let (h, console) = logged_in().await;
    assert_eq!(console.route(), Route::Dashboard);
    assert_eq!(
        console.current_project().map(|p| p.project_id),
        Some(ProjectId::new(11))
    );

    let mut fresh = Console::new(h.client.clone(), DAY).unwrap();
    assert!(fresh.restore().unwrap().is_authenticated());
    assert_eq!(fresh.route(), Route::Dashboard);
}

#[tokio::test]
async fn login_without_projects_lands_on_project_setup() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_without_projects()),
    );
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    console
        .login(&LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(console.route(), Route::ProjectSetup);
    assert_eq!(console.navigate(Route::Dashboard).unwrap(), Route::ProjectSetup);
    assert_eq!(console.navigate(Route::Settings).unwrap(), Route::Settings);
}

#[tokio::test]
async fn navigation_guards_session_routes() {
    let h = TestHarness::new();
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    assert_eq!(console.navigate(Route::Members).unwrap(), Route::Login);
    assert_eq!(console.navigate(Route::Register).unwrap(), Route::Register);
}

#[tokio::test]
async fn dashboard_merges_languages() {
    let (h, mut console) = logged_in().await;
    h.cache()
        .set(&SUPPORTED_LANGUAGES, &vec![Language::new("en", "English")])
        .unwrap();
    let mut console_languages = Console::new(h.client.clone(), DAY).unwrap();
    console_languages.restore().unwrap();

    let mut listing = fixtures::key_listing();
    listing.languages = vec![
        Language::new("en", "English (US)"),
        Language::new("es-MX", "Spanish"),
    ];
    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        200,
        fixtures::envelope("", &listing),
    );

    let loaded = console_languages.dashboard().await.unwrap();
    assert_eq!(loaded.translations.len(), 2);
    assert_eq!(
        console_languages.languages(),
        &[
            Language::new("en", "English (US)"),
            Language::new("es", "Spanish"),
        ]
    );
    assert_eq!(
        h.cache().get(&SUPPORTED_LANGUAGES).unwrap().map(|l| l.len()),
        Some(2)
    );

    // The first console still works against the same cache.
    assert!(console.dashboard().await.is_ok());
}

#[tokio::test]
async fn dashboard_honours_forced_logout() {
    let (h, mut console) = logged_in().await;
    let listing = KeyListing {
        force_logout: true,
        ..fixtures::key_listing()
    };
    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        200,
        fixtures::envelope("", &listing),
    );

    let err = console.dashboard().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(console.route(), Route::Login);
    assert!(console.user().is_none());
    assert_eq!(h.cache().get(&USER_ID).unwrap(), None);
}

#[tokio::test]
async fn unauthorized_response_moves_console_to_login() {
    let (h, mut console) = logged_in().await;
    h.transport
        .respond_json(HttpMethod::Get, MEMBERS_PATH, 401, json!({}));

    let err = console.members().await.unwrap_err();
    assert_eq!(err.redirect(), Some(Route::Login));
    assert_eq!(console.route(), Route::Login);
    assert!(console.current_project().is_none());
    assert_eq!(h.cache().get(&PROJECT_ID).unwrap(), None);
}

#[tokio::test]
async fn key_operations_hit_their_endpoints() {
    let (h, mut console) = logged_in().await;
    let details = json!([{
        "key_id": 5,
        "key": "home.title",
        "tag": "web",
        "status": "Published",
        "translations": [
            {"language_code": "en", "language_name": "English", "translation": "Welcome"}
        ]
    }]);
    let details_path = format!("{}/5", KEY_DETAILS_PATH);
    h.transport
        .respond_json(HttpMethod::Post, &details_path, 200, json!({"message": "", "data": details}));
    h.transport
        .respond_json(HttpMethod::Post, ADD_KEY_PATH, 201, json!({"message": "Key added"}));
    let update_path = format!("{}/5", UPDATE_KEY_PATH);
    h.transport
        .respond_json(HttpMethod::Post, &update_path, 200, json!({"message": "Key updated"}));

    let key = console.key_details(KeyId::new(5)).await.unwrap();
    assert_eq!(key.translation("en").map(|t| t.translation.as_str()), Some("Welcome"));
    assert_eq!(console.route(), Route::KeyDetail(KeyId::new(5)));

    let added = console
        .add_key(&CreateKeyRequest::new("home.cta", "web", "Get started").with_translation("fr", "Commencer"))
        .await
        .unwrap();
    assert_eq!(added, "Key added");
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.body.as_ref().unwrap()["translations"]["fr"], "Commencer");

    let update = UpdateKeyRequest {
        status: Some(KeyStatus::Archive),
        ..UpdateKeyRequest::default()
    };
    assert_eq!(console.update_key(KeyId::new(5), &update).await.unwrap(), "Key updated");
}

#[tokio::test]
async fn key_operations_need_a_project() {
    let h = TestHarness::new();
    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_without_projects()),
    );
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    console
        .login(&LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();

    let err = console.dashboard().await.unwrap_err();
    assert_eq!(err, ClientError::NoProject);
    assert_eq!(console.route(), Route::ProjectSetup);
    assert_eq!(h.transport.calls_to(LIST_KEYS_PATH), 0);
}

#[tokio::test]
async fn switch_project_updates_headers() {
    let (h, mut console) = logged_in().await;
    let project = console.switch_project(ProjectId::new(12)).unwrap();
    assert_eq!(project.project_name, "Mobile App");

    h.transport.respond_json(
        HttpMethod::Get,
        MEMBERS_PATH,
        200,
        fixtures::envelope("", fixtures::members()),
    );
    console.members().await.unwrap();
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.header("x-project-id"), Some("12"));

    assert!(console.switch_project(ProjectId::new(404)).is_err());
    assert_eq!(
        console.current_project().map(|p| p.project_id),
        Some(ProjectId::new(12))
    );
}

#[tokio::test]
async fn create_project_selects_it() {
    let (h, mut console) = logged_in().await;
    h.transport.respond_json(
        HttpMethod::Post,
        CREATE_PROJECT_PATH,
        201,
        fixtures::envelope("created", fixtures::project(13, "Docs")),
    );

    let project = console
        .create_project(&CreateProjectRequest {
            name: "Docs".into(),
            description: "Help centre".into(),
        })
        .await
        .unwrap();
    assert_eq!(project.project_id, ProjectId::new(13));
    assert_eq!(console.current_project(), Some(&project));
    assert_eq!(console.projects().unwrap().len(), 3);
}

#[tokio::test]
async fn invite_member_posts_role() {
    let (h, mut console) = logged_in().await;
    h.transport.respond_json(
        HttpMethod::Post,
        INVITE_MEMBER_PATH,
        200,
        json!({"message": "Invitation sent"}),
    );

    let message = console
        .invite_member(&InviteMemberRequest {
            email: "grace@example.com".into(),
            role: MemberRole::Member,
        })
        .await
        .unwrap();
    assert_eq!(message, "Invitation sent");
    let sent = h.transport.last_request().unwrap();
    assert_eq!(sent.body, Some(json!({"email": "grace@example.com", "role": "Member"})));
}

#[tokio::test]
async fn logout_returns_to_login() {
    let (h, mut console) = logged_in().await;
    console.logout().unwrap();
    assert_eq!(console.route(), Route::Login);
    assert!(console.user().is_none());
    assert_eq!(h.cache().get(&USER_ID).unwrap(), None);
    assert_eq!(console.navigate(Route::Dashboard).unwrap(), Route::Login);
}

#[tokio::test]
async fn login_forgets_languages_of_the_previous_session() {
    let h = TestHarness::new();
    h.cache()
        .set(&SUPPORTED_LANGUAGES, &vec![Language::new("ja", "Japanese")])
        .unwrap();
    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    assert_eq!(console.languages().len(), 1);

    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_with_projects()),
    );
    console
        .login(&LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert!(console.languages().is_empty());

    let listing = KeyListing {
        languages: vec![Language::new("en", "English")],
        ..fixtures::key_listing()
    };
    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        200,
        fixtures::envelope("", &listing),
    );
    console.dashboard().await.unwrap();

    let english = vec![Language::new("en", "English")];
    assert_eq!(console.languages(), english.as_slice());
    assert_eq!(h.cache().get(&SUPPORTED_LANGUAGES).unwrap(), Some(english));
}

#[tokio::test]
async fn unauthorized_response_drops_cached_languages() {
    let (h, mut console) = logged_in().await;
    h.transport.respond_json(
        HttpMethod::Post,
        LIST_KEYS_PATH,
        200,
        fixtures::envelope("", fixtures::key_listing()),
    );
    console.dashboard().await.unwrap();
    assert!(!console.languages().is_empty());

    h.transport
        .respond_json(HttpMethod::Get, MEMBERS_PATH, 401, json!({}));
    console.members().await.unwrap_err();
    assert!(console.languages().is_empty());
    assert_eq!(h.cache().get(&SUPPORTED_LANGUAGES).unwrap(), None);
}

#[tokio::test]
async fn unreadable_session_slot_does_not_block_login() {
    let h = TestHarness::new();
    h.cache()
        .set_value("user_data", json!({"legacy": true}), None)
        .unwrap();
    h.cache().set(&USER_ID, &bento_core::UserId::new(1)).unwrap();
    h.cache()
        .set_value("project_data", json!([1, 2, 3]), None)
        .unwrap();

    let mut console = Console::new(h.client.clone(), DAY).unwrap();
    assert_eq!(console.restore().unwrap(), SessionState::Anonymous);
    assert_eq!(console.route(), Route::Login);

    h.transport.respond_json(
        HttpMethod::Post,
        LOGIN_PATH,
        200,
        fixtures::envelope("ok", fixtures::user_with_projects()),
    );
    console
        .login(&LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(console.route(), Route::Dashboard);
    assert!(console.restore().unwrap().is_authenticated());
}
