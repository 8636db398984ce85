//! End-to-end session flows against a live auth router

use auth::{AuthConfig, InMemoryAuthRepository, auth_router};
use session_client::{
    ClientError, FileTokenStore, GuardDecision, MemoryTokenStore, Navigation, RegisterRequest,
    Route, SessionClient, SessionState, TokenStore,
};

async fn spawn_server() -> (String, InMemoryAuthRepository) {
    let repo = InMemoryAuthRepository::new();
    let app = axum::Router::new().nest(
        "/auth",
        auth_router(repo.clone(), AuthConfig::development()),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/auth"), repo)
}

fn sign_up() -> RegisterRequest {
    RegisterRequest {
        email: "a@x.com".into(),
        password: "secret1".into(),
        name: "A".into(),
        username: "a1".into(),
        ..RegisterRequest::default()
    }
}

#[tokio::test]
async fn test_register_signs_in() {
    let (base, repo) = spawn_server().await;
    let client = SessionClient::new(&base, MemoryTokenStore::new()).unwrap();

    let nav = client.register(&sign_up()).await.unwrap();
    assert_eq!(nav, Navigation::replace(Route::Home));
    assert!(client.token().unwrap().is_some());
    assert_eq!(client.state().user().unwrap().username, "a1");
    assert_eq!(repo.user_count().await, 1);

    // Second registration with the same email is refused with a readable message
    let other = SessionClient::new(&base, MemoryTokenStore::new()).unwrap();
    match other.register(&sign_up()).await {
        Err(ClientError::Api { status, code, message }) => {
            assert_eq!(status, 400);
            assert_eq!(code, "DUPLICATE_USER");
            assert_eq!(message, "User already exists");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_password_is_shown_inline() {
    let (base, _repo) = spawn_server().await;
    SessionClient::new(&base, MemoryTokenStore::new())
        .unwrap()
        .register(&sign_up())
        .await
        .unwrap();

    let client = SessionClient::new(&base, MemoryTokenStore::new()).unwrap();
    let err = client.login("a@x.com", "wrong-one").await.unwrap_err();
    match &err {
        ClientError::Api { status, code, .. } => {
            assert_eq!(*status, 401);
            assert_eq!(code, "INVALID_CREDENTIALS");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(client.token().unwrap().is_none());
    assert_eq!(client.state(), SessionState::Resolved(None));
}

#[tokio::test]
async fn test_stored_token_survives_restart() {
    let (base, _repo) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionClient::new(&base, FileTokenStore::new(&path)).unwrap();
    first.register(&sign_up()).await.unwrap();
    first.logout().await.unwrap();
    let nav = first.login("A@x.com", "secret1").await.unwrap();
    assert_eq!(nav.route.path(), "/");

    let restarted = SessionClient::new(&base, FileTokenStore::new(&path)).unwrap();
    assert!(restarted.state().is_loading());
    let user = restarted.current_user().await.unwrap().unwrap();
    assert_eq!(user.email, "a@x.com");
    assert_eq!(restarted.state().user(), Some(&user));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (base, _repo) = spawn_server().await;
    let client = SessionClient::new(&base, MemoryTokenStore::new()).unwrap();
    client.register(&sign_up()).await.unwrap();

    for _ in 0..2 {
        let nav = client.logout().await.unwrap();
        assert_eq!(nav, Navigation::replace(Route::Login));
        assert!(client.token().unwrap().is_none());
        assert_eq!(client.current_user().await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_rejected_token_is_dropped() {
    let (base, _repo) = spawn_server().await;
    let store = MemoryTokenStore::with_token("abc.def.ghi");
    let client = SessionClient::new(&base, store).unwrap();

    assert_eq!(client.current_user().await.unwrap(), None);
    assert!(client.token().unwrap().is_none());
    assert_eq!(client.state(), SessionState::Resolved(None));
}

#[tokio::test]
async fn test_server_unavailable_marks_failed() {
    let (base, repo) = spawn_server().await;
    let client = SessionClient::new(&base, MemoryTokenStore::new()).unwrap();
    client.register(&sign_up()).await.unwrap();

    repo.set_available(false);
    let token = client.token().unwrap().unwrap();
    let restarted = SessionClient::new(&base, MemoryTokenStore::with_token(token)).unwrap();
    match restarted.current_user().await {
        Err(ClientError::Api { status, code, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(code, "SERVICE_UNAVAILABLE");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(restarted.state(), SessionState::Failed);
    // Not an authorization failure, so the token is kept for a retry
    assert!(restarted.token().unwrap().is_some());

    repo.set_available(true);
    assert!(restarted.refresh().await.unwrap().is_some());
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = MemoryTokenStore::with_token("stale");
    let client = SessionClient::new(&format!("http://{addr}/auth"), store).unwrap();

    let err = client.login("a@x.com", "secret1").await.unwrap_err();
    assert!(err.is_network());

    client.logout().await.unwrap();
    assert!(client.token().unwrap().is_none());
    assert_eq!(client.state(), SessionState::Resolved(None));
}

#[tokio::test]
async fn test_guard_follows_session() {
    let (base, _repo) = spawn_server().await;
    let store = MemoryTokenStore::new();
    let client = SessionClient::new(&base, store).unwrap();
    client.register(&sign_up()).await.unwrap();
    let token = client.token().unwrap().unwrap();

    let restarted = SessionClient::new(&base, MemoryTokenStore::with_token(token)).unwrap();
    let mut guard = restarted.guard();
    assert_eq!(guard.decision(), GuardDecision::Pending);

    restarted.current_user().await.unwrap();
    match guard.settled().await {
        GuardDecision::Render(user) => assert_eq!(user.username, "a1"),
        other => panic!("unexpected {other:?}"),
    }

    restarted.logout().await.unwrap();
    assert_eq!(
        guard.decision(),
        GuardDecision::Redirect(Navigation::replace(Route::Login))
    );
}

#[test]
fn test_file_store_is_a_token_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("t.json"));
    store.save("x").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("x"));
}
