use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use gwadmin_api::{AppState, build_router};
use gwadmin_auth::PasswordHasher;
use gwadmin_cache::memory::MemoryCacheProvider;
use gwadmin_core::config::{AppConfig, BruteForceConfig, MemoryCacheConfig, SuperAdminConfig};
use gwadmin_database::{MemoryDatabase, Stores};
use gwadmin_entity::group::CreateGroup;
use gwadmin_entity::tenant::CreateTenant;
use gwadmin_entity::user::CreateUser;
use gwadmin_entity::{Group, Role, Tenant, User};

struct Seed {
    tenant_a: Tenant,
    tenant_b: Tenant,
    alice: User,
    adam: User,
    bob: User,
    group_a: Group,
}

async fn app() -> (Router, Seed) {
    let hasher = PasswordHasher::with_params(256, 1, 1).unwrap();
    let stores = Stores::memory(Arc::new(MemoryDatabase::new()));

    let tenant_a = stores
        .tenants
        .create(&CreateTenant {
            name: "Acme".into(),
            web_domain: "a.example.com".into(),
            is_default: true,
            ..Default::default()
        })
        .await
        .unwrap();
    let tenant_b = stores
        .tenants
        .create(&CreateTenant {
            name: "Beta".into(),
            web_domain: "b.example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let create = |name: &str, login: &str, tenant: i64, role: Role| {
        CreateUser::new(name, login, tenant, role)
            .with_password_hash(hasher.hash_password("secret").unwrap())
    };
    let alice = stores
        .users
        .create(&create("Alice", "alice@a.example.com", tenant_a.id, Role::NormalUser))
        .await
        .unwrap();
    let adam = stores
        .users
        .create(&create("Adam", "adam@a.example.com", tenant_a.id, Role::TenantAdmin))
        .await
        .unwrap();
    let bob = stores
        .users
        .create(&create("Bob", "bob@b.example.com", tenant_b.id, Role::TenantAdmin))
        .await
        .unwrap();
    let group_a = stores
        .groups
        .create(&CreateGroup {
            tenant_id: tenant_a.id,
            name: "Staff".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut config = AppConfig::default();
    config.server.trusted_proxies = vec![PROXY.into()];
    config.auth.brute_force = BruteForceConfig {
        enabled: true,
        max_failed_attempts: 3,
        lockout_duration_minutes: 5,
        ip_reputation_threshold: 10,
    };
    config.auth.super_admin = SuperAdminConfig {
        login: "root".into(),
        password_hash: hasher.hash_password("root-pw").unwrap(),
    };

    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 10_000 }));
    let state = AppState::build(config, stores, cache, None, hasher).unwrap();

    (
        build_router(state),
        Seed {
            tenant_a,
            tenant_b,
            alice,
            adam,
            bob,
            group_a,
        },
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Reverse proxy allowed to set `X-Forwarded-For`.
const PROXY: &str = "10.0.0.1";

fn peer(ip: &str) -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::new(ip.parse().unwrap(), 40_000))
}

fn login_from(
    peer_ip: &str,
    forwarded: Option<&str>,
    login: &str,
    password: &str,
    host: &str,
) -> Request<Body> {
    let mut builder = Request::post("/api/auth/login")
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(peer(peer_ip));
    if let Some(chain) = forwarded {
        builder = builder.header("x-forwarded-for", chain);
    }
    builder
        .body(Body::from(
            json!({ "Login": login, "Password": password, "SignMe": false }).to_string(),
        ))
        .unwrap()
}

fn login_request(login: &str, password: &str, host: &str) -> Request<Body> {
    login_from("1.2.3.4", None, login, password, host)
}

async fn login(app: &Router, login: &str, password: &str, host: &str) -> String {
    let (status, body) = send(app, login_request(login, password, host)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["AuthToken"].as_str().unwrap().to_string()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header("AuthToken", token)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::delete(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_and_me() {
    let (app, seed) = app().await;

    let response = app
        .clone()
        .oneshot(login_request("alice@a.example.com", "secret", "a.example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("AuthToken="));
    assert!(!cookie.contains("Max-Age"));

    let token = login(&app, "alice@a.example.com", "secret", "a.example.com").await;
    let (status, body) = send(&app, get("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], seed.alice.id);
    assert_eq!(body["data"]["role"], 2);
    assert_eq!(body["data"]["tenantId"], seed.tenant_a.id);

    let cookie_request = Request::get("/api/auth/me")
        .header(header::COOKIE, format!("theme=dark; AuthToken={token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, cookie_request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_input_is_validated() {
    let (app, _) = app().await;

    for blank in ["", "   "] {
        let (status, body) = send(&app, login_request(blank, "secret", "a.example.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 104);
    }

    let malformed = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Login\": 5}"))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 104);
}

#[tokio::test]
async fn test_failed_logins_lead_to_lockout() {
    let (app, _) = app().await;

    for _ in 0..2 {
        let (status, body) = send(&app, login_request("a@x.com", "bad", "a.example.com")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 101);
    }

    let (status, body) = send(&app, login_request("a@x.com", "bad", "a.example.com")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 102);
    assert!(body["retryAfterSeconds"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_forwarded_header_from_untrusted_peer_is_ignored() {
    let (app, _) = app().await;

    let mut statuses = Vec::new();
    for n in 0..3 {
        let chain = format!("10.9.0.{n}");
        let (status, _) = send(
            &app,
            login_from("1.2.3.4", Some(&chain), "alice@a.example.com", "bad", "a.example.com"),
        )
        .await;
        statuses.push(status);
    }
    assert_eq!(
        statuses,
        [
            StatusCode::UNAUTHORIZED,
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );

    let (status, body) = send(
        &app,
        login_from("1.2.3.4", Some("10.9.0.99"), "alice@a.example.com", "secret", "a.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], 102);
}

#[tokio::test]
async fn test_forwarded_header_from_trusted_proxy_is_honoured() {
    let (app, _) = app().await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            login_from(PROXY, Some("5.6.7.8"), "alice@a.example.com", "bad", "a.example.com"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = send(
        &app,
        login_from(PROXY, Some("5.6.7.8"), "alice@a.example.com", "bad", "a.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let (status, _) = send(
        &app,
        login_from(PROXY, Some("5.6.7.8"), "alice@a.example.com", "secret", "a.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Another client behind the same proxy is a different pair.
    let (status, _) = send(
        &app,
        login_from(PROXY, Some("9.9.9.9"), "alice@a.example.com", "secret", "a.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cross_domain_login_is_rejected() {
    let (app, _) = app().await;
    let (status, body) = send(
        &app,
        login_request("alice@a.example.com", "secret", "b.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 101);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_anonymous_and_logged_out_callers() {
    let (app, _) = app().await;

    let (status, body) = send(&app, Request::get("/api/auth/me").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 101);

    let token = login(&app, "alice@a.example.com", "secret", "a.example.com").await;
    let logout = Request::post("/api/auth/logout")
        .header("AuthToken", &token)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, logout).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let (app, _) = app().await;
    let token = login(&app, "alice@a.example.com", "secret", "a.example.com").await;

    let refresh = Request::post("/api/auth/refresh")
        .header("AuthToken", &token)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, refresh).await;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["data"]["AuthToken"].as_str().unwrap();
    assert_ne!(new_token, token);

    let (status, _) = send(&app, get("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, get("/api/auth/me", new_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_scoped_reads() {
    let (app, seed) = app().await;
    let adam = login(&app, "adam@a.example.com", "secret", "a.example.com").await;

    let (status, body) = send(&app, get(&format!("/api/tenants/{}", seed.tenant_a.id), &adam)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Acme");

    let (status, body) = send(&app, get(&format!("/api/tenants/{}", seed.tenant_b.id), &adam)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 103);

    let (status, _) = send(&app, get(&format!("/api/users/{}", seed.bob.id), &adam)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, get(&format!("/api/users/{}", seed.alice.id), &adam)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("password_hash").is_none());

    let alice = login(&app, "alice@a.example.com", "secret", "a.example.com").await;
    let (status, body) = send(&app, get(&format!("/api/users/{}", seed.adam.id), &alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 103);
}

#[tokio::test]
async fn test_missing_ids_are_generic_failures() {
    let (app, _) = app().await;
    let root = login(&app, "root", "root-pw", "a.example.com").await;

    let (status, body) = send(&app, get("/api/users/424242", &root)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert_eq!(body["message"], "Request failed");
}

#[tokio::test]
async fn test_super_admin_deletes_tenant() {
    let (app, seed) = app().await;
    let adam = login(&app, "adam@a.example.com", "secret", "a.example.com").await;
    let root = login(&app, "root", "root-pw", "b.example.com").await;

    let uri = format!("/api/tenants/{}", seed.tenant_a.id);
    let (status, body) = send(&app, delete(&uri, &adam)).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, _) = send(&app, delete(&uri, &root)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, delete(&uri, &root)).await;
    assert_eq!(status, StatusCode::OK);

    // Adam went with his tenant.
    let (status, _) = send(&app, get("/api/auth/me", &adam)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_group_membership_endpoint() {
    let (app, seed) = app().await;
    let adam = login(&app, "adam@a.example.com", "secret", "a.example.com").await;
    let uri = format!("/api/groups/{}/members", seed.group_a.id);

    let add = |user_id: i64| {
        Request::post(uri.as_str())
            .header("AuthToken", &adam)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "userId": user_id }).to_string()))
            .unwrap()
    };

    let (status, _) = send(&app, add(seed.alice.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, add(seed.bob.id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 103);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "memory");
    assert_eq!(body["data"]["cache"], "connected");
}
