//! End-to-end API integration tests
//!
//! These tests drive the full router over the in-memory store:
//! - Login and JWT authentication on protected endpoints
//! - Role-based access to sales target management
//! - Sales target create/update/toggle/delete flows
//! - Chart, period generation and sidebar endpoints

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use indana_erp_api::api::{self, AppState};
use indana_erp_api::auth::jwt::create_token;
use indana_erp_api::auth::password::hash_password;
use indana_erp_api::domain::invoice::InvoiceStatus;
use indana_erp_api::domain::repositories::{User, UserRepository};
use indana_erp_api::domain::sales_target::SalesTargetService;
use indana_erp_api::domain::user::{Email, UserRole};
use indana_erp_api::infrastructure::events::BroadcastEventPublisher;
use indana_erp_api::infrastructure::repositories::in_memory::{InMemoryStore, InvoiceRecord};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
}

/// Setup test application over an empty in-memory store
fn setup_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let service = SalesTargetService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(BroadcastEventPublisher::default()),
    );

    let state = AppState {
        sales_targets: Arc::new(service),
        users: store.clone(),
        jwt_secret: SECRET.into(),
    };

    TestApp {
        router: api::router(state),
        store,
    }
}

/// Create a user directly in the store
async fn create_user(store: &InMemoryStore, email: &str, role: UserRole, password_hash: &str) -> Uuid {
    store
        .create(User {
            id: Uuid::new_v4(),
            email: Email::new(email).expect("valid email"),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: password_hash.to_string(),
            role,
            is_active: true,
        })
        .await
        .expect("Failed to create test user")
}

fn token_for(user_id: Uuid, role: UserRole) -> String {
    create_token(user_id, role, SECRET).expect("Failed to create token")
}

/// Send a request and decode the JSON body (Null when empty)
async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Admin user plus a SALES user to own targets
async fn admin_and_sales(app: &TestApp) -> (String, Uuid) {
    let admin_id = create_user(&app.store, "admin@indana.com", UserRole::Admin, "x").await;
    let sales_id = create_user(&app.store, "sales@indana.com", UserRole::Sales, "x").await;
    (token_for(admin_id, UserRole::Admin), sales_id)
}

fn target_body(user_id: Uuid, target_type: &str, period: &str, amount: &str) -> Value {
    json!({
        "userId": user_id,
        "targetType": target_type,
        "targetPeriod": period,
        "targetAmount": amount,
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_login_returns_token_with_role() {
    let app = setup_app();
    let hash = hash_password("password123").expect("hash password");
    let user_id = create_user(&app.store, "sales@indana.com", UserRole::Sales, &hash).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "Sales@Indana.com", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["role"], "SALES");

    // The issued token opens protected routes
    let token = body["token"].as_str().expect("token");
    let (status, menu) = send(&app, "GET", "/api/navigation/menu", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu["role"], "SALES");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = setup_app();
    let hash = hash_password("password123").expect("hash password");
    create_user(&app.store, "sales@indana.com", UserRole::Sales, &hash).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "sales@indana.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup_app();

    let (status, _) = send(&app, "GET", "/api/sales-targets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/sales-targets", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sales_role_cannot_manage_targets() {
    let app = setup_app();
    let sales_id = create_user(&app.store, "sales@indana.com", UserRole::Sales, "x").await;
    let token = token_for(sales_id, UserRole::Sales);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-06", "1000")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(app.store.target_count(), 0);
}

#[tokio::test]
async fn test_create_and_duplicate_target() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-06", "1000000")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["targetPeriod"], "2025-06");
    assert_eq!(body["data"]["targetType"], "MONTHLY");
    assert_eq!(body["data"]["isActive"], true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-06", "2000000")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Target untuk periode ini sudah ada. Silakan edit target yang sudah ada."
    );
    assert_eq!(app.store.target_count(), 1);
}

#[tokio::test]
async fn test_create_with_bad_period_or_user() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-13", "1000")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(Uuid::new_v4(), "MONTHLY", "2025-06", "1000")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("User tidak ditemukan"));
}

#[tokio::test]
async fn test_update_collision_leaves_target_unchanged() {
    let app = setup_app();
    let (token, sales_a) = admin_and_sales(&app).await;
    let sales_b = create_user(&app.store, "sales2@indana.com", UserRole::Sales, "x").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_a, "MONTHLY", "2025-05", "1000")),
    )
    .await;
    let t1 = created["data"]["id"].as_str().unwrap().to_string();

    send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_b, "MONTHLY", "2025-06", "2000")),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/sales-targets/{}", t1),
        Some(&token),
        Some(target_body(sales_b, "MONTHLY", "2025-06", "5000")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Target untuk periode ini sudah ada untuk user tersebut."
    );

    let (status, stored) = send(&app, "GET", &format!("/api/sales-targets/{}", t1), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["userId"], sales_a.to_string());
    assert_eq!(stored["targetPeriod"], "2025-05");
}

#[tokio::test]
async fn test_toggle_and_delete_flow() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "QUARTERLY", "2025-Q2", "3000")),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", &format!("/api/sales-targets/{}/toggle", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);

    // Inactive targets do not answer period lookups
    let (status, lookup) = send(
        &app,
        "GET",
        &format!("/api/users/{}/targets/2025-Q2", sales_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup, Value::Null);

    let (_, body) = send(&app, "POST", &format!("/api/sales-targets/{}/toggle", id), Some(&token), None).await;
    assert_eq!(body["data"]["isActive"], true);

    let (status, body) = send(&app, "DELETE", &format!("/api/sales-targets/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, "GET", &format!("/api/sales-targets/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", &format!("/api/sales-targets/{}/toggle", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sales target not found");
}

#[tokio::test]
async fn test_list_targets_includes_owner() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "YEARLY", "2025", "12000")),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/sales-targets", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["targetPeriod"], "2025");
    assert_eq!(rows[0]["user"]["email"], "sales@indana.com");
    assert_eq!(rows[0]["user"]["role"], "SALES");
}

#[tokio::test]
async fn test_achieved_amount_and_recompute() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-06", "1000")),
    )
    .await;
    app.store.add_invoice(InvoiceRecord {
        id: Uuid::new_v4(),
        sales_id,
        invoice_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        status: InvoiceStatus::Paid,
        total_amount: Decimal::from(250),
    });

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}/targets/2025-06/achieved", sales_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["achieved"], "250");

    // Unparseable periods read as zero rather than failing
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}/targets/2025-Q9/achieved", sales_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["achieved"], "0");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/users/{}/targets/2025-06/recompute", sales_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["achievedAmount"], "250");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}/targets/2025-07/achieved", sales_id),
        Some(&token),
        Some(json!({ "amount": "10" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_chart_reports_zero_percent_for_zero_target() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&token),
        Some(target_body(sales_id, "MONTHLY", "2025-01", "0")),
    )
    .await;
    app.store.add_invoice(InvoiceRecord {
        id: Uuid::new_v4(),
        sales_id,
        invoice_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        status: InvoiceStatus::Paid,
        total_amount: Decimal::from(75),
    });

    let (status, body) = send(
        &app,
        "GET",
        &format!(
            "/api/reports/sales-targets/chart?user_id={}&target_type=MONTHLY",
            sales_id
        ),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["period"], "2025-01");
    assert_eq!(points[0]["achieved"], "75");
    assert_eq!(points[0]["percentage"], "0");
}

#[tokio::test]
async fn test_sales_chart_is_limited_to_own_targets() {
    let app = setup_app();
    let (admin_token, sales_a) = admin_and_sales(&app).await;
    let sales_b = create_user(&app.store, "sales2@indana.com", UserRole::Sales, "x").await;

    for owner in [sales_a, sales_b] {
        send(
            &app,
            "POST",
            "/api/sales-targets",
            Some(&admin_token),
            Some(target_body(owner, "MONTHLY", "2025-03", "100")),
        )
        .await;
    }

    let token = token_for(sales_b, UserRole::Sales);
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reports/sales-targets/chart?user_id={}", sales_a),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_period() {
    let app = setup_app();
    let (token, _) = admin_and_sales(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/target-periods/generate?target_type=QUARTERLY&date=2025-04-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "target_type": "QUARTERLY", "period": "2025-Q2" }));

    // Unknown types fall back to monthly
    let (_, body) = send(
        &app,
        "GET",
        "/api/target-periods/generate?target_type=weekly&date=2025-04-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["period"], "2025-04");
}

#[tokio::test]
async fn test_sales_users_dropdown() {
    let app = setup_app();
    let (token, sales_id) = admin_and_sales(&app).await;

    let (status, body) = send(&app, "GET", "/api/sales-users", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "id": sales_id, "name": "sales", "email": "sales@indana.com" }])
    );
}

#[tokio::test]
async fn test_menu_for_warehouse_role() {
    let app = setup_app();
    let user_id = create_user(&app.store, "gudang@indana.com", UserRole::Warehouse, "x").await;
    let token = token_for(user_id, UserRole::Warehouse);

    let (status, body) = send(
        &app,
        "GET",
        "/api/navigation/menu?path=/warehouse/products",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["dashboard", "warehouse"]);
    assert_eq!(items[0]["is_active"], false);
    assert_eq!(items[1]["is_active"], true);
}

#[tokio::test]
async fn test_sales_user_reads_only_own_targets() {
    let app = setup_app();
    let (admin_token, sales_a) = admin_and_sales(&app).await;
    let sales_b = create_user(&app.store, "sales2@indana.com", UserRole::Sales, "x").await;

    send(
        &app,
        "POST",
        "/api/sales-targets",
        Some(&admin_token),
        Some(target_body(sales_a, "MONTHLY", "2025-06", "1000")),
    )
    .await;
    app.store.add_invoice(InvoiceRecord {
        id: Uuid::new_v4(),
        sales_id: sales_a,
        invoice_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        status: InvoiceStatus::Paid,
        total_amount: Decimal::from(250),
    });

    let other = token_for(sales_b, UserRole::Sales);
    for uri in [
        format!("/api/users/{}/current-target", sales_a),
        format!("/api/users/{}/targets/2025-06", sales_a),
        format!("/api/users/{}/targets/2025-06/achieved", sales_a),
    ] {
        let (status, body) = send(&app, "GET", &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["success"], false);
        assert!(body.get("achieved").is_none());
    }

    // The owner and roles with revenue analytics still see the figures
    let own = token_for(sales_a, UserRole::Sales);
    for token in [&own, &admin_token] {
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/users/{}/targets/2025-06/achieved", sales_a),
            Some(token.as_str()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["achieved"], "250");

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/users/{}/targets/2025-06", sales_a),
            Some(token.as_str()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["targetPeriod"], "2025-06");
    }
}
