mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use helpers::*;
use padel_backend::auth::{decode_token, encode_token, extract_bearer, AuthUser};
use padel_backend::models::booking::{intervals_overlap, quote_price, validate_slot};
use padel_backend::models::store::normalize_lines;
use padel_backend::models::user::{validate_email, validate_level};
use padel_backend::models::*;
use padel_backend::{build_router, AppConfig, AppError, AppState};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

/// Router over a pool that never connects; only paths rejected before any
/// query may be exercised with it
fn offline_router() -> axum::Router {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .unwrap();
    build_router(AppState::new(pool, config))
}

fn token(role: UserRole) -> String {
    let secret = AppConfig::default().jwt_secret;
    format!("Bearer {}", encode_token(&secret, Uuid::new_v4(), role, Duration::hours(1)).unwrap())
}

// ============================================================================
// Pricing and Slots
// ============================================================================

#[test]
fn test_quote_price() {
    let hourly = Decimal::new(2000, 2);
    assert_eq!(quote_price(hourly, 60, None), Decimal::new(2000, 2));
    assert_eq!(quote_price(hourly, 90, None), Decimal::new(3000, 2));
    assert_eq!(quote_price(hourly, 90, Some(20)), Decimal::new(2400, 2));
    assert_eq!(quote_price(hourly, 60, Some(100)), Decimal::ZERO);

    // 25.50/h for 30 minutes is 12.75, 15% off is 10.8375
    assert_eq!(quote_price(Decimal::new(2550, 2), 30, Some(15)), Decimal::new(1084, 2));
}

#[test]
fn test_validate_slot() {
    assert_eq!(assert_ok!(validate_slot(t(10, 0), t(11, 30))), 90);
    assert_err!(validate_slot(t(11, 0), t(10, 0)));
    assert_err!(validate_slot(t(10, 0), t(10, 0)));
    assert_err!(validate_slot(t(10, 0), t(10, 45)));
}

#[test]
fn test_overlap_rules() {
    // Half-open: back-to-back slots share a boundary only
    assert!(!intervals_overlap(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
    assert!(intervals_overlap(t(9, 0), t(13, 0), t(10, 0), t(11, 0)));
    assert!(intervals_overlap(t(10, 0), t(11, 0), t(9, 0), t(13, 0)));
}

#[test]
fn test_order_lines_and_levels() {
    let product = Uuid::new_v4();
    let merged = assert_ok!(normalize_lines(&[
        OrderLine { product_id: product, quantity: 2 },
        OrderLine { product_id: product, quantity: 1 },
    ]));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].quantity, 3);

    assert_ok!(validate_level(Decimal::new(35, 1)));
    assert_err!(validate_level(Decimal::new(80, 1)));
    assert_ok!(validate_email("player@padel.es"));
    assert_err!(validate_email("player.padel.es"));
}

// ============================================================================
// Tokens and Roles
// ============================================================================

#[test]
fn test_token_round_trip() -> anyhow::Result<()> {
    let secret = "unit-test-secret";
    let id = Uuid::new_v4();
    let raw = encode_token(secret, id, UserRole::Coach, Duration::minutes(5))?;

    let claims = decode_token(secret, &raw)?;
    let user = AuthUser::from_claims(&claims)?;
    assert_eq!(user.id, id);
    assert_eq!(user.role, UserRole::Coach);

    assert!(matches!(decode_token("other-secret", &raw), Err(AppError::Unauthorized(_))));

    let expired = encode_token(secret, id, UserRole::User, Duration::hours(-2))?;
    assert!(matches!(decode_token(secret, &expired), Err(AppError::Unauthorized(_))));
    Ok(())
}

#[test]
fn test_extract_bearer() {
    assert_eq!(assert_ok!(extract_bearer(Some("Bearer abc"))), "abc");
    assert_eq!(assert_ok!(extract_bearer(Some("bearer  abc "))), "abc");
    assert_err!(extract_bearer(None));
    assert_err!(extract_bearer(Some("Basic abc")));
    assert_err!(extract_bearer(Some("Bearer ")));
}

#[test]
fn test_role_checks() {
    let owner = Uuid::new_v4();
    let user = AuthUser { id: owner, role: UserRole::User };
    let admin = AuthUser { id: Uuid::new_v4(), role: UserRole::Admin };
    let stranger = AuthUser { id: Uuid::new_v4(), role: UserRole::Coach };

    assert_ok!(user.require_owner_or_admin(owner));
    assert_ok!(admin.require_owner_or_admin(owner));
    assert!(matches!(stranger.require_owner_or_admin(owner), Err(AppError::Forbidden(_))));

    assert_ok!(stranger.require_role(&[UserRole::Coach]));
    assert_ok!(admin.require_role(&[UserRole::Coach]));
    assert_err!(user.require_role(&[UserRole::Coach]));
}

#[test]
fn test_default_config_is_valid_for_development() {
    let config = AppConfig::default();
    assert_ok!(config.validate());
    assert!(config.is_development());
    assert!(config.allows_any_origin());

    let production = AppConfig {
        environment: "production".into(),
        ..AppConfig::default()
    };
    assert_err!(production.validate());
}

// ============================================================================
// Rejections Before the Database
// ============================================================================

#[tokio::test]
async fn test_missing_and_bad_tokens_are_unauthorized() {
    let app = offline_router();

    let (status, body) = send(&app, "GET", "/api/v1/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/admin/users", Some("Token xyz"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_panel_requires_admin_role() {
    let app = offline_router();
    for role in [UserRole::User, UserRole::Coach] {
        let (status, _) = send(&app, "GET", "/admin/config", Some(&token(role)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let body = json!({ "name": "Padel" });
        let (status, _) = send(&app, "POST", "/admin/sports", Some(&token(role)), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_invalid_booking_slot_is_rejected() {
    let app = offline_router();
    let body = json!({
        "venue_id": Uuid::new_v4(),
        "court": 1,
        "date": future_date(3),
        "start_time": "12:00:00",
        "end_time": "11:00:00",
    });
    let (status, _) = send(&app, "POST", "/api/v1/bookings", Some(&token(UserRole::User)), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let past = json!({
        "venue_id": Uuid::new_v4(),
        "court": 1,
        "date": future_date(-1),
        "start_time": "10:00:00",
        "end_time": "11:00:00",
    });
    let (status, _) = send(&app, "POST", "/api/v1/bookings", Some(&token(UserRole::User)), Some(past)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_input_gets_json_error_body() {
    let app = offline_router();
    let auth = token(UserRole::User);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&auth),
        Some(json!({ "venue_id": "not-a-uuid" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "body was {}", body);

    let (status, body) = send(&app, "GET", "/api/v1/bookings/not-a-uuid", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "body was {}", body);

    let (status, body) = send(&app, "GET", "/api/v1/matches?level=expert", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "body was {}", body);
}
