#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate, NaiveTime};
use http_body_util::BodyExt;
use padel_backend::auth::encode_token;
use padel_backend::models::*;
use padel_backend::repositories::*;
use padel_backend::{build_router, AppConfig, AppState};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

/// Repositories and app state over a `#[sqlx::test]` pool
pub struct TestDatabase {
    pub pool: PgPool,
    pub user_repo: Arc<UserRepository>,
    pub venue_repo: Arc<VenueRepository>,
    pub booking_repo: Arc<BookingRepository>,
    pub offer_repo: Arc<OfferRepository>,
    pub coach_repo: Arc<CoachRepository>,
    pub match_repo: Arc<MatchRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub order_repo: Arc<OrderRepository>,
    pub chat_repo: Arc<ChatRepository>,
    pub catalog_repo: Arc<CatalogRepository>,
    pub notification_repo: Arc<NotificationRepository>,
    pub state: AppState,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (migrations already applied by sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            venue_repo: Arc::new(VenueRepository::new(pool.clone())),
            booking_repo: Arc::new(BookingRepository::new(pool.clone())),
            offer_repo: Arc::new(OfferRepository::new(pool.clone())),
            coach_repo: Arc::new(CoachRepository::new(pool.clone())),
            match_repo: Arc::new(MatchRepository::new(pool.clone())),
            product_repo: Arc::new(ProductRepository::new(pool.clone())),
            order_repo: Arc::new(OrderRepository::new(pool.clone())),
            chat_repo: Arc::new(ChatRepository::new(pool.clone())),
            catalog_repo: Arc::new(CatalogRepository::new(pool.clone())),
            notification_repo: Arc::new(NotificationRepository::new(pool.clone())),
            state: AppState::new(pool.clone(), AppConfig::default()),
            pool,
        }
    }

    /// Clean up all test data; booking status labels are reference rows and stay
    pub async fn cleanup(&self) {
        sqlx::query(
            "TRUNCATE TABLE messages, chats, notifications, order_items, orders, products, \
             match_requests, matches, packages, coaches, bookings, offers, branches, venues, \
             sponsors, stories, categories, sports, global_config, users CASCADE",
        )
        .execute(&self.pool)
        .await
        .expect("Failed to cleanup test data");
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

/// A date safely in the future for booking and match fixtures
pub fn future_date(days: i64) -> NaiveDate {
    chrono::Local::now().date_naive() + Duration::days(days)
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Helper function to create a test user
pub async fn create_test_user(db: &TestDatabase, email: &str, role: UserRole) -> User {
    db.user_repo
        .create(&NewUser {
            name: email.split('@').next().unwrap_or("player").to_string(),
            email: email.to_string(),
            phone: None,
            role: Some(role),
            avatar_url: None,
            level: Some(Decimal::new(35, 1)),
        })
        .await
        .expect("Failed to create test user")
}

/// Helper function to create a venue open 08:00-23:00 at 20.00/hour
pub async fn create_test_venue(db: &TestDatabase, courts: i32) -> Venue {
    db.venue_repo
        .create(&NewVenue {
            name: "Club Central".to_string(),
            description: None,
            address: "Calle Mayor 1".to_string(),
            city: "Madrid".to_string(),
            sport_id: None,
            price_per_hour: Decimal::new(2000, 2),
            courts: Some(courts),
            open_time: Some(t(8, 0)),
            close_time: Some(t(23, 0)),
            image_url: None,
        })
        .await
        .expect("Failed to create test venue")
}

pub async fn create_test_product(db: &TestDatabase, name: &str, price: Decimal, stock: i32) -> Product {
    db.product_repo
        .create(&NewProduct {
            category_id: None,
            name: name.to_string(),
            description: None,
            price,
            stock: Some(stock),
            image_url: None,
        })
        .await
        .expect("Failed to create test product")
}

/// Bearer header value for `user`, signed with the default config secret
pub fn bearer(user: &User) -> String {
    let secret = AppConfig::default().jwt_secret;
    let token = encode_token(&secret, user.id, user.role_enum(), Duration::hours(1)).unwrap();
    format!("Bearer {}", token)
}

/// Send a request through the router and decode the JSON body
pub async fn send(app: &Router, method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Assert that two bookings are equal (ignoring timestamps)
pub fn assert_bookings_equal(a: &Booking, b: &Booking) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.venue_id, b.venue_id);
    assert_eq!(a.court, b.court);
    assert_eq!(a.date, b.date);
    assert_eq!(a.start_time, b.start_time);
    assert_eq!(a.end_time, b.end_time);
    assert_eq!(a.status, b.status);
}
