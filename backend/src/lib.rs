//! Padel Backend Library
//!
//! Court booking, partner finding, coaching, storefront and messaging for a
//! padel platform. Exposed as a library so integration tests can build the
//! router against a real database.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use routes::build_router;

use database::Database;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all repositories and services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
    pub venue_repo: Arc<VenueRepository>,
    pub branch_repo: Arc<BranchRepository>,
    pub booking_repo: Arc<BookingRepository>,
    pub offer_repo: Arc<OfferRepository>,
    pub catalog_repo: Arc<CatalogRepository>,
    pub coach_repo: Arc<CoachRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub booking_service: Arc<BookingService>,
    pub match_service: Arc<MatchService>,
    pub coach_service: Arc<CoachService>,
    pub order_service: Arc<OrderService>,
    pub chat_service: Arc<ChatService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: sqlx::PgPool, config: AppConfig) -> Self {
        let database = Database::new(pool.clone());

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let venue_repo = Arc::new(VenueRepository::new(pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(pool.clone()));
        let offer_repo = Arc::new(OfferRepository::new(pool.clone()));
        let coach_repo = Arc::new(CoachRepository::new(pool.clone()));
        let match_repo = Arc::new(MatchRepository::new(pool.clone()));
        let order_repo = Arc::new(OrderRepository::new(pool.clone()));
        let chat_repo = Arc::new(ChatRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));

        let notification_service = Arc::new(NotificationService::new(notification_repo));

        Self {
            config: Arc::new(config),
            database,
            branch_repo: Arc::new(BranchRepository::new(pool.clone())),
            catalog_repo: Arc::new(CatalogRepository::new(pool.clone())),
            product_repo: Arc::new(ProductRepository::new(pool)),
            booking_service: Arc::new(BookingService::new(
                booking_repo.clone(),
                venue_repo.clone(),
                offer_repo.clone(),
                notification_service.clone(),
            )),
            match_service: Arc::new(MatchService::new(
                match_repo,
                user_repo.clone(),
                notification_service.clone(),
            )),
            coach_service: Arc::new(CoachService::new(coach_repo.clone())),
            order_service: Arc::new(OrderService::new(order_repo, notification_service.clone())),
            chat_service: Arc::new(ChatService::new(
                chat_repo,
                user_repo.clone(),
                notification_service.clone(),
            )),
            notification_service,
            user_repo,
            venue_repo,
            booking_repo,
            offer_repo,
            coach_repo,
        }
    }
}
