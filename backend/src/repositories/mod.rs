pub mod booking_repository;
pub mod branch_repository;
pub mod catalog_repository;
pub mod chat_repository;
pub mod coach_repository;
pub mod match_repository;
pub mod notification_repository;
pub mod offer_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;
pub mod venue_repository;

// Re-export all repositories for convenient access
pub use booking_repository::{BookingDraft, BookingFilter, BookingRepository};
pub use branch_repository::BranchRepository;
pub use catalog_repository::CatalogRepository;
pub use chat_repository::ChatRepository;
pub use coach_repository::CoachRepository;
pub use match_repository::{MatchRepository, RequestDecision};
pub use notification_repository::NotificationRepository;
pub use offer_repository::OfferRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
pub use venue_repository::VenueRepository;
