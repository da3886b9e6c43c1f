pub mod booking_service;
pub mod chat_service;
pub mod coach_service;
pub mod match_service;
pub mod notification_service;
pub mod order_service;

pub use booking_service::{BookingService, VenueAvailability};
pub use chat_service::ChatService;
pub use coach_service::CoachService;
pub use match_service::MatchService;
pub use notification_service::NotificationService;
pub use order_service::OrderService;
