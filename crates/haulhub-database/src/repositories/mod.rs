//! Repository implementations, one per aggregate.

pub mod booking;
pub mod notification;
pub mod shipment;
pub mod user;

pub use booking::BookingRepository;
pub use notification::NotificationRepository;
pub use shipment::ShipmentRepository;
pub use user::UserRepository;
