//! Persistence seams for the service layer.
//!
//! Each trait mirrors the repository it abstracts. The Postgres
//! repositories implement them one-to-one; tests substitute in-memory
//! doubles that enforce the same uniqueness rules.

use async_trait::async_trait;
use uuid::Uuid;

use haulhub_core::result::AppResult;
use haulhub_database::repositories::booking::{
    BookingRepository, CodeAssignment, InsertOutcome, NewBooking,
};
use haulhub_database::repositories::notification::{NewNotification, NotificationRepository};
use haulhub_database::repositories::shipment::{NewShipment, ShipmentRepository};
use haulhub_database::repositories::user::UserRepository;
use haulhub_entity::booking::{Booking, BookingStatus};
use haulhub_entity::notification::Notification;
use haulhub_entity::shipment::{Shipment, ShipmentStatus};
use haulhub_entity::user::User;

/// Booking persistence operations used by the admission controller.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Attempt to persist a new `Pending` booking; the database-level
    /// unique index is the race-breaker.
    async fn insert_active(&self, new: &NewBooking) -> AppResult<InsertOutcome>;

    /// First-write-wins code assignment.
    async fn assign_code(&self, booking_id: Uuid, code: &str) -> AppResult<CodeAssignment>;

    async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<Booking>>;

    async fn find_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<Option<Booking>>;

    async fn count_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<i64>;

    async fn count_code_prefix(&self, initial: char) -> AppResult<i64>;

    async fn code_exists(&self, code: &str) -> AppResult<bool>;

    async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    async fn list_for_shipment(&self, shipment_id: Uuid) -> AppResult<Vec<Booking>>;

    async fn update_status(&self, booking_id: Uuid, status: BookingStatus) -> AppResult<Booking>;

    async fn delete(&self, booking_id: Uuid) -> AppResult<bool>;
}

/// Shipment persistence operations.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn insert(&self, new: &NewShipment) -> AppResult<Shipment>;

    /// Returns `false` if the candidate code is taken.
    async fn assign_code(&self, shipment_id: Uuid, code: &str) -> AppResult<bool>;

    async fn existing_codes(&self) -> AppResult<Vec<String>>;

    async fn find_by_id(&self, shipment_id: Uuid) -> AppResult<Option<Shipment>>;

    async fn list(&self) -> AppResult<Vec<Shipment>>;

    async fn update(&self, shipment: &Shipment) -> AppResult<Shipment>;

    async fn update_status(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment>;

    async fn delete(&self, shipment_id: Uuid) -> AppResult<bool>;
}

/// Notification persistence operations.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, new: &NewNotification) -> AppResult<Notification>;

    async fn find_by_id(&self, notification_id: Uuid) -> AppResult<Option<Notification>>;

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    async fn find_for_admins(&self) -> AppResult<Vec<Notification>>;

    async fn count_unread_for_user(&self, user_id: Uuid) -> AppResult<i64>;

    async fn mark_read(&self, notification_id: Uuid) -> AppResult<bool>;

    async fn mark_all_read_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    async fn mark_all_read_for_admins(&self) -> AppResult<u64>;

    async fn delete(&self, notification_id: Uuid) -> AppResult<bool>;

    async fn purge_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    async fn purge_for_admins(&self) -> AppResult<u64>;
}

/// User lookup operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn insert_active(&self, new: &NewBooking) -> AppResult<InsertOutcome> {
        BookingRepository::insert_active(self, new).await
    }

    async fn assign_code(&self, booking_id: Uuid, code: &str) -> AppResult<CodeAssignment> {
        BookingRepository::assign_code(self, booking_id, code).await
    }

    async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<Booking>> {
        BookingRepository::find_by_id(self, booking_id).await
    }

    async fn find_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<Option<Booking>> {
        BookingRepository::find_active_for_shipment(self, shipment_id).await
    }

    async fn count_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<i64> {
        BookingRepository::count_active_for_shipment(self, shipment_id).await
    }

    async fn count_code_prefix(&self, initial: char) -> AppResult<i64> {
        BookingRepository::count_code_prefix(self, initial).await
    }

    async fn code_exists(&self, code: &str) -> AppResult<bool> {
        BookingRepository::code_exists(self, code).await
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        BookingRepository::list(self, user_id, status).await
    }

    async fn list_for_shipment(&self, shipment_id: Uuid) -> AppResult<Vec<Booking>> {
        BookingRepository::list_for_shipment(self, shipment_id).await
    }

    async fn update_status(&self, booking_id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        BookingRepository::update_status(self, booking_id, status).await
    }

    async fn delete(&self, booking_id: Uuid) -> AppResult<bool> {
        BookingRepository::delete(self, booking_id).await
    }
}

#[async_trait]
impl ShipmentStore for ShipmentRepository {
    async fn insert(&self, new: &NewShipment) -> AppResult<Shipment> {
        ShipmentRepository::insert(self, new).await
    }

    async fn assign_code(&self, shipment_id: Uuid, code: &str) -> AppResult<bool> {
        ShipmentRepository::assign_code(self, shipment_id, code).await
    }

    async fn existing_codes(&self) -> AppResult<Vec<String>> {
        ShipmentRepository::existing_codes(self).await
    }

    async fn find_by_id(&self, shipment_id: Uuid) -> AppResult<Option<Shipment>> {
        ShipmentRepository::find_by_id(self, shipment_id).await
    }

    async fn list(&self) -> AppResult<Vec<Shipment>> {
        ShipmentRepository::list(self).await
    }

    async fn update(&self, shipment: &Shipment) -> AppResult<Shipment> {
        ShipmentRepository::update(self, shipment).await
    }

    async fn update_status(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment> {
        ShipmentRepository::update_status(self, shipment_id, status).await
    }

    async fn delete(&self, shipment_id: Uuid) -> AppResult<bool> {
        ShipmentRepository::delete(self, shipment_id).await
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        NotificationRepository::create(self, new).await
    }

    async fn find_by_id(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        NotificationRepository::find_by_id(self, notification_id).await
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        NotificationRepository::find_for_user(self, user_id).await
    }

    async fn find_for_admins(&self) -> AppResult<Vec<Notification>> {
        NotificationRepository::find_for_admins(self).await
    }

    async fn count_unread_for_user(&self, user_id: Uuid) -> AppResult<i64> {
        NotificationRepository::count_unread_for_user(self, user_id).await
    }

    async fn mark_read(&self, notification_id: Uuid) -> AppResult<bool> {
        NotificationRepository::mark_read(self, notification_id).await
    }

    async fn mark_all_read_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        NotificationRepository::mark_all_read_for_user(self, user_id).await
    }

    async fn mark_all_read_for_admins(&self) -> AppResult<u64> {
        NotificationRepository::mark_all_read_for_admins(self).await
    }

    async fn delete(&self, notification_id: Uuid) -> AppResult<bool> {
        NotificationRepository::delete(self, notification_id).await
    }

    async fn purge_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        NotificationRepository::purge_for_user(self, user_id).await
    }

    async fn purge_for_admins(&self) -> AppResult<u64> {
        NotificationRepository::purge_for_admins(self).await
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(self, user_id).await
    }
}
