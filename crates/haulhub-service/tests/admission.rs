//! Booking admission behavior against in-memory stores.
//!
//! The doubles enforce the same uniqueness rules as the database
//! indexes, atomically under a mutex, so the admission flow can be
//! raced with plain `tokio::spawn`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use haulhub_core::error::AppError;
use haulhub_core::events::ShipmentBookingStatus;
use haulhub_core::result::AppResult;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_database::repositories::booking::{
    CodeAssignment, ConflictNamespace, InsertOutcome, NewBooking,
};
use haulhub_database::repositories::notification::NewNotification;
use haulhub_database::repositories::shipment::NewShipment;
use haulhub_entity::booking::{Booking, BookingStatus};
use haulhub_entity::notification::{Notification, NotificationAudience};
use haulhub_entity::shipment::{Shipment, ShipmentStatus};
use haulhub_entity::user::{User, UserRole};
use haulhub_service::RequestContext;
use haulhub_service::booking::{AdmissionError, BookingService};
use haulhub_service::notification::NotificationService;
use haulhub_service::shipment::ShipmentService;
use haulhub_service::store::{BookingStore, NotificationStore, ShipmentStore, UserStore};

/// Shared in-memory tables guarded by one mutex, mirroring the
/// atomicity of the database's unique indexes.
#[derive(Default)]
struct MemoryDb {
    bookings: Mutex<Vec<Booking>>,
    shipments: Mutex<Vec<Shipment>>,
    notifications: Mutex<Vec<Notification>>,
    users: Mutex<Vec<User>>,
}

impl MemoryDb {
    fn seed_shipment(&self, status: ShipmentStatus) -> Shipment {
        let shipment = Shipment {
            id: Uuid::new_v4(),
            code: Some("SH01".to_string()),
            origin: "Chennai".to_string(),
            destination: "Mumbai".to_string(),
            vehicle_type: "Truck".to_string(),
            load: "Textiles".to_string(),
            weight: 1200.0,
            price: 45000.0,
            pickup_date: Utc::now(),
            status,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.shipments.lock().unwrap().push(shipment.clone());
        shipment
    }

    fn seed_user(&self, name: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: Some("9876543210".to_string()),
            vehicle_number: Some("TN-01-1234".to_string()),
            role,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn booking(&self, booking_id: Uuid) -> Option<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
    }
}

#[async_trait]
impl BookingStore for MemoryDb {
    async fn insert_active(&self, new: &NewBooking) -> AppResult<InsertOutcome> {
        let mut bookings = self.bookings.lock().unwrap();
        if let Some(active) = bookings
            .iter()
            .find(|b| b.shipment_id == new.shipment_id && b.is_active())
        {
            let namespace = if active.user_id == new.user_id {
                ConflictNamespace::UserShipment
            } else {
                ConflictNamespace::ShipmentActivity
            };
            return Ok(InsertOutcome::Conflict(namespace));
        }
        let booking = Booking {
            id: Uuid::new_v4(),
            code: None,
            shipment_id: new.shipment_id,
            user_id: new.user_id,
            user_name: new.user_name.clone(),
            status: BookingStatus::Pending,
            details: Json(new.details.clone()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        bookings.push(booking.clone());
        Ok(InsertOutcome::Created(booking))
    }

    async fn assign_code(&self, booking_id: Uuid, code: &str) -> AppResult<CodeAssignment> {
        let mut bookings = self.bookings.lock().unwrap();
        if bookings.iter().any(|b| b.code.as_deref() == Some(code)) {
            return Ok(CodeAssignment::CodeTaken);
        }
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        if booking.code.is_some() {
            return Ok(CodeAssignment::AlreadyAssigned(booking.clone()));
        }
        booking.code = Some(code.to_string());
        Ok(CodeAssignment::Assigned(booking.clone()))
    }

    async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.booking(booking_id))
    }

    async fn find_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.shipment_id == shipment_id && b.is_active())
            .cloned())
    }

    async fn count_active_for_shipment(&self, shipment_id: Uuid) -> AppResult<i64> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.shipment_id == shipment_id && b.is_active())
            .count() as i64)
    }

    async fn count_code_prefix(&self, initial: char) -> AppResult<i64> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.code
                    .as_ref()
                    .is_some_and(|code| code.starts_with(initial))
            })
            .count() as i64)
    }

    async fn code_exists(&self, code: &str) -> AppResult<bool> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.code.as_deref() == Some(code)))
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| user_id.is_none_or(|u| b.user_id == u))
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect())
    }

    async fn list_for_shipment(&self, shipment_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.shipment_id == shipment_id)
            .cloned()
            .collect())
    }

    async fn update_status(&self, booking_id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn delete(&self, booking_id: Uuid) -> AppResult<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id != booking_id);
        Ok(bookings.len() < before)
    }
}

#[async_trait]
impl ShipmentStore for MemoryDb {
    async fn insert(&self, new: &NewShipment) -> AppResult<Shipment> {
        let shipment = Shipment {
            id: Uuid::new_v4(),
            code: None,
            origin: new.origin.clone(),
            destination: new.destination.clone(),
            vehicle_type: new.vehicle_type.clone(),
            load: new.load.clone(),
            weight: new.weight,
            price: new.price,
            pickup_date: new.pickup_date,
            status: ShipmentStatus::Pending,
            created_by: new.created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.shipments.lock().unwrap().push(shipment.clone());
        Ok(shipment)
    }

    async fn assign_code(&self, shipment_id: Uuid, code: &str) -> AppResult<bool> {
        let mut shipments = self.shipments.lock().unwrap();
        if shipments.iter().any(|s| s.code.as_deref() == Some(code)) {
            return Ok(false);
        }
        if let Some(shipment) = shipments
            .iter_mut()
            .find(|s| s.id == shipment_id && s.code.is_none())
        {
            shipment.code = Some(code.to_string());
        }
        Ok(true)
    }

    async fn existing_codes(&self) -> AppResult<Vec<String>> {
        Ok(self
            .shipments
            .lock()
            .unwrap()
            .iter()
            .filter_map(|s| s.code.clone())
            .collect())
    }

    async fn find_by_id(&self, shipment_id: Uuid) -> AppResult<Option<Shipment>> {
        Ok(self
            .shipments
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == shipment_id)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Shipment>> {
        Ok(self.shipments.lock().unwrap().clone())
    }

    async fn update(&self, updated: &Shipment) -> AppResult<Shipment> {
        let mut shipments = self.shipments.lock().unwrap();
        let shipment = shipments
            .iter_mut()
            .find(|s| s.id == updated.id)
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        *shipment = updated.clone();
        Ok(shipment.clone())
    }

    async fn update_status(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment> {
        let mut shipments = self.shipments.lock().unwrap();
        let shipment = shipments
            .iter_mut()
            .find(|s| s.id == shipment_id)
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        shipment.status = status;
        Ok(shipment.clone())
    }

    async fn delete(&self, shipment_id: Uuid) -> AppResult<bool> {
        let mut shipments = self.shipments.lock().unwrap();
        let before = shipments.len();
        shipments.retain(|s| s.id != shipment_id);
        Ok(shipments.len() < before)
    }
}

#[async_trait]
impl NotificationStore for MemoryDb {
    async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            audience: new.audience,
            user_id: new.user_id,
            kind: new.kind.clone(),
            title: new.title.clone(),
            message: new.message.clone(),
            msg_key: new.msg_key.clone(),
            params: new.params.clone().map(Json),
            priority: new.priority,
            notification_type: new.notification_type,
            related_booking_id: new.related_booking_id,
            related_shipment_id: new.related_shipment_id,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.audience == NotificationAudience::User && n.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn find_for_admins(&self) -> AppResult<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.audience == NotificationAudience::Admin)
            .cloned()
            .collect())
    }

    async fn count_unread_for_user(&self, user_id: Uuid) -> AppResult<i64> {
        Ok(self.find_for_user(user_id).await?.iter().filter(|n| n.is_unread()).count() as i64)
    }

    async fn mark_read(&self, notification_id: Uuid) -> AppResult<bool> {
        let mut notifications = self.notifications.lock().unwrap();
        match notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut count = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.user_id == Some(user_id) && !n.is_read)
        {
            n.is_read = true;
            count += 1;
        }
        Ok(count)
    }

    async fn mark_all_read_for_admins(&self) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut count = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.audience == NotificationAudience::Admin && !n.is_read)
        {
            n.is_read = true;
            count += 1;
        }
        Ok(count)
    }

    async fn delete(&self, notification_id: Uuid) -> AppResult<bool> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| n.id != notification_id);
        Ok(notifications.len() < before)
    }

    async fn purge_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| n.user_id != Some(user_id));
        Ok((before - notifications.len()) as u64)
    }

    async fn purge_for_admins(&self) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| n.audience != NotificationAudience::Admin);
        Ok((before - notifications.len()) as u64)
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }
}

/// Recorded broadcaster events, in emission order.
#[derive(Debug, Clone, PartialEq)]
enum Recorded {
    UserNotification(Uuid),
    AdminNotification,
    BookingUpdate(Uuid),
    ShipmentUpdate,
    BookingStatusBroadcast(ShipmentBookingStatus),
}

#[derive(Default)]
struct RecordingBroadcaster {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingBroadcaster {
    fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    fn status_broadcasts(&self) -> Vec<ShipmentBookingStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::BookingStatusBroadcast(status) => Some(status),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RealtimeBroadcaster for RecordingBroadcaster {
    async fn emit_user_notification(&self, user_id: Uuid, _notification: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push(Recorded::UserNotification(user_id));
    }

    async fn emit_admin_notification(&self, _notification: serde_json::Value) {
        self.events.lock().unwrap().push(Recorded::AdminNotification);
    }

    async fn emit_booking_update(&self, owner_id: Uuid, _booking: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push(Recorded::BookingUpdate(owner_id));
    }

    async fn emit_shipment_update(&self, _shipment: serde_json::Value) {
        self.events.lock().unwrap().push(Recorded::ShipmentUpdate);
    }

    async fn emit_shipment_booking_status(&self, status: ShipmentBookingStatus) {
        self.events
            .lock()
            .unwrap()
            .push(Recorded::BookingStatusBroadcast(status));
    }
}

/// Notification store whose writes always fail.
struct BrokenNotificationStore;

#[async_trait]
impl NotificationStore for BrokenNotificationStore {
    async fn create(&self, _new: &NewNotification) -> AppResult<Notification> {
        Err(AppError::database("notification table unavailable"))
    }

    async fn find_by_id(&self, _notification_id: Uuid) -> AppResult<Option<Notification>> {
        Ok(None)
    }

    async fn find_for_user(&self, _user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(Vec::new())
    }

    async fn find_for_admins(&self) -> AppResult<Vec<Notification>> {
        Ok(Vec::new())
    }

    async fn count_unread_for_user(&self, _user_id: Uuid) -> AppResult<i64> {
        Ok(0)
    }

    async fn mark_read(&self, _notification_id: Uuid) -> AppResult<bool> {
        Ok(false)
    }

    async fn mark_all_read_for_user(&self, _user_id: Uuid) -> AppResult<u64> {
        Ok(0)
    }

    async fn mark_all_read_for_admins(&self) -> AppResult<u64> {
        Ok(0)
    }

    async fn delete(&self, _notification_id: Uuid) -> AppResult<bool> {
        Ok(false)
    }

    async fn purge_for_user(&self, _user_id: Uuid) -> AppResult<u64> {
        Ok(0)
    }

    async fn purge_for_admins(&self) -> AppResult<u64> {
        Ok(0)
    }
}

/// Shipment store whose code listing always fails; everything else
/// delegates to the shared tables.
struct UnlistableCodeStore {
    inner: Arc<MemoryDb>,
}

#[async_trait]
impl ShipmentStore for UnlistableCodeStore {
    async fn insert(&self, new: &NewShipment) -> AppResult<Shipment> {
        self.inner.insert(new).await
    }

    async fn assign_code(&self, shipment_id: Uuid, code: &str) -> AppResult<bool> {
        ShipmentStore::assign_code(self.inner.as_ref(), shipment_id, code).await
    }

    async fn existing_codes(&self) -> AppResult<Vec<String>> {
        Err(AppError::database("code listing unavailable"))
    }

    async fn find_by_id(&self, shipment_id: Uuid) -> AppResult<Option<Shipment>> {
        ShipmentStore::find_by_id(self.inner.as_ref(), shipment_id).await
    }

    async fn list(&self) -> AppResult<Vec<Shipment>> {
        ShipmentStore::list(self.inner.as_ref()).await
    }

    async fn update(&self, updated: &Shipment) -> AppResult<Shipment> {
        self.inner.update(updated).await
    }

    async fn update_status(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
    ) -> AppResult<Shipment> {
        ShipmentStore::update_status(self.inner.as_ref(), shipment_id, status).await
    }

    async fn delete(&self, shipment_id: Uuid) -> AppResult<bool> {
        ShipmentStore::delete(self.inner.as_ref(), shipment_id).await
    }
}

struct Harness {
    db: Arc<MemoryDb>,
    broadcaster: Arc<RecordingBroadcaster>,
    service: BookingService,
}

fn harness() -> Harness {
    let db = Arc::new(MemoryDb::default());
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let notifications = NotificationService::new(db.clone(), broadcaster.clone());
    let service = BookingService::new(
        db.clone(),
        db.clone(),
        db.clone(),
        notifications,
        broadcaster.clone(),
    );
    Harness {
        db,
        broadcaster,
        service,
    }
}

fn ctx_for(user: &User) -> RequestContext {
    RequestContext::new(user.id, user.role, user.name.clone(), user.phone.clone())
}

#[tokio::test]
async fn concurrent_requests_admit_exactly_one() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        let user = h.db.seed_user(&format!("Carrier {i}"), UserRole::Carrier);
        let shipment_id = shipment.id;
        handles.push(tokio::spawn(async move {
            service.create_booking(&ctx_for(&user), shipment_id).await
        }));
    }

    let mut wins = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(AdmissionError::DuplicateBooking { .. })
            | Err(AdmissionError::DuplicateUserBooking) => duplicates += 1,
            Err(other) => panic!("unexpected admission error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(
        h.db.count_active_for_shipment(shipment.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn sequential_duplicate_names_the_holder() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let first = h.db.seed_user("Dinesh", UserRole::Carrier);
    let second = h.db.seed_user("Uma", UserRole::Carrier);

    h.service
        .create_booking(&ctx_for(&first), shipment.id)
        .await
        .unwrap();

    let err = h
        .service
        .create_booking(&ctx_for(&second), shipment.id)
        .await
        .unwrap_err();
    match err {
        AdmissionError::DuplicateBooking { booked_by } => {
            assert_eq!(booked_by.as_deref(), Some("Dinesh"));
        }
        other => panic!("expected duplicate booking, got {other}"),
    }
}

#[tokio::test]
async fn same_user_cannot_book_twice() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);

    h.service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();

    let err = h
        .service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::DuplicateUserBooking));
}

#[tokio::test]
async fn same_user_racing_themselves_admits_exactly_one() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let ctx = ctx_for(&user);
        let shipment_id = shipment.id;
        handles.push(tokio::spawn(async move {
            service.create_booking(&ctx, shipment_id).await
        }));
    }

    let mut wins = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(AdmissionError::DuplicateUserBooking) => duplicates += 1,
            Err(other) => panic!("unexpected admission error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(
        h.db.count_active_for_shipment(shipment.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn unbookable_shipment_is_rejected_before_insert() {
    let h = harness();
    let delivered = h.db.seed_shipment(ShipmentStatus::Delivered);
    let cancelled = h.db.seed_shipment(ShipmentStatus::Cancelled);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);

    for shipment in [&delivered, &cancelled] {
        let err = h
            .service
            .create_booking(&ctx_for(&user), shipment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::ShipmentNotBookable));
    }

    let err = h
        .service
        .create_booking(&ctx_for(&user), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::ShipmentNotFound(_)));
}

#[tokio::test]
async fn first_booking_code_is_sequential_from_initial() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);

    let view = h
        .service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();
    assert_eq!(view.booking.code.as_deref(), Some("D10001"));

    // A second booking by the same initial on another shipment advances
    // the sequence.
    let other = h.db.seed_shipment(ShipmentStatus::Pending);
    let second_user = h.db.seed_user("Deepa", UserRole::Carrier);
    let second = h
        .service
        .create_booking(&ctx_for(&second_user), other.id)
        .await
        .unwrap();
    assert_eq!(second.booking.code.as_deref(), Some("D10002"));
}

#[tokio::test]
async fn codes_are_unique_and_survive_status_changes() {
    let h = harness();
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);
    let admin = h.db.seed_user("Admin", UserRole::Admin);

    let mut codes = Vec::new();
    for _ in 0..5 {
        let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
        let view = h
            .service
            .create_booking(&ctx_for(&user), shipment.id)
            .await
            .unwrap();
        codes.push(view.booking.code.clone().unwrap());
    }
    let mut deduped = codes.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), codes.len());

    // Status transitions never touch the code.
    let bookings = BookingStore::list(h.db.as_ref(), Some(user.id), None)
        .await
        .unwrap();
    let target = &bookings[0];
    let updated = h
        .service
        .update_status(&ctx_for(&admin), target.id, BookingStatus::Approved)
        .await
        .unwrap();
    assert_eq!(updated.booking.code, target.code);
}

#[tokio::test]
async fn rejection_reopens_the_slot() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let first = h.db.seed_user("Dinesh", UserRole::Carrier);
    let second = h.db.seed_user("Uma", UserRole::Carrier);
    let admin = h.db.seed_user("Admin", UserRole::Admin);

    let view = h
        .service
        .create_booking(&ctx_for(&first), shipment.id)
        .await
        .unwrap();

    h.service
        .update_status(&ctx_for(&admin), view.booking.id, BookingStatus::Rejected)
        .await
        .unwrap();

    // The rejection broadcast an availability flip.
    let statuses = h.broadcaster.status_broadcasts();
    let last = statuses.last().unwrap();
    assert!(!last.is_booked);
    assert_eq!(last.shipment_id, shipment.id);

    // And a different carrier can now win the slot.
    h.service
        .create_booking(&ctx_for(&second), shipment.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn approval_moves_shipment_in_transit_and_notifies() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);
    let admin = h.db.seed_user("Admin", UserRole::Admin);

    let view = h
        .service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();
    let approved = h
        .service
        .update_status(&ctx_for(&admin), view.booking.id, BookingStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.booking.status, BookingStatus::Approved);

    let shipment = ShipmentStore::find_by_id(h.db.as_ref(), shipment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shipment.status, ShipmentStatus::InTransit);

    let inbox = h.db.find_for_user(user.id).await.unwrap();
    assert!(inbox.iter().any(|n| n.title == "Booking Approved"));

    // Approved bookings can complete, and completion is terminal.
    h.service
        .update_status(&ctx_for(&admin), view.booking.id, BookingStatus::Completed)
        .await
        .unwrap();
    let err = h
        .service
        .update_status(&ctx_for(&admin), view.booking.id, BookingStatus::Approved)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Cannot move booking"));
}

#[tokio::test]
async fn status_updates_require_admin_and_valid_transition() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);
    let admin = h.db.seed_user("Admin", UserRole::Admin);

    let view = h
        .service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();

    // Carriers cannot decide bookings.
    assert!(
        h.service
            .update_status(&ctx_for(&user), view.booking.id, BookingStatus::Approved)
            .await
            .is_err()
    );

    // Pending cannot skip to completed.
    assert!(
        h.service
            .update_status(&ctx_for(&admin), view.booking.id, BookingStatus::Completed)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn deleting_last_active_booking_broadcasts_availability() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);

    let view = h
        .service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();

    h.service
        .delete_booking(&ctx_for(&user), view.booking.id)
        .await
        .unwrap();

    let statuses = h.broadcaster.status_broadcasts();
    let last = statuses.last().unwrap();
    assert!(!last.is_booked);
    assert_eq!(last.shipment_id, shipment.id);
}

#[tokio::test]
async fn admission_survives_notification_failure() {
    let db = Arc::new(MemoryDb::default());
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let notifications =
        NotificationService::new(Arc::new(BrokenNotificationStore), broadcaster.clone());
    let service = BookingService::new(
        db.clone(),
        db.clone(),
        db.clone(),
        notifications,
        broadcaster.clone(),
    );

    let shipment = db.seed_shipment(ShipmentStatus::Pending);
    let user = db.seed_user("Dinesh", UserRole::Carrier);

    let view = service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();
    assert_eq!(view.booking.status, BookingStatus::Pending);

    // The booking still broadcast its availability flip.
    let statuses = broadcaster.status_broadcasts();
    assert!(statuses.iter().any(|s| s.is_booked));
}

#[tokio::test]
async fn admission_broadcasts_booked_status_and_owner_update() {
    let h = harness();
    let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
    let user = h.db.seed_user("Dinesh", UserRole::Carrier);

    h.service
        .create_booking(&ctx_for(&user), shipment.id)
        .await
        .unwrap();

    let events = h.broadcaster.events();
    assert!(events.contains(&Recorded::AdminNotification));
    assert!(events.contains(&Recorded::UserNotification(user.id)));
    assert!(events.contains(&Recorded::BookingUpdate(user.id)));

    let statuses = h.broadcaster.status_broadcasts();
    let booked = statuses.last().unwrap();
    assert!(booked.is_booked);
    assert_eq!(booked.booked_by.as_deref(), Some("Dinesh"));
    assert_eq!(booked.booking_status.as_deref(), Some("Pending"));
}

#[tokio::test]
async fn shipment_gets_fallback_code_when_sequence_is_unavailable() {
    let db = Arc::new(MemoryDb::default());
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let store = Arc::new(UnlistableCodeStore { inner: db.clone() });
    let service = ShipmentService::new(store, db.clone(), broadcaster);

    let admin = db.seed_user("Admin", UserRole::Admin);
    let shipment = service
        .create_shipment(
            &ctx_for(&admin),
            NewShipment {
                origin: "Chennai".to_string(),
                destination: "Mumbai".to_string(),
                vehicle_type: "Truck".to_string(),
                load: "Textiles".to_string(),
                weight: 800.0,
                price: 30000.0,
                pickup_date: Utc::now(),
                created_by: admin.id,
            },
        )
        .await
        .unwrap();

    // The sequential generator never ran, yet the shipment still carries
    // a code from the timestamp fallback.
    let code = shipment.code.expect("fallback code assigned");
    let suffix = code.strip_prefix("SH").unwrap().parse::<u64>().unwrap();
    assert!(suffix < 100);
}

#[tokio::test]
async fn non_admin_listing_is_scoped_to_self() {
    let h = harness();
    let first = h.db.seed_user("Dinesh", UserRole::Carrier);
    let second = h.db.seed_user("Uma", UserRole::Carrier);
    let admin = h.db.seed_user("Admin", UserRole::Admin);

    for user in [&first, &second] {
        let shipment = h.db.seed_shipment(ShipmentStatus::Pending);
        h.service
            .create_booking(&ctx_for(user), shipment.id)
            .await
            .unwrap();
    }

    // Even with a filter for someone else, a carrier sees only their own.
    let mine = h
        .service
        .list_bookings(&ctx_for(&first), Some(second.id), None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].booking.user_id, first.id);

    let all = h
        .service
        .list_bookings(&ctx_for(&admin), None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
