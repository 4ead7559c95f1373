//! The realtime hub: connection registry, room routing, and fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use haulhub_core::config::RealtimeConfig;
use haulhub_core::events::ShipmentBookingStatus;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_entity::user::UserRole;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::pool::ConnectionPool;
use crate::message::{ClientMessage, ServerEvent};
use crate::room::{ADMIN_ROOM, RoomRegistry, user_room};

/// Central coordinator for all WebSocket connections.
#[derive(Debug)]
pub struct RealtimeHub {
    pool: ConnectionPool,
    rooms: RoomRegistry,
    config: RealtimeConfig,
}

impl RealtimeHub {
    /// Creates a new hub.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms: RoomRegistry::new(),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// The connection auto-joins its user's personal room. Returns the
    /// handle and the receiver side of the outbound event channel.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
        user_name: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, role, user_name, tx));

        // Evict the oldest connection when a user is at the cap.
        let existing = self.pool.user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            if let Some(oldest) = existing.first() {
                warn!(
                    user_id = %user_id,
                    count = existing.len(),
                    max = self.config.max_connections_per_user,
                    "User at max connections, closing oldest"
                );
                oldest.mark_dead();
                self.rooms.leave_all(oldest.id);
                self.pool.remove(&oldest.id);
            }
        }

        self.rooms.join(&user_room(&user_id), handle.id);
        self.pool.add(handle.clone());

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and clears its room memberships.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        self.rooms.leave_all(*conn_id);
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Processes an inbound frame from a client.
    pub fn handle_client_message(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        let msg: ClientMessage = match serde_json::from_str(raw) {
            Ok(m) => m,
            Err(e) => {
                handle.send(ServerEvent::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
                return;
            }
        };

        match msg {
            // The room comes from the authenticated identity, never from
            // the payload: a client cannot join another user's room.
            ClientMessage::JoinUserRoom { .. } => {
                let room = user_room(&handle.user_id);
                self.rooms.join(&room, handle.id);
                handle.send(ServerEvent::RoomJoined { room });
            }
            ClientMessage::JoinAdminRoom => {
                if handle.role.is_admin() {
                    self.rooms.join(ADMIN_ROOM, handle.id);
                    handle.send(ServerEvent::RoomJoined {
                        room: ADMIN_ROOM.to_string(),
                    });
                } else {
                    handle.send(ServerEvent::Error {
                        code: "FORBIDDEN".to_string(),
                        message: "Admin role required".to_string(),
                    });
                }
            }
            ClientMessage::Pong => {}
        }
    }

    /// Sends an event to every connection in a user's personal room.
    pub fn send_to_user(&self, user_id: &Uuid, event: &ServerEvent) {
        self.send_to_room(&user_room(user_id), event);
    }

    /// Sends an event to every connection in the admin room.
    pub fn send_to_admins(&self, event: &ServerEvent) {
        self.send_to_room(ADMIN_ROOM, event);
    }

    /// Sends an event to every member of a room.
    pub fn send_to_room(&self, room: &str, event: &ServerEvent) {
        let members = self.rooms.members(room);
        let mut sent = 0usize;
        for conn_id in &members {
            if let Some(handle) = self.pool.get(conn_id) {
                if handle.send(event.clone()) {
                    sent += 1;
                }
            }
        }
        debug!(room = %room, members = members.len(), sent, "Room fan-out");
    }

    /// Broadcasts an event to every live connection.
    pub fn broadcast_all(&self, event: &ServerEvent) {
        let all = self.pool.all_connections();
        for handle in &all {
            handle.send(event.clone());
        }
        debug!(connections = all.len(), "Global broadcast");
    }

    /// Total live connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }
}

#[async_trait]
impl RealtimeBroadcaster for RealtimeHub {
    async fn emit_user_notification(&self, user_id: Uuid, notification: serde_json::Value) {
        self.send_to_user(&user_id, &ServerEvent::NewNotification(notification));
    }

    async fn emit_admin_notification(&self, notification: serde_json::Value) {
        self.send_to_admins(&ServerEvent::NewAdminNotification(notification));
    }

    async fn emit_booking_update(&self, owner_id: Uuid, booking: serde_json::Value) {
        self.send_to_user(&owner_id, &ServerEvent::BookingUpdate(booking.clone()));
        self.send_to_admins(&ServerEvent::BookingUpdate(booking));
    }

    async fn emit_shipment_update(&self, shipment: serde_json::Value) {
        self.broadcast_all(&ServerEvent::ShipmentUpdate(shipment));
    }

    async fn emit_shipment_booking_status(&self, status: ShipmentBookingStatus) {
        self.broadcast_all(&ServerEvent::ShipmentBookingStatus(status));
    }
}
