//! Wire message definitions for the WebSocket protocol.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use haulhub_core::events::ShipmentBookingStatus;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join the caller's personal room. The room is derived from the
    /// authenticated identity; the payload user ID is advisory only.
    JoinUserRoom {
        /// Claimed user ID (ignored in favor of the connection identity).
        #[serde(rename = "userId")]
        user_id: Option<Uuid>,
    },
    /// Join the shared admin room. Granted only to admin connections.
    JoinAdminRoom,
    /// Client keepalive.
    Pong,
}

/// Events pushed by the server to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A user-facing notification, delivered to its recipient's room.
    NewNotification(serde_json::Value),
    /// An admin-facing notification, delivered to the admin room.
    NewAdminNotification(serde_json::Value),
    /// A booking changed, delivered to the booking owner's room.
    BookingUpdate(serde_json::Value),
    /// A shipment changed, broadcast to all connections.
    ShipmentUpdate(serde_json::Value),
    /// A shipment's booked/available state flipped, broadcast to all.
    ShipmentBookingStatus(ShipmentBookingStatus),
    /// Room join confirmation.
    RoomJoined {
        /// The room that was joined.
        room: String,
    },
    /// Protocol-level error.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_event_wire_names() {
        let event = ServerEvent::NewNotification(serde_json::json!({"title": "t"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "new-notification");
        assert_eq!(json["data"]["title"], "t");

        let status = ServerEvent::ShipmentBookingStatus(ShipmentBookingStatus::available(
            Uuid::new_v4(),
        ));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["event"], "shipment-booking-status");
        assert_eq!(json["data"]["isBooked"], false);
    }

    #[test]
    fn test_client_message_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event": "join-admin-room"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinAdminRoom));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"event": "join-user-room", "userId": null}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinUserRoom { user_id: None }));
    }
}
