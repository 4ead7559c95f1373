//! Room registry mapping room names to member connections.
//!
//! Room naming follows the wire convention clients already use:
//! `user:{uuid}` for personal rooms and `admin` for the shared admin room.

use dashmap::DashMap;
use uuid::Uuid;

use crate::connection::handle::ConnectionId;

/// Name of the shared admin room.
pub const ADMIN_ROOM: &str = "admin";

/// Personal room name for a user.
pub fn user_room(user_id: &Uuid) -> String {
    format!("user:{user_id}")
}

/// Registry of rooms and their member connections.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Room name → member connection IDs.
    rooms: DashMap<String, Vec<ConnectionId>>,
    /// Connection ID → joined room names (reverse index for cleanup).
    memberships: DashMap<ConnectionId, Vec<String>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room. Joining twice is a no-op.
    pub fn join(&self, room: &str, conn_id: ConnectionId) {
        let mut members = self.rooms.entry(room.to_string()).or_default();
        if !members.contains(&conn_id) {
            members.push(conn_id);
        }
        drop(members);

        let mut joined = self.memberships.entry(conn_id).or_default();
        if !joined.iter().any(|r| r == room) {
            joined.push(room.to_string());
        }
    }

    /// Removes a connection from a room.
    pub fn leave(&self, room: &str, conn_id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(room) {
            members.retain(|id| *id != conn_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove(room);
            }
        }
        if let Some(mut joined) = self.memberships.get_mut(&conn_id) {
            joined.retain(|r| r != room);
        }
    }

    /// Removes a connection from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let joined = self
            .memberships
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default();
        for room in &joined {
            if let Some(mut members) = self.rooms.get_mut(room) {
                members.retain(|id| *id != conn_id);
                if members.is_empty() {
                    drop(members);
                    self.rooms.remove(room);
                }
            }
        }
    }

    /// Member connection IDs of a room.
    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Whether a connection is a member of a room.
    pub fn is_member(&self, room: &str, conn_id: ConnectionId) -> bool {
        self.rooms
            .get(room)
            .map(|members| members.contains(&conn_id))
            .unwrap_or(false)
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_leave() {
        let registry = RoomRegistry::new();
        let conn = Uuid::new_v4();
        let room = user_room(&Uuid::new_v4());

        registry.join(&room, conn);
        assert!(registry.is_member(&room, conn));
        assert_eq!(registry.members(&room).len(), 1);

        registry.leave(&room, conn);
        assert!(!registry.is_member(&room, conn));
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_double_join_is_noop() {
        let registry = RoomRegistry::new();
        let conn = Uuid::new_v4();

        registry.join(ADMIN_ROOM, conn);
        registry.join(ADMIN_ROOM, conn);
        assert_eq!(registry.members(ADMIN_ROOM).len(), 1);
    }

    #[test]
    fn test_leave_all_clears_memberships() {
        let registry = RoomRegistry::new();
        let conn = Uuid::new_v4();
        let other = Uuid::new_v4();
        let personal = user_room(&Uuid::new_v4());

        registry.join(&personal, conn);
        registry.join(ADMIN_ROOM, conn);
        registry.join(ADMIN_ROOM, other);

        registry.leave_all(conn);
        assert!(!registry.is_member(&personal, conn));
        assert!(!registry.is_member(ADMIN_ROOM, conn));
        assert!(registry.is_member(ADMIN_ROOM, other));
    }
}
