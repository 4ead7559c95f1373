//! Connection pool indexed by connection ID and user ID.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID → connection handles (one user can have multiple tabs open).
    by_user: DashMap<Uuid, Vec<Arc<ConnectionHandle>>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove(&handle.user_id);
            }
        }
        Some(handle)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Gets all connections for a user.
    pub fn user_connections(&self, user_id: &Uuid) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Checks if a user has at least one live connection.
    pub fn is_user_connected(&self, user_id: &Uuid) -> bool {
        !self.user_connections(user_id).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulhub_entity::user::UserRole;
    use tokio::sync::mpsc;

    fn handle(user_id: Uuid) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(4);
        Arc::new(ConnectionHandle::new(
            user_id,
            UserRole::Carrier,
            "test".to_string(),
            tx,
        ))
    }

    #[test]
    fn test_add_and_remove() {
        let pool = ConnectionPool::new();
        let user = Uuid::new_v4();
        let h = handle(user);
        pool.add(h.clone());

        assert_eq!(pool.connection_count(), 1);
        assert!(pool.is_user_connected(&user));

        pool.remove(&h.id);
        assert_eq!(pool.connection_count(), 0);
        assert!(!pool.is_user_connected(&user));
    }

    #[test]
    fn test_multiple_connections_per_user() {
        let pool = ConnectionPool::new();
        let user = Uuid::new_v4();
        let a = handle(user);
        let b = handle(user);
        pool.add(a.clone());
        pool.add(b);

        assert_eq!(pool.user_connections(&user).len(), 2);
        assert_eq!(pool.user_count(), 1);

        pool.remove(&a.id);
        assert_eq!(pool.user_connections(&user).len(), 1);
        assert!(pool.is_user_connected(&user));
    }
}
