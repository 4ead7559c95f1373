//! Real-time delivery engine.
//!
//! Connected clients are grouped into rooms: each user has a personal
//! `user:{id}` room joined automatically on connect, and admins may join
//! the shared `admin` room after a role check. The [`RealtimeHub`] fans
//! events out to rooms or to every live connection, and implements
//! [`haulhub_core::traits::RealtimeBroadcaster`] so services never depend
//! on this crate directly.

pub mod connection;
pub mod hub;
pub mod message;
pub mod room;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::pool::ConnectionPool;
pub use hub::RealtimeHub;
pub use message::{ClientMessage, ServerEvent};
pub use room::RoomRegistry;
