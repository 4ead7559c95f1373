//! Cross-crate trait seams.

pub mod broadcaster;

pub use broadcaster::RealtimeBroadcaster;
