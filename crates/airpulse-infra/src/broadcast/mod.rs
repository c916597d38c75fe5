//! Real-time broadcast backends.

mod channel;

pub use channel::{BroadcastMessage, ChannelBroadcaster};
