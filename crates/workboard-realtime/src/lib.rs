//! Workboard Realtime — channel model and join authorization for the
//! real-time layer.
//!
//! The transport that delivers messages is an external collaborator;
//! this crate decides, per subscription attempt, whether a caller may
//! join a channel and what identity payload (if any) presence channels
//! publish about them.

pub mod authorize;
pub mod channel;
pub mod error;
pub mod presence;

pub use authorize::{ChannelAuthorizer, ChannelGrant};
pub use channel::Channel;
pub use error::ChannelError;
pub use presence::PresencePayload;
