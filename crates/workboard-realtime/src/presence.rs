//! Presence roster payload.

use serde::Serialize;
use uuid::Uuid;
use workboard_core::models::user::User;

/// Identity published to a presence channel's other subscribers when a
/// join is granted.
///
/// This is a deliberate minimization boundary: roster display fields
/// only, never credentials or capability flags from the full user
/// record. Serialize-only; nothing ever parses one of these back in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PresencePayload {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl PresencePayload {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}
