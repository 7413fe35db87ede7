//! Workspace membership model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's membership in a workspace.
///
/// The membership table is the single source of truth for access: query
/// scoping eligibility and channel-join eligibility both reduce to rows
/// in this table, so the two paths can never diverge on who counts as a
/// member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
