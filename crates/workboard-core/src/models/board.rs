//! Board domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A work-tracking surface owned by exactly one workspace.
///
/// `tenant_id` is denormalized from the owning workspace when the board
/// is created, so every board row carries its tenant directly. Board
/// access is membership in the owning workspace; boards keep no member
/// list of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    /// Sort position among the workspace's boards.
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new board.
///
/// The tenant is not part of the input; it is copied from the owning
/// workspace by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    pub workspace_id: Uuid,
    pub name: String,
    pub position: i64,
}

/// Fields that can be updated on an existing board.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBoard {
    pub name: Option<String>,
    pub position: Option<i64>,
}
