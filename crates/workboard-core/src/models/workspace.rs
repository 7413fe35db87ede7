//! Workspace domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collaboration space owned by exactly one tenant.
///
/// Workspaces are the unit of membership: access to a workspace, and to
/// every board under it, is defined by rows in the membership table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    /// The tenant this workspace belongs to.
    pub tenant_id: Uuid,
    pub name: String,
    /// URL-safe identifier, unique within the tenant.
    pub slug: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: String,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing workspace.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
