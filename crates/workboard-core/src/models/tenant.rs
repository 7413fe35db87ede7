//! Tenant domain model.
//!
//! Tenants are the root isolation boundary. Workspaces and boards are
//! scoped to a tenant; no data crosses tenant boundaries for
//! non-elevated callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant is an isolated customer account.
///
/// Each tenant owns its workspaces and boards. Tenants are created and
/// destroyed by provisioning flows; nothing in this core mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// URL-safe unique identifier (e.g., `acme`).
    pub slug: String,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub metadata: Option<serde_json::Value>,
}
