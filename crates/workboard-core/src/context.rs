//! Per-operation tenant context.
//!
//! A [`TenantContext`] is created once at the start of an inbound
//! operation, after authentication has resolved the caller and tenant,
//! and is read-only for the rest of that operation. It is a plain value
//! passed down the call chain; there is no process-wide current
//! context, so concurrent operations cannot observe each other's
//! resolution.

use uuid::Uuid;

/// The authenticated caller of the current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    /// Super admins see all tenants; tenant filtering is skipped for
    /// them.
    pub super_admin: bool,
}

impl Caller {
    /// A regular authenticated user.
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            super_admin: false,
        }
    }

    /// A caller holding the elevated capability.
    pub fn super_admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            super_admin: true,
        }
    }
}

/// Ambient state of one inbound operation: the resolved tenant (if
/// any), the caller (if any), and whether this is a system/maintenance
/// operation running outside normal request handling.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    tenant_id: Option<Uuid>,
    caller: Option<Caller>,
    system: bool,
}

impl TenantContext {
    /// Context for a normal request: resolved tenant plus caller.
    pub fn new(tenant_id: Option<Uuid>, caller: Option<Caller>) -> Self {
        Self {
            tenant_id,
            caller,
            system: false,
        }
    }

    /// Context for an anonymous/public operation. Such paths apply
    /// their own explicit filters.
    pub fn anonymous() -> Self {
        Self::new(None, None)
    }

    /// Context for a system/maintenance operation (batch migration,
    /// scheduled job). These run across all tenants.
    pub fn system() -> Self {
        Self {
            tenant_id: None,
            caller: None,
            system: true,
        }
    }

    /// Mark an existing context as a system operation.
    pub fn into_system(mut self) -> Self {
        self.system = true;
        self
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    pub fn caller(&self) -> Option<Caller> {
        self.caller
    }

    pub fn is_system(&self) -> bool {
        self.system
    }
}
