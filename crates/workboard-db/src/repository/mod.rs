//! SurrealDB repository implementations.

mod board;
mod membership;
mod tenant;
mod user;
mod workspace;

pub use board::SurrealBoardRepository;
pub use membership::SurrealMembershipRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
pub use workspace::SurrealWorkspaceRepository;

use workboard_core::scope::TenantScope;

/// Audit line for scope bypasses. Every unscoped statement against a
/// tenant-owned table shows up in the logs with the table it touched.
fn trace_scope(table: &'static str, scope: TenantScope) {
    if scope.tenant_id().is_none() {
        tracing::debug!(table, "executing unscoped query on tenant-owned table");
    }
}
