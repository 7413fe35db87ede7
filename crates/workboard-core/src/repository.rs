//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Reads and writes of
//! tenant-owned entities (workspaces, boards) take a mandatory
//! [`TenantScope`], so the tenant filter can never be skipped, only
//! explicitly bypassed through one of the scope's escape hatches.

use uuid::Uuid;

use crate::error::WorkboardResult;
use crate::models::{
    board::{Board, CreateBoard, UpdateBoard},
    membership::Membership,
    tenant::{CreateTenant, Tenant},
    user::{CreateUser, UpdateUser, User},
    workspace::{CreateWorkspace, UpdateWorkspace, Workspace},
};
use crate::scope::TenantScope;

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Global-scope repositories
// ---------------------------------------------------------------------------

/// Tenant provisioning surface. Tenant rows are the isolation boundary
/// itself and are not tenant-filtered.
pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = WorkboardResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WorkboardResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = WorkboardResult<Tenant>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = WorkboardResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Tenant>>> + Send;
}

/// Users are global identity principals, looked up by id or email.
pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = WorkboardResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WorkboardResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = WorkboardResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = WorkboardResult<User>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = WorkboardResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait WorkspaceRepository: Send + Sync {
    fn create(
        &self,
        input: CreateWorkspace,
    ) -> impl Future<Output = WorkboardResult<Workspace>> + Send;
    fn get_by_id(
        &self,
        scope: TenantScope,
        id: Uuid,
    ) -> impl Future<Output = WorkboardResult<Workspace>> + Send;
    fn get_by_slug(
        &self,
        scope: TenantScope,
        slug: &str,
    ) -> impl Future<Output = WorkboardResult<Workspace>> + Send;
    fn update(
        &self,
        scope: TenantScope,
        id: Uuid,
        input: UpdateWorkspace,
    ) -> impl Future<Output = WorkboardResult<Workspace>> + Send;
    fn delete(
        &self,
        scope: TenantScope,
        id: Uuid,
    ) -> impl Future<Output = WorkboardResult<()>> + Send;
    fn list(
        &self,
        scope: TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Workspace>>> + Send;
}

pub trait BoardRepository: Send + Sync {
    /// Resolves the owning workspace through `scope` before the board
    /// row is written, so the `tenant_id` denormalization cannot cross
    /// the caller's visibility.
    fn create(
        &self,
        scope: TenantScope,
        input: CreateBoard,
    ) -> impl Future<Output = WorkboardResult<Board>> + Send;
    fn get_by_id(
        &self,
        scope: TenantScope,
        id: Uuid,
    ) -> impl Future<Output = WorkboardResult<Board>> + Send;
    fn update(
        &self,
        scope: TenantScope,
        id: Uuid,
        input: UpdateBoard,
    ) -> impl Future<Output = WorkboardResult<Board>> + Send;
    fn delete(
        &self,
        scope: TenantScope,
        id: Uuid,
    ) -> impl Future<Output = WorkboardResult<()>> + Send;
    fn list(
        &self,
        scope: TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Board>>> + Send;
    fn list_by_workspace(
        &self,
        scope: TenantScope,
        workspace_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Board>>> + Send;
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Answers "does this user belong to this workspace's member set".
///
/// Query scoping and channel authorization both consult this capability
/// and nothing else, so the two paths can never diverge on who counts
/// as a member. Checks are read-only and idempotent and may run
/// concurrently across operations.
pub trait MembershipResolver: Send + Sync {
    fn is_member(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> impl Future<Output = WorkboardResult<bool>> + Send;
}

pub trait MembershipRepository: MembershipResolver {
    fn add(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = WorkboardResult<Membership>> + Send;
    fn remove(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = WorkboardResult<()>> + Send;
    fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Membership>>> + Send;
    fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = WorkboardResult<PaginatedResult<Membership>>> + Send;
}
