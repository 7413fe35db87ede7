//! Tenant scoping for data-access queries.
//!
//! [`TenantScope`] decides which rows of a tenant-owned table a query
//! may see, derived from the operation's [`TenantContext`] or built
//! through one of the explicit escape hatches. [`ScopedQuery`] is the
//! enforcement point: statements against tenant-owned tables can only
//! be built by supplying a scope, so omitting the filter is a missing
//! argument rather than a forgotten call.

use uuid::Uuid;

use crate::context::TenantContext;

/// Bind-parameter name used for the tenant filter.
pub const SCOPE_PARAM: &str = "scope_tenant";

/// Row visibility for one query against a tenant-owned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// No tenant constraint.
    Unscoped,
    /// Only rows whose `tenant_id` equals this tenant.
    Tenant(Uuid),
}

impl TenantScope {
    /// Derive the scope for a normal request from its context.
    ///
    /// In order: system operations skip the filter (kept on under the
    /// test profile so suites exercising maintenance paths stay
    /// isolated); anonymous operations skip it (public paths apply
    /// their own explicit filters); super admins see every tenant;
    /// otherwise the query is pinned to the context's tenant.
    ///
    /// An authenticated caller whose context has no tenant yet runs
    /// unscoped. The request pipeline resolves the tenant before any
    /// data access reaches this point; callers relying on isolation
    /// must uphold that ordering.
    pub fn from_context(ctx: &TenantContext) -> Self {
        if ctx.is_system() && !cfg!(test) {
            return Self::Unscoped;
        }
        let Some(caller) = ctx.caller() else {
            return Self::Unscoped;
        };
        if caller.super_admin {
            return Self::Unscoped;
        }
        match ctx.tenant_id() {
            Some(tenant_id) => Self::Tenant(tenant_id),
            None => Self::Unscoped,
        }
    }

    /// Escape hatch: drop the tenant filter for this one query.
    ///
    /// For trusted code paths only (cross-tenant admin views). Every
    /// call site is an explicit, auditable bypass.
    pub fn without_tenant() -> Self {
        Self::Unscoped
    }

    /// Escape hatch: pin this one query to an explicit tenant,
    /// overriding whatever the operation's context resolved. The query
    /// passes through the same filter mechanism as a naturally scoped
    /// one.
    pub fn with_tenant(tenant_id: Uuid) -> Self {
        Self::Tenant(tenant_id)
    }

    /// Escape hatch: run across all tenants. Alias of
    /// [`TenantScope::without_tenant`] for batch and reporting jobs.
    pub fn all_tenants() -> Self {
        Self::Unscoped
    }

    /// The tenant this scope filters to, if any.
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            Self::Unscoped => None,
            Self::Tenant(id) => Some(*id),
        }
    }
}

/// Condition set for a statement against a tenant-owned table.
///
/// The scope's condition renders first, then extra conditions in
/// insertion order. Values are referenced as bind parameters, never
/// interpolated into the statement text.
#[derive(Debug, Clone)]
pub struct ScopedQuery {
    table: &'static str,
    scope: TenantScope,
    conditions: Vec<String>,
}

impl ScopedQuery {
    pub fn new(table: &'static str, scope: TenantScope) -> Self {
        Self {
            table,
            scope,
            conditions: Vec::new(),
        }
    }

    /// Replace the scope. Re-applying a scope leaves the rendered
    /// statement unchanged; a query is scoped exactly once no matter
    /// how many times the filter runs over it.
    pub fn apply_scope(&mut self, scope: TenantScope) {
        self.scope = scope;
    }

    /// Add a condition, e.g. `workspace_id = $workspace_id`.
    pub fn and_where(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn scope(&self) -> TenantScope {
        self.scope
    }

    /// The bind value for [`SCOPE_PARAM`], present when the scope
    /// filters.
    pub fn scope_binding(&self) -> Option<String> {
        self.scope.tenant_id().map(|id| id.to_string())
    }

    /// Render the WHERE clause with a leading space, or an empty string
    /// when nothing constrains the query.
    pub fn where_clause(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.scope.tenant_id().is_some() {
            parts.push(format!("tenant_id = ${SCOPE_PARAM}"));
        }
        parts.extend(self.conditions.iter().cloned());
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }

    /// Render a full SELECT statement. `suffix` carries ordering and
    /// pagination (e.g. `" ORDER BY created_at ASC LIMIT $limit"`).
    pub fn select_statement(&self, projection: &str, suffix: &str) -> String {
        format!(
            "SELECT {projection} FROM {}{}{suffix}",
            self.table,
            self.where_clause(),
        )
    }

    /// Render the matching count statement for pagination totals, so
    /// the total always honors the same filter as the page itself.
    pub fn count_statement(&self) -> String {
        format!(
            "SELECT count() AS total FROM {}{} GROUP ALL",
            self.table,
            self.where_clause(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Caller;

    #[test]
    fn anonymous_context_is_unscoped() {
        let ctx = TenantContext::anonymous();
        assert_eq!(TenantScope::from_context(&ctx), TenantScope::Unscoped);
    }

    #[test]
    fn super_admin_is_unscoped_even_with_tenant() {
        let tenant = Uuid::new_v4();
        let ctx = TenantContext::new(Some(tenant), Some(Caller::super_admin(Uuid::new_v4())));
        assert_eq!(TenantScope::from_context(&ctx), TenantScope::Unscoped);
    }

    #[test]
    fn regular_caller_is_pinned_to_context_tenant() {
        let tenant = Uuid::new_v4();
        let ctx = TenantContext::new(Some(tenant), Some(Caller::user(Uuid::new_v4())));
        assert_eq!(
            TenantScope::from_context(&ctx),
            TenantScope::Tenant(tenant)
        );
    }

    #[test]
    fn unresolved_tenant_passes_through_unscoped() {
        // Authenticated caller, tenant not yet resolved: no filter is
        // added. The pipeline resolves the tenant before data access.
        let ctx = TenantContext::new(None, Some(Caller::user(Uuid::new_v4())));
        assert_eq!(TenantScope::from_context(&ctx), TenantScope::Unscoped);
    }

    #[test]
    fn system_bypass_is_inert_under_test_profile() {
        // Under cfg(test) the system bypass does not short-circuit, so
        // a system-flagged context with a caller and tenant still
        // resolves to a pinned scope.
        let tenant = Uuid::new_v4();
        let ctx =
            TenantContext::new(Some(tenant), Some(Caller::user(Uuid::new_v4()))).into_system();
        assert_eq!(
            TenantScope::from_context(&ctx),
            TenantScope::Tenant(tenant)
        );
    }

    #[test]
    fn escape_hatches() {
        let tenant = Uuid::new_v4();
        assert_eq!(TenantScope::without_tenant(), TenantScope::Unscoped);
        assert_eq!(TenantScope::all_tenants(), TenantScope::Unscoped);
        assert_eq!(
            TenantScope::with_tenant(tenant),
            TenantScope::Tenant(tenant)
        );
        assert_eq!(TenantScope::with_tenant(tenant).tenant_id(), Some(tenant));
    }

    #[test]
    fn scoped_query_renders_tenant_condition_first() {
        let tenant = Uuid::new_v4();
        let query = ScopedQuery::new("board", TenantScope::with_tenant(tenant))
            .and_where("workspace_id = $workspace_id");
        assert_eq!(
            query.select_statement("*", ""),
            "SELECT * FROM board WHERE tenant_id = $scope_tenant \
             AND workspace_id = $workspace_id"
        );
        assert_eq!(query.scope_binding(), Some(tenant.to_string()));
    }

    #[test]
    fn unscoped_query_renders_no_tenant_condition() {
        let query = ScopedQuery::new("workspace", TenantScope::all_tenants());
        assert_eq!(query.select_statement("*", ""), "SELECT * FROM workspace");
        assert_eq!(query.scope_binding(), None);

        let query = query.and_where("slug = $slug");
        assert_eq!(
            query.select_statement("*", ""),
            "SELECT * FROM workspace WHERE slug = $slug"
        );
    }

    #[test]
    fn applying_the_same_scope_twice_is_idempotent() {
        let tenant = Uuid::new_v4();
        let scope = TenantScope::with_tenant(tenant);
        let mut query = ScopedQuery::new("board", scope);
        let once = query.select_statement("*", "");
        query.apply_scope(scope);
        query.apply_scope(scope);
        assert_eq!(query.select_statement("*", ""), once);
    }

    #[test]
    fn count_statement_honors_the_same_filter() {
        let tenant = Uuid::new_v4();
        let query = ScopedQuery::new("workspace", TenantScope::with_tenant(tenant));
        assert_eq!(
            query.count_statement(),
            "SELECT count() AS total FROM workspace \
             WHERE tenant_id = $scope_tenant GROUP ALL"
        );
    }
}
