//! SurrealDB implementation of [`WorkspaceRepository`].
//!
//! Workspaces are tenant-owned: every read builds its statement through
//! [`ScopedQuery`], so the tenant filter is part of the statement
//! before it reaches the database.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use workboard_core::error::WorkboardResult;
use workboard_core::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};
use workboard_core::repository::{PaginatedResult, Pagination, WorkspaceRepository};
use workboard_core::scope::{SCOPE_PARAM, ScopedQuery, TenantScope};

use crate::error::DbError;
use crate::repository::trace_scope;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WorkspaceRow {
    tenant_id: String,
    name: String,
    slug: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkspaceRow {
    fn into_workspace(self, id: Uuid) -> Result<Workspace, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Query(format!("invalid tenant UUID: {e}")))?;
        Ok(Workspace {
            id,
            tenant_id,
            name: self.name,
            slug: self.slug,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct WorkspaceRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    slug: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkspaceRowWithId {
    fn try_into_workspace(self) -> Result<Workspace, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Query(format!("invalid tenant UUID: {e}")))?;
        Ok(Workspace {
            id,
            tenant_id,
            name: self.name,
            slug: self.slug,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Workspace repository.
#[derive(Clone)]
pub struct SurrealWorkspaceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWorkspaceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> WorkspaceRepository for SurrealWorkspaceRepository<C> {
    async fn create(&self, input: CreateWorkspace) -> WorkboardResult<Workspace> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('workspace', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, slug = $slug, metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<WorkspaceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "workspace".into(),
            id: id_str,
        })?;

        Ok(row.into_workspace(id)?)
    }

    async fn get_by_id(&self, scope: TenantScope, id: Uuid) -> WorkboardResult<Workspace> {
        trace_scope("workspace", scope);
        let id_str = id.to_string();
        let query = ScopedQuery::new("workspace", scope);

        let statement = format!(
            "SELECT * FROM type::record('workspace', $id){}",
            query.where_clause()
        );

        let mut builder = self.db.query(&statement).bind(("id", id_str.clone()));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<WorkspaceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "workspace".into(),
            id: id_str,
        })?;

        Ok(row.into_workspace(id)?)
    }

    async fn get_by_slug(&self, scope: TenantScope, slug: &str) -> WorkboardResult<Workspace> {
        trace_scope("workspace", scope);
        let query = ScopedQuery::new("workspace", scope).and_where("slug = $slug");

        let statement = query.select_statement("meta::id(id) AS record_id, *", "");

        let mut builder = self.db.query(&statement).bind(("slug", slug.to_string()));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<WorkspaceRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "workspace".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_workspace()?)
    }

    async fn update(
        &self,
        scope: TenantScope,
        id: Uuid,
        input: UpdateWorkspace,
    ) -> WorkboardResult<Workspace> {
        trace_scope("workspace", scope);
        let id_str = id.to_string();
        let query = ScopedQuery::new("workspace", scope);

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let statement = format!(
            "UPDATE type::record('workspace', $id) SET {}{}",
            sets.join(", "),
            query.where_clause(),
        );

        let mut builder = self.db.query(&statement).bind(("id", id_str.clone()));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<WorkspaceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "workspace".into(),
            id: id_str,
        })?;

        Ok(row.into_workspace(id)?)
    }

    async fn delete(&self, scope: TenantScope, id: Uuid) -> WorkboardResult<()> {
        trace_scope("workspace", scope);
        let query = ScopedQuery::new("workspace", scope);

        let statement = format!(
            "DELETE type::record('workspace', $id){}",
            query.where_clause()
        );

        let mut builder = self.db.query(&statement).bind(("id", id.to_string()));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        builder.await.map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        scope: TenantScope,
        pagination: Pagination,
    ) -> WorkboardResult<PaginatedResult<Workspace>> {
        trace_scope("workspace", scope);
        let query = ScopedQuery::new("workspace", scope);

        let mut count_builder = self.db.query(query.count_statement());
        if let Some(tenant) = query.scope_binding() {
            count_builder = count_builder.bind((SCOPE_PARAM, tenant));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let statement = query.select_statement(
            "meta::id(id) AS record_id, *",
            " ORDER BY created_at ASC LIMIT $limit START $offset",
        );

        let mut builder = self
            .db
            .query(&statement)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<WorkspaceRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_workspace())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
