//! SurrealDB implementation of [`BoardRepository`].
//!
//! Boards are tenant-owned through their workspace; the `tenant_id`
//! column is denormalized at creation time so the scope filter applies
//! to board statements directly. Creation resolves the owning workspace
//! under the caller's scope, so a board can only land in a workspace
//! the caller can see.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use workboard_core::error::WorkboardResult;
use workboard_core::models::board::{Board, CreateBoard, UpdateBoard};
use workboard_core::repository::{BoardRepository, PaginatedResult, Pagination};
use workboard_core::scope::{SCOPE_PARAM, ScopedQuery, TenantScope};

use crate::error::DbError;
use crate::repository::trace_scope;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct BoardRow {
    tenant_id: String,
    workspace_id: String,
    name: String,
    position: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoardRow {
    fn into_board(self, id: Uuid) -> Result<Board, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Query(format!("invalid tenant UUID: {e}")))?;
        let workspace_id = Uuid::parse_str(&self.workspace_id)
            .map_err(|e| DbError::Query(format!("invalid workspace UUID: {e}")))?;
        Ok(Board {
            id,
            tenant_id,
            workspace_id,
            name: self.name,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct BoardRowWithId {
    record_id: String,
    tenant_id: String,
    workspace_id: String,
    name: String,
    position: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoardRowWithId {
    fn try_into_board(self) -> Result<Board, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Query(format!("invalid tenant UUID: {e}")))?;
        let workspace_id = Uuid::parse_str(&self.workspace_id)
            .map_err(|e| DbError::Query(format!("invalid workspace UUID: {e}")))?;
        Ok(Board {
            id,
            tenant_id,
            workspace_id,
            name: self.name,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for resolving a workspace's tenant during board creation.
#[derive(Debug, SurrealValue)]
struct WorkspaceTenantRow {
    tenant_id: String,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Board repository.
#[derive(Clone)]
pub struct SurrealBoardRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBoardRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        query: ScopedQuery,
        pagination: Pagination,
    ) -> Result<(Vec<BoardRowWithId>, u64), DbError> {
        let mut count_builder = self.db.query(query.count_statement());
        if let Some(tenant) = query.scope_binding() {
            count_builder = count_builder.bind((SCOPE_PARAM, tenant));
        }
        let mut count_result = count_builder.await?;
        let count_rows: Vec<CountRow> = count_result.take(0)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let statement = query.select_statement(
            "meta::id(id) AS record_id, *",
            " ORDER BY position ASC, created_at ASC LIMIT $limit START $offset",
        );

        let mut builder = self
            .db
            .query(&statement)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await?;
        let rows: Vec<BoardRowWithId> = result.take(0)?;

        Ok((rows, total))
    }
}

impl<C: Connection> BoardRepository for SurrealBoardRepository<C> {
    async fn create(&self, scope: TenantScope, input: CreateBoard) -> WorkboardResult<Board> {
        trace_scope("board", scope);
        let workspace_id_str = input.workspace_id.to_string();

        // Resolve the owning workspace under the caller's scope; the
        // board inherits its tenant from the workspace it lands in.
        let ws_query = ScopedQuery::new("workspace", scope);
        let statement = format!(
            "SELECT tenant_id FROM type::record('workspace', $workspace_id){}",
            ws_query.where_clause()
        );

        let mut builder = self
            .db
            .query(&statement)
            .bind(("workspace_id", workspace_id_str.clone()));
        if let Some(tenant) = ws_query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let ws_rows: Vec<WorkspaceTenantRow> = result.take(0).map_err(DbError::from)?;
        let workspace = ws_rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "workspace".into(),
            id: workspace_id_str.clone(),
        })?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('board', $id) SET \
                 tenant_id = $tenant_id, \
                 workspace_id = $workspace_id, \
                 name = $name, position = $position",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", workspace.tenant_id))
            .bind(("workspace_id", workspace_id_str))
            .bind(("name", input.name))
            .bind(("position", input.position))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<BoardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "board".into(),
            id: id_str,
        })?;

        Ok(row.into_board(id)?)
    }

    async fn get_by_id(&self, scope: TenantScope, id: Uuid) -> WorkboardResult<Board> {
        trace_scope("board", scope);
        let id_str = id.to_string();
        let query = ScopedQuery::new("board", scope);

        let statement = format!(
            "SELECT * FROM type::record('board', $id){}",
            query.where_clause()
        );

        let mut builder = self.db.query(&statement).bind(("id", id_str.clone()));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<BoardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "board".into(),
            id: id_str,
        })?;

        Ok(row.into_board(id)?)
    }

    async fn update(
        &self,
        scope: TenantScope,
        id: Uuid,
        input: UpdateBoard,
    ) -> WorkboardResult<Board> {
        trace_scope("board", scope);
        let id_str = id.to_string();
        let query = ScopedQuery::new("board", scope);

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.position.is_some() {
            sets.push("position = $position");
        }
        sets.push("updated_at = time::now()");

        let statement = format!(
            "UPDATE type::record('board', $id) SET {}{}",
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
        if let Some(position) = input.position {
            builder = builder.bind(("position", position));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<BoardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "board".into(),
            id: id_str,
        })?;

        Ok(row.into_board(id)?)
    }

    async fn delete(&self, scope: TenantScope, id: Uuid) -> WorkboardResult<()> {
        trace_scope("board", scope);
        let query = ScopedQuery::new("board", scope);

        let statement = format!("DELETE type::record('board', $id){}", query.where_clause());

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
    ) -> WorkboardResult<PaginatedResult<Board>> {
        trace_scope("board", scope);
        let query = ScopedQuery::new("board", scope);

        let (rows, total) = self.page(query, pagination.clone()).await?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_board())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_workspace(
        &self,
        scope: TenantScope,
        workspace_id: Uuid,
        pagination: Pagination,
    ) -> WorkboardResult<PaginatedResult<Board>> {
        trace_scope("board", scope);
        let query =
            ScopedQuery::new("board", scope).and_where("workspace_id = $workspace_id");

        let mut count_builder = self
            .db
            .query(query.count_statement())
            .bind(("workspace_id", workspace_id.to_string()));
        if let Some(tenant) = query.scope_binding() {
            count_builder = count_builder.bind((SCOPE_PARAM, tenant));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let statement = query.select_statement(
            "meta::id(id) AS record_id, *",
            " ORDER BY position ASC, created_at ASC LIMIT $limit START $offset",
        );

        let mut builder = self
            .db
            .query(&statement)
            .bind(("workspace_id", workspace_id.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(tenant) = query.scope_binding() {
            builder = builder.bind((SCOPE_PARAM, tenant));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<BoardRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_board())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
