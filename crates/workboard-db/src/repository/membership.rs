//! SurrealDB implementation of [`MembershipRepository`] and the
//! [`MembershipResolver`] capability.
//!
//! The membership table is consulted by both access paths (query
//! scoping and channel authorization), so the resolver is a plain row
//! check with no caching and no side effects.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use workboard_core::error::{WorkboardError, WorkboardResult};
use workboard_core::models::membership::Membership;
use workboard_core::repository::{
    MembershipRepository, MembershipResolver, PaginatedResult, Pagination,
};

use crate::error::DbError;

/// DB-side membership row.
#[derive(Debug, SurrealValue)]
struct MembershipRow {
    workspace_id: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl MembershipRow {
    fn try_into_membership(self) -> Result<Membership, DbError> {
        let workspace_id = Uuid::parse_str(&self.workspace_id)
            .map_err(|e| DbError::Query(format!("invalid workspace UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        Ok(Membership {
            workspace_id,
            user_id,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Membership repository.
#[derive(Clone)]
pub struct SurrealMembershipRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMembershipRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        condition: &str,
        bind_key: &'static str,
        bind_value: String,
        pagination: Pagination,
    ) -> Result<(Vec<MembershipRow>, u64), DbError> {
        let mut count_result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM membership WHERE {condition} GROUP ALL"
            ))
            .bind((bind_key, bind_value.clone()))
            .await?;
        let count_rows: Vec<CountRow> = count_result.take(0)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "SELECT * FROM membership WHERE {condition} \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset"
            ))
            .bind((bind_key, bind_value))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await?;
        let rows: Vec<MembershipRow> = result.take(0)?;

        Ok((rows, total))
    }
}

impl<C: Connection> MembershipResolver for SurrealMembershipRepository<C> {
    async fn is_member(&self, user_id: Uuid, workspace_id: Uuid) -> WorkboardResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM membership \
                 WHERE workspace_id = $workspace_id AND user_id = $user_id \
                 GROUP ALL",
            )
            .bind(("workspace_id", workspace_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}

impl<C: Connection> MembershipRepository for SurrealMembershipRepository<C> {
    async fn add(&self, workspace_id: Uuid, user_id: Uuid) -> WorkboardResult<Membership> {
        if self.is_member(user_id, workspace_id).await? {
            return Err(WorkboardError::AlreadyExists {
                entity: "membership".into(),
            });
        }

        let result = self
            .db
            .query(
                "CREATE membership SET \
                 workspace_id = $workspace_id, user_id = $user_id",
            )
            .bind(("workspace_id", workspace_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "membership".into(),
            id: format!("workspace={workspace_id} user={user_id}"),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn remove(&self, workspace_id: Uuid, user_id: Uuid) -> WorkboardResult<()> {
        self.db
            .query(
                "DELETE membership \
                 WHERE workspace_id = $workspace_id AND user_id = $user_id",
            )
            .bind(("workspace_id", workspace_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_for_workspace(
        &self,
        workspace_id: Uuid,
        pagination: Pagination,
    ) -> WorkboardResult<PaginatedResult<Membership>> {
        let (rows, total) = self
            .page(
                "workspace_id = $workspace_id",
                "workspace_id",
                workspace_id.to_string(),
                pagination.clone(),
            )
            .await?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_membership())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> WorkboardResult<PaginatedResult<Membership>> {
        let (rows, total) = self
            .page(
                "user_id = $user_id",
                "user_id",
                user_id.to_string(),
                pagination.clone(),
            )
            .await?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_membership())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
