//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Every tenant-owned table (workspace,
//! board) carries a `tenant_id` column so the scope filter applies
//! per-table without joins.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD metadata ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;

-- =======================================================================
-- Workspaces (tenant scope)
-- =======================================================================
DEFINE TABLE workspace SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE workspace TYPE string;
DEFINE FIELD name ON TABLE workspace TYPE string;
DEFINE FIELD slug ON TABLE workspace TYPE string;
DEFINE FIELD metadata ON TABLE workspace TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE workspace TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE workspace TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_workspace_tenant_slug ON TABLE workspace \
    COLUMNS tenant_id, slug UNIQUE;
DEFINE INDEX idx_workspace_tenant ON TABLE workspace \
    COLUMNS tenant_id;

-- =======================================================================
-- Boards (tenant scope, owned by a workspace)
-- =======================================================================
DEFINE TABLE board SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE board TYPE string;
DEFINE FIELD workspace_id ON TABLE board TYPE string;
DEFINE FIELD name ON TABLE board TYPE string;
DEFINE FIELD position ON TABLE board TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE board TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE board TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_board_tenant ON TABLE board COLUMNS tenant_id;
DEFINE INDEX idx_board_workspace ON TABLE board COLUMNS workspace_id;

-- =======================================================================
-- Users (global scope)
-- =======================================================================
DEFINE TABLE app_user SCHEMAFULL;
DEFINE FIELD display_name ON TABLE app_user TYPE string;
DEFINE FIELD email ON TABLE app_user TYPE string;
DEFINE FIELD avatar_url ON TABLE app_user TYPE option<string>;
DEFINE FIELD created_at ON TABLE app_user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE app_user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_app_user_email ON TABLE app_user \
    COLUMNS email UNIQUE;

-- =======================================================================
-- Workspace memberships (single source of truth for access)
-- =======================================================================
DEFINE TABLE membership SCHEMAFULL;
DEFINE FIELD workspace_id ON TABLE membership TYPE string;
DEFINE FIELD user_id ON TABLE membership TYPE string;
DEFINE FIELD created_at ON TABLE membership TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_membership_workspace_user ON TABLE membership \
    COLUMNS workspace_id, user_id UNIQUE;
DEFINE INDEX idx_membership_user ON TABLE membership \
    COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn tenant_owned_tables_define_tenant_id() {
        // Workspace and board rows must carry the tenant directly;
        // the scope filter depends on it.
        for table in ["workspace", "board"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE FIELD tenant_id ON TABLE {table}")),
                "{table} must define tenant_id"
            );
        }
    }
}
