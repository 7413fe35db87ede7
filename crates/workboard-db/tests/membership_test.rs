//! Integration tests for the membership repository and resolver.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use workboard_core::error::WorkboardError;
use workboard_core::models::tenant::CreateTenant;
use workboard_core::models::user::CreateUser;
use workboard_core::models::workspace::CreateWorkspace;
use workboard_core::repository::{
    MembershipRepository, MembershipResolver, Pagination, TenantRepository, UserRepository,
    WorkspaceRepository,
};
use workboard_db::repository::{
    SurrealMembershipRepository, SurrealTenantRepository, SurrealUserRepository,
    SurrealWorkspaceRepository,
};

/// Helper: in-memory DB with one tenant, one workspace, one user.
async fn setup() -> (
    SurrealMembershipRepository<surrealdb::engine::local::Db>,
    Uuid, // workspace_id
    Uuid, // user_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    workboard_db::run_migrations(&db).await.unwrap();

    let tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "ACME".into(),
            slug: "acme".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let workspace = SurrealWorkspaceRepository::new(db.clone())
        .create(CreateWorkspace {
            tenant_id: tenant.id,
            name: "Engineering".into(),
            slug: "engineering".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            display_name: "Alice".into(),
            email: "alice@example.com".into(),
            avatar_url: None,
        })
        .await
        .unwrap();

    (
        SurrealMembershipRepository::new(db),
        workspace.id,
        user.id,
    )
}

#[tokio::test]
async fn membership_round_trip() {
    let (memberships, workspace_id, user_id) = setup().await;

    assert!(!memberships.is_member(user_id, workspace_id).await.unwrap());

    let membership = memberships.add(workspace_id, user_id).await.unwrap();
    assert_eq!(membership.workspace_id, workspace_id);
    assert_eq!(membership.user_id, user_id);

    assert!(memberships.is_member(user_id, workspace_id).await.unwrap());

    memberships.remove(workspace_id, user_id).await.unwrap();
    assert!(!memberships.is_member(user_id, workspace_id).await.unwrap());
}

#[tokio::test]
async fn duplicate_membership_is_rejected() {
    let (memberships, workspace_id, user_id) = setup().await;

    memberships.add(workspace_id, user_id).await.unwrap();
    let dup = memberships.add(workspace_id, user_id).await;
    assert!(matches!(dup, Err(WorkboardError::AlreadyExists { .. })));
}

#[tokio::test]
async fn membership_is_per_workspace() {
    let (memberships, workspace_id, user_id) = setup().await;

    memberships.add(workspace_id, user_id).await.unwrap();

    // Belonging to one workspace says nothing about another.
    let other_workspace = Uuid::new_v4();
    assert!(
        !memberships
            .is_member(user_id, other_workspace)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn list_memberships() {
    let (memberships, workspace_id, user_id) = setup().await;

    memberships.add(workspace_id, user_id).await.unwrap();
    memberships
        .add(Uuid::new_v4(), user_id)
        .await
        .unwrap();
    memberships
        .add(workspace_id, Uuid::new_v4())
        .await
        .unwrap();

    let for_workspace = memberships
        .list_for_workspace(workspace_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(for_workspace.total, 2);

    let for_user = memberships
        .list_for_user(user_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(for_user.total, 2);
}
