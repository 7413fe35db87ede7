//! Integration tests for channel-join authorization over the real
//! repository implementations on in-memory SurrealDB.

use serde_json::Value;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use workboard_core::models::board::CreateBoard;
use workboard_core::models::tenant::CreateTenant;
use workboard_core::models::user::CreateUser;
use workboard_core::models::workspace::CreateWorkspace;
use workboard_core::repository::{
    BoardRepository, MembershipRepository, TenantRepository, UserRepository, WorkspaceRepository,
};
use workboard_core::scope::TenantScope;
use workboard_db::repository::{
    SurrealBoardRepository, SurrealMembershipRepository, SurrealTenantRepository,
    SurrealUserRepository, SurrealWorkspaceRepository,
};
use workboard_realtime::{Channel, ChannelAuthorizer, ChannelGrant};

type Db = surrealdb::engine::local::Db;

type Authorizer = ChannelAuthorizer<
    SurrealBoardRepository<Db>,
    SurrealUserRepository<Db>,
    SurrealMembershipRepository<Db>,
>;

struct Fixture {
    authorizer: Authorizer,
    workspace_1: Uuid,
    workspace_2: Uuid,
    board_1: Uuid,
    board_2: Uuid,
    user_1: Uuid,
    user_3: Uuid,
}

/// Tenant A owns workspace W1 (members: U1, U2) with board B1.
/// Tenant B owns workspace W2 (members: U3) with board B2.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    workboard_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let workspaces = SurrealWorkspaceRepository::new(db.clone());
    let boards = SurrealBoardRepository::new(db.clone());
    let users = SurrealUserRepository::new(db.clone());
    let memberships = SurrealMembershipRepository::new(db.clone());

    let tenant_a = tenants
        .create(CreateTenant {
            name: "Tenant A".into(),
            slug: "tenant-a".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let tenant_b = tenants
        .create(CreateTenant {
            name: "Tenant B".into(),
            slug: "tenant-b".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let workspace_1 = workspaces
        .create(CreateWorkspace {
            tenant_id: tenant_a.id,
            name: "W1".into(),
            slug: "w1".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let workspace_2 = workspaces
        .create(CreateWorkspace {
            tenant_id: tenant_b.id,
            name: "W2".into(),
            slug: "w2".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let board_1 = boards
        .create(
            TenantScope::with_tenant(tenant_a.id),
            CreateBoard {
                workspace_id: workspace_1.id,
                name: "B1".into(),
                position: 0,
            },
        )
        .await
        .unwrap();
    let board_2 = boards
        .create(
            TenantScope::with_tenant(tenant_b.id),
            CreateBoard {
                workspace_id: workspace_2.id,
                name: "B2".into(),
                position: 0,
            },
        )
        .await
        .unwrap();

    let user_1 = users
        .create(CreateUser {
            display_name: "Uma One".into(),
            email: "u1@example.com".into(),
            avatar_url: Some("https://cdn.example.com/u1.png".into()),
        })
        .await
        .unwrap();
    let user_2 = users
        .create(CreateUser {
            display_name: "Ula Two".into(),
            email: "u2@example.com".into(),
            avatar_url: None,
        })
        .await
        .unwrap();
    let user_3 = users
        .create(CreateUser {
            display_name: "Uri Three".into(),
            email: "u3@example.com".into(),
            avatar_url: None,
        })
        .await
        .unwrap();

    memberships.add(workspace_1.id, user_1.id).await.unwrap();
    memberships.add(workspace_1.id, user_2.id).await.unwrap();
    memberships.add(workspace_2.id, user_3.id).await.unwrap();

    Fixture {
        authorizer: ChannelAuthorizer::new(boards, users, memberships),
        workspace_1: workspace_1.id,
        workspace_2: workspace_2.id,
        board_1: board_1.id,
        board_2: board_2.id,
        user_1: user_1.id,
        user_3: user_3.id,
    }
}

#[tokio::test]
async fn workspace_channel_granted_iff_member() {
    let fx = setup().await;

    let member = fx
        .authorizer
        .join_workspace(fx.user_1, fx.workspace_1)
        .await
        .unwrap();
    assert_eq!(member, ChannelGrant::Granted);

    let outsider = fx
        .authorizer
        .join_workspace(fx.user_3, fx.workspace_1)
        .await
        .unwrap();
    assert_eq!(outsider, ChannelGrant::Denied);
}

#[tokio::test]
async fn board_channel_follows_owning_workspace_membership() {
    let fx = setup().await;

    let member = fx
        .authorizer
        .join_board(fx.user_1, fx.board_1)
        .await
        .unwrap();
    assert_eq!(member, ChannelGrant::Granted);

    // U1 belongs to tenant A's workspace; tenant B's board denies.
    let cross_tenant = fx
        .authorizer
        .authorize(fx.user_1, Channel::Board(fx.board_2))
        .await
        .unwrap();
    assert_eq!(cross_tenant, ChannelGrant::Denied);

    let outsider = fx
        .authorizer
        .authorize(fx.user_3, Channel::Board(fx.board_1))
        .await
        .unwrap();
    assert_eq!(outsider, ChannelGrant::Denied);
}

#[tokio::test]
async fn presence_join_publishes_roster_identity() {
    let fx = setup().await;

    let grant = fx
        .authorizer
        .join_board_presence(fx.user_1, fx.board_1)
        .await
        .unwrap();

    let payload = match grant {
        ChannelGrant::GrantedWithIdentity(payload) => payload,
        other => panic!("expected identity grant, got {other:?}"),
    };
    assert_eq!(payload.id, fx.user_1);
    assert_eq!(payload.display_name, "Uma One");
    assert_eq!(payload.email, "u1@example.com");
    assert_eq!(
        payload.avatar_url.as_deref(),
        Some("https://cdn.example.com/u1.png")
    );
}

#[tokio::test]
async fn presence_payload_carries_exactly_the_roster_fields() {
    let fx = setup().await;

    let grant = fx
        .authorizer
        .authorize(fx.user_1, Channel::BoardPresence(fx.board_1))
        .await
        .unwrap();
    let ChannelGrant::GrantedWithIdentity(payload) = grant else {
        panic!("expected identity grant");
    };

    let Value::Object(map) = serde_json::to_value(&payload).unwrap() else {
        panic!("payload must serialize to an object");
    };
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["avatar_url", "display_name", "email", "id"]);
}

#[tokio::test]
async fn presence_denial_carries_no_payload() {
    let fx = setup().await;

    let denied = fx
        .authorizer
        .authorize(fx.user_3, Channel::BoardPresence(fx.board_1))
        .await
        .unwrap();
    assert_eq!(denied, ChannelGrant::Denied);
    assert!(!denied.is_granted());
}

#[tokio::test]
async fn missing_target_denies_exactly_like_non_membership() {
    let fx = setup().await;

    let missing_board = fx
        .authorizer
        .authorize(fx.user_1, Channel::Board(Uuid::new_v4()))
        .await
        .unwrap();
    let missing_presence = fx
        .authorizer
        .authorize(fx.user_1, Channel::BoardPresence(Uuid::new_v4()))
        .await
        .unwrap();
    let missing_workspace = fx
        .authorizer
        .authorize(fx.user_1, Channel::Workspace(Uuid::new_v4()))
        .await
        .unwrap();
    let non_member = fx
        .authorizer
        .authorize(fx.user_3, Channel::Board(fx.board_1))
        .await
        .unwrap();

    // All four rejections are the same opaque value; nothing leaks
    // whether the target exists.
    assert_eq!(missing_board, non_member);
    assert_eq!(missing_presence, non_member);
    assert_eq!(missing_workspace, non_member);
    assert_eq!(non_member, ChannelGrant::Denied);
}

#[tokio::test]
async fn unknown_caller_is_denied() {
    let fx = setup().await;

    let stranger = Uuid::new_v4();
    for channel in [
        Channel::Workspace(fx.workspace_2),
        Channel::Board(fx.board_2),
        Channel::BoardPresence(fx.board_2),
    ] {
        let grant = fx.authorizer.authorize(stranger, channel).await.unwrap();
        assert_eq!(grant, ChannelGrant::Denied, "channel {channel}");
    }
}

#[tokio::test]
async fn wire_names_route_to_the_same_decisions() {
    let fx = setup().await;

    // The transport hands us raw channel names; parsing and
    // authorizing composes end to end.
    let channel = Channel::parse(&format!("presence-board.{}", fx.board_1)).unwrap();
    let grant = fx.authorizer.authorize(fx.user_1, channel).await.unwrap();
    assert!(grant.is_granted());

    let channel = Channel::parse(&format!("workspace.{}", fx.workspace_1)).unwrap();
    let grant = fx.authorizer.authorize(fx.user_3, channel).await.unwrap();
    assert_eq!(grant, ChannelGrant::Denied);
}
