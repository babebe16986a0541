//! Integration tests for the membership ledger
//!
//! Each test runs against a fresh in-memory SQLite database with the full
//! migrations applied.

mod common;

use common::{create_test_crew, create_test_user, test_state};
use entity::{
    crew_members::{Column as MemberColumn, Entity as CrewMembers},
    crews::Entity as Crews,
    sea_orm_active_enums::{MembershipRole, MembershipStatus},
};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter};
use service::{membership::MembershipLedger, Principal};
use uuid::Uuid;

/// Cached member_count of a crew, read back from the row
async fn cached_member_count(db: &DbConn, crew_id: Uuid) -> i32 {
    Crews::find_by_id(crew_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .member_count
}

/// Count of ACCEPTED membership rows for a crew
async fn accepted_count(db: &DbConn, crew_id: Uuid) -> u64 {
    CrewMembers::find()
        .filter(MemberColumn::CrewId.eq(crew_id))
        .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_first_join_becomes_creator() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    let membership = ledger
        .join(&Principal::user(user.id), crew.id)
        .await
        .unwrap();

    assert_eq!(membership.role, MembershipRole::Creator);
    assert_eq!(membership.status, MembershipStatus::Accepted);
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);
}

#[tokio::test]
async fn test_full_membership_lifecycle() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let a = create_test_user(&state.db, "a").await;
    let b = create_test_user(&state.db, "b").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    // A joins directly and becomes CREATOR
    let membership_a = ledger.join(&Principal::user(a.id), crew.id).await.unwrap();
    assert_eq!(membership_a.role, MembershipRole::Creator);
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);

    // B files a join request; member_count unchanged
    let membership_b = ledger
        .request_join(&Principal::user(b.id), crew.id)
        .await
        .unwrap();
    assert_eq!(membership_b.status, MembershipStatus::Pending);
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);

    // A accepts B, who becomes a PARTICIPANT
    let membership_b = ledger
        .accept(&Principal::user(a.id), crew.id, b.id)
        .await
        .unwrap();
    assert_eq!(membership_b.status, MembershipStatus::Accepted);
    assert_eq!(membership_b.role, MembershipRole::Participant);
    assert_eq!(cached_member_count(&state.db, crew.id).await, 2);

    // B leaves
    ledger.leave(&Principal::user(b.id), crew.id).await.unwrap();
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);
    assert!(ledger.get(b.id, crew.id).await.is_err());
}

#[tokio::test]
async fn test_join_conflict_when_already_member() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .join(&Principal::user(user.id), crew.id)
        .await
        .unwrap();
    let err = ledger
        .join(&Principal::user(user.id), crew.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_join_forbidden_after_rejection() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let creator = create_test_user(&state.db, "creator").await;
    let applicant = create_test_user(&state.db, "applicant").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .join(&Principal::user(creator.id), crew.id)
        .await
        .unwrap();
    ledger
        .request_join(&Principal::user(applicant.id), crew.id)
        .await
        .unwrap();
    ledger
        .reject(&Principal::user(creator.id), crew.id, applicant.id)
        .await
        .unwrap();

    // No self-service re-join after rejection
    let err = ledger
        .join(&Principal::user(applicant.id), crew.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    // Rejection never touched the ACCEPTED set
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);
}

#[tokio::test]
async fn test_request_join_conflict_on_existing_membership() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .request_join(&Principal::user(user.id), crew.id)
        .await
        .unwrap();

    // A second request conflicts regardless of status
    let err = ledger
        .request_join(&Principal::user(user.id), crew.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_provisional_creator_role_is_recomputed_at_acceptance() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let early_applicant = create_test_user(&state.db, "early").await;
    let direct_joiner = create_test_user(&state.db, "direct").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    // First request on an empty crew carries a provisional CREATOR role
    let request = ledger
        .request_join(&Principal::user(early_applicant.id), crew.id)
        .await
        .unwrap();
    assert_eq!(request.role, MembershipRole::Creator);
    assert_eq!(request.status, MembershipStatus::Pending);

    // Someone else joins directly and is the first ACCEPTED member
    let joined = ledger
        .join(&Principal::user(direct_joiner.id), crew.id)
        .await
        .unwrap();
    assert_eq!(joined.role, MembershipRole::Creator);

    // The pending request is accepted afterwards; the provisional role
    // does not stick
    let accepted = ledger
        .accept(&Principal::user(direct_joiner.id), crew.id, early_applicant.id)
        .await
        .unwrap();
    assert_eq!(accepted.role, MembershipRole::Participant);
}

#[tokio::test]
async fn test_reject_requires_creator() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let creator = create_test_user(&state.db, "creator").await;
    let participant = create_test_user(&state.db, "participant").await;
    let applicant = create_test_user(&state.db, "applicant").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .join(&Principal::user(creator.id), crew.id)
        .await
        .unwrap();
    ledger
        .join(&Principal::user(participant.id), crew.id)
        .await
        .unwrap();
    ledger
        .request_join(&Principal::user(applicant.id), crew.id)
        .await
        .unwrap();

    let err = ledger
        .reject(&Principal::user(participant.id), crew.id, applicant.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = ledger
        .accept(&Principal::user(applicant.id), crew.id, applicant.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_reject_non_pending_is_invalid_state() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let creator = create_test_user(&state.db, "creator").await;
    let member = create_test_user(&state.db, "member").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .join(&Principal::user(creator.id), crew.id)
        .await
        .unwrap();
    ledger
        .join(&Principal::user(member.id), crew.id)
        .await
        .unwrap();

    let err = ledger
        .reject(&Principal::user(creator.id), crew.id, member.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_STATE");
}

#[tokio::test]
async fn test_reject_missing_membership_is_not_found() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let creator = create_test_user(&state.db, "creator").await;
    let stranger = create_test_user(&state.db, "stranger").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger
        .join(&Principal::user(creator.id), crew.id)
        .await
        .unwrap();

    let err = ledger
        .reject(&Principal::user(creator.id), crew.id, stranger.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_leave_non_member_is_not_found() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    let err = ledger
        .leave(&Principal::user(user.id), crew.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_join_unknown_crew_is_not_found() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;

    let err = ledger
        .join(&Principal::user(user.id), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_anonymous_cannot_join() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let crew = create_test_crew(&state.db, "alpha").await;

    let err = ledger
        .join(&Principal::anonymous(), crew.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_member_count_matches_accepted_rows_after_every_mutation() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let a = create_test_user(&state.db, "a").await;
    let b = create_test_user(&state.db, "b").await;
    let c = create_test_user(&state.db, "c").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger.join(&Principal::user(a.id), crew.id).await.unwrap();
    assert_eq!(
        cached_member_count(&state.db, crew.id).await as u64,
        accepted_count(&state.db, crew.id).await
    );

    ledger
        .request_join(&Principal::user(b.id), crew.id)
        .await
        .unwrap();
    ledger
        .request_join(&Principal::user(c.id), crew.id)
        .await
        .unwrap();
    assert_eq!(
        cached_member_count(&state.db, crew.id).await as u64,
        accepted_count(&state.db, crew.id).await
    );

    ledger
        .accept(&Principal::user(a.id), crew.id, b.id)
        .await
        .unwrap();
    ledger
        .reject(&Principal::user(a.id), crew.id, c.id)
        .await
        .unwrap();
    assert_eq!(
        cached_member_count(&state.db, crew.id).await as u64,
        accepted_count(&state.db, crew.id).await
    );

    ledger.leave(&Principal::user(a.id), crew.id).await.unwrap();
    assert_eq!(
        cached_member_count(&state.db, crew.id).await as u64,
        accepted_count(&state.db, crew.id).await
    );
    assert_eq!(cached_member_count(&state.db, crew.id).await, 1);
}

#[tokio::test]
async fn test_exactly_one_creator_under_concurrent_joins() {
    let state = test_state().await;
    let crew = create_test_crew(&state.db, "alpha").await;

    let mut users = Vec::new();
    for i in 0..4 {
        users.push(create_test_user(&state.db, &format!("racer{i}")).await);
    }

    let mut handles = Vec::new();
    for user in &users {
        let ledger = MembershipLedger::new(state.clone());
        let principal = Principal::user(user.id);
        let crew_id = crew.id;
        handles.push(tokio::spawn(async move {
            ledger.join(&principal, crew_id).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let creators = CrewMembers::find()
        .filter(MemberColumn::CrewId.eq(crew.id))
        .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
        .filter(MemberColumn::Role.eq(MembershipRole::Creator))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(creators, 1);
    assert_eq!(accepted_count(&state.db, crew.id).await, 4);
    assert_eq!(cached_member_count(&state.db, crew.id).await, 4);
}

#[tokio::test]
async fn test_list_members_returns_accepted_in_join_order() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let a = create_test_user(&state.db, "a").await;
    let b = create_test_user(&state.db, "b").await;
    let pending = create_test_user(&state.db, "pending").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    ledger.join(&Principal::user(a.id), crew.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ledger.join(&Principal::user(b.id), crew.id).await.unwrap();
    ledger
        .request_join(&Principal::user(pending.id), crew.id)
        .await
        .unwrap();

    let members = ledger.list_members(crew.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, a.id);
    assert_eq!(members[0].role, MembershipRole::Creator);
    assert_eq!(members[1].user_id, b.id);
}

#[tokio::test]
async fn test_my_crews_lists_accepted_memberships_only() {
    let state = test_state().await;
    let ledger = MembershipLedger::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let joined = create_test_crew(&state.db, "joined").await;
    let requested = create_test_crew(&state.db, "requested").await;
    let _other = create_test_crew(&state.db, "other").await;

    ledger
        .join(&Principal::user(user.id), joined.id)
        .await
        .unwrap();
    ledger
        .request_join(&Principal::user(user.id), requested.id)
        .await
        .unwrap();

    let crews = ledger.my_crews(&Principal::user(user.id)).await.unwrap();
    assert_eq!(crews.len(), 1);
    assert_eq!(crews[0].id, joined.id);
}
