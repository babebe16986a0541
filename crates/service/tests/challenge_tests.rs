//! Integration tests for the challenge lifecycle

mod common;

use chrono::{Duration, Utc};
use common::{create_test_crew, create_test_user, test_state};
use entity::{
    challenges::Entity as Challenges,
    sea_orm_active_enums::{AchievementStatus, ChallengeStatus, OwnerType},
    user_challenge_statuses::{Column as AchievementColumn, Entity as UserChallengeStatuses},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use service::{
    challenges::ChallengeLifecycle,
    dto::challenges::{ChallengeListQuery, CreateChallengeRequest},
    membership::MembershipLedger,
    AppState,
    Principal,
};
use uuid::Uuid;

fn challenge_request(owner_type: OwnerType, crew_id: Option<Uuid>) -> CreateChallengeRequest {
    CreateChallengeRequest {
        challenge_name: "Read 12 books".to_string(),
        description: "One book a month for a year".to_string(),
        deadline: Utc::now() + Duration::days(365),
        owner_type,
        crew_id,
    }
}

async fn crew_with_member(state: &AppState, prefix: &str, member: &Principal) -> Uuid {
    let crew = create_test_crew(&state.db, prefix).await;
    MembershipLedger::new(state.clone())
        .join(member, crew.id)
        .await
        .unwrap();
    crew.id
}

#[tokio::test]
async fn test_create_challenge_generates_plan_and_kpi() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let principal = Principal::user(user.id);

    let challenge = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();

    assert_eq!(challenge.status, ChallengeStatus::Live);
    assert_eq!(challenge.user_id, Some(user.id));
    assert!(challenge.plan_id.is_some());
    assert!(challenge.kpi_description.contains("Read 12 books"));
    assert!(challenge.kpi_metrics.is_some());
}

#[tokio::test]
async fn test_create_crew_challenge_requires_membership() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let stranger = create_test_user(&state.db, "stranger").await;
    let crew = create_test_crew(&state.db, "alpha").await;

    let err = lifecycle
        .create_challenge(
            &Principal::user(stranger.id),
            challenge_request(OwnerType::Crew, Some(crew.id)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    // Nothing was created
    let total = Challenges::find().count(&state.db).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_create_challenge_rejects_common_ownership() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;

    let err = lifecycle
        .create_challenge(
            &Principal::user(user.id),
            challenge_request(OwnerType::Common, None),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_status_validates_input() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let principal = Principal::user(user.id);

    let challenge = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();

    let err = lifecycle
        .update_status(&principal, challenge.id, "INVALID")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let updated = lifecycle
        .update_status(&principal, challenge.id, "SUCCESS")
        .await
        .unwrap();
    assert_eq!(updated.status, ChallengeStatus::Success);
}

#[tokio::test]
async fn test_update_status_forbidden_for_non_members() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let member = create_test_user(&state.db, "member").await;
    let stranger = create_test_user(&state.db, "stranger").await;
    let member_principal = Principal::user(member.id);
    let crew_id = crew_with_member(&state, "alpha", &member_principal).await;

    let challenge = lifecycle
        .create_challenge(
            &member_principal,
            challenge_request(OwnerType::Crew, Some(crew_id)),
        )
        .await
        .unwrap();

    let err = lifecycle
        .update_status(&Principal::user(stranger.id), challenge.id, "SUCCESS")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    // Any accepted member of the owning crew may update
    let updated = lifecycle
        .update_status(&member_principal, challenge.id, "FAIL")
        .await
        .unwrap();
    assert_eq!(updated.status, ChallengeStatus::Fail);
}

#[tokio::test]
async fn test_status_transitions_are_unconstrained() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let principal = Principal::user(user.id);

    let challenge = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();

    // No transition graph: FAIL -> LIVE is accepted
    lifecycle
        .update_status(&principal, challenge.id, "FAIL")
        .await
        .unwrap();
    let revived = lifecycle
        .update_status(&principal, challenge.id, "LIVE")
        .await
        .unwrap();
    assert_eq!(revived.status, ChallengeStatus::Live);
}

#[tokio::test]
async fn test_list_scoped_to_own_and_crew_challenges() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let member = create_test_user(&state.db, "member").await;
    let outsider = create_test_user(&state.db, "outsider").await;
    let member_principal = Principal::user(member.id);
    let outsider_principal = Principal::user(outsider.id);
    let crew_id = crew_with_member(&state, "alpha", &member_principal).await;

    lifecycle
        .create_challenge(&member_principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();
    lifecycle
        .create_challenge(
            &member_principal,
            challenge_request(OwnerType::Crew, Some(crew_id)),
        )
        .await
        .unwrap();
    lifecycle
        .create_challenge(&outsider_principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();

    let listed = lifecycle
        .list_challenges(&member_principal, ChallengeListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.challenges.len(), 2);

    let listed = lifecycle
        .list_challenges(&outsider_principal, ChallengeListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.challenges.len(), 1);
}

#[tokio::test]
async fn test_list_status_filter_is_lenient() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let principal = Principal::user(user.id);

    let live = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();
    let done = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();
    lifecycle
        .update_status(&principal, done.id, "SUCCESS")
        .await
        .unwrap();

    let listed = lifecycle
        .list_challenges(
            &principal,
            ChallengeListQuery {
                status: Some("LIVE".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.challenges.len(), 1);
    assert_eq!(listed.challenges[0].id, live.id);

    // An unrecognized filter value is ignored, not an error
    let listed = lifecycle
        .list_challenges(
            &principal,
            ChallengeListQuery {
                status: Some("BOGUS".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.challenges.len(), 2);
}

#[tokio::test]
async fn test_record_achievement_upserts() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;
    let principal = Principal::user(user.id);

    let challenge = lifecycle
        .create_challenge(&principal, challenge_request(OwnerType::User, None))
        .await
        .unwrap();

    let first = lifecycle
        .record_achievement(&principal, challenge.id, "PENDING")
        .await
        .unwrap();
    assert_eq!(first.status, AchievementStatus::Pending);

    let second = lifecycle
        .record_achievement(&principal, challenge.id, "ACHIEVED")
        .await
        .unwrap();
    assert_eq!(second.status, AchievementStatus::Achieved);
    assert_eq!(second.id, first.id);

    let rows = UserChallengeStatuses::find()
        .filter(AchievementColumn::UserId.eq(user.id))
        .filter(AchievementColumn::ChallengeId.eq(challenge.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let err = lifecycle
        .record_achievement(&principal, challenge.id, "WON")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_status_unknown_challenge_is_not_found() {
    let state = test_state().await;
    let lifecycle = ChallengeLifecycle::new(state.clone());
    let user = create_test_user(&state.db, "alice").await;

    let err = lifecycle
        .update_status(&Principal::user(user.id), Uuid::new_v4(), "SUCCESS")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
