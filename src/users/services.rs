use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{NewUser, SubscriptionUpdate, User};
use crate::{
    auth::AuthIdentity,
    error::{AppError, AppResult},
    state::AppState,
};

/// Upper bound on messages reported in one call.
pub const MAX_MESSAGES_PER_REPORT: i32 = 10_000;

/// Returns the caller's profile, creating it with a fresh trial on first visit.
pub async fn get_or_create_user(
    st: &AppState,
    identity: &AuthIdentity,
    now: OffsetDateTime,
) -> anyhow::Result<User> {
    if let Some(user) = st.users.find_by_auth_id(&identity.auth_user_id).await? {
        return Ok(user);
    }

    let trial = &st.config.trial;
    let new = NewUser {
        auth_user_id: identity.auth_user_id.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        image: identity.image.clone(),
        trial_ends_at: now + Duration::hours(trial.duration_hours),
        trial_message_limit: trial.message_limit,
    };
    let (user, created) = st.users.insert_if_absent(new).await?;
    if created {
        info!(user_id = %user.id, auth_user_id = %user.auth_user_id, "user profile created");
    }
    Ok(user)
}

pub async fn find_current_user(
    st: &AppState,
    identity: &AuthIdentity,
) -> anyhow::Result<Option<User>> {
    st.users.find_by_auth_id(&identity.auth_user_id).await
}

/// Like [`find_current_user`], but a missing profile is an error.
pub async fn require_current_user(st: &AppState, identity: &AuthIdentity) -> AppResult<User> {
    find_current_user(st, identity)
        .await?
        .ok_or(AppError::NotFound("User profile"))
}

pub async fn update_name(
    st: &AppState,
    identity: &AuthIdentity,
    name: Option<String>,
) -> AppResult<User> {
    let user = require_current_user(st, identity).await?;
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    st.users
        .update_name(user.id, name)
        .await?
        .ok_or(AppError::NotFound("User profile"))
}

pub async fn record_trial_messages(st: &AppState, user_id: Uuid, count: i32) -> AppResult<User> {
    if count < 1 {
        warn!(%user_id, count, "rejecting non-positive trial message count");
        return Err(AppError::BadRequest("count must be at least 1".into()));
    }
    if count > MAX_MESSAGES_PER_REPORT {
        warn!(%user_id, count, "rejecting oversized trial message count");
        return Err(AppError::BadRequest(format!(
            "count must be at most {MAX_MESSAGES_PER_REPORT}"
        )));
    }
    let user = st
        .users
        .add_trial_messages(user_id, count)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(%user_id, used = user.trial_messages_used, limit = user.trial_message_limit, "trial messages recorded");
    Ok(user)
}

pub async fn update_subscription(
    st: &AppState,
    user_id: Uuid,
    update: SubscriptionUpdate,
) -> AppResult<User> {
    let status = update.status;
    let user = st
        .users
        .update_subscription(user_id, update)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(%user_id, ?status, "subscription updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::{identity, memory_state}, users::repo_types::SubscriptionStatus};

    fn now() -> OffsetDateTime {
        time::macros::datetime!(2026-03-01 12:00 UTC)
    }

    #[tokio::test]
    async fn first_visit_starts_a_trial() {
        let st = memory_state();
        let user = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();

        assert_eq!(user.subscription_status, SubscriptionStatus::Trial);
        assert_eq!(user.trial_messages_used, 0);
        assert_eq!(user.trial_message_limit, 50);
        assert_eq!(user.trial_ends_at, Some(now() + Duration::hours(24)));
        assert_eq!(user.email, "auth|1@example.com");
    }

    #[tokio::test]
    async fn repeat_visits_return_the_same_profile() {
        let st = memory_state();
        let first = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();
        let later = now() + Duration::hours(3);
        let second = get_or_create_user(&st, &identity("auth|1"), later).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.trial_ends_at, second.trial_ends_at);
    }

    #[tokio::test]
    async fn concurrent_first_visits_create_one_profile() {
        let st = memory_state();
        let who = identity("auth|race");
        let (a, b) = tokio::join!(
            get_or_create_user(&st, &who, now()),
            get_or_create_user(&st, &who, now())
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);
    }

    #[tokio::test]
    async fn update_name_requires_profile() {
        let st = memory_state();
        let err = update_name(&st, &identity("auth|ghost"), Some("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("User profile")));
    }

    #[tokio::test]
    async fn blank_name_clears_it() {
        let st = memory_state();
        let who = identity("auth|1");
        get_or_create_user(&st, &who, now()).await.unwrap();

        let named = update_name(&st, &who, Some("  Ada ".into())).await.unwrap();
        assert_eq!(named.name.as_deref(), Some("Ada"));

        let cleared = update_name(&st, &who, Some("   ".into())).await.unwrap();
        assert_eq!(cleared.name, None);
    }

    #[tokio::test]
    async fn record_trial_messages_accumulates() {
        let st = memory_state();
        let user = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();

        record_trial_messages(&st, user.id, 1).await.unwrap();
        let user = record_trial_messages(&st, user.id, 4).await.unwrap();
        assert_eq!(user.trial_messages_used, 5);
    }

    #[tokio::test]
    async fn record_trial_messages_rejects_zero() {
        let st = memory_state();
        let user = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();
        let err = record_trial_messages(&st, user.id, 0).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn record_trial_messages_rejects_oversized_count() {
        let st = memory_state();
        let user = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();

        let err = record_trial_messages(&st, user.id, i32::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let user = record_trial_messages(&st, user.id, MAX_MESSAGES_PER_REPORT)
            .await
            .unwrap();
        assert_eq!(user.trial_messages_used, MAX_MESSAGES_PER_REPORT);
    }

    #[tokio::test]
    async fn stored_counter_saturates_instead_of_wrapping() {
        let st = memory_state();
        let user = get_or_create_user(&st, &identity("auth|1"), now()).await.unwrap();

        st.users.add_trial_messages(user.id, i32::MAX).await.unwrap();
        let user = st.users.add_trial_messages(user.id, 5).await.unwrap().unwrap();
        assert_eq!(user.trial_messages_used, i32::MAX);
    }

    #[tokio::test]
    async fn update_subscription_unknown_user() {
        let st = memory_state();
        let err = update_subscription(
            &st,
            Uuid::new_v4(),
            SubscriptionUpdate {
                status: SubscriptionStatus::Active,
                stripe_customer_id: None,
                stripe_subscription_id: None,
                current_period_end: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound("User")));
    }
}
