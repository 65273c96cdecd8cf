use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo_types::{SubscriptionStatus, User},
    trial::TrialStatus,
};

/// Profile as returned to the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub trial_ends_at: Option<OffsetDateTime>,
    pub trial_messages_used: i32,
    pub trial_message_limit: i32,
    pub subscription_status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub current_period_end: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            image: u.image,
            trial_ends_at: u.trial_ends_at,
            trial_messages_used: u.trial_messages_used,
            trial_message_limit: u.trial_message_limit,
            subscription_status: u.subscription_status,
            current_period_end: u.current_period_end,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatusResponse {
    pub subscription_status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub trial_ends_at: Option<OffsetDateTime>,
    pub trial_messages_used: i32,
    pub trial_message_limit: i32,
    /// Milliseconds.
    pub time_remaining: i64,
    pub messages_remaining: i32,
    pub is_trial_expired: bool,
    pub is_active: bool,
}

impl TrialStatusResponse {
    pub fn new(user: &User, status: TrialStatus) -> Self {
        Self {
            subscription_status: user.subscription_status,
            trial_ends_at: user.trial_ends_at,
            trial_messages_used: user.trial_messages_used,
            trial_message_limit: user.trial_message_limit,
            time_remaining: status.time_remaining_ms,
            messages_remaining: status.messages_remaining,
            is_trial_expired: status.is_trial_expired,
            is_active: user.subscription_status == SubscriptionStatus::Active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordMessagesRequest {
    #[serde(default = "default_count")]
    pub count: i32,
}
fn default_count() -> i32 { 1 }

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}
