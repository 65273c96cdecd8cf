use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Cancelled,
}

/// User profile record, keyed by the auth provider identity.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub auth_user_id: String,                  // unique
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub trial_ends_at: Option<OffsetDateTime>,
    pub trial_messages_used: i32,
    pub trial_message_limit: i32,
    pub subscription_status: SubscriptionStatus,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub current_period_end: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Fields for a freshly created profile; status always starts at `trial`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub auth_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub trial_ends_at: OffsetDateTime,
    pub trial_message_limit: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub current_period_end: Option<OffsetDateTime>,
}
