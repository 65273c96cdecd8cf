use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// `pending_setup -> provisioning -> running | error`, with `running <-> stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "instance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    PendingSetup,
    Provisioning,
    Running,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ai_model")]
pub enum AiModel {
    #[sqlx(rename = "kimi-k2.5")]
    #[serde(rename = "kimi-k2.5")]
    KimiK25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "platform", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Telegram,
}

#[derive(Debug, Clone, FromRow)]
pub struct Instance {
    pub id: Uuid,
    pub user_id: Uuid,                         // unique
    pub status: InstanceStatus,
    pub ai_model: AiModel,
    pub platform: Platform,
    pub telegram_bot_token: Option<String>,    // never leaves the service
    pub telegram_bot_username: Option<String>,
    pub vm_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub last_active_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewInstance {
    pub user_id: Uuid,
    pub ai_model: AiModel,
    pub platform: Platform,
}

impl NewInstance {
    /// Every new instance starts on the default model and platform.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            ai_model: AiModel::KimiK25,
            platform: Platform::Telegram,
        }
    }
}
