use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{AiModel, Instance, InstanceStatus, Platform};

/// Instance as returned to the dashboard; the bot token is withheld.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: InstanceStatus,
    pub ai_model: AiModel,
    pub platform: Platform,
    pub telegram_bot_username: Option<String>,
    pub has_bot_token: bool,
    pub vm_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_active_at: Option<OffsetDateTime>,
}

impl From<Instance> for InstanceView {
    fn from(i: Instance) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            status: i.status,
            ai_model: i.ai_model,
            platform: i.platform,
            telegram_bot_username: i.telegram_bot_username,
            has_bot_token: i.telegram_bot_token.is_some(),
            vm_id: i.vm_id,
            created_at: i.created_at,
            last_active_at: i.last_active_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupTelegramRequest {
    pub bot_token: String,
    pub bot_username: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InstanceStatus,
}
