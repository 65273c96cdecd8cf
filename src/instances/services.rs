use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Instance, InstanceStatus, NewInstance};
use crate::{
    auth::AuthIdentity,
    error::{AppError, AppResult},
    state::AppState,
    users::services::{find_current_user, require_current_user},
};

lazy_static! {
    static ref BOT_TOKEN_RE: Regex = Regex::new(r"^\d+:[A-Za-z0-9_-]+$").unwrap();
}

/// Validated bot credentials, with the username stored without its `@`.
#[derive(Debug, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub bot_username: String,
}

impl TelegramCredentials {
    pub fn parse(bot_token: &str, bot_username: &str) -> AppResult<Self> {
        let bot_token = bot_token.trim();
        if !BOT_TOKEN_RE.is_match(bot_token) {
            return Err(AppError::BadRequest("Invalid bot token format".into()));
        }
        let bot_username = bot_username.trim();
        let bot_username = bot_username.strip_prefix('@').unwrap_or(bot_username);
        if bot_username.is_empty() {
            return Err(AppError::BadRequest("Bot username is required".into()));
        }
        Ok(Self {
            bot_token: bot_token.to_string(),
            bot_username: bot_username.to_string(),
        })
    }
}

pub async fn find_user_instance(
    st: &AppState,
    identity: &AuthIdentity,
) -> anyhow::Result<Option<Instance>> {
    let Some(user) = find_current_user(st, identity).await? else {
        return Ok(None);
    };
    st.instances.find_by_user(user.id).await
}

async fn require_user_instance(st: &AppState, identity: &AuthIdentity) -> AppResult<Instance> {
    let user = require_current_user(st, identity).await?;
    st.instances
        .find_by_user(user.id)
        .await?
        .ok_or(AppError::NotFound("Instance"))
}

/// Returns the caller's instance, creating one in `pending_setup` if absent.
pub async fn create_instance(st: &AppState, identity: &AuthIdentity) -> AppResult<Instance> {
    let user = require_current_user(st, identity).await?;
    let (instance, created) = st
        .instances
        .insert_if_absent(NewInstance::for_user(user.id))
        .await?;
    if created {
        info!(instance_id = %instance.id, user_id = %user.id, "instance created");
    }
    Ok(instance)
}

/// Stores bot credentials and hands the instance over to provisioning.
/// Runs whatever the current status is.
pub async fn setup_telegram_bot(
    st: &AppState,
    identity: &AuthIdentity,
    creds: TelegramCredentials,
) -> AppResult<Instance> {
    let instance = require_user_instance(st, identity).await?;
    let previous = instance.status;
    let updated = st
        .instances
        .configure_telegram(instance.id, &creds.bot_token, &creds.bot_username)
        .await?
        .ok_or(AppError::NotFound("Instance"))?;
    info!(
        instance_id = %updated.id,
        bot_username = %creds.bot_username,
        from = ?previous,
        to = ?updated.status,
        "telegram bot configured"
    );
    Ok(updated)
}

/// Only records activity; nothing is restarted.
pub async fn restart_instance(
    st: &AppState,
    identity: &AuthIdentity,
    now: OffsetDateTime,
) -> AppResult<Instance> {
    let instance = require_user_instance(st, identity).await?;
    let updated = st
        .instances
        .touch(instance.id, now)
        .await?
        .ok_or(AppError::NotFound("Instance"))?;
    info!(instance_id = %updated.id, "instance restart requested");
    Ok(updated)
}

pub async fn update_instance_status(
    st: &AppState,
    instance_id: Uuid,
    status: InstanceStatus,
    now: OffsetDateTime,
) -> AppResult<Instance> {
    let Some(current) = st.instances.find_by_id(instance_id).await? else {
        warn!(%instance_id, "status update for unknown instance");
        return Err(AppError::NotFound("Instance"));
    };
    let updated = st
        .instances
        .set_status(instance_id, status, now)
        .await?
        .ok_or(AppError::NotFound("Instance"))?;
    info!(%instance_id, from = ?current.status, to = ?status, "instance status updated");
    Ok(updated)
}
