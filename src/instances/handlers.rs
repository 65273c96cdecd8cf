use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{InstanceView, SetupTelegramRequest, UpdateStatusRequest},
    services::{self, TelegramCredentials},
};
use crate::{
    auth::{AdminToken, AuthUser},
    error::AppResult,
    state::AppState,
};

pub fn instance_routes() -> Router<AppState> {
    Router::new()
        .route("/instances/me", get(get_user_instance).post(create_instance))
        .route("/instances/me/telegram", post(setup_telegram_bot))
        .route("/instances/me/restart", post(restart_instance))
}

pub fn internal_routes() -> Router<AppState> {
    Router::new().route("/instances/:id/status", put(update_instance_status))
}

#[instrument(skip_all)]
pub async fn get_user_instance(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<Option<InstanceView>>> {
    let Some(AuthUser(identity)) = auth else {
        return Ok(Json(None));
    };
    let instance = services::find_user_instance(&state, &identity).await?;
    Ok(Json(instance.map(Into::into)))
}

#[instrument(skip_all)]
pub async fn create_instance(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<InstanceView>> {
    let instance = services::create_instance(&state, &identity).await?;
    Ok(Json(instance.into()))
}

#[instrument(skip_all)]
pub async fn setup_telegram_bot(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<SetupTelegramRequest>,
) -> AppResult<Json<InstanceView>> {
    let creds = TelegramCredentials::parse(&body.bot_token, &body.bot_username)?;
    let instance = services::setup_telegram_bot(&state, &identity, creds).await?;
    Ok(Json(instance.into()))
}

#[instrument(skip_all)]
pub async fn restart_instance(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<InstanceView>> {
    let instance =
        services::restart_instance(&state, &identity, OffsetDateTime::now_utc()).await?;
    Ok(Json(instance.into()))
}

#[instrument(skip(state, _admin))]
pub async fn update_instance_status(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<Json<InstanceView>> {
    let instance =
        services::update_instance_status(&state, id, body.status, OffsetDateTime::now_utc())
            .await?;
    Ok(Json(instance.into()))
}
