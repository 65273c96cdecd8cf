use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{EmailQuery, RecordMessagesRequest, TrialStatusResponse, UpdateUserRequest, UserProfile},
    repo_types::SubscriptionUpdate,
    services,
    trial::TrialStatus,
};
use crate::{
    auth::{AdminToken, AuthUser},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/me",
            get(get_current_user)
                .post(get_or_create_user)
                .patch(update_user),
        )
        .route("/users/me/trial", get(get_trial_status))
}

pub fn internal_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(find_by_email))
        .route("/users/:id/trial-messages", post(record_trial_messages))
        .route("/users/:id/subscription", put(update_subscription))
}

#[instrument(skip_all)]
pub async fn get_or_create_user(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<Option<UserProfile>>> {
    let Some(AuthUser(identity)) = auth else {
        return Ok(Json(None));
    };
    let user = services::get_or_create_user(&state, &identity, OffsetDateTime::now_utc()).await?;
    Ok(Json(Some(user.into())))
}

#[instrument(skip_all)]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<Option<UserProfile>>> {
    let Some(AuthUser(identity)) = auth else {
        return Ok(Json(None));
    };
    let user = services::find_current_user(&state, &identity).await?;
    Ok(Json(user.map(Into::into)))
}

#[instrument(skip_all)]
pub async fn get_trial_status(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<Option<TrialStatusResponse>>> {
    let Some(AuthUser(identity)) = auth else {
        return Ok(Json(None));
    };
    let Some(user) = services::find_current_user(&state, &identity).await? else {
        return Ok(Json(None));
    };
    let status = TrialStatus::evaluate(&user, OffsetDateTime::now_utc());
    Ok(Json(Some(TrialStatusResponse::new(&user, status))))
}

#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserProfile>> {
    let user = services::update_name(&state, &identity, body.name).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _admin))]
pub async fn find_by_email(
    _admin: AdminToken,
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let email = q.email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("email is required".into()));
    }
    let users = state.users.find_by_email(email).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, _admin, body))]
pub async fn record_trial_messages(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<RecordMessagesRequest>, JsonRejection>,
) -> AppResult<Json<TrialStatusResponse>> {
    // A bare POST without a JSON body reports a single message.
    let count = match body {
        Ok(Json(b)) => b.count,
        Err(JsonRejection::MissingJsonContentType(_)) => 1,
        Err(e) => {
            warn!(user_id = %id, error = %e, "malformed trial message report");
            return Err(AppError::BadRequest(e.body_text()));
        }
    };
    let user = services::record_trial_messages(&state, id, count).await?;
    let status = TrialStatus::evaluate(&user, OffsetDateTime::now_utc());
    Ok(Json(TrialStatusResponse::new(&user, status)))
}

#[instrument(skip(state, _admin, body))]
pub async fn update_subscription(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubscriptionUpdate>,
) -> AppResult<Json<UserProfile>> {
    let user = services::update_subscription(&state, id, body).await?;
    Ok(Json(user.into()))
}
