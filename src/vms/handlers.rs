use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{RegisterVmRequest, VmFilter, VmView},
    repo_types::{NewVm, VmStatus},
};
use crate::{
    auth::AdminToken,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn internal_routes() -> Router<AppState> {
    Router::new().route("/vms", get(list_vms).post(register_vm))
}

#[instrument(skip(state, _admin))]
pub async fn register_vm(
    _admin: AdminToken,
    State(state): State<AppState>,
    Json(body): Json<RegisterVmRequest>,
) -> AppResult<(StatusCode, Json<VmView>)> {
    let new = validate(body)?;
    let server_id = new.hetzner_server_id.clone();
    let Some(vm) = state.vms.insert(new).await? else {
        warn!(hetzner_server_id = %server_id, "vm already registered");
        return Err(AppError::BadRequest("VM already registered".into()));
    };
    info!(vm_id = %vm.id, hetzner_server_id = %vm.hetzner_server_id, "vm registered");
    Ok((StatusCode::CREATED, Json(vm.into())))
}

#[instrument(skip(state, _admin))]
pub async fn list_vms(
    _admin: AdminToken,
    State(state): State<AppState>,
    Query(filter): Query<VmFilter>,
) -> AppResult<Json<Vec<VmView>>> {
    let vms = state.vms.list(filter.status).await?;
    Ok(Json(vms.into_iter().map(Into::into).collect()))
}

fn validate(body: RegisterVmRequest) -> AppResult<NewVm> {
    if body.capacity < 1 {
        return Err(AppError::BadRequest("capacity must be at least 1".into()));
    }
    for (field, value) in [
        ("hetznerServerId", &body.hetzner_server_id),
        ("ipAddress", &body.ip_address),
        ("region", &body.region),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }
    Ok(NewVm {
        hetzner_server_id: body.hetzner_server_id.trim().to_string(),
        ip_address: body.ip_address.trim().to_string(),
        region: body.region.trim().to_string(),
        status: body.status.unwrap_or(VmStatus::Provisioning),
        capacity: body.capacity,
    })
}
