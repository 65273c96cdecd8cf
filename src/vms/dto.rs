use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{VmRecord, VmStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVmRequest {
    pub hetzner_server_id: String,
    pub ip_address: String,
    pub region: String,
    pub capacity: i32,
    #[serde(default)]
    pub status: Option<VmStatus>,
}

#[derive(Debug, Deserialize)]
pub struct VmFilter {
    pub status: Option<VmStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmView {
    pub id: Uuid,
    pub hetzner_server_id: String,
    pub ip_address: String,
    pub region: String,
    pub status: VmStatus,
    pub capacity: i32,
    pub current_users: i32,
    pub has_capacity: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<VmRecord> for VmView {
    fn from(v: VmRecord) -> Self {
        Self {
            has_capacity: v.has_capacity(),
            id: v.id,
            hetzner_server_id: v.hetzner_server_id,
            ip_address: v.ip_address,
            region: v.region,
            status: v.status,
            capacity: v.capacity,
            current_users: v.current_users,
            created_at: v.created_at,
        }
    }
}
