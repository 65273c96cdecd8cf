use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vm_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VmStatus {
    Provisioning,
    Active,
    Full,
    Offline,
}

/// Host capacity bookkeeping. Nothing places instances on these yet.
#[derive(Debug, Clone, FromRow)]
pub struct VmRecord {
    pub id: Uuid,
    pub hetzner_server_id: String, // unique
    pub ip_address: String,
    pub region: String,
    pub status: VmStatus,
    pub capacity: i32,
    pub current_users: i32,
    pub created_at: OffsetDateTime,
}

impl VmRecord {
    pub fn has_capacity(&self) -> bool {
        self.status == VmStatus::Active && self.current_users < self.capacity
    }
}

#[derive(Debug, Clone)]
pub struct NewVm {
    pub hetzner_server_id: String,
    pub ip_address: String,
    pub region: String,
    pub status: VmStatus,
    pub capacity: i32,
}
