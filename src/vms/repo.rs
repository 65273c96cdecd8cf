use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewVm, VmRecord, VmStatus};

#[async_trait]
pub trait VmStore: Send + Sync {
    /// `Ok(None)` when the Hetzner server id is already registered.
    async fn insert(&self, new: NewVm) -> anyhow::Result<Option<VmRecord>>;
    async fn list(&self, status: Option<VmStatus>) -> anyhow::Result<Vec<VmRecord>>;
}

const VM_COLUMNS: &str = r#"
    id, hetzner_server_id, ip_address, region, status,
    capacity, current_users, created_at
"#;

#[derive(Clone)]
pub struct PgVmStore {
    db: PgPool,
}

impl PgVmStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VmStore for PgVmStore {
    async fn insert(&self, new: NewVm) -> anyhow::Result<Option<VmRecord>> {
        let sql = format!(
            r#"
            INSERT INTO vms (hetzner_server_id, ip_address, region, status, capacity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (hetzner_server_id) DO NOTHING
            RETURNING {VM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, VmRecord>(&sql)
            .bind(&new.hetzner_server_id)
            .bind(&new.ip_address)
            .bind(&new.region)
            .bind(new.status)
            .bind(new.capacity)
            .fetch_optional(&self.db)
            .await
            .context("insert vm")?;
        Ok(row)
    }

    async fn list(&self, status: Option<VmStatus>) -> anyhow::Result<Vec<VmRecord>> {
        let sql = format!(
            r#"
            SELECT {VM_COLUMNS}
              FROM vms
             WHERE ($1::vm_status IS NULL OR status = $1)
             ORDER BY created_at ASC
            "#
        );
        let rows = sqlx::query_as::<_, VmRecord>(&sql)
            .bind(status)
            .fetch_all(&self.db)
            .await
            .context("list vms")?;
        Ok(rows)
    }
}
