use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Instance, InstanceStatus, NewInstance};

#[async_trait]
pub trait InstanceStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Instance>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Instance>>;
    /// Inserts in `pending_setup` unless the user already owns an instance.
    /// Returns the stored instance and whether this call created it.
    async fn insert_if_absent(&self, new: NewInstance) -> anyhow::Result<(Instance, bool)>;
    /// Stores bot credentials and moves the instance to `provisioning`.
    async fn configure_telegram(
        &self,
        id: Uuid,
        bot_token: &str,
        bot_username: &str,
    ) -> anyhow::Result<Option<Instance>>;
    async fn touch(&self, id: Uuid, at: OffsetDateTime) -> anyhow::Result<Option<Instance>>;
    async fn set_status(
        &self,
        id: Uuid,
        status: InstanceStatus,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<Instance>>;
}

const INSTANCE_COLUMNS: &str = r#"
    id, user_id, status, ai_model, platform,
    telegram_bot_token, telegram_bot_username, vm_id,
    created_at, last_active_at
"#;

#[derive(Clone)]
pub struct PgInstanceStore {
    db: PgPool,
}

impl PgInstanceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InstanceStore for PgInstanceStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Instance>> {
        let sql = format!("SELECT {INSTANCE_COLUMNS} FROM instances WHERE user_id = $1");
        let row = sqlx::query_as::<_, Instance>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("find instance by user")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Instance>> {
        let sql = format!("SELECT {INSTANCE_COLUMNS} FROM instances WHERE id = $1");
        let row = sqlx::query_as::<_, Instance>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find instance by id")?;
        Ok(row)
    }

    async fn insert_if_absent(&self, new: NewInstance) -> anyhow::Result<(Instance, bool)> {
        let sql = format!(
            r#"
            INSERT INTO instances (user_id, status, ai_model, platform)
            VALUES ($1, 'pending_setup', $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {INSTANCE_COLUMNS}
            "#
        );
        let inserted = sqlx::query_as::<_, Instance>(&sql)
            .bind(new.user_id)
            .bind(new.ai_model)
            .bind(new.platform)
            .fetch_optional(&self.db)
            .await
            .context("insert instance")?;

        if let Some(instance) = inserted {
            return Ok((instance, true));
        }

        let existing = self
            .find_by_user(new.user_id)
            .await?
            .context("instance vanished after insert conflict")?;
        Ok((existing, false))
    }

    async fn configure_telegram(
        &self,
        id: Uuid,
        bot_token: &str,
        bot_username: &str,
    ) -> anyhow::Result<Option<Instance>> {
        let sql = format!(
            r#"
            UPDATE instances
               SET telegram_bot_token = $2,
                   telegram_bot_username = $3,
                   status = 'provisioning'
             WHERE id = $1
            RETURNING {INSTANCE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Instance>(&sql)
            .bind(id)
            .bind(bot_token)
            .bind(bot_username)
            .fetch_optional(&self.db)
            .await
            .context("configure telegram")?;
        Ok(row)
    }

    async fn touch(&self, id: Uuid, at: OffsetDateTime) -> anyhow::Result<Option<Instance>> {
        let sql = format!(
            "UPDATE instances SET last_active_at = $2 WHERE id = $1 RETURNING {INSTANCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Instance>(&sql)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.db)
            .await
            .context("touch instance")?;
        Ok(row)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: InstanceStatus,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<Instance>> {
        let sql = format!(
            r#"
            UPDATE instances
               SET status = $2,
                   last_active_at = $3
             WHERE id = $1
            RETURNING {INSTANCE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Instance>(&sql)
            .bind(id)
            .bind(status)
            .bind(at)
            .fetch_optional(&self.db)
            .await
            .context("set instance status")?;
        Ok(row)
    }
}
