use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, SubscriptionUpdate, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_auth_id(&self, auth_user_id: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Vec<User>>;
    /// Inserts unless a profile for the same auth identity exists.
    /// Returns the stored profile and whether this call created it.
    async fn insert_if_absent(&self, new: NewUser) -> anyhow::Result<(User, bool)>;
    async fn update_name(&self, id: Uuid, name: Option<String>) -> anyhow::Result<Option<User>>;
    async fn add_trial_messages(&self, id: Uuid, count: i32) -> anyhow::Result<Option<User>>;
    async fn update_subscription(
        &self,
        id: Uuid,
        update: SubscriptionUpdate,
    ) -> anyhow::Result<Option<User>>;
}

const USER_COLUMNS: &str = r#"
    id, auth_user_id, email, name, image,
    trial_ends_at, trial_messages_used, trial_message_limit,
    subscription_status, stripe_customer_id, stripe_subscription_id,
    current_period_end, created_at
"#;

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_auth_id(&self, auth_user_id: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE auth_user_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(auth_user_id)
            .fetch_optional(&self.db)
            .await
            .context("find user by auth id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1) ORDER BY created_at ASC"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_all(&self.db)
            .await
            .context("find users by email")?;
        Ok(users)
    }

    async fn insert_if_absent(&self, new: NewUser) -> anyhow::Result<(User, bool)> {
        let sql = format!(
            r#"
            INSERT INTO users (auth_user_id, email, name, image, trial_ends_at, trial_message_limit)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (auth_user_id) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );
        let inserted = sqlx::query_as::<_, User>(&sql)
            .bind(&new.auth_user_id)
            .bind(&new.email)
            .bind(&new.name)
            .bind(&new.image)
            .bind(new.trial_ends_at)
            .bind(new.trial_message_limit)
            .fetch_optional(&self.db)
            .await
            .context("insert user")?;

        if let Some(user) = inserted {
            return Ok((user, true));
        }

        let existing = self
            .find_by_auth_id(&new.auth_user_id)
            .await?
            .context("user vanished after insert conflict")?;
        Ok((existing, false))
    }

    async fn update_name(&self, id: Uuid, name: Option<String>) -> anyhow::Result<Option<User>> {
        let sql = format!("UPDATE users SET name = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.db)
            .await
            .context("update user name")?;
        Ok(user)
    }

    async fn add_trial_messages(&self, id: Uuid, count: i32) -> anyhow::Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
               SET trial_messages_used = LEAST(trial_messages_used::BIGINT + $2::BIGINT, 2147483647)::INTEGER
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(count)
            .fetch_optional(&self.db)
            .await
            .context("increment trial messages")?;
        Ok(user)
    }

    async fn update_subscription(
        &self,
        id: Uuid,
        update: SubscriptionUpdate,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
               SET subscription_status = $2,
                   stripe_customer_id = COALESCE($3, stripe_customer_id),
                   stripe_subscription_id = COALESCE($4, stripe_subscription_id),
                   current_period_end = $5
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(update.status)
            .bind(update.stripe_customer_id)
            .bind(update.stripe_subscription_id)
            .bind(update.current_period_end)
            .fetch_optional(&self.db)
            .await
            .context("update subscription")?;
        Ok(user)
    }
}
