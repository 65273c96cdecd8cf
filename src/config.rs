use serde::Deserialize;

/// Verification parameters for bearer tokens minted by the auth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrialConfig {
    pub duration_hours: i64,
    pub message_limit: i32,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            message_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
    pub trial: TrialConfig,
    /// Shared secret for `/internal` routes; `None` refuses them all.
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            secret: std::env::var("AUTH_JWT_SECRET")?,
            issuer: std::env::var("AUTH_JWT_ISSUER").unwrap_or_else(|_| "clawhost-auth".into()),
            audience: std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| "clawhost".into()),
        };
        let defaults = TrialConfig::default();
        let trial = TrialConfig {
            duration_hours: env_parse("TRIAL_DURATION_HOURS").unwrap_or(defaults.duration_hours),
            message_limit: env_parse("TRIAL_MESSAGE_LIMIT").unwrap_or(defaults.message_limit),
        };
        let admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            auth,
            trial,
            admin_token,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
