use serde::{Deserialize, Serialize};

/// JWT payload issued by the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // auth provider user ID
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}

/// Caller identity derived from verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub auth_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<Claims> for AuthIdentity {
    fn from(c: Claims) -> Self {
        Self {
            auth_user_id: c.sub,
            email: c.email,
            name: c.name,
            image: c.picture,
        }
    }
}
