mod claims;
pub(crate) mod extractors;
mod keys;

pub use claims::{AuthIdentity, Claims};
pub use extractors::{AdminToken, AuthUser, ADMIN_TOKEN_HEADER};
pub use keys::JwtKeys;
