//! Token verification configuration.
//!
//! HaulHub does not issue tokens itself; the identity service does. This
//! section only carries what is needed to verify inbound bearer tokens.

use serde::{Deserialize, Serialize};

/// JWT verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity service.
    pub jwt_secret: String,
    /// Expected token issuer. Empty disables the issuer check.
    #[serde(default)]
    pub issuer: String,
    /// Clock skew tolerance in seconds when validating expiry.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    30
}
