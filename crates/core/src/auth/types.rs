use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classroom::Role;

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user this token authenticates.
    pub sub: Uuid,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}
