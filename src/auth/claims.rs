use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String, // Identity subsystem's auth id
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
}
