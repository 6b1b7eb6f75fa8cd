use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::claims::SessionClaims;

/// Validates an HS256 session token and returns its claims.
pub fn validate_jwt(token: &str, secret: &str) -> Result<SessionClaims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

/// Issues an HS256 session token for `sub`, valid for `ttl_secs`.
#[cfg(test)]
pub fn issue_jwt(sub: &str, secret: &str, ttl_secs: i64) -> Result<String, String> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: sub.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign JWT: {}", e))
}
