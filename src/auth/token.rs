//! Access token verification
//!
//! The credential service issues HMAC-signed bearer tokens; this crate
//! only verifies them. A verified token yields an explicit identity
//! context that is passed into every operation, never cached
//! process-wide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verified identity context for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// User ID the token was issued for
    pub user_id: String,
    /// Username at issuance time
    pub username: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Create a signed access token
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
///
/// Issuance belongs to the external credential service; this
/// constructor exists for operators and tests.
///
/// # Arguments
/// * `context` - Identity to encode
/// * `secret` - HMAC secret key
///
/// # Returns
/// Signed token string
pub fn create_access_token(
    context: &AuthContext,
    secret: &str,
) -> Result<String, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Serialize context to JSON
    let payload =
        serde_json::to_string(context).map_err(|e| crate::error::AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!(e)))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode an access token
///
/// # Arguments
/// * `token` - Token string to verify
/// * `secret` - HMAC secret key
///
/// # Returns
/// Decoded identity context if valid
///
/// # Errors
/// Returns `Unauthorized` if the signature is invalid, the token is
/// malformed, or the token is expired
pub fn verify_access_token(
    token: &str,
    secret: &str,
) -> Result<AuthContext, crate::error::AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    // 1. Split token into payload and signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(crate::error::AppError::Unauthorized);
    }

    let payload_b64 = parts[0];
    let signature_b64 = parts[1];

    // 2. Verify HMAC signature
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!(e)))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| crate::error::AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| crate::error::AppError::Unauthorized)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| crate::error::AppError::Unauthorized)?;

    let payload_str =
        String::from_utf8(payload_bytes).map_err(|_| crate::error::AppError::Unauthorized)?;

    let context: AuthContext =
        serde_json::from_str(&payload_str).map_err(|_| crate::error::AppError::Unauthorized)?;

    // 4. Check expiry
    if context.is_expired() {
        return Err(crate::error::AppError::Unauthorized);
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn context_for(user_id: &str) -> AuthContext {
        let now = Utc::now();
        AuthContext {
            user_id: user_id.to_string(),
            username: "tester".to_string(),
            issued_at: now,
            expires_at: now + Duration::days(7),
        }
    }

    #[test]
    fn round_trips_valid_token() {
        let secret = "test-secret-key-32-bytes-long!!!";
        let token = create_access_token(&context_for("u1"), secret).unwrap();

        let verified = verify_access_token(&token, secret).unwrap();
        assert_eq!(verified.user_id, "u1");
        assert_eq!(verified.username, "tester");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token =
            create_access_token(&context_for("u1"), "test-secret-key-32-bytes-long!!!").unwrap();

        assert!(verify_access_token(&token, "another-secret-key-32-bytes-long").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let context = AuthContext {
            user_id: "u1".to_string(),
            username: "tester".to_string(),
            issued_at: now - Duration::days(8),
            expires_at: now - Duration::days(1),
        };
        let token = create_access_token(&context, "test-secret-key-32-bytes-long!!!").unwrap();

        assert!(verify_access_token(&token, "test-secret-key-32-bytes-long!!!").is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(verify_access_token("not-a-token", "test-secret-key-32-bytes-long!!!").is_err());
    }
}
