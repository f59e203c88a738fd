//! Kling API tokens: short-lived HS256 JWTs signed with the secret key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::gateway_core::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 1800;
/// Allowed clock skew: tokens become valid slightly in the past.
pub const NOT_BEFORE_SKEW_SECS: i64 = 5;

/// Sign a token for `access_key`, valid from `now - 5s` to `now + 1800s`.
pub fn encode_jwt(access_key: &str, secret_key: &str, now: i64) -> Result<String, GatewayError> {
    let header = json!({"alg": "HS256", "typ": "JWT"});
    let claims = json!({
        "iss": access_key,
        "exp": now + TOKEN_TTL_SECS,
        "nbf": now - NOT_BEFORE_SKEW_SECS,
    });
    let signing_input = format!(
        "{}.{}",
        B64URL.encode(serde_json::to_vec(&header)?),
        B64URL.encode(serde_json::to_vec(&claims)?)
    );
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).map_err(|err| {
        GatewayError::InvalidCredential {
            scope: "kling".into(),
            message: err.to_string(),
        }
    })?;
    mac.update(signing_input.as_bytes());
    let signature = B64URL.encode(mac.finalize().into_bytes());
    Ok(format!("{signing_input}.{signature}"))
}
