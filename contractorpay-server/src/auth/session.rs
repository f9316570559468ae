//! Signed session cookies
//!
//! The session token is an HMAC-signed claim set with a fixed lifetime
//! set at issuance. There is no refresh, rotation, or server-side
//! revocation; logout just clears the cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use contractorpay_core::config::SessionConfig;
use contractorpay_core::models::Role;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Authenticated identity for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Token claims as stored in the cookie
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens with the configured secret.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: u64,
}

impl SessionSigner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_hours: config.ttl_hours,
        }
    }

    /// Issue a token for a fresh login.
    pub fn issue(&self, session: &Session) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: session.user_id,
            username: session.username.clone(),
            role: session.role,
            iat: now,
            exp: now + (self.ttl_hours as i64) * 3600,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token. Missing, tampered, or expired tokens all read as
    /// "no session".
    pub fn verify(&self, token: &str) -> Option<Session> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;

        Some(Session {
            user_id: data.claims.sub,
            username: data.claims.username,
            role: data.claims.role,
        })
    }

    /// Max-Age for the Set-Cookie header, in seconds.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_hours * 3600
    }
}

/// Build the Set-Cookie value for a fresh session.
pub fn set_cookie(token: &str, max_age_seconds: u64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    )
}

/// Build the Set-Cookie value that clears the session.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session token out of the Cookie header, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&SessionConfig {
            secret: "test-secret".into(),
            ttl_hours: 1,
        })
    }

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            username: "admin".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let signer = signer();
        let session = session();

        let token = signer.issue(&session).expect("issue failed");
        let verified = signer.verify(&token).expect("verify failed");
        assert_eq!(verified, session);
    }

    #[test]
    fn tampered_token_is_no_session() {
        let signer = signer();
        let mut token = signer.issue(&session()).expect("issue failed");
        token.push('x');
        assert!(signer.verify(&token).is_none());
    }

    #[test]
    fn wrong_secret_is_no_session() {
        let token = signer().issue(&session()).expect("issue failed");

        let other = SessionSigner::new(&SessionConfig {
            secret: "different-secret".into(),
            ttl_hours: 1,
        });
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn cookie_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; session=abc.def.ghi; other=1".parse().unwrap(),
        );
        assert_eq!(token_from_headers(&headers), Some("abc.def.ghi"));

        let empty = HeaderMap::new();
        assert_eq!(token_from_headers(&empty), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
