//! Bearer tokens for the App Store Connect API.
//!
//! Tokens are ES256 JWTs signed with the team's API key. The expiry is fixed
//! when the provider is built, so every request made during one run carries
//! the same claim set.

use std::{fmt, fs, path::Path};

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Audience required by App Store Connect.
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// Anything that can produce an `Authorization` header value.
pub trait TokenSource {
    /// Returns `"Bearer <token>"`.
    fn bearer(&self) -> Result<String, Error>;
}

/// A pre-minted token, used for tests and for tokens produced elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

impl TokenSource for StaticToken {
    fn bearer(&self) -> Result<String, Error> {
        Ok(format!("Bearer {}", self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub exp: i64,
    pub aud: String,
}

/// Signs App Store Connect tokens with an ES256 key.
pub struct JwtTokenProvider {
    key_id: String,
    claims: Claims,
    key: EncodingKey,
}

impl fmt::Debug for JwtTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenProvider")
            .field("key_id", &self.key_id)
            .field("claims", &self.claims)
            .finish_non_exhaustive()
    }
}

impl JwtTokenProvider {
    /// Builds a provider whose tokens expire `lifetime` from now.
    pub fn new(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        private_key_pem: &[u8],
        lifetime: TimeDelta,
    ) -> Result<Self, Error> {
        let expires_at = (Utc::now() + lifetime).timestamp();
        Self::with_expiry(key_id, issuer_id, private_key_pem, expires_at)
    }

    /// Builds a provider with an explicit expiry (seconds since the epoch).
    pub fn with_expiry(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        private_key_pem: &[u8],
        expires_at: i64,
    ) -> Result<Self, Error> {
        Ok(JwtTokenProvider {
            key_id: key_id.into(),
            claims: Claims {
                iss: issuer_id.into(),
                exp: expires_at,
                aud: AUDIENCE.to_string(),
            },
            key: EncodingKey::from_ec_pem(private_key_pem)?,
        })
    }

    /// Reads the PKCS#8 `.p8` key file downloaded from App Store Connect.
    pub fn from_key_file<P: AsRef<Path>>(
        key_id: impl Into<String>,
        issuer_id: impl Into<String>,
        key_path: P,
        lifetime: TimeDelta,
    ) -> Result<Self, Error> {
        let key_path = key_path.as_ref();
        if !key_path.is_file() {
            return Err(Error::MissingInput(key_path.to_path_buf()));
        }
        let pem = fs::read(key_path)?;
        Self::new(key_id, issuer_id, &pem, lifetime)
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Signs the claim set.
    pub fn token(&self) -> Result<String, Error> {
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());
        header.typ = Some("JWT".to_string());
        Ok(encode(&header, &self.claims, &self.key)?)
    }
}

impl TokenSource for JwtTokenProvider {
    fn bearer(&self) -> Result<String, Error> {
        Ok(format!("Bearer {}", self.token()?))
    }
}
