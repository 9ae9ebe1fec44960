use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::debug;

use crate::{auth::claims::Claims, config::JwtConfig};

/// Lifetime used when the caller does not ask for one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    /// Lifetime requested by the login endpoint.
    pub login_ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            login_ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
        }
    }

    pub fn issue_token(&self, subject: &str, ttl: Option<Duration>) -> anyhow::Result<String> {
        self.issue_token_at(subject, ttl, OffsetDateTime::now_utc())
    }

    pub fn issue_token_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        now: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp(),
            exp: now.unix_timestamp() + ttl.as_secs() as i64,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> anyhow::Result<Claims> {
        self.validate_at(token, OffsetDateTime::now_utc())
    }

    /// A token is accepted strictly before `exp`.
    pub fn validate_at(&self, token: &str, now: OffsetDateTime) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // expiry is checked below against the injected clock
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let claims = data.claims;
        if now.unix_timestamp() >= claims.exp {
            anyhow::bail!("token expired");
        }
        if claims.sub.trim().is_empty() {
            anyhow::bail!("token has no subject");
        }
        debug!(subject = %claims.sub, "jwt verified");
        Ok(claims)
    }
}
