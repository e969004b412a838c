//! HS256 bearer-token issuer backed by `jsonwebtoken`.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::domain::ports::{IssuedToken, TokenClaims, TokenError, TokenIssuer, TokenRole};

/// Wire shape of the signed claims.
#[derive(Debug, Serialize)]
struct ClaimsDto<'a> {
    sub: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    role: TokenRole,
    iat: i64,
    exp: i64,
}

/// Token issuer signing HS256 tokens with a shared secret.
pub struct JwtTokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create an issuer from the shared secret and token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, claims: &TokenClaims) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let dto = ClaimsDto {
            sub: claims.subject.as_str(),
            email: claims.email.as_deref(),
            role: claims.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &dto, &self.key)
            .map_err(|error| TokenError::issue(error.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct DecodedClaims {
        sub: String,
        email: Option<String>,
        role: TokenRole,
        exp: i64,
    }

    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new("test-secret", Duration::days(7))
    }

    #[test]
    fn issued_tokens_decode_with_the_same_secret() {
        let claims = TokenClaims {
            subject: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            email: Some("asha@example.org".to_owned()),
            role: TokenRole::Citizen,
        };

        let issued = issuer().issue(&claims).expect("token issues");
        let decoded = decode::<DecodedClaims>(
            &issued.token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .expect("token decodes");

        assert_eq!(decoded.claims.sub, claims.subject);
        assert_eq!(decoded.claims.email.as_deref(), Some("asha@example.org"));
        assert_eq!(decoded.claims.role, TokenRole::Citizen);
        assert_eq!(decoded.claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn admin_tokens_omit_the_email_claim() {
        let claims = TokenClaims {
            subject: "admin".to_owned(),
            email: None,
            role: TokenRole::Admin,
        };

        let issued = issuer().issue(&claims).expect("token issues");
        let decoded = decode::<DecodedClaims>(
            &issued.token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .expect("token decodes");

        assert!(decoded.claims.email.is_none());
        assert_eq!(decoded.claims.role, TokenRole::Admin);
    }
}
