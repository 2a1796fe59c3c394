use crate::backend::DocumentBackend;
use crate::error::AppError;
use crate::http::AppState;
use crate::types::Document;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub const TOKEN_COOKIE: &str = "token";

/// Claim set carried by a signed token. Whatever the client sent at sign-in,
/// plus the issue and expiry timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub fields: Document,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.fields.get("email").and_then(Value::as_str)
    }
}

#[derive(Clone)]
pub struct Credentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    secure_cookies: bool,
}

impl Credentials {
    pub fn new(secret: &str, lifetime: Duration, secure_cookies: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
            secure_cookies,
        }
    }

    pub fn issue_token(&self, mut fields: Document) -> Result<String, jsonwebtoken::errors::Error> {
        fields.remove("iat");
        fields.remove("exp");
        let now = Utc::now();
        let claims = Claims {
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            fields,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

pub async fn issue_token<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
    Json(fields): Json<Document>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    debug!(email = ?fields.get("email"), "Issuing token");
    let token = state.credentials.issue_token(fields)?;

    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.credentials.secure_cookies);
    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// Rejects requests without a valid token cookie and hands the decoded
/// [`Claims`] to the wrapped handler as a request extension.
pub async fn verify_token<T: DocumentBackend>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .ok_or(AppError::Unauthorized("Not Authorized"))?;

    let claims = state.credentials.verify(token.value()).map_err(|err| {
        debug!(?err, "Token rejected");
        AppError::Unauthorized("unauthorized")
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "test-secret";

    fn fields(value: Value) -> Document {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_issued_token_verifies_with_claims() {
        let credentials = Credentials::new(SECRET, Duration::hours(1), false);
        let token = credentials
            .issue_token(fields(json!({ "email": "a@b.com", "name": "Stefan" })))
            .unwrap();

        let claims = credentials.verify(&token).unwrap();
        assert_eq!(claims.email(), Some("a@b.com"));
        assert_eq!(claims.fields["name"], json!("Stefan"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_client_supplied_expiry_is_overwritten() {
        let credentials = Credentials::new(SECRET, Duration::hours(1), false);
        let token = credentials
            .issue_token(fields(json!({ "email": "a@b.com", "exp": 1 })))
            .unwrap();

        let claims = credentials.verify(&token).unwrap();
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let credentials = Credentials::new(SECRET, Duration::seconds(-10), false);
        let token = credentials
            .issue_token(fields(json!({ "email": "a@b.com" })))
            .unwrap();

        credentials.verify(&token).unwrap_err();
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = Credentials::new("other-secret", Duration::hours(1), false);
        let token = issuer
            .issue_token(fields(json!({ "email": "a@b.com" })))
            .unwrap();

        let credentials = Credentials::new(SECRET, Duration::hours(1), false);
        credentials.verify(&token).unwrap_err();
        credentials.verify("not-a-token").unwrap_err();
    }

    #[test]
    fn test_email_claim_must_be_a_string() {
        let credentials = Credentials::new(SECRET, Duration::hours(1), false);
        let token = credentials
            .issue_token(fields(json!({ "email": 42 })))
            .unwrap();

        let claims = credentials.verify(&token).unwrap();
        assert_eq!(claims.email(), None);
    }
}
