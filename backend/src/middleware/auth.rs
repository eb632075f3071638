//! Authentication middleware
//!
//! Validates bearer JWTs and attaches the authenticated user to the request.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;
use crate::AppState;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub role: String,
}

/// Authentication middleware that validates JWT tokens
///
/// Extracts the bearer token from the Authorization header and validates it
/// against the configured signing secret.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let claims = match decode_jwt(token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Refresh tokens cannot be used to access resources
    if claims.token_kind == "refresh" {
        return unauthorized_response("Refresh token cannot be used for API access");
    }

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        user_id,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    token_kind: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn signed_token(secret: &str, token_kind: &str) -> String {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "mechanic@garage.lk".to_string(),
            role: "staff".to_string(),
            token_kind: token_kind.to_string(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn token_decodes_with_the_signing_secret() {
        let token = signed_token("configured-secret", "access");
        let claims = decode_jwt(&token, "configured-secret").unwrap();
        assert_eq!(claims.email, "mechanic@garage.lk");
        assert_eq!(claims.token_kind, "access");
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let token = signed_token("some-other-secret", "access");
        assert!(decode_jwt(&token, "configured-secret").is_err());
    }

    #[test]
    fn token_signed_with_a_guessed_development_secret_is_rejected() {
        let token = signed_token("development-secret-key", "access");
        assert!(decode_jwt(&token, "configured-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "mechanic@garage.lk".to_string(),
            role: "staff".to_string(),
            token_kind: "access".to_string(),
            exp: (now - chrono::Duration::hours(2)).timestamp(),
            iat: (now - chrono::Duration::hours(3)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"configured-secret"),
        )
        .unwrap();
        assert!(decode_jwt(&token, "configured-secret").is_err());
    }
}
