//! Bearer-token verification and identity → player-profile resolution.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{models::Player, Store};
use crate::error::{AppError, Result};

/// The one normalised identity every verifier produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Turns an opaque bearer token into an identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String, // user_id
    #[serde(default)]
    email: Option<String>,
}

/// HS256 JWTs signed with a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        JwtVerifier {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            log::debug!("rejected bearer token: {e}");
            AppError::Unauthorized("invalid / expired token".into())
        })?;
        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("bad sub".into()))?;
        Ok(AuthenticatedUser {
            user_id,
            email: data.claims.email,
        })
    }
}

#[derive(Clone)]
pub struct AuthResolver {
    store: Arc<dyn Store>,
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthResolver {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn TokenVerifier>) -> Self {
        AuthResolver { store, verifier }
    }

    /// Fails with `Unauthorized` when the token is absent or rejected.
    pub async fn resolve(&self, token: Option<&str>) -> Result<AuthenticatedUser> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.verifier.verify(t).await,
            None => Err(AppError::Unauthorized("Unauthorized".into())),
        }
    }

    pub async fn resolve_player(&self, user_id: Uuid) -> Result<Player> {
        self.store
            .player_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Player profile not found"))
    }

    /// `resolve` followed by `resolve_player`.
    pub async fn resolve_request_player(&self, token: Option<&str>) -> Result<Player> {
        let user = self.resolve(token).await?;
        self.resolve_player(user.user_id).await
    }
}
