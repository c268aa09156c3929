// ============================================================================
// GARDE D'AUTORISATION
// ============================================================================
//
// Description:
//   Extracteur Actix qui résout l'appelant (id, username, rôles) à partir du
//   header "Authorization: Bearer <jwt>".
//
// Politiques:
//   - "doit être authentifié": ajouter AuthUser aux paramètres du handler
//   - "doit avoir le rôle ADMIN": appeler auth_user.require_admin()? en tête
//     du handler
//   - authentification optionnelle: Option<AuthUser> (None si header absent
//     ou token invalide)
//
// Points d'attention:
//   - Les contrôles de propriété (playlist, favoris) ne sont PAS faits ici:
//     chaque service compare user_id lui-même
//
// ============================================================================

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::roles::RoleName;
use crate::utils::jwt;

/// Utilisateur authentifié, utilisé comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<RoleName>,
}

impl AuthUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    pub fn require_role(&self, role: RoleName) -> AppResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            debug!(user_id = self.user_id, %role, "Missing role");
            Err(AppError::Forbidden(format!("{} role required", role)))
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        self.require_role(RoleName::Admin)
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> AppResult<AuthUser> {
    // 1. Configuration (secret JWT)
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AppError::Internal("AppConfig is not registered".to_string()))?;

    // 2. Header Authorization
    let auth_str = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid Authorization header".to_string()))?;

    // 3. Token (format: "Bearer <token>")
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthenticated("Invalid Authorization format (expected: Bearer <token>)".to_string())
    })?;

    // 4. Vérification du JWT
    let claims = jwt::verify_token(&config.jwt_secret, token).map_err(AppError::Unauthenticated)?;

    // 5. Rôles inconnus ignorés
    let roles = claims
        .roles
        .iter()
        .filter_map(|role| role.parse::<RoleName>().ok())
        .collect();

    Ok(AuthUser {
        user_id: claims.sub,
        username: claims.username,
        roles,
    })
}
