// ============================================================================
// SERVICE D'AUTHENTIFICATION
// ============================================================================
//
// Description:
//   Inscription, connexion, vérification d'email et réinitialisation du mot
//   de passe. Émet les JWT consommés par l'extracteur AuthUser.
//
// Points d'attention:
//   - Les tokens de vérification et de reset (UUID v4) sont seulement
//     journalisés: aucun email n'est envoyé
//   - Identifiants invalides: même message pour username inconnu et mauvais
//     mot de passe
//
// ============================================================================

use sea_orm::*;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MeResponse, RegisterRequest,
    ResetPasswordRequest,
};
use crate::models::roles::RoleName;
use crate::models::{roles, user_roles, users};
use crate::utils::{jwt, password};

pub struct AuthService;

impl AuthService {
    /// Crée un compte avec le rôle ROLE_USER et retourne un JWT
    pub async fn register(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: RegisterRequest,
    ) -> AppResult<AuthResponse> {
        request.validate()?;

        // 1. Unicité du username et de l'email
        if users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .one(db)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        if users::Entity::find()
            .filter(users::Column::Email.eq(&request.email))
            .one(db)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }

        // 2. Hash du mot de passe
        let password_hash = password::hash_password(&request.password).map_err(AppError::Internal)?;

        // 3. Création de l'utilisateur et de son rôle
        let verification_token = Uuid::new_v4().to_string();
        let txn = db.begin().await?;

        let user = users::ActiveModel {
            username: Set(request.username),
            email: Set(request.email),
            password_hash: Set(password_hash),
            email_verified: Set(false),
            verification_token: Set(Some(verification_token.clone())),
            reset_password_token: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        Self::grant_roles(&txn, user.id, &[RoleName::User]).await?;
        txn.commit().await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        debug!(user_id = user.id, token = %verification_token, "Email verification token issued");

        // 4. JWT
        Self::auth_response(config, user, vec![RoleName::User])
    }

    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: LoginRequest,
    ) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::Unauthenticated("Invalid username or password".to_string());

        // 1. Trouver l'utilisateur
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .one(db)
            .await?
            .ok_or_else(invalid)?;

        // 2. Vérifier le mot de passe
        let is_valid = password::verify_password(&request.password, &user.password_hash)
            .map_err(AppError::Internal)?;
        if !is_valid {
            debug!(username = %request.username, "Login rejected");
            return Err(invalid());
        }

        // 3. Générer le JWT
        let roles = Self::roles_of(db, user.id).await?;
        Self::auth_response(config, user, roles)
    }

    pub async fn me(db: &DatabaseConnection, user_id: i32) -> AppResult<MeResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User", user_id))?;

        let roles = Self::roles_of(db, user.id).await?;

        Ok(MeResponse {
            id: user.id,
            username: user.username,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        })
    }

    /// Marque l'email comme vérifié et efface le token
    pub async fn verify_email(db: &DatabaseConnection, token: &str) -> AppResult<()> {
        let user = users::Entity::find()
            .filter(users::Column::VerificationToken.eq(token))
            .one(db)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid verification token".to_string()))?;

        let user_id = user.id;
        let mut active: users::ActiveModel = user.into();
        active.email_verified = Set(true);
        active.verification_token = Set(None);
        active.update(db).await?;

        info!(user_id, "Email verified");
        Ok(())
    }

    /// Pose un token de reset si l'email existe. Ne révèle jamais si l'email est connu.
    pub async fn forgot_password(db: &DatabaseConnection, request: ForgotPasswordRequest) -> AppResult<()> {
        request.validate()?;

        let Some(user) = users::Entity::find()
            .filter(users::Column::Email.eq(&request.email))
            .one(db)
            .await?
        else {
            debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let user_id = user.id;
        let reset_token = Uuid::new_v4().to_string();
        let mut active: users::ActiveModel = user.into();
        active.reset_password_token = Set(Some(reset_token.clone()));
        active.update(db).await?;

        debug!(user_id, token = %reset_token, "Password reset token issued");
        Ok(())
    }

    pub async fn reset_password(db: &DatabaseConnection, request: ResetPasswordRequest) -> AppResult<()> {
        request.validate()?;

        let user = users::Entity::find()
            .filter(users::Column::ResetPasswordToken.eq(&request.token))
            .one(db)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid password reset token".to_string()))?;

        let password_hash = password::hash_password(&request.new_password).map_err(AppError::Internal)?;

        let user_id = user.id;
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.reset_password_token = Set(None);
        active.update(db).await?;

        info!(user_id, "Password reset");
        Ok(())
    }

    /// Rôles d'un utilisateur, dans l'ordre de RoleName::ALL
    pub async fn roles_of<C: ConnectionTrait>(db: &C, user_id: i32) -> AppResult<Vec<RoleName>> {
        let names: Vec<String> = roles::Entity::find()
            .inner_join(user_roles::Entity)
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect();

        Ok(RoleName::ALL
            .into_iter()
            .filter(|role| names.iter().any(|name| name == role.as_str()))
            .collect())
    }

    /// Associe les rôles à l'utilisateur. Les rôles doivent déjà exister (voir DatabaseSeeder).
    pub async fn grant_roles<C: ConnectionTrait>(db: &C, user_id: i32, granted: &[RoleName]) -> AppResult<()> {
        for role in granted {
            let role_row = roles::Entity::find()
                .filter(roles::Column::Name.eq(role.as_str()))
                .one(db)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Role {} is not seeded", role)))?;

            user_roles::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(role_row.id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    fn auth_response(config: &AppConfig, user: users::Model, roles: Vec<RoleName>) -> AppResult<AuthResponse> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let token = jwt::generate_token(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            user.id,
            &user.username,
            &roles,
        )
        .map_err(AppError::Internal)?;

        Ok(AuthResponse {
            token,
            token_type: "Bearer",
            id: user.id,
            username: user.username,
            email: user.email,
            is_email_verified: user.email_verified,
            roles,
        })
    }
}
