use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyEmailQuery,
};
use crate::services::auth_service::AuthService;

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    let response = AuthService::register(db.get_ref(), config.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    let response = AuthService::login(db.get_ref(), config.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /auth/me - Vérifier le token (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let me = AuthService::me(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(me))
}

/// GET /auth/verify-email?token= (PUBLIC)
#[get("/verify-email")]
pub async fn verify_email(
    query: web::Query<VerifyEmailQuery>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    AuthService::verify_email(db.get_ref(), &query.token).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Email verified successfully"
    })))
}

/// POST /auth/forgot-password - Toujours 200, que l'email existe ou non (PUBLIC)
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    AuthService::forgot_password(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "If the email exists, a password reset link has been sent"
    })))
}

/// POST /auth/reset-password (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    AuthService::reset_password(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password reset successfully"
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(verify_email)
            .service(forgot_password)
            .service(reset_password),
    );
}
