use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::services::favorite_service::FavoriteService;
use crate::utils::pagination::{Direction, PageParams};

/// GET /api/favorites - Les plus récents d'abord par défaut (PROTÉGÉE)
#[get("")]
pub async fn list_favorites(
    auth_user: AuthUser,
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("createdAt", Direction::Desc)?;
    let page = FavoriteService::list_favorites(db.get_ref(), auth_user.user_id, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/favorites/songs/{songId} - true/false (PROTÉGÉE)
#[get("/songs/{song_id}")]
pub async fn is_favorite(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let favorite = FavoriteService::is_favorite(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(favorite))
}

/// POST /api/favorites/songs/{songId} - 400 si déjà en favori (PROTÉGÉE)
#[post("/songs/{song_id}")]
pub async fn add_favorite(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    FavoriteService::add_favorite(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Song added to favorites"
    })))
}

/// DELETE /api/favorites/songs/{songId} - Idempotent (PROTÉGÉE)
#[delete("/songs/{song_id}")]
pub async fn remove_favorite(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    FavoriteService::remove_favorite(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Song removed from favorites"
    })))
}

pub fn favorites_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .service(list_favorites)
            .service(is_favorite)
            .service(add_favorite)
            .service(remove_favorite),
    );
}
