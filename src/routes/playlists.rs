use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::PlaylistRequest;
use crate::services::playlist_service::PlaylistService;

/// GET /api/playlists - Playlists de l'utilisateur connecté (PROTÉGÉE)
#[get("")]
pub async fn list_playlists(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let playlists = PlaylistService::list_playlists(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(playlists))
}

/// GET /api/playlists/{id} (PROPRIÉTAIRE)
#[get("/{id}")]
pub async fn get_playlist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let playlist = PlaylistService::get_playlist(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(playlist))
}

/// POST /api/playlists (PROTÉGÉE)
#[post("")]
pub async fn create_playlist(
    auth_user: AuthUser,
    body: web::Json<PlaylistRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let playlist = PlaylistService::create_playlist(db.get_ref(), auth_user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(playlist))
}

/// PUT /api/playlists/{id} - Nom et description (PROPRIÉTAIRE)
#[put("/{id}")]
pub async fn update_playlist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<PlaylistRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let playlist =
        PlaylistService::update_playlist(db.get_ref(), auth_user.user_id, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(playlist))
}

/// DELETE /api/playlists/{id} (PROPRIÉTAIRE)
#[delete("/{id}")]
pub async fn delete_playlist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    PlaylistService::delete_playlist(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Playlist deleted successfully"
    })))
}

/// POST /api/playlists/{id}/songs/{songId} - Idempotent (PROPRIÉTAIRE)
#[post("/{id}/songs/{song_id}")]
pub async fn add_song(
    auth_user: AuthUser,
    path: web::Path<(i32, i32)>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let (playlist_id, song_id) = path.into_inner();
    let playlist = PlaylistService::add_song(db.get_ref(), auth_user.user_id, playlist_id, song_id).await?;
    Ok(HttpResponse::Ok().json(playlist))
}

/// DELETE /api/playlists/{id}/songs/{songId} - Idempotent (PROPRIÉTAIRE)
#[delete("/{id}/songs/{song_id}")]
pub async fn remove_song(
    auth_user: AuthUser,
    path: web::Path<(i32, i32)>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let (playlist_id, song_id) = path.into_inner();
    let playlist = PlaylistService::remove_song(db.get_ref(), auth_user.user_id, playlist_id, song_id).await?;
    Ok(HttpResponse::Ok().json(playlist))
}

pub fn playlists_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/playlists")
            .service(list_playlists)
            .service(create_playlist)
            .service(get_playlist)
            .service(update_playlist)
            .service(delete_playlist)
            .service(add_song)
            .service(remove_song),
    );
}
