use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::ArtistRequest;
use crate::services::catalog::CatalogService;
use crate::utils::pagination::{Direction, PageParams, SearchParams};

/// GET /api/artists (PUBLIC)
#[get("")]
pub async fn list_artists(
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::list_artists(db.get_ref(), &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/artists/search?query= (PUBLIC)
#[get("/search")]
pub async fn search_artists(
    query: web::Query<SearchParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.page_request()?;
    let page = CatalogService::search_artists(db.get_ref(), &query.query, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/artists/{id} (PUBLIC)
#[get("/{id}")]
pub async fn get_artist(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let artist = CatalogService::find_artist(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(artist))
}

/// GET /api/artists/{id}/albums (PUBLIC)
#[get("/{id}/albums")]
pub async fn artist_albums(
    path: web::Path<i32>,
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::albums_by_artist(db.get_ref(), path.into_inner(), &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/artists (ADMIN)
#[post("")]
pub async fn create_artist(
    auth_user: AuthUser,
    body: web::Json<ArtistRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    let artist = CatalogService::create_artist(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(artist))
}

/// PUT /api/artists/{id} (ADMIN)
#[put("/{id}")]
pub async fn update_artist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<ArtistRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    let artist = CatalogService::update_artist(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(artist))
}

/// DELETE /api/artists/{id} - Supprime aussi ses albums et morceaux (ADMIN)
#[delete("/{id}")]
pub async fn delete_artist(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    CatalogService::delete_artist(db.get_ref(), &config.upload_dir, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Artist deleted successfully"
    })))
}

pub fn artists_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/artists")
            .service(list_artists)
            .service(search_artists)
            .service(create_artist)
            .service(get_artist)
            .service(artist_albums)
            .service(update_artist)
            .service(delete_artist),
    );
}
