use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::{CreateAlbumRequest, UpdateAlbumRequest};
use crate::services::catalog::CatalogService;
use crate::utils::pagination::{Direction, PageParams, SearchParams};

/// GET /api/albums (PUBLIC)
#[get("")]
pub async fn list_albums(
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::list_albums(db.get_ref(), &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/albums/search?query= (PUBLIC)
#[get("/search")]
pub async fn search_albums(
    query: web::Query<SearchParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.page_request()?;
    let page = CatalogService::search_albums(db.get_ref(), &query.query, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/albums/{id} (PUBLIC)
#[get("/{id}")]
pub async fn get_album(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let album = CatalogService::find_album(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(album))
}

/// GET /api/albums/{id}/songs (PUBLIC)
#[get("/{id}/songs")]
pub async fn album_songs(
    path: web::Path<i32>,
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::songs_by_album(db.get_ref(), path.into_inner(), &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/albums (ADMIN)
#[post("")]
pub async fn create_album(
    auth_user: AuthUser,
    body: web::Json<CreateAlbumRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    let album = CatalogService::create_album(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(album))
}

/// PUT /api/albums/{id} (ADMIN)
#[put("/{id}")]
pub async fn update_album(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateAlbumRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    let album = CatalogService::update_album(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(album))
}

/// DELETE /api/albums/{id} - Supprime aussi ses morceaux (ADMIN)
#[delete("/{id}")]
pub async fn delete_album(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    CatalogService::delete_album(db.get_ref(), &config.upload_dir, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Album deleted successfully"
    })))
}

pub fn albums_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/albums")
            .service(list_albums)
            .service(search_albums)
            .service(create_album)
            .service(get_album)
            .service(album_songs)
            .service(update_album)
            .service(delete_album),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{json, Value};

    use crate::utils::test_utils::{init_test_app, TestContext};

    #[actix_web::test]
    async fn test_album_endpoints() {
        let ctx = TestContext::new().await;
        let (_, admin) = ctx.admin().await;
        let artist = ctx.create_artist("Stereolab").await;
        let app = init_test_app!(ctx);

        let req = TestRequest::post()
            .uri("/api/albums")
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({ "title": "Dots and Loops", "releaseDate": "1997-09-22", "artistId": artist.id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let album: Value = test::read_body_json(resp).await;
        assert_eq!(album["releaseDate"], "1997-09-22");
        let id = album["id"].as_i64().unwrap();

        let req = TestRequest::post()
            .uri("/api/albums")
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({ "title": "Orphan", "artistId": 999 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        ctx.create_song("Brakhage", artist.id, Some(id as i32), None).await;
        let req = TestRequest::get().uri(&format!("/api/albums/{}/songs", id)).to_request();
        let page: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["songs"][0]["album"]["title"], "Dots and Loops");

        let req = TestRequest::get().uri("/api/albums?sortBy=title&direction=desc").to_request();
        let page: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["totalItems"], 1);

        let req = TestRequest::delete()
            .uri(&format!("/api/albums/{}", id))
            .insert_header(("Authorization", admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = TestRequest::get().uri(&format!("/api/albums/{}", id)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
