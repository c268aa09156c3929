use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{delete, get, post, put, web, HttpResponse};
use futures::TryStreamExt;
use sea_orm::DatabaseConnection;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::dto::{CreateSongRequest, UpdateSongRequest};
use crate::services::catalog::{CatalogService, UploadedFile};
use crate::utils::pagination::{Direction, PageParams, SearchParams};

/// GET /api/songs - Liste paginée et triable (PUBLIC)
#[get("")]
pub async fn list_songs(
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::list_songs(db.get_ref(), &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/songs/search?query= - Titre, artiste, album ou genre (PUBLIC)
#[get("/search")]
pub async fn search_songs(
    query: web::Query<SearchParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.page_request()?;
    let page = CatalogService::search_songs(db.get_ref(), &query.query, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/songs/genre/{genre} - Genre exact (PUBLIC)
#[get("/genre/{genre}")]
pub async fn songs_by_genre(
    path: web::Path<String>,
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_request("id", Direction::Asc)?;
    let page = CatalogService::songs_by_genre(db.get_ref(), &path, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/songs/{id} (PUBLIC)
#[get("/{id}")]
pub async fn get_song(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> AppResult<HttpResponse> {
    let song = CatalogService::get_song(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(song))
}

/// GET /api/songs/{id}/stream - Fichier audio, écoute enregistrée si connecté
#[get("/{id}/stream")]
pub async fn stream_song(
    path: web::Path<i32>,
    auth_user: Option<AuthUser>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    let listener = auth_user.map(|user| user.user_id);
    let stored =
        CatalogService::stream_song(db.get_ref(), &config.upload_dir, path.into_inner(), listener).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(stored.name)],
        })
        .no_chunking(stored.len)
        .streaming(ReaderStream::new(stored.file)))
}

/// POST /api/songs - Upload multipart: "song" (JSON) + "file" (ADMIN)
#[post("")]
pub async fn create_song(
    auth_user: AuthUser,
    mut payload: Multipart,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    // 1. Lecture des parties
    let mut metadata: Option<CreateSongRequest> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(invalid_multipart)? {
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string),
                cd.get_filename().map(str::to_string),
            ),
            None => (None, None),
        };
        let bytes = read_field(&mut field, config.max_upload_bytes).await?;

        match name.as_deref() {
            Some("song") => {
                let parsed = serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::BadRequest(format!("Invalid song metadata: {}", e)))?;
                metadata = Some(parsed);
            }
            Some("file") => {
                file = Some(UploadedFile {
                    original_name: file_name,
                    content: bytes,
                });
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    // 2. Les deux parties sont obligatoires
    let metadata = metadata.ok_or_else(|| AppError::BadRequest("Missing 'song' part".to_string()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;

    // 3. Création
    let song = CatalogService::create_song(db.get_ref(), &config.upload_dir, metadata, file).await?;
    Ok(HttpResponse::Created().json(song))
}

/// PUT /api/songs/{id} - Titre, genre, durée (ADMIN)
#[put("/{id}")]
pub async fn update_song(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateSongRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    let song = CatalogService::update_song(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(song))
}

/// DELETE /api/songs/{id} (ADMIN)
#[delete("/{id}")]
pub async fn delete_song(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    auth_user.require_admin()?;

    CatalogService::delete_song(db.get_ref(), &config.upload_dir, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Song deleted successfully"
    })))
}

/// Lit une partie en mémoire, 400 dès que `limit` octets sont dépassés
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(invalid_multipart)? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Multipart part exceeds the {} bytes upload limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn invalid_multipart(e: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", e))
}

pub fn songs_routes(cfg: &mut web::ServiceConfig) {
    // "/search" et "/genre/..." avant "/{id}"
    cfg.service(
        web::scope("/songs")
            .service(list_songs)
            .service(search_songs)
            .service(songs_by_genre)
            .service(create_song)
            .service(get_song)
            .service(stream_song)
            .service(update_song)
            .service(delete_song),
    );
}
