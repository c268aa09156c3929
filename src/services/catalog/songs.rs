use std::path::Path;

use sea_orm::*;
use tracing::{debug, info, warn};
use validator::Validate;

use super::{CatalogService, delete_files, hydrate_song, like_pattern, lower_like, purge_songs, song_page};
use crate::errors::{AppError, AppResult};
use crate::models::dto::{CreateSongRequest, SongResponse, UpdateSongRequest};
use crate::models::{album, artist, song};
use crate::services::history_service::HistoryService;
use crate::utils::pagination::{PageRequest, PageResponse};
use crate::utils::storage::{self, StoredFile};

/// Partie "file" d'un upload multipart
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub content: Vec<u8>,
}

impl CatalogService {
    pub async fn list_songs(db: &DatabaseConnection, request: &PageRequest) -> AppResult<PageResponse<SongResponse>> {
        let column = request.sort_column::<song::Column>()?;
        let select = song::Entity::find()
            .order_by(column, request.order())
            .order_by_asc(song::Column::Id);

        song_page(db, select, request).await
    }

    pub async fn find_song(db: &DatabaseConnection, id: i32) -> AppResult<song::Model> {
        song::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Song", id))
    }

    pub async fn get_song(db: &DatabaseConnection, id: i32) -> AppResult<SongResponse> {
        let song = Self::find_song(db, id).await?;
        hydrate_song(db, song).await
    }

    /// Recherche insensible à la casse sur titre, artiste, album et genre
    pub async fn search_songs(
        db: &DatabaseConnection,
        query: &str,
        request: &PageRequest,
    ) -> AppResult<PageResponse<SongResponse>> {
        let pattern = like_pattern(query);

        let select = song::Entity::find()
            .join(JoinType::InnerJoin, song::Relation::Artist.def())
            .join(JoinType::LeftJoin, song::Relation::Album.def())
            .filter(
                Condition::any()
                    .add(lower_like(song::Entity, song::Column::Title, &pattern))
                    .add(lower_like(artist::Entity, artist::Column::Name, &pattern))
                    .add(lower_like(album::Entity, album::Column::Title, &pattern))
                    .add(lower_like(song::Entity, song::Column::Genre, &pattern)),
            )
            .order_by_asc(song::Column::Id);

        song_page(db, select, request).await
    }

    /// Genre exact, sensible à la casse
    pub async fn songs_by_genre(
        db: &DatabaseConnection,
        genre: &str,
        request: &PageRequest,
    ) -> AppResult<PageResponse<SongResponse>> {
        let select = song::Entity::find()
            .filter(song::Column::Genre.eq(genre))
            .order_by_asc(song::Column::Id);

        song_page(db, select, request).await
    }

    /// Enregistre le fichier puis la ligne. Si l'insertion échoue, le fichier est supprimé.
    pub async fn create_song(
        db: &DatabaseConnection,
        upload_dir: &Path,
        request: CreateSongRequest,
        file: UploadedFile,
    ) -> AppResult<SongResponse> {
        // 1. Validation
        request.validate()?;

        // 2. Artiste et album référencés
        Self::find_artist(db, request.artist_id).await?;
        if let Some(album_id) = request.album_id {
            Self::find_album(db, album_id).await?;
        }

        // 3. Fichier
        let file_name = storage::save_file(upload_dir, &file.content, file.original_name.as_deref())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to store uploaded file");
                AppError::BadRequest(format!("Could not store file: {}", e))
            })?;

        // 4. Ligne en base
        let inserted = song::ActiveModel {
            title: Set(request.title),
            file_path: Set(file_name.clone()),
            duration_seconds: Set(request.duration_seconds),
            genre: Set(request.genre),
            artist_id: Set(request.artist_id),
            album_id: Set(request.album_id),
            ..Default::default()
        }
        .insert(db)
        .await;

        let song = match inserted {
            Ok(song) => song,
            Err(e) => {
                storage::delete_file(upload_dir, &file_name).await;
                return Err(e.into());
            }
        };

        info!(song_id = song.id, file = %song.file_path, "Song created");
        hydrate_song(db, song).await
    }

    /// Titre, genre et durée uniquement. Le fichier et les relations ne changent pas.
    pub async fn update_song(db: &DatabaseConnection, id: i32, request: UpdateSongRequest) -> AppResult<SongResponse> {
        request.validate()?;

        let song = Self::find_song(db, id).await?;

        let mut active: song::ActiveModel = song.into();
        active.title = Set(request.title);
        active.genre = Set(request.genre);
        active.duration_seconds = Set(request.duration_seconds);
        let song = active.update(db).await?;

        info!(song_id = id, "Song updated");
        hydrate_song(db, song).await
    }

    pub async fn delete_song(db: &DatabaseConnection, upload_dir: &Path, id: i32) -> AppResult<()> {
        let song = Self::find_song(db, id).await?;

        // 1. Fichier (best-effort)
        delete_files(upload_dir, std::slice::from_ref(&song.file_path)).await;

        // 2. Dépendants et ligne
        let txn = db.begin().await?;
        purge_songs(&txn, &[song.id]).await?;
        txn.commit().await?;

        info!(song_id = id, "Song deleted");
        Ok(())
    }

    /// Ouvre le fichier du morceau et enregistre l'écoute si l'appelant est connu
    pub async fn stream_song(
        db: &DatabaseConnection,
        upload_dir: &Path,
        id: i32,
        listener: Option<i32>,
    ) -> AppResult<StoredFile> {
        let song = Self::find_song(db, id).await?;
        let stored = storage::load_file(upload_dir, &song.file_path).await?;

        match listener {
            Some(user_id) => HistoryService::record_play(db, user_id, song.id).await,
            None => debug!(song_id = song.id, "Anonymous stream, history not recorded"),
        }

        Ok(stored)
    }
}
