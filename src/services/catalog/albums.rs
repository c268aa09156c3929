use std::path::Path;

use sea_orm::*;
use tracing::info;
use validator::Validate;

use super::{CatalogService, delete_files, fetch_page, like_pattern, lower_like, purge_songs, song_page};
use crate::errors::{AppError, AppResult};
use crate::models::dto::{CreateAlbumRequest, SongResponse, UpdateAlbumRequest};
use crate::models::{album, song};
use crate::utils::pagination::{PageRequest, PageResponse};

impl CatalogService {
    pub async fn list_albums(db: &DatabaseConnection, request: &PageRequest) -> AppResult<PageResponse<album::Model>> {
        let column = request.sort_column::<album::Column>()?;
        let select = album::Entity::find()
            .order_by(column, request.order())
            .order_by_asc(album::Column::Id);

        let (albums, totals) = fetch_page(db, select, request).await?;
        Ok(PageResponse::new("albums", albums, request, totals))
    }

    pub async fn find_album(db: &DatabaseConnection, id: i32) -> AppResult<album::Model> {
        album::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Album", id))
    }

    pub async fn search_albums(
        db: &DatabaseConnection,
        query: &str,
        request: &PageRequest,
    ) -> AppResult<PageResponse<album::Model>> {
        let select = album::Entity::find()
            .filter(lower_like(album::Entity, album::Column::Title, &like_pattern(query)))
            .order_by_asc(album::Column::Id);

        let (albums, totals) = fetch_page(db, select, request).await?;
        Ok(PageResponse::new("albums", albums, request, totals))
    }

    pub async fn albums_by_artist(
        db: &DatabaseConnection,
        artist_id: i32,
        request: &PageRequest,
    ) -> AppResult<PageResponse<album::Model>> {
        Self::find_artist(db, artist_id).await?;

        let column = request.sort_column::<album::Column>()?;
        let select = album::Entity::find()
            .filter(album::Column::ArtistId.eq(artist_id))
            .order_by(column, request.order())
            .order_by_asc(album::Column::Id);

        let (albums, totals) = fetch_page(db, select, request).await?;
        Ok(PageResponse::new("albums", albums, request, totals))
    }

    pub async fn songs_by_album(
        db: &DatabaseConnection,
        album_id: i32,
        request: &PageRequest,
    ) -> AppResult<PageResponse<SongResponse>> {
        Self::find_album(db, album_id).await?;

        let column = request.sort_column::<song::Column>()?;
        let select = song::Entity::find()
            .filter(song::Column::AlbumId.eq(album_id))
            .order_by(column, request.order())
            .order_by_asc(song::Column::Id);

        song_page(db, select, request).await
    }

    pub async fn create_album(db: &DatabaseConnection, request: CreateAlbumRequest) -> AppResult<album::Model> {
        request.validate()?;
        Self::find_artist(db, request.artist_id).await?;

        let album = album::ActiveModel {
            title: Set(request.title),
            release_date: Set(request.release_date),
            cover_image: Set(request.cover_image),
            artist_id: Set(request.artist_id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(album_id = album.id, artist_id = album.artist_id, "Album created");
        Ok(album)
    }

    /// L'artiste d'un album n'est jamais modifié
    pub async fn update_album(db: &DatabaseConnection, id: i32, request: UpdateAlbumRequest) -> AppResult<album::Model> {
        request.validate()?;

        let mut active: album::ActiveModel = Self::find_album(db, id).await?.into();
        active.title = Set(request.title);
        active.release_date = Set(request.release_date);
        active.cover_image = Set(request.cover_image);
        let album = active.update(db).await?;

        info!(album_id = id, "Album updated");
        Ok(album)
    }

    pub async fn delete_album(db: &DatabaseConnection, upload_dir: &Path, id: i32) -> AppResult<()> {
        Self::find_album(db, id).await?;

        let txn = db.begin().await?;

        let songs = song::Entity::find()
            .filter(song::Column::AlbumId.eq(id))
            .all(&txn)
            .await?;
        let song_ids: Vec<i32> = songs.iter().map(|s| s.id).collect();
        let files: Vec<String> = songs.into_iter().map(|s| s.file_path).collect();

        purge_songs(&txn, &song_ids).await?;
        album::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        delete_files(upload_dir, &files).await;

        info!(album_id = id, songs = song_ids.len(), "Album deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::artist;
    use crate::utils::pagination::{Direction, PageParams};
    use crate::utils::test_utils::TestContext;

    fn page() -> PageRequest {
        PageParams::default().into_request("id", Direction::Asc).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let ctx = TestContext::new().await;
        let artist = ctx.create_artist("Radiohead").await;

        let missing_artist = CatalogService::create_album(
            &ctx.db,
            CreateAlbumRequest {
                title: "Kid A".into(),
                release_date: None,
                cover_image: None,
                artist_id: artist.id + 1,
            },
        )
        .await;
        assert!(matches!(missing_artist, Err(AppError::NotFound(_))));

        let album = CatalogService::create_album(
            &ctx.db,
            CreateAlbumRequest {
                title: "Kid A".into(),
                release_date: NaiveDate::from_ymd_opt(2000, 10, 2),
                cover_image: None,
                artist_id: artist.id,
            },
        )
        .await
        .unwrap();

        let updated = CatalogService::update_album(
            &ctx.db,
            album.id,
            UpdateAlbumRequest {
                title: "Kid A Mnesia".into(),
                release_date: album.release_date,
                cover_image: Some("kida.png".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Kid A Mnesia");
        assert_eq!(updated.artist_id, artist.id);
        assert_eq!(updated.release_date, NaiveDate::from_ymd_opt(2000, 10, 2));

        let found = CatalogService::search_albums(&ctx.db, "MNESIA", &page()).await.unwrap();
        assert_eq!(found.items.len(), 1);
    }

    #[tokio::test]
    async fn test_listing_by_artist_and_album() {
        let ctx = TestContext::new().await;
        let artist = ctx.create_artist("Autechre").await;
        let other = ctx.create_artist("Boards of Canada").await;
        let amber = ctx.create_album(artist.id, "Amber").await;
        ctx.create_album(other.id, "Geogaddi").await;
        ctx.create_song("Foil", artist.id, Some(amber.id), None).await;
        ctx.create_song("Loose", artist.id, None, None).await;

        let albums = CatalogService::albums_by_artist(&ctx.db, artist.id, &page()).await.unwrap();
        assert_eq!(albums.items, vec![amber.clone()]);

        let songs = CatalogService::songs_by_album(&ctx.db, amber.id, &page()).await.unwrap();
        assert_eq!(songs.total_items, 1);
        assert_eq!(songs.items[0].title, "Foil");

        assert!(matches!(
            CatalogService::albums_by_artist(&ctx.db, 999, &page()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            CatalogService::songs_by_album(&ctx.db, 999, &page()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_songs_only() {
        let ctx = TestContext::new().await;
        let artist = ctx.create_artist("Low").await;
        let album = ctx.create_album(artist.id, "Double Negative").await;
        let on_album = ctx.create_song("Quorum", artist.id, Some(album.id), None).await;
        let loose = ctx.create_song("Loose", artist.id, None, None).await;

        CatalogService::delete_album(&ctx.db, &ctx.config.upload_dir, album.id).await.unwrap();

        assert_eq!(album::Entity::find().count(&ctx.db).await.unwrap(), 0);
        assert_eq!(artist::Entity::find().count(&ctx.db).await.unwrap(), 1);
        let remaining: Vec<i32> = song::Entity::find().all(&ctx.db).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(remaining, vec![loose.id]);
        assert!(!ctx.upload_path(&on_album.file_path).exists());
    }
}
