use std::path::Path;

use sea_orm::*;
use tracing::info;
use validator::Validate;

use super::{CatalogService, delete_files, fetch_page, like_pattern, lower_like, purge_songs};
use crate::errors::{AppError, AppResult};
use crate::models::dto::ArtistRequest;
use crate::models::{album, artist, song};
use crate::utils::pagination::{PageRequest, PageResponse};

impl CatalogService {
    pub async fn list_artists(db: &DatabaseConnection, request: &PageRequest) -> AppResult<PageResponse<artist::Model>> {
        let column = request.sort_column::<artist::Column>()?;
        let select = artist::Entity::find()
            .order_by(column, request.order())
            .order_by_asc(artist::Column::Id);

        let (artists, totals) = fetch_page(db, select, request).await?;
        Ok(PageResponse::new("artists", artists, request, totals))
    }

    pub async fn find_artist(db: &DatabaseConnection, id: i32) -> AppResult<artist::Model> {
        artist::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Artist", id))
    }

    pub async fn search_artists(
        db: &DatabaseConnection,
        query: &str,
        request: &PageRequest,
    ) -> AppResult<PageResponse<artist::Model>> {
        let select = artist::Entity::find()
            .filter(lower_like(artist::Entity, artist::Column::Name, &like_pattern(query)))
            .order_by_asc(artist::Column::Id);

        let (artists, totals) = fetch_page(db, select, request).await?;
        Ok(PageResponse::new("artists", artists, request, totals))
    }

    pub async fn create_artist(db: &DatabaseConnection, request: ArtistRequest) -> AppResult<artist::Model> {
        request.validate()?;

        let artist = artist::ActiveModel {
            name: Set(request.name),
            bio: Set(request.bio),
            profile_image: Set(request.profile_image),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(artist_id = artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    pub async fn update_artist(db: &DatabaseConnection, id: i32, request: ArtistRequest) -> AppResult<artist::Model> {
        request.validate()?;

        let mut active: artist::ActiveModel = Self::find_artist(db, id).await?.into();
        active.name = Set(request.name);
        active.bio = Set(request.bio);
        active.profile_image = Set(request.profile_image);
        let artist = active.update(db).await?;

        info!(artist_id = id, "Artist updated");
        Ok(artist)
    }

    /// Supprime l'artiste, ses albums, tous ses morceaux (y compris ceux de ses
    /// albums) et ce qui les référence
    pub async fn delete_artist(db: &DatabaseConnection, upload_dir: &Path, id: i32) -> AppResult<()> {
        Self::find_artist(db, id).await?;

        let txn = db.begin().await?;

        // 1. Albums de l'artiste
        let album_ids: Vec<i32> = album::Entity::find()
            .filter(album::Column::ArtistId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();

        // 2. Morceaux de l'artiste ou de ses albums
        let songs = song::Entity::find()
            .filter(
                Condition::any()
                    .add(song::Column::ArtistId.eq(id))
                    .add(song::Column::AlbumId.is_in(album_ids.iter().copied())),
            )
            .all(&txn)
            .await?;
        let song_ids: Vec<i32> = songs.iter().map(|s| s.id).collect();
        let files: Vec<String> = songs.into_iter().map(|s| s.file_path).collect();

        // 3. Suppression dans l'ordre des dépendances
        purge_songs(&txn, &song_ids).await?;
        album::Entity::delete_many()
            .filter(album::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;
        artist::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        // 4. Fichiers, après le commit
        delete_files(upload_dir, &files).await;

        info!(artist_id = id, albums = album_ids.len(), songs = song_ids.len(), "Artist deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{favorite, play_history, playlist, playlist_song};
    use crate::models::roles::RoleName;
    use crate::utils::pagination::{Direction, PageParams};
    use crate::utils::test_utils::TestContext;

    #[tokio::test]
    async fn test_crud_and_search() {
        let ctx = TestContext::new().await;

        let created = CatalogService::create_artist(
            &ctx.db,
            ArtistRequest {
                name: "Massive Attack".into(),
                bio: Some("Bristol".into()),
                profile_image: None,
            },
        )
        .await
        .unwrap();
        ctx.create_artist("Portishead").await;

        let request = PageParams::default().into_request("name", Direction::Asc).unwrap();
        let found = CatalogService::search_artists(&ctx.db, "attack", &request).await.unwrap();
        assert_eq!(found.items, vec![created.clone()]);

        let listed = CatalogService::list_artists(&ctx.db, &request).await.unwrap();
        assert_eq!(listed.total_items, 2);
        assert_eq!(listed.items[0].name, "Massive Attack");

        let updated = CatalogService::update_artist(
            &ctx.db,
            created.id,
            ArtistRequest {
                name: "Massive Attack".into(),
                bio: None,
                profile_image: Some("ma.jpg".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.bio, None);
        assert_eq!(updated.profile_image.as_deref(), Some("ma.jpg"));

        let too_long = CatalogService::create_artist(
            &ctx.db,
            ArtistRequest {
                name: "x".repeat(101),
                bio: None,
                profile_image: None,
            },
        )
        .await;
        assert!(matches!(too_long, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("fan", &[RoleName::User]).await;

        let doomed = ctx.create_artist("Doomed").await;
        let survivor = ctx.create_artist("Survivor").await;
        let album = ctx.create_album(doomed.id, "Last Album").await;

        let direct = ctx.create_song("Direct", doomed.id, None, None).await;
        // Morceau d'un autre artiste sur l'album de l'artiste supprimé
        let featured = ctx.create_song("Featured", survivor.id, Some(album.id), None).await;
        let safe = ctx.create_song("Safe", survivor.id, None, None).await;

        let mix = playlist::ActiveModel {
            name: Set("Mix".into()),
            user_id: Set(user.id),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&ctx.db)
        .await
        .unwrap();

        for song_id in [direct.id, featured.id, safe.id] {
            favorite::ActiveModel {
                user_id: Set(user.id),
                song_id: Set(song_id),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&ctx.db)
            .await
            .unwrap();
            play_history::ActiveModel {
                user_id: Set(user.id),
                song_id: Set(song_id),
                played_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&ctx.db)
            .await
            .unwrap();
            playlist_song::ActiveModel {
                playlist_id: Set(mix.id),
                song_id: Set(song_id),
            }
            .insert(&ctx.db)
            .await
            .unwrap();
        }

        CatalogService::delete_artist(&ctx.db, &ctx.config.upload_dir, doomed.id).await.unwrap();

        assert!(matches!(
            CatalogService::find_artist(&ctx.db, doomed.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(album::Entity::find().count(&ctx.db).await.unwrap(), 0);

        let remaining: Vec<i32> = song::Entity::find().all(&ctx.db).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(remaining, vec![safe.id]);
        assert_eq!(favorite::Entity::find().count(&ctx.db).await.unwrap(), 1);
        assert_eq!(play_history::Entity::find().count(&ctx.db).await.unwrap(), 1);
        assert_eq!(playlist_song::Entity::find().count(&ctx.db).await.unwrap(), 1);

        assert!(!ctx.upload_path(&direct.file_path).exists());
        assert!(!ctx.upload_path(&featured.file_path).exists());
        assert!(ctx.upload_path(&safe.file_path).exists());

        assert!(matches!(
            CatalogService::delete_artist(&ctx.db, &ctx.config.upload_dir, doomed.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
