// ============================================================================
// SERVICE FAVORIS
// ============================================================================
//
// Points d'attention:
//   - add_favorite N'EST PAS idempotent: un doublon renvoie 400
//   - remove_favorite l'est: retirer un favori absent réussit
//   - Un morceau inconnu renvoie 404 dans les trois opérations
//
// ============================================================================

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::dto::FavoriteResponse;
use crate::models::{favorite, song};
use crate::services::catalog::{fetch_page, hydrate_songs, CatalogService};
use crate::utils::pagination::{PageRequest, PageResponse};

pub struct FavoriteService;

impl FavoriteService {
    pub async fn list_favorites(
        db: &DatabaseConnection,
        user_id: i32,
        request: &PageRequest,
    ) -> AppResult<PageResponse<FavoriteResponse>> {
        let column = request.sort_column::<favorite::Column>()?;
        let select = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by(column, request.order())
            .order_by(favorite::Column::Id, request.order());

        let (favorites, totals) = fetch_page(db, select, request).await?;

        let songs = song::Entity::find()
            .filter(song::Column::Id.is_in(favorites.iter().map(|f| f.song_id)))
            .all(db)
            .await?;
        let songs: HashMap<i32, _> = hydrate_songs(db, songs)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let items = favorites
            .into_iter()
            .filter_map(|fav| {
                let song = songs.get(&fav.song_id).cloned()?;
                Some(FavoriteResponse::new(fav, song))
            })
            .collect();

        Ok(PageResponse::new("favorites", items, request, totals))
    }

    pub async fn add_favorite(db: &DatabaseConnection, user_id: i32, song_id: i32) -> AppResult<()> {
        CatalogService::find_song(db, song_id).await?;

        if Self::find(db, user_id, song_id).await?.is_some() {
            return Err(AppError::BadRequest("Song is already in favorites".to_string()));
        }

        favorite::ActiveModel {
            user_id: Set(user_id),
            song_id: Set(song_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(user_id, song_id, "Favorite added");
        Ok(())
    }

    pub async fn remove_favorite(db: &DatabaseConnection, user_id: i32, song_id: i32) -> AppResult<()> {
        CatalogService::find_song(db, song_id).await?;

        let removed = favorite::Entity::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::SongId.eq(song_id))
            .exec(db)
            .await?;

        debug!(user_id, song_id, rows = removed.rows_affected, "Favorite removed");
        Ok(())
    }

    pub async fn is_favorite(db: &DatabaseConnection, user_id: i32, song_id: i32) -> AppResult<bool> {
        CatalogService::find_song(db, song_id).await?;
        Ok(Self::find(db, user_id, song_id).await?.is_some())
    }

    async fn find(db: &DatabaseConnection, user_id: i32, song_id: i32) -> AppResult<Option<favorite::Model>> {
        Ok(favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::SongId.eq(song_id))
            .one(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::RoleName;
    use crate::utils::pagination::{Direction, PageParams};
    use crate::utils::test_utils::TestContext;

    fn page() -> PageRequest {
        PageParams::default().into_request("createdAt", Direction::Desc).unwrap()
    }

    #[tokio::test]
    async fn test_add_twice_fails() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("fan", &[RoleName::User]).await;
        let artist = ctx.create_artist("A").await;
        let song = ctx.create_song("S", artist.id, None, None).await;

        FavoriteService::add_favorite(&ctx.db, user.id, song.id).await.unwrap();
        let duplicate = FavoriteService::add_favorite(&ctx.db, user.id, song.id).await;
        assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

        let favorites = FavoriteService::list_favorites(&ctx.db, user.id, &page()).await.unwrap();
        assert_eq!(favorites.total_items, 1);
        assert_eq!(favorites.items[0].song.title, "S");
        assert!(FavoriteService::is_favorite(&ctx.db, user.id, song.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("fan", &[RoleName::User]).await;
        let other = ctx.create_user("other", &[RoleName::User]).await;
        let artist = ctx.create_artist("A").await;
        let song = ctx.create_song("S", artist.id, None, None).await;

        FavoriteService::add_favorite(&ctx.db, other.id, song.id).await.unwrap();

        FavoriteService::remove_favorite(&ctx.db, user.id, song.id).await.unwrap();
        assert!(!FavoriteService::is_favorite(&ctx.db, user.id, song.id).await.unwrap());
        // Le favori de l'autre utilisateur est intact
        assert!(FavoriteService::is_favorite(&ctx.db, other.id, song.id).await.unwrap());

        assert!(matches!(
            FavoriteService::remove_favorite(&ctx.db, user.id, 999).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            FavoriteService::is_favorite(&ctx.db, user.id, 999).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            FavoriteService::add_favorite(&ctx.db, user.id, 999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("fan", &[RoleName::User]).await;
        let artist = ctx.create_artist("A").await;
        let first = ctx.create_song("First", artist.id, None, None).await;
        let second = ctx.create_song("Second", artist.id, None, None).await;

        FavoriteService::add_favorite(&ctx.db, user.id, first.id).await.unwrap();
        FavoriteService::add_favorite(&ctx.db, user.id, second.id).await.unwrap();

        let favorites = FavoriteService::list_favorites(&ctx.db, user.id, &page()).await.unwrap();
        let titles: Vec<_> = favorites.items.iter().map(|f| f.song.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }
}
