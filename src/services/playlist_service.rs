// ============================================================================
// SERVICE PLAYLISTS
// ============================================================================
//
// Description:
//   CRUD des playlists d'un utilisateur et édition de leurs morceaux.
//
// Politique:
//   - Seul le propriétaire lit ou modifie une playlist (403 sinon, 404 si
//     l'id n'existe pas)
//   - La propriété est vérifiée AVANT la recherche du morceau
//   - Ajout et retrait de morceau sont idempotents
//
// ============================================================================

use chrono::Utc;
use sea_orm::*;
use tracing::{debug, info};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::dto::{PlaylistRequest, PlaylistResponse};
use crate::models::{playlist, playlist_song, song};
use crate::services::catalog::{hydrate_songs, CatalogService};

pub struct PlaylistService;

impl PlaylistService {
    /// Playlists de l'utilisateur, sans pagination
    pub async fn list_playlists(db: &DatabaseConnection, user_id: i32) -> AppResult<Vec<PlaylistResponse>> {
        let playlists = playlist::Entity::find()
            .filter(playlist::Column::UserId.eq(user_id))
            .order_by_asc(playlist::Column::Id)
            .all(db)
            .await?;

        let mut responses = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            responses.push(Self::to_response(db, playlist).await?);
        }
        Ok(responses)
    }

    pub async fn get_playlist(db: &DatabaseConnection, user_id: i32, id: i32) -> AppResult<PlaylistResponse> {
        let playlist = Self::find_owned(db, user_id, id).await?;
        Self::to_response(db, playlist).await
    }

    pub async fn create_playlist(
        db: &DatabaseConnection,
        user_id: i32,
        request: PlaylistRequest,
    ) -> AppResult<PlaylistResponse> {
        request.validate()?;

        let now = Utc::now();
        let playlist = playlist::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(playlist_id = playlist.id, user_id, "Playlist created");
        Ok(PlaylistResponse::new(playlist, Vec::new()))
    }

    /// Nom et description uniquement
    pub async fn update_playlist(
        db: &DatabaseConnection,
        user_id: i32,
        id: i32,
        request: PlaylistRequest,
    ) -> AppResult<PlaylistResponse> {
        request.validate()?;

        let mut active: playlist::ActiveModel = Self::find_owned(db, user_id, id).await?.into();
        active.name = Set(request.name);
        active.description = Set(request.description);
        active.updated_at = Set(Utc::now());
        let playlist = active.update(db).await?;

        info!(playlist_id = id, "Playlist updated");
        Self::to_response(db, playlist).await
    }

    pub async fn delete_playlist(db: &DatabaseConnection, user_id: i32, id: i32) -> AppResult<()> {
        Self::find_owned(db, user_id, id).await?;

        let txn = db.begin().await?;
        playlist_song::Entity::delete_many()
            .filter(playlist_song::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;
        playlist::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(playlist_id = id, "Playlist deleted");
        Ok(())
    }

    pub async fn add_song(
        db: &DatabaseConnection,
        user_id: i32,
        playlist_id: i32,
        song_id: i32,
    ) -> AppResult<PlaylistResponse> {
        // 1. Propriété puis existence du morceau
        let playlist = Self::find_owned(db, user_id, playlist_id).await?;
        CatalogService::find_song(db, song_id).await?;

        // 2. Ajout si absent
        if Self::find_membership(db, playlist_id, song_id).await?.is_some() {
            debug!(playlist_id, song_id, "Song already in playlist");
        } else {
            playlist_song::ActiveModel {
                playlist_id: Set(playlist_id),
                song_id: Set(song_id),
            }
            .insert(db)
            .await?;
            info!(playlist_id, song_id, "Song added to playlist");
        }

        let playlist = Self::touch(db, playlist).await?;
        Self::to_response(db, playlist).await
    }

    pub async fn remove_song(
        db: &DatabaseConnection,
        user_id: i32,
        playlist_id: i32,
        song_id: i32,
    ) -> AppResult<PlaylistResponse> {
        let playlist = Self::find_owned(db, user_id, playlist_id).await?;
        CatalogService::find_song(db, song_id).await?;

        let removed = playlist_song::Entity::delete_many()
            .filter(playlist_song::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_song::Column::SongId.eq(song_id))
            .exec(db)
            .await?;
        debug!(playlist_id, song_id, rows = removed.rows_affected, "Song removed from playlist");

        let playlist = Self::touch(db, playlist).await?;
        Self::to_response(db, playlist).await
    }

    /// NotFound si l'id n'existe pas, Forbidden si l'appelant n'est pas le propriétaire
    async fn find_owned(db: &DatabaseConnection, user_id: i32, id: i32) -> AppResult<playlist::Model> {
        let playlist = playlist::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Playlist", id))?;

        if playlist.user_id != user_id {
            debug!(playlist_id = id, user_id, "Playlist access denied");
            return Err(AppError::Forbidden(
                "You don't have permission to access this playlist".to_string(),
            ));
        }
        Ok(playlist)
    }

    async fn find_membership(
        db: &DatabaseConnection,
        playlist_id: i32,
        song_id: i32,
    ) -> AppResult<Option<playlist_song::Model>> {
        Ok(playlist_song::Entity::find_by_id((playlist_id, song_id)).one(db).await?)
    }

    async fn touch(db: &DatabaseConnection, playlist: playlist::Model) -> AppResult<playlist::Model> {
        let mut active: playlist::ActiveModel = playlist.into();
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    async fn to_response(db: &DatabaseConnection, playlist: playlist::Model) -> AppResult<PlaylistResponse> {
        let songs = playlist
            .find_related(song::Entity)
            .order_by_asc(song::Column::Id)
            .all(db)
            .await?;

        let songs = hydrate_songs(db, songs).await?;
        Ok(PlaylistResponse::new(playlist, songs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::RoleName;
    use crate::utils::test_utils::TestContext;

    fn request(name: &str) -> PlaylistRequest {
        PlaylistRequest {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_add_song_is_idempotent() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("owner", &[RoleName::User]).await;
        let artist = ctx.create_artist("A").await;
        let song = ctx.create_song("S", artist.id, None, None).await;

        let playlist = PlaylistService::create_playlist(&ctx.db, owner.id, request("Road trip")).await.unwrap();
        assert!(playlist.songs.is_empty());

        PlaylistService::add_song(&ctx.db, owner.id, playlist.id, song.id).await.unwrap();
        let twice = PlaylistService::add_song(&ctx.db, owner.id, playlist.id, song.id).await.unwrap();
        assert_eq!(twice.songs.len(), 1);
        assert_eq!(twice.songs[0].artist.name, "A");

        let removed = PlaylistService::remove_song(&ctx.db, owner.id, playlist.id, song.id).await.unwrap();
        assert!(removed.songs.is_empty());
        let again = PlaylistService::remove_song(&ctx.db, owner.id, playlist.id, song.id).await.unwrap();
        assert!(again.songs.is_empty());

        assert!(matches!(
            PlaylistService::add_song(&ctx.db, owner.id, playlist.id, 999).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            PlaylistService::remove_song(&ctx.db, owner.id, playlist.id, 999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ownership() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("owner", &[RoleName::User]).await;
        let intruder = ctx.create_user("intruder", &[RoleName::User]).await;

        let playlist = PlaylistService::create_playlist(&ctx.db, owner.id, request("Private")).await.unwrap();

        assert!(matches!(
            PlaylistService::get_playlist(&ctx.db, intruder.id, playlist.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            PlaylistService::get_playlist(&ctx.db, intruder.id, 999).await,
            Err(AppError::NotFound(_))
        ));
        // Propriété vérifiée avant le morceau: 403 même pour un morceau inconnu
        assert!(matches!(
            PlaylistService::add_song(&ctx.db, intruder.id, playlist.id, 999).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            PlaylistService::update_playlist(&ctx.db, intruder.id, playlist.id, request("Mine")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            PlaylistService::delete_playlist(&ctx.db, intruder.id, playlist.id).await,
            Err(AppError::Forbidden(_))
        ));

        assert!(PlaylistService::list_playlists(&ctx.db, intruder.id).await.unwrap().is_empty());
        assert_eq!(PlaylistService::list_playlists(&ctx.db, owner.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("owner", &[RoleName::User]).await;
        let artist = ctx.create_artist("A").await;
        let song = ctx.create_song("S", artist.id, None, None).await;

        let playlist = PlaylistService::create_playlist(&ctx.db, owner.id, request("Old")).await.unwrap();
        PlaylistService::add_song(&ctx.db, owner.id, playlist.id, song.id).await.unwrap();

        let updated = PlaylistService::update_playlist(
            &ctx.db,
            owner.id,
            playlist.id,
            PlaylistRequest {
                name: "New".into(),
                description: Some("Fresh".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.user_id, owner.id);
        assert_eq!(updated.songs.len(), 1);

        PlaylistService::delete_playlist(&ctx.db, owner.id, playlist.id).await.unwrap();
        assert_eq!(playlist_song::Entity::find().count(&ctx.db).await.unwrap(), 0);
        assert_eq!(song::Entity::find().count(&ctx.db).await.unwrap(), 1);
        assert!(matches!(
            PlaylistService::get_playlist(&ctx.db, owner.id, playlist.id).await,
            Err(AppError::NotFound(_))
        ));

        let invalid = PlaylistService::create_playlist(&ctx.db, owner.id, request("")).await;
        assert!(matches!(invalid, Err(AppError::Validation(_))));
    }
}
