// ============================================================================
// SERVICE CATALOGUE (artistes, albums, morceaux)
// ============================================================================
//
// Description:
//   Lecture paginée, recherche et CRUD du catalogue. Les mutations sont
//   réservées aux administrateurs (contrôle fait dans les routes avec
//   AuthUser::require_admin).
//
// Organisation:
//   - songs.rs   : morceaux, upload et streaming
//   - artists.rs : artistes (suppression en cascade)
//   - albums.rs  : albums (suppression en cascade)
//   - ce fichier : helpers partagés (pagination, hydratation, purge)
//
// Points d'attention:
//   - Les cascades sont faites à la main, dans UNE transaction, dans l'ordre
//     favoris -> historique -> liens playlist -> morceaux -> albums -> artiste
//   - Les fichiers audio ne sont supprimés qu'après le commit
//
// ============================================================================

mod albums;
mod artists;
mod songs;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::*;
use tracing::debug;

use crate::errors::AppResult;
use crate::models::dto::SongResponse;
use crate::models::{album, artist, favorite, play_history, playlist_song, song};
use crate::utils::pagination::{PageRequest, PageResponse};
use crate::utils::storage;

pub use songs::UploadedFile;

pub struct CatalogService;

/// Exécute une requête paginée: (éléments de la page, totaux)
pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    request: &PageRequest,
) -> AppResult<(Vec<E::Model>, ItemsAndPagesNumber)>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let paginator = select.paginate(db, request.size);
    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(request.page).await?;
    Ok((items, totals))
}

/// Page de morceaux avec leurs artistes et albums
pub(crate) async fn song_page(
    db: &DatabaseConnection,
    select: Select<song::Entity>,
    request: &PageRequest,
) -> AppResult<PageResponse<SongResponse>> {
    let (songs, totals) = fetch_page(db, select, request).await?;
    let items = hydrate_songs(db, songs).await?;
    Ok(PageResponse::new("songs", items, request, totals))
}

/// Charge en deux requêtes les artistes et albums référencés par les morceaux
pub(crate) async fn hydrate_songs<C: ConnectionTrait>(
    db: &C,
    songs: Vec<song::Model>,
) -> AppResult<Vec<SongResponse>> {
    if songs.is_empty() {
        return Ok(Vec::new());
    }

    let artist_ids: HashSet<i32> = songs.iter().map(|s| s.artist_id).collect();
    let album_ids: HashSet<i32> = songs.iter().filter_map(|s| s.album_id).collect();

    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let albums: HashMap<i32, album::Model> = if album_ids.is_empty() {
        HashMap::new()
    } else {
        album::Entity::find()
            .filter(album::Column::Id.is_in(album_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    };

    Ok(songs
        .into_iter()
        .map(|song| SongResponse::from_parts(song, &artists, &albums))
        .collect())
}

pub(crate) async fn hydrate_song<C: ConnectionTrait>(db: &C, song: song::Model) -> AppResult<SongResponse> {
    let mut hydrated = hydrate_songs(db, vec![song]).await?;
    hydrated
        .pop()
        .ok_or_else(|| crate::errors::AppError::Internal("Song hydration returned nothing".to_string()))
}

/// Supprime les morceaux et tout ce qui les référence.
/// À appeler dans une transaction.
pub(crate) async fn purge_songs<C: ConnectionTrait>(db: &C, song_ids: &[i32]) -> AppResult<()> {
    if song_ids.is_empty() {
        return Ok(());
    }

    let favorites = favorite::Entity::delete_many()
        .filter(favorite::Column::SongId.is_in(song_ids.iter().copied()))
        .exec(db)
        .await?;

    let history = play_history::Entity::delete_many()
        .filter(play_history::Column::SongId.is_in(song_ids.iter().copied()))
        .exec(db)
        .await?;

    let memberships = playlist_song::Entity::delete_many()
        .filter(playlist_song::Column::SongId.is_in(song_ids.iter().copied()))
        .exec(db)
        .await?;

    song::Entity::delete_many()
        .filter(song::Column::Id.is_in(song_ids.iter().copied()))
        .exec(db)
        .await?;

    debug!(
        songs = song_ids.len(),
        favorites = favorites.rows_affected,
        history = history.rows_affected,
        memberships = memberships.rows_affected,
        "Songs purged"
    );
    Ok(())
}

/// Suppression best-effort des fichiers, après le commit
pub(crate) async fn delete_files(upload_dir: &Path, file_names: &[String]) {
    for name in file_names {
        storage::delete_file(upload_dir, name).await;
    }
}

/// LOWER(<table>.<colonne>) LIKE '%query%' (query déjà en minuscules dans le motif)
pub(crate) fn lower_like<E, C>(entity: E, column: C, pattern: &str) -> SimpleExpr
where
    E: EntityTrait,
    C: ColumnTrait,
{
    Expr::expr(Func::lower(Expr::col((entity, column)))).like(pattern)
}

pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{}%", query.to_lowercase())
}
