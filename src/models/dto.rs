// Requêtes et réponses de l'API REST (JSON en camelCase)
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{album, artist, favorite, play_history, playlist, song};

// ---------------------------------------------------------------------------
// Authentification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20))]
    pub username: String,
    #[validate(email, length(max = 50))]
    pub email: String,
    #[validate(length(min = 6, max = 40))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6, max = 40))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// Réponse après login/register
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_email_verified: bool,
    pub roles: Vec<String>,
}

/// Réponse pour /auth/me
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Métadonnées de la partie "song" d'un upload multipart
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(range(min = 0))]
    pub duration_seconds: Option<i32>,
    pub genre: Option<String>,
    pub artist_id: i32,
    pub album_id: Option<i32>,
}

/// Seuls le titre, le genre et la durée sont modifiables
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub genre: Option<String>,
    #[validate(range(min = 0))]
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub cover_image: Option<String>,
    pub artist_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: i32,
    pub title: String,
    pub file_path: String,
    pub duration_seconds: Option<i32>,
    pub genre: Option<String>,
    pub artist: ArtistSummary,
    pub album: Option<AlbumSummary>,
}

impl SongResponse {
    /// Assemble la réponse à partir des noms d'artistes et titres d'albums déjà chargés
    pub fn from_parts(
        song: song::Model,
        artists: &HashMap<i32, artist::Model>,
        albums: &HashMap<i32, album::Model>,
    ) -> Self {
        let artist = ArtistSummary {
            id: song.artist_id,
            name: artists
                .get(&song.artist_id)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
        };

        let album = song.album_id.and_then(|album_id| {
            albums.get(&album_id).map(|a| AlbumSummary {
                id: a.id,
                title: a.title.clone(),
            })
        });

        SongResponse {
            id: song.id,
            title: song.title,
            file_path: song.file_path,
            duration_seconds: song.duration_seconds,
            genre: song.genre,
            artist,
            album,
        }
    }
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub user_id: i32,
    pub songs: Vec<SongResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistResponse {
    pub fn new(playlist: playlist::Model, songs: Vec<SongResponse>) -> Self {
        PlaylistResponse {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            user_id: playlist.user_id,
            songs,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Favoris et historique
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: i32,
    pub song: SongResponse,
    pub created_at: DateTime<Utc>,
}

impl FavoriteResponse {
    pub fn new(favorite: favorite::Model, song: SongResponse) -> Self {
        FavoriteResponse {
            id: favorite.id,
            song,
            created_at: favorite.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayHistoryResponse {
    pub id: i32,
    pub song: SongResponse,
    pub played_at: DateTime<Utc>,
}

impl PlayHistoryResponse {
    pub fn new(entry: play_history::Model, song: SongResponse) -> Self {
        PlayHistoryResponse {
            id: entry.id,
            song,
            played_at: entry.played_at,
        }
    }
}
