// ============================================================================
// MODÈLE : SONGS
// ============================================================================
//
// Colonnes de la table songs:
//   - id (INTEGER, PRIMARY KEY)
//   - title (VARCHAR(100), NOT NULL)
//   - file_path (VARCHAR, NOT NULL) - nom généré dans le dossier d'upload
//   - duration_seconds (INTEGER, NULL)
//   - genre (VARCHAR, NULL) - texte libre
//   - artist_id (INTEGER, NOT NULL, FK vers artists)
//   - album_id (INTEGER, NULL, FK vers albums)
//
// Points d'attention:
//   - Pas de ON DELETE CASCADE en base: la suppression des favoris,
//     de l'historique et des liens playlist est faite explicitement
//     dans la même transaction (voir services::catalog)
//   - file_path n'est jamais modifié après la création
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub title: String,
    pub file_path: String,
    pub duration_seconds: Option<i32>,
    pub genre: Option<String>,
    pub artist_id: i32,
    pub album_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id"
    )]
    Artist,

    #[sea_orm(
        belongs_to = "super::album::Entity",
        from = "Column::AlbumId",
        to = "super::album::Column::Id"
    )]
    Album,

    #[sea_orm(has_many = "super::playlist_song::Entity")]
    PlaylistSong,

    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorite,

    #[sea_orm(has_many = "super::play_history::Entity")]
    PlayHistory,
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        super::playlist_song::Relation::Playlist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::playlist_song::Relation::Song.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
