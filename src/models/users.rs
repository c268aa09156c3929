// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Colonnes de la table users:
//   - id (INTEGER, PRIMARY KEY)
//   - username (VARCHAR, UNIQUE)
//   - email (VARCHAR, UNIQUE)
//   - password_hash (VARCHAR) - Format: pbkdf2:sha256:iterations$salt$hash
//   - email_verified (BOOLEAN)
//   - verification_token (VARCHAR, NULL) - UUID v4, effacé après vérification
//   - reset_password_token (VARCHAR, NULL) - UUID v4, effacé après reset
//   - created_at (TIMESTAMP)
//
// Les rôles passent par la table de jointure user_roles.
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_roles::Entity")]
    UserRoles,

    #[sea_orm(has_many = "super::playlist::Entity")]
    Playlist,

    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorite,

    #[sea_orm(has_many = "super::play_history::Entity")]
    PlayHistory,
}

impl Related<super::user_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_roles::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_roles::Relation::User.def().rev())
    }
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Playlist.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorite.def()
    }
}

impl Related<super::play_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
