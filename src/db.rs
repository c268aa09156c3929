// ============================================================================
// CONNEXION BD ET SCHÉMA
// ============================================================================
//
// Description:
//   Ouvre le pool de connexions SeaORM et crée les tables manquantes à partir
//   des entités (CREATE TABLE IF NOT EXISTS).
//
// Points d'attention:
//   - L'ordre de création suit les clés étrangères: une table est toujours
//     créée après celles qu'elle référence
//   - En test, "sqlite::memory:" avec UNE seule connexion (chaque connexion
//     SQLite en mémoire a sa propre base)
//
// ============================================================================

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::{debug, info};

use crate::models::{
    album, artist, favorite, play_history, playlist, playlist_song, roles, song, user_roles, users,
};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    Database::connect(options).await
}

/// Crée toutes les tables de l'application si elles n'existent pas
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, roles::Entity).await?;
    create_table(db, user_roles::Entity).await?;
    create_table(db, artist::Entity).await?;
    create_table(db, album::Entity).await?;
    create_table(db, song::Entity).await?;
    create_table(db, playlist::Entity).await?;
    create_table(db, playlist_song::Entity).await?;
    create_table(db, favorite::Entity).await?;
    create_table(db, play_history::Entity).await?;

    info!("Database schema ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    debug!(table = entity.table_name(), "Table checked");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, PaginatorTrait, Set};

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        ensure_schema(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();

        artist::ActiveModel {
            name: Set("Daft Punk".into()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[test]
    fn test_song_title_is_bounded() {
        let backend = sea_orm::DbBackend::Postgres;
        let statement = backend.build(&Schema::new(backend).create_table_from_entity(song::Entity));

        assert!(statement.sql.contains(r#""title" varchar(100) NOT NULL"#), "{}", statement.sql);
    }
}
