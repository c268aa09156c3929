// Historique d'écoute: enregistré en effet de bord du streaming, jamais bloquant

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::models::dto::PlayHistoryResponse;
use crate::models::{play_history, song, users};
use crate::services::catalog::{fetch_page, hydrate_songs};
use crate::utils::pagination::{PageRequest, PageResponse};

pub struct HistoryService;

impl HistoryService {
    /// Ajoute une écoute si l'utilisateur existe. Une erreur est journalisée, jamais remontée.
    pub async fn record_play(db: &DatabaseConnection, user_id: i32, song_id: i32) {
        if let Err(e) = Self::try_record(db, user_id, song_id).await {
            warn!(user_id, song_id, error = %e, "Failed to record play history");
        }
    }

    async fn try_record(db: &DatabaseConnection, user_id: i32, song_id: i32) -> AppResult<()> {
        if users::Entity::find_by_id(user_id).one(db).await?.is_none() {
            debug!(user_id, "Unknown user, play not recorded");
            return Ok(());
        }

        play_history::ActiveModel {
            user_id: Set(user_id),
            song_id: Set(song_id),
            played_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        debug!(user_id, song_id, "Play recorded");
        Ok(())
    }

    /// Écoutes de l'utilisateur, les plus récentes d'abord
    pub async fn list_history(
        db: &DatabaseConnection,
        user_id: i32,
        request: &PageRequest,
    ) -> AppResult<PageResponse<PlayHistoryResponse>> {
        let select = play_history::Entity::find()
            .filter(play_history::Column::UserId.eq(user_id))
            .order_by_desc(play_history::Column::PlayedAt)
            .order_by_desc(play_history::Column::Id);

        let (entries, totals) = fetch_page(db, select, request).await?;

        let songs = song::Entity::find()
            .filter(song::Column::Id.is_in(entries.iter().map(|e| e.song_id)))
            .all(db)
            .await?;
        let songs: HashMap<i32, _> = hydrate_songs(db, songs)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let items = entries
            .into_iter()
            .filter_map(|entry| {
                let song = songs.get(&entry.song_id).cloned()?;
                Some(PlayHistoryResponse::new(entry, song))
            })
            .collect();

        Ok(PageResponse::new("history", items, request, totals))
    }
}
