pub mod albums;
pub mod artists;
pub mod auth;
pub mod favorites;
pub mod health;
pub mod history;
pub mod playlists;
pub mod songs;
pub mod static_files;

use actix_web::web;

use crate::errors::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Erreurs d'extraction (query, body, path) => 400 au format { "error": ... }
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());
    let path_config = web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.service(
        web::scope("/api")
            .app_data(query_config)
            .app_data(json_config)
            .app_data(path_config)
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(songs::songs_routes)
            .configure(artists::artists_routes)
            .configure(albums::albums_routes)
            .configure(playlists::playlists_routes)
            .configure(favorites::favorites_routes)
            .configure(history::history_routes),
    );
}
