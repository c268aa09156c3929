mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::seed_service::DatabaseSeeder;

fn configure_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,music_backend=debug"));

    // try_init installe aussi le pont `log` -> tracing (logs du middleware Logger)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    configure_logging();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    info!("Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::ensure_schema(&db).await.map_err(std::io::Error::other)?;
    info!("Database connected");

    DatabaseSeeder::new()
        .run(&db, &config)
        .await
        .map_err(std::io::Error::other)?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let bind = (config.host.clone(), config.port);
    info!("Starting server on http://{}:{}", bind.0, bind.1);

    let db = web::Data::new(db);
    let app_config = web::Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&app_config.cors_allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        let upload_dir = app_config.upload_dir.clone();
        let static_dir = app_config.static_dir.clone();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(app_config.clone())
            .configure(routes::configure_routes)
            .configure(|cfg| routes::static_files::static_routes(cfg, upload_dir, static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
