pub mod auth_service;
pub mod catalog;
pub mod favorite_service;
pub mod history_service;
pub mod playlist_service;
pub mod seed_service;
