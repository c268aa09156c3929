// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque entité correspond à une table gérée avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - dto : Data Transfer Objects (requêtes et réponses API)
//   - users / roles / user_roles : Comptes et rôles (ROLE_USER, ROLE_ADMIN)
//   - artist / album / song : Catalogue
//   - playlist / playlist_song : Playlists et leurs morceaux
//   - favorite : Morceaux favoris d'un utilisateur
//   - play_history : Historique d'écoute
//
// Points d'attention:
//   - Les suppressions en cascade sont faites dans les services, dans une
//     transaction, dans l'ordre: dépendants d'abord, propriétaire ensuite
//   - Les tables sont créées au démarrage à partir des entités (db.rs)
//
// ============================================================================

pub mod health;
pub mod dto;
pub mod users;
pub mod roles;
pub mod user_roles;
pub mod artist;
pub mod album;
pub mod song;
pub mod playlist;
pub mod playlist_song;
pub mod favorite;
pub mod play_history;
