// Fixtures partagées par les tests: base SQLite en mémoire, dossier d'upload
// temporaire, utilisateurs avec rôles et tokens, catalogue minimal.

use std::path::PathBuf;

use sea_orm::*;
use tempfile::TempDir;

use crate::config::AppConfig;
use crate::db;
use crate::models::roles::RoleName;
use crate::models::{album, artist, song, users};
use crate::services::auth_service::AuthService;
use crate::services::seed_service::DatabaseSeeder;
use crate::utils::{jwt, password};

pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        upload_dir: PathBuf::from("./uploads"),
        static_dir: PathBuf::from("./static"),
        max_upload_bytes: 1024 * 1024,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        host: "127.0.0.1".to_string(),
        port: 8080,
        admin: None,
    }
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    _tmp: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.upload_dir = tmp.path().join("uploads");
        config.static_dir = tmp.path().join("static");

        let db = db::establish_connection(&config.database_url).await.unwrap();
        db::ensure_schema(&db).await.unwrap();
        DatabaseSeeder::new().run(&db, &config).await.unwrap();

        TestContext { db, config, _tmp: tmp }
    }

    /// Utilisateur "<username>@example.com" avec TEST_PASSWORD (hash rapide)
    pub async fn create_user(&self, username: &str, roles: &[RoleName]) -> users::Model {
        let user = users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{}@example.com", username)),
            password_hash: Set(password::hash_with_iterations(TEST_PASSWORD, 1000).unwrap()),
            email_verified: Set(true),
            verification_token: Set(None),
            reset_password_token: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap();

        AuthService::grant_roles(&self.db, user.id, roles).await.unwrap();
        user
    }

    pub fn token_for(&self, user: &users::Model, roles: &[RoleName]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        jwt::generate_token(&self.config.jwt_secret, 1, user.id, &user.username, &roles).unwrap()
    }

    /// Utilisateur et header "Bearer <jwt>" correspondant
    pub async fn user_with_token(&self, username: &str, roles: &[RoleName]) -> (users::Model, String) {
        let user = self.create_user(username, roles).await;
        let header = format!("Bearer {}", self.token_for(&user, roles));
        (user, header)
    }

    pub async fn admin(&self) -> (users::Model, String) {
        self.user_with_token("admin", &[RoleName::User, RoleName::Admin]).await
    }

    pub async fn create_artist(&self, name: &str) -> artist::Model {
        artist::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn create_album(&self, artist_id: i32, title: &str) -> album::Model {
        album::ActiveModel {
            title: Set(title.to_string()),
            artist_id: Set(artist_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    /// Morceau avec un vrai fichier "<title>.mp3" dans le dossier d'upload
    pub async fn create_song(
        &self,
        title: &str,
        artist_id: i32,
        album_id: Option<i32>,
        genre: Option<&str>,
    ) -> song::Model {
        let file_name = format!("{}.mp3", title.replace(' ', "_"));
        std::fs::create_dir_all(&self.config.upload_dir).unwrap();
        std::fs::write(self.config.upload_dir.join(&file_name), title.as_bytes()).unwrap();

        song::ActiveModel {
            title: Set(title.to_string()),
            file_path: Set(file_name),
            genre: Set(genre.map(str::to_string)),
            artist_id: Set(artist_id),
            album_id: Set(album_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.config.upload_dir.join(name)
    }
}

pub const MULTIPART_BOUNDARY: &str = "----music-backend-test-boundary";

/// Corps multipart/form-data avec une partie "song" (JSON) et une partie "file"
pub fn multipart_body(metadata: &serde_json::Value, file_name: &str, content: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"song\"\r\n");
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    let content_type = format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY);
    (content_type, body)
}

/// App de test avec la base et la configuration du contexte
macro_rules! init_test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.db.clone()))
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .configure(crate::routes::configure_routes),
        )
        .await
    };
}

pub(crate) use init_test_app;
