// Configuration lue depuis l'environnement (.env chargé dans main)

use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Compte administrateur créé au démarrage si les trois variables sont présentes
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Taille maximale d'une partie multipart (MAX_UPLOAD_BYTES)
    pub max_upload_bytes: usize,
    pub cors_allowed_origin: String,
    pub host: String,
    pub port: u16,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture (testable sans toucher l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or("DATABASE_URL must be set in .env file")?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not found in .env, using default (INSECURE)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let jwt_expiration_hours = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 24)?;
        let port = parse_or(&lookup, "SERVER_PORT", 8080)?;
        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        let admin = match (
            lookup("ADMIN_USERNAME"),
            lookup("ADMIN_EMAIL"),
            lookup("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            upload_dir: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "./uploads".into())),
            static_dir: PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "./static".into())),
            max_upload_bytes,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            admin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("Invalid value for {}: {}", key, raw)),
        None => Ok(default),
    }
}
