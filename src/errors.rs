// ============================================================================
// ERREURS APPLICATIVES
// ============================================================================
//
// Description:
//   Taxonomie unique des erreurs remontées par les services et les routes.
//   Chaque variante correspond à un code HTTP, le rendu JSON est centralisé
//   dans l'implémentation de ResponseError.
//
// Correspondance:
//   - NotFound        -> 404
//   - Forbidden       -> 403
//   - BadRequest      -> 400
//   - Validation      -> 400 (avec le détail des champs)
//   - Unauthenticated -> 401
//   - Conflict        -> 409
//   - Database / Io / Internal -> 500 (message masqué, détail dans les logs)
//
// ============================================================================

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: &str, id: i32) -> Self {
        AppError::NotFound(format!("{} {} not found", what, id))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(errors) => serde_json::json!({
                "error": "Validation failed",
                "details": errors
            }),
            _ if status.is_server_error() => {
                // Le détail (requête SQL, chemin disque...) reste côté serveur
                tracing::error!(error = %self, "request failed");
                serde_json::json!({ "error": "Internal server error" })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_status_codes() {
        assert_eq!(AppError::not_found("Song", 1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Unauthenticated("no".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Database(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_server_errors_hide_details() {
        let response = AppError::Database(DbErr::Custom("secret table".into())).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn test_client_errors_expose_message() {
        let response = AppError::not_found("Playlist", 42).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "Playlist 42 not found");
    }
}
