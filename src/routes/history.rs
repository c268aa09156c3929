use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::services::history_service::HistoryService;
use crate::utils::pagination::{Direction, PageParams};

/// GET /api/history - Écoutes les plus récentes d'abord (PROTÉGÉE)
#[get("")]
pub async fn list_history(
    auth_user: AuthUser,
    query: web::Query<PageParams>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let request = query.into_inner().into_unsorted_request("playedAt", Direction::Desc)?;
    let page = HistoryService::list_history(db.get_ref(), auth_user.user_id, &request).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub fn history_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/history").service(list_history));
}
