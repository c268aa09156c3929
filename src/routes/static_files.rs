// Fichiers uploadés sous /uploads et application web (SPA) pour tout le reste

use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::web;

/// À enregistrer APRÈS les routes /api: le service "/" capture tout le reste
pub fn static_routes(cfg: &mut web::ServiceConfig, upload_dir: PathBuf, static_dir: PathBuf) {
    let index = static_dir.join("index.html");

    cfg.service(Files::new("/uploads", upload_dir))
        .service(
            Files::new("/", static_dir)
                .index_file("index.html")
                .default_handler(fn_service(move |req: ServiceRequest| {
                    let index = index.clone();
                    async move {
                        // Route inconnue côté serveur: le routeur du front prend le relais
                        let (req, _) = req.into_parts();
                        let file = NamedFile::open_async(&index).await?;
                        let res = file.into_response(&req);
                        Ok(ServiceResponse::new(req, res))
                    }
                })),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;

    #[actix_web::test]
    async fn test_spa_fallback_and_uploads() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = tmp.path().join("uploads");
        let static_dir = tmp.path().join("static");
        std::fs::create_dir_all(&uploads).unwrap();
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(static_dir.join("app.js"), "console.log(1)").unwrap();
        std::fs::write(uploads.join("cover.png"), "png").unwrap();

        let app = test::init_service(
            App::new().configure(|cfg| static_routes(cfg, uploads.clone(), static_dir.clone())),
        )
        .await;

        let req = TestRequest::get().uri("/library/playlists/3").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"<html>app</html>");

        let req = TestRequest::get().uri("/app.js").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"console.log(1)");

        let req = TestRequest::get().uri("/uploads/cover.png").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
