mod config;
mod services;
mod upstream;

use crate::config::Settings;
use crate::upstream::state::UpstreamState;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use clap::Parser;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{info, warn};
use mime_guess::from_path;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Looks up `path` in the bundled client. Unknown paths get `index.html` so
/// the client router can handle deep links.
fn embedded_file(dir: &Dir<'_>, path: &str) -> HttpResponse {
    let path = path.trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match dir.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match dir.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    embedded_file(&STATIC_DIR, req.path())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let settings = Settings::parse();
    let url = settings.url();
    let client_config = web::Data::new(settings.client_config());
    let upstream = UpstreamState::new(settings.upstream.clone(), settings.upstream_timeout());

    if STATIC_DIR.get_file("index.html").is_none() {
        warn!("client bundle not embedded; only /api and /client-config are served");
    }

    if settings.open_browser {
        let url = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            if let Err(err) = webbrowser::open(&url) {
                warn!("could not open a browser: {err}");
            }
        });
    }

    info!("Server running at {}, forwarding /api to {}", url, settings.upstream);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(upstream.client()))
            .app_data(web::Data::new(upstream.clone()))
            .app_data(client_config.clone())
            .service(services::client_config::configure_routes())
            .service(services::proxy::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind((settings.host.as_str(), settings.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use common::config::ClientConfig;
    use include_dir::{DirEntry, File};

    static BUNDLE_ENTRIES: [DirEntry<'static>; 2] = [
        DirEntry::File(File::new("index.html", b"<html>app</html>")),
        DirEntry::File(File::new("app.css", b"body {}")),
    ];
    static BUNDLE: Dir<'static> = Dir::new("", &BUNDLE_ENTRIES);

    async fn serve_test_bundle(req: HttpRequest) -> HttpResponse {
        embedded_file(&BUNDLE, req.path())
    }

    #[actix_web::test]
    async fn serves_bundle_files_with_their_mime_type() {
        let app = test::init_service(
            App::new().default_service(web::route().to(serve_test_bundle)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/app.css").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "text/css");
    }

    #[actix_web::test]
    async fn unknown_paths_fall_back_to_index() {
        let app = test::init_service(
            App::new().default_service(web::route().to(serve_test_bundle)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/history/upload").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "<html>app</html>".as_bytes());
    }

    #[actix_web::test]
    async fn publishes_client_config() {
        let config = ClientConfig {
            poll_interval_ms: 250,
            ..ClientConfig::default()
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(services::client_config::configure_routes()),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/client-config").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["pollIntervalMs"], 250);
        assert_eq!(body["pageSizes"], serde_json::json!([20, 50, 100]));
    }
}
