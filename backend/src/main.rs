mod config;
mod errors;
mod report;
mod services;
mod storage;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::storage::DocumentStore;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

/// JSON extractor settings: size limit, and malformed bodies answered as 400
/// with the usual `{message}` shape.
pub(crate) fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ServiceError::BadRequest(err.to_string()).into())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();
    let url = config.url();

    let store = DocumentStore::open(&config.db_path).map_err(|e| {
        error!("cannot open database {}: {e}", config.db_path.display());
        std::io::Error::other(e)
    })?;
    info!("Using database {}", store.path().display());

    if config.open_browser {
        let browser_url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            if let Err(e) = webbrowser::open(&browser_url) {
                log::warn!("could not open a browser: {e}");
            }
        });
    }

    info!("Server running at {}", url);

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        App::new()
            .app_data(json_config(json_limit))
            .app_data(web::Data::new(store.clone()))
            .configure(services::configure)
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
