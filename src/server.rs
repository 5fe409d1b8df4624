use crate::config::ServerConfig;
use crate::server_handlers::{best_handler, help_handler, search_handler, status_handler};
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

/// Registers every route. Handlers expect a `web::Data<Semaphore>` limiting
/// concurrent searches.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/assignments/search", web::post().to(search_handler))
        .route("/assignments/best", web::post().to(best_handler))
        .route("/requirements/status", web::post().to(status_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let searches = Arc::new(Semaphore::new(config.max_searches));
    info!(
        bind = %config.bind_addr,
        max_searches = config.max_searches,
        "🚀 starting creditshift server"
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(searches.clone()))
            .configure(routes)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
