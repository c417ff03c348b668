use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

use tour_catalog_api::config::AppConfig;
use tour_catalog_api::routes;
use tour_catalog_api::services::booking_service::BookingDesk;
use tour_catalog_api::services::catalog_service::Catalog;
use tour_catalog_api::services::i18n_service::Labels;
use tour_catalog_api::services::submission::SimulatedSubmitter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("Starting with {:?}", config);

    let catalog = Catalog::load(&config.catalog_path).map_err(io::Error::other)?;
    if catalog.is_empty() {
        warn!("Catalog {} has no bookable tours", config.catalog_path.display());
    }
    let labels = Labels::embedded().map_err(io::Error::other)?;

    let catalog = Arc::new(catalog);
    let desk = BookingDesk::new(
        catalog.clone(),
        SimulatedSubmitter::new(config.submission_delay),
    )
    .with_limits(config.session_idle_timeout, config.max_open_sessions);
    let desk = web::Data::new(desk);
    let catalog = web::Data::from(catalog);
    let labels = web::Data::new(labels);
    let cors_origin = config.cors_allowed_origin.clone();

    info!("Binding to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(catalog.clone())
            .app_data(labels.clone())
            .app_data(desk.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
