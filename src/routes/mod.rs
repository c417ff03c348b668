pub mod bookings;
pub mod health;
pub mod labels;
pub mod tours;

use actix_web::web;

use crate::error::ApiError;
use crate::models::language::Language;
use crate::services::booking_service::BookingDesk;
use crate::services::submission::SimulatedSubmitter;

pub type Desk = BookingDesk<SimulatedSubmitter>;

/// Mounts every route. Expects `Catalog`, `Labels` and `Desk` app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(|| async { "Tour catalog API is running" }))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/tours")
                        .route("", web::get().to(tours::list))
                        .route("/{id}", web::get().to(tours::get_by_id))
                        .route("/{id}/quote", web::post().to(tours::quote)),
                )
                .route("/labels/{lang}", web::get().to(labels::get_labels))
                .service(
                    web::scope("/bookings")
                        .route("", web::post().to(bookings::open))
                        .route("/{id}", web::get().to(bookings::get))
                        .route("/{id}", web::put().to(bookings::update))
                        .route("/{id}", web::delete().to(bookings::discard))
                        .route("/{id}/submit", web::post().to(bookings::submit))
                        .route("/{id}/reset", web::post().to(bookings::reset)),
                ),
        );
}

/// `lang` query parameter; English when absent.
pub(crate) fn language(param: Option<&str>) -> Result<Language, ApiError> {
    match param {
        None => Ok(Language::default()),
        Some(code) => Ok(code.parse()?),
    }
}
