use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use super::Desk;
use crate::services::catalog_service::Catalog;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(catalog: web::Data<Catalog>, desk: web::Data<Desk>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&catalog);
    health
        .services
        .insert("catalog".to_string(), catalog_result.clone());

    health.services.insert(
        "bookings".to_string(),
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} open sessions", desk.open_sessions())),
        },
    );

    // An empty catalog still serves requests, but nothing can be booked
    if catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(catalog: &Catalog) -> ServiceStatus {
    let details = format!(
        "{} tours loaded, {} rejected",
        catalog.len(),
        catalog.rejected().len()
    );
    ServiceStatus {
        status: if catalog.is_empty() { "empty" } else { "ok" }.to_string(),
        details: Some(details),
    }
}
