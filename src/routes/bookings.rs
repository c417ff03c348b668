use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::Desk;
use crate::error::ApiError;
use crate::models::bookings::BookingDraftPatch;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenBooking {
    tour_id: String,
}

/*
    POST /api/bookings
*/
pub async fn open(
    desk: web::Data<Desk>,
    input: web::Json<OpenBooking>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = desk.open(&input.tour_id, Utc::now())?;
    Ok(HttpResponse::Created().json(snapshot))
}

/*
    GET /api/bookings/{id}
*/
pub async fn get(desk: web::Data<Desk>, path: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let snapshot = desk.get(path.into_inner(), Utc::now())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/*
    PUT /api/bookings/{id}
*/
pub async fn update(
    desk: web::Data<Desk>,
    path: web::Path<Uuid>,
    patch: web::Json<BookingDraftPatch>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = desk.update(path.into_inner(), patch.into_inner(), Utc::now())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/*
    POST /api/bookings/{id}/submit
*/
pub async fn submit(
    desk: web::Data<Desk>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let confirmation = desk.submit(path.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(confirmation))
}

/*
    POST /api/bookings/{id}/reset
*/
pub async fn reset(desk: web::Data<Desk>, path: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let snapshot = desk.reset(path.into_inner(), Utc::now())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/*
    DELETE /api/bookings/{id}
*/
pub async fn discard(
    desk: web::Data<Desk>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    desk.discard(path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
