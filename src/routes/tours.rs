use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::language;
use crate::error::{ApiError, BookingError};
use crate::models::bookings::{BookingWindow, Participants};
use crate::models::tour::{DisplayTour, SourceTour, TourPackage, TourType};
use crate::services::catalog_service::{Catalog, PriceRange, TourFilter};
use crate::services::pricing_service::PricingService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    lang: Option<String>,
    /// `all` or a tour type.
    tour_type: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

#[derive(Deserialize)]
pub struct LangParams {
    lang: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourCard {
    #[serde(flatten)]
    pub tour: DisplayTour,
    pub promotion_active: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourList {
    pub tours: Vec<TourCard>,
    pub price_range: Option<PriceRange>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: DisplayTour,
    pub promotion_active: bool,
    pub booking_window: Option<BookingWindow>,
}

fn promotion_active<T>(tour: &TourPackage<T>, today: NaiveDate) -> bool {
    PricingService::effective_discount(tour.promotion.as_ref(), today) > 0.0
}

fn parse_filter(params: &ListParams) -> Result<TourFilter, ApiError> {
    let tour_type = match params.tour_type.as_deref() {
        None | Some("all") => None,
        Some(value) => Some(value.parse::<TourType>().map_err(ApiError::InvalidFilter)?),
    };

    if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
        if min > max {
            return Err(ApiError::InvalidFilter(format!(
                "minPrice {} is greater than maxPrice {}",
                min, max
            )));
        }
    }

    Ok(TourFilter {
        tour_type,
        min_price: params.min_price,
        max_price: params.max_price,
    })
}

fn find<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a SourceTour, ApiError> {
    catalog
        .get(id)
        .ok_or_else(|| BookingError::TourNotFound(id.to_string()).into())
}

/*
    /api/tours?lang=&tourType=&minPrice=&maxPrice=
*/
pub async fn list(
    catalog: web::Data<Catalog>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let lang = language(params.lang.as_deref())?;
    let filter = parse_filter(&params)?;
    let today = Utc::now().date_naive();

    let tours = catalog
        .filter(&filter, lang)
        .into_iter()
        .map(|tour| TourCard {
            promotion_active: promotion_active(&tour, today),
            tour,
        })
        .collect();

    Ok(HttpResponse::Ok().json(TourList {
        tours,
        price_range: catalog.price_range(),
    }))
}

/*
    /api/tours/{id}?lang=
*/
pub async fn get_by_id(
    catalog: web::Data<Catalog>,
    path: web::Path<String>,
    params: web::Query<LangParams>,
) -> Result<HttpResponse, ApiError> {
    let lang = language(params.lang.as_deref())?;
    let source = find(&catalog, &path)?;
    let now = Utc::now();

    let booking_window = source
        .schedule()
        .map(|schedule| PricingService::booking_window(&schedule, now));

    Ok(HttpResponse::Ok().json(TourDetail {
        promotion_active: promotion_active(source, now.date_naive()),
        tour: source.localize(lang),
        booking_window,
    }))
}

/*
    /api/tours/{id}/quote
*/
pub async fn quote(
    catalog: web::Data<Catalog>,
    path: web::Path<String>,
    participants: web::Json<Participants>,
) -> Result<HttpResponse, ApiError> {
    let source = find(&catalog, &path)?;
    participants.validate()?;

    let quote = PricingService::quote(
        &participants,
        &source.price,
        source.promotion.as_ref(),
        Utc::now().date_naive(),
    );
    Ok(HttpResponse::Ok().json(quote))
}
