use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use tour_catalog_api::routes::{self, Desk};
use tour_catalog_api::services::booking_service::BookingDesk;
use tour_catalog_api::services::catalog_service::Catalog;
use tour_catalog_api::services::i18n_service::Labels;
use tour_catalog_api::services::submission::SimulatedSubmitter;

pub struct TestApp {
    pub catalog: web::Data<Catalog>,
    pub labels: web::Data<Labels>,
    pub desk: web::Data<Desk>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let catalog = Arc::new(
            Catalog::from_json(&test_catalog().to_string()).expect("test catalog must parse"),
        );
        let desk = BookingDesk::new(catalog.clone(), SimulatedSubmitter::new(delay));

        Self {
            catalog: web::Data::from(catalog),
            labels: web::Data::new(Labels::embedded().expect("embedded labels must parse")),
            desk: web::Data::new(desk),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.catalog.clone())
            .app_data(self.labels.clone())
            .app_data(self.desk.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

/// Three valid tours plus one record with no English name, which the
/// catalog must reject.
pub fn test_catalog() -> serde_json::Value {
    json!([
        {
            "id": "phi-phi",
            "name": { "en": "Phi Phi Islands", "id": "Pulau Phi Phi", "ru": "Острова Пхи-Пхи" },
            "duration": { "en": "Full day", "id": "Sehari penuh", "ru": "Весь день" },
            "location": { "en": "Phuket", "ru": "Пхукет" },
            "price": { "adult": 1000, "child": 500, "infant": 0 },
            "originalPrice": 1400,
            "images": ["https://images.example.com/phi-phi.jpg"],
            "overview": { "en": "Speedboat trip", "id": "Perjalanan speedboat", "ru": "Поездка на катере" },
            "highlights": [
                { "en": "Maya Bay", "id": "Teluk Maya", "ru": "Бухта Майя" },
                { "en": "Snorkeling" }
            ],
            "itinerary": [
                {
                    "day": 1,
                    "title": { "en": "Island hopping", "id": "Jelajah pulau", "ru": "Тур по островам" },
                    "activities": [{ "en": "Pickup", "id": "Penjemputan", "ru": "Трансфер" }],
                    "meals": [{ "en": "Lunch", "id": "Makan siang", "ru": "Обед" }]
                }
            ],
            "included": [{ "en": "Lunch", "id": "Makan siang", "ru": "Обед" }],
            "excluded": [{ "en": "Park fee" }],
            "promotions": {
                "type": { "en": "Early bird", "id": "Pesan awal", "ru": "Ранняя бронь" },
                "discount": 10,
                "validUntil": "2099-12-31"
            },
            "faqs": [
                {
                    "question": { "en": "Is it safe?", "id": "Apakah aman?", "ru": "Это безопасно?" },
                    "answer": { "en": "Yes" }
                }
            ],
            "tourType": "day-trip",
            "minBookingHours": 24
        },
        {
            "id": "similan",
            "name": { "en": "Similan Liveaboard", "ru": "Симиланы" },
            "duration": { "en": "3 days" },
            "location": { "en": "Khao Lak" },
            "price": { "adult": 9000, "child": 7000, "infant": 0 },
            "overview": { "en": "Diving trip" },
            "promotions": {
                "type": { "en": "Summer sale" },
                "discount": 25,
                "validUntil": "2020-01-31"
            },
            "tourType": "open-trip",
            "openTripDate": "2099-06-15",
            "minBookingHours": 48
        },
        {
            "id": "food-walk",
            "name": { "en": "Old Town Food Walk" },
            "duration": { "en": "4 hours" },
            "location": { "en": "Phuket Town" },
            "price": { "adult": 600, "child": 300 },
            "overview": { "en": "Street food tasting" },
            "promotions": {
                "type": { "en": "Broken deal" },
                "discount": 150,
                "validUntil": "2099-12-31"
            },
            "tourType": "other"
        },
        {
            "id": "no-english",
            "name": { "id": "Tanpa bahasa Inggris" },
            "duration": { "en": "1 day" },
            "location": { "en": "Krabi" },
            "price": { "adult": 700, "child": 350 },
            "overview": { "en": "Broken record" },
            "tourType": "day-trip"
        }
    ])
}

pub fn guest() -> serde_json::Value {
    json!({
        "familyName": "Santoso",
        "firstName": "Budi",
        "email": "budi@example.com",
        "phone": "+62 812 3456 7890",
        "nationality": "Indonesia",
        "hotelPickup": "Patong Beach Hotel"
    })
}
