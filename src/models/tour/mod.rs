pub mod base;
pub mod transforms;

pub use base::{
    parse_calendar_date, DisplayTour, Faq, ItineraryDay, Price, Promotion, SourceTour,
    TourPackage, TourSchedule, TourType, MAX_LEAD_HOURS,
};
