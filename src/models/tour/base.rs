use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::language::LocalizedText;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourType {
    #[serde(rename = "day-trip")]
    DayTrip,
    #[serde(rename = "open-trip")]
    OpenTrip,
    #[serde(rename = "other")]
    Other,
}

impl std::str::FromStr for TourType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day-trip" => Ok(TourType::DayTrip),
            "open-trip" => Ok(TourType::OpenTrip),
            "other" => Ok(TourType::Other),
            other => Err(format!("unknown tour type `{}`", other)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Price {
    pub adult: f64,
    pub child: f64,
    #[serde(default)]
    pub infant: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItineraryDay<T> {
    pub day: u32,
    pub title: T,
    #[serde(default)]
    pub activities: Vec<T>,
    #[serde(default)]
    pub meals: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<T>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Faq<T> {
    pub question: T,
    pub answer: T,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Promotion<T> {
    #[serde(rename = "type")]
    pub kind: T,
    pub discount: f64,
    pub valid_until: String,
}

/// A tour package whose text fields are stored as `T`.
///
/// The catalog holds `TourPackage<LocalizedText>`; clients receive
/// `TourPackage<String>` resolved for a single language.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct TourPackage<T> {
    pub id: String,
    pub name: T,
    pub duration: T,
    pub location: T,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub overview: T,
    #[serde(default)]
    pub highlights: Vec<T>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay<T>>,
    #[serde(default)]
    pub included: Vec<T>,
    #[serde(default)]
    pub excluded: Vec<T>,
    #[serde(rename = "promotions", default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion<T>>,
    #[serde(default)]
    pub faqs: Vec<Faq<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_type: Option<TourType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_trip_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_rounded_hours",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_booking_hours: Option<u32>,
}

/// Longest accepted lead time: one leap year.
pub const MAX_LEAD_HOURS: u32 = 24 * 366;

pub type SourceTour = TourPackage<LocalizedText>;
pub type DisplayTour = TourPackage<String>;

/// How the booking date of a tour is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourSchedule {
    /// Every guest travels on the same departure date.
    OpenTrip { date: NaiveDate, lead_hours: u32 },
    /// The guest picks any date that respects the lead time.
    Flexible { lead_hours: u32 },
}

impl TourSchedule {
    pub fn lead_hours(&self) -> u32 {
        match self {
            TourSchedule::OpenTrip { lead_hours, .. } | TourSchedule::Flexible { lead_hours } => {
                *lead_hours
            }
        }
    }
}

impl<T> TourPackage<T> {
    /// `None` for an open trip whose departure date is missing or unparseable.
    pub fn schedule(&self) -> Option<TourSchedule> {
        let lead_hours = self.min_booking_hours.unwrap_or(0);
        match self.tour_type {
            Some(TourType::OpenTrip) => {
                let date = self.open_trip_date.as_deref().and_then(parse_calendar_date)?;
                Some(TourSchedule::OpenTrip { date, lead_hours })
            }
            _ => Some(TourSchedule::Flexible { lead_hours }),
        }
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a UTC calendar date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
}

// Lead times are sometimes exported as floats; round partial hours up.
fn deserialize_optional_rounded_hours<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_u64() {
                Ok(Some(u32::try_from(i).unwrap_or(u32::MAX)))
            } else if let Some(f) = n.as_f64() {
                if f.is_sign_negative() {
                    Err(serde::de::Error::custom("minBookingHours must not be negative"))
                } else {
                    Ok(Some(f.ceil() as u32))
                }
            } else {
                Ok(None)
            }
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "minBookingHours must be a number, got {}",
            other
        ))),
    }
}
