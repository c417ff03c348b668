use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, RecordError};
use crate::models::language::Language;
use crate::models::tour::transforms::localize_all;
use crate::models::tour::{DisplayTour, SourceTour, TourPackage, TourType};

/// A record that was dropped while loading the catalog.
#[derive(Debug)]
pub struct RejectedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: RecordError,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourFilter {
    pub tour_type: Option<TourType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl TourFilter {
    /// Bounds are inclusive and apply to the adult price.
    pub fn matches<T>(&self, tour: &TourPackage<T>) -> bool {
        if let Some(wanted) = self.tour_type {
            if tour.tour_type != Some(wanted) {
                return false;
            }
        }
        let price = tour.price.adult;
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// The static tour catalog. Loaded once and read-only afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    tours: Vec<SourceTour>,
    rejected: Vec<RejectedRecord>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded {} tours from {} ({} rejected)",
            catalog.tours.len(),
            path.display(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    /// Parses the catalog record by record so one bad entry does not take
    /// the whole document down.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: serde_json::Value = serde_json::from_str(raw)?;
        let serde_json::Value::Array(entries) = document else {
            return Err(CatalogError::NotAnArray);
        };

        let mut catalog = Catalog::default();
        let mut seen = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let id = entry.get("id").and_then(|id| id.as_str()).map(str::to_string);

            let accepted = serde_json::from_value::<SourceTour>(entry)
                .map_err(RecordError::Malformed)
                .and_then(|tour| {
                    tour.validate()?;
                    if !seen.insert(tour.id.clone()) {
                        return Err(RecordError::DuplicateId(tour.id));
                    }
                    Ok(tour)
                });

            match accepted {
                Ok(tour) => {
                    if !tour.discount_in_range() {
                        warn!(
                            "Tour {} has a promotion discount outside 0-100; it will not be applied",
                            tour.id
                        );
                    }
                    catalog.tours.push(tour);
                }
                Err(reason) => {
                    warn!(
                        "Rejected catalog record #{} ({}): {}",
                        index,
                        id.as_deref().unwrap_or("no id"),
                        reason
                    );
                    catalog.rejected.push(RejectedRecord { index, id, reason });
                }
            }
        }

        Ok(catalog)
    }

    pub fn tours(&self) -> &[SourceTour] {
        &self.tours
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SourceTour> {
        self.tours.iter().find(|tour| tour.id == id)
    }

    pub fn localized(&self, lang: Language) -> Vec<DisplayTour> {
        localize_all(&self.tours, lang)
    }

    pub fn filter(&self, filter: &TourFilter, lang: Language) -> Vec<DisplayTour> {
        self.tours
            .iter()
            .filter(|tour| filter.matches(*tour))
            .map(|tour| tour.localize(lang))
            .collect()
    }

    /// Lowest and highest adult price, `None` for an empty catalog.
    pub fn price_range(&self) -> Option<PriceRange> {
        let mut prices = self.tours.iter().map(|tour| tour.price.adult);
        let first = prices.next()?;
        Some(prices.fold(PriceRange { min: first, max: first }, |range, price| PriceRange {
            min: range.min.min(price),
            max: range.max.max(price),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, tour_type: &str, adult: f64) -> serde_json::Value {
        json!({
            "id": id,
            "name": { "en": format!("Tour {}", id), "ru": format!("Тур {}", id) },
            "duration": { "en": "Full day" },
            "location": { "en": "Phuket" },
            "price": { "adult": adult, "child": adult / 2.0, "infant": 0 },
            "overview": { "en": "Overview" },
            "tourType": tour_type,
            "openTripDate": "2099-03-01"
        })
    }

    fn catalog(entries: Vec<serde_json::Value>) -> Catalog {
        Catalog::from_json(&serde_json::Value::Array(entries).to_string()).unwrap()
    }

    #[test]
    fn test_rejects_record_without_english_and_keeps_others() {
        let mut broken = record("b", "day-trip", 900.0);
        broken["overview"] = json!({ "en": "", "id": "Ringkasan" });
        let mut no_english = record("c", "day-trip", 900.0);
        no_english["name"] = json!({ "ru": "Тур" });

        let catalog = catalog(vec![record("a", "day-trip", 1000.0), broken, no_english]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tours()[0].id, "a");
        assert_eq!(catalog.rejected().len(), 2);
        assert!(matches!(
            &catalog.rejected()[0].reason,
            RecordError::MissingEnglish { field } if field == "overview"
        ));
        assert_eq!(catalog.rejected()[1].id.as_deref(), Some("c"));
        assert!(matches!(catalog.rejected()[1].reason, RecordError::Malformed(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let catalog = catalog(vec![
            record("a", "day-trip", 1000.0),
            record("a", "open-trip", 2000.0),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tours()[0].price.adult, 1000.0);
        assert!(matches!(catalog.rejected()[0].reason, RecordError::DuplicateId(_)));
    }

    #[test]
    fn test_rejects_open_trip_without_date() {
        let mut entry = record("a", "open-trip", 1000.0);
        entry["openTripDate"] = json!("next week");
        let catalog = catalog(vec![entry]);
        assert!(catalog.is_empty());
        assert!(matches!(catalog.rejected()[0].reason, RecordError::MissingOpenTripDate));
    }

    #[test]
    fn test_rejects_unbounded_lead_time() {
        let mut huge = record("a", "day-trip", 1000.0);
        huge["minBookingHours"] = json!(1e12);
        let mut year = record("b", "day-trip", 1000.0);
        year["minBookingHours"] = json!(8784);

        let catalog = catalog(vec![huge, year]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tours()[0].id, "b");
        assert!(matches!(
            catalog.rejected()[0].reason,
            RecordError::LeadTimeTooLong { max: 8784, .. }
        ));
    }

    #[test]
    fn test_keeps_record_with_malformed_discount() {
        let mut entry = record("a", "day-trip", 1000.0);
        entry["promotions"] = json!({ "type": { "en": "Sale" }, "discount": 140, "validUntil": "2099-01-01" });
        let catalog = catalog(vec![entry]);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.tours()[0].discount_in_range());
    }

    #[test]
    fn test_document_must_be_an_array() {
        assert!(matches!(
            Catalog::from_json(r#"{"tours": []}"#),
            Err(CatalogError::NotAnArray)
        ));
        assert!(matches!(Catalog::from_json("[{"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_filter_by_type_and_inclusive_price_bounds() {
        let catalog = catalog(vec![
            record("a", "day-trip", 1000.0),
            record("b", "open-trip", 1500.0),
            record("c", "day-trip", 2000.0),
        ]);

        let day_trips = catalog.filter(
            &TourFilter { tour_type: Some(TourType::DayTrip), ..Default::default() },
            Language::En,
        );
        assert_eq!(day_trips.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);

        let priced = catalog.filter(
            &TourFilter { tour_type: None, min_price: Some(1000.0), max_price: Some(1500.0) },
            Language::Ru,
        );
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].name, "Тур a");
    }

    #[test]
    fn test_filter_on_type_skips_untyped_tours() {
        let mut untyped = record("a", "day-trip", 1000.0);
        untyped.as_object_mut().unwrap().remove("tourType");
        let catalog = catalog(vec![untyped]);

        assert_eq!(catalog.filter(&TourFilter::default(), Language::En).len(), 1);
        let typed = TourFilter { tour_type: Some(TourType::Other), ..Default::default() };
        assert!(catalog.filter(&typed, Language::En).is_empty());
    }

    #[test]
    fn test_price_range() {
        assert_eq!(Catalog::default().price_range(), None);

        let catalog = catalog(vec![
            record("a", "day-trip", 1500.0),
            record("b", "day-trip", 900.0),
            record("c", "other", 3200.0),
        ]);
        assert_eq!(catalog.price_range(), Some(PriceRange { min: 900.0, max: 3200.0 }));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load("/nonexistent/tours.json");
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
