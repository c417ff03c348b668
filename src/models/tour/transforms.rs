use super::base::{
    DisplayTour, Faq, ItineraryDay, Promotion, SourceTour, TourPackage, MAX_LEAD_HOURS,
};
use crate::error::RecordError;
use crate::models::language::{resolve, Language, LocalizedText};

impl<T> TourPackage<T> {
    /// Rebuilds the package with every text field converted by `f`.
    /// Non-text fields are copied unchanged and sequences keep their order.
    pub fn map_text<U, F>(&self, f: F) -> TourPackage<U>
    where
        F: Fn(&T) -> U,
    {
        let map_all = |items: &[T]| items.iter().map(&f).collect::<Vec<U>>();

        TourPackage {
            id: self.id.clone(),
            name: f(&self.name),
            duration: f(&self.duration),
            location: f(&self.location),
            price: self.price,
            original_price: self.original_price,
            images: self.images.clone(),
            overview: f(&self.overview),
            highlights: map_all(&self.highlights),
            itinerary: self
                .itinerary
                .iter()
                .map(|day| ItineraryDay {
                    day: day.day,
                    title: f(&day.title),
                    activities: map_all(&day.activities),
                    meals: map_all(&day.meals),
                    accommodation: day.accommodation.as_ref().map(&f),
                })
                .collect(),
            included: map_all(&self.included),
            excluded: map_all(&self.excluded),
            promotion: self.promotion.as_ref().map(|promotion| Promotion {
                kind: f(&promotion.kind),
                discount: promotion.discount,
                valid_until: promotion.valid_until.clone(),
            }),
            faqs: self
                .faqs
                .iter()
                .map(|faq| Faq {
                    question: f(&faq.question),
                    answer: f(&faq.answer),
                })
                .collect(),
            tour_type: self.tour_type,
            open_trip_date: self.open_trip_date.clone(),
            min_booking_hours: self.min_booking_hours,
        }
    }

    /// Every text field paired with its path inside the record.
    pub fn text_fields(&self) -> Vec<(String, &T)> {
        let mut fields = vec![
            ("name".to_string(), &self.name),
            ("duration".to_string(), &self.duration),
            ("location".to_string(), &self.location),
            ("overview".to_string(), &self.overview),
        ];

        fields.extend(indexed("highlights", &self.highlights));
        for (i, day) in self.itinerary.iter().enumerate() {
            fields.push((format!("itinerary[{}].title", i), &day.title));
            fields.extend(indexed(&format!("itinerary[{}].activities", i), &day.activities));
            fields.extend(indexed(&format!("itinerary[{}].meals", i), &day.meals));
            if let Some(accommodation) = &day.accommodation {
                fields.push((format!("itinerary[{}].accommodation", i), accommodation));
            }
        }
        fields.extend(indexed("included", &self.included));
        fields.extend(indexed("excluded", &self.excluded));
        if let Some(promotion) = &self.promotion {
            fields.push(("promotions.type".to_string(), &promotion.kind));
        }
        for (i, faq) in self.faqs.iter().enumerate() {
            fields.push((format!("faqs[{}].question", i), &faq.question));
            fields.push((format!("faqs[{}].answer", i), &faq.answer));
        }

        fields
    }
}

impl TourPackage<LocalizedText> {
    pub fn localize(&self, lang: Language) -> DisplayTour {
        self.map_text(|text| resolve(text, lang))
    }

    /// Load-time integrity check: English text everywhere, a bounded lead
    /// time and a usable departure date for open trips.
    pub fn validate(&self) -> Result<(), RecordError> {
        if let Some((field, _)) = self
            .text_fields()
            .into_iter()
            .find(|(_, text)| !text.has_english())
        {
            return Err(RecordError::MissingEnglish { field });
        }

        if let Some(hours) = self.min_booking_hours.filter(|hours| *hours > MAX_LEAD_HOURS) {
            return Err(RecordError::LeadTimeTooLong {
                hours,
                max: MAX_LEAD_HOURS,
            });
        }

        if self.schedule().is_none() {
            return Err(RecordError::MissingOpenTripDate);
        }

        Ok(())
    }

    pub fn discount_in_range(&self) -> bool {
        self.promotion
            .as_ref()
            .map_or(true, |promotion| is_valid_discount(promotion.discount))
    }
}

fn indexed<'a, T>(prefix: &str, items: &'a [T]) -> Vec<(String, &'a T)> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (format!("{}[{}]", prefix, i), item))
        .collect()
}

pub fn is_valid_discount(discount: f64) -> bool {
    discount.is_finite() && (0.0..=100.0).contains(&discount)
}

pub fn localize_all(tours: &[SourceTour], lang: Language) -> Vec<DisplayTour> {
    tours.iter().map(|tour| tour.localize(lang)).collect()
}
