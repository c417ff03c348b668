use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BookingError;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantCategory {
    Adult,
    Child,
    Infant,
}

impl ParticipantCategory {
    pub fn minimum(self) -> u32 {
        match self {
            ParticipantCategory::Adult => 1,
            ParticipantCategory::Child | ParticipantCategory::Infant => 0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    pub adult: u32,
    #[serde(default)]
    pub child: u32,
    #[serde(default)]
    pub infant: u32,
}

impl Default for Participants {
    fn default() -> Self {
        Self {
            adult: 1,
            child: 0,
            infant: 0,
        }
    }
}

impl Participants {
    pub fn count(&self, category: ParticipantCategory) -> u32 {
        match category {
            ParticipantCategory::Adult => self.adult,
            ParticipantCategory::Child => self.child,
            ParticipantCategory::Infant => self.infant,
        }
    }

    /// Adds `delta` to one category, never going below its minimum.
    pub fn adjust(&mut self, category: ParticipantCategory, delta: i32) {
        let current = i64::from(self.count(category));
        let next = (current + i64::from(delta)).max(i64::from(category.minimum()));
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        match category {
            ParticipantCategory::Adult => self.adult = next,
            ParticipantCategory::Child => self.child = next,
            ParticipantCategory::Infant => self.infant = next,
        }
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        if self.adult < ParticipantCategory::Adult.minimum() {
            return Err(BookingError::NoAdults);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInfo {
    pub family_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub hotel_pickup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// Empty means the pickup time is assigned from the hotel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
}

impl GuestInfo {
    /// Name of the first required field left blank.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        [
            ("familyName", &self.family_name),
            ("firstName", &self.first_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("nationality", &self.nationality),
            ("hotelPickup", &self.hotel_pickup),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOns {
    pub whatsapp_group: bool,
    pub vegetarian_meal: bool,
}

/// Booking form state owned by a single session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub tour_id: String,
    pub selected_date: Option<NaiveDate>,
    pub participants: Participants,
    pub guest: GuestInfo,
    pub add_ons: AddOns,
}

impl BookingDraft {
    pub fn new(tour_id: impl Into<String>) -> Self {
        Self {
            tour_id: tour_id.into(),
            selected_date: None,
            participants: Participants::default(),
            guest: GuestInfo::default(),
            add_ons: AddOns::default(),
        }
    }

    pub fn apply(&mut self, patch: BookingDraftPatch) -> Result<(), BookingError> {
        if let Some(participants) = &patch.participants {
            participants.validate()?;
        }

        if let Some(date) = patch.selected_date {
            self.selected_date = Some(date);
        }
        if let Some(participants) = patch.participants {
            self.participants = participants;
        }
        if let Some(guest) = patch.guest {
            self.guest = guest;
        }
        if let Some(add_ons) = patch.add_ons {
            self.add_ons = add_ons;
        }
        Ok(())
    }
}

/// Partial update of a draft; absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraftPatch {
    pub selected_date: Option<NaiveDate>,
    pub participants: Option<Participants>,
    pub guest: Option<GuestInfo>,
    pub add_ons: Option<AddOns>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub subtotal: f64,
    /// Discount actually applied; zero when the promotion is absent,
    /// expired or malformed.
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub total: f64,
    pub infants_free: u32,
}

/// Bounds for the tour date picker.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub min_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub reference: Uuid,
    pub tour_id: String,
    pub tour_date: NaiveDate,
    pub participants: Participants,
    pub total: f64,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_participants() {
        let participants = Participants::default();
        assert_eq!(participants.adult, 1);
        assert_eq!(participants.child, 0);
        assert_eq!(participants.infant, 0);
    }

    #[test]
    fn test_adjust_respects_minimums() {
        let mut participants = Participants::default();
        participants.adjust(ParticipantCategory::Adult, -1);
        assert_eq!(participants.adult, 1);

        participants.adjust(ParticipantCategory::Child, 2);
        participants.adjust(ParticipantCategory::Child, -5);
        assert_eq!(participants.child, 0);

        participants.adjust(ParticipantCategory::Infant, 1);
        participants.adjust(ParticipantCategory::Adult, 3);
        assert_eq!(participants, Participants { adult: 4, child: 0, infant: 1 });
    }

    #[test]
    fn test_missing_required_guest_field() {
        let mut guest = GuestInfo {
            family_name: "Ivanova".to_string(),
            first_name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+66 81 234 5678".to_string(),
            nationality: "Russia".to_string(),
            hotel_pickup: "Kata Beach Resort".to_string(),
            room_number: None,
            pickup_time: None,
        };
        assert_eq!(guest.missing_required_field(), None);

        guest.phone = "   ".to_string();
        assert_eq!(guest.missing_required_field(), Some("phone"));
    }

    #[test]
    fn test_patch_rejects_zero_adults_without_partial_update() {
        let mut draft = BookingDraft::new("phi-phi");
        let patch = BookingDraftPatch {
            selected_date: NaiveDate::from_ymd_opt(2099, 1, 1),
            participants: Some(Participants { adult: 0, child: 2, infant: 0 }),
            ..Default::default()
        };

        assert_eq!(draft.apply(patch), Err(BookingError::NoAdults));
        assert_eq!(draft, BookingDraft::new("phi-phi"));
    }

    #[test]
    fn test_patch_leaves_absent_fields_untouched() {
        let mut draft = BookingDraft::new("phi-phi");
        draft.add_ons.vegetarian_meal = true;

        let patch: BookingDraftPatch = serde_json::from_value(serde_json::json!({
            "participants": { "adult": 2, "child": 1 }
        }))
        .unwrap();
        draft.apply(patch).unwrap();

        assert_eq!(draft.participants, Participants { adult: 2, child: 1, infant: 0 });
        assert!(draft.add_ons.vegetarian_meal);
        assert_eq!(draft.selected_date, None);
    }
}
