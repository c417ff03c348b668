use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::warn;

use crate::error::BookingError;
use crate::models::bookings::{BookingWindow, Participants, PriceQuote};
use crate::models::tour::transforms::is_valid_discount;
use crate::models::tour::{parse_calendar_date, Price, Promotion, TourSchedule};

pub struct PricingService;

impl PricingService {
    /// A promotion runs through the whole of its `valid_until` day.
    /// Unparseable dates count as expired.
    pub fn is_promotion_valid(valid_until: &str, today: NaiveDate) -> bool {
        parse_calendar_date(valid_until).map_or(false, |expiry| expiry >= today)
    }

    /// Earliest selectable date: `now` plus the lead time, truncated to a UTC date.
    /// A lead time past the calendar range yields `NaiveDate::MAX`, so nothing
    /// is bookable.
    pub fn min_booking_date(min_booking_hours: Option<u32>, now: DateTime<Utc>) -> NaiveDate {
        let lead = Duration::hours(i64::from(min_booking_hours.unwrap_or(0)));
        now.checked_add_signed(lead)
            .map_or(NaiveDate::MAX, |earliest| earliest.date_naive())
    }

    /// Last date a fixed-date trip can be booked: the departure at 00:00 UTC
    /// minus the lead time, floored to a date. `None` if the trip date is unparseable.
    pub fn max_booking_date_for_fixed_date(
        open_trip_date: &str,
        min_booking_hours: Option<u32>,
    ) -> Option<NaiveDate> {
        let trip_date = parse_calendar_date(open_trip_date)?;
        Some(Self::last_bookable_date(trip_date, min_booking_hours.unwrap_or(0)))
    }

    // Underflow maps to `NaiveDate::MIN`: booking is already closed.
    fn last_bookable_date(trip_date: NaiveDate, lead_hours: u32) -> NaiveDate {
        let departure = trip_date.and_time(chrono::NaiveTime::MIN).and_utc();
        departure
            .checked_sub_signed(Duration::hours(i64::from(lead_hours)))
            .map_or(NaiveDate::MIN, |last| last.date_naive())
    }

    /// Discount percentage to apply today. Out-of-range discounts are data
    /// errors and are ignored.
    pub fn effective_discount<T>(promotion: Option<&Promotion<T>>, today: NaiveDate) -> f64 {
        let Some(promotion) = promotion else {
            return 0.0;
        };

        if !is_valid_discount(promotion.discount) {
            warn!(
                "Ignoring promotion with out-of-range discount {} (valid until {})",
                promotion.discount, promotion.valid_until
            );
            return 0.0;
        }

        if Self::is_promotion_valid(&promotion.valid_until, today) {
            promotion.discount
        } else {
            0.0
        }
    }

    /// Adults and children pay their category price; infants travel free.
    pub fn total_price<T>(
        adult_count: u32,
        child_count: u32,
        adult_price: f64,
        child_price: f64,
        promotion: Option<&Promotion<T>>,
        today: NaiveDate,
    ) -> f64 {
        let subtotal = Self::subtotal(adult_count, child_count, adult_price, child_price);
        let discount = Self::effective_discount(promotion, today);
        Self::apply_discount(subtotal, discount)
    }

    pub fn quote<T>(
        participants: &Participants,
        price: &Price,
        promotion: Option<&Promotion<T>>,
        today: NaiveDate,
    ) -> PriceQuote {
        let subtotal = Self::subtotal(participants.adult, participants.child, price.adult, price.child);
        let discount_percent = Self::effective_discount(promotion, today);
        let total = Self::apply_discount(subtotal, discount_percent);

        PriceQuote {
            subtotal,
            discount_percent,
            discount_amount: subtotal - total,
            total,
            infants_free: participants.infant,
        }
    }

    pub fn booking_window(schedule: &TourSchedule, now: DateTime<Utc>) -> BookingWindow {
        let min_date = Self::min_booking_date(Some(schedule.lead_hours()), now);
        match *schedule {
            TourSchedule::OpenTrip { date, lead_hours } => BookingWindow {
                min_date,
                max_date: Some(Self::last_bookable_date(date, lead_hours)),
                fixed_date: Some(date),
            },
            TourSchedule::Flexible { .. } => BookingWindow {
                min_date,
                max_date: None,
                fixed_date: None,
            },
        }
    }

    /// Resolves the date a booking is for. Open trips always travel on their
    /// departure date; flexible tours need a chosen date inside the window.
    pub fn check_tour_date(
        schedule: &TourSchedule,
        selected: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<NaiveDate, BookingError> {
        let window = Self::booking_window(schedule, now);

        if let Some(fixed) = window.fixed_date {
            if selected.is_some_and(|date| date != fixed) {
                return Err(BookingError::FixedDateMismatch { fixed });
            }
            if let Some(last_date) = window.max_date {
                if now.date_naive() > last_date {
                    return Err(BookingError::BookingClosed { last_date });
                }
            }
            return Ok(fixed);
        }

        let date = selected.ok_or(BookingError::DateRequired)?;
        if date < window.min_date {
            return Err(BookingError::DateTooEarly {
                date,
                earliest: window.min_date,
            });
        }
        Ok(date)
    }

    fn subtotal(adult_count: u32, child_count: u32, adult_price: f64, child_price: f64) -> f64 {
        f64::from(adult_count) * adult_price + f64::from(child_count) * child_price
    }

    fn apply_discount(subtotal: f64, discount_percent: f64) -> f64 {
        (subtotal * (100.0 - discount_percent) / 100.0).max(0.0)
    }
}
