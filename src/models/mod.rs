pub mod bookings;
pub mod language;
pub mod tour;
