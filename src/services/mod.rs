pub mod booking_service;
pub mod catalog_service;
pub mod i18n_service;
pub mod pricing_service;
pub mod submission;
