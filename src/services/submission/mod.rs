pub mod interface;
pub mod simulated;

pub use interface::{BookingSubmitter, SubmissionError, SubmissionRequest};
pub use simulated::SimulatedSubmitter;
