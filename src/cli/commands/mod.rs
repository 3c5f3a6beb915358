pub mod assess;
pub mod checkin;
pub mod config;
pub mod trend;
