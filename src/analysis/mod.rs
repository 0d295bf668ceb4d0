pub mod error;
pub mod filtering;
pub mod time_series;
