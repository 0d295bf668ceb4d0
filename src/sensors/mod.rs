pub mod error;
pub mod sensor_store;
