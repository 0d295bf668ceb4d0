pub mod sensor;
pub mod station;
pub mod stats;
