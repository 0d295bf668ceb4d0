pub mod endpoints;
pub mod error;
pub mod fetcher;
