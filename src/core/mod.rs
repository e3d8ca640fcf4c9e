//! Core business logic abstractions

pub mod bundle;
pub mod config;
pub mod log;
pub mod output;
pub mod rates;
pub mod sdmx;
pub mod series;

// Re-export main types for cleaner imports
pub use bundle::{Bundle, Meta};
pub use rates::RateProvider;
pub use series::Series;
