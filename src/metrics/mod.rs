//! Metrics Module
//!
//! Session lifecycle counters exported for Prometheus scraping.

pub mod collector;

pub use collector::Metrics;
