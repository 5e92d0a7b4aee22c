//! Request-time logic: symbol resolution, concurrent lookups, reshaping and
//! the templated commentary.

pub mod aggregator;
pub mod commentary;
pub mod reshape;
pub mod symbol;

pub use aggregator::{Aggregated, Aggregator, DataSource, Degraded};
