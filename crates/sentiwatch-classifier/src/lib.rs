//! HTTP client for the sentiment inference service.
//!
//! The service exposes two endpoints: `POST /classify` takes a batch of
//! texts and returns one `{label, score}` prediction per input, in input
//! order; `GET /health` reports readiness. The raw model labels are mapped
//! to the sentiment enumeration by callers — this crate stays at the wire
//! level.

mod client;
mod error;

pub use client::{ClassifierClient, Prediction};
pub use error::ClassifierError;
