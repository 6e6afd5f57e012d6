//! HTTP facade for promptsmith.
//!
//! Exposes the refiner over a small JSON API. Each `POST /refine` runs one
//! non-cascading, non-streaming refinement on the shared [`Refiner`](promptsmith_core::Refiner).

pub mod api;
pub mod error;

pub use api::{ApiState, build_router, serve};
pub use error::{ApiError, Result};
