//! Custom extractors for Axum handlers.

pub mod strict_json;

pub use strict_json::{MAX_BODY_BYTES, StrictJson};
