//! Types shared by every gateway implementation

pub mod error;

pub use error::{GatewayError, GatewayResult};
