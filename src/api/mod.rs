//! HTTP API module for the Net Pay Engine.
//!
//! This module provides the REST API endpoints for calculating a net pay
//! breakdown and for describing the loaded configuration.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ConfigSummary, TaxClassSummary, create_router};
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
