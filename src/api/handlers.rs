//! HTTP request handlers for the Net Pay Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_breakdown;
use crate::config::ConfigLoader;
use crate::error::EngineError;
use crate::models::{CalculationResult, SalaryInput};

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// A tax class as offered to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassSummary {
    /// Tax class identifier.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// Response body for `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    /// Country code.
    pub country: String,
    /// Currency code.
    pub currency: String,
    /// Tax year of the configuration.
    pub tax_year: i32,
    /// Tax classes sorted by identifier.
    pub tax_classes: Vec<TaxClassSummary>,
    /// Subdivision codes with a church tax rate, sorted.
    pub subdivisions: Vec<String>,
}

impl ConfigSummary {
    /// Summarizes a loaded configuration.
    pub fn from_loader(loader: &ConfigLoader) -> Self {
        let config = loader.config();
        Self {
            country: config.meta.country.clone(),
            currency: config.meta.currency.clone(),
            tax_year: config.meta.tax_year,
            tax_classes: config
                .tax_classes
                .iter()
                .map(|(id, class)| TaxClassSummary {
                    id: id.clone(),
                    label: class.label.clone(),
                })
                .collect(),
            subdivisions: config.church_tax.rate_by_state.keys().cloned().collect(),
        }
    }
}

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/config", get(config_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the net pay breakdown.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    if let Err(error) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %error.message,
            "Request out of range"
        );
        return (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
            Json(error),
        )
            .into_response();
    }

    let input: SalaryInput = request.into();

    match perform_calculation(&input, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                tax_class = %input.tax_class,
                annual_gross = %result.breakdown.annual_gross,
                annual_net = %result.breakdown.annual_net,
                duration_us = result.duration_us,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /config endpoint.
async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(ConfigSummary::from_loader(state.config())),
    )
}

/// Computes a breakdown and wraps it in the result envelope.
fn perform_calculation(
    input: &SalaryInput,
    loader: &ConfigLoader,
) -> Result<CalculationResult, EngineError> {
    let start_time = Instant::now();
    let config = loader.config();

    let tax_class_label = config.tax_class(&input.tax_class)?.label.clone();
    let breakdown = compute_breakdown(input, config)?;

    Ok(CalculationResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        currency: config.meta.currency.clone(),
        tax_class_label,
        breakdown,
        duration_us: start_time.elapsed().as_micros() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/de_2025").expect("Failed to load config");
        AppState::new(config)
    }

    fn post_calculate(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_calculate(
                r#"{"base_monthly_gross": "4500", "tax_class": "I"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: CalculationResult = serde_json::from_slice(&read_body(response).await).unwrap();

        assert_eq!(result.currency, "EUR");
        assert_eq!(result.tax_class_label, "Single");
        assert_eq!(result.breakdown.annual_gross, Decimal::from(54000));
        assert!(result.breakdown.annual_net > Decimal::ZERO);
        assert!(!result.breakdown.audit_trace.steps.is_empty());
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_calculate("{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_base_gross_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_calculate(r#"{"tax_class": "I"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("base_monthly_gross"));
    }

    #[tokio::test]
    async fn test_api_004_unknown_tax_class_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_calculate(
                r#"{"base_monthly_gross": 3000, "tax_class": "VII"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(error.code, "TAX_CLASS_NOT_FOUND");
        assert!(error.message.contains("VII"));
    }

    #[tokio::test]
    async fn test_api_005_wrong_field_type_is_malformed() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_calculate(
                r#"{"base_monthly_gross": 3000, "church_tax": "maybe"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_config_endpoint_lists_classes_and_subdivisions() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let summary: ConfigSummary = serde_json::from_slice(&read_body(response).await).unwrap();

        assert_eq!(summary.country, "DE");
        assert_eq!(summary.tax_year, 2025);
        let ids: Vec<&str> = summary.tax_classes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["I", "II", "III", "IV", "V", "VI"]);
        assert_eq!(summary.subdivisions.len(), 16);
        assert!(summary.subdivisions.contains(&"BY".to_string()));
    }

    #[test]
    fn test_perform_calculation_envelope() {
        let loader = ConfigLoader::load("./config/de_2025").unwrap();
        let input: SalaryInput =
            serde_json::from_str::<CalculationRequest>(r#"{"base_monthly_gross": 3000, "tax_class": "III"}"#)
                .unwrap()
                .into();

        let first = perform_calculation(&input, &loader).unwrap();
        let second = perform_calculation(&input, &loader).unwrap();

        assert_eq!(first.tax_class_label, "Married, higher earner");
        assert_ne!(first.calculation_id, second.calculation_id);
        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(first.engine_version, env!("CARGO_PKG_VERSION"));
    }
}
