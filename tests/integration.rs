//! Integration tests for the Net Pay Engine HTTP API.
//!
//! This test suite drives the router end to end against the shipped
//! `config/de_2025` jurisdiction:
//! - Reference breakdowns for several tax classes
//! - Bonuses, allowances and benefits-in-kind
//! - Solidarity and church tax
//! - Contribution ceilings and dependents
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use net_pay_engine::api::{AppState, create_router};
use net_pay_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/de_2025").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

async fn calculate_ok(body: Value) -> Value {
    let (status, result) = post_calculate(create_router_for_test(), body).await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {result}");
    result
}

fn field(result: &Value, path: &[&str]) -> Decimal {
    let mut value = &result["breakdown"];
    for key in path {
        value = &value[*key];
    }
    decimal(value.as_str().unwrap_or_else(|| panic!("{path:?} is not a decimal string")))
}

fn assert_decimal(result: &Value, path: &[&str], expected: &str) {
    let actual = field(result, path);
    assert_eq!(
        actual.normalize(),
        decimal(expected).normalize(),
        "Expected {:?} = {}, got {}",
        path,
        expected,
        actual
    );
}

fn period_figures(result: &Value, key: &str) -> Vec<Decimal> {
    result["breakdown"][key]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| decimal(v.as_str().unwrap()))
        .collect()
}

// =============================================================================
// SECTION 1: Reference breakdowns
// =============================================================================

#[tokio::test]
async fn test_single_class_flat_salary() {
    let result = calculate_ok(json!({
        "base_monthly_gross": "3000",
        "tax_class": "I",
        "children_under_25": 1,
        "health_insurance_additional_rate": "1.7"
    }))
    .await;

    assert_decimal(&result, &["annual_gross"], "36000");
    assert_decimal(&result, &["income_tax"], "6751.3547");
    assert_decimal(&result, &["solidarity_tax"], "0");
    assert_decimal(&result, &["total_deductions"], "14455.3547");
    assert_decimal(&result, &["annual_net"], "21544.6453");
    assert_eq!(result["tax_class_label"], "Single");
    assert_eq!(result["currency"], "EUR");
}

#[tokio::test]
async fn test_married_higher_earner_pays_less_tax() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 3000,
        "tax_class": "III"
    }))
    .await;

    assert_decimal(&result, &["income_tax"], "2002.98");
    assert_decimal(&result, &["social_contributions", "long_term_care"], "864");
    assert_decimal(&result, &["social_contributions", "health"], "3168");
    assert_decimal(&result, &["annual_net"], "26149.02");
}

#[tokio::test]
async fn test_high_earner_with_church_and_solidarity_tax() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 8000,
        "tax_class": "I",
        "church_tax": true,
        "solidarity_tax": true,
        "federal_state": "BY"
    }))
    .await;

    assert_decimal(&result, &["taxable_income"], "96000");
    assert_decimal(&result, &["income_tax"], "28971.58");
    assert_decimal(&result, &["solidarity_tax"], "1593.4369");
    assert_decimal(&result, &["church_tax"], "2317.7264");
    assert_decimal(&result, &["social_contributions", "pension"], "8928");
    // Health and long-term care are capped at 5512.50 per period
    assert_decimal(&result, &["social_contributions", "health"], "5821.2");
    assert_decimal(&result, &["annual_net"], "45532.4567");
}

// =============================================================================
// SECTION 2: Bonuses, allowances and benefits
// =============================================================================

#[tokio::test]
async fn test_bonus_commute_and_home_office() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 4500,
        "tax_class": "I",
        "home_office_days_per_year": 50,
        "commute_distance_km": 15,
        "commute_days_per_month": 10,
        "bonuses": [
            {"id": "christmas", "period": 12, "kind": "amount", "value": 4500}
        ]
    }))
    .await;

    assert_decimal(&result, &["annual_bonuses"], "4500");
    assert_decimal(&result, &["allowances", "home_office"], "300");
    assert_decimal(&result, &["allowances", "commute"], "540");
    assert_decimal(&result, &["taxable_income"], "57660");
    assert_decimal(&result, &["income_tax"], "13935.9767");
    assert_decimal(&result, &["annual_net"], "32302.3233");

    let gross = period_figures(&result, "period_gross");
    assert_eq!(gross[11], decimal("9000"));
    assert_eq!(gross[0], decimal("4500"));
}

#[tokio::test]
async fn test_company_car_and_pension() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 5000,
        "tax_class": "I",
        "children_under_25": 3,
        "company_car_list_price": 50000,
        "company_car_type": "combustion",
        "company_pension": 400
    }))
    .await;

    assert_decimal(&result, &["allowances", "company_car_benefit"], "6000");
    assert_decimal(&result, &["allowances", "company_pension"], "3864");
    assert_decimal(&result, &["taxable_income"], "62136");
    assert_decimal(&result, &["income_tax"], "15420.6659");
    assert_decimal(&result, &["annual_net"], "32159.3341");
}

#[tokio::test]
async fn test_percentage_bonus_uses_base_annual_gross() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 3000,
        "bonuses": [
            {"id": "summer", "period": 6, "kind": "amount", "value": 1200},
            {"id": "christmas", "period": 11, "kind": "percent", "value": 50}
        ]
    }))
    .await;

    assert_decimal(&result, &["annual_bonuses"], "19200");
    let gross = period_figures(&result, "period_gross");
    assert_eq!(gross[5], decimal("4200"));
    assert_eq!(gross[10], decimal("21000"));
}

#[tokio::test]
async fn test_non_numeric_bonus_period_lands_in_first_period() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 3000,
        "bonuses": [{"id": "odd", "period": "soon", "kind": "amount", "value": 100}]
    }))
    .await;

    let gross = period_figures(&result, "period_gross");
    assert_eq!(gross[0], decimal("3100"));
}

// =============================================================================
// SECTION 3: Properties over the API
// =============================================================================

#[tokio::test]
async fn test_private_health_insurance_lowers_deductions() {
    let statutory = calculate_ok(json!({"base_monthly_gross": 4000})).await;
    let private = calculate_ok(json!({
        "base_monthly_gross": 4000,
        "private_health_insurance": true
    }))
    .await;

    assert_decimal(&private, &["social_contributions", "health"], "0");
    assert!(
        field(&private, &["total_deductions"]) < field(&statutory, &["total_deductions"])
    );
}

#[tokio::test]
async fn test_period_nets_sum_to_annual_net() {
    let result = calculate_ok(json!({
        "base_monthly_gross": 3800,
        "paid_periods": 11,
        "include_voluntary_insurance": true,
        "bonuses": [{"id": "q2", "period": 6, "kind": "percent", "value": 20}]
    }))
    .await;

    let nets = period_figures(&result, "period_net");
    let sum: Decimal = nets.iter().sum();
    let annual_net = field(&result, &["annual_net"]);

    assert!((sum - annual_net).abs() < decimal("0.000001"));
    assert_eq!(nets[11], Decimal::ZERO);
}

#[tokio::test]
async fn test_audit_trace_lists_every_rule() {
    let result = calculate_ok(json!({"base_monthly_gross": 3000})).await;

    let steps = result["breakdown"]["audit_trace"]["steps"].as_array().unwrap();
    let rule_ids: Vec<&str> = steps
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap())
        .collect();

    assert_eq!(rule_ids.first(), Some(&"bonus_distribution"));
    assert_eq!(rule_ids.last(), Some(&"net_pay"));
    assert!(rule_ids.contains(&"income_tax"));
    assert!(rule_ids.contains(&"social_contributions"));
}

// =============================================================================
// SECTION 4: Error cases
// =============================================================================

#[tokio::test]
async fn test_unknown_tax_class_returns_400() {
    let (status, error) = post_calculate(
        create_router_for_test(),
        json!({"base_monthly_gross": 3000, "tax_class": "IX"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "TAX_CLASS_NOT_FOUND");
}

#[tokio::test]
async fn test_missing_base_gross_returns_400() {
    let (status, error) =
        post_calculate(create_router_for_test(), json!({"tax_class": "I"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_vehicle_category_returns_400() {
    let (status, error) = post_calculate(
        create_router_for_test(),
        json!({"base_monthly_gross": 3000, "company_car_type": "diesel"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_out_of_range_amounts_return_400() {
    let huge = format!("1{}", "0".repeat(28));
    let bodies = [
        json!({"base_monthly_gross": huge}),
        json!({
            "base_monthly_gross": 3000,
            "bonuses": [{"id": "share", "period": 12, "kind": "percent", "value": format!("1{}", "0".repeat(27))}]
        }),
        json!({
            "base_monthly_gross": 3000,
            "company_car_list_price": format!("7{}", "0".repeat(28)),
            "company_car_type": "combustion"
        }),
    ];

    for body in bodies {
        let (status, error) = post_calculate(create_router_for_test(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_largest_accepted_amounts_compute() {
    let result = calculate_ok(json!({
        "base_monthly_gross": "1000000000",
        "company_car_list_price": "1000000000",
        "company_car_type": "combustion",
        "bonuses": [{"id": "share", "period": 12, "kind": "percent", "value": 1000}]
    }))
    .await;

    assert_decimal(&result, &["annual_bonuses"], "120000000000");
    assert!(field(&result, &["annual_net"]) > Decimal::ZERO);
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .body(Body::from(r#"{"base_monthly_gross": 3000}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}
