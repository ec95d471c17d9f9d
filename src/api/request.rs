//! Request types for the Net Pay Engine API.
//!
//! This module defines the JSON request structure for the `/calculate`
//! endpoint. Every field except `base_monthly_gross` may be omitted and
//! falls back to a default. Numeric fields are bounded so that every
//! figure the engine derives from them stays within `Decimal` range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BonusEntry, BonusKind, SalaryInput, VehiclePropulsion};

use super::response::ApiError;

/// Largest absolute amount, distance or factor accepted in a request.
pub const MAX_REQUEST_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest absolute percentage accepted in a request.
pub const MAX_REQUEST_PERCENT: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Most bonus entries accepted in a request.
pub const MAX_REQUEST_BONUSES: usize = 120;

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Gross pay per period before bonuses.
    pub base_monthly_gross: Decimal,
    /// Tax class identifier (e.g., "I").
    #[serde(default = "default_tax_class")]
    pub tax_class: String,
    /// Liable for church tax.
    #[serde(default)]
    pub church_tax: bool,
    /// Liable for the solidarity surcharge.
    #[serde(default = "default_true")]
    pub solidarity_tax: bool,
    /// Opted in to voluntary supplemental insurance.
    #[serde(default)]
    pub include_voluntary_insurance: bool,
    /// Privately insured.
    #[serde(default)]
    pub private_health_insurance: bool,
    /// Number of paid periods in the year.
    #[serde(default = "default_paid_periods")]
    pub paid_periods: i32,
    /// Bonus entries.
    #[serde(default)]
    pub bonuses: Vec<BonusEntry>,
    /// Remote-work days per year.
    #[serde(default)]
    pub home_office_days_per_year: i32,
    /// One-way commute distance in kilometres.
    #[serde(default)]
    pub commute_distance_km: Decimal,
    /// Commuting days per period.
    #[serde(default)]
    pub commute_days_per_month: i32,
    /// Child allowance factors.
    #[serde(default)]
    pub child_allowance_factors: Decimal,
    /// Dependents under 25.
    #[serde(default)]
    pub children_under_25: u32,
    /// Age in years.
    #[serde(default = "default_age")]
    pub age: u32,
    /// Subdivision code for the church tax rate.
    #[serde(default = "default_federal_state")]
    pub federal_state: String,
    /// Statutory health additional rate, in percent.
    #[serde(default = "default_health_additional_rate")]
    pub health_insurance_additional_rate: Decimal,
    /// Company vehicle list price.
    #[serde(default)]
    pub company_car_list_price: Decimal,
    /// Company vehicle propulsion category.
    #[serde(default)]
    pub company_car_type: VehiclePropulsion,
    /// Monthly capital-gains allowance.
    #[serde(default)]
    pub capital_gains_allowance: Decimal,
    /// Monthly meal voucher value.
    #[serde(default)]
    pub meal_vouchers: Decimal,
    /// Monthly company pension contribution.
    #[serde(default)]
    pub company_pension: Decimal,
}

fn default_tax_class() -> String {
    "I".to_string()
}

fn default_true() -> bool {
    true
}

fn default_paid_periods() -> i32 {
    12
}

fn default_age() -> u32 {
    30
}

fn default_federal_state() -> String {
    "NW".to_string()
}

fn default_health_additional_rate() -> Decimal {
    Decimal::new(15, 1)
}

impl CalculationRequest {
    /// Rejects numeric fields outside the accepted bounds.
    ///
    /// Negative values inside the bounds pass; the engine clamps them.
    pub fn validate(&self) -> Result<(), ApiError> {
        let amounts = [
            ("base_monthly_gross", self.base_monthly_gross),
            ("commute_distance_km", self.commute_distance_km),
            ("child_allowance_factors", self.child_allowance_factors),
            ("company_car_list_price", self.company_car_list_price),
            ("capital_gains_allowance", self.capital_gains_allowance),
            ("meal_vouchers", self.meal_vouchers),
            ("company_pension", self.company_pension),
        ];
        for (field, value) in amounts {
            check_bound(field, value, MAX_REQUEST_AMOUNT)?;
        }
        check_bound(
            "health_insurance_additional_rate",
            self.health_insurance_additional_rate,
            MAX_REQUEST_PERCENT,
        )?;

        if self.bonuses.len() > MAX_REQUEST_BONUSES {
            return Err(ApiError::validation_error(format!(
                "At most {} bonuses are accepted, got {}",
                MAX_REQUEST_BONUSES,
                self.bonuses.len()
            )));
        }
        for bonus in &self.bonuses {
            let limit = match bonus.kind {
                BonusKind::Amount => MAX_REQUEST_AMOUNT,
                BonusKind::Percent => MAX_REQUEST_PERCENT,
            };
            check_bound(&format!("bonuses[{}].value", bonus.id), bonus.value, limit)?;
        }
        Ok(())
    }
}

fn check_bound(field: &str, value: Decimal, limit: Decimal) -> Result<(), ApiError> {
    if value.abs() > limit {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("{} is out of range", field),
            format!("Absolute value must not exceed {}, got {}", limit, value),
        ));
    }
    Ok(())
}

impl From<CalculationRequest> for SalaryInput {
    fn from(req: CalculationRequest) -> Self {
        SalaryInput {
            base_monthly_gross: req.base_monthly_gross,
            tax_class: req.tax_class,
            church_tax: req.church_tax,
            solidarity_tax: req.solidarity_tax,
            include_voluntary_insurance: req.include_voluntary_insurance,
            private_health_insurance: req.private_health_insurance,
            paid_periods: req.paid_periods,
            bonuses: req.bonuses,
            home_office_days_per_year: req.home_office_days_per_year,
            commute_distance_km: req.commute_distance_km,
            commute_days_per_month: req.commute_days_per_month,
            child_allowance_factors: req.child_allowance_factors,
            children_under_25: req.children_under_25,
            age: req.age,
            federal_state: req.federal_state,
            health_insurance_additional_rate: req.health_insurance_additional_rate,
            company_car_list_price: req.company_car_list_price,
            company_car_type: req.company_car_type,
            capital_gains_allowance: req.capital_gains_allowance,
            meal_vouchers: req.meal_vouchers,
            company_pension: req.company_pension,
        }
    }
}
