//! Salary input model and related types.
//!
//! This module defines the [`SalaryInput`] record a caller supplies for a
//! single calculation, together with [`BonusEntry`] and the small enums
//! that distinguish bonus value kinds and vehicle propulsion categories.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Period a bonus lands in when its period cannot be read as a number.
pub const NON_NUMERIC_BONUS_PERIOD: i32 = 1;

/// How a bonus entry's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    /// `value` is an absolute amount.
    Amount,
    /// `value` is a percentage of the annualized base gross.
    Percent,
}

/// Propulsion category of a company vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehiclePropulsion {
    /// No company vehicle.
    #[default]
    None,
    /// Combustion engine.
    Combustion,
    /// Plug-in hybrid.
    Hybrid,
    /// Fully electric.
    Electric,
}

/// A one-off or percentage-based bonus paid in a specific period.
///
/// # Example
///
/// ```
/// use net_pay_engine::models::{BonusEntry, BonusKind};
/// use rust_decimal::Decimal;
///
/// let bonus: BonusEntry = serde_json::from_str(
///     r#"{"id": "xmas", "period": "soon", "kind": "amount", "value": "500"}"#,
/// ).unwrap();
/// assert_eq!(bonus.period, 1);
/// assert_eq!(bonus.kind, BonusKind::Amount);
/// assert_eq!(bonus.value, Decimal::new(500, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEntry {
    /// Identifier of the entry, unique within one input.
    pub id: String,
    /// Target period, 1-based. Clamped into 1..=12 when distributed.
    #[serde(
        default = "default_bonus_period",
        deserialize_with = "deserialize_period"
    )]
    pub period: i32,
    /// Whether `value` is an amount or a percentage.
    pub kind: BonusKind,
    /// The bonus amount or percentage.
    pub value: Decimal,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_bonus_period() -> i32 {
    NON_NUMERIC_BONUS_PERIOD
}

/// Accepts integers, floats, numeric strings, and anything else as
/// period 1.
fn deserialize_period<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum RawPeriod {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let period = match Option::<RawPeriod>::deserialize(deserializer)? {
        Some(RawPeriod::Int(value)) => value.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
        Some(RawPeriod::Float(value)) if value.is_finite() => value.trunc() as i32,
        Some(RawPeriod::Text(text)) => text
            .trim()
            .parse::<i32>()
            .unwrap_or(NON_NUMERIC_BONUS_PERIOD),
        _ => NON_NUMERIC_BONUS_PERIOD,
    };
    Ok(period)
}

/// Everything a caller supplies for one net pay calculation.
///
/// Numeric fields accept degenerate values: negative amounts, days and
/// distances are treated as zero and out-of-range period counts are
/// resolved by the calculations, so every input yields a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// Gross pay per period before bonuses.
    pub base_monthly_gross: Decimal,
    /// Tax class identifier, looked up in the configuration.
    pub tax_class: String,
    /// Liable for church tax.
    pub church_tax: bool,
    /// Liable for the solidarity surcharge.
    pub solidarity_tax: bool,
    /// Opted in to voluntary supplemental insurance.
    pub include_voluntary_insurance: bool,
    /// Privately insured, so no statutory health contribution is due.
    pub private_health_insurance: bool,
    /// Number of paid periods in the year; values outside 1..=12 are resolved.
    pub paid_periods: i32,
    /// Bonus entries in input order.
    pub bonuses: Vec<BonusEntry>,
    /// Remote-work days per year.
    pub home_office_days_per_year: i32,
    /// One-way commute distance in kilometres.
    pub commute_distance_km: Decimal,
    /// Commuting days per period.
    pub commute_days_per_month: i32,
    /// Child allowance factors (0.5 per parent and child).
    pub child_allowance_factors: Decimal,
    /// Dependents under 25.
    pub children_under_25: u32,
    /// Age in years.
    pub age: u32,
    /// Jurisdiction subdivision code used for the church tax rate.
    pub federal_state: String,
    /// Statutory health insurance additional rate, in percent.
    pub health_insurance_additional_rate: Decimal,
    /// Gross list price of the company vehicle.
    pub company_car_list_price: Decimal,
    /// Propulsion category of the company vehicle.
    pub company_car_type: VehiclePropulsion,
    /// Monthly capital-gains allowance paid by the employer.
    pub capital_gains_allowance: Decimal,
    /// Monthly meal voucher value.
    pub meal_vouchers: Decimal,
    /// Monthly company pension contribution.
    pub company_pension: Decimal,
}
