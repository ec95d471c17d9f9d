//! Calculation logic for the Net Pay Engine.
//!
//! This module contains bonus distribution over the pay periods, the
//! allowance and benefit adjustments to taxable income, capped social
//! contributions, progressive income tax, the solidarity and church
//! surcharges, and the aggregation of all of them into a
//! [`SalaryBreakdown`](crate::models::SalaryBreakdown).

mod allowances;
mod bonus_distribution;
mod contributions;
mod income_tax;
mod salary;
mod surcharges;

pub use allowances::{
    COMMUTE_NEAR_DISTANCE_KM, capital_gains_deduction, child_allowance, commute_allowance,
    company_car_benefit, company_car_rate, company_pension_deduction, home_office_allowance,
    meal_voucher_taxable_portion, summarize_allowances, voluntary_insurance,
};
pub use bonus_distribution::{
    BonusDistribution, MAX_PAID_PERIODS, bonus_period_index, distribute_bonuses,
    resolve_bonus_value, resolve_paid_periods,
};
pub use contributions::{
    ContributionResult, PeriodContributions, calculate_contributions, capped_contribution,
    long_term_care_rate,
};
pub use income_tax::{
    IncomeTaxResult, adjusted_income, bracket_tax, calculate_income_tax, income_tax,
    select_bracket,
};
pub use salary::compute_breakdown;
pub use surcharges::{
    SurchargeResult, calculate_church_tax, calculate_solidarity_tax, church_tax, solidarity_tax,
};
