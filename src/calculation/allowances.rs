//! Allowance and benefit calculation functionality.
//!
//! Every function here returns a non-negative annual amount. Allowances
//! reduce taxable income, benefits-in-kind increase it, and voluntary
//! supplemental insurance is a deduction reported alongside the social
//! contributions.

use rust_decimal::Decimal;

use crate::config::{
    AllowanceConfig, CompanyCarBenefitRates, JurisdictionConfig, TaxClassConfig,
    VoluntaryInsuranceConfig,
};
use crate::models::{AllowanceSummary, PERIODS_PER_YEAR, SalaryInput, VehiclePropulsion};

/// Commute distance up to which the near-distance rate applies.
pub const COMMUTE_NEAR_DISTANCE_KM: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Remote-work allowance: `min(days × daily rate, annual cap)`.
///
/// ```
/// use net_pay_engine::calculation::home_office_allowance;
/// use rust_decimal::Decimal;
///
/// let amount = home_office_allowance(300, Decimal::new(6, 0), Decimal::new(1260, 0));
/// assert_eq!(amount, Decimal::new(1260, 0));
/// ```
pub fn home_office_allowance(days_per_year: i32, daily_rate: Decimal, annual_cap: Decimal) -> Decimal {
    let days = Decimal::from(days_per_year.max(0));
    non_negative((days * daily_rate).min(annual_cap))
}

/// Commuting allowance for a year.
///
/// The first 20 km of the one-way distance earn the near rate, every
/// kilometre beyond earns the far rate, and the per-trip amount is paid
/// for `days_per_period × paid_periods` trips.
pub fn commute_allowance(
    distance_km: Decimal,
    days_per_period: i32,
    paid_periods: u32,
    config: &AllowanceConfig,
) -> Decimal {
    if distance_km <= Decimal::ZERO || days_per_period <= 0 {
        return Decimal::ZERO;
    }

    let trips = Decimal::from(days_per_period) * Decimal::from(paid_periods);
    let near = distance_km.min(COMMUTE_NEAR_DISTANCE_KM) * config.commute_rate_first_20;
    let far = non_negative(distance_km - COMMUTE_NEAR_DISTANCE_KM) * config.commute_rate_beyond;
    non_negative((near + far) * trips)
}

/// Monthly benefit rate for a propulsion category.
pub fn company_car_rate(propulsion: VehiclePropulsion, rates: &CompanyCarBenefitRates) -> Decimal {
    match propulsion {
        VehiclePropulsion::None => Decimal::ZERO,
        VehiclePropulsion::Combustion => rates.combustion,
        VehiclePropulsion::Hybrid => rates.hybrid,
        VehiclePropulsion::Electric => rates.electric,
    }
}

/// Company vehicle benefit-in-kind: `list price × category rate × 12`.
///
/// Charged for all twelve months regardless of paid periods.
pub fn company_car_benefit(
    list_price: Decimal,
    propulsion: VehiclePropulsion,
    rates: &CompanyCarBenefitRates,
) -> Decimal {
    if list_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    non_negative(list_price * company_car_rate(propulsion, rates) * Decimal::from(PERIODS_PER_YEAR))
}

/// Taxable portion of meal vouchers above the monthly tax-free limit.
pub fn meal_voucher_taxable_portion(
    monthly_value: Decimal,
    tax_free_limit: Decimal,
    paid_periods: u32,
) -> Decimal {
    non_negative(monthly_value - tax_free_limit) * Decimal::from(paid_periods)
}

/// Capital-gains allowance deduction, capped at the employer maximum.
pub fn capital_gains_deduction(
    monthly_amount: Decimal,
    employer_cap: Decimal,
    paid_periods: u32,
) -> Decimal {
    capped_monthly_deduction(monthly_amount, employer_cap, paid_periods)
}

/// Company pension deduction, capped at the tax-free ceiling.
pub fn company_pension_deduction(
    monthly_contribution: Decimal,
    tax_free_cap: Decimal,
    paid_periods: u32,
) -> Decimal {
    capped_monthly_deduction(monthly_contribution, tax_free_cap, paid_periods)
}

fn capped_monthly_deduction(monthly: Decimal, cap: Decimal, paid_periods: u32) -> Decimal {
    non_negative(monthly.min(cap)) * Decimal::from(paid_periods)
}

/// Voluntary supplemental insurance for the year.
///
/// Zero unless the caller opted in. The rate applies to the part of the
/// average monthly gross above the threshold.
pub fn voluntary_insurance(
    monthly_gross: Decimal,
    paid_periods: u32,
    opted_in: bool,
    config: &VoluntaryInsuranceConfig,
) -> Decimal {
    if !opted_in {
        return Decimal::ZERO;
    }
    non_negative(monthly_gross - config.threshold_monthly)
        * non_negative(config.additional_rate)
        * Decimal::from(paid_periods)
}

/// Child allowance: `factors × per-factor amount × class multiplier`.
///
/// The multiplier defaults to one when the tax class does not set it.
pub fn child_allowance(factors: Decimal, per_factor: Decimal, multiplier: Option<Decimal>) -> Decimal {
    non_negative(factors * per_factor * multiplier.unwrap_or(Decimal::ONE))
}

/// Computes every allowance and benefit for an input.
pub fn summarize_allowances(
    input: &SalaryInput,
    config: &JurisdictionConfig,
    tax_class: &TaxClassConfig,
    paid_periods: u32,
) -> AllowanceSummary {
    let allowances = &config.allowances;

    AllowanceSummary {
        home_office: home_office_allowance(
            input.home_office_days_per_year,
            allowances.home_office_daily_rate,
            allowances.home_office_max,
        ),
        commute: commute_allowance(
            input.commute_distance_km,
            input.commute_days_per_month,
            paid_periods,
            allowances,
        ),
        company_pension: company_pension_deduction(
            input.company_pension,
            config.company_pension_max_tax_free,
            paid_periods,
        ),
        capital_gains: capital_gains_deduction(
            input.capital_gains_allowance,
            allowances.capital_gains_allowance_max_employer,
            paid_periods,
        ),
        company_car_benefit: company_car_benefit(
            input.company_car_list_price,
            input.company_car_type,
            &config.company_car_benefit_rates,
        ),
        meal_voucher_taxable: meal_voucher_taxable_portion(
            input.meal_vouchers,
            allowances.meal_voucher_tax_free_limit,
            paid_periods,
        ),
        child_allowance: child_allowance(
            input.child_allowance_factors,
            allowances.child_allowance_per_factor,
            tax_class.child_allowance_factor_multiplier,
        ),
    }
}
