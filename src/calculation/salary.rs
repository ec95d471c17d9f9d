//! Net pay aggregation.
//!
//! [`compute_breakdown`] is the single entry point of the calculation
//! engine: it distributes bonuses, derives taxable income from the
//! allowances, evaluates the taxes and contributions, and apportions the
//! result over the twelve periods of the year.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::JurisdictionConfig;
use crate::error::EngineResult;
use crate::models::{
    AllowanceSummary, AuditStep, AuditTrace, AuditWarning, PERIODS_PER_YEAR, SalaryBreakdown,
    SalaryInput, SocialContributions,
};

use super::allowances::{summarize_allowances, voluntary_insurance};
use super::bonus_distribution::{MAX_PAID_PERIODS, distribute_bonuses, resolve_paid_periods};
use super::contributions::{PeriodContributions, calculate_contributions};
use super::income_tax::calculate_income_tax;
use super::surcharges::{calculate_church_tax, calculate_solidarity_tax};

/// Computes the full annual and per-period breakdown for one input.
///
/// The configuration is only read. The result is a pure function of the
/// arguments, so identical inputs always produce equal breakdowns.
///
/// # Errors
///
/// Returns [`EngineError::TaxClassNotFound`](crate::error::EngineError::TaxClassNotFound)
/// when the input names a tax class the configuration does not define.
///
/// # Examples
///
/// ```no_run
/// use net_pay_engine::calculation::compute_breakdown;
/// use net_pay_engine::config::ConfigLoader;
/// use net_pay_engine::models::SalaryInput;
///
/// let loader = ConfigLoader::load("./config/de_2025").unwrap();
/// let input: SalaryInput = serde_json::from_str(r#"{
///     "base_monthly_gross": "3000", "tax_class": "I", "church_tax": false,
///     "solidarity_tax": true, "include_voluntary_insurance": false,
///     "private_health_insurance": false, "paid_periods": 12, "bonuses": [],
///     "home_office_days_per_year": 0, "commute_distance_km": "0",
///     "commute_days_per_month": 0, "child_allowance_factors": "0",
///     "children_under_25": 0, "age": 30, "federal_state": "NW",
///     "health_insurance_additional_rate": "1.7", "company_car_list_price": "0",
///     "company_car_type": "none", "capital_gains_allowance": "0",
///     "meal_vouchers": "0", "company_pension": "0"
/// }"#).unwrap();
///
/// let breakdown = compute_breakdown(&input, loader.config()).unwrap();
/// println!("Annual net: {}", breakdown.annual_net);
/// ```
pub fn compute_breakdown(
    input: &SalaryInput,
    config: &JurisdictionConfig,
) -> EngineResult<SalaryBreakdown> {
    let tax_class = config.tax_class(&input.tax_class).inspect_err(|_| {
        warn!(tax_class = %input.tax_class, "Unknown tax class requested");
    })?;

    let mut trace = AuditTrace {
        steps: Vec::new(),
        warnings: input_warnings(input, config),
    };

    let paid_periods = resolve_paid_periods(input.paid_periods);
    let periods = Decimal::from(paid_periods);

    let distribution = distribute_bonuses(
        input.base_monthly_gross,
        input.paid_periods,
        &input.bonuses,
        trace.next_step_number(),
    );
    trace.steps.push(distribution.audit_step);
    let period_gross = distribution.period_gross;

    let annual_gross: Decimal = period_gross.iter().sum();
    let monthly_gross = annual_gross / periods;

    let allowances = summarize_allowances(input, config, tax_class, paid_periods);
    let taxable_income =
        (annual_gross + allowances.taxable_additions() - allowances.taxable_reductions())
            .max(Decimal::ZERO);
    trace.steps.push(taxable_income_step(
        annual_gross,
        &allowances,
        taxable_income,
        trace.next_step_number(),
    ));

    let income = calculate_income_tax(taxable_income, tax_class, trace.next_step_number());
    trace.steps.push(income.audit_step);
    let income_tax = income.tax;

    let solidarity = calculate_solidarity_tax(
        taxable_income,
        income_tax,
        input.solidarity_tax,
        &config.solidarity_tax,
        trace.next_step_number(),
    );
    trace.steps.push(solidarity.audit_step);

    let church = calculate_church_tax(
        income_tax,
        input.church_tax,
        &input.federal_state,
        &config.church_tax,
        trace.next_step_number(),
    );
    trace.steps.push(church.audit_step);

    let contributions = calculate_contributions(
        &period_gross,
        input,
        &config.social_contributions,
        trace.next_step_number(),
    );
    trace.steps.push(contributions.audit_step);

    let voluntary = voluntary_insurance(
        monthly_gross,
        paid_periods,
        input.include_voluntary_insurance,
        &config.allowances.voluntary_insurance,
    );
    trace.steps.push(voluntary_step(
        monthly_gross,
        paid_periods,
        input.include_voluntary_insurance,
        voluntary,
        config,
        trace.next_step_number(),
    ));

    let social_contributions = SocialContributions {
        voluntary,
        ..contributions.annual
    };
    let taxes = income_tax + solidarity.amount + church.amount;
    let total_deductions = taxes + social_contributions.total();
    let annual_net = (annual_gross - total_deductions).max(Decimal::ZERO);
    let monthly_net = annual_net / periods;

    let period_net = apportion_period_net(
        &period_gross,
        annual_gross,
        taxes,
        voluntary,
        &contributions.per_period,
    );
    trace.steps.push(net_pay_step(
        annual_gross,
        total_deductions,
        annual_net,
        monthly_net,
        trace.next_step_number(),
    ));

    debug!(
        tax_class = %input.tax_class,
        annual_gross = %annual_gross,
        annual_net = %annual_net,
        warnings = trace.warnings.len(),
        "Computed salary breakdown"
    );

    Ok(SalaryBreakdown {
        paid_periods,
        monthly_gross,
        annual_gross,
        annual_bonuses: distribution.annual_bonuses,
        taxable_income,
        income_tax,
        solidarity_tax: solidarity.amount,
        church_tax: church.amount,
        social_contributions,
        allowances,
        total_deductions,
        annual_net,
        monthly_net,
        period_gross,
        period_net,
        audit_trace: trace,
    })
}

/// Net for each period.
///
/// Taxes and voluntary insurance are shared out in proportion to each
/// period's gross; contributions are the period's own capped amounts.
/// A period never goes below zero and a zero-gross period nets zero.
fn apportion_period_net(
    period_gross: &[Decimal; PERIODS_PER_YEAR],
    annual_gross: Decimal,
    taxes: Decimal,
    voluntary: Decimal,
    per_period: &[PeriodContributions; PERIODS_PER_YEAR],
) -> [Decimal; PERIODS_PER_YEAR] {
    let mut period_net = [Decimal::ZERO; PERIODS_PER_YEAR];
    if annual_gross <= Decimal::ZERO {
        return period_net;
    }

    for ((net, gross), contributions) in period_net.iter_mut().zip(period_gross).zip(per_period) {
        if gross.is_zero() {
            continue;
        }
        let shared = (taxes + voluntary) * *gross / annual_gross;
        *net = (*gross - shared - contributions.total()).max(Decimal::ZERO);
    }
    period_net
}

fn input_warnings(input: &SalaryInput, config: &JurisdictionConfig) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if input.paid_periods <= 0 || input.paid_periods > MAX_PAID_PERIODS as i32 {
        warnings.push(AuditWarning::low(
            "PAID_PERIODS_RESOLVED",
            format!(
                "Paid periods {} outside 1..=12, using {}",
                input.paid_periods,
                resolve_paid_periods(input.paid_periods)
            ),
        ));
    }

    for bonus in &input.bonuses {
        if !(1..=MAX_PAID_PERIODS as i32).contains(&bonus.period) {
            warnings.push(AuditWarning::low(
                "BONUS_PERIOD_CLAMPED",
                format!("Bonus '{}' period {} clamped into 1..=12", bonus.id, bonus.period),
            ));
        }
        if bonus.value < Decimal::ZERO {
            warnings.push(AuditWarning::low(
                "NEGATIVE_INPUT_CLAMPED",
                format!("Bonus '{}' has a negative value, treated as zero", bonus.id),
            ));
        }
    }

    let negative_fields = [
        ("base_monthly_gross", input.base_monthly_gross),
        (
            "home_office_days_per_year",
            Decimal::from(input.home_office_days_per_year),
        ),
        ("commute_distance_km", input.commute_distance_km),
        (
            "commute_days_per_month",
            Decimal::from(input.commute_days_per_month),
        ),
        ("company_car_list_price", input.company_car_list_price),
        ("capital_gains_allowance", input.capital_gains_allowance),
        ("meal_vouchers", input.meal_vouchers),
        ("company_pension", input.company_pension),
        (
            "health_insurance_additional_rate",
            input.health_insurance_additional_rate,
        ),
    ];
    for (field, value) in negative_fields {
        if value < Decimal::ZERO {
            warnings.push(AuditWarning::low(
                "NEGATIVE_INPUT_CLAMPED",
                format!("{field} is negative, treated as zero"),
            ));
        }
    }

    if input.church_tax && !config.church_tax.rate_by_state.contains_key(&input.federal_state) {
        warnings.push(AuditWarning::low(
            "CHURCH_RATE_DEFAULTED",
            format!(
                "No church tax rate for '{}', using default {}",
                input.federal_state,
                config.church_tax.rate.normalize()
            ),
        ));
    }

    warnings
}

fn taxable_income_step(
    annual_gross: Decimal,
    allowances: &AllowanceSummary,
    taxable_income: Decimal,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        input: serde_json::json!({
            "annual_gross": annual_gross.normalize().to_string(),
            "company_car_benefit": allowances.company_car_benefit.normalize().to_string(),
            "meal_voucher_taxable": allowances.meal_voucher_taxable.normalize().to_string(),
            "home_office": allowances.home_office.normalize().to_string(),
            "commute": allowances.commute.normalize().to_string(),
            "company_pension": allowances.company_pension.normalize().to_string(),
            "capital_gains": allowances.capital_gains.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "child_allowance": allowances.child_allowance.normalize().to_string()
        }),
        reasoning: format!(
            "{} + {} - {} = {}",
            annual_gross.normalize(),
            allowances.taxable_additions().normalize(),
            allowances.taxable_reductions().normalize(),
            taxable_income.normalize()
        ),
    }
}

fn voluntary_step(
    monthly_gross: Decimal,
    paid_periods: u32,
    opted_in: bool,
    amount: Decimal,
    config: &JurisdictionConfig,
    step_number: u32,
) -> AuditStep {
    let voluntary = &config.allowances.voluntary_insurance;
    AuditStep {
        step_number,
        rule_id: "voluntary_insurance".to_string(),
        rule_name: "Voluntary Supplemental Insurance".to_string(),
        input: serde_json::json!({
            "opted_in": opted_in,
            "monthly_gross": monthly_gross.normalize().to_string(),
            "threshold_monthly": voluntary.threshold_monthly.normalize().to_string(),
            "paid_periods": paid_periods
        }),
        output: serde_json::json!({
            "voluntary": amount.normalize().to_string()
        }),
        reasoning: if opted_in {
            format!(
                "max(0, {} - {}) x {} x {} = {}",
                monthly_gross.normalize(),
                voluntary.threshold_monthly.normalize(),
                voluntary.additional_rate.normalize(),
                paid_periods,
                amount.normalize()
            )
        } else {
            "Not opted in".to_string()
        },
    }
}

fn net_pay_step(
    annual_gross: Decimal,
    total_deductions: Decimal,
    annual_net: Decimal,
    monthly_net: Decimal,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "annual_gross": annual_gross.normalize().to_string(),
            "total_deductions": total_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "annual_net": annual_net.normalize().to_string(),
            "monthly_net": monthly_net.normalize().to_string()
        }),
        reasoning: format!(
            "max(0, {} - {}) = {}",
            annual_gross.normalize(),
            total_deductions.normalize(),
            annual_net.normalize()
        ),
    }
}
