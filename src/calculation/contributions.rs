//! Social contribution calculation functionality.
//!
//! Health, pension, unemployment, and long-term care contributions are
//! computed per pay period against that period's gross, capped at the
//! monthly ceiling, and then summed over the year.

use rust_decimal::Decimal;

use crate::config::{SocialContributionConfig, SocialContributionsConfig};
use crate::models::{AuditStep, PERIODS_PER_YEAR, SalaryInput, SocialContributions};

/// Contributions owed for a single pay period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodContributions {
    /// Statutory health insurance.
    pub health: Decimal,
    /// Pension insurance.
    pub pension: Decimal,
    /// Unemployment insurance.
    pub unemployment: Decimal,
    /// Long-term care insurance.
    pub long_term_care: Decimal,
}

impl PeriodContributions {
    /// Sum of the four statutory categories.
    pub fn total(&self) -> Decimal {
        self.health + self.pension + self.unemployment + self.long_term_care
    }
}

/// The result of calculating statutory contributions for a year.
#[derive(Debug, Clone)]
pub struct ContributionResult {
    /// Annual totals. `voluntary` is left at zero here.
    pub annual: SocialContributions,
    /// Per-period contributions, January first.
    pub per_period: [PeriodContributions; PERIODS_PER_YEAR],
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Contribution on one period's gross: `min(gross, cap) × (rate + additional)`.
///
/// `additional_override` replaces the configured additional rate when set.
///
/// ```
/// use net_pay_engine::calculation::capped_contribution;
/// use net_pay_engine::config::SocialContributionConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let pension = SocialContributionConfig {
///     employee_rate: Decimal::from_str("0.093").unwrap(),
///     cap_monthly: Decimal::from(8050),
///     additional_rate: None,
///     surcharge_without_children: None,
///     child_discount_per_child_after_first: None,
///     max_child_discount_children: None,
/// };
///
/// // Above the ceiling only the capped base counts
/// let amount = capped_contribution(Decimal::from(10000), &pension, None);
/// assert_eq!(amount, Decimal::from_str("748.65").unwrap());
/// ```
pub fn capped_contribution(
    period_gross: Decimal,
    config: &SocialContributionConfig,
    additional_override: Option<Decimal>,
) -> Decimal {
    let base = period_gross.min(config.cap_monthly).max(Decimal::ZERO);
    let additional = additional_override
        .or(config.additional_rate)
        .unwrap_or(Decimal::ZERO);
    (base * (config.employee_rate + additional)).max(Decimal::ZERO)
}

/// Effective long-term care rate for a number of dependents under 25.
///
/// Childless contributors pay the surcharge. From the second child on,
/// each child lowers the rate by the discount, up to the configured
/// number of discounted children. The rate never drops below zero.
pub fn long_term_care_rate(config: &SocialContributionConfig, children_under_25: u32) -> Decimal {
    let mut rate = config.employee_rate;

    if children_under_25 == 0 {
        rate += config.surcharge_without_children.unwrap_or(Decimal::ZERO);
    }

    let extra_children = children_under_25.saturating_sub(1);
    let discounted = match config.max_child_discount_children {
        Some(max) => extra_children.min(max),
        None => extra_children,
    };
    rate -= config
        .child_discount_per_child_after_first
        .unwrap_or(Decimal::ZERO)
        * Decimal::from(discounted);

    rate.max(Decimal::ZERO)
}

/// Calculates the four statutory contributions for every period.
///
/// Health is zero for privately insured callers. Otherwise the caller's
/// additional-rate percentage replaces the configured default. Long-term
/// care uses [`long_term_care_rate`] for the caller's dependents.
///
/// # Arguments
///
/// * `period_gross` - Gross per period, bonuses included
/// * `input` - The salary input carrying insurance flags and dependents
/// * `config` - The four contribution blocks
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_contributions(
    period_gross: &[Decimal; PERIODS_PER_YEAR],
    input: &SalaryInput,
    config: &SocialContributionsConfig,
    step_number: u32,
) -> ContributionResult {
    let health_additional =
        (input.health_insurance_additional_rate / Decimal::ONE_HUNDRED).max(Decimal::ZERO);
    let ltc_rate = long_term_care_rate(&config.long_term_care, input.children_under_25);

    let mut per_period = [PeriodContributions::default(); PERIODS_PER_YEAR];
    let mut annual = SocialContributions::default();

    for (&gross, period) in period_gross.iter().zip(per_period.iter_mut()) {
        let health = if input.private_health_insurance {
            Decimal::ZERO
        } else {
            capped_contribution(gross, &config.health, Some(health_additional))
        };
        let ltc_base = gross.min(config.long_term_care.cap_monthly).max(Decimal::ZERO);

        *period = PeriodContributions {
            health,
            pension: capped_contribution(gross, &config.pension, None),
            unemployment: capped_contribution(gross, &config.unemployment, None),
            long_term_care: ltc_base * ltc_rate,
        };

        annual.health += period.health;
        annual.pension += period.pension;
        annual.unemployment += period.unemployment;
        annual.long_term_care += period.long_term_care;
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_contributions".to_string(),
        rule_name: "Social Contributions".to_string(),
        input: serde_json::json!({
            "private_health_insurance": input.private_health_insurance,
            "health_additional_rate": health_additional.normalize().to_string(),
            "children_under_25": input.children_under_25,
            "long_term_care_rate": ltc_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "health": annual.health.normalize().to_string(),
            "pension": annual.pension.normalize().to_string(),
            "unemployment": annual.unemployment.normalize().to_string(),
            "long_term_care": annual.long_term_care.normalize().to_string()
        }),
        reasoning: format!(
            "Per-period capped contributions summed over {} periods = {}",
            PERIODS_PER_YEAR,
            annual.total().normalize()
        ),
    };

    ContributionResult {
        annual,
        per_period,
        audit_step,
    }
}
