//! Bonus distribution functionality.
//!
//! This module spreads the base gross and every bonus entry across the
//! twelve pay periods of the year.

use rust_decimal::Decimal;

use crate::models::{AuditStep, BonusEntry, BonusKind, PERIODS_PER_YEAR};

/// The largest number of paid periods in a year.
pub const MAX_PAID_PERIODS: u32 = PERIODS_PER_YEAR as u32;

/// The result of distributing base gross and bonuses over the year.
#[derive(Debug, Clone)]
pub struct BonusDistribution {
    /// Gross per period, bonuses included.
    pub period_gross: [Decimal; PERIODS_PER_YEAR],
    /// Total value of all bonus entries.
    pub annual_bonuses: Decimal,
    /// Base gross × paid periods, before any bonus.
    pub base_annual_gross: Decimal,
    /// The audit step recording this distribution.
    pub audit_step: AuditStep,
}

/// Resolves the number of paid periods.
///
/// Zero or negative counts mean a full year; counts above twelve are capped.
///
/// ```
/// use net_pay_engine::calculation::resolve_paid_periods;
///
/// assert_eq!(resolve_paid_periods(10), 10);
/// assert_eq!(resolve_paid_periods(0), 12);
/// assert_eq!(resolve_paid_periods(-4), 12);
/// assert_eq!(resolve_paid_periods(14), 12);
/// ```
pub fn resolve_paid_periods(paid_periods: i32) -> u32 {
    if paid_periods <= 0 {
        MAX_PAID_PERIODS
    } else {
        (paid_periods as u32).min(MAX_PAID_PERIODS)
    }
}

/// Clamps a 1-based bonus period into 1..=12 and returns its 0-based index.
pub fn bonus_period_index(period: i32) -> usize {
    (period.clamp(1, MAX_PAID_PERIODS as i32) - 1) as usize
}

/// Resolves a bonus entry to an absolute, non-negative amount.
///
/// Percentage bonuses are computed against `base_annual_gross`, which
/// excludes every other bonus.
pub fn resolve_bonus_value(entry: &BonusEntry, base_annual_gross: Decimal) -> Decimal {
    let value = match entry.kind {
        BonusKind::Amount => entry.value,
        BonusKind::Percent => entry.value * base_annual_gross / Decimal::ONE_HUNDRED,
    };
    value.max(Decimal::ZERO)
}

/// Distributes the base gross and all bonuses into twelve period figures.
///
/// Periods after the last paid period carry no base gross but still
/// receive any bonus targeted at them. Bonuses in the same period
/// accumulate.
///
/// # Arguments
///
/// * `base_monthly_gross` - Gross per paid period before bonuses
/// * `paid_periods` - Raw paid-period count, resolved via [`resolve_paid_periods`]
/// * `bonuses` - Bonus entries in input order
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use net_pay_engine::calculation::distribute_bonuses;
/// use net_pay_engine::models::{BonusEntry, BonusKind};
/// use rust_decimal::Decimal;
///
/// let bonuses = vec![BonusEntry {
///     id: "summer".to_string(),
///     period: 6,
///     kind: BonusKind::Amount,
///     value: Decimal::new(1200, 0),
///     description: None,
/// }];
///
/// let result = distribute_bonuses(Decimal::new(3000, 0), 12, &bonuses, 1);
/// assert_eq!(result.period_gross[5], Decimal::new(4200, 0));
/// assert_eq!(result.period_gross[0], Decimal::new(3000, 0));
/// assert_eq!(result.annual_bonuses, Decimal::new(1200, 0));
/// ```
pub fn distribute_bonuses(
    base_monthly_gross: Decimal,
    paid_periods: i32,
    bonuses: &[BonusEntry],
    step_number: u32,
) -> BonusDistribution {
    let paid_periods = resolve_paid_periods(paid_periods);
    let base_monthly_gross = base_monthly_gross.max(Decimal::ZERO);

    let mut period_gross = [Decimal::ZERO; PERIODS_PER_YEAR];
    for gross in period_gross.iter_mut().take(paid_periods as usize) {
        *gross = base_monthly_gross;
    }
    let base_annual_gross = base_monthly_gross * Decimal::from(paid_periods);

    let mut annual_bonuses = Decimal::ZERO;
    let mut resolved = Vec::with_capacity(bonuses.len());
    for entry in bonuses {
        let index = bonus_period_index(entry.period);
        let value = resolve_bonus_value(entry, base_annual_gross);
        period_gross[index] += value;
        annual_bonuses += value;
        resolved.push(serde_json::json!({
            "id": entry.id,
            "period": index + 1,
            "amount": value.normalize().to_string()
        }));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "bonus_distribution".to_string(),
        rule_name: "Bonus Distribution".to_string(),
        input: serde_json::json!({
            "base_monthly_gross": base_monthly_gross.normalize().to_string(),
            "paid_periods": paid_periods,
            "bonus_count": bonuses.len()
        }),
        output: serde_json::json!({
            "base_annual_gross": base_annual_gross.normalize().to_string(),
            "annual_bonuses": annual_bonuses.normalize().to_string(),
            "bonuses": resolved
        }),
        reasoning: format!(
            "{} x {} periods = {} base, plus {} in {} bonus(es)",
            base_monthly_gross.normalize(),
            paid_periods,
            base_annual_gross.normalize(),
            annual_bonuses.normalize(),
            bonuses.len()
        ),
    };

    BonusDistribution {
        period_gross,
        annual_bonuses,
        base_annual_gross,
        audit_step,
    }
}
