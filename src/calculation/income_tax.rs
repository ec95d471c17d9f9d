//! Progressive income tax functionality.
//!
//! This module evaluates a tax class's bracket schedule against taxable
//! income after the class allowances.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{TaxBracket, TaxClassConfig};
use crate::models::AuditStep;

/// The result of evaluating the bracket schedule.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Annual income tax.
    pub tax: Decimal,
    /// Taxable income minus the basic and additional allowances.
    pub adjusted_income: Decimal,
    /// Index of the bracket applied, `None` for an empty schedule.
    pub bracket_index: Option<usize>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Selects the bracket covering `adjusted_income`.
///
/// Returns the first bracket whose upper bound is at least the income, an
/// unbounded bracket matching everything. A schedule that runs out of
/// brackets falls back to its last bracket.
pub fn select_bracket(brackets: &[TaxBracket], adjusted_income: Decimal) -> Option<usize> {
    brackets
        .iter()
        .position(|b| b.up_to.is_none_or(|limit| adjusted_income <= limit))
        .or_else(|| brackets.len().checked_sub(1))
}

/// Income after the class allowances, floored at zero.
pub fn adjusted_income(taxable_income: Decimal, tax_class: &TaxClassConfig) -> Decimal {
    (taxable_income - tax_class.basic_allowance - tax_class.additional_allowance)
        .max(Decimal::ZERO)
}

/// Tax owed within one bracket: `base_tax + (income - base_income) × rate`.
pub fn bracket_tax(bracket: &TaxBracket, adjusted_income: Decimal) -> Decimal {
    (bracket.base_tax + (adjusted_income - bracket.base_income) * bracket.rate).max(Decimal::ZERO)
}

/// Income tax for a taxable income, without an audit step.
///
/// ```
/// use net_pay_engine::calculation::income_tax;
/// use net_pay_engine::config::{TaxBracket, TaxClassConfig};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let class = TaxClassConfig {
///     label: "Flat".to_string(),
///     basic_allowance: Decimal::from(10000),
///     additional_allowance: Decimal::ZERO,
///     brackets: vec![TaxBracket {
///         up_to: None,
///         rate: Decimal::from_str("0.25").unwrap(),
///         base_tax: Decimal::ZERO,
///         base_income: Decimal::ZERO,
///     }],
///     child_allowance_factor_multiplier: None,
/// };
///
/// assert_eq!(income_tax(Decimal::from(30000), &class), Decimal::from(5000));
/// assert_eq!(income_tax(Decimal::from(8000), &class), Decimal::ZERO);
/// ```
pub fn income_tax(taxable_income: Decimal, tax_class: &TaxClassConfig) -> Decimal {
    let adjusted = adjusted_income(taxable_income, tax_class);
    select_bracket(&tax_class.brackets, adjusted)
        .map(|index| bracket_tax(&tax_class.brackets[index], adjusted))
        .unwrap_or(Decimal::ZERO)
}

/// Calculates income tax and records the bracket decision.
///
/// # Arguments
///
/// * `taxable_income` - Annual taxable income after allowances and benefits
/// * `tax_class` - The caller's tax class
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_income_tax(
    taxable_income: Decimal,
    tax_class: &TaxClassConfig,
    step_number: u32,
) -> IncomeTaxResult {
    let adjusted = adjusted_income(taxable_income, tax_class);
    let bracket_index = select_bracket(&tax_class.brackets, adjusted);
    let bracket = bracket_index.map(|index| &tax_class.brackets[index]);
    let tax = bracket
        .map(|b| bracket_tax(b, adjusted))
        .unwrap_or(Decimal::ZERO);

    debug!(
        tax_class = %tax_class.label,
        adjusted_income = %adjusted,
        bracket = ?bracket_index,
        "Selected income tax bracket"
    );

    let reasoning = match bracket {
        Some(b) => format!(
            "{} + ({} - {}) x {} = {}",
            b.base_tax.normalize(),
            adjusted.normalize(),
            b.base_income.normalize(),
            b.rate.normalize(),
            tax.normalize()
        ),
        None => "No brackets configured, tax is zero".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Progressive Income Tax".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "basic_allowance": tax_class.basic_allowance.normalize().to_string(),
            "additional_allowance": tax_class.additional_allowance.normalize().to_string()
        }),
        output: serde_json::json!({
            "adjusted_income": adjusted.normalize().to_string(),
            "bracket_index": bracket_index,
            "rate": bracket.map(|b| b.rate.normalize().to_string()),
            "tax": tax.normalize().to_string()
        }),
        reasoning,
    };

    IncomeTaxResult {
        tax,
        adjusted_income: adjusted,
        bracket_index,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(up_to: Option<&str>, rate: &str, base_tax: &str, base_income: &str) -> TaxBracket {
        TaxBracket {
            up_to: up_to.map(dec),
            rate: dec(rate),
            base_tax: dec(base_tax),
            base_income: dec(base_income),
        }
    }

    fn class_i() -> TaxClassConfig {
        TaxClassConfig {
            label: "Single".to_string(),
            basic_allowance: dec("12096"),
            additional_allowance: dec("1266"),
            brackets: vec![
                bracket(Some("5347"), "0.19", "0", "0"),
                bracket(Some("56384"), "0.3317", "1015.93", "5347"),
                bracket(Some("265729"), "0.42", "17944.90", "56384"),
                bracket(None, "0.45", "105869.80", "265729"),
            ],
            child_allowance_factor_multiplier: None,
        }
    }

    /// IT-001: income below the allowances is untaxed
    #[test]
    fn test_income_below_allowances_is_untaxed() {
        let result = calculate_income_tax(dec("10000"), &class_i(), 1);

        assert_eq!(result.adjusted_income, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.bracket_index, Some(0));
    }

    /// IT-002: first bracket
    #[test]
    fn test_first_bracket() {
        // adjusted 5000 × 0.19
        let result = calculate_income_tax(dec("18362"), &class_i(), 1);

        assert_eq!(result.adjusted_income, dec("5000"));
        assert_eq!(result.tax, dec("950"));
    }

    /// IT-003: second bracket uses base tax and base income
    #[test]
    fn test_second_bracket() {
        let result = calculate_income_tax(dec("50000"), &class_i(), 1);

        assert_eq!(result.adjusted_income, dec("36638"));
        assert_eq!(result.bracket_index, Some(1));
        assert_eq!(result.tax, dec("11395.1547"));
    }

    /// IT-004: upper bound is inclusive
    #[test]
    fn test_bracket_upper_bound_inclusive() {
        let brackets = class_i().brackets;

        assert_eq!(select_bracket(&brackets, dec("5347")), Some(0));
        assert_eq!(select_bracket(&brackets, dec("5347.01")), Some(1));
    }

    /// IT-005: unbounded top bracket
    #[test]
    fn test_top_bracket() {
        let result = calculate_income_tax(dec("313362"), &class_i(), 1);

        // 105869.80 + 34271 × 0.45
        assert_eq!(result.bracket_index, Some(3));
        assert_eq!(result.tax, dec("121291.75"));
    }

    /// IT-006: schedule without an unbounded bracket falls back to the last
    #[test]
    fn test_fallthrough_uses_last_bracket() {
        let mut class = class_i();
        class.brackets.pop();

        let result = calculate_income_tax(dec("513362"), &class, 1);

        assert_eq!(result.bracket_index, Some(2));
        // 17944.90 + (500000 - 56384) × 0.42
        assert_eq!(result.tax, dec("204263.62"));
    }

    #[test]
    fn test_empty_schedule_is_zero() {
        let mut class = class_i();
        class.brackets.clear();

        let result = calculate_income_tax(dec("100000"), &class, 1);

        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.bracket_index, None);
        assert_eq!(income_tax(dec("100000"), &class), Decimal::ZERO);
    }

    #[test]
    fn test_tax_is_monotonic_across_bracket_edges() {
        let class = class_i();
        let mut previous = Decimal::ZERO;

        for step in 0..400 {
            let taxable = Decimal::from(step * 1000);
            let tax = income_tax(taxable, &class);
            assert!(tax >= previous, "tax fell at {taxable}");
            previous = tax;
        }
    }

    #[test]
    fn test_income_tax_matches_calculate() {
        let class = class_i();

        assert_eq!(
            income_tax(dec("72000"), &class),
            calculate_income_tax(dec("72000"), &class, 1).tax
        );
    }

    #[test]
    fn test_audit_step_records_bracket() {
        let result = calculate_income_tax(dec("50000"), &class_i(), 3);

        assert_eq!(result.audit_step.rule_id, "income_tax");
        assert_eq!(result.audit_step.output["bracket_index"], 1);
        assert_eq!(result.audit_step.output["rate"], "0.3317");
        assert_eq!(result.audit_step.output["tax"], "11395.1547");
    }
}
