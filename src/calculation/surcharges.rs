//! Solidarity surcharge and church tax.
//!
//! Both are levied on the income tax, never on income directly.

use rust_decimal::Decimal;

use crate::config::{ChurchTaxConfig, SolidarityTaxConfig};
use crate::models::AuditStep;

/// The result of computing a surcharge on the income tax.
#[derive(Debug, Clone)]
pub struct SurchargeResult {
    /// The surcharge amount.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Solidarity surcharge amount.
///
/// Charged as `income_tax × rate` only when the caller is liable, the
/// income tax is positive, and taxable income exceeds the free allowance.
/// Crossing the allowance applies the full rate at once.
pub fn solidarity_tax(
    taxable_income: Decimal,
    income_tax: Decimal,
    liable: bool,
    config: &SolidarityTaxConfig,
) -> Decimal {
    if !liable || income_tax <= Decimal::ZERO || taxable_income <= config.free_allowance {
        return Decimal::ZERO;
    }
    income_tax * config.rate
}

/// Church tax amount: `income_tax × subdivision rate` when liable.
///
/// Unknown subdivisions use the default rate.
pub fn church_tax(
    income_tax: Decimal,
    liable: bool,
    subdivision: &str,
    config: &ChurchTaxConfig,
) -> Decimal {
    if !liable || income_tax <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    income_tax * config.rate_for(subdivision)
}

/// Calculates the solidarity surcharge with its audit step.
pub fn calculate_solidarity_tax(
    taxable_income: Decimal,
    income_tax: Decimal,
    liable: bool,
    config: &SolidarityTaxConfig,
    step_number: u32,
) -> SurchargeResult {
    let amount = solidarity_tax(taxable_income, income_tax, liable, config);

    let reasoning = if !liable {
        "Not liable for solidarity surcharge".to_string()
    } else if amount.is_zero() {
        format!(
            "Taxable income {} within free allowance {} or no income tax",
            taxable_income.normalize(),
            config.free_allowance.normalize()
        )
    } else {
        format!(
            "{} x {} = {}",
            income_tax.normalize(),
            config.rate.normalize(),
            amount.normalize()
        )
    };

    SurchargeResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "solidarity_tax".to_string(),
            rule_name: "Solidarity Surcharge".to_string(),
            input: serde_json::json!({
                "liable": liable,
                "taxable_income": taxable_income.normalize().to_string(),
                "income_tax": income_tax.normalize().to_string(),
                "free_allowance": config.free_allowance.normalize().to_string()
            }),
            output: serde_json::json!({
                "solidarity_tax": amount.normalize().to_string()
            }),
            reasoning,
        },
    }
}

/// Calculates church tax with its audit step.
pub fn calculate_church_tax(
    income_tax: Decimal,
    liable: bool,
    subdivision: &str,
    config: &ChurchTaxConfig,
    step_number: u32,
) -> SurchargeResult {
    let rate = config.rate_for(subdivision);
    let amount = church_tax(income_tax, liable, subdivision, config);

    let reasoning = if liable {
        format!(
            "{} x {} ({}) = {}",
            income_tax.normalize(),
            rate.normalize(),
            subdivision,
            amount.normalize()
        )
    } else {
        "Not liable for church tax".to_string()
    };

    SurchargeResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "church_tax".to_string(),
            rule_name: "Church Tax".to_string(),
            input: serde_json::json!({
                "liable": liable,
                "subdivision": subdivision,
                "income_tax": income_tax.normalize().to_string()
            }),
            output: serde_json::json!({
                "rate": rate.normalize().to_string(),
                "church_tax": amount.normalize().to_string()
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn solidarity() -> SolidarityTaxConfig {
        SolidarityTaxConfig {
            free_allowance: dec("73000"),
            rate: dec("0.055"),
        }
    }

    fn church() -> ChurchTaxConfig {
        let mut rate_by_state = BTreeMap::new();
        rate_by_state.insert("BY".to_string(), dec("0.08"));
        rate_by_state.insert("NW".to_string(), dec("0.09"));
        ChurchTaxConfig {
            rate: dec("0.09"),
            rate_by_state,
        }
    }

    /// ST-001: below the free allowance nothing is charged
    #[test]
    fn test_solidarity_below_allowance() {
        assert_eq!(
            solidarity_tax(dec("73000"), dec("15000"), true, &solidarity()),
            Decimal::ZERO
        );
    }

    /// ST-002: crossing the allowance charges the full rate
    #[test]
    fn test_solidarity_cliff_above_allowance() {
        assert_eq!(
            solidarity_tax(dec("73000.01"), dec("20000"), true, &solidarity()),
            dec("1100")
        );
    }

    #[test]
    fn test_solidarity_requires_liability_and_tax() {
        let config = solidarity();

        assert_eq!(
            solidarity_tax(dec("100000"), dec("20000"), false, &config),
            Decimal::ZERO
        );
        assert_eq!(
            solidarity_tax(dec("100000"), Decimal::ZERO, true, &config),
            Decimal::ZERO
        );
    }

    /// CT-001: subdivision rate applies
    #[test]
    fn test_church_tax_subdivision_rate() {
        assert_eq!(church_tax(dec("10000"), true, "BY", &church()), dec("800"));
        assert_eq!(church_tax(dec("10000"), true, "NW", &church()), dec("900"));
    }

    /// CT-002: unknown subdivision uses the default rate
    #[test]
    fn test_church_tax_unknown_subdivision() {
        assert_eq!(church_tax(dec("10000"), true, "XX", &church()), dec("900"));
    }

    #[test]
    fn test_church_tax_requires_liability_and_tax() {
        assert_eq!(church_tax(dec("10000"), false, "BY", &church()), Decimal::ZERO);
        assert_eq!(church_tax(dec("-5"), true, "BY", &church()), Decimal::ZERO);
    }

    #[test]
    fn test_audit_steps() {
        let soli = calculate_solidarity_tax(dec("80000"), dec("20000"), true, &solidarity(), 4);
        let church = calculate_church_tax(dec("20000"), true, "BY", &church(), 5);

        assert_eq!(soli.audit_step.rule_id, "solidarity_tax");
        assert_eq!(soli.audit_step.output["solidarity_tax"], "1100");
        assert_eq!(church.audit_step.step_number, 5);
        assert_eq!(church.audit_step.output["rate"], "0.08");
        assert_eq!(church.amount, dec("1600"));
    }
}
