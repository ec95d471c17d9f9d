//! Salary breakdown models.
//!
//! This module contains the [`SalaryBreakdown`] produced by a net pay
//! calculation and the grouped figures it is built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// Number of pay periods in a year.
pub const PERIODS_PER_YEAR: usize = 12;

/// Annual social contributions by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributions {
    /// Statutory health insurance.
    pub health: Decimal,
    /// Pension insurance.
    pub pension: Decimal,
    /// Unemployment insurance.
    pub unemployment: Decimal,
    /// Long-term care insurance.
    pub long_term_care: Decimal,
    /// Voluntary supplemental insurance.
    pub voluntary: Decimal,
}

impl SocialContributions {
    /// Sum of all five categories.
    pub fn total(&self) -> Decimal {
        self.health + self.pension + self.unemployment + self.long_term_care + self.voluntary
    }
}

/// Annual allowances and benefits that shaped the taxable income.
///
/// `company_car_benefit` and `meal_voucher_taxable` increase taxable
/// income; the remaining deductions decrease it. `child_allowance` is
/// reported for information and does not enter the taxable income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSummary {
    /// Remote-work allowance.
    pub home_office: Decimal,
    /// Commuting allowance.
    pub commute: Decimal,
    /// Tax-free company pension contributions.
    pub company_pension: Decimal,
    /// Capital-gains allowance deduction.
    pub capital_gains: Decimal,
    /// Company vehicle benefit-in-kind.
    pub company_car_benefit: Decimal,
    /// Taxable portion of meal vouchers.
    pub meal_voucher_taxable: Decimal,
    /// Child allowance (informational).
    pub child_allowance: Decimal,
}

impl AllowanceSummary {
    /// Amounts added to taxable income.
    pub fn taxable_additions(&self) -> Decimal {
        self.company_car_benefit + self.meal_voucher_taxable
    }

    /// Amounts subtracted from taxable income.
    pub fn taxable_reductions(&self) -> Decimal {
        self.home_office + self.commute + self.company_pension + self.capital_gains
    }
}

/// The complete annual and per-period result of a net pay calculation.
///
/// Annual contribution totals are the sums of per-period capped
/// contributions. `period_net` apportions taxes on each period's own
/// gross; it is a display figure, not period-exact withholding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Paid periods the year was computed over (1..=12).
    pub paid_periods: u32,
    /// Average gross per paid period, bonuses included.
    pub monthly_gross: Decimal,
    /// Annual gross, bonuses included.
    pub annual_gross: Decimal,
    /// Total of all bonus entries.
    pub annual_bonuses: Decimal,
    /// Income the bracket schedule was evaluated against.
    pub taxable_income: Decimal,
    /// Progressive income tax.
    pub income_tax: Decimal,
    /// Solidarity surcharge.
    pub solidarity_tax: Decimal,
    /// Church tax.
    pub church_tax: Decimal,
    /// Social contributions by category.
    pub social_contributions: SocialContributions,
    /// Allowances and benefits that fed taxable income.
    pub allowances: AllowanceSummary,
    /// Taxes plus social contributions.
    pub total_deductions: Decimal,
    /// Annual net pay.
    pub annual_net: Decimal,
    /// Annual net averaged over the paid periods.
    pub monthly_net: Decimal,
    /// Gross per period, January first.
    pub period_gross: [Decimal; PERIODS_PER_YEAR],
    /// Net per period, January first.
    pub period_net: [Decimal; PERIODS_PER_YEAR],
    /// Ordered record of the rules applied.
    pub audit_trace: AuditTrace,
}

impl SalaryBreakdown {
    /// Sum of the three taxes.
    pub fn total_taxes(&self) -> Decimal {
        self.income_tax + self.solidarity_tax + self.church_tax
    }
}
