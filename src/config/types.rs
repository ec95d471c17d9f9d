//! Configuration types for net pay calculation.
//!
//! This module contains the strongly-typed jurisdiction configuration
//! structures that are deserialized from YAML configuration files and
//! passed by reference into every calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Metadata about the jurisdiction snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// The country code (e.g., "DE").
    pub country: String,
    /// The ISO 4217 currency code (e.g., "EUR").
    pub currency: String,
    /// The tax year these parameters describe.
    pub tax_year: i32,
}

/// A single bracket of a progressive tax schedule.
///
/// `base_tax` must already encode the cumulative tax of all lower
/// brackets; the schedule is piecewise linear and anchored at each
/// bracket's `(base_income, base_tax)` point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of adjusted income for this bracket, `None` when unbounded.
    pub up_to: Option<Decimal>,
    /// Marginal rate applied above `base_income`.
    pub rate: Decimal,
    /// Tax owed at the start of the bracket.
    pub base_tax: Decimal,
    /// Adjusted income at the start of the bracket.
    pub base_income: Decimal,
}

/// Tax class parameters: allowances and the bracket schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassConfig {
    /// Human-readable label for the tax class.
    pub label: String,
    /// Basic tax-free allowance.
    pub basic_allowance: Decimal,
    /// Additional allowance (lump sums, single-parent relief, ...).
    pub additional_allowance: Decimal,
    /// Brackets sorted ascending by upper bound; the last one is unbounded.
    pub brackets: Vec<TaxBracket>,
    /// Multiplier applied to the per-factor child allowance.
    #[serde(default)]
    pub child_allowance_factor_multiplier: Option<Decimal>,
}

/// Parameters for one category of capped social contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributionConfig {
    /// The employee share of the contribution rate.
    pub employee_rate: Decimal,
    /// Monthly income ceiling the rate applies to.
    pub cap_monthly: Decimal,
    /// Default additional rate on top of the employee rate.
    #[serde(default)]
    pub additional_rate: Option<Decimal>,
    /// Surcharge for contributors without dependents under 25.
    #[serde(default)]
    pub surcharge_without_children: Option<Decimal>,
    /// Rate discount for each dependent after the first.
    #[serde(default)]
    pub child_discount_per_child_after_first: Option<Decimal>,
    /// Maximum number of dependents that earn the discount.
    #[serde(default)]
    pub max_child_discount_children: Option<u32>,
}

/// The four statutory social contribution blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributionsConfig {
    /// Statutory health insurance.
    pub health: SocialContributionConfig,
    /// Statutory pension insurance.
    pub pension: SocialContributionConfig,
    /// Unemployment insurance.
    pub unemployment: SocialContributionConfig,
    /// Long-term care insurance.
    pub long_term_care: SocialContributionConfig,
}

/// Solidarity surcharge parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidarityTaxConfig {
    /// Taxable income at or below which no surcharge is due.
    pub free_allowance: Decimal,
    /// Surcharge rate applied to the income tax.
    pub rate: Decimal,
}

/// Church tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurchTaxConfig {
    /// Fallback rate for subdivisions without an explicit entry.
    pub rate: Decimal,
    /// Rate per jurisdiction subdivision code.
    #[serde(default)]
    pub rate_by_state: BTreeMap<String, Decimal>,
}

impl ChurchTaxConfig {
    /// Returns the rate for a subdivision, falling back to the default rate.
    pub fn rate_for(&self, subdivision: &str) -> Decimal {
        self.rate_by_state
            .get(subdivision)
            .copied()
            .unwrap_or(self.rate)
    }
}

/// Voluntary supplemental insurance parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoluntaryInsuranceConfig {
    /// Monthly gross above which the supplemental rate applies.
    pub threshold_monthly: Decimal,
    /// Rate applied to the monthly gross above the threshold.
    pub additional_rate: Decimal,
}

/// Allowance and benefit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceConfig {
    /// Allowance per remote-work day.
    pub home_office_daily_rate: Decimal,
    /// Annual ceiling of the remote-work allowance.
    pub home_office_max: Decimal,
    /// Per-km rate for the first 20 km of the commute.
    pub commute_rate_first_20: Decimal,
    /// Per-km rate beyond 20 km.
    pub commute_rate_beyond: Decimal,
    /// Voluntary supplemental insurance.
    pub voluntary_insurance: VoluntaryInsuranceConfig,
    /// Tax-free monthly value of meal vouchers.
    pub meal_voucher_tax_free_limit: Decimal,
    /// Monthly employer cap on the capital-gains allowance.
    pub capital_gains_allowance_max_employer: Decimal,
    /// Child allowance per allowance factor.
    pub child_allowance_per_factor: Decimal,
}

/// Monthly benefit-in-kind rates by vehicle propulsion category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCarBenefitRates {
    /// Rate for combustion-engine vehicles.
    pub combustion: Decimal,
    /// Rate for plug-in hybrid vehicles.
    pub hybrid: Decimal,
    /// Rate for fully electric vehicles.
    pub electric: Decimal,
}

/// Tax classes file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxClassesConfig {
    /// Map of tax class identifier to its parameters.
    pub tax_classes: BTreeMap<String, TaxClassConfig>,
}

/// Contributions file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsConfig {
    /// The four social contribution blocks.
    pub social_contributions: SocialContributionsConfig,
    /// Solidarity surcharge parameters.
    pub solidarity_tax: SolidarityTaxConfig,
    /// Church tax parameters.
    pub church_tax: ChurchTaxConfig,
}

/// Allowances file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowancesConfig {
    /// Allowance parameters.
    pub allowances: AllowanceConfig,
    /// Benefit-in-kind rates for company vehicles.
    pub company_car_benefit_rates: CompanyCarBenefitRates,
    /// Monthly tax-free ceiling for company pension contributions.
    pub company_pension_max_tax_free: Decimal,
}

/// A complete jurisdiction configuration snapshot.
///
/// This is the single value every calculation reads its parameters
/// from. It carries no interior mutability, so one snapshot can be
/// shared across threads and several snapshots evaluated side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    /// Jurisdiction metadata.
    pub meta: JurisdictionMetadata,
    /// Tax classes keyed by identifier.
    pub tax_classes: BTreeMap<String, TaxClassConfig>,
    /// Social contribution parameters.
    pub social_contributions: SocialContributionsConfig,
    /// Solidarity surcharge parameters.
    pub solidarity_tax: SolidarityTaxConfig,
    /// Church tax parameters.
    pub church_tax: ChurchTaxConfig,
    /// Allowance parameters.
    pub allowances: AllowanceConfig,
    /// Benefit-in-kind rates for company vehicles.
    pub company_car_benefit_rates: CompanyCarBenefitRates,
    /// Monthly tax-free ceiling for company pension contributions.
    pub company_pension_max_tax_free: Decimal,
}

impl JurisdictionConfig {
    /// Assembles a snapshot from the parsed configuration files.
    pub fn new(
        meta: JurisdictionMetadata,
        tax_classes: TaxClassesConfig,
        contributions: ContributionsConfig,
        allowances: AllowancesConfig,
    ) -> Self {
        Self {
            meta,
            tax_classes: tax_classes.tax_classes,
            social_contributions: contributions.social_contributions,
            solidarity_tax: contributions.solidarity_tax,
            church_tax: contributions.church_tax,
            allowances: allowances.allowances,
            company_car_benefit_rates: allowances.company_car_benefit_rates,
            company_pension_max_tax_free: allowances.company_pension_max_tax_free,
        }
    }

    /// Looks up a tax class by identifier.
    ///
    /// Returns `TaxClassNotFound` rather than falling back to a default
    /// class.
    pub fn tax_class(&self, id: &str) -> EngineResult<&TaxClassConfig> {
        self.tax_classes
            .get(id)
            .ok_or_else(|| EngineError::TaxClassNotFound {
                tax_class: id.to_string(),
            })
    }
}
