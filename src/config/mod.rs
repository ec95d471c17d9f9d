//! Configuration loading and management for the Net Pay Engine.
//!
//! This module provides functionality to load a jurisdiction configuration
//! from YAML files: tax classes with their bracket schedules, social
//! contribution parameters, solidarity and church tax, and allowances.
//!
//! # Example
//!
//! ```no_run
//! use net_pay_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/de_2025").unwrap();
//! println!("Loaded jurisdiction: {}", config.metadata().country);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceConfig, AllowancesConfig, ChurchTaxConfig, CompanyCarBenefitRates,
    ContributionsConfig, JurisdictionConfig, JurisdictionMetadata, SocialContributionConfig,
    SocialContributionsConfig, SolidarityTaxConfig, TaxBracket, TaxClassConfig,
    TaxClassesConfig, VoluntaryInsuranceConfig,
};
