//! Core data models for the Net Pay Engine.
//!
//! This module contains the caller-supplied input, the computed
//! breakdown, and the audit and API result types.

mod breakdown;
mod calculation_result;
mod salary_input;

pub use breakdown::{AllowanceSummary, PERIODS_PER_YEAR, SalaryBreakdown, SocialContributions};
pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, CalculationResult};
pub use salary_input::{
    BonusEntry, BonusKind, NON_NUMERIC_BONUS_PERIOD, SalaryInput, VehiclePropulsion,
};
