//! Net Pay Engine for gross-to-net salary calculation
//!
//! This crate computes annual and per-period net pay from gross pay under a
//! configurable national tax and social-insurance regime, and serves the
//! calculation over a small HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
