//! Shared components and utilities for the precursor study calculators.
//!
//! Common configuration, numerical helpers and unit conversions used by the
//! work-package models.

pub mod algo;
pub mod config;
pub mod units;

pub use config::{ConfigError, Constants};
