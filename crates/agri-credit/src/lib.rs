//! Core library for the farmer credit evaluation and scheme-eligibility engine.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
