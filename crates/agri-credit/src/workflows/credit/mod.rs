//! Credit evaluation and scheme-eligibility workflow.
//!
//! The pipeline runs normalizer -> scoring -> classifier -> matcher, then the
//! service persists each run (append-only ledger plus denormalized current
//! state) and composes the dashboard read path.

pub mod catalog;
pub(crate) mod classifier;
pub mod domain;
pub(crate) mod matcher;
pub mod normalizer;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityEntry, ActivityKind, AlgorithmVersion, AttributeBand, CreditAttributes, CropType,
    EvaluationId, EvaluationRecord, FarmerId, FarmerProfile, IrrigationSource, LoanEligibility,
    LoanStatus, MatchStrength, NormalizedInput, RepaymentHistory, RiskFactor, RiskFactorKind,
    SchemeCategory, SchemeDefinition, SchemeEligibility, SchemeId, ScoreBand,
};
pub use normalizer::{FieldIssue, ValidationError};
pub use repository::{
    ActivityLog, EligibilityStore, EvaluationLedger, ProfileStore, RepositoryError,
    SchemeCatalogSource,
};
pub use router::credit_router;
pub use service::{ComputationError, CreditAnalysisService, CreditServiceError};
pub use views::{AnalysisOutcome, DashboardView, LoanEligibilityView, SchemeMatchView};
