use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use super::classifier;
use super::domain::{
    ActivityEntry, ActivityKind, AlgorithmVersion, CreditAttributes, EvaluationId,
    EvaluationRecord, FarmerId, FarmerProfile, NormalizedInput, SchemeDefinition,
    SchemeEligibility,
};
use super::matcher::{self, EvaluationContext};
use super::normalizer::{normalize, ValidationError};
use super::repository::{
    ActivityLog, EligibilityStore, EvaluationLedger, ProfileStore, RepositoryError,
    SchemeCatalogSource,
};
use super::scoring;
use super::views::{
    AnalysisOutcome, DashboardView, LoanEligibilityView, RiskFactorView, SchemeMatchView,
};
use crate::config::EngineConfig;

/// The scoring computation failed, timed out, or returned a score outside
/// the declared bounds. No ledger entry is written in this case.
#[derive(Debug, thiserror::Error)]
pub enum ComputationError {
    #[error("credit scoring timed out after {0:?}")]
    Timeout(Duration),
    #[error("credit scoring worker failed: {0}")]
    Worker(String),
    #[error("computed score {score} outside bounds {min}..={max}")]
    OutOfRange { score: u16, min: u16, max: u16 },
}

/// Error raised by the credit analysis service.
#[derive(Debug, thiserror::Error)]
pub enum CreditServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

/// Service composing the normalizer, scoring engine, classifier, matcher,
/// and the persistence discipline around them.
pub struct CreditAnalysisService {
    ledger: Arc<dyn EvaluationLedger>,
    profiles: Arc<dyn ProfileStore>,
    eligibility: Arc<dyn EligibilityStore>,
    catalog: Arc<dyn SchemeCatalogSource>,
    activity: Arc<dyn ActivityLog>,
    config: EngineConfig,
    algorithm_version: AlgorithmVersion,
}

impl CreditAnalysisService {
    pub fn new(
        ledger: Arc<dyn EvaluationLedger>,
        profiles: Arc<dyn ProfileStore>,
        eligibility: Arc<dyn EligibilityStore>,
        catalog: Arc<dyn SchemeCatalogSource>,
        activity: Arc<dyn ActivityLog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ledger,
            profiles,
            eligibility,
            catalog,
            activity,
            config,
            algorithm_version: AlgorithmVersion::v1(),
        }
    }

    /// Run a full analysis: normalize, score, classify, match the catalog,
    /// then persist (ledger append plus denormalized writes as a saga).
    pub async fn analyze(
        &self,
        farmer_id: FarmerId,
        raw: CreditAttributes,
    ) -> Result<AnalysisOutcome, CreditServiceError> {
        let input = normalize(raw)?;
        let score = self.computed_score(&input).await?;

        let band = classifier::band_for(score);
        let risk_factors = classifier::risk_factors(&input);
        let loan_eligibility = classifier::loan_tier(band);

        let schemes = self.catalog.schemes()?;
        let ctx = EvaluationContext {
            score,
            input: &input,
        };
        let rows = matcher::match_catalog(&ctx, &farmer_id, &schemes);

        let record = EvaluationRecord {
            id: next_evaluation_id(),
            farmer_id: farmer_id.clone(),
            score,
            risk_factors: risk_factors.clone(),
            loan_eligibility: loan_eligibility.clone(),
            input: input.clone(),
            algorithm_version: self.algorithm_version.clone(),
            created_at: Utc::now(),
        };
        let stored = self.ledger.append(record)?;

        if let Err(err) = self.commit_denormalized(&farmer_id, &input, score, &rows) {
            // Compensate the append so the ledger never holds a score the
            // denormalized state does not reflect.
            if let Err(discard_err) = self.ledger.discard(&stored.id) {
                warn!(
                    evaluation = %stored.id.0,
                    error = %discard_err,
                    "failed to compensate ledger entry after write failure"
                );
            }
            return Err(err.into());
        }

        self.record_activity(&farmer_id, score);

        let eligible_schemes = join_schemes(&rows, &schemes);

        Ok(AnalysisOutcome {
            evaluation_id: stored.id,
            score,
            score_band: band.label(),
            algorithm_version: self.algorithm_version.0.clone(),
            risk_factors: risk_factors.iter().map(RiskFactorView::from).collect(),
            loan_eligibility: LoanEligibilityView::from(&loan_eligibility),
            eligible_schemes,
        })
    }

    /// Most recent ledger entry for the farmer, if any.
    pub fn latest_evaluation(
        &self,
        farmer_id: &FarmerId,
    ) -> Result<Option<EvaluationRecord>, CreditServiceError> {
        Ok(self.ledger.latest(farmer_id)?)
    }

    /// Ledger entries for the farmer, newest first.
    pub fn evaluation_history(
        &self,
        farmer_id: &FarmerId,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, CreditServiceError> {
        Ok(self.ledger.history(farmer_id, limit)?)
    }

    /// Read-only composition of the denormalized state for display. A farmer
    /// with no evaluation yet gets score 0 and "Not Available" defaults.
    pub fn dashboard(&self, farmer_id: &FarmerId) -> Result<DashboardView, CreditServiceError> {
        let profile = self.profiles.fetch(farmer_id)?;
        let score = profile
            .as_ref()
            .map(|profile| profile.current_credit_score)
            .unwrap_or(0);
        let band = classifier::band_for(score);
        let loan_eligibility = classifier::loan_tier(band);

        let risk_factors = self
            .ledger
            .latest(farmer_id)?
            .map(|record| record.risk_factors.iter().map(RiskFactorView::from).collect())
            .unwrap_or_default();

        let rows = self.eligibility.for_farmer(farmer_id)?;
        let top = matcher::top_matches(rows, self.config.top_schemes);
        let schemes = self.catalog.schemes()?;
        let eligible_schemes = join_schemes(&top, &schemes);

        let recent_activity = self
            .activity
            .recent(farmer_id, 5)?
            .iter()
            .map(Into::into)
            .collect();

        Ok(DashboardView {
            profile: profile.as_ref().map(Into::into),
            credit_score: score,
            score_band: band.label(),
            loan_eligibility: LoanEligibilityView::from(&loan_eligibility),
            risk_factors,
            eligible_schemes,
            recent_activity,
        })
    }

    /// Run the scoring computation off the request path with a bounded wait.
    async fn computed_score(&self, input: &NormalizedInput) -> Result<u16, ComputationError> {
        let bounds = self.config.bounds;
        let input = input.clone();
        let task = tokio::task::spawn_blocking(move || scoring::compute_score(&input, bounds));

        let score = match tokio::time::timeout(self.config.scoring_timeout, task).await {
            Err(_) => return Err(ComputationError::Timeout(self.config.scoring_timeout)),
            Ok(Err(join_error)) => return Err(ComputationError::Worker(join_error.to_string())),
            Ok(Ok(score)) => score,
        };

        if !bounds.contains(score) {
            return Err(ComputationError::OutOfRange {
                score,
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(score)
    }

    /// The two denormalized writes. The eligibility upsert goes first and the
    /// profile last: a failure part-way then leaves the profile still matching
    /// the previous ledger entry (or absent on a first run), so the
    /// profile-mirrors-newest-record invariant holds through the rollback.
    /// The profile write is compare-and-swap on the revision with a bounded
    /// retry against the latest row, so two concurrent analyses cannot
    /// silently lose an update.
    fn commit_denormalized(
        &self,
        farmer_id: &FarmerId,
        input: &NormalizedInput,
        score: u16,
        rows: &[SchemeEligibility],
    ) -> Result<(), RepositoryError> {
        self.eligibility.upsert(rows)?;

        let mut attempts = 0;
        loop {
            attempts += 1;
            let within_budget = attempts <= self.config.profile_write_retries;

            match self.profiles.fetch(farmer_id)? {
                None => {
                    let seeded = FarmerProfile::seeded(farmer_id.clone(), input, score);
                    match self.profiles.insert(seeded) {
                        Ok(_) => {
                            self.record_profile_created(farmer_id);
                            break;
                        }
                        // Lost the race to create; re-read and update instead.
                        Err(RepositoryError::Conflict) if within_budget => continue,
                        Err(err) => return Err(err),
                    }
                }
                Some(existing) => {
                    let expected = existing.revision;
                    let refreshed = existing.refreshed(input, score);
                    match self.profiles.update(refreshed, expected) {
                        Ok(_) => break,
                        Err(RepositoryError::RevisionMismatch { .. }) if within_budget => continue,
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        Ok(())
    }

    /// Activity writes are informational; a failure is logged, never fatal.
    fn record_activity(&self, farmer_id: &FarmerId, score: u16) {
        let entry = ActivityEntry {
            farmer_id: farmer_id.clone(),
            title: "Credit Analysis Completed".to_string(),
            description: format!("You received a credit score of {score}."),
            kind: ActivityKind::CreditAnalysis,
            created_at: Utc::now(),
        };
        if let Err(err) = self.activity.record(entry) {
            warn!(farmer = %farmer_id.0, error = %err, "failed to log analysis activity");
        }
    }

    fn record_profile_created(&self, farmer_id: &FarmerId) {
        let entry = ActivityEntry {
            farmer_id: farmer_id.clone(),
            title: "Farmer Profile Created".to_string(),
            description: "Your profile was created from your first credit analysis.".to_string(),
            kind: ActivityKind::ProfileCreated,
            created_at: Utc::now(),
        };
        if let Err(err) = self.activity.record(entry) {
            warn!(farmer = %farmer_id.0, error = %err, "failed to log profile activity");
        }
    }
}

fn join_schemes(rows: &[SchemeEligibility], schemes: &[SchemeDefinition]) -> Vec<SchemeMatchView> {
    rows.iter()
        .filter_map(|row| {
            schemes
                .iter()
                .find(|scheme| scheme.id == row.scheme_id)
                .map(|scheme| SchemeMatchView::joined(row, scheme))
        })
        .collect()
}
