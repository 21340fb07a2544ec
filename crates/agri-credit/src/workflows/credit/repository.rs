use super::domain::{
    ActivityEntry, EvaluationId, EvaluationRecord, FarmerId, FarmerProfile, SchemeDefinition,
    SchemeEligibility,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("profile revision mismatch (expected {expected}, found {found})")]
    RevisionMismatch { expected: u64, found: u64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only system of record for evaluation runs. Records are never
/// updated; `discard` exists only as the saga compensation hook when the
/// dependent denormalized writes fail after an append.
pub trait EvaluationLedger: Send + Sync {
    fn append(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn discard(&self, id: &EvaluationId) -> Result<(), RepositoryError>;
    fn latest(&self, farmer_id: &FarmerId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn history(
        &self,
        farmer_id: &FarmerId,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

/// Denormalized per-farmer profile row. `update` is compare-and-swap on the
/// profile revision so concurrent analyses cannot silently lose an update.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>, RepositoryError>;
    fn insert(&self, profile: FarmerProfile) -> Result<FarmerProfile, RepositoryError>;
    fn update(
        &self,
        profile: FarmerProfile,
        expected_revision: u64,
    ) -> Result<FarmerProfile, RepositoryError>;
}

/// Current-snapshot eligibility rows keyed by (farmer, scheme).
pub trait EligibilityStore: Send + Sync {
    fn upsert(&self, rows: &[SchemeEligibility]) -> Result<(), RepositoryError>;
    fn for_farmer(&self, farmer_id: &FarmerId) -> Result<Vec<SchemeEligibility>, RepositoryError>;
}

/// Read-only source of scheme definitions.
pub trait SchemeCatalogSource: Send + Sync {
    fn schemes(&self) -> Result<Vec<SchemeDefinition>, RepositoryError>;
}

/// Display-only activity feed. Write failures are tolerated by callers.
pub trait ActivityLog: Send + Sync {
    fn record(&self, entry: ActivityEntry) -> Result<(), RepositoryError>;
    fn recent(
        &self,
        farmer_id: &FarmerId,
        limit: usize,
    ) -> Result<Vec<ActivityEntry>, RepositoryError>;
}
