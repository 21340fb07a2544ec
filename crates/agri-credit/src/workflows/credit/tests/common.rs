use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::EngineConfig;
use crate::workflows::credit::catalog;
use crate::workflows::credit::domain::{
    ActivityEntry, CreditAttributes, CropType, EvaluationId, EvaluationRecord, FarmerId,
    FarmerProfile, NormalizedInput, RepaymentHistory, SchemeDefinition, SchemeEligibility,
    SchemeId,
};
use crate::workflows::credit::repository::{
    ActivityLog, EligibilityStore, EvaluationLedger, ProfileStore, RepositoryError,
    SchemeCatalogSource,
};
use crate::workflows::credit::service::CreditAnalysisService;

#[derive(Default)]
pub(super) struct MemoryLedger {
    records: Mutex<Vec<EvaluationRecord>>,
}

impl MemoryLedger {
    pub(super) fn records(&self) -> Vec<EvaluationRecord> {
        self.records.lock().expect("ledger mutex poisoned").clone()
    }
}

impl EvaluationLedger for MemoryLedger {
    fn append(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn discard(&self, id: &EvaluationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn latest(&self, farmer_id: &FarmerId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .find(|record| &record.farmer_id == farmer_id)
            .cloned())
    }

    fn history(
        &self,
        farmer_id: &FarmerId,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.farmer_id == farmer_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    rows: Mutex<HashMap<FarmerId, FarmerProfile>>,
    /// Number of update calls that should fail with a revision mismatch
    /// before the store behaves normally again.
    contested_updates: AtomicU32,
}

impl MemoryProfiles {
    pub(super) fn contest_next_updates(&self, count: u32) {
        self.contested_updates.store(count, Ordering::Relaxed);
    }

    pub(super) fn get(&self, farmer_id: &FarmerId) -> Option<FarmerProfile> {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .get(farmer_id)
            .cloned()
    }
}

impl ProfileStore for MemoryProfiles {
    fn fetch(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>, RepositoryError> {
        Ok(self.get(farmer_id))
    }

    fn insert(&self, profile: FarmerProfile) -> Result<FarmerProfile, RepositoryError> {
        let mut guard = self.rows.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.farmer_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.farmer_id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(
        &self,
        mut profile: FarmerProfile,
        expected_revision: u64,
    ) -> Result<FarmerProfile, RepositoryError> {
        if self
            .contested_updates
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                n.checked_sub(1)
            })
            .is_ok()
        {
            return Err(RepositoryError::RevisionMismatch {
                expected: expected_revision,
                found: expected_revision + 1,
            });
        }

        let mut guard = self.rows.lock().expect("profile mutex poisoned");
        let existing = guard
            .get(&profile.farmer_id)
            .ok_or(RepositoryError::NotFound)?;
        if existing.revision != expected_revision {
            return Err(RepositoryError::RevisionMismatch {
                expected: expected_revision,
                found: existing.revision,
            });
        }
        profile.revision = expected_revision + 1;
        guard.insert(profile.farmer_id.clone(), profile.clone());
        Ok(profile)
    }
}

#[derive(Default)]
pub(super) struct MemoryEligibility {
    rows: Mutex<HashMap<(FarmerId, SchemeId), SchemeEligibility>>,
}

impl MemoryEligibility {
    pub(super) fn rows(&self) -> Vec<SchemeEligibility> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .expect("eligibility mutex poisoned")
            .values()
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.scheme_id);
        rows
    }
}

impl EligibilityStore for MemoryEligibility {
    fn upsert(&self, rows: &[SchemeEligibility]) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("eligibility mutex poisoned");
        for row in rows {
            guard.insert((row.farmer_id.clone(), row.scheme_id), row.clone());
        }
        Ok(())
    }

    fn for_farmer(&self, farmer_id: &FarmerId) -> Result<Vec<SchemeEligibility>, RepositoryError> {
        let guard = self.rows.lock().expect("eligibility mutex poisoned");
        Ok(guard
            .values()
            .filter(|row| &row.farmer_id == farmer_id)
            .cloned()
            .collect())
    }
}

/// Eligibility store that always fails, for exercising the saga rollback.
pub(super) struct FailingEligibility;

impl EligibilityStore for FailingEligibility {
    fn upsert(&self, _rows: &[SchemeEligibility]) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("eligibility store down".to_string()))
    }

    fn for_farmer(
        &self,
        _farmer_id: &FarmerId,
    ) -> Result<Vec<SchemeEligibility>, RepositoryError> {
        Err(RepositoryError::Unavailable("eligibility store down".to_string()))
    }
}

pub(super) struct StaticCatalog {
    schemes: Vec<SchemeDefinition>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self {
            schemes: catalog::default_catalog(),
        }
    }
}

impl SchemeCatalogSource for StaticCatalog {
    fn schemes(&self) -> Result<Vec<SchemeDefinition>, RepositoryError> {
        Ok(self.schemes.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryActivity {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl MemoryActivity {
    pub(super) fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .expect("activity mutex poisoned")
            .clone()
    }
}

impl ActivityLog for MemoryActivity {
    fn record(&self, entry: ActivityEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("activity mutex poisoned");
        guard.push(entry);
        Ok(())
    }

    fn recent(
        &self,
        farmer_id: &FarmerId,
        limit: usize,
    ) -> Result<Vec<ActivityEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("activity mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|entry| &entry.farmer_id == farmer_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Activity log that always fails; the analysis must still succeed.
pub(super) struct FailingActivity;

impl ActivityLog for FailingActivity {
    fn record(&self, _entry: ActivityEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("activity feed down".to_string()))
    }

    fn recent(
        &self,
        _farmer_id: &FarmerId,
        _limit: usize,
    ) -> Result<Vec<ActivityEntry>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct Harness {
    pub(super) ledger: Arc<MemoryLedger>,
    pub(super) profiles: Arc<MemoryProfiles>,
    pub(super) eligibility: Arc<MemoryEligibility>,
    pub(super) activity: Arc<MemoryActivity>,
    pub(super) service: Arc<CreditAnalysisService>,
}

pub(super) fn harness() -> Harness {
    let ledger = Arc::new(MemoryLedger::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let eligibility = Arc::new(MemoryEligibility::default());
    let activity = Arc::new(MemoryActivity::default());
    let service = Arc::new(CreditAnalysisService::new(
        ledger.clone(),
        profiles.clone(),
        eligibility.clone(),
        Arc::new(StaticCatalog::default()),
        activity.clone(),
        EngineConfig::default(),
    ));

    Harness {
        ledger,
        profiles,
        eligibility,
        activity,
        service,
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn farmer() -> FarmerId {
    FarmerId("farmer-042".to_string())
}

/// Attribute set from the end-to-end acceptance scenario.
pub(super) fn strong_attributes() -> CreditAttributes {
    CreditAttributes {
        land_holding: Some(6.0),
        crop_type: Some("wheat".to_string()),
        annual_income: Some(600_000.0),
        existing_loans: Some(100_000.0),
        repayment_history: Some("excellent".to_string()),
        crop_yield: Some(20.0),
        irrigation_source: Some("canal".to_string()),
        farming_experience: Some(8),
        location: Some("Nashik".to_string()),
    }
}

pub(super) fn normalized(
    land_holding: f64,
    annual_income: f64,
    existing_loans: f64,
    repayment_history: RepaymentHistory,
    farming_experience: u32,
) -> NormalizedInput {
    NormalizedInput {
        land_holding,
        crop_type: CropType::Wheat,
        annual_income,
        existing_loans,
        repayment_history,
        crop_yield: None,
        irrigation_source: None,
        farming_experience,
        location: None,
    }
}
