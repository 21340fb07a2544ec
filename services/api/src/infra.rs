use agri_credit::error::AppError;
use agri_credit::workflows::credit::catalog;
use agri_credit::workflows::credit::{
    ActivityEntry, ActivityLog, EligibilityStore, EvaluationId, EvaluationLedger, EvaluationRecord,
    FarmerId, FarmerProfile, ProfileStore, RepositoryError, SchemeCatalogSource, SchemeDefinition,
    SchemeEligibility, SchemeId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryEvaluationLedger {
    records: Mutex<Vec<EvaluationRecord>>,
}

impl EvaluationLedger for InMemoryEvaluationLedger {
    fn append(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn discard(&self, id: &EvaluationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        guard.retain(|record| &record.id != id);
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
pub(crate) struct InMemoryProfileStore {
    profiles: Mutex<HashMap<FarmerId, FarmerProfile>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(farmer_id).cloned())
    }

    fn insert(&self, profile: FarmerProfile) -> Result<FarmerProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
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
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
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
pub(crate) struct InMemoryEligibilityStore {
    rows: Mutex<HashMap<(FarmerId, SchemeId), SchemeEligibility>>,
}

impl EligibilityStore for InMemoryEligibilityStore {
    fn upsert(&self, rows: &[SchemeEligibility]) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("eligibility mutex poisoned");
        for row in rows {
            guard.insert((row.farmer_id.clone(), row.scheme_id), row.clone());
        }
        Ok(())
    }

    fn for_farmer(&self, farmer_id: &FarmerId) -> Result<Vec<SchemeEligibility>, RepositoryError> {
        let guard = self.rows.lock().expect("eligibility mutex poisoned");
        let mut rows: Vec<_> = guard
            .values()
            .filter(|row| &row.farmer_id == farmer_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.scheme_id);
        Ok(rows)
    }
}

/// Catalog loaded once at startup. The scheme list is read-only at runtime.
pub(crate) struct StaticSchemeCatalog {
    schemes: Vec<SchemeDefinition>,
}

impl StaticSchemeCatalog {
    pub(crate) fn new(schemes: Vec<SchemeDefinition>) -> Self {
        Self { schemes }
    }
}

impl SchemeCatalogSource for StaticSchemeCatalog {
    fn schemes(&self) -> Result<Vec<SchemeDefinition>, RepositoryError> {
        Ok(self.schemes.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryActivityLog {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl ActivityLog for InMemoryActivityLog {
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

/// Resolve the scheme catalog: a CSV export when one is supplied, the
/// built-in list otherwise.
pub(crate) fn load_catalog(path: Option<PathBuf>) -> Result<Vec<SchemeDefinition>, AppError> {
    match path {
        Some(path) => {
            let schemes = catalog::from_path(&path)?;
            info!(path = %path.display(), count = schemes.len(), "loaded scheme catalog from CSV");
            Ok(schemes)
        }
        None => Ok(catalog::default_catalog()),
    }
}
