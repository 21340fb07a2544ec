use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    format_inr, ActivityEntry, EvaluationId, FarmerProfile, LoanEligibility, LoanStatus,
    RiskFactor, SchemeDefinition, SchemeEligibility,
};

/// Risk panel entry rendered on the analysis result and dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactorView {
    pub factor: &'static str,
    pub status: &'static str,
    pub description: String,
}

impl From<&RiskFactor> for RiskFactorView {
    fn from(factor: &RiskFactor) -> Self {
        Self {
            factor: factor.kind.label(),
            status: factor.band.label(),
            description: factor.detail.clone(),
        }
    }
}

/// Loan offer as displayed, with rupee formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanEligibilityView {
    pub max_amount: String,
    pub interest_rate: String,
    pub term: String,
    pub status: &'static str,
}

impl From<&LoanEligibility> for LoanEligibilityView {
    fn from(tier: &LoanEligibility) -> Self {
        if tier.status == LoanStatus::NotAvailable {
            return Self {
                max_amount: "Not Available".to_string(),
                interest_rate: "Not Available".to_string(),
                term: format!("{} months", tier.term_months),
                status: tier.status.label(),
            };
        }

        Self {
            max_amount: format_inr(tier.max_amount),
            interest_rate: format!("{}%", tier.interest_rate_pct),
            term: format!("{} months", tier.term_months),
            status: tier.status.label(),
        }
    }
}

/// One scheme joined with its eligibility row for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeMatchView {
    pub id: u32,
    pub name: String,
    pub category: &'static str,
    pub eligibility_score: u8,
    /// Percentage string, e.g. "65%".
    pub r#match: String,
    pub strength: &'static str,
}

impl SchemeMatchView {
    pub fn joined(row: &SchemeEligibility, scheme: &SchemeDefinition) -> Self {
        Self {
            id: scheme.id.0,
            name: scheme.name.clone(),
            category: scheme.category.label(),
            eligibility_score: row.score,
            r#match: format!("{}%", row.score),
            strength: row.status.label(),
        }
    }
}

/// Response payload for a completed analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub evaluation_id: EvaluationId,
    pub score: u16,
    pub score_band: &'static str,
    pub algorithm_version: String,
    pub risk_factors: Vec<RiskFactorView>,
    pub loan_eligibility: LoanEligibilityView,
    pub eligible_schemes: Vec<SchemeMatchView>,
}

/// Denormalized profile fields exposed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub farmer_id: String,
    pub land_holding: f64,
    pub primary_crop: &'static str,
    pub annual_income: f64,
    pub farming_experience: u32,
    pub irrigation_source: Option<&'static str>,
    pub location: Option<String>,
    pub credit_score: u16,
}

impl From<&FarmerProfile> for ProfileView {
    fn from(profile: &FarmerProfile) -> Self {
        Self {
            farmer_id: profile.farmer_id.0.clone(),
            land_holding: profile.land_holding,
            primary_crop: profile.primary_crop.label(),
            annual_income: profile.annual_income,
            farming_experience: profile.farming_experience,
            irrigation_source: profile.irrigation_source.map(|source| source.label()),
            location: profile.location.clone(),
            credit_score: profile.current_credit_score,
        }
    }
}

/// Activity feed entry for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityView {
    pub title: String,
    pub description: String,
    pub kind: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<&ActivityEntry> for ActivityView {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            kind: match entry.kind {
                super::domain::ActivityKind::CreditAnalysis => "credit_analysis",
                super::domain::ActivityKind::ProfileCreated => "profile_created",
            },
            created_at: entry.created_at,
        }
    }
}

/// Composed dashboard payload. Degrades to zeroed defaults for farmers with
/// no evaluation on record.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub profile: Option<ProfileView>,
    pub credit_score: u16,
    pub score_band: &'static str,
    pub loan_eligibility: LoanEligibilityView,
    pub risk_factors: Vec<RiskFactorView>,
    pub eligible_schemes: Vec<SchemeMatchView>,
    pub recent_activity: Vec<ActivityView>,
}
