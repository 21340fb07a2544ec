use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for an authenticated farmer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmerId(pub String);

/// Identifier for a single evaluation run in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// Identifier for a catalog scheme. Ordering is the documented top-K tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemeId(pub u32);

/// Tag naming the scoring formula that produced an evaluation. Historical
/// records keep the tag they were created with and are never reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmVersion(pub String);

impl AlgorithmVersion {
    pub fn v1() -> Self {
        Self("v1".to_string())
    }
}

/// Crop types accepted on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Rice,
    Wheat,
    Cotton,
    Sugarcane,
    Vegetables,
    Fruits,
    Other,
}

impl CropType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "rice" => Some(Self::Rice),
            "wheat" => Some(Self::Wheat),
            "cotton" => Some(Self::Cotton),
            "sugarcane" => Some(Self::Sugarcane),
            "vegetables" => Some(Self::Vegetables),
            "fruits" => Some(Self::Fruits),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rice => "rice",
            Self::Wheat => "wheat",
            Self::Cotton => "cotton",
            Self::Sugarcane => "sugarcane",
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Other => "other",
        }
    }
}

/// Irrigation sources accepted on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationSource {
    Canal,
    Tubewell,
    Rainwater,
    Pond,
    Other,
}

impl IrrigationSource {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "canal" => Some(Self::Canal),
            "tubewell" | "tube_well" => Some(Self::Tubewell),
            "rainwater" | "rainfed" => Some(Self::Rainwater),
            "pond" => Some(Self::Pond),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Canal => "canal",
            Self::Tubewell => "tubewell",
            Self::Rainwater => "rainwater",
            Self::Pond => "pond",
            Self::Other => "other",
        }
    }
}

/// Declared quality of past loan repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentHistory {
    Excellent,
    Good,
    Fair,
    Poor,
    /// No previous loans on record.
    None,
}

impl RepaymentHistory {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "none" | "no_history" => Some(Self::None),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::None => "none",
        }
    }
}

/// Loosely-typed attribute bag as received from the caller. Everything is
/// optional here; the normalizer decides what is required and reports every
/// problem at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreditAttributes {
    pub land_holding: Option<f64>,
    pub crop_type: Option<String>,
    pub annual_income: Option<f64>,
    pub existing_loans: Option<f64>,
    pub repayment_history: Option<String>,
    pub crop_yield: Option<f64>,
    pub irrigation_source: Option<String>,
    pub farming_experience: Option<i64>,
    pub location: Option<String>,
}

/// Validated, defaulted input that the scoring engine consumes. Stored
/// verbatim on each [`EvaluationRecord`] as the audit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInput {
    pub land_holding: f64,
    pub crop_type: CropType,
    pub annual_income: f64,
    pub existing_loans: f64,
    pub repayment_history: RepaymentHistory,
    pub crop_yield: Option<f64>,
    pub irrigation_source: Option<IrrigationSource>,
    pub farming_experience: u32,
    pub location: Option<String>,
}

/// Qualitative tier for the aggregate credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    /// No evaluation exists yet; the score is reported as 0.
    NotAvailable,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::NotAvailable => "Not Available",
        }
    }
}

/// Whether the score qualifies the farmer for a standard loan offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Eligible,
    LimitedOptions,
    NotAvailable,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::LimitedOptions => "Limited Options",
            Self::NotAvailable => "Not Available",
        }
    }
}

/// Loan offer derived from the score band via a fixed lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanEligibility {
    pub max_amount: u64,
    pub interest_rate_pct: u8,
    pub term_months: u8,
    pub status: LoanStatus,
}

/// Attributes that receive an individual risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    LandHolding,
    IncomeToDebt,
    RepaymentHistory,
    FarmingExperience,
}

impl RiskFactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LandHolding => "Land Holding",
            Self::IncomeToDebt => "Income to Debt Ratio",
            Self::RepaymentHistory => "Repayment History",
            Self::FarmingExperience => "Farming Experience",
        }
    }
}

/// Qualitative tier for a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeBand {
    Excellent,
    Good,
    Medium,
    Poor,
}

impl AttributeBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Medium => "Medium",
            Self::Poor => "Poor",
        }
    }
}

/// One banded attribute with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub band: AttributeBand,
    pub detail: String,
}

/// Denormalized current state for one farmer. `current_credit_score` always
/// mirrors the newest ledger entry; 0 means no evaluation has run yet.
/// `revision` backs the compare-and-swap write discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub farmer_id: FarmerId,
    pub land_holding: f64,
    pub primary_crop: CropType,
    pub annual_income: f64,
    pub farming_experience: u32,
    pub irrigation_source: Option<IrrigationSource>,
    pub location: Option<String>,
    pub current_credit_score: u16,
    pub revision: u64,
}

impl FarmerProfile {
    /// Seed a first profile from the normalized input of the first run.
    pub fn seeded(farmer_id: FarmerId, input: &NormalizedInput, score: u16) -> Self {
        Self {
            farmer_id,
            land_holding: input.land_holding,
            primary_crop: input.crop_type,
            annual_income: input.annual_income,
            farming_experience: input.farming_experience,
            irrigation_source: input.irrigation_source,
            location: input.location.clone(),
            current_credit_score: score,
            revision: 0,
        }
    }

    /// Refresh the denormalized fields from a newer run, keeping the revision
    /// untouched so the store can check it against the expected value.
    pub fn refreshed(&self, input: &NormalizedInput, score: u16) -> Self {
        Self {
            farmer_id: self.farmer_id.clone(),
            land_holding: input.land_holding,
            primary_crop: input.crop_type,
            annual_income: input.annual_income,
            farming_experience: input.farming_experience,
            irrigation_source: input.irrigation_source,
            location: input.location.clone().or_else(|| self.location.clone()),
            current_credit_score: score,
            revision: self.revision,
        }
    }
}

/// Immutable snapshot of one scoring run. Appended to the ledger and never
/// mutated; corrections append a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub farmer_id: FarmerId,
    pub score: u16,
    pub risk_factors: Vec<RiskFactor>,
    pub loan_eligibility: LoanEligibility,
    pub input: NormalizedInput,
    pub algorithm_version: AlgorithmVersion,
    pub created_at: DateTime<Utc>,
}

/// Fixed category set for catalog schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeCategory {
    Credit,
    Infrastructure,
    TechnicalSupport,
    IncomeSupport,
    Insurance,
    SustainableFarming,
    Other,
}

impl SchemeCategory {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "infrastructure" => Some(Self::Infrastructure),
            "technical support" | "technical_support" => Some(Self::TechnicalSupport),
            "income support" | "income_support" => Some(Self::IncomeSupport),
            "insurance" => Some(Self::Insurance),
            "sustainable farming" | "sustainable_farming" => Some(Self::SustainableFarming),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Infrastructure => "Infrastructure",
            Self::TechnicalSupport => "Technical Support",
            Self::IncomeSupport => "Income Support",
            Self::Insurance => "Insurance",
            Self::SustainableFarming => "Sustainable Farming",
            Self::Other => "Other",
        }
    }
}

/// Catalog entry for a government assistance program. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeDefinition {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub benefits: String,
    pub category: SchemeCategory,
}

/// How strongly a scheme matches, for compact display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    High,
    Medium,
}

impl MatchStrength {
    pub const fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

/// Current eligibility of one farmer for one scheme. Keyed uniquely by
/// (farmer, scheme); upserts overwrite, no history is kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeEligibility {
    pub farmer_id: FarmerId,
    pub scheme_id: SchemeId,
    pub score: u8,
    pub status: MatchStrength,
}

/// Kinds of informational activity shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CreditAnalysis,
    ProfileCreated,
}

/// Display-only log entry derived from evaluation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub farmer_id: FarmerId,
    pub title: String,
    pub description: String,
    pub kind: ActivityKind,
    pub created_at: DateTime<Utc>,
}

/// Rupee amount with Indian digit grouping, e.g. 1000000 -> "₹10,00,000".
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    let head_bytes = head.as_bytes();
    let lead = head_bytes.len() % 2;
    if lead == 1 {
        grouped.push(head_bytes[0] as char);
    }
    for (i, chunk) in head_bytes[lead..].chunks(2).enumerate() {
        if i > 0 || lead == 1 {
            grouped.push(',');
        }
        for &b in chunk {
            grouped.push(b as char);
        }
    }
    format!("₹{grouped},{tail}")
}
