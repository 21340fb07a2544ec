use super::domain::{
    CreditAttributes, CropType, IrrigationSource, NormalizedInput, RepaymentHistory,
};
use serde::Serialize;
use std::fmt;

/// One problem with a submitted attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: String,
}

/// Validation failure carrying every field issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.problem))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid credit attributes ({summary})")
    }
}

/// Validate and coerce the raw attribute bag into scoring input. Pure; no
/// side effects, no partial state.
pub fn normalize(raw: CreditAttributes) -> Result<NormalizedInput, ValidationError> {
    let mut issues = Vec::new();

    let land_holding = match raw.land_holding {
        Some(acres) if acres.is_finite() && acres >= 0.0 => acres,
        Some(_) => {
            issues.push(issue("landHolding", "must be a non-negative number"));
            0.0
        }
        None => {
            issues.push(issue("landHolding", "is required"));
            0.0
        }
    };

    let crop_type = match raw.crop_type.as_deref() {
        // Unlisted crops fold into Other rather than failing intake.
        Some(label) if !label.trim().is_empty() => {
            CropType::from_label(label).unwrap_or(CropType::Other)
        }
        _ => {
            issues.push(issue("cropType", "is required"));
            CropType::Other
        }
    };

    let annual_income = match raw.annual_income {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        Some(_) => {
            issues.push(issue("annualIncome", "must be a non-negative amount"));
            0.0
        }
        None => {
            issues.push(issue("annualIncome", "is required"));
            0.0
        }
    };

    let existing_loans = match raw.existing_loans {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        Some(_) => {
            issues.push(issue("existingLoans", "must be a non-negative amount"));
            0.0
        }
        None => 0.0,
    };

    let repayment_history = match raw.repayment_history.as_deref() {
        Some(label) if !label.trim().is_empty() => match RepaymentHistory::from_label(label) {
            Some(history) => history,
            None => {
                issues.push(issue(
                    "repaymentHistory",
                    "must be one of excellent/good/fair/poor/none",
                ));
                RepaymentHistory::None
            }
        },
        _ => RepaymentHistory::None,
    };

    let crop_yield = match raw.crop_yield {
        Some(quintals) if quintals.is_finite() && quintals >= 0.0 => Some(quintals),
        Some(_) => {
            issues.push(issue("cropYield", "must be a non-negative number"));
            None
        }
        None => None,
    };

    let irrigation_source = raw
        .irrigation_source
        .as_deref()
        .filter(|label| !label.trim().is_empty())
        .map(|label| IrrigationSource::from_label(label).unwrap_or(IrrigationSource::Other));

    let farming_experience = match raw.farming_experience {
        Some(years) => match u32::try_from(years) {
            Ok(years) => years,
            Err(_) => {
                issues.push(issue(
                    "farmingExperience",
                    "must be a non-negative integer within range",
                ));
                0
            }
        },
        None => 0,
    };

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    Ok(NormalizedInput {
        land_holding,
        crop_type,
        annual_income,
        existing_loans,
        repayment_history,
        crop_yield,
        irrigation_source,
        farming_experience,
        location: raw
            .location
            .filter(|location| !location.trim().is_empty()),
    })
}

fn issue(field: &'static str, problem: &str) -> FieldIssue {
    FieldIssue {
        field,
        problem: problem.to_string(),
    }
}
