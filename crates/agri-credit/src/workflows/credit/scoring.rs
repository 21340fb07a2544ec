use super::domain::{NormalizedInput, RepaymentHistory};
use crate::config::ScoreBounds;

/// Weighted partial contributions on the reference 300..=900 scale. The four
/// partials sum to at most [`RAW_SPAN`], so the total can never leave the
/// declared bounds.
const LAND_MAX: u32 = 150;
const RATIO_MAX: u32 = 180;
const REPAYMENT_MAX: u32 = 180;
const EXPERIENCE_MAX: u32 = 90;
const RAW_SPAN: u32 = LAND_MAX + RATIO_MAX + REPAYMENT_MAX + EXPERIENCE_MAX;

/// Deterministic score for a normalized input. Identical input and bounds
/// always produce the identical score.
pub fn compute_score(input: &NormalizedInput, bounds: ScoreBounds) -> u16 {
    let raw = land_points(input.land_holding)
        + income_to_debt_points(input.annual_income, input.existing_loans)
        + repayment_points(input.repayment_history)
        + experience_points(input.farming_experience);

    // Rescale when the configured bounds differ from the reference span.
    let scaled = raw * u32::from(bounds.span()) / RAW_SPAN;
    let score = u32::from(bounds.min) + scaled;
    score.min(u32::from(bounds.max)) as u16
}

/// Ratio of annual income to outstanding debt; a farmer with no loans is
/// treated as maximally leveraged-free.
pub fn income_to_debt_ratio(annual_income: f64, existing_loans: f64) -> Option<f64> {
    if existing_loans <= 0.0 {
        None
    } else {
        Some(annual_income / existing_loans)
    }
}

pub(crate) fn land_points(acres: f64) -> u32 {
    if acres >= 10.0 {
        LAND_MAX
    } else if acres >= 5.0 {
        120
    } else if acres >= 2.0 {
        75
    } else if acres > 0.0 {
        40
    } else {
        0
    }
}

pub(crate) fn income_to_debt_points(annual_income: f64, existing_loans: f64) -> u32 {
    match income_to_debt_ratio(annual_income, existing_loans) {
        None => RATIO_MAX,
        Some(ratio) if ratio >= 6.0 => RATIO_MAX,
        Some(ratio) if ratio >= 4.0 => 140,
        Some(ratio) if ratio >= 2.0 => 90,
        Some(ratio) if ratio >= 1.0 => 50,
        Some(_) => 20,
    }
}

pub(crate) fn repayment_points(history: RepaymentHistory) -> u32 {
    match history {
        RepaymentHistory::Excellent => REPAYMENT_MAX,
        RepaymentHistory::Good => 140,
        RepaymentHistory::Fair => 90,
        RepaymentHistory::Poor => 30,
        RepaymentHistory::None => 60,
    }
}

pub(crate) fn experience_points(years: u32) -> u32 {
    if years >= 15 {
        EXPERIENCE_MAX
    } else if years >= 8 {
        75
    } else if years >= 5 {
        60
    } else if years >= 2 {
        35
    } else {
        15
    }
}
