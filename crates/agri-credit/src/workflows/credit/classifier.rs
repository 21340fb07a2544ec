use super::domain::{
    AttributeBand, LoanEligibility, LoanStatus, NormalizedInput, RepaymentHistory, RiskFactor,
    RiskFactorKind, ScoreBand,
};
use super::scoring::income_to_debt_ratio;

/// Band thresholds for the aggregate score, checked in descending order.
/// Score 0 is the "no evaluation yet" sentinel, not a valid score.
pub fn band_for(score: u16) -> ScoreBand {
    if score == 0 {
        ScoreBand::NotAvailable
    } else if score >= 750 {
        ScoreBand::Excellent
    } else if score >= 650 {
        ScoreBand::Good
    } else if score >= 550 {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}

/// Loan offer lookup keyed by the score band. Ceilings rise and rates fall
/// monotonically as the band improves.
pub fn loan_tier(band: ScoreBand) -> LoanEligibility {
    let (max_amount, interest_rate_pct, status) = match band {
        ScoreBand::Excellent => (1_000_000, 8, LoanStatus::Eligible),
        ScoreBand::Good => (750_000, 10, LoanStatus::Eligible),
        ScoreBand::Fair => (500_000, 12, LoanStatus::Eligible),
        ScoreBand::Poor => (250_000, 14, LoanStatus::LimitedOptions),
        ScoreBand::NotAvailable => (0, 0, LoanStatus::NotAvailable),
    };

    LoanEligibility {
        max_amount,
        interest_rate_pct,
        term_months: 12,
        status,
    }
}

/// Band each contributing attribute independently, with a display-ready
/// explanation for the dashboard risk panel.
pub fn risk_factors(input: &NormalizedInput) -> Vec<RiskFactor> {
    vec![
        land_holding_factor(input.land_holding),
        income_to_debt_factor(input.annual_income, input.existing_loans),
        repayment_factor(input.repayment_history),
        experience_factor(input.farming_experience),
    ]
}

fn land_holding_factor(acres: f64) -> RiskFactor {
    let (band, detail) = if acres >= 10.0 {
        (
            AttributeBand::Excellent,
            format!("{acres:.1} acres provides strong collateral cover"),
        )
    } else if acres > 5.0 {
        (
            AttributeBand::Good,
            format!("{acres:.1} acres is above the viability threshold"),
        )
    } else if acres >= 2.0 {
        (
            AttributeBand::Medium,
            format!("{acres:.1} acres limits cultivable surplus"),
        )
    } else {
        (
            AttributeBand::Poor,
            format!("{acres:.1} acres is below the viability threshold"),
        )
    };

    RiskFactor {
        kind: RiskFactorKind::LandHolding,
        band,
        detail,
    }
}

fn income_to_debt_factor(annual_income: f64, existing_loans: f64) -> RiskFactor {
    let (band, detail) = match income_to_debt_ratio(annual_income, existing_loans) {
        None => (
            AttributeBand::Excellent,
            "no outstanding loans against declared income".to_string(),
        ),
        Some(ratio) if ratio >= 6.0 => (
            AttributeBand::Excellent,
            format!("income covers outstanding debt {ratio:.1}x over"),
        ),
        Some(ratio) if ratio >= 4.0 => (
            AttributeBand::Good,
            format!("income covers outstanding debt {ratio:.1}x over"),
        ),
        Some(ratio) if ratio >= 2.0 => (
            AttributeBand::Medium,
            format!("debt load is noticeable at {ratio:.1}x coverage"),
        ),
        Some(ratio) => (
            AttributeBand::Poor,
            format!("debt approaches or exceeds income ({ratio:.1}x coverage)"),
        ),
    };

    RiskFactor {
        kind: RiskFactorKind::IncomeToDebt,
        band,
        detail,
    }
}

fn repayment_factor(history: RepaymentHistory) -> RiskFactor {
    let (band, detail) = match history {
        RepaymentHistory::Excellent => (
            AttributeBand::Excellent,
            "consistent on-time repayment of previous loans".to_string(),
        ),
        RepaymentHistory::Good => (
            AttributeBand::Good,
            "mostly on-time repayment with rare delays".to_string(),
        ),
        RepaymentHistory::Fair => (
            AttributeBand::Medium,
            "occasional repayment delays on record".to_string(),
        ),
        RepaymentHistory::Poor => (
            AttributeBand::Poor,
            "frequent repayment delays on record".to_string(),
        ),
        RepaymentHistory::None => (
            AttributeBand::Medium,
            "no prior loan history to assess".to_string(),
        ),
    };

    RiskFactor {
        kind: RiskFactorKind::RepaymentHistory,
        band,
        detail,
    }
}

fn experience_factor(years: u32) -> RiskFactor {
    let (band, detail) = if years >= 15 {
        (
            AttributeBand::Excellent,
            format!("{years} years of farming experience"),
        )
    } else if years >= 8 {
        (
            AttributeBand::Good,
            format!("{years} years of farming experience"),
        )
    } else if years >= 3 {
        (
            AttributeBand::Medium,
            format!("{years} years of farming experience"),
        )
    } else {
        (
            AttributeBand::Poor,
            format!("only {years} year(s) of farming experience"),
        )
    };

    RiskFactor {
        kind: RiskFactorKind::FarmingExperience,
        band,
        detail,
    }
}
