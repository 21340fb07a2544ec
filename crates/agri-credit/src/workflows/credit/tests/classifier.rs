use super::common::normalized;
use crate::workflows::credit::classifier::{band_for, loan_tier, risk_factors};
use crate::workflows::credit::domain::{
    AttributeBand, LoanStatus, RepaymentHistory, RiskFactorKind, ScoreBand,
};

#[test]
fn band_boundaries_are_exact() {
    assert_eq!(band_for(750), ScoreBand::Excellent);
    assert_eq!(band_for(749), ScoreBand::Good);
    assert_eq!(band_for(650), ScoreBand::Good);
    assert_eq!(band_for(649), ScoreBand::Fair);
    assert_eq!(band_for(550), ScoreBand::Fair);
    assert_eq!(band_for(549), ScoreBand::Poor);
    assert_eq!(band_for(0), ScoreBand::NotAvailable);
}

#[test]
fn loan_status_tracks_band() {
    assert_eq!(loan_tier(ScoreBand::Excellent).status, LoanStatus::Eligible);
    assert_eq!(loan_tier(ScoreBand::Good).status, LoanStatus::Eligible);
    assert_eq!(loan_tier(ScoreBand::Fair).status, LoanStatus::Eligible);
    assert_eq!(loan_tier(ScoreBand::Poor).status, LoanStatus::LimitedOptions);
    assert_eq!(
        loan_tier(ScoreBand::NotAvailable).status,
        LoanStatus::NotAvailable
    );
}

#[test]
fn loan_terms_improve_monotonically_with_band() {
    let bands = [
        ScoreBand::Poor,
        ScoreBand::Fair,
        ScoreBand::Good,
        ScoreBand::Excellent,
    ];

    for pair in bands.windows(2) {
        let worse = loan_tier(pair[0]);
        let better = loan_tier(pair[1]);
        assert!(better.max_amount > worse.max_amount);
        assert!(better.interest_rate_pct < worse.interest_rate_pct);
    }
}

#[test]
fn attributes_are_banded_independently() {
    let input = normalized(1.5, 300_000.0, 200_000.0, RepaymentHistory::Excellent, 16);
    let factors = risk_factors(&input);
    assert_eq!(factors.len(), 4);

    let band_of = |kind: RiskFactorKind| {
        factors
            .iter()
            .find(|factor| factor.kind == kind)
            .map(|factor| factor.band)
            .expect("factor present")
    };

    assert_eq!(band_of(RiskFactorKind::LandHolding), AttributeBand::Poor);
    assert_eq!(band_of(RiskFactorKind::IncomeToDebt), AttributeBand::Poor);
    assert_eq!(
        band_of(RiskFactorKind::RepaymentHistory),
        AttributeBand::Excellent
    );
    assert_eq!(
        band_of(RiskFactorKind::FarmingExperience),
        AttributeBand::Excellent
    );
}

#[test]
fn every_factor_carries_an_explanation() {
    let input = normalized(6.0, 600_000.0, 100_000.0, RepaymentHistory::None, 4);
    for factor in risk_factors(&input) {
        assert!(
            !factor.detail.is_empty(),
            "missing detail for {:?}",
            factor.kind
        );
    }
}
