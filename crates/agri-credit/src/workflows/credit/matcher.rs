use super::domain::{
    FarmerId, MatchStrength, NormalizedInput, SchemeCategory, SchemeDefinition, SchemeEligibility,
};

pub const MAX_ELIGIBILITY: u8 = 100;
const DEFAULT_BONUS: u8 = 25;

/// Evaluation outcome the category rules inspect.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub score: u16,
    pub input: &'a NormalizedInput,
}

/// Category bonus as data: which category it applies to, the predicate over
/// the evaluation context, and the bonus when the predicate is met or not.
/// Categories without a rule fall back to [`DEFAULT_BONUS`].
pub struct CategoryRule {
    pub category: SchemeCategory,
    pub predicate: fn(&EvaluationContext<'_>) -> bool,
    pub met_bonus: u8,
    pub unmet_bonus: u8,
}

static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: SchemeCategory::Credit,
        predicate: |ctx| ctx.score >= 650,
        met_bonus: 35,
        unmet_bonus: 20,
    },
    CategoryRule {
        category: SchemeCategory::Infrastructure,
        predicate: |ctx| ctx.input.land_holding >= 5.0,
        met_bonus: 35,
        unmet_bonus: 20,
    },
    CategoryRule {
        category: SchemeCategory::TechnicalSupport,
        predicate: |ctx| ctx.input.farming_experience >= 5,
        met_bonus: 35,
        unmet_bonus: 20,
    },
];

fn base_points(score: u16) -> u8 {
    if score >= 750 {
        40
    } else if score >= 650 {
        30
    } else if score >= 550 {
        20
    } else {
        10
    }
}

fn category_bonus(ctx: &EvaluationContext<'_>, category: SchemeCategory) -> u8 {
    match CATEGORY_RULES.iter().find(|rule| rule.category == category) {
        Some(rule) => {
            if (rule.predicate)(ctx) {
                rule.met_bonus
            } else {
                rule.unmet_bonus
            }
        }
        None => DEFAULT_BONUS,
    }
}

/// Eligibility of one scheme for the given evaluation outcome.
pub fn eligibility_for(
    ctx: &EvaluationContext<'_>,
    farmer_id: &FarmerId,
    scheme: &SchemeDefinition,
) -> SchemeEligibility {
    let score = (base_points(ctx.score) + category_bonus(ctx, scheme.category)).min(MAX_ELIGIBILITY);
    SchemeEligibility {
        farmer_id: farmer_id.clone(),
        scheme_id: scheme.id,
        score,
        status: MatchStrength::from_score(score),
    }
}

/// Score every scheme in the catalog. Pure given the evaluation context and
/// the catalog rows.
pub fn match_catalog(
    ctx: &EvaluationContext<'_>,
    farmer_id: &FarmerId,
    schemes: &[SchemeDefinition],
) -> Vec<SchemeEligibility> {
    schemes
        .iter()
        .map(|scheme| eligibility_for(ctx, farmer_id, scheme))
        .collect()
}

/// Select the top-K rows by descending eligibility score, breaking ties by
/// ascending scheme id so the ordering is stable across runs.
pub fn top_matches(mut rows: Vec<SchemeEligibility>, k: usize) -> Vec<SchemeEligibility> {
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.scheme_id.cmp(&b.scheme_id))
    });
    rows.truncate(k);
    rows
}
