use crate::infra::{
    load_catalog, InMemoryActivityLog, InMemoryEligibilityStore, InMemoryEvaluationLedger,
    InMemoryProfileStore, StaticSchemeCatalog,
};
use agri_credit::config::EngineConfig;
use agri_credit::error::AppError;
use agri_credit::workflows::credit::views::DashboardView;
use agri_credit::workflows::credit::{
    AnalysisOutcome, CreditAnalysisService, CreditAttributes, FarmerId,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Farmer identifier used for the demo run
    #[arg(long, default_value = "farmer-demo")]
    pub(crate) farmer: String,
    /// Optional scheme catalog CSV export to match against
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Cultivable land in acres
    #[arg(long, default_value_t = 6.0)]
    pub(crate) land_holding: f64,
    /// Primary crop grown
    #[arg(long, default_value = "wheat")]
    pub(crate) crop_type: String,
    /// Gross annual income in rupees
    #[arg(long, default_value_t = 600_000.0)]
    pub(crate) annual_income: f64,
    /// Outstanding loan principal in rupees
    #[arg(long, default_value_t = 100_000.0)]
    pub(crate) existing_loans: f64,
    /// Self-reported repayment history (excellent/good/fair/poor/none)
    #[arg(long, default_value = "excellent")]
    pub(crate) repayment_history: String,
    /// Years of farming experience
    #[arg(long, default_value_t = 8)]
    pub(crate) farming_experience: i64,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        farmer,
        catalog,
        land_holding,
        crop_type,
        annual_income,
        existing_loans,
        repayment_history,
        farming_experience,
    } = args;

    let schemes = load_catalog(catalog)?;
    let service = Arc::new(CreditAnalysisService::new(
        Arc::new(InMemoryEvaluationLedger::default()),
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryEligibilityStore::default()),
        Arc::new(StaticSchemeCatalog::new(schemes)),
        Arc::new(InMemoryActivityLog::default()),
        EngineConfig::default(),
    ));

    let farmer_id = FarmerId(farmer);
    let attributes = CreditAttributes {
        land_holding: Some(land_holding),
        crop_type: Some(crop_type),
        annual_income: Some(annual_income),
        existing_loans: Some(existing_loans),
        repayment_history: Some(repayment_history),
        farming_experience: Some(farming_experience),
        ..CreditAttributes::default()
    };

    println!("Farmer credit engine demo");
    println!("Analyzing farmer {}", farmer_id.0);

    let outcome = match service.analyze(farmer_id.clone(), attributes).await {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Analysis rejected: {err}");
            return Ok(());
        }
    };
    render_outcome(&outcome);

    let dashboard = service.dashboard(&farmer_id)?;
    render_dashboard(&dashboard);

    Ok(())
}

fn render_outcome(outcome: &AnalysisOutcome) {
    println!(
        "\nCredit score: {} ({}) [algorithm {}]",
        outcome.score, outcome.score_band, outcome.algorithm_version
    );

    println!("\nRisk factors");
    for factor in &outcome.risk_factors {
        println!(
            "- {} [{}]: {}",
            factor.factor, factor.status, factor.description
        );
    }

    println!("\nLoan eligibility");
    println!(
        "- {} | max {} | rate {} | term {}",
        outcome.loan_eligibility.status,
        outcome.loan_eligibility.max_amount,
        outcome.loan_eligibility.interest_rate,
        outcome.loan_eligibility.term
    );

    println!("\nScheme eligibility");
    for scheme in &outcome.eligible_schemes {
        println!(
            "- [{}] {} ({}) -> {} ({})",
            scheme.id, scheme.name, scheme.category, scheme.r#match, scheme.strength
        );
    }
}

fn render_dashboard(dashboard: &DashboardView) {
    println!("\nDashboard");
    match &dashboard.profile {
        Some(profile) => println!(
            "Profile: {} | {:.1} acres of {} | {} years experience",
            profile.farmer_id,
            profile.land_holding,
            profile.primary_crop,
            profile.farming_experience
        ),
        None => println!("Profile: not yet created"),
    }
    println!(
        "Current score: {} ({})",
        dashboard.credit_score, dashboard.score_band
    );

    println!("Top scheme matches:");
    for scheme in &dashboard.eligible_schemes {
        println!("  - {} ({})", scheme.name, scheme.r#match);
    }

    if dashboard.recent_activity.is_empty() {
        println!("Recent activity: none");
    } else {
        println!("Recent activity:");
        for entry in &dashboard.recent_activity {
            println!("  - {}: {}", entry.title, entry.description);
        }
    }
}
