use crate::infra::{parse_amount, parse_horizon};
use chrono::{Datelike, Local};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use treasury_desk::config::EngineConfig;
use treasury_desk::error::AppError;
use treasury_desk::workflows::approvals::{resolve_approval_tier, ApprovalTier};
use treasury_desk::workflows::financials::{
    compute_ratios, health_breakdown, FinancialMetrics, FinancialRatios, HealthScoreBreakdown,
};
use treasury_desk::workflows::forecast::{
    project_cash_flow, CashFlowProjection, DEFAULT_HORIZON_DAYS,
};
use treasury_desk::workflows::mock::MockFinancialsGenerator;
use treasury_desk::workflows::portal::{
    CreditChecklist, DocumentCategory, DocumentUpload, InMemoryPortalStore, TreasuryService,
};
use treasury_desk::workflows::statement_import::CashFlowStatementImporter;

const DEMO_AMOUNTS: [f64; 5] = [750.0, 9_999.99, 50_000.0, 50_000.01, 250_000.0];

#[derive(Args, Debug)]
pub(crate) struct ApprovalArgs {
    /// Payment or transfer amount, e.g. 12500 or "$12,500.00"
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub(crate) amount: f64,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Cash-flow statement CSV (Month,Income,Expenses,Balance). Seeded figures are used when omitted.
    #[arg(long)]
    pub(crate) statement: Option<PathBuf>,
    /// Fiscal year of the generated yearly figures (defaults to last year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Seed for the generated figures
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Forecast horizon in days (1-90)
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS, value_parser = parse_horizon)]
    pub(crate) horizon_days: u32,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seed for fabricated statements and credit score drift
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Latest fiscal year of the demo company (defaults to last year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Forecast horizon in days (1-90)
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS, value_parser = parse_horizon)]
    pub(crate) horizon_days: u32,
    /// Skip the document upload portion of the demo
    #[arg(long)]
    pub(crate) skip_documents: bool,
}

pub(crate) fn run_approval(args: ApprovalArgs) -> Result<(), AppError> {
    let tier = resolve_approval_tier(args.amount);
    println!("Amount {:.2}", args.amount);
    render_tier(&tier);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        statement,
        year,
        seed,
        horizon_days,
    } = args;

    let year = year.unwrap_or_else(|| Local::now().year() - 1);
    let mut metrics = MockFinancialsGenerator::new(seed).metrics(year);

    match statement {
        Some(path) => {
            metrics.cash_flow = CashFlowStatementImporter::from_path(&path)?;
            println!(
                "Data source: {} ({} months) with seeded yearly figures",
                path.display(),
                metrics.cash_flow.len()
            );
        }
        None => println!("Data source: seeded figures (seed {seed})"),
    }

    render_metrics(&metrics);
    render_health(&health_breakdown(&metrics), None);

    if let Some(current) = metrics.latest_year() {
        let projection = project_cash_flow(current, &metrics.cash_flow, horizon_days);
        render_forecast(&projection);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        year,
        horizon_days,
        skip_documents,
    } = args;

    let engine = EngineConfig {
        mock_seed: seed,
        forecast_horizon_days: horizon_days,
        ..EngineConfig::default()
    };
    let service = TreasuryService::new(Arc::new(InMemoryPortalStore::default()), &engine);
    let year = year.unwrap_or_else(|| Local::now().year() - 1);

    println!("Treasury desk demo");

    println!("\nApproval tiers");
    for tier in service.approval_tiers() {
        println!(
            "- {} ({}): {} approver(s)",
            tier.tier_name,
            tier.threshold_amount.label(),
            tier.required_approvers
        );
    }
    println!("\nSample payments");
    for amount in DEMO_AMOUNTS {
        let tier = service.resolve_approval(amount);
        println!(
            "- {:>12.2} -> {} ({} approver(s))",
            amount, tier.tier_name, tier.required_approvers
        );
    }

    let metrics = service.seed_demo_data(year)?;
    render_metrics(&metrics);

    let health = service.health_report()?;
    render_health(&health.breakdown, health.delta);

    let credit = service.credit_report()?;
    println!("\nCredit score: {}", credit.score);

    let projection = service.forecast(None)?;
    render_forecast(&projection);

    if skip_documents {
        return Ok(());
    }

    println!("\nDocument uploads");
    for (file_name, category) in [
        ("bank-statements-h1.pdf", DocumentCategory::BankStatements),
        ("tax-return.pdf", DocumentCategory::TaxReturn),
    ] {
        let record = service.upload_document(DocumentUpload {
            file_name: file_name.to_string(),
            category,
            size_bytes: 180_224,
        })?;
        println!(
            "- {} stored as {} ({})",
            record.file_name,
            record.id.0,
            record.category.label()
        );
    }

    let refreshed = service.health_report()?;
    println!("Health score after statement upload: {}", refreshed.score);
    render_checklist(&service.checklist()?);

    Ok(())
}

fn render_tier(tier: &ApprovalTier) {
    println!("Tier: {} ({})", tier.tier_name, tier.threshold_amount.label());
    println!("Required approvers: {}", tier.required_approvers);
    if !tier.description.is_empty() {
        println!("{}", tier.description);
    }
}

fn render_metrics(metrics: &FinancialMetrics) {
    println!("\nFinancial ratios");
    for snapshot in &metrics.yearly {
        let ratios = compute_ratios(snapshot);
        println!("- {}: {}", snapshot.year, describe_ratios(&ratios));
    }
}

fn describe_ratios(ratios: &FinancialRatios) -> String {
    format!(
        "current {} | debt/equity {} | profit margin {} | gross margin {}",
        format_ratio(ratios.current_ratio, ""),
        format_ratio(ratios.debt_to_equity, ""),
        format_ratio(ratios.profit_margin, "%"),
        format_ratio(ratios.gross_margin, "%"),
    )
}

fn format_ratio(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(value) => format!("{value:.2}{suffix}"),
        None => "n/a".to_string(),
    }
}

fn render_health(breakdown: &HealthScoreBreakdown, delta: Option<i32>) {
    match delta {
        Some(delta) => println!("\nHealth score: {} ({delta:+} week over week)", breakdown.score),
        None => println!("\nHealth score: {}", breakdown.score),
    }
    println!(
        "- income trend {:+.1}% -> {:+.1}",
        breakdown.income_trend_pct, breakdown.income_adjustment
    );
    println!(
        "- expense trend {:+.1}% -> {:+.1}",
        breakdown.expense_trend_pct, breakdown.expense_adjustment
    );
    println!("- liquidity -> {:+.1}", breakdown.liquidity_adjustment);
}

fn render_forecast(projection: &CashFlowProjection) {
    println!("\nCash-flow forecast ({} days)", projection.horizon_days);
    println!("- current cash {:.2}", projection.current_cash);
    println!(
        "- scheduled in {:.2} | scheduled out {:.2}",
        projection.expected_cash_in, projection.expected_cash_out
    );
    println!(
        "- run rate in {:.2} | run rate out {:.2}",
        projection.adt_projection_in, projection.adt_projection_out
    );
    println!(
        "- projected balance {:.2} ({})",
        projection.projected_balance,
        projection.outlook.label()
    );
    for flow in &projection.scheduled {
        println!(
            "  day {:>2}: {} {:.2} ({})",
            flow.day_offset,
            flow.kind.label(),
            flow.amount,
            flow.description
        );
    }
    for recommendation in &projection.recommendations {
        println!("  * {recommendation}");
    }
}

fn render_checklist(checklist: &CreditChecklist) {
    println!(
        "\nCredit application checklist: {}/{} ({}%)",
        checklist.completed, checklist.required, checklist.completion_pct
    );
    for item in &checklist.items {
        let status = match &item.document {
            Some(document) => format!("received {}", document.file_name),
            None => "missing".to_string(),
        };
        println!("- {}: {}", item.label, status);
    }
}
