//! Persisted portal state survives a restart of the service.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use treasury_desk::config::EngineConfig;
use treasury_desk::workflows::financials::YearlyFinancials;
use treasury_desk::workflows::portal::{
    DocumentCategory, DocumentUpload, JsonFilePortalStore, PortalState, PortalStore,
    TreasuryService,
};
use treasury_desk::workflows::statement_import::CashFlowStatementImporter;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("treasury-desk-it-{}", std::process::id()))
        .join(name)
}

const STATEMENT: &str = "Month,Income,Expenses,Balance\n\
Jan 2025,\"$42,000.00\",\"$37,500.00\",\"$18,250.75\"\n\
Feb 2025,\"$44,100.00\",\"$39,000.00\",\"$23,350.75\"\n\
2025-03,46000,38250.5,31100.25\n";

#[test]
fn state_round_trips_through_the_json_store() {
    let path = scratch_path("round-trip.json");
    std::fs::remove_file(&path).ok();
    let engine = EngineConfig {
        state_path: Some(path.clone()),
        ..EngineConfig::default()
    };

    let cash_flow =
        CashFlowStatementImporter::from_reader(Cursor::new(STATEMENT)).expect("statement imports");
    assert_eq!(cash_flow.len(), 3);

    let recorded_at = Utc
        .with_ymd_and_hms(2025, 4, 2, 8, 30, 0)
        .single()
        .expect("valid timestamp");

    let written = {
        let service = TreasuryService::new(Arc::new(JsonFilePortalStore::new(&path)), &engine);
        service
            .submit_financials(YearlyFinancials::from_components(
                "2025", 150_000.25, 420_000.0, 61_000.5, 180_000.0, 510_000.0, 468_250.75,
            ))
            .expect("financials stored");
        service.replace_cash_flow(cash_flow).expect("history stored");
        service
            .upload_document_at(
                DocumentUpload {
                    file_name: "plan-2025.pdf".to_string(),
                    category: DocumentCategory::BusinessPlan,
                    size_bytes: 52_431,
                },
                recorded_at,
            )
            .expect("document stored");
        service.health_report_at(recorded_at).expect("health report");
        service.credit_report_at(recorded_at).expect("credit report");

        JsonFilePortalStore::new(&path).load().expect("state written")
    };

    let reloaded: PortalState = JsonFilePortalStore::new(&path).load().expect("state reloads");
    assert_eq!(reloaded, written);
    assert_eq!(reloaded.financial_metrics.cash_flow[2].expenses, 38_250.5);
    assert_eq!(reloaded.financial_metrics.cash_flow[0].balance, 18_250.75);
    assert_eq!(reloaded.documents[0].uploaded_at, recorded_at);
    assert!(reloaded.score_history.credit.latest.is_some());

    let restarted = TreasuryService::new(Arc::new(JsonFilePortalStore::new(&path)), &engine);
    let credit = restarted
        .credit_report_at(recorded_at)
        .expect("credit report after restart");
    assert_eq!(
        Some(credit.score),
        reloaded.score_history.credit.latest.map(|snapshot| snapshot.score)
    );
    assert_eq!(restarted.checklist().expect("checklist").completed, 1);

    std::fs::remove_file(&path).ok();
}

#[test]
fn older_state_files_without_new_sections_still_load() {
    let path = scratch_path("legacy.json");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("scratch dir");
    }
    std::fs::write(
        &path,
        r#"{"financial_metrics":{"yearly":[],"cash_flow":[{"month":"2024-12","income":1.0,"expenses":2.0,"balance":-1.0}]}}"#,
    )
    .expect("legacy state written");

    let state = JsonFilePortalStore::new(&path).load().expect("legacy loads");
    assert_eq!(state.financial_metrics.cash_flow.len(), 1);
    assert!(state.documents.is_empty());
    assert!(state.score_history.health.latest.is_none());

    std::fs::remove_file(&path).ok();
}
