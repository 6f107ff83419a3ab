use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    BalanceSheet,
    IncomeStatement,
    BankStatements,
    TaxReturn,
    BusinessPlan,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::BalanceSheet,
        DocumentCategory::IncomeStatement,
        DocumentCategory::BankStatements,
        DocumentCategory::TaxReturn,
        DocumentCategory::BusinessPlan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::BalanceSheet => "Balance sheet",
            DocumentCategory::IncomeStatement => "Income statement",
            DocumentCategory::BankStatements => "Bank statements (last 6 months)",
            DocumentCategory::TaxReturn => "Business tax return",
            DocumentCategory::BusinessPlan => "Business plan",
        }
    }

    /// Statements that feed the business-health metrics when uploaded.
    pub fn is_financial_statement(&self) -> bool {
        matches!(
            self,
            DocumentCategory::BalanceSheet
                | DocumentCategory::IncomeStatement
                | DocumentCategory::BankStatements
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub category: DocumentCategory,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Metadata kept for an upload. File contents are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub file_name: String,
    pub category: DocumentCategory,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub category: DocumentCategory,
    pub label: &'static str,
    pub document: Option<DocumentRecord>,
}

/// Credit-application checklist, one line per required category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditChecklist {
    pub items: Vec<ChecklistItem>,
    pub completed: usize,
    pub required: usize,
    pub completion_pct: u8,
}

impl CreditChecklist {
    pub fn is_complete(&self) -> bool {
        self.completed == self.required
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.items
            .iter()
            .filter(|item| item.document.is_none())
            .map(|item| item.label)
            .collect()
    }
}

/// Latest upload per category wins.
pub fn build_checklist(documents: &[DocumentRecord]) -> CreditChecklist {
    let items: Vec<ChecklistItem> = DocumentCategory::ALL
        .iter()
        .map(|category| ChecklistItem {
            category: *category,
            label: category.label(),
            document: documents
                .iter()
                .filter(|document| document.category == *category)
                .max_by_key(|document| document.uploaded_at)
                .cloned(),
        })
        .collect();

    let required = items.len();
    let completed = items.iter().filter(|item| item.document.is_some()).count();
    let completion_pct = if required == 0 {
        100
    } else {
        ((completed as f32 / required as f32) * 100.0).round() as u8
    };

    CreditChecklist {
        items,
        completed,
        required,
        completion_pct,
    }
}
