pub mod approvals;
pub mod financials;
pub mod forecast;
pub mod mock;
pub mod portal;
pub mod statement_import;
