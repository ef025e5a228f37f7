use serde::Deserialize;
use time::Date;

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub date: Date,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

/// Request body for updating an expense. All four mutable fields are
/// replaced in one statement; the owner never changes.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub date: Date,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}
