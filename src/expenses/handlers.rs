use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    expenses::dto::{CreateExpenseRequest, UpdateExpenseRequest},
    expenses::repo::Expense,
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

/// Owner check run before any mutation of an existing expense.
fn ensure_owner(expense: &Expense, caller: Uuid) -> Result<(), ApiError> {
    if expense.user_id != caller {
        warn!(expense_id = %expense.id, caller = %caller, "ownership check failed");
        return Err(ApiError::NotOwner);
    }
    Ok(())
}

/// Loads an expense and verifies the caller owns it: missing id is 404, a
/// foreign owner is rejected before anything is touched or returned.
async fn load_owned(db: &PgPool, id: Uuid, caller: Uuid) -> Result<Expense, ApiError> {
    let expense = Expense::find_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Expense"))?;
    ensure_owner(&expense, caller)?;
    Ok(expense)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    if payload.category.trim().is_empty() {
        return Err(ApiError::Validation("Category must not be empty"));
    }

    let expense = Expense::create(
        &state.db,
        user.id,
        payload.date,
        payload.amount,
        payload.category.trim(),
        payload.description.as_deref(),
    )
    .await?;

    info!(expense_id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = Expense::list_by_owner(&state.db, user.id).await?;
    Ok(Json(expenses))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    if payload.category.trim().is_empty() {
        return Err(ApiError::Validation("Category must not be empty"));
    }

    load_owned(&state.db, id, user.id).await?;

    let expense = Expense::update(
        &state.db,
        id,
        payload.date,
        payload.amount,
        payload.category.trim(),
        payload.description.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("Expense"))?;

    info!(expense_id = %expense.id, "expense updated");
    Ok(Json(expense))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    load_owned(&state.db, id, user.id).await?;

    if !Expense::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Expense"));
    }

    info!(expense_id = %id, "expense removed");
    Ok(Json(json!({ "message": "Expense removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, OffsetDateTime};

    fn sample_expense(owner: Uuid) -> Expense {
        let now = OffsetDateTime::now_utc();
        Expense {
            id: Uuid::new_v4(),
            user_id: owner,
            date: date!(2024 - 01 - 01),
            amount: 42.5,
            category: "food".into(),
            description: Some("lunch".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_passes_ownership_check() {
        let owner = Uuid::new_v4();
        let expense = sample_expense(owner);
        assert!(ensure_owner(&expense, owner).is_ok());
    }

    #[test]
    fn other_user_fails_ownership_check() {
        let expense = sample_expense(Uuid::new_v4());
        let intruder = Uuid::new_v4();
        assert!(matches!(
            ensure_owner(&expense, intruder),
            Err(ApiError::NotOwner)
        ));
    }
}
