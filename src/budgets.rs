// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Repeating budget renewal.
//!
//! Nothing runs in the background: the CLI calls [`renew_expired_budgets`]
//! on start-up and on `budget renew`. Detection is read-only and renewal
//! is idempotent, so running it on every start is safe.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::models::{Budget, NewBudget};
use crate::store::budgets;
use crate::utils::{month_end, next_month_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetPeriod {
    pub is_monthly: bool,
    pub period_days: i64,
    pub next_start: NaiveDate,
    pub next_end: NaiveDate,
}

/// Classifies `[start, end]` and computes the period that follows it.
///
/// A period is monthly when it covers exactly one calendar month; it then
/// rolls to the whole next month. Any other period slides forward by its
/// own length in days, starting the day after `end`.
pub fn analyze_budget_period(start: NaiveDate, end: NaiveDate) -> BudgetPeriod {
    let period_days = (end - start).num_days() + 1;
    let is_monthly = start.day() == 1 && end == month_end(start);
    if is_monthly {
        let next_start = next_month_start(start);
        BudgetPeriod {
            is_monthly,
            period_days,
            next_start,
            next_end: month_end(next_start),
        }
    } else {
        let next_start = end + Duration::days(1);
        BudgetPeriod {
            is_monthly,
            period_days,
            next_start,
            next_end: next_start + Duration::days(period_days - 1),
        }
    }
}

/// True from the day after `end_date` onwards.
pub fn is_budget_expired(budget: &Budget, today: NaiveDate) -> bool {
    budget.end_date.is_some_and(|end| end < today)
}

fn next_period(budget: &Budget) -> Result<BudgetPeriod> {
    match (budget.start_date, budget.end_date) {
        (Some(start), Some(end)) => Ok(analyze_budget_period(start, end)),
        _ => Err(LedgerError::Validation(format!(
            "budget #{} has no start/end date, cannot compute next period",
            budget.id
        ))),
    }
}

/// Repeating budgets past their end whose successor does not exist yet.
///
/// A budget without a start date is still returned so renewal can report it.
pub fn find_expired_repeating_budgets(conn: &Connection, today: NaiveDate) -> Result<Vec<Budget>> {
    let mut out = Vec::new();
    for budget in budgets::list(conn)? {
        if !budget.is_repeating || !is_budget_expired(&budget, today) {
            continue;
        }
        let Ok(next) = next_period(&budget) else {
            out.push(budget);
            continue;
        };
        let existing = budgets::find_matching(
            conn,
            budget.category_id,
            budget.amount,
            next.next_start,
            next.next_end,
        )?;
        if existing.is_none() {
            out.push(budget);
        }
    }
    Ok(out)
}

/// Inserts the period following `budget` and returns its id.
pub fn create_next_budget_period(
    conn: &Connection,
    budget: &Budget,
    now: NaiveDateTime,
) -> Result<i64> {
    let next = next_period(budget)?;
    let new = NewBudget {
        category_id: budget.category_id,
        amount: budget.amount,
        description: budget.description.clone(),
        start_date: Some(next.next_start),
        end_date: Some(next.next_end),
        is_repeating: budget.is_repeating,
    };
    budgets::insert(conn, &new, now)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewedBudget {
    pub source_id: i64,
    pub new_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewalError {
    pub budget_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenewalReport {
    pub renewed: Vec<RenewedBudget>,
    pub errors: Vec<RenewalError>,
}

/// Creates the next period for every expired repeating budget.
///
/// A failure on one budget is recorded in `errors` and the batch goes on.
pub fn renew_expired_budgets(
    conn: &Connection,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Result<RenewalReport> {
    let mut report = RenewalReport::default();
    for budget in find_expired_repeating_budgets(conn, today)? {
        let renewed = create_next_budget_period(conn, &budget, now)
            .and_then(|new_id| Ok((new_id, budgets::get(conn, new_id)?)));
        match renewed {
            Ok((new_id, created)) => {
                tracing::info!(
                    source_id = budget.id,
                    new_id,
                    "repeating budget renewed"
                );
                report.renewed.push(RenewedBudget {
                    source_id: budget.id,
                    new_id,
                    start_date: created.start_date.unwrap_or(today),
                    end_date: created.end_date.unwrap_or(today),
                });
            }
            Err(e) => {
                tracing::warn!(budget_id = budget.id, error = %e, "budget renewal failed");
                report.errors.push(RenewalError {
                    budget_id: budget.id,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}
