// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::decimal_at;
use crate::error::{LedgerError, Result};
use crate::models::{Budget, NewBudget};

const COLUMNS: &str =
    "id, category_id, amount, description, start_date, end_date, is_repeating, created_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: r.get(0)?,
        category_id: r.get(1)?,
        amount: decimal_at(r, 2)?,
        description: r.get(3)?,
        start_date: r.get(4)?,
        end_date: r.get(5)?,
        is_repeating: r.get(6)?,
        created_at: r.get(7)?,
    })
}

pub fn insert(conn: &Connection, b: &NewBudget, created_at: NaiveDateTime) -> Result<i64> {
    if b.amount < Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "budget amount must not be negative, got {}",
            b.amount
        )));
    }
    if let (Some(start), Some(end)) = (b.start_date, b.end_date) {
        if end < start {
            return Err(LedgerError::Validation(format!(
                "budget ends ({}) before it starts ({})",
                end, start
            )));
        }
    }
    super::transaction_categories::get(conn, b.category_id)?;
    conn.execute(
        "INSERT INTO budgets(category_id, amount, description, start_date, end_date, is_repeating, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            b.category_id,
            b.amount.to_string(),
            b.description,
            b.start_date,
            b.end_date,
            b.is_repeating,
            created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<Budget>> {
    let sql = format!("SELECT {} FROM budgets WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<Budget> {
    find(conn, id)?.ok_or_else(|| LedgerError::not_found("budget", id))
}

pub fn list(conn: &Connection) -> Result<Vec<Budget>> {
    let sql = format!("SELECT {} FROM budgets ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Budgets whose period contains `day`.
pub fn active_on(conn: &Connection, day: NaiveDate) -> Result<Vec<Budget>> {
    let sql = format!(
        "SELECT {} FROM budgets WHERE start_date<=?1 AND end_date>=?1 ORDER BY id",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![day], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// A budget with the same category, amount and exact period, if one exists.
pub fn find_matching(
    conn: &Connection,
    category_id: i64,
    amount: Decimal,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<Budget>> {
    let sql = format!(
        "SELECT {} FROM budgets WHERE category_id=?1 AND start_date=?2 AND end_date=?3 ORDER BY id",
        COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![category_id, start, end], from_row)?;
    for row in rows {
        let b = row?;
        // amounts are TEXT, so "50" and "50.00" only compare equal as decimals
        if b.amount == amount {
            return Ok(Some(b));
        }
    }
    Ok(None)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM budgets WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::not_found("budget", id));
    }
    Ok(())
}

pub(crate) fn insert_with_id(conn: &Connection, b: &Budget) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(id, category_id, amount, description, start_date, end_date, is_repeating, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            b.id,
            b.category_id,
            b.amount.to_string(),
            b.description,
            b.start_date,
            b.end_date,
            b.is_repeating,
            b.created_at
        ],
    )?;
    Ok(())
}
