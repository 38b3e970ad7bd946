// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};
use rust_decimal::Decimal;

use super::{decimal_at, photos_at, photos_json};
use crate::error::{LedgerError, Result};
use crate::models::{NewTransaction, Transaction};

const COLUMNS: &str = "id, asset_id, category_id, amount, date, created_at, details, description, photos, excluded_from_reports";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        asset_id: r.get(1)?,
        category_id: r.get(2)?,
        amount: decimal_at(r, 3)?,
        date: r.get(4)?,
        created_at: r.get(5)?,
        details: r.get(6)?,
        description: r.get(7)?,
        photos: photos_at(r, 8)?,
        excluded_from_reports: r.get(9)?,
    })
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(p, from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert(conn: &Connection, tx: &NewTransaction, created_at: NaiveDateTime) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(asset_id, category_id, amount, date, created_at, details, description, photos, excluded_from_reports)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tx.asset_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.date,
            created_at,
            tx.details,
            tx.description,
            photos_json(&tx.photos),
            tx.excluded_from_reports
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Writes every column of an existing row back.
pub fn update(conn: &Connection, tx: &Transaction) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET asset_id=?2, category_id=?3, amount=?4, date=?5, details=?6,
             description=?7, photos=?8, excluded_from_reports=?9
         WHERE id=?1",
        params![
            tx.id,
            tx.asset_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.date,
            tx.details,
            tx.description,
            photos_json(&tx.photos),
            tx.excluded_from_reports
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction", tx.id));
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction", id));
    }
    Ok(())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<Transaction> {
    find(conn, id)?.ok_or_else(|| LedgerError::not_found("transaction", id))
}

/// All transactions of an asset in replay order.
pub fn list_for_asset(conn: &Connection, asset_id: i64) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE asset_id=?1 ORDER BY date, id",
        COLUMNS
    );
    collect(conn, &sql, params![asset_id])
}

/// Transactions of an asset dated on or before `date`, in replay order.
pub fn list_for_asset_until(
    conn: &Connection,
    asset_id: i64,
    date: NaiveDate,
) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE asset_id=?1 AND date<=?2 ORDER BY date, id",
        COLUMNS
    );
    collect(conn, &sql, params![asset_id, date])
}

pub fn between(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE date BETWEEN ?1 AND ?2 ORDER BY date, id",
        COLUMNS
    );
    collect(conn, &sql, params![from, to])
}

pub fn until(conn: &Connection, to: NaiveDate) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE date<=?1 ORDER BY date, id",
        COLUMNS
    );
    collect(conn, &sql, params![to])
}

pub fn list_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let sql = format!("SELECT {} FROM transactions ORDER BY date, id", COLUMNS);
    collect(conn, &sql, [])
}

/// Sum of raw amounts for one category inside `[from, to]`.
pub fn sum_for_category_between(
    conn: &Connection,
    category_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Decimal> {
    let mut stmt = conn.prepare_cached(
        "SELECT amount FROM transactions WHERE category_id=?1 AND date BETWEEN ?2 AND ?3",
    )?;
    let rows = stmt.query_map(params![category_id, from, to], |r| decimal_at(r, 0))?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += row?;
    }
    Ok(total)
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub asset_id: Option<i64>,
    pub category_id: Option<i64>,
    pub limit: Option<usize>,
}

/// Newest first, for listings.
pub fn query(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", COLUMNS);
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(from) = filter.from {
        sql.push_str(" AND date>=?");
        args.push(Box::new(from));
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND date<=?");
        args.push(Box::new(to));
    }
    if let Some(asset_id) = filter.asset_id {
        sql.push_str(" AND asset_id=?");
        args.push(Box::new(asset_id));
    }
    if let Some(category_id) = filter.category_id {
        sql.push_str(" AND category_id=?");
        args.push(Box::new(category_id));
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        args.push(Box::new(limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter().map(|a| a.as_ref())), from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(crate) fn insert_with_id(conn: &Connection, tx: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(id, asset_id, category_id, amount, date, created_at, details, description, photos, excluded_from_reports)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            tx.id,
            tx.asset_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.date,
            tx.created_at,
            tx.details,
            tx.description,
            photos_json(&tx.photos),
            tx.excluded_from_reports
        ],
    )?;
    Ok(())
}
