// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::decimal_at;
use crate::error::Result;
use crate::models::AssetBalance;

const COLUMNS: &str = "id, asset_id, date, balance";

fn from_row(r: &Row<'_>) -> rusqlite::Result<AssetBalance> {
    Ok(AssetBalance {
        id: r.get(0)?,
        asset_id: r.get(1)?,
        date: r.get(2)?,
        balance: decimal_at(r, 3)?,
    })
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> Result<Vec<AssetBalance>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(p, from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn on_date(conn: &Connection, asset_id: i64, date: NaiveDate) -> Result<Option<AssetBalance>> {
    let sql = format!(
        "SELECT {} FROM asset_balances WHERE asset_id=?1 AND date=?2",
        COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![asset_id, date], from_row)
        .optional()?)
}

/// Most recent snapshot strictly before `date`.
pub fn latest_before(
    conn: &Connection,
    asset_id: i64,
    date: NaiveDate,
) -> Result<Option<AssetBalance>> {
    let sql = format!(
        "SELECT {} FROM asset_balances WHERE asset_id=?1 AND date<?2 ORDER BY date DESC LIMIT 1",
        COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![asset_id, date], from_row)
        .optional()?)
}

/// Most recent snapshot dated on or before `date`.
pub fn latest_on_or_before(
    conn: &Connection,
    asset_id: i64,
    date: NaiveDate,
) -> Result<Option<AssetBalance>> {
    let sql = format!(
        "SELECT {} FROM asset_balances WHERE asset_id=?1 AND date<=?2 ORDER BY date DESC LIMIT 1",
        COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![asset_id, date], from_row)
        .optional()?)
}

pub fn list_for_asset(conn: &Connection, asset_id: i64) -> Result<Vec<AssetBalance>> {
    let sql = format!(
        "SELECT {} FROM asset_balances WHERE asset_id=?1 ORDER BY date",
        COLUMNS
    );
    collect(conn, &sql, params![asset_id])
}

pub fn list_all(conn: &Connection) -> Result<Vec<AssetBalance>> {
    let sql = format!(
        "SELECT {} FROM asset_balances ORDER BY asset_id, date",
        COLUMNS
    );
    collect(conn, &sql, [])
}

pub fn count_for_asset(conn: &Connection, asset_id: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM asset_balances WHERE asset_id=?1",
        params![asset_id],
        |r| r.get(0),
    )?)
}

pub fn upsert(conn: &Connection, asset_id: i64, date: NaiveDate, balance: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO asset_balances(asset_id, date, balance) VALUES (?1, ?2, ?3)
         ON CONFLICT(asset_id, date) DO UPDATE SET balance=excluded.balance",
        params![asset_id, date, balance.to_string()],
    )?;
    Ok(())
}

/// Adds `delta` to every snapshot dated strictly after `date`; returns the number shifted.
pub fn shift_after(
    conn: &Connection,
    asset_id: i64,
    date: NaiveDate,
    delta: Decimal,
) -> Result<usize> {
    let sql = format!(
        "SELECT {} FROM asset_balances WHERE asset_id=?1 AND date>?2 ORDER BY date",
        COLUMNS
    );
    let later = collect(conn, &sql, params![asset_id, date])?;
    let mut stmt = conn.prepare_cached("UPDATE asset_balances SET balance=?2 WHERE id=?1")?;
    for snap in &later {
        stmt.execute(params![snap.id, (snap.balance + delta).to_string()])?;
    }
    Ok(later.len())
}

pub fn delete_for_asset(conn: &Connection, asset_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM asset_balances WHERE asset_id=?1",
        params![asset_id],
    )?)
}

pub(crate) fn insert_with_id(conn: &Connection, b: &AssetBalance) -> Result<()> {
    conn.execute(
        "INSERT INTO asset_balances(id, asset_id, date, balance) VALUES (?1, ?2, ?3, ?4)",
        params![b.id, b.asset_id, b.date, b.balance.to_string()],
    )?;
    Ok(())
}
