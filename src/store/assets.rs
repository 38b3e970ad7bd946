// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::decimal_at;
use crate::error::{LedgerError, Result};
use crate::models::Asset;

const COLUMNS: &str = "id, name, category_id, balance, icon";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: r.get(0)?,
        name: r.get(1)?,
        category_id: r.get(2)?,
        balance: decimal_at(r, 3)?,
        icon: r.get(4)?,
    })
}

pub fn insert(
    conn: &Connection,
    name: &str,
    category_id: Option<i64>,
    icon: Option<&str>,
) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("asset name is empty".into()));
    }
    if let Some(cid) = category_id {
        super::asset_categories::get(conn, cid)?;
    }
    conn.execute(
        "INSERT INTO assets(name, category_id, balance, icon) VALUES (?1, ?2, '0', ?3)",
        params![name, category_id, icon],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<Asset>> {
    let sql = format!("SELECT {} FROM assets WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<Asset> {
    find(conn, id)?.ok_or_else(|| LedgerError::not_found("asset", id))
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Asset>> {
    let sql = format!("SELECT {} FROM assets WHERE name=?1 ORDER BY id LIMIT 1", COLUMNS);
    Ok(conn.query_row(&sql, params![name.trim()], from_row).optional()?)
}

pub fn list(conn: &Connection) -> Result<Vec<Asset>> {
    let sql = format!("SELECT {} FROM assets ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Overwrites the cached balance. Only the ledger and explicit user edits call this.
pub fn set_balance(conn: &Connection, id: i64, balance: Decimal) -> Result<()> {
    let n = conn.execute(
        "UPDATE assets SET balance=?2 WHERE id=?1",
        params![id, balance.to_string()],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("asset", id));
    }
    Ok(())
}

pub fn set_category(conn: &Connection, id: i64, category_id: Option<i64>) -> Result<()> {
    if let Some(cid) = category_id {
        super::asset_categories::get(conn, cid)?;
    }
    let n = conn.execute(
        "UPDATE assets SET category_id=?2 WHERE id=?1",
        params![id, category_id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("asset", id));
    }
    Ok(())
}

/// Deletes the asset together with its transactions and snapshots.
pub fn delete(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM asset_balances WHERE asset_id=?1", params![id])?;
    tx.execute("DELETE FROM transactions WHERE asset_id=?1", params![id])?;
    let n = tx.execute("DELETE FROM assets WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::not_found("asset", id));
    }
    tx.commit()?;
    Ok(())
}

pub(crate) fn insert_with_id(conn: &Connection, a: &Asset) -> Result<()> {
    conn.execute(
        "INSERT INTO assets(id, name, category_id, balance, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![a.id, a.name, a.category_id, a.balance.to_string(), a.icon],
    )?;
    Ok(())
}
