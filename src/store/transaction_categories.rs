// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

use crate::error::{LedgerError, Result};
use crate::models::{CategoryKind, TransactionCategory};

const COLUMNS: &str = "id, name, type, description, icon";

fn from_row(r: &Row<'_>) -> rusqlite::Result<TransactionCategory> {
    let kind: String = r.get(2)?;
    let kind = kind
        .parse::<CategoryKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.to_string().into()))?;
    Ok(TransactionCategory {
        id: r.get(0)?,
        name: r.get(1)?,
        kind,
        description: r.get(3)?,
        icon: r.get(4)?,
    })
}

pub fn insert(
    conn: &Connection,
    name: &str,
    kind: CategoryKind,
    description: Option<&str>,
    icon: Option<&str>,
) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("category name is empty".into()));
    }
    conn.execute(
        "INSERT INTO transaction_categories(name, type, description, icon) VALUES (?1, ?2, ?3, ?4)",
        params![name, kind.as_str(), description, icon],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<TransactionCategory>> {
    let sql = format!("SELECT {} FROM transaction_categories WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<TransactionCategory> {
    find(conn, id)?.ok_or_else(|| LedgerError::not_found("transaction category", id))
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<TransactionCategory>> {
    let sql = format!(
        "SELECT {} FROM transaction_categories WHERE name=?1 ORDER BY id LIMIT 1",
        COLUMNS
    );
    Ok(conn.query_row(&sql, params![name.trim()], from_row).optional()?)
}

pub fn list(conn: &Connection) -> Result<Vec<TransactionCategory>> {
    let sql = format!("SELECT {} FROM transaction_categories ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Current kind of every category, keyed by id.
pub fn kinds(conn: &Connection) -> Result<HashMap<i64, CategoryKind>> {
    Ok(list(conn)?.into_iter().map(|c| (c.id, c.kind)).collect())
}

/// Changes the category type. Existing transactions are not rewritten, so
/// every later replay applies the new sign to the whole history.
pub fn set_kind(conn: &Connection, id: i64, kind: CategoryKind) -> Result<()> {
    let n = conn.execute(
        "UPDATE transaction_categories SET type=?2 WHERE id=?1",
        params![id, kind.as_str()],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction category", id));
    }
    Ok(())
}

/// Fails with a validation error while transactions or budgets still reference the category.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        return Err(LedgerError::Validation(format!(
            "category #{} is used by {} transaction(s)",
            id, used
        )));
    }
    let budgeted: i64 = conn.query_row(
        "SELECT COUNT(*) FROM budgets WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if budgeted > 0 {
        return Err(LedgerError::Validation(format!(
            "category #{} has {} budget(s); remove them first",
            id, budgeted
        )));
    }
    let n = conn.execute(
        "DELETE FROM transaction_categories WHERE id=?1",
        params![id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("transaction category", id));
    }
    Ok(())
}

pub(crate) fn insert_with_id(conn: &Connection, c: &TransactionCategory) -> Result<()> {
    conn.execute(
        "INSERT INTO transaction_categories(id, name, type, description, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![c.id, c.name, c.kind.as_str(), c.description, c.icon],
    )?;
    Ok(())
}
