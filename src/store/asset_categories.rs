// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{LedgerError, Result};
use crate::models::AssetCategory;

const COLUMNS: &str = "id, name, description, icon";

fn from_row(r: &Row<'_>) -> rusqlite::Result<AssetCategory> {
    Ok(AssetCategory {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        icon: r.get(3)?,
    })
}

pub fn insert(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    icon: Option<&str>,
) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("asset category name is empty".into()));
    }
    conn.execute(
        "INSERT INTO asset_categories(name, description, icon) VALUES (?1, ?2, ?3)",
        params![name, description, icon],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<AssetCategory>> {
    let sql = format!("SELECT {} FROM asset_categories WHERE id=?1", COLUMNS);
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> Result<AssetCategory> {
    find(conn, id)?.ok_or_else(|| LedgerError::not_found("asset category", id))
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<AssetCategory>> {
    let sql = format!(
        "SELECT {} FROM asset_categories WHERE name=?1 ORDER BY id LIMIT 1",
        COLUMNS
    );
    Ok(conn.query_row(&sql, params![name.trim()], from_row).optional()?)
}

pub fn list(conn: &Connection) -> Result<Vec<AssetCategory>> {
    let sql = format!("SELECT {} FROM asset_categories ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Removes the category and detaches its assets; assets are never deleted.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE assets SET category_id=NULL WHERE category_id=?1",
        params![id],
    )?;
    let n = conn.execute("DELETE FROM asset_categories WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::not_found("asset category", id));
    }
    Ok(())
}

pub(crate) fn insert_with_id(conn: &Connection, c: &AssetCategory) -> Result<()> {
    conn.execute(
        "INSERT INTO asset_categories(id, name, description, icon) VALUES (?1, ?2, ?3, ?4)",
        params![c.id, c.name, c.description, c.icon],
    )?;
    Ok(())
}
