// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Assetbook", "assetbook"));

pub const DB_ENV: &str = "ASSETBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("assetbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn).with_context(|| format!("Init schema at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS config(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        setup_completed INTEGER NOT NULL DEFAULT 0,
        date_format TEXT NOT NULL DEFAULT '%Y-%m-%d',
        currency_symbol TEXT NOT NULL DEFAULT '$',
        week_start TEXT NOT NULL DEFAULT 'monday'
    );
    INSERT OR IGNORE INTO config(id) VALUES (1);

    CREATE TABLE IF NOT EXISTS asset_categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        icon TEXT
    );

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER,
        balance TEXT NOT NULL DEFAULT '0',
        icon TEXT,
        FOREIGN KEY(category_id) REFERENCES asset_categories(id) ON DELETE SET NULL
    );

    -- dated checkpoints of an asset's cumulative balance
    CREATE TABLE IF NOT EXISTS asset_balances(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        asset_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        balance TEXT NOT NULL,
        UNIQUE(asset_id, date),
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS transaction_categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        description TEXT,
        icon TEXT
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        asset_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        amount TEXT NOT NULL, -- magnitude, sign comes from the category type
        date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        details TEXT,
        description TEXT,
        photos TEXT NOT NULL DEFAULT '[]',
        excluded_from_reports INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES transaction_categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_asset_date ON transactions(asset_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category_date ON transactions(category_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        description TEXT,
        start_date TEXT,
        end_date TEXT,
        is_repeating INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY(category_id) REFERENCES transaction_categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_budgets_category_start ON budgets(category_id, start_date);
    "#,
    )
}
