// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Table-level access to the record store.
//!
//! Every function takes a plain `&Connection`, so callers can run them
//! either directly or inside a `rusqlite::Transaction` (which derefs to a
//! connection) when several writes must land together.

pub mod asset_balances;
pub mod asset_categories;
pub mod assets;
pub mod budgets;
pub mod config;
pub mod transaction_categories;
pub mod transactions;

use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

/// Money is stored as TEXT to keep exact decimal precision.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn photos_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn photos_json(photos: &[String]) -> String {
    serde_json::to_string(photos).unwrap_or_else(|_| "[]".to_string())
}
