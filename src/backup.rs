// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-store snapshots. Imported rows bypass the incremental balance
//! path, so every import ends with a full recalculation of all assets.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::{RecalculationReport, recalculate_in};
use crate::models::{
    Asset, AssetBalance, AssetCategory, Budget, Config, Transaction, TransactionCategory,
};
use crate::store::{
    asset_balances, asset_categories, assets, budgets, config, transaction_categories,
    transactions,
};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub config: Config,
    pub asset_categories: Vec<AssetCategory>,
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub asset_balances: Vec<AssetBalance>,
    pub transaction_categories: Vec<TransactionCategory>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

pub fn export_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        config: config::load(conn)?,
        asset_categories: asset_categories::list(conn)?,
        assets: assets::list(conn)?,
        asset_balances: asset_balances::list_all(conn)?,
        transaction_categories: transaction_categories::list(conn)?,
        transactions: transactions::list_all(conn)?,
        budgets: budgets::list(conn)?,
    })
}

fn is_empty(conn: &Connection) -> Result<bool> {
    let rows: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM assets) + (SELECT COUNT(*) FROM asset_categories)
              + (SELECT COUNT(*) FROM transaction_categories) + (SELECT COUNT(*) FROM budgets)",
        [],
        |r| r.get(0),
    )?;
    Ok(rows == 0)
}

/// Restores `snapshot` into an empty store and reconciles every cached balance.
pub fn import_snapshot(
    conn: &mut Connection,
    snapshot: &Snapshot,
) -> Result<Vec<RecalculationReport>> {
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(LedgerError::Validation(format!(
            "snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    let tx = conn.transaction()?;
    if !is_empty(&tx)? {
        return Err(LedgerError::Validation(
            "store is not empty, import only restores into a fresh database".into(),
        ));
    }

    config::save(&tx, &snapshot.config)?;
    for c in &snapshot.asset_categories {
        asset_categories::insert_with_id(&tx, c)?;
    }
    for a in &snapshot.assets {
        assets::insert_with_id(&tx, a)?;
    }
    for b in &snapshot.asset_balances {
        asset_balances::insert_with_id(&tx, b)?;
    }
    for c in &snapshot.transaction_categories {
        transaction_categories::insert_with_id(&tx, c)?;
    }
    for t in &snapshot.transactions {
        transactions::insert_with_id(&tx, t)?;
    }
    for b in &snapshot.budgets {
        budgets::insert_with_id(&tx, b)?;
    }

    let mut reports = Vec::with_capacity(snapshot.assets.len());
    for a in &snapshot.assets {
        reports.push(recalculate_in(&tx, a.id)?);
    }
    tx.commit()?;
    tracing::info!(
        assets = snapshot.assets.len(),
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        "snapshot imported"
    );
    Ok(reports)
}
