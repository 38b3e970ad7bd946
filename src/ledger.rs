// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance ledger: keeps `assets.balance` and the dated `asset_balances`
//! checkpoints in agreement with the transaction log.
//!
//! Two kinds of entry points live here:
//!
//! - primitives taking `&Connection` ([`add_balance`], [`deduct_balance`],
//!   [`resolve_balance_as_of`], [`daily_balance_series`]) that compose inside
//!   a caller's transaction;
//! - logical operations taking `&mut Connection` ([`add_transaction`],
//!   [`edit_transaction`], [`delete_transaction`],
//!   [`reset_and_recalculate_balance`]) that write the transaction row and
//!   its balance effect in one SQLite transaction.
//!
//! [`reset_and_recalculate_balance`] is the repair path for a cached balance
//! that drifted from the log (e.g. after a bulk import).

use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{LedgerError, Result};
use crate::models::{CategoryKind, NewTransaction, Transaction, TransactionPatch, signed_amount};
use crate::store::{asset_balances, assets, transaction_categories, transactions};
use crate::utils::days_inclusive;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalculationReport {
    pub asset_id: i64,
    pub previous_balance: Decimal,
    pub balance: Decimal,
    pub snapshots: usize,
}

impl RecalculationReport {
    pub fn drifted(&self) -> bool {
        self.previous_balance != self.balance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceDrift {
    pub asset_id: i64,
    pub asset_name: String,
    pub cached: Decimal,
    pub replayed: Decimal,
}

impl BalanceDrift {
    pub fn difference(&self) -> Decimal {
        self.cached - self.replayed
    }
}

/// Raises the asset balance by `amount` as of `date`.
pub fn add_balance(
    conn: &Connection,
    asset_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Decimal> {
    apply_delta(conn, asset_id, amount, date)
}

/// Lowers the asset balance by `amount` as of `date`.
pub fn deduct_balance(
    conn: &Connection,
    asset_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Decimal> {
    apply_delta(conn, asset_id, -amount, date)
}

/// Moves the cached balance and the checkpoint series by `delta`.
///
/// The checkpoint for `date` ends up holding the cumulative balance at the
/// end of that day, and every later checkpoint is shifted by the same delta,
/// so a backdated entry keeps the series consistent with a replay.
fn apply_delta(conn: &Connection, asset_id: i64, delta: Decimal, date: NaiveDate) -> Result<Decimal> {
    let asset = assets::get(conn, asset_id)?;
    let balance = asset.balance + delta;
    assets::set_balance(conn, asset_id, balance)?;

    let on_day = match asset_balances::on_date(conn, asset_id, date)? {
        Some(existing) => existing.balance + delta,
        None => {
            let prior = asset_balances::latest_before(conn, asset_id, date)?
                .map(|s| s.balance)
                .unwrap_or(Decimal::ZERO);
            prior + delta
        }
    };
    asset_balances::upsert(conn, asset_id, date, on_day)?;
    let shifted = asset_balances::shift_after(conn, asset_id, date, delta)?;

    tracing::debug!(
        asset_id,
        %delta,
        %date,
        %balance,
        shifted,
        "asset balance adjusted"
    );
    Ok(balance)
}

/// Applies one transaction's signed effect through add/deduct.
fn apply_effect(
    conn: &Connection,
    kind: CategoryKind,
    asset_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Decimal> {
    match kind {
        CategoryKind::Income => add_balance(conn, asset_id, amount, date),
        CategoryKind::Expense => deduct_balance(conn, asset_id, amount, date),
    }
}

fn reverse_effect(
    conn: &Connection,
    kind: CategoryKind,
    asset_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Decimal> {
    match kind {
        CategoryKind::Income => deduct_balance(conn, asset_id, amount, date),
        CategoryKind::Expense => add_balance(conn, asset_id, amount, date),
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "transaction amount must be a non-negative magnitude, got {}",
            amount
        )));
    }
    Ok(())
}

/// Stores a transaction and applies its balance effect atomically.
pub fn add_transaction(conn: &mut Connection, new: &NewTransaction) -> Result<i64> {
    validate_amount(new.amount)?;
    let tx = conn.transaction()?;
    assets::get(&tx, new.asset_id)?;
    let category = transaction_categories::get(&tx, new.category_id)?;
    let id = transactions::insert(&tx, new, Local::now().naive_local())?;
    apply_effect(&tx, category.kind, new.asset_id, new.amount, new.date)?;
    tx.commit()?;
    tracing::debug!(id, asset_id = new.asset_id, amount = %new.amount, "transaction added");
    Ok(id)
}

/// Applies `patch` to a stored transaction, moving its balance effect from
/// the old asset/date to the new one atomically.
pub fn edit_transaction(
    conn: &mut Connection,
    id: i64,
    patch: &TransactionPatch,
) -> Result<Transaction> {
    let tx = conn.transaction()?;
    let old = transactions::get(&tx, id)?;
    let mut new = old.clone();
    if let Some(v) = patch.asset_id {
        new.asset_id = v;
    }
    if let Some(v) = patch.category_id {
        new.category_id = v;
    }
    if let Some(v) = patch.amount {
        new.amount = v;
    }
    if let Some(v) = patch.date {
        new.date = v;
    }
    if let Some(v) = &patch.details {
        new.details = v.clone();
    }
    if let Some(v) = &patch.description {
        new.description = v.clone();
    }
    if let Some(v) = &patch.photos {
        new.photos = v.clone();
    }
    if let Some(v) = patch.excluded_from_reports {
        new.excluded_from_reports = v;
    }
    validate_amount(new.amount)?;
    assets::get(&tx, new.asset_id)?;
    let new_kind = transaction_categories::get(&tx, new.category_id)?.kind;

    transactions::update(&tx, &new)?;

    let moves_balance = old.asset_id != new.asset_id
        || old.category_id != new.category_id
        || old.amount != new.amount
        || old.date != new.date;
    if moves_balance {
        match transaction_categories::find(&tx, old.category_id)? {
            Some(old_cat) => {
                reverse_effect(&tx, old_cat.kind, old.asset_id, old.amount, old.date)?;
            }
            None => tracing::warn!(
                id,
                category_id = old.category_id,
                "previous category missing, old effect not reversed"
            ),
        }
        apply_effect(&tx, new_kind, new.asset_id, new.amount, new.date)?;
    }
    tx.commit()?;
    tracing::debug!(id, moves_balance, "transaction edited");
    Ok(new)
}

/// Removes a transaction and reverses its balance effect atomically.
pub fn delete_transaction(conn: &mut Connection, id: i64) -> Result<Transaction> {
    let tx = conn.transaction()?;
    let old = transactions::get(&tx, id)?;
    transactions::delete(&tx, id)?;
    match transaction_categories::find(&tx, old.category_id)? {
        Some(cat) => {
            reverse_effect(&tx, cat.kind, old.asset_id, old.amount, old.date)?;
        }
        None => tracing::warn!(
            id,
            category_id = old.category_id,
            "category missing, balance left untouched"
        ),
    }
    tx.commit()?;
    tracing::debug!(id, asset_id = old.asset_id, "transaction deleted");
    Ok(old)
}

/// End-of-day cumulative balances for every distinct date in `txs`.
///
/// `txs` must be in replay order (date, then id). Signs come from the
/// current kind of each category; rows whose category is unknown are skipped.
pub(crate) fn replay_daily(
    txs: &[Transaction],
    kinds: &HashMap<i64, CategoryKind>,
) -> Vec<(NaiveDate, Decimal)> {
    let mut out: Vec<(NaiveDate, Decimal)> = Vec::new();
    let mut running = Decimal::ZERO;
    for t in txs {
        let Some(kind) = kinds.get(&t.category_id) else {
            tracing::warn!(
                id = t.id,
                category_id = t.category_id,
                "transaction references unknown category, skipped"
            );
            continue;
        };
        running += signed_amount(*kind, t.amount);
        match out.last_mut() {
            Some((d, bal)) if *d == t.date => *bal = running,
            _ => out.push((t.date, running)),
        }
    }
    out
}

/// Sum of signed amounts for the asset over its whole history.
pub fn replay_total(conn: &Connection, asset_id: i64) -> Result<Decimal> {
    let kinds = transaction_categories::kinds(conn)?;
    let txs = transactions::list_for_asset(conn, asset_id)?;
    Ok(replay_daily(&txs, &kinds)
        .last()
        .map(|(_, b)| *b)
        .unwrap_or(Decimal::ZERO))
}

/// Rebuilds balance and checkpoints of one asset from its transactions.
///
/// Idempotent: a second run over an unchanged log yields the same balance
/// and the same checkpoint set.
pub fn reset_and_recalculate_balance(
    conn: &mut Connection,
    asset_id: i64,
) -> Result<RecalculationReport> {
    let tx = conn.transaction()?;
    let report = recalculate_in(&tx, asset_id)?;
    tx.commit()?;
    Ok(report)
}

/// Same as [`reset_and_recalculate_balance`] inside a caller-owned transaction.
pub fn recalculate_in(conn: &Connection, asset_id: i64) -> Result<RecalculationReport> {
    let asset = assets::get(conn, asset_id)?;
    let kinds = transaction_categories::kinds(conn)?;
    let txs = transactions::list_for_asset(conn, asset_id)?;

    asset_balances::delete_for_asset(conn, asset_id)?;
    let points = replay_daily(&txs, &kinds);
    for (date, balance) in &points {
        asset_balances::upsert(conn, asset_id, *date, *balance)?;
    }
    let balance = points.last().map(|(_, b)| *b).unwrap_or(Decimal::ZERO);
    assets::set_balance(conn, asset_id, balance)?;

    let report = RecalculationReport {
        asset_id,
        previous_balance: asset.balance,
        balance,
        snapshots: points.len(),
    };
    if report.drifted() {
        tracing::info!(
            asset_id,
            previous = %report.previous_balance,
            balance = %report.balance,
            "recalculation corrected drifted balance"
        );
    } else {
        tracing::debug!(asset_id, %balance, snapshots = report.snapshots, "balance recalculated");
    }
    Ok(report)
}

/// Recalculates every asset in one transaction.
pub fn recalculate_all(conn: &mut Connection) -> Result<Vec<RecalculationReport>> {
    let tx = conn.transaction()?;
    let mut reports = Vec::new();
    for asset in assets::list(&tx)? {
        reports.push(recalculate_in(&tx, asset.id)?);
    }
    tx.commit()?;
    Ok(reports)
}

/// Balance of the asset at the end of `date`.
///
/// Resolution order: the checkpoint on `date`, else the latest earlier
/// checkpoint, else a replay of the log from zero. Before any history the
/// balance is zero.
pub fn resolve_balance_as_of(conn: &Connection, asset_id: i64, date: NaiveDate) -> Result<Decimal> {
    assets::get(conn, asset_id)?;
    if let Some(snap) = asset_balances::latest_on_or_before(conn, asset_id, date)? {
        return Ok(snap.balance);
    }
    let kinds = transaction_categories::kinds(conn)?;
    let txs = transactions::list_for_asset_until(conn, asset_id, date)?;
    Ok(replay_daily(&txs, &kinds)
        .last()
        .map(|(_, b)| *b)
        .unwrap_or(Decimal::ZERO))
}

/// One balance per calendar day in `[from, to]`, forward-filled.
///
/// Follows the same resolution order as [`resolve_balance_as_of`] but
/// loads the checkpoints and the log once for the whole range.
pub fn daily_balance_series(
    conn: &Connection,
    asset_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyBalance>> {
    assets::get(conn, asset_id)?;
    if to < from {
        return Ok(Vec::new());
    }
    let snaps: Vec<(NaiveDate, Decimal)> = asset_balances::list_for_asset(conn, asset_id)?
        .into_iter()
        .filter(|s| s.date <= to)
        .map(|s| (s.date, s.balance))
        .collect();

    // replay only covers days before the first checkpoint
    let needs_replay = snaps.first().is_none_or(|(first, _)| *first > from);
    let replayed = if needs_replay {
        let kinds = transaction_categories::kinds(conn)?;
        let txs = transactions::list_for_asset_until(conn, asset_id, to)?;
        replay_daily(&txs, &kinds)
    } else {
        Vec::new()
    };

    let mut snap_cursor = Cursor::new(&snaps);
    let mut replay_cursor = Cursor::new(&replayed);
    let mut out = Vec::new();
    for day in days_inclusive(from, to) {
        let balance = match snap_cursor.advance_to(day) {
            Some(b) => b,
            None => replay_cursor.advance_to(day).unwrap_or(Decimal::ZERO),
        };
        out.push(DailyBalance { date: day, balance });
    }
    Ok(out)
}

/// Walks a date-sorted series, yielding the latest value on or before a day.
pub(crate) struct Cursor<'a> {
    points: &'a [(NaiveDate, Decimal)],
    next: usize,
    current: Option<Decimal>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(points: &'a [(NaiveDate, Decimal)]) -> Self {
        Cursor {
            points,
            next: 0,
            current: None,
        }
    }

    /// Days must be passed in non-decreasing order.
    pub(crate) fn advance_to(&mut self, day: NaiveDate) -> Option<Decimal> {
        while let Some((d, b)) = self.points.get(self.next) {
            if *d > day {
                break;
            }
            self.current = Some(*b);
            self.next += 1;
        }
        self.current
    }
}

/// Assets whose cached balance differs from a full replay of their log.
pub fn balance_drift(conn: &Connection) -> Result<Vec<BalanceDrift>> {
    let kinds = transaction_categories::kinds(conn)?;
    let mut out = Vec::new();
    for asset in assets::list(conn)? {
        let txs = transactions::list_for_asset(conn, asset.id)?;
        let replayed = replay_daily(&txs, &kinds)
            .last()
            .map(|(_, b)| *b)
            .unwrap_or(Decimal::ZERO);
        if replayed != asset.balance {
            out.push(BalanceDrift {
                asset_id: asset.id,
                asset_name: asset.name,
                cached: asset.balance,
                replayed,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: i64, category_id: i64, amount: i64, date: &str) -> Transaction {
        Transaction {
            id,
            asset_id: 1,
            category_id,
            amount: Decimal::from(amount),
            date: d(date),
            created_at: NaiveDateTime::default(),
            details: None,
            description: None,
            photos: Vec::new(),
            excluded_from_reports: false,
        }
    }

    #[test]
    fn replay_collapses_same_day_entries() {
        let kinds = HashMap::from([(1, CategoryKind::Income), (2, CategoryKind::Expense)]);
        let txs = vec![
            tx(1, 1, 100, "2024-05-01"),
            tx(2, 2, 30, "2024-05-01"),
            tx(3, 1, 5, "2024-05-03"),
        ];
        let points = replay_daily(&txs, &kinds);
        assert_eq!(
            points,
            vec![
                (d("2024-05-01"), Decimal::from(70)),
                (d("2024-05-03"), Decimal::from(75)),
            ]
        );
    }

    #[test]
    fn replay_skips_unknown_categories() {
        let kinds = HashMap::from([(1, CategoryKind::Income)]);
        let txs = vec![tx(1, 1, 10, "2024-05-01"), tx(2, 9, 99, "2024-05-02")];
        let points = replay_daily(&txs, &kinds);
        assert_eq!(points, vec![(d("2024-05-01"), Decimal::from(10))]);
    }

    #[test]
    fn cursor_forward_fills() {
        let pts = vec![(d("2024-05-02"), Decimal::from(5)), (d("2024-05-04"), Decimal::from(7))];
        let mut c = Cursor::new(&pts);
        assert_eq!(c.advance_to(d("2024-05-01")), None);
        assert_eq!(c.advance_to(d("2024-05-03")), Some(Decimal::from(5)));
        assert_eq!(c.advance_to(d("2024-05-06")), Some(Decimal::from(7)));
    }
}
