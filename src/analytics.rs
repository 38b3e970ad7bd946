// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only series derived from the transaction log and the balance
//! checkpoints. Nothing here writes; empty stores yield zeroed output.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::ledger::{Cursor, DailyBalance, daily_balance_series, replay_daily};
use crate::models::{Budget, CategoryKind, Transaction};
use crate::store::{asset_categories, assets, budgets, transaction_categories, transactions};
use crate::utils::{days_inclusive, month_end, month_start, same_day_previous_month};

pub const UNCATEGORIZED_ID: i64 = 0;
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const ALLOCATION_TOP_N: usize = 5;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub net_worth: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    /// The comparison day from the previous month, placed first.
    pub is_reference: bool,
}

/// Daily net worth for `month`, preceded by a reference day one month
/// before the last day shown.
///
/// Net worth is the sum over assets of a replay of non-excluded
/// transactions up to each day; income and expense are that day's totals
/// only. Each asset's log is replayed once and walked with a cursor.
pub fn net_worth_trend(
    conn: &Connection,
    month: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<NetWorthPoint>> {
    let first = month_start(month);
    let last = month_end(month);
    let anchor = if (first..=last).contains(&today) { today } else { last };
    let reference = same_day_previous_month(anchor);

    let kinds = transaction_categories::kinds(conn)?;
    let log: Vec<Transaction> = transactions::until(conn, last)?
        .into_iter()
        .filter(|t| !t.excluded_from_reports)
        .collect();

    let mut per_asset: HashMap<i64, Vec<Transaction>> = HashMap::new();
    for t in &log {
        per_asset.entry(t.asset_id).or_default().push(t.clone());
    }
    let replays: Vec<Vec<(NaiveDate, Decimal)>> = assets::list(conn)?
        .iter()
        .map(|a| {
            per_asset
                .get(&a.id)
                .map(|txs| replay_daily(txs, &kinds))
                .unwrap_or_default()
        })
        .collect();

    let mut flows: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();
    for t in &log {
        let Some(kind) = kinds.get(&t.category_id) else {
            continue;
        };
        let entry = flows.entry(t.date).or_insert((Decimal::ZERO, Decimal::ZERO));
        match kind {
            CategoryKind::Income => entry.0 += t.amount,
            CategoryKind::Expense => entry.1 += t.amount,
        }
    }

    let mut out = Vec::new();
    let point = |day: NaiveDate, net_worth: Decimal, is_reference: bool| {
        let (income, expense) = flows
            .get(&day)
            .copied()
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));
        NetWorthPoint {
            date: day,
            net_worth,
            income,
            expense,
            is_reference,
        }
    };

    // reference day always precedes the month, so one pass of cursors works
    let mut cursors: Vec<Cursor<'_>> = replays.iter().map(|r| Cursor::new(r)).collect();
    let nw = net_worth_on(&mut cursors, reference);
    out.push(point(reference, nw, true));
    for day in days_inclusive(first, last) {
        let nw = net_worth_on(&mut cursors, day);
        out.push(point(day, nw, false));
    }
    Ok(out)
}

fn net_worth_on(cursors: &mut [Cursor<'_>], day: NaiveDate) -> Decimal {
    cursors
        .iter_mut()
        .map(|c| c.advance_to(day).unwrap_or(Decimal::ZERO))
        .sum()
}

/// Percent change across a balance series.
///
/// The anchor is the first non-zero balance; when there is none, or it
/// equals the latest balance, the oldest balance is used instead. A zero
/// anchor yields zero.
pub fn performance_pct(series: &[Decimal]) -> Decimal {
    let (Some(oldest), Some(latest)) = (series.first(), series.last()) else {
        return Decimal::ZERO;
    };
    let first_non_zero = series.iter().find(|b| !b.is_zero());
    if let Some(anchor) = first_non_zero {
        if anchor != latest {
            return percent_change(*latest, *anchor);
        }
    }
    if oldest.is_zero() {
        return Decimal::ZERO;
    }
    percent_change(*latest, *oldest)
}

/// `part` as a percentage of `whole`, zero when `whole` is zero or the
/// result does not fit in a `Decimal`.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(HUNDRED))
        .map(|p| p.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

fn percent_change(latest: Decimal, anchor: Decimal) -> Decimal {
    latest
        .checked_sub(anchor)
        .map(|delta| percent_of(delta, anchor.abs()))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPerformance {
    pub asset_id: i64,
    pub name: String,
    pub balance: Decimal,
    pub performance_pct: Decimal,
    pub series: Vec<DailyBalance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category_id: i64,
    pub name: String,
    pub total_balance: Decimal,
    pub assets: Vec<AssetPerformance>,
}

/// Month-to-date performance of every asset, grouped by asset category.
///
/// Assets without a category land in a synthetic `Uncategorized` group
/// (id 0), listed last.
pub fn asset_performance(
    conn: &Connection,
    month: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<CategoryPerformance>> {
    let from = month_start(month);
    let last = month_end(month);
    let to = if (from..=last).contains(&today) { today } else { last };

    let mut groups: Vec<CategoryPerformance> = asset_categories::list(conn)?
        .into_iter()
        .map(|c| CategoryPerformance {
            category_id: c.id,
            name: c.name,
            total_balance: Decimal::ZERO,
            assets: Vec::new(),
        })
        .collect();
    let mut uncategorized = CategoryPerformance {
        category_id: UNCATEGORIZED_ID,
        name: UNCATEGORIZED_NAME.to_string(),
        total_balance: Decimal::ZERO,
        assets: Vec::new(),
    };

    for asset in assets::list(conn)? {
        let series = daily_balance_series(conn, asset.id, from, to)?;
        let values: Vec<Decimal> = series.iter().map(|p| p.balance).collect();
        let perf = AssetPerformance {
            asset_id: asset.id,
            name: asset.name,
            balance: values.last().copied().unwrap_or(Decimal::ZERO),
            performance_pct: performance_pct(&values),
            series,
        };
        let group = match asset.category_id {
            Some(cid) => groups.iter_mut().find(|g| g.category_id == cid),
            None => None,
        };
        let group = group.unwrap_or(&mut uncategorized);
        group.total_balance += perf.balance;
        group.assets.push(perf);
    }
    if !uncategorized.assets.is_empty() {
        groups.push(uncategorized);
    }
    Ok(groups)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Top expense categories of `month` with their share of total expense.
///
/// Ranked by amount descending; equal amounts keep category id order.
pub fn category_expense_allocation(conn: &Connection, month: NaiveDate) -> Result<Vec<CategoryShare>> {
    let from = month_start(month);
    let to = month_end(month);
    let expense_categories: Vec<_> = transaction_categories::list(conn)?
        .into_iter()
        .filter(|c| c.kind == CategoryKind::Expense)
        .collect();

    let mut totals: HashMap<i64, Decimal> = HashMap::new();
    for t in transactions::between(conn, from, to)? {
        if !t.excluded_from_reports {
            *totals.entry(t.category_id).or_insert(Decimal::ZERO) += t.amount;
        }
    }

    let shares: Vec<CategoryShare> = expense_categories
        .into_iter()
        .filter_map(|c| {
            let amount = totals.get(&c.id).copied().unwrap_or(Decimal::ZERO);
            (!amount.is_zero()).then(|| CategoryShare {
                category_id: c.id,
                name: c.name,
                amount,
                percentage: Decimal::ZERO,
            })
        })
        .collect();
    Ok(rank_shares(shares))
}

fn rank_shares(mut shares: Vec<CategoryShare>) -> Vec<CategoryShare> {
    let total: Decimal = shares.iter().map(|s| s.amount).sum();
    // stable sort keeps category order for ties
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
        .into_iter()
        .take(ALLOCATION_TOP_N)
        .map(|mut s| {
            s.percentage = percent_of(s.amount, total);
            s
        })
        .collect()
}

/// Sum of the budget category's amounts inside its period, inclusive.
///
/// The category has a fixed kind, so amounts are summed without signs.
pub fn budget_spent(conn: &Connection, budget: &Budget) -> Result<Decimal> {
    match (budget.start_date, budget.end_date) {
        (Some(start), Some(end)) => {
            transactions::sum_for_category_between(conn, budget.category_id, start, end)
        }
        _ => Ok(Decimal::ZERO),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
}

/// Spending against every budget active on `today`.
pub fn budget_progress(conn: &Connection, today: NaiveDate) -> Result<Vec<BudgetProgress>> {
    let names: HashMap<i64, String> = transaction_categories::list(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let mut out = Vec::new();
    for b in budgets::active_on(conn, today)? {
        let spent = budget_spent(conn, &b)?;
        let percent_used = percent_of(spent, b.amount);
        out.push(BudgetProgress {
            budget_id: b.id,
            category_id: b.category_id,
            category_name: names.get(&b.category_id).cloned().unwrap_or_default(),
            start_date: b.start_date,
            end_date: b.end_date,
            amount: b.amount,
            spent,
            remaining: b.amount - spent,
            percent_used,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

pub fn monthly_summary(conn: &Connection, month: NaiveDate) -> Result<MonthlySummary> {
    let from = month_start(month);
    let kinds = transaction_categories::kinds(conn)?;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions::between(conn, from, month_end(month))? {
        if t.excluded_from_reports {
            continue;
        }
        match kinds.get(&t.category_id) {
            Some(CategoryKind::Income) => income += t.amount,
            Some(CategoryKind::Expense) => expense += t.amount,
            None => {}
        }
    }
    Ok(MonthlySummary {
        month: from,
        income,
        expense,
        net: income - expense,
    })
}
