// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::models::{Asset, AssetCategory, Config, TransactionCategory};
use crate::store;
use rusqlite::Connection;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("-{}{:.2}", symbol, d.abs())
    } else {
        format!("{}{:.2}", symbol, d)
    }
}

/// Falls back to ISO format when the stored pattern does not render.
pub fn fmt_date(d: NaiveDate, cfg: &Config) -> String {
    let mut out = String::new();
    if write!(out, "{}", d.format(&cfg.date_format)).is_err() {
        return d.to_string();
    }
    out
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn asset_by_name(conn: &Connection, name: &str) -> Result<Asset> {
    store::assets::find_by_name(conn, name)?
        .with_context(|| format!("Asset '{}' not found", name.trim()))
}

pub fn category_by_name(conn: &Connection, name: &str) -> Result<TransactionCategory> {
    store::transaction_categories::find_by_name(conn, name)?
        .with_context(|| format!("Category '{}' not found", name.trim()))
}

pub fn asset_category_by_name(conn: &Connection, name: &str) -> Result<AssetCategory> {
    store::asset_categories::find_by_name(conn, name)?
        .with_context(|| format!("Asset category '{}' not found", name.trim()))
}

/// `--month` if given, else the month containing `today`.
pub fn month_or_current(raw: Option<&String>, today: NaiveDate) -> Result<NaiveDate> {
    match raw {
        Some(m) => parse_month(m),
        None => Ok(month_start(today)),
    }
}

pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Last calendar day of the month containing `d`.
pub fn month_end(d: NaiveDate) -> NaiveDate {
    let last = days_in_month(d.year(), d.month());
    d.with_day(last).unwrap_or(d)
}

/// First day of the month after the one containing `d`.
pub fn next_month_start(d: NaiveDate) -> NaiveDate {
    month_end(d) + Duration::days(1)
}

/// Same day-of-month one month earlier, clamped to that month's length.
pub fn same_day_previous_month(d: NaiveDate) -> NaiveDate {
    let (y, m) = if d.month() == 1 {
        (d.year() - 1, 12)
    } else {
        (d.year(), d.month() - 1)
    };
    let day = d.day().min(days_in_month(y, m));
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or(d)
}

pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}
