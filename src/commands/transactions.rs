// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::ledger;
use crate::models::{NewTransaction, TransactionPatch};
use crate::store::{self, transactions::TransactionFilter};
use crate::utils::{
    asset_by_name, category_by_name, fmt_date, maybe_print_json, month_end, parse_date,
    parse_decimal, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = ledger::delete_transaction(&mut ctx.conn, id)?;
            println!("Removed transaction #{} ({})", removed.id, removed.amount);
        }
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let asset = asset_by_name(&ctx.conn, sub.get_one::<String>("asset").unwrap())?;
    let category = category_by_name(&ctx.conn, sub.get_one::<String>("category").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;

    let mut new = NewTransaction::new(asset.id, category.id, amount, date);
    new.description = sub.get_one::<String>("description").map(|s| s.to_string());
    new.details = sub.get_one::<String>("details").map(|s| s.to_string());
    new.photos = sub
        .get_many::<String>("photo")
        .map(|v| v.map(|s| s.to_string()).collect())
        .unwrap_or_default();
    new.excluded_from_reports = sub.get_flag("exclude");

    let id = ledger::add_transaction(&mut ctx.conn, &new)?;
    println!(
        "Recorded #{}: {} {} on {} ({})",
        id,
        category.kind,
        amount,
        fmt_date(date, &ctx.config),
        asset.name
    );
    Ok(())
}

fn edit(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut patch = TransactionPatch::default();
    if let Some(a) = sub.get_one::<String>("asset") {
        patch.asset_id = Some(asset_by_name(&ctx.conn, a)?.id);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        patch.category_id = Some(category_by_name(&ctx.conn, c)?.id);
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(a)?);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(d)?);
    }
    if let Some(d) = sub.get_one::<String>("description") {
        patch.description = Some(Some(d.to_string()).filter(|s| !s.is_empty()));
    }
    if let Some(d) = sub.get_one::<String>("details") {
        patch.details = Some(Some(d.to_string()).filter(|s| !s.is_empty()));
    }
    patch.excluded_from_reports = sub.get_one::<bool>("exclude").copied();

    let updated = ledger::edit_transaction(&mut ctx.conn, id, &patch)?;
    println!("Updated transaction #{} ({} on {})", updated.id, updated.amount, updated.date);
    Ok(())
}

fn list(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(&ctx.conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.asset.clone(),
                r.category.clone(),
                r.signed_amount.clone(),
                r.description.clone(),
                if r.excluded_from_reports { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Asset", "Category", "Amount", "Description", "Excluded"],
            rows,
        )
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub asset: String,
    pub category: String,
    pub category_type: String,
    pub amount: String,
    pub signed_amount: String,
    pub description: String,
    pub excluded_from_reports: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut filter = TransactionFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        let start = parse_month(month)?;
        filter.from = Some(start);
        filter.to = Some(month_end(start));
    }
    if let Some(a) = sub.get_one::<String>("asset") {
        filter.asset_id = Some(asset_by_name(conn, a)?.id);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        filter.category_id = Some(category_by_name(conn, c)?.id);
    }
    filter.limit = sub.get_one::<usize>("limit").copied();

    let assets: HashMap<i64, String> = store::assets::list(conn)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let categories: HashMap<i64, _> = store::transaction_categories::list(conn)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut data = Vec::new();
    for t in store::transactions::query(conn, &filter)? {
        let cat = categories.get(&t.category_id);
        let signed = cat
            .map(|c| crate::models::signed_amount(c.kind, t.amount))
            .unwrap_or(t.amount);
        data.push(TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            asset: assets.get(&t.asset_id).cloned().unwrap_or_default(),
            category: cat.map(|c| c.name.clone()).unwrap_or_default(),
            category_type: cat.map(|c| c.kind.to_string()).unwrap_or_default(),
            amount: t.amount.to_string(),
            signed_amount: signed.to_string(),
            description: t.description.unwrap_or_default(),
            excluded_from_reports: t.excluded_from_reports,
        });
    }
    Ok(data)
}
