// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::ledger;
use crate::store;
use crate::utils::{
    asset_by_name, asset_category_by_name, fmt_date, fmt_money, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Result, bail};
use std::collections::HashMap;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("rm", sub)) => {
            let asset = asset_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            store::assets::delete(&mut ctx.conn, asset.id)?;
            println!("Removed asset '{}' and its transactions", asset.name);
        }
        Some(("set-balance", sub)) => {
            let asset = asset_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            store::assets::set_balance(&ctx.conn, asset.id, amount)?;
            println!(
                "Balance of '{}' set to {} (run `asset recalc` to rebuild from transactions)",
                asset.name,
                fmt_money(&amount, &ctx.config.currency_symbol)
            );
        }
        Some(("set-category", sub)) => {
            let asset = asset_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            let raw = sub.get_one::<String>("category").unwrap().trim();
            let category_id = if raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(asset_category_by_name(&ctx.conn, raw)?.id)
            };
            store::assets::set_category(&ctx.conn, asset.id, category_id)?;
            println!("Updated category of '{}'", asset.name);
        }
        Some(("recalc", sub)) => recalc(ctx, sub)?,
        Some(("series", sub)) => series(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(asset_category_by_name(&ctx.conn, c)?.id),
        None => None,
    };
    let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
    let id = store::assets::insert(&ctx.conn, name, category_id, icon)?;
    println!("Added asset '{}' (#{})", name.trim(), id);
    Ok(())
}

fn list(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let assets = store::assets::list(&ctx.conn)?;
    if maybe_print_json(sub.get_flag("json"), &assets)? {
        return Ok(());
    }
    let categories: HashMap<i64, String> = store::asset_categories::list(&ctx.conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let rows = assets
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.category_id
                    .and_then(|id| categories.get(&id).cloned())
                    .unwrap_or_default(),
                fmt_money(&a.balance, &ctx.config.currency_symbol),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Asset", "Category", "Balance"], rows));
    Ok(())
}

fn recalc(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let reports = if let Some(name) = sub.get_one::<String>("name") {
        let asset = asset_by_name(&ctx.conn, name)?;
        vec![ledger::reset_and_recalculate_balance(&mut ctx.conn, asset.id)?]
    } else if sub.get_flag("all") {
        ledger::recalculate_all(&mut ctx.conn)?
    } else {
        bail!("Pass --name <asset> or --all");
    };
    if maybe_print_json(sub.get_flag("json"), &reports)? {
        return Ok(());
    }
    let sym = ctx.config.currency_symbol.clone();
    let rows = reports
        .iter()
        .map(|r| {
            vec![
                r.asset_id.to_string(),
                fmt_money(&r.previous_balance, &sym),
                fmt_money(&r.balance, &sym),
                r.snapshots.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Asset", "Previous", "Recalculated", "Snapshots"], rows)
    );
    Ok(())
}

fn series(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let asset = asset_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    let points = ledger::daily_balance_series(&ctx.conn, asset.id, from, to)?;
    if maybe_print_json(sub.get_flag("json"), &points)? {
        return Ok(());
    }
    let rows = points
        .iter()
        .map(|p| {
            vec![
                fmt_date(p.date, &ctx.config),
                fmt_money(&p.balance, &ctx.config.currency_symbol),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Balance"], rows));
    Ok(())
}
