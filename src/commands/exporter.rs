// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::store;
use anyhow::Result;
use serde_json::json;
use std::collections::HashMap;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ctx, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    let assets: HashMap<i64, String> = store::assets::list(&ctx.conn)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let categories: HashMap<i64, (String, String)> =
        store::transaction_categories::list(&ctx.conn)?
            .into_iter()
            .map(|c| (c.id, (c.name, c.kind.to_string())))
            .collect();
    let rows = store::transactions::list_all(&ctx.conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "asset",
                "category",
                "type",
                "amount",
                "description",
                "details",
                "excluded_from_reports",
            ])?;
            for t in rows {
                let (cat, kind) = categories.get(&t.category_id).cloned().unwrap_or_default();
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    assets.get(&t.asset_id).cloned().unwrap_or_default(),
                    cat,
                    kind,
                    t.amount.to_string(),
                    t.description.unwrap_or_default(),
                    t.details.unwrap_or_default(),
                    t.excluded_from_reports.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in rows {
                let (cat, kind) = categories.get(&t.category_id).cloned().unwrap_or_default();
                items.push(json!({
                    "id": t.id, "date": t.date, "asset": assets.get(&t.asset_id),
                    "category": cat, "type": kind, "amount": t.amount.to_string(),
                    "description": t.description, "details": t.details,
                    "photos": t.photos, "excluded_from_reports": t.excluded_from_reports
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
