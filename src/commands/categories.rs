// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::CategoryKind;
use crate::store;
use crate::utils::{category_by_name, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: CategoryKind = sub.get_one::<String>("type").unwrap().parse()?;
            let description = sub.get_one::<String>("description").map(|s| s.as_str());
            let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
            store::transaction_categories::insert(&ctx.conn, name, kind, description, icon)?;
            println!("Added {} category '{}'", kind, name.trim());
        }
        Some(("list", sub)) => {
            let cats = store::transaction_categories::list(&ctx.conn)?;
            if !maybe_print_json(sub.get_flag("json"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.kind.to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Type"], data));
            }
        }
        Some(("rm", sub)) => {
            let cat = category_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            store::transaction_categories::delete(&ctx.conn, cat.id)?;
            println!("Removed category '{}'", cat.name);
        }
        Some(("set-type", sub)) => {
            let cat = category_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            let kind: CategoryKind = sub.get_one::<String>("type").unwrap().parse()?;
            store::transaction_categories::set_kind(&ctx.conn, cat.id, kind)?;
            println!(
                "Category '{}' is now {}; cached balances keep the old sign until `asset recalc --all`",
                cat.name, kind
            );
        }
        _ => {}
    }
    Ok(())
}
