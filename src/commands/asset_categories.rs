// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::store;
use crate::utils::{asset_category_by_name, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let description = sub.get_one::<String>("description").map(|s| s.as_str());
            let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
            store::asset_categories::insert(&ctx.conn, name, description, icon)?;
            println!("Added asset category '{}'", name.trim());
        }
        Some(("list", sub)) => {
            let cats = store::asset_categories::list(&ctx.conn)?;
            if !maybe_print_json(sub.get_flag("json"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.description.unwrap_or_default()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Asset category", "Description"], data));
            }
        }
        Some(("rm", sub)) => {
            let cat = asset_category_by_name(&ctx.conn, sub.get_one::<String>("name").unwrap())?;
            store::asset_categories::delete(&ctx.conn, cat.id)?;
            println!("Removed asset category '{}' (its assets are now uncategorized)", cat.name);
        }
        _ => {}
    }
    Ok(())
}
