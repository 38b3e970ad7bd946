// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), &ctx.config)? {
                let c = &ctx.config;
                let rows = vec![
                    vec!["setup_completed".into(), c.setup_completed.to_string()],
                    vec!["date_format".into(), c.date_format.clone()],
                    vec!["currency_symbol".into(), c.currency_symbol.clone()],
                    vec!["week_start".into(), c.week_start.clone()],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            ctx.config = store::config::set(&ctx.conn, key, value)?;
            println!("Set {} = {}", key.trim(), value.trim());
        }
        _ => {}
    }
    Ok(())
}
