// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::ledger;
use crate::store;
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let sym = ctx.config.currency_symbol.clone();
    let mut rows = Vec::new();

    // 1) Cached balances that no longer match a replay of the log
    let drifts = ledger::balance_drift(&ctx.conn)?;
    for d in &drifts {
        rows.push(vec![
            "balance_drift".into(),
            format!(
                "{} cached {} vs replayed {}",
                d.asset_name,
                fmt_money(&d.cached, &sym),
                fmt_money(&d.replayed, &sym)
            ),
        ]);
    }

    // 2) Repeating budgets that cannot be renewed
    for b in store::budgets::list(&ctx.conn)? {
        if b.is_repeating && (b.start_date.is_none() || b.end_date.is_none()) {
            rows.push(vec![
                "budget_without_period".into(),
                format!("budget #{}", b.id),
            ]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }

    if fix && !drifts.is_empty() {
        for d in &drifts {
            let report = ledger::reset_and_recalculate_balance(&mut ctx.conn, d.asset_id)?;
            println!(
                "Recalculated '{}': {} -> {}",
                d.asset_name,
                fmt_money(&report.previous_balance, &sym),
                fmt_money(&report.balance, &sym)
            );
        }
    }
    Ok(())
}
