// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::context::AppContext;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, month_or_current, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("net-worth", sub)) => net_worth(ctx, sub)?,
        Some(("performance", sub)) => performance(ctx, sub)?,
        Some(("allocation", sub)) => allocation(ctx, sub)?,
        Some(("summary", sub)) => summary(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn net_worth(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let today = ctx.today();
    let month = month_or_current(sub.get_one::<String>("month"), today)?;
    let points = analytics::net_worth_trend(&ctx.conn, month, today)?;
    if maybe_print_json(sub.get_flag("json"), &points)? {
        return Ok(());
    }
    let sym = &ctx.config.currency_symbol;
    let rows = points
        .iter()
        .map(|p| {
            let mut date = fmt_date(p.date, &ctx.config);
            if p.is_reference {
                date.push_str(" (last month)");
            }
            vec![
                date,
                fmt_money(&p.net_worth, sym),
                fmt_money(&p.income, sym),
                fmt_money(&p.expense, sym),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Net worth", "Income", "Expense"], rows)
    );
    Ok(())
}

fn performance(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let today = ctx.today();
    let month = month_or_current(sub.get_one::<String>("month"), today)?;
    let groups = analytics::asset_performance(&ctx.conn, month, today)?;
    if maybe_print_json(sub.get_flag("json"), &groups)? {
        return Ok(());
    }
    let sym = &ctx.config.currency_symbol;
    let mut rows = Vec::new();
    for g in &groups {
        for a in &g.assets {
            rows.push(vec![
                g.name.clone(),
                a.name.clone(),
                fmt_money(&a.balance, sym),
                format!("{:+.2}%", a.performance_pct),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Category", "Asset", "Balance", "Month to date"], rows)
    );
    Ok(())
}

fn allocation(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub.get_one::<String>("month"), ctx.today())?;
    let shares = analytics::category_expense_allocation(&ctx.conn, month)?;
    if maybe_print_json(sub.get_flag("json"), &shares)? {
        return Ok(());
    }
    let rows = shares
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                fmt_money(&s.amount, &ctx.config.currency_symbol),
                format!("{:.2}%", s.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    Ok(())
}

fn summary(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub.get_one::<String>("month"), ctx.today())?;
    let s = analytics::monthly_summary(&ctx.conn, month)?;
    if maybe_print_json(sub.get_flag("json"), &s)? {
        return Ok(());
    }
    let sym = &ctx.config.currency_symbol;
    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expense", "Net"],
            vec![vec![
                s.month.format("%Y-%m").to_string(),
                fmt_money(&s.income, sym),
                fmt_money(&s.expense, sym),
                fmt_money(&s.net, sym),
            ]],
        )
    );
    Ok(())
}
