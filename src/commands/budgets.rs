// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics;
use crate::budgets::{self, RenewalReport};
use crate::context::AppContext;
use crate::models::NewBudget;
use crate::store;
use crate::utils::{
    category_by_name, fmt_money, maybe_print_json, month_end, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::io::Write;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::budgets::delete(&ctx.conn, id)?;
            println!("Removed budget #{}", id);
        }
        Some(("renew", sub)) => renew(ctx, sub)?,
        Some(("status", sub)) => status(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let cat = category_by_name(&ctx.conn, sub.get_one::<String>("category").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let (start, end) = if let Some(month) = sub.get_one::<String>("month") {
        let start = parse_month(month)?;
        (start, month_end(start))
    } else {
        match (sub.get_one::<String>("start"), sub.get_one::<String>("end")) {
            (Some(s), Some(e)) => (parse_date(s)?, parse_date(e)?),
            _ => bail!("Pass --month YYYY-MM or both --start and --end"),
        }
    };
    let new = NewBudget {
        category_id: cat.id,
        amount,
        description: sub.get_one::<String>("description").map(|s| s.to_string()),
        start_date: Some(start),
        end_date: Some(end),
        is_repeating: sub.get_flag("repeat"),
    };
    let id = store::budgets::insert(&ctx.conn, &new, ctx.clock.now())?;
    let period = budgets::analyze_budget_period(start, end);
    println!(
        "Budget #{} for {}: {} from {} to {}{}",
        id,
        cat.name,
        amount,
        start,
        end,
        if new.is_repeating {
            format!(" (repeats, next {}..{})", period.next_start, period.next_end)
        } else {
            String::new()
        }
    );
    Ok(())
}

fn list(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let all = store::budgets::list(&ctx.conn)?;
    if maybe_print_json(sub.get_flag("json"), &all)? {
        return Ok(());
    }
    let names: HashMap<i64, String> = store::transaction_categories::list(&ctx.conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let today = ctx.today();
    let rows = all
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                names.get(&b.category_id).cloned().unwrap_or_default(),
                fmt_money(&b.amount, &ctx.config.currency_symbol),
                b.start_date.map(|d| d.to_string()).unwrap_or_default(),
                b.end_date.map(|d| d.to_string()).unwrap_or_default(),
                if b.is_repeating { "yes".into() } else { String::new() },
                if budgets::is_budget_expired(b, today) { "expired".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Category", "Amount", "Start", "End", "Repeats", "State"],
            rows
        )
    );
    Ok(())
}

fn renew(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let report = budgets::renew_expired_budgets(&ctx.conn, ctx.today(), ctx.clock.now())?;
    if maybe_print_json(sub.get_flag("json"), &report)? {
        return Ok(());
    }
    if report.renewed.is_empty() && report.errors.is_empty() {
        println!("No repeating budgets to renew");
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = report
        .renewed
        .iter()
        .map(|r| {
            vec![
                r.source_id.to_string(),
                format!("#{} {}..{}", r.new_id, r.start_date, r.end_date),
            ]
        })
        .collect();
    rows.extend(
        report
            .errors
            .iter()
            .map(|e| vec![e.budget_id.to_string(), format!("error: {}", e.message)]),
    );
    println!("{}", pretty_table(&["Budget", "Result"], rows));
    Ok(())
}

fn status(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let progress = analytics::budget_progress(&ctx.conn, ctx.today())?;
    if maybe_print_json(sub.get_flag("json"), &progress)? {
        return Ok(());
    }
    let sym = ctx.config.currency_symbol.clone();
    let rows = progress
        .iter()
        .map(|p| {
            vec![
                p.category_name.clone(),
                fmt_money(&p.amount, &sym),
                fmt_money(&p.spent, &sym),
                fmt_money(&p.remaining, &sym),
                format!("{:.2}%", p.percent_used),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Budget", "Spent", "Remaining", "Used"], rows)
    );
    Ok(())
}

/// Start-up renewal notices, one line per renewed or failed budget.
pub fn write_renewal_notices<W: Write>(report: &RenewalReport, out: &mut W) -> Result<()> {
    for r in &report.renewed {
        writeln!(
            out,
            "Renewed budget #{} as #{} ({} to {})",
            r.source_id, r.new_id, r.start_date, r.end_date
        )?;
    }
    for e in &report.errors {
        writeln!(out, "Could not renew budget #{}: {}", e.budget_id, e.message)?;
    }
    Ok(())
}
