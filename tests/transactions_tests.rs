// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::context::{AppContext, Clock};
use assetbook::{cli, commands, commands::transactions, store};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn run(ctx: &mut AppContext, args: &[&str]) {
    let mut argv = vec!["assetbook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    assert!(commands::dispatch(ctx, &matches).unwrap());
}

fn setup() -> AppContext {
    let now = NaiveDate::from_ymd_opt(2025, 1, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut ctx = AppContext::in_memory(Clock::Fixed(now)).unwrap();
    run(&mut ctx, &["asset", "add", "--name", "Wallet"]);
    run(&mut ctx, &["category", "add", "--name", "Pay", "--type", "income"]);
    run(&mut ctx, &["category", "add", "--name", "Food", "--type", "expense"]);
    run(&mut ctx, &["tx", "add", "--asset", "Wallet", "--category", "Pay", "--amount", "100", "--date", "2024-12-31"]);
    for day in 1..=3 {
        let date = format!("2025-01-0{}", day);
        run(&mut ctx, &["tx", "add", "--asset", "Wallet", "--category", "Food", "--amount", "10", "--date", &date]);
    }
    ctx
}

fn list_rows(ctx: &AppContext, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["assetbook", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(&ctx.conn, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

fn wallet_balance(ctx: &AppContext) -> Decimal {
    store::assets::find_by_name(&ctx.conn, "Wallet")
        .unwrap()
        .unwrap()
        .balance
}

#[test]
fn list_limit_respected() {
    let ctx = setup();
    let rows = list_rows(&ctx, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].signed_amount, "-10");
}

#[test]
fn list_filters_by_month_and_category() {
    let ctx = setup();
    assert_eq!(list_rows(&ctx, &["--month", "2025-01"]).len(), 3);
    let pay = list_rows(&ctx, &["--category", "Pay"]);
    assert_eq!(pay.len(), 1);
    assert_eq!(pay[0].category_type, "income");
    assert_eq!(pay[0].asset, "Wallet");
}

#[test]
fn commands_keep_balance_in_step_with_log() {
    let mut ctx = setup();
    assert_eq!(wallet_balance(&ctx), Decimal::from(70));

    let newest = list_rows(&ctx, &["--limit", "1"]).remove(0);
    let id = newest.id.to_string();
    run(&mut ctx, &["tx", "edit", "--id", &id, "--amount", "25"]);
    assert_eq!(wallet_balance(&ctx), Decimal::from(55));

    run(&mut ctx, &["tx", "rm", "--id", &id]);
    assert_eq!(wallet_balance(&ctx), Decimal::from(80));
    assert_eq!(list_rows(&ctx, &[]).len(), 3);
}

#[test]
fn type_change_then_recalc_resigns_history() {
    let mut ctx = setup();
    run(&mut ctx, &["category", "set-type", "--name", "Food", "--type", "income"]);
    // cached balance keeps the old sign until a recalculation
    assert_eq!(wallet_balance(&ctx), Decimal::from(70));
    run(&mut ctx, &["asset", "recalc", "--all"]);
    assert_eq!(wallet_balance(&ctx), Decimal::from(130));
}

#[test]
fn doctor_fix_repairs_drift() {
    let mut ctx = setup();
    run(&mut ctx, &["asset", "set-balance", "--name", "Wallet", "--amount", "5"]);
    assert_eq!(assetbook::ledger::balance_drift(&ctx.conn).unwrap().len(), 1);
    run(&mut ctx, &["doctor", "--fix"]);
    assert!(assetbook::ledger::balance_drift(&ctx.conn).unwrap().is_empty());
    assert_eq!(wallet_balance(&ctx), Decimal::from(70));
}

#[test]
fn config_set_updates_context() {
    let mut ctx = setup();
    run(&mut ctx, &["config", "set", "currency_symbol", "€"]);
    assert_eq!(ctx.config.currency_symbol, "€");
    assert_eq!(store::config::load(&ctx.conn).unwrap().currency_symbol, "€");
}

#[test]
fn budget_add_by_month_covers_whole_month() {
    let mut ctx = setup();
    run(&mut ctx, &["budget", "add", "--category", "Food", "--amount", "40", "--month", "2024-02", "--repeat"]);
    let budgets = store::budgets::list(&ctx.conn).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].end_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    assert!(budgets[0].is_repeating);
}
