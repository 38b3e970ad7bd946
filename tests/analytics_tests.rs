// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::analytics::{self, UNCATEGORIZED_ID};
use assetbook::ledger;
use assetbook::models::{CategoryKind, NewTransaction};
use assetbook::store::{asset_categories, assets, transaction_categories};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct Ids {
    checking: i64,
    cash: i64,
    food: i64,
    rent: i64,
}

fn add(conn: &mut Connection, asset: i64, cat: i64, amount: &str, day: &str, excluded: bool) {
    let mut t = NewTransaction::new(asset, cat, dec(amount), d(day));
    t.excluded_from_reports = excluded;
    ledger::add_transaction(conn, &t).unwrap();
}

fn setup() -> (Connection, Ids) {
    let mut conn = assetbook::db::open_in_memory().unwrap();
    let bank = asset_categories::insert(&conn, "Bank", None, None).unwrap();
    let checking = assets::insert(&conn, "Checking", Some(bank), None).unwrap();
    let cash = assets::insert(&conn, "Cash", None, None).unwrap();
    let salary =
        transaction_categories::insert(&conn, "Salary", CategoryKind::Income, None, None).unwrap();
    let food =
        transaction_categories::insert(&conn, "Food", CategoryKind::Expense, None, None).unwrap();
    let rent =
        transaction_categories::insert(&conn, "Rent", CategoryKind::Expense, None, None).unwrap();

    add(&mut conn, checking, salary, "1000", "2025-05-20", false);
    add(&mut conn, cash, salary, "50", "2025-06-01", false);
    add(&mut conn, checking, food, "100", "2025-06-02", false);
    add(&mut conn, checking, food, "500", "2025-06-02", true);
    add(&mut conn, checking, rent, "300", "2025-06-05", false);
    (
        conn,
        Ids {
            checking,
            cash,
            food,
            rent,
        },
    )
}

#[test]
fn empty_store_yields_zeroed_output() {
    let conn = assetbook::db::open_in_memory().unwrap();
    let trend = analytics::net_worth_trend(&conn, d("2025-02-01"), d("2025-02-10")).unwrap();
    assert_eq!(trend.len(), 29);
    assert!(trend.iter().all(|p| p.net_worth.is_zero()));
    assert!(analytics::asset_performance(&conn, d("2025-02-01"), d("2025-02-10"))
        .unwrap()
        .is_empty());
    assert!(analytics::category_expense_allocation(&conn, d("2025-02-01"))
        .unwrap()
        .is_empty());
    let s = analytics::monthly_summary(&conn, d("2025-02-01")).unwrap();
    assert!(s.income.is_zero() && s.expense.is_zero() && s.net.is_zero());
}

#[test]
fn net_worth_trend_skips_excluded_and_leads_with_reference_day() {
    let (conn, _) = setup();
    let trend = analytics::net_worth_trend(&conn, d("2025-06-01"), d("2025-06-03")).unwrap();
    assert_eq!(trend.len(), 31);

    let reference = &trend[0];
    assert!(reference.is_reference);
    assert_eq!(reference.date, d("2025-05-03"));
    assert!(reference.net_worth.is_zero());

    let day = |s: &str| trend.iter().find(|p| !p.is_reference && p.date == d(s)).unwrap();
    assert_eq!(day("2025-06-01").net_worth, dec("1050"));
    assert_eq!(day("2025-06-01").income, dec("50"));
    assert_eq!(day("2025-06-02").net_worth, dec("950"));
    assert_eq!(day("2025-06-02").expense, dec("100"));
    assert_eq!(day("2025-06-05").net_worth, dec("650"));
    assert_eq!(day("2025-06-30").net_worth, dec("650"));
}

#[test]
fn reference_day_uses_month_end_for_past_months() {
    let (conn, _) = setup();
    let trend = analytics::net_worth_trend(&conn, d("2025-05-01"), d("2025-06-15")).unwrap();
    assert_eq!(trend[0].date, d("2025-04-30"));
    assert_eq!(trend.last().unwrap().net_worth, dec("1000"));
}

#[test]
fn performance_groups_by_asset_category() {
    let (conn, ids) = setup();
    let groups = analytics::asset_performance(&conn, d("2025-06-01"), d("2025-06-03")).unwrap();
    assert_eq!(groups.len(), 2);

    let bank = &groups[0];
    assert_eq!(bank.name, "Bank");
    assert_eq!(bank.assets.len(), 1);
    let checking = &bank.assets[0];
    assert_eq!(checking.asset_id, ids.checking);
    assert_eq!(checking.series.len(), 3);
    assert_eq!(checking.balance, dec("400"));
    assert_eq!(checking.performance_pct, dec("-60"));
    assert_eq!(bank.total_balance, dec("400"));

    let other = &groups[1];
    assert_eq!(other.category_id, UNCATEGORIZED_ID);
    assert_eq!(other.assets[0].asset_id, ids.cash);
    assert!(other.assets[0].performance_pct.is_zero());
}

#[test]
fn performance_pct_anchors_on_first_non_zero() {
    assert_eq!(
        analytics::performance_pct(&[dec("0"), dec("200"), dec("250")]),
        dec("25")
    );
    assert!(analytics::performance_pct(&[dec("0"), dec("0")]).is_zero());
    assert!(analytics::performance_pct(&[]).is_zero());
}

#[test]
fn allocation_ranks_expense_categories() {
    let (conn, ids) = setup();
    let shares = analytics::category_expense_allocation(&conn, d("2025-06-01")).unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category_id, ids.rent);
    assert_eq!(shares[0].amount, dec("300"));
    assert_eq!(shares[0].percentage, dec("75"));
    assert_eq!(shares[1].category_id, ids.food);
    assert_eq!(shares[1].percentage, dec("25"));
}

#[test]
fn allocation_keeps_top_five() {
    let mut conn = assetbook::db::open_in_memory().unwrap();
    let asset = assets::insert(&conn, "Card", None, None).unwrap();
    let mut cats = Vec::new();
    for (i, amount) in ["10", "20", "30", "30", "5", "1", "40"].iter().enumerate() {
        let c = transaction_categories::insert(
            &conn,
            &format!("C{}", i),
            CategoryKind::Expense,
            None,
            None,
        )
        .unwrap();
        add(&mut conn, asset, c, amount, "2025-03-10", false);
        cats.push(c);
    }
    let shares = analytics::category_expense_allocation(&conn, d("2025-03-01")).unwrap();
    assert_eq!(shares.len(), analytics::ALLOCATION_TOP_N);
    let order: Vec<i64> = shares.iter().map(|s| s.category_id).collect();
    assert_eq!(order, vec![cats[6], cats[2], cats[3], cats[1], cats[0]]);
}

#[test]
fn monthly_summary_totals_reportable_flows() {
    let (conn, _) = setup();
    let s = analytics::monthly_summary(&conn, d("2025-06-01")).unwrap();
    assert_eq!(s.income, dec("50"));
    assert_eq!(s.expense, dec("400"));
    assert_eq!(s.net, dec("-350"));
}
