// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::db;
use assetbook::ledger::{self, DailyBalance};
use assetbook::models::{CategoryKind, NewTransaction, TransactionPatch};
use assetbook::store::{asset_balances, assets, transaction_categories, transactions};
use assetbook::LedgerError;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

struct Fixture {
    conn: Connection,
    asset: i64,
    salary: i64,
    food: i64,
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    let asset = assets::insert(&conn, "Checking", None, None).unwrap();
    let salary =
        transaction_categories::insert(&conn, "Salary", CategoryKind::Income, None, None).unwrap();
    let food =
        transaction_categories::insert(&conn, "Food", CategoryKind::Expense, None, None).unwrap();
    Fixture {
        conn,
        asset,
        salary,
        food,
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn snapshot(conn: &Connection, asset: i64, date: NaiveDate) -> Option<Decimal> {
    asset_balances::on_date(conn, asset, date)
        .unwrap()
        .map(|s| s.balance)
}

#[test]
fn backdated_entry_shifts_later_snapshots() {
    let mut f = setup();
    let day0 = d(2025, 3, 1);
    let day1 = d(2025, 3, 2);

    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("100"), day1))
        .unwrap();
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("100"));
    assert_eq!(snapshot(&f.conn, f.asset, day1), Some(dec("100")));

    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.food, dec("30"), day1))
        .unwrap();
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("70"));
    assert_eq!(snapshot(&f.conn, f.asset, day1), Some(dec("70")));

    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("50"), day0))
        .unwrap();
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("120"));
    assert_eq!(snapshot(&f.conn, f.asset, day0), Some(dec("50")));
    assert_eq!(snapshot(&f.conn, f.asset, day1), Some(dec("120")));
}

#[test]
fn recalculation_matches_signed_sum_and_is_idempotent() {
    let mut f = setup();
    for (amount, cat, day) in [
        (dec("1000"), f.salary, 1),
        (dec("42.50"), f.food, 3),
        (dec("7.25"), f.food, 3),
        (dec("200"), f.salary, 10),
    ] {
        ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, cat, amount, d(2025, 4, day)))
            .unwrap();
    }
    // corrupt the cache
    assets::set_balance(&f.conn, f.asset, dec("-1")).unwrap();

    let first = ledger::reset_and_recalculate_balance(&mut f.conn, f.asset).unwrap();
    assert_eq!(first.balance, dec("1150.25"));
    assert_eq!(first.previous_balance, dec("-1"));
    assert!(first.drifted());
    assert_eq!(first.snapshots, 3);
    let snaps_after_first = asset_balances::list_for_asset(&f.conn, f.asset).unwrap();

    let second = ledger::reset_and_recalculate_balance(&mut f.conn, f.asset).unwrap();
    assert_eq!(second.balance, first.balance);
    assert!(!second.drifted());
    let snaps_after_second = asset_balances::list_for_asset(&f.conn, f.asset).unwrap();
    let pairs = |v: &[assetbook::models::AssetBalance]| {
        v.iter().map(|s| (s.date, s.balance)).collect::<Vec<_>>()
    };
    assert_eq!(pairs(&snaps_after_first), pairs(&snaps_after_second));
    assert_eq!(
        pairs(&snaps_after_second),
        vec![
            (d(2025, 4, 1), dec("1000")),
            (d(2025, 4, 3), dec("950.25")),
            (d(2025, 4, 10), dec("1150.25")),
        ]
    );
}

#[test]
fn incremental_snapshots_agree_with_replay() {
    let mut f = setup();
    // out of order on purpose
    for (amount, cat, day) in [
        (dec("10"), f.food, 20),
        (dec("500"), f.salary, 5),
        (dec("60"), f.food, 12),
        (dec("15"), f.salary, 1),
    ] {
        ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, cat, amount, d(2025, 5, day)))
            .unwrap();
    }
    let incremental: Vec<_> = asset_balances::list_for_asset(&f.conn, f.asset)
        .unwrap()
        .into_iter()
        .map(|s| (s.date, s.balance))
        .collect();
    ledger::reset_and_recalculate_balance(&mut f.conn, f.asset).unwrap();
    let replayed: Vec<_> = asset_balances::list_for_asset(&f.conn, f.asset)
        .unwrap()
        .into_iter()
        .map(|s| (s.date, s.balance))
        .collect();
    assert_eq!(incremental, replayed);
    assert!(ledger::balance_drift(&f.conn).unwrap().is_empty());
}

#[test]
fn series_is_forward_filled_and_stable() {
    let mut f = setup();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("100"), d(2025, 6, 2)))
        .unwrap();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.food, dec("40"), d(2025, 6, 4)))
        .unwrap();

    let series = ledger::daily_balance_series(&f.conn, f.asset, d(2025, 6, 1), d(2025, 6, 5)).unwrap();
    let expected = vec![
        DailyBalance { date: d(2025, 6, 1), balance: dec("0") },
        DailyBalance { date: d(2025, 6, 2), balance: dec("100") },
        DailyBalance { date: d(2025, 6, 3), balance: dec("100") },
        DailyBalance { date: d(2025, 6, 4), balance: dec("60") },
        DailyBalance { date: d(2025, 6, 5), balance: dec("60") },
    ];
    assert_eq!(series, expected);

    let again = ledger::daily_balance_series(&f.conn, f.asset, d(2025, 6, 1), d(2025, 6, 5)).unwrap();
    assert_eq!(series, again);
    assert_eq!(
        ledger::resolve_balance_as_of(&f.conn, f.asset, d(2025, 6, 3)).unwrap(),
        dec("100")
    );
    assert_eq!(
        ledger::resolve_balance_as_of(&f.conn, f.asset, d(2025, 5, 31)).unwrap(),
        dec("0")
    );
}

#[test]
fn series_falls_back_to_replay_without_snapshots() {
    let mut f = setup();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("80"), d(2025, 7, 1)))
        .unwrap();
    asset_balances::delete_for_asset(&f.conn, f.asset).unwrap();
    let series = ledger::daily_balance_series(&f.conn, f.asset, d(2025, 7, 1), d(2025, 7, 2)).unwrap();
    assert_eq!(series[0].balance, dec("80"));
    assert_eq!(series[1].balance, dec("80"));
}

#[test]
fn unknown_asset_is_not_found() {
    let mut f = setup();
    let err = ledger::add_balance(&f.conn, 999, dec("1"), d(2025, 1, 1)).unwrap_err();
    assert!(err.is_not_found());
    let err = ledger::reset_and_recalculate_balance(&mut f.conn, 999).unwrap_err();
    assert_eq!(err, LedgerError::not_found("asset", 999));
    let err = ledger::add_transaction(&mut f.conn, &NewTransaction::new(999, f.salary, dec("1"), d(2025, 1, 1)))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn negative_amount_is_rejected_without_side_effects() {
    let mut f = setup();
    let err = ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.food, dec("-5"), d(2025, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("0"));
    assert_eq!(asset_balances::count_for_asset(&f.conn, f.asset).unwrap(), 0);
}

#[test]
fn edit_moves_effect_between_dates_and_assets() {
    let mut f = setup();
    let savings = assets::insert(&f.conn, "Savings", None, None).unwrap();
    let id = ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("100"), d(2025, 8, 10)))
        .unwrap();

    let patch = TransactionPatch {
        amount: Some(dec("80")),
        date: Some(d(2025, 8, 5)),
        ..Default::default()
    };
    let edited = ledger::edit_transaction(&mut f.conn, id, &patch).unwrap();
    assert_eq!(edited.amount, dec("80"));
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("80"));
    assert_eq!(snapshot(&f.conn, f.asset, d(2025, 8, 5)), Some(dec("80")));
    assert_eq!(snapshot(&f.conn, f.asset, d(2025, 8, 10)), Some(dec("80")));

    let patch = TransactionPatch {
        asset_id: Some(savings),
        ..Default::default()
    };
    ledger::edit_transaction(&mut f.conn, id, &patch).unwrap();
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("0"));
    assert_eq!(assets::get(&f.conn, savings).unwrap().balance, dec("80"));
    assert!(ledger::balance_drift(&f.conn).unwrap().is_empty());
}

#[test]
fn edit_of_description_leaves_balance_alone() {
    let mut f = setup();
    let id = ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.food, dec("12"), d(2025, 8, 1)))
        .unwrap();
    let patch = TransactionPatch {
        description: Some(Some("lunch".into())),
        excluded_from_reports: Some(true),
        ..Default::default()
    };
    let edited = ledger::edit_transaction(&mut f.conn, id, &patch).unwrap();
    assert_eq!(edited.description.as_deref(), Some("lunch"));
    assert!(edited.excluded_from_reports);
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("-12"));
}

#[test]
fn delete_reverses_effect() {
    let mut f = setup();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("300"), d(2025, 9, 1)))
        .unwrap();
    let id = ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.food, dec("45"), d(2025, 9, 2)))
        .unwrap();
    let removed = ledger::delete_transaction(&mut f.conn, id).unwrap();
    assert_eq!(removed.amount, dec("45"));
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("300"));
    assert_eq!(snapshot(&f.conn, f.asset, d(2025, 9, 2)), Some(dec("300")));
    assert!(ledger::delete_transaction(&mut f.conn, id).unwrap_err().is_not_found());
}

#[test]
fn category_kind_change_rewrites_history_on_recalculation() {
    let mut f = setup();
    let gifts =
        transaction_categories::insert(&f.conn, "Gifts", CategoryKind::Income, None, None).unwrap();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, gifts, dec("25"), d(2025, 10, 1)))
        .unwrap();
    assert_eq!(assets::get(&f.conn, f.asset).unwrap().balance, dec("25"));

    transaction_categories::set_kind(&f.conn, gifts, CategoryKind::Expense).unwrap();
    let drift = ledger::balance_drift(&f.conn).unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].replayed, dec("-25"));
    assert_eq!(drift[0].difference(), dec("50"));

    let report = ledger::reset_and_recalculate_balance(&mut f.conn, f.asset).unwrap();
    assert_eq!(report.balance, dec("-25"));
}

#[test]
fn recalculate_all_covers_every_asset() {
    let mut f = setup();
    let cash = assets::insert(&f.conn, "Cash", None, None).unwrap();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(cash, f.salary, dec("9"), d(2025, 2, 1)))
        .unwrap();
    assets::set_balance(&f.conn, cash, dec("0")).unwrap();
    let reports = ledger::recalculate_all(&mut f.conn).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports.iter().filter(|r| r.drifted()).count(), 1);
    assert_eq!(assets::get(&f.conn, cash).unwrap().balance, dec("9"));
}

#[test]
fn asset_delete_removes_its_log_and_snapshots() {
    let mut f = setup();
    let keep = assets::insert(&f.conn, "Savings", None, None).unwrap();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(f.asset, f.salary, dec("40"), d(2025, 3, 1)))
        .unwrap();
    ledger::add_transaction(&mut f.conn, &NewTransaction::new(keep, f.salary, dec("15"), d(2025, 3, 1)))
        .unwrap();

    assets::delete(&mut f.conn, f.asset).unwrap();
    assert!(assets::find(&f.conn, f.asset).unwrap().is_none());
    assert_eq!(asset_balances::count_for_asset(&f.conn, f.asset).unwrap(), 0);
    assert!(transactions::list_for_asset(&f.conn, f.asset).unwrap().is_empty());
    assert_eq!(transactions::list_for_asset(&f.conn, keep).unwrap().len(), 1);

    let err = assets::delete(&mut f.conn, f.asset).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(asset_balances::count_for_asset(&f.conn, keep).unwrap(), 1);
}
