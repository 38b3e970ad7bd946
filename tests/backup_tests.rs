// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::backup::{Snapshot, export_snapshot, import_snapshot};
use assetbook::context::{AppContext, Clock};
use assetbook::ledger;
use assetbook::models::{CategoryKind, NewBudget, NewTransaction};
use assetbook::store::{asset_balances, asset_categories, assets, budgets, transaction_categories};
use assetbook::{cli, commands, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn populated() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    let bank = asset_categories::insert(&conn, "Bank", Some("checking and savings"), None).unwrap();
    let a = assets::insert(&conn, "Checking", Some(bank), Some("bank")).unwrap();
    let pay = transaction_categories::insert(&conn, "Pay", CategoryKind::Income, None, None).unwrap();
    let food = transaction_categories::insert(&conn, "Food", CategoryKind::Expense, None, None).unwrap();

    let mut t = NewTransaction::new(a, pay, Decimal::from(2500), d(2025, 1, 1));
    t.photos = vec!["payslip.png".into()];
    ledger::add_transaction(&mut conn, &t).unwrap();
    let mut t = NewTransaction::new(a, food, Decimal::new(1999, 2), d(2025, 1, 4));
    t.description = Some("groceries".into());
    ledger::add_transaction(&mut conn, &t).unwrap();

    let b = NewBudget {
        category_id: food,
        amount: Decimal::from(300),
        description: None,
        start_date: Some(d(2025, 1, 1)),
        end_date: Some(d(2025, 1, 31)),
        is_repeating: true,
    };
    budgets::insert(&conn, &b, d(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap()).unwrap();
    conn
}

#[test]
fn snapshot_round_trip_restores_store() {
    let source = populated();
    let snapshot = export_snapshot(&source).unwrap();
    let raw = serde_json::to_string(&snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&raw).unwrap();

    let mut target = db::open_in_memory().unwrap();
    let reports = import_snapshot(&mut target, &parsed).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].drifted());

    let restored = export_snapshot(&target).unwrap();
    assert_eq!(restored.assets, snapshot.assets);
    assert_eq!(restored.transactions, snapshot.transactions);
    assert_eq!(restored.budgets, snapshot.budgets);
    assert_eq!(restored.transaction_categories, snapshot.transaction_categories);
    assert_eq!(restored.transactions[0].photos, vec!["payslip.png".to_string()]);
}

#[test]
fn import_recalculates_tampered_balances() {
    let source = populated();
    let mut snapshot = export_snapshot(&source).unwrap();
    snapshot.assets[0].balance = Decimal::from(1);
    snapshot.asset_balances.clear();

    let mut target = db::open_in_memory().unwrap();
    let reports = import_snapshot(&mut target, &snapshot).unwrap();
    assert!(reports[0].drifted());
    let asset = assets::get(&target, snapshot.assets[0].id).unwrap();
    assert_eq!(asset.balance, Decimal::new(248001, 2));
    assert_eq!(asset_balances::count_for_asset(&target, asset.id).unwrap(), 2);
}

#[test]
fn import_refuses_non_empty_store() {
    let source = populated();
    let snapshot = export_snapshot(&source).unwrap();
    let mut target = populated();
    assert!(import_snapshot(&mut target, &snapshot).is_err());
}

#[test]
fn backup_and_export_commands_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let backup_path = dir.path().join("backup.json");
    let csv_path = dir.path().join("tx.csv");

    let clock = Clock::Fixed(d(2025, 1, 10).and_hms_opt(8, 0, 0).unwrap());
    let mut ctx = AppContext::new(populated(), clock).unwrap();
    for args in [
        vec!["assetbook", "backup", "export", "--out", backup_path.to_str().unwrap()],
        vec!["assetbook", "export", "transactions", "--format", "csv", "--out", csv_path.to_str().unwrap()],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        assert!(commands::dispatch(&mut ctx, &matches).unwrap());
    }

    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][3], "Food");
    assert_eq!(&records[1][6], "groceries");

    let mut fresh = AppContext::in_memory(clock).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "assetbook",
        "backup",
        "import",
        "--path",
        backup_path.to_str().unwrap(),
    ]);
    assert!(commands::dispatch(&mut fresh, &matches).unwrap());
    assert_eq!(assets::list(&fresh.conn).unwrap().len(), 1);
    assert!(ledger::balance_drift(&fresh.conn).unwrap().is_empty());
}
