// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerpost::db;
use ledgerpost::error::LedgerError;
use ledgerpost::ledger::{accounts, balance, periods, posting};
use ledgerpost::models::{Classification, EntryLine, VoucherRequest, VoucherType};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seed(conn: &Connection) -> (i64, i64, i64, i64) {
    conn.execute("INSERT INTO businesses(name) VALUES ('Acme Traders')", [])
        .unwrap();
    let business_id = conn.last_insert_rowid();
    let assets =
        accounts::create_group(conn, business_id, "Assets", None, Classification::Asset).unwrap();
    let income =
        accounts::create_group(conn, business_id, "Income", None, Classification::Income).unwrap();
    let cash =
        accounts::create_account(conn, business_id, assets, "Cash", None, Decimal::ZERO).unwrap();
    let sales =
        accounts::create_account(conn, business_id, income, "Sales", None, Decimal::ZERO).unwrap();
    let fy = periods::create_year(conn, business_id, d("2025-04-01"), d("2026-03-31")).unwrap();
    (business_id, fy, cash, sales)
}

fn request(
    business_id: i64,
    fy: i64,
    number: &str,
    date: &str,
    lines: Vec<EntryLine>,
) -> VoucherRequest {
    VoucherRequest {
        business_id,
        financial_year_id: fy,
        voucher_type: VoucherType::Sales,
        voucher_number: number.to_string(),
        date: d(date),
        narration: "test".to_string(),
        is_draft: false,
        lines,
    }
}

fn row_counts(conn: &Connection) -> (i64, i64) {
    let vouchers: i64 = conn
        .query_row("SELECT COUNT(*) FROM vouchers", [], |r| r.get(0))
        .unwrap();
    let entries: i64 = conn
        .query_row("SELECT COUNT(*) FROM journal_entries", [], |r| r.get(0))
        .unwrap();
    (vouchers, entries)
}

#[test]
fn balanced_voucher_commits_and_moves_balances() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    let amount = Decimal::new(100000, 2); // 1000.00

    let req = request(
        business,
        fy,
        "S-1",
        "2025-06-01",
        vec![EntryLine::debit(cash, amount), EntryLine::credit(sales, amount)],
    );
    let voucher = posting::commit(&mut conn, &req).unwrap();
    assert!(voucher.id > 0);
    assert!(!voucher.created_at.is_empty());
    assert_eq!(voucher.voucher_number, "S-1");

    assert_eq!(
        balance::balance(&conn, business, cash, None).unwrap(),
        amount
    );
    assert_eq!(
        balance::balance(&conn, business, sales, None).unwrap(),
        -amount
    );

    let (v, entries) = posting::voucher_with_entries(&conn, business, voucher.id).unwrap();
    assert_eq!(v.voucher_type, VoucherType::Sales);
    assert_eq!(entries.len(), 2);
    let dr: Decimal = entries.iter().map(|e| e.debit).sum();
    let cr: Decimal = entries.iter().map(|e| e.credit).sum();
    assert_eq!(dr, cr);
}

#[test]
fn unbalanced_voucher_writes_no_rows() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    let before = row_counts(&conn);

    let req = request(
        business,
        fy,
        "S-1",
        "2025-06-01",
        vec![
            EntryLine::debit(cash, Decimal::new(100000, 2)),
            EntryLine::credit(sales, Decimal::new(90000, 2)),
        ],
    );
    let err = posting::commit(&mut conn, &req).unwrap_err();
    assert!(matches!(err, LedgerError::UnbalancedVoucher { .. }));
    assert_eq!(row_counts(&conn), before);
}

#[test]
fn locked_period_rejected_and_writes_nothing() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    periods::lock(&conn, business, fy).unwrap();
    let before = row_counts(&conn);

    let req = request(
        business,
        fy,
        "S-1",
        "2025-06-01",
        vec![
            EntryLine::debit(cash, Decimal::ONE),
            EntryLine::credit(sales, Decimal::ONE),
        ],
    );
    let err = posting::commit(&mut conn, &req).unwrap_err();
    assert!(matches!(err, LedgerError::PeriodLocked));
    assert_eq!(row_counts(&conn), before);
}

#[test]
fn unknown_period_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, _fy, cash, sales) = seed(&conn);
    let req = request(
        business,
        9999,
        "S-1",
        "2025-06-01",
        vec![
            EntryLine::debit(cash, Decimal::ONE),
            EntryLine::credit(sales, Decimal::ONE),
        ],
    );
    let err = posting::commit(&mut conn, &req).unwrap_err();
    assert!(matches!(err, LedgerError::PeriodNotFound));
}

#[test]
fn cross_tenant_period_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, _fy, cash, sales) = seed(&conn);
    conn.execute("INSERT INTO businesses(name) VALUES ('Other Co')", [])
        .unwrap();
    let other = conn.last_insert_rowid();
    let foreign_fy =
        periods::create_year(&conn, other, d("2025-04-01"), d("2026-03-31")).unwrap();

    let req = request(
        business,
        foreign_fy,
        "S-1",
        "2025-06-01",
        vec![
            EntryLine::debit(cash, Decimal::ONE),
            EntryLine::credit(sales, Decimal::ONE),
        ],
    );
    let err = posting::commit(&mut conn, &req).unwrap_err();
    assert!(matches!(err, LedgerError::CrossTenantReference(_)));
}

#[test]
fn duplicate_number_rejected_sequentially() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    let lines = vec![
        EntryLine::debit(cash, Decimal::ONE),
        EntryLine::credit(sales, Decimal::ONE),
    ];

    posting::commit(&mut conn, &request(business, fy, "S-7", "2025-06-01", lines.clone())).unwrap();
    let err = posting::commit(
        &mut conn,
        &request(business, fy, "S-7", "2025-07-01", lines),
    )
    .unwrap_err();
    match err {
        LedgerError::DuplicateVoucherNumber { voucher_type, number } => {
            assert_eq!(voucher_type, "sales");
            assert_eq!(number, "S-7");
        }
        other => panic!("expected DuplicateVoucherNumber, got {:?}", other),
    }
    let (vouchers, _) = row_counts(&conn);
    assert_eq!(vouchers, 1);
}

#[test]
fn same_number_different_type_is_fine() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    let lines = vec![
        EntryLine::debit(cash, Decimal::ONE),
        EntryLine::credit(sales, Decimal::ONE),
    ];
    posting::commit(&mut conn, &request(business, fy, "1", "2025-06-01", lines.clone())).unwrap();
    let mut journal = request(business, fy, "1", "2025-06-01", lines);
    journal.voucher_type = VoucherType::Journal;
    posting::commit(&mut conn, &journal).unwrap();
    assert_eq!(row_counts(&conn).0, 2);
}

#[test]
fn draft_flag_is_persisted() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    let mut req = request(
        business,
        fy,
        "S-9",
        "2025-06-01",
        vec![
            EntryLine::debit(cash, Decimal::ONE),
            EntryLine::credit(sales, Decimal::ONE),
        ],
    );
    req.is_draft = true;
    let voucher = posting::commit(&mut conn, &req).unwrap();
    let (v, _) = posting::voucher_with_entries(&conn, business, voucher.id).unwrap();
    assert!(v.is_draft);
}

#[test]
fn racing_commits_on_same_number_yield_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.sqlite");
    let conn = db::open_or_init_at(&path).unwrap();
    let (business, fy, cash, sales) = seed(&conn);
    drop(conn);

    let mk_req = move || {
        request(
            business,
            fy,
            "S-RACE",
            "2025-06-01",
            vec![
                EntryLine::debit(cash, Decimal::new(50000, 2)),
                EntryLine::credit(sales, Decimal::new(50000, 2)),
            ],
        )
    };

    let mut handles = Vec::new();
    for _ in 0..2 {
        let path = path.clone();
        let req = mk_req();
        handles.push(std::thread::spawn(move || {
            let mut conn = db::open_or_init_at(&path).unwrap();
            posting::commit(&mut conn, &req)
        }));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one of two racing commits must succeed");
    let loser = results.into_iter().find(|r| r.is_err()).unwrap().unwrap_err();
    assert!(matches!(loser, LedgerError::DuplicateVoucherNumber { .. }));

    let conn = db::open_or_init_at(&path).unwrap();
    let vouchers: i64 = conn
        .query_row("SELECT COUNT(*) FROM vouchers", [], |r| r.get(0))
        .unwrap();
    let entries: i64 = conn
        .query_row("SELECT COUNT(*) FROM journal_entries", [], |r| r.get(0))
        .unwrap();
    assert_eq!((vouchers, entries), (1, 2));
}
