// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerpost::db;
use ledgerpost::error::LedgerError;
use ledgerpost::ledger::{accounts, periods, posting};
use ledgerpost::models::{Classification, EntryLine, VoucherRequest, VoucherType};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seed(conn: &Connection) -> (i64, i64, i64, i64) {
    conn.execute("INSERT INTO businesses(name) VALUES ('Acme Traders')", [])
        .unwrap();
    let business = conn.last_insert_rowid();
    let assets =
        accounts::create_group(conn, business, "Assets", None, Classification::Asset).unwrap();
    let income =
        accounts::create_group(conn, business, "Income", None, Classification::Income).unwrap();
    let cash = accounts::create_account(conn, business, assets, "Cash", None, Decimal::ZERO)
        .unwrap();
    let sales = accounts::create_account(conn, business, income, "Sales", None, Decimal::ZERO)
        .unwrap();
    (business, assets, cash, sales)
}

#[test]
fn resolve_returns_the_account() {
    let conn = db::open_in_memory().unwrap();
    let (business, _assets, cash, _sales) = seed(&conn);
    let acc = accounts::resolve(&conn, business, cash).unwrap();
    assert_eq!(acc.name, "Cash");
    assert_eq!(acc.business_id, business);
}

#[test]
fn resolve_fails_closed_across_tenants() {
    let conn = db::open_in_memory().unwrap();
    let (_business, _assets, cash, _sales) = seed(&conn);
    conn.execute("INSERT INTO businesses(name) VALUES ('Other Co')", [])
        .unwrap();
    let other = conn.last_insert_rowid();

    let err = accounts::resolve(&conn, other, cash).unwrap_err();
    assert!(matches!(err, LedgerError::CrossTenantReference("account")));

    let err = accounts::resolve(&conn, other, 9999).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownAccount(9999)));
}

#[test]
fn opening_balance_is_the_seed() {
    let conn = db::open_in_memory().unwrap();
    let (business, assets, _cash, _sales) = seed(&conn);
    let acc = accounts::create_account(
        &conn,
        business,
        assets,
        "Petty Cash",
        None,
        "99.95".parse().unwrap(),
    )
    .unwrap();
    assert_eq!(
        accounts::opening_balance(&conn, business, acc).unwrap(),
        "99.95".parse::<Decimal>().unwrap()
    );
}

#[test]
fn rename_and_recode_are_permitted() {
    let conn = db::open_in_memory().unwrap();
    let (business, _assets, cash, _sales) = seed(&conn);
    accounts::rename(&conn, business, cash, "Cash in Hand").unwrap();
    accounts::recode(&conn, business, cash, Some("1001")).unwrap();
    let acc = accounts::resolve(&conn, business, cash).unwrap();
    assert_eq!(acc.name, "Cash in Hand");
    assert_eq!(acc.code.as_deref(), Some("1001"));
}

#[test]
fn account_with_entries_cannot_be_deleted() {
    let mut conn = db::open_in_memory().unwrap();
    let (business, _assets, cash, sales) = seed(&conn);
    let fy = periods::create_year(&conn, business, d("2025-04-01"), d("2026-03-31")).unwrap();
    let req = VoucherRequest {
        business_id: business,
        financial_year_id: fy,
        voucher_type: VoucherType::Journal,
        voucher_number: "J-1".to_string(),
        date: d("2025-06-01"),
        narration: String::new(),
        is_draft: false,
        lines: vec![
            EntryLine::debit(cash, Decimal::ONE),
            EntryLine::credit(sales, Decimal::ONE),
        ],
    };
    posting::commit(&mut conn, &req).unwrap();

    let res = conn.execute("DELETE FROM accounts WHERE id=?1", params![cash]);
    assert!(res.is_err(), "restrict-on-delete must refuse the deletion");
}

#[test]
fn group_with_accounts_cannot_be_deleted() {
    let conn = db::open_in_memory().unwrap();
    let (_business, assets, _cash, _sales) = seed(&conn);
    let res = conn.execute("DELETE FROM account_groups WHERE id=?1", params![assets]);
    assert!(res.is_err());
}

#[test]
fn group_hierarchy_allows_nesting() {
    let conn = db::open_in_memory().unwrap();
    let (business, assets, _cash, _sales) = seed(&conn);
    let current = accounts::create_group(
        &conn,
        business,
        "Current Assets",
        Some(assets),
        Classification::Asset,
    )
    .unwrap();
    let bank = accounts::create_group(
        &conn,
        business,
        "Bank Accounts",
        Some(current),
        Classification::Asset,
    )
    .unwrap();
    let groups = accounts::list_groups(&conn, business).unwrap();
    let bank_group = groups.iter().find(|g| g.id == bank).unwrap();
    assert_eq!(bank_group.parent_id, Some(current));
}

#[test]
fn duplicate_account_name_within_business_rejected() {
    let conn = db::open_in_memory().unwrap();
    let (business, assets, _cash, _sales) = seed(&conn);
    let res = accounts::create_account(&conn, business, assets, "Cash", None, Decimal::ZERO);
    assert!(res.is_err());

    // Same name under another business is fine.
    conn.execute("INSERT INTO businesses(name) VALUES ('Other Co')", [])
        .unwrap();
    let other = conn.last_insert_rowid();
    let g = accounts::create_group(&conn, other, "Assets", None, Classification::Asset).unwrap();
    accounts::create_account(&conn, other, g, "Cash", None, Decimal::ZERO).unwrap();
}
