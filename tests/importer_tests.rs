// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerpost::{cli, commands::importer, db};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute("INSERT INTO businesses(name) VALUES ('Acme Traders')", [])
        .unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "ledgerpost",
        "import",
        "accounts",
        "--business",
        "Acme Traders",
        path,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn importer_builds_groups_and_accounts_with_openings() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "group,classification,account,code,opening_balance\n\
         Current Assets,asset,Cash,1001,2500.00\n\
         Current Assets,asset,Bank,1002,10000.50\n\
         Sundry Creditors,liability,Generic Supplier Ltd,2001,-300.00"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let groups: i64 = conn
        .query_row("SELECT COUNT(*) FROM account_groups", [], |r| r.get(0))
        .unwrap();
    assert_eq!(groups, 2);

    let (code, opening): (Option<String>, String) = conn
        .query_row(
            "SELECT code, opening_balance FROM accounts WHERE name='Cash'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(code.as_deref(), Some("1001"));
    assert_eq!(opening, "2500.00");

    let classification: String = conn
        .query_row(
            "SELECT classification FROM account_groups WHERE name='Sundry Creditors'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(classification, "liability");
}

#[test]
fn importer_defaults_missing_fields() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "group,classification,account,code,opening_balance\n\
         Expenses,expense,Purchases,,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let (code, opening): (Option<String>, String) = conn
        .query_row(
            "SELECT code, opening_balance FROM accounts WHERE name='Purchases'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert!(code.is_none());
    assert_eq!(opening, "0");
}

#[test]
fn importer_rolls_back_on_a_bad_row() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "group,classification,account,code,opening_balance\n\
         Current Assets,asset,Cash,1001,2500.00\n\
         Current Assets,stocks-and-bonds,Shares,1003,100.00"
    )
    .unwrap();
    file.flush().unwrap();

    assert!(run_import(&mut conn, file.path().to_str().unwrap()).is_err());

    // The bad classification on row two undoes row one as well.
    let accounts: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(accounts, 0);
    let groups: i64 = conn
        .query_row("SELECT COUNT(*) FROM account_groups", [], |r| r.get(0))
        .unwrap();
    assert_eq!(groups, 0);
}

#[test]
fn importer_reuses_an_existing_group() {
    let mut conn = base_conn();
    conn.execute(
        "INSERT INTO account_groups(business_id, name, classification)
         VALUES (1, 'Expenses', 'expense')",
        [],
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "group,classification,account,code,opening_balance\n\
         Expenses,expense,Freight,,0"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let groups: i64 = conn
        .query_row("SELECT COUNT(*) FROM account_groups", [], |r| r.get(0))
        .unwrap();
    assert_eq!(groups, 1);
}
