// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::balance;
use crate::utils::{fmt_money, id_for_account, id_for_business, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
struct BalanceOut<'a> {
    account: &'a str,
    as_of: Option<String>,
    balance: String,
}

pub fn handle_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let account = sub.get_one::<String>("account").unwrap();
    let as_of = sub
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let account_id = id_for_account(conn, business_id, account)?;
    let bal = balance::balance(conn, business_id, account_id, as_of)?;
    let out = BalanceOut {
        account,
        as_of: as_of.map(|d| d.to_string()),
        balance: bal.to_string(),
    };
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        match as_of {
            Some(d) => println!("{} as of {}: {}", account, d, fmt_money(&bal)),
            None => println!("{}: {}", account, fmt_money(&bal)),
        }
    }
    Ok(())
}

pub fn handle_report(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub)?,
        Some(("statement", sub)) => statement(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let data = balance::trial_balance(conn, business_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.account.clone(),
                    t.code.clone().unwrap_or_default(),
                    t.classification.as_str().to_string(),
                    fmt_money(&t.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "Code", "Classification", "Balance"], rows)
        );
    }
    Ok(())
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let account = sub.get_one::<String>("account").unwrap();
    let account_id = id_for_account(conn, business_id, account)?;
    let data = balance::account_statement(conn, business_id, account_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.date.to_string(),
                    format!("{} #{}", s.voucher_type.as_str(), s.voucher_number),
                    s.narration.clone(),
                    fmt_money(&s.debit),
                    fmt_money(&s.credit),
                    fmt_money(&s.running),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Voucher", "Narration", "Debit", "Credit", "Balance"],
                rows,
            )
        );
    }
    Ok(())
}
