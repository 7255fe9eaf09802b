// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::posting;
use crate::models::{EntryLine, VoucherRequest, VoucherType};
use crate::utils::{
    fmt_money, id_for_account, id_for_business, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use crate::ledger::periods;
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("post", sub)) => post(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Parse one `--line ACCOUNT:dr|cr:AMOUNT` argument.
fn parse_line(conn: &Connection, business_id: i64, raw: &str) -> Result<EntryLine> {
    let mut it = raw.rsplitn(3, ':');
    let amount_raw = it.next().unwrap_or_default();
    let side = it.next().unwrap_or_default().to_lowercase();
    let account = it.next().unwrap_or_default();
    if account.is_empty() {
        return Err(anyhow!(
            "Invalid line '{}', expected ACCOUNT:dr|cr:AMOUNT",
            raw
        ));
    }
    let amount = parse_decimal(amount_raw)?;
    let account_id = id_for_account(conn, business_id, account)?;
    match side.as_str() {
        "dr" => Ok(EntryLine::debit(account_id, amount)),
        "cr" => Ok(EntryLine::credit(account_id, amount)),
        _ => Err(anyhow!("Invalid side '{}' in line '{}' (dr or cr)", side, raw)),
    }
}

fn post(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business = sub.get_one::<String>("business").unwrap();
    let business_id = id_for_business(conn, business)?;
    let voucher_type: VoucherType = sub.get_one::<String>("type").unwrap().parse()?;
    let number = sub.get_one::<String>("number").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let narration = sub.get_one::<String>("narration").unwrap();
    let is_draft = sub.get_flag("draft");

    let fy = periods::find_period_for(conn, business_id, date)?;
    let mut lines = Vec::new();
    for raw in sub.get_many::<String>("line").unwrap() {
        lines.push(parse_line(conn, business_id, raw)?);
    }

    let req = VoucherRequest {
        business_id,
        financial_year_id: fy.id,
        voucher_type,
        voucher_number: number.clone(),
        date,
        narration: narration.clone(),
        is_draft,
        lines,
    };
    let voucher = posting::commit(conn, &req)?;
    println!(
        "Posted {} #{} on {} (voucher id {}{})",
        voucher.voucher_type.as_str(),
        voucher.voucher_number,
        voucher.date,
        voucher.id,
        if voucher.is_draft { ", draft" } else { "" }
    );
    Ok(())
}

#[derive(Serialize)]
pub struct VoucherRow {
    pub id: i64,
    pub date: String,
    pub voucher_type: String,
    pub number: String,
    pub narration: String,
    pub draft: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<VoucherRow>> {
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let mut sql = String::from(
        "SELECT id, date, voucher_type, voucher_number, narration, is_draft
         FROM vouchers WHERE business_id=?1 ORDER BY date DESC, id DESC",
    );
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![business_id], |r| {
        Ok(VoucherRow {
            id: r.get(0)?,
            date: r.get(1)?,
            voucher_type: r.get(2)?,
            number: r.get(3)?,
            narration: r.get(4)?,
            draft: r.get::<_, i64>(5)? != 0,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|v| {
                vec![
                    v.id.to_string(),
                    v.date.clone(),
                    v.voucher_type.clone(),
                    v.number.clone(),
                    v.narration.clone(),
                    if v.draft { "draft" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Type", "Number", "Narration", ""], rows)
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let (voucher, entries) = posting::voucher_with_entries(conn, business_id, id)?;
    if maybe_print_json(json_flag, jsonl_flag, &(&voucher, &entries))? {
        return Ok(());
    }
    println!(
        "{} #{} | {} | {}{}",
        voucher.voucher_type.as_str(),
        voucher.voucher_number,
        voucher.date,
        voucher.narration,
        if voucher.is_draft { " [draft]" } else { "" }
    );
    let mut rows = Vec::new();
    for e in &entries {
        let name: String = conn.query_row(
            "SELECT name FROM accounts WHERE id=?1",
            params![e.account_id],
            |r| r.get(0),
        )?;
        rows.push(vec![name, fmt_money(&e.debit), fmt_money(&e.credit)]);
    }
    println!("{}", pretty_table(&["Account", "Debit", "Credit"], rows));
    Ok(())
}
