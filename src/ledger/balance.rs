// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance queries over committed entries.
//!
//! Amounts are stored as decimal TEXT and summed as `Decimal` in Rust; SQL
//! aggregation would coerce to binary floats, which is a correctness bug
//! here, not a cosmetic one.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerResult;
use crate::ledger::accounts;
use crate::models::{Classification, VoucherType};

fn parse_amount(s: &str, col: usize) -> rusqlite::Result<Decimal> {
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Point-in-time balance: opening + Σdebit − Σcredit over committed entries,
/// optionally bounded to vouchers dated on or before `as_of`.
pub fn balance(
    conn: &Connection,
    business_id: i64,
    account_id: i64,
    as_of: Option<NaiveDate>,
) -> LedgerResult<Decimal> {
    let account = accounts::resolve(conn, business_id, account_id)?;

    let mut sql = String::from(
        "SELECT e.debit, e.credit
         FROM journal_entries e JOIN vouchers v ON e.voucher_id = v.id
         WHERE e.account_id = ?1 AND v.business_id = ?2",
    );
    if as_of.is_some() {
        sql.push_str(" AND v.date <= ?3");
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut total = account.opening_balance;
    let fold = |r: &rusqlite::Row<'_>| -> rusqlite::Result<(Decimal, Decimal)> {
        let debit: String = r.get(0)?;
        let credit: String = r.get(1)?;
        Ok((parse_amount(&debit, 0)?, parse_amount(&credit, 1)?))
    };
    let rows: Vec<rusqlite::Result<(Decimal, Decimal)>> = match as_of {
        Some(d) => stmt
            .query_map(params![account_id, business_id, d.to_string()], fold)?
            .collect(),
        None => stmt.query_map(params![account_id, business_id], fold)?.collect(),
    };
    for row in rows {
        let (debit, credit) = row?;
        total += debit;
        total -= credit;
    }
    Ok(total)
}

/// One movement on an account, with the running balance after it.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    pub date: NaiveDate,
    pub voucher_type: VoucherType,
    pub voucher_number: String,
    pub narration: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running: Decimal,
}

/// Chronological listing of an account's committed movements.
pub fn account_statement(
    conn: &Connection,
    business_id: i64,
    account_id: i64,
) -> LedgerResult<Vec<StatementRow>> {
    let account = accounts::resolve(conn, business_id, account_id)?;

    let mut stmt = conn.prepare(
        "SELECT v.date, v.voucher_type, v.voucher_number, v.narration, e.debit, e.credit
         FROM journal_entries e JOIN vouchers v ON e.voucher_id = v.id
         WHERE e.account_id = ?1 AND v.business_id = ?2
         ORDER BY v.date, v.id, e.id",
    )?;
    let rows = stmt.query_map(params![account_id, business_id], |r| {
        let debit: String = r.get(4)?;
        let credit: String = r.get(5)?;
        Ok((
            r.get::<_, NaiveDate>(0)?,
            r.get::<_, VoucherType>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            parse_amount(&debit, 4)?,
            parse_amount(&credit, 5)?,
        ))
    })?;

    let mut running = account.opening_balance;
    let mut out = Vec::new();
    for row in rows {
        let (date, voucher_type, voucher_number, narration, debit, credit) = row?;
        running += debit;
        running -= credit;
        out.push(StatementRow {
            date,
            voucher_type,
            voucher_number,
            narration,
            debit,
            credit,
            running,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialRow {
    pub account: String,
    pub code: Option<String>,
    pub classification: Classification,
    pub balance: Decimal,
}

/// Every account of a business with its current balance.
pub fn trial_balance(conn: &Connection, business_id: i64) -> Result<Vec<TrialRow>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.code, g.classification
         FROM accounts a JOIN account_groups g ON a.group_id = g.id
         WHERE a.business_id = ?1 ORDER BY a.name",
    )?;
    let metas = stmt.query_map(params![business_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Classification>(3)?,
        ))
    })?;
    let mut accounts_meta = Vec::new();
    for m in metas {
        accounts_meta.push(m?);
    }

    let mut out = Vec::new();
    for (id, name, code, classification) in accounts_meta {
        let bal = balance(conn, business_id, id, None)?;
        out.push(TrialRow {
            account: name,
            code,
            classification,
            balance: bal,
        });
    }
    Ok(out)
}
