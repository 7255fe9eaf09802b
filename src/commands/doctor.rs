// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Integrity sweep over the committed ledger. Every check here mirrors an
/// invariant the posting path enforces, so a healthy database reports clean.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Committed vouchers whose lines do not balance
    let mut stmt = conn.prepare(
        "SELECT v.id, e.debit, e.credit
         FROM vouchers v JOIN journal_entries e ON e.voucher_id=v.id
         ORDER BY v.id",
    )?;
    let mut cur = stmt.query([])?;
    let mut sums: BTreeMap<i64, (Decimal, Decimal)> = BTreeMap::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let debit: String = r.get(1)?;
        let credit: String = r.get(2)?;
        let entry = sums.entry(id).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += debit.parse::<Decimal>()?;
        entry.1 += credit.parse::<Decimal>()?;
    }
    for (id, (dr, cr)) in &sums {
        if dr != cr {
            rows.push(vec![
                "unbalanced_voucher".into(),
                format!("voucher {} dr={} cr={}", id, dr, cr),
            ]);
        }
    }

    // 2) Entries whose account belongs to a different business than the voucher
    let mut stmt2 = conn.prepare(
        "SELECT e.id, v.id FROM journal_entries e
         JOIN vouchers v ON e.voucher_id=v.id
         JOIN accounts a ON e.account_id=a.id
         WHERE a.business_id != v.business_id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let entry_id: i64 = r.get(0)?;
        let voucher_id: i64 = r.get(1)?;
        rows.push(vec![
            "cross_tenant_entry".into(),
            format!("entry {} on voucher {}", entry_id, voucher_id),
        ]);
    }

    // 3) Vouchers dated outside their financial year
    let mut stmt3 = conn.prepare(
        "SELECT v.id, v.date, fy.start_date, fy.end_date
         FROM vouchers v JOIN financial_years fy ON v.financial_year_id=fy.id
         WHERE v.date < fy.start_date OR v.date > fy.end_date",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        rows.push(vec![
            "date_outside_period".into(),
            format!("voucher {} dated {}", id, date),
        ]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
