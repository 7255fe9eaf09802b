// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Posting transaction manager: the sole mutation entry point for the ledger.
//!
//! A commit resolves the period, validates the request, and then writes the
//! header and all lines inside one IMMEDIATE transaction. The duplicate check
//! and the insert share that transaction, so two writers racing on the same
//! (business, type, number, year) serialize: one wins, the other gets
//! `DuplicateVoucherNumber`. Any failure rolls everything back; no reader
//! ever observes a partial voucher.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{periods, validate};
use crate::models::{JournalEntry, Voucher, VoucherRequest};

pub fn commit(conn: &mut Connection, req: &VoucherRequest) -> LedgerResult<Voucher> {
    let fy = periods::get(conn, req.business_id, req.financial_year_id)?;
    let ready = validate::validate(conn, req, &fy)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM vouchers
             WHERE business_id=?1 AND voucher_type=?2 AND voucher_number=?3
               AND financial_year_id=?4",
            params![
                req.business_id,
                req.voucher_type,
                req.voucher_number,
                req.financial_year_id
            ],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(duplicate(req));
    }

    tx.execute(
        "INSERT INTO vouchers(business_id, financial_year_id, voucher_type,
                              voucher_number, date, narration, is_draft)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            req.business_id,
            req.financial_year_id,
            req.voucher_type,
            req.voucher_number,
            req.date.to_string(),
            req.narration,
            req.is_draft as i64
        ],
    )
    .map_err(|e| map_unique(e, req))?;
    let voucher_id = tx.last_insert_rowid();

    {
        let mut ins = tx.prepare_cached(
            "INSERT INTO journal_entries(voucher_id, account_id, debit, credit)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for line in ready.lines() {
            ins.execute(params![
                voucher_id,
                line.account_id,
                line.debit.to_string(),
                line.credit.to_string()
            ])?;
        }
    }

    let (created_at, updated_at): (String, String) = tx.query_row(
        "SELECT created_at, updated_at FROM vouchers WHERE id=?1",
        params![voucher_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;

    tx.commit()?;

    Ok(Voucher {
        id: voucher_id,
        business_id: req.business_id,
        financial_year_id: req.financial_year_id,
        voucher_type: req.voucher_type,
        voucher_number: req.voucher_number.clone(),
        date: req.date,
        narration: req.narration.clone(),
        is_draft: req.is_draft,
        created_at,
        updated_at,
    })
}

fn duplicate(req: &VoucherRequest) -> LedgerError {
    LedgerError::DuplicateVoucherNumber {
        voucher_type: req.voucher_type.as_str().to_string(),
        number: req.voucher_number.clone(),
    }
}

/// A UNIQUE violation on the voucher insert means another writer committed
/// the same number between our check and our insert.
fn map_unique(e: rusqlite::Error, req: &VoucherRequest) -> LedgerError {
    match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            duplicate(req)
        }
        other => LedgerError::Storage(other),
    }
}

/// Fetch a committed voucher with its lines.
///
/// Tenant-scoped: a voucher of another business reads as not found.
pub fn voucher_with_entries(
    conn: &Connection,
    business_id: i64,
    voucher_id: i64,
) -> anyhow::Result<(Voucher, Vec<JournalEntry>)> {
    let v = conn
        .query_row(
            "SELECT id, business_id, financial_year_id, voucher_type, voucher_number,
                    date, narration, is_draft, created_at, updated_at
             FROM vouchers WHERE id=?1",
            params![voucher_id],
            |r| {
                Ok(Voucher {
                    id: r.get(0)?,
                    business_id: r.get(1)?,
                    financial_year_id: r.get(2)?,
                    voucher_type: r.get(3)?,
                    voucher_number: r.get(4)?,
                    date: r.get(5)?,
                    narration: r.get(6)?,
                    is_draft: r.get::<_, i64>(7)? != 0,
                    created_at: r.get(8)?,
                    updated_at: r.get(9)?,
                })
            },
        )
        .optional()?;
    let v = match v {
        Some(v) if v.business_id == business_id => v,
        _ => anyhow::bail!("Voucher {} not found", voucher_id),
    };

    let mut stmt = conn.prepare(
        "SELECT id, voucher_id, account_id, debit, credit
         FROM journal_entries WHERE voucher_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![voucher_id], |r| {
        let debit: String = r.get(3)?;
        let credit: String = r.get(4)?;
        let debit = debit.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let credit = credit.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(JournalEntry {
            id: r.get(0)?,
            voucher_id: r.get(1)?,
            account_id: r.get(2)?,
            debit,
            credit,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok((v, entries))
}
