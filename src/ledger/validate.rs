// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Voucher validation: pure rule-checking over a proposed transaction.
//!
//! Performs read-only lookups through the account directory and writes
//! nothing. On success it yields a [`CommitReady`], the normalized
//! representation the posting path inserts verbatim.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::accounts;
use crate::models::{EntryLine, FinancialYear, VoucherRequest};

/// A validated, immutable transaction ready to be written.
#[derive(Debug, Clone)]
pub struct CommitReady {
    lines: Vec<EntryLine>,
    total: Decimal,
}

impl CommitReady {
    pub fn lines(&self) -> &[EntryLine] {
        &self.lines
    }

    /// The common total: debits and credits are equal by construction.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Check a proposed voucher against the period, line, and balance rules.
///
/// Check order matters and is observable through the returned error:
/// period lock, date window, per-line shape and account resolution,
/// then the exact-decimal balance of the totals.
pub fn validate(
    conn: &Connection,
    req: &VoucherRequest,
    fy: &FinancialYear,
) -> LedgerResult<CommitReady> {
    if fy.is_locked {
        return Err(LedgerError::PeriodLocked);
    }
    if !fy.contains(req.date) {
        return Err(LedgerError::DateOutOfPeriod {
            date: req.date,
            start: fy.start_date,
            end: fy.end_date,
        });
    }

    if req.lines.is_empty() {
        return Err(LedgerError::MalformedEntryLine(
            "voucher has no lines".to_string(),
        ));
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for (i, line) in req.lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::MalformedEntryLine(format!(
                "line {}: amounts must be non-negative",
                i + 1
            )));
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(LedgerError::MalformedEntryLine(format!(
                "line {}: a line cannot carry both a debit and a credit",
                i + 1
            )));
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(LedgerError::MalformedEntryLine(format!(
                "line {}: a line must carry either a debit or a credit",
                i + 1
            )));
        }
        accounts::resolve(conn, req.business_id, line.account_id)?;
        total_debits += line.debit;
        total_credits += line.credit;
    }

    if total_debits != total_credits {
        return Err(LedgerError::UnbalancedVoucher {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(CommitReady {
        lines: req.lines.clone(),
        total: total_debits,
    })
}
