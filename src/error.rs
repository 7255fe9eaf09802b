// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result of a ledger-core operation.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Typed failures of the posting engine.
///
/// Every variant except `Storage` is detected before any row is written and
/// is recoverable by resubmitting a corrected request. `Storage` wraps the
/// underlying database error; a failed commit rolls back in full either way.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("financial year is locked; no postings may target it")]
    PeriodLocked,

    #[error("voucher date {date} is outside the financial year {start}..={end}")]
    DateOutOfPeriod {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no financial year covers the requested date or id")]
    PeriodNotFound,

    #[error("account {0} does not exist")]
    UnknownAccount(i64),

    #[error("malformed entry line: {0}")]
    MalformedEntryLine(String),

    #[error("unbalanced voucher: debits total {debits}, credits total {credits}")]
    UnbalancedVoucher { debits: Decimal, credits: Decimal },

    #[error("duplicate voucher number: {voucher_type} #{number} already exists in this financial year")]
    DuplicateVoucherNumber { voucher_type: String, number: String },

    #[error("{0} belongs to a different business")]
    CrossTenantReference(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Stable machine-readable kind, for API layers mapping errors onto a wire.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::PeriodLocked => "period_locked",
            LedgerError::DateOutOfPeriod { .. } => "date_out_of_period",
            LedgerError::PeriodNotFound => "period_not_found",
            LedgerError::UnknownAccount(_) => "unknown_account",
            LedgerError::MalformedEntryLine(_) => "malformed_entry_line",
            LedgerError::UnbalancedVoucher { .. } => "unbalanced_voucher",
            LedgerError::DuplicateVoucherNumber { .. } => "duplicate_voucher_number",
            LedgerError::CrossTenantReference(_) => "cross_tenant_reference",
            LedgerError::Storage(_) => "storage",
        }
    }
}
