// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::bail;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A client business: the tenant boundary. Every ledger row is scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub gstin: Option<String>,
}

/// Top-level accounting classification of a group and its accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Asset => "asset",
            Classification::Liability => "liability",
            Classification::Equity => "equity",
            Classification::Income => "income",
            Classification::Expense => "expense",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "asset" => Some(Classification::Asset),
            "liability" => Some(Classification::Liability),
            "equity" => Some(Classification::Equity),
            "income" => Some(Classification::Income),
            "expense" => Some(Classification::Expense),
            _ => None,
        }
    }
}

impl FromStr for Classification {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(&s.to_lowercase()) {
            Some(c) => Ok(c),
            None => bail!(
                "Unknown classification '{}' (expected asset|liability|equity|income|expense)",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountGroup {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub classification: Classification,
}

/// A postable ledger account. Immutable once it has entries, except for
/// renaming/recoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub business_id: i64,
    pub group_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialYear {
    pub id: i64,
    pub business_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_locked: bool,
}

impl FinancialYear {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    Sales,
    Purchase,
    Payment,
    Receipt,
    Contra,
    Journal,
}

impl VoucherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Sales => "sales",
            VoucherType::Purchase => "purchase",
            VoucherType::Payment => "payment",
            VoucherType::Receipt => "receipt",
            VoucherType::Contra => "contra",
            VoucherType::Journal => "journal",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(VoucherType::Sales),
            "purchase" => Some(VoucherType::Purchase),
            "payment" => Some(VoucherType::Payment),
            "receipt" => Some(VoucherType::Receipt),
            "contra" => Some(VoucherType::Contra),
            "journal" => Some(VoucherType::Journal),
            _ => None,
        }
    }
}

impl FromStr for VoucherType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(&s.to_lowercase()) {
            Some(t) => Ok(t),
            None => bail!(
                "Unknown voucher type '{}' (expected sales|purchase|payment|receipt|contra|journal)",
                s
            ),
        }
    }
}

/// A committed transaction header. Created once by the posting path and
/// immutable afterwards; corrections are new compensating vouchers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub id: i64,
    pub business_id: i64,
    pub financial_year_id: i64,
    pub voucher_type: VoucherType,
    pub voucher_number: String,
    pub date: NaiveDate,
    pub narration: String,
    pub is_draft: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A single debit-or-credit line of a committed voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub voucher_id: i64,
    pub account_id: i64,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// One proposed posting line: exactly one side must be strictly positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLine {
    pub account_id: i64,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl EntryLine {
    pub fn debit(account_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(account_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// A proposed transaction, as assembled by a caller (CLI, document pipeline,
/// or an API layer) and submitted to `ledger::posting::commit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRequest {
    pub business_id: i64,
    pub financial_year_id: i64,
    pub voucher_type: VoucherType,
    pub voucher_number: String,
    pub date: NaiveDate,
    pub narration: String,
    pub is_draft: bool,
    pub lines: Vec<EntryLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Invoice,
    Bill,
    BankStatement,
    Other,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Invoice => "invoice",
            DocType::Bill => "bill",
            DocType::BankStatement => "bank_statement",
            DocType::Other => "other",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(DocType::Invoice),
            "bill" => Some(DocType::Bill),
            "bank_statement" => Some(DocType::BankStatement),
            "other" => Some(DocType::Other),
            _ => None,
        }
    }
}

impl FromStr for DocType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(&s.to_lowercase()) {
            Some(t) => Ok(t),
            None => bail!(
                "Unknown document type '{}' (expected invoice|bill|bank_statement|other)",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Pending,
    Processing,
    Processed,
    Failed,
    Reviewed,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Pending => "pending",
            DocStatus::Processing => "processing",
            DocStatus::Processed => "processed",
            DocStatus::Failed => "failed",
            DocStatus::Reviewed => "reviewed",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocStatus::Pending),
            "processing" => Some(DocStatus::Processing),
            "processed" => Some(DocStatus::Processed),
            "failed" => Some(DocStatus::Failed),
            "reviewed" => Some(DocStatus::Reviewed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub business_id: i64,
    pub doc_type: DocType,
    pub status: DocStatus,
    pub source_path: String,
    pub ai_metadata: Option<String>,
    pub error: Option<String>,
    pub voucher_id: Option<i64>,
}

macro_rules! impl_text_sql {
    ($t:ty) => {
        impl ToSql for $t {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $t {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                <$t>::parse(s).ok_or(FromSqlError::InvalidType)
            }
        }
    };
}

impl_text_sql!(Classification);
impl_text_sql!(VoucherType);
impl_text_sql!(DocType);
impl_text_sql!(DocStatus);
