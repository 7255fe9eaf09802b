// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account directory: the chart of accounts, grouped and classified.
//!
//! Read paths return typed [`LedgerError`] values so the posting engine can
//! report precisely why a reference was bad. A lookup that resolves to
//! another tenant's account is reported as `CrossTenantReference` and leaks
//! nothing about the foreign row.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountGroup, Classification};

pub fn create_group(
    conn: &Connection,
    business_id: i64,
    name: &str,
    parent_id: Option<i64>,
    classification: Classification,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO account_groups(business_id, name, parent_id, classification)
         VALUES (?1, ?2, ?3, ?4)",
        params![business_id, name, parent_id, classification],
    )
    .with_context(|| format!("Create account group '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn create_account(
    conn: &Connection,
    business_id: i64,
    group_id: i64,
    name: &str,
    code: Option<&str>,
    opening_balance: Decimal,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts(business_id, group_id, name, code, opening_balance)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![business_id, group_id, name, code, opening_balance.to_string()],
    )
    .with_context(|| format!("Create account '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

fn account_from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    let opening: String = r.get(5)?;
    let opening = opening.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Account {
        id: r.get(0)?,
        business_id: r.get(1)?,
        group_id: r.get(2)?,
        name: r.get(3)?,
        code: r.get(4)?,
        opening_balance: opening,
    })
}

/// Resolve an account id within the caller's business.
///
/// Absent ids fail with `UnknownAccount`; ids that exist under another
/// business fail with `CrossTenantReference`.
pub fn resolve(conn: &Connection, business_id: i64, account_id: i64) -> LedgerResult<Account> {
    let acc = conn
        .query_row(
            "SELECT id, business_id, group_id, name, code, opening_balance
             FROM accounts WHERE id=?1",
            params![account_id],
            account_from_row,
        )
        .optional()?;
    match acc {
        None => Err(LedgerError::UnknownAccount(account_id)),
        Some(a) if a.business_id != business_id => {
            Err(LedgerError::CrossTenantReference("account"))
        }
        Some(a) => Ok(a),
    }
}

/// The balance seed: an account's opening balance.
pub fn opening_balance(
    conn: &Connection,
    business_id: i64,
    account_id: i64,
) -> LedgerResult<Decimal> {
    Ok(resolve(conn, business_id, account_id)?.opening_balance)
}

/// Rename an account. The only mutations permitted on a posted account are
/// renaming and recoding.
pub fn rename(
    conn: &Connection,
    business_id: i64,
    account_id: i64,
    new_name: &str,
) -> LedgerResult<()> {
    resolve(conn, business_id, account_id)?;
    conn.execute(
        "UPDATE accounts SET name=?1 WHERE id=?2 AND business_id=?3",
        params![new_name, account_id, business_id],
    )?;
    Ok(())
}

pub fn recode(
    conn: &Connection,
    business_id: i64,
    account_id: i64,
    new_code: Option<&str>,
) -> LedgerResult<()> {
    resolve(conn, business_id, account_id)?;
    conn.execute(
        "UPDATE accounts SET code=?1 WHERE id=?2 AND business_id=?3",
        params![new_code, account_id, business_id],
    )?;
    Ok(())
}

pub fn list(conn: &Connection, business_id: i64) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_id, group_id, name, code, opening_balance
         FROM accounts WHERE business_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![business_id], account_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_groups(conn: &Connection, business_id: i64) -> Result<Vec<AccountGroup>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_id, name, parent_id, classification
         FROM account_groups WHERE business_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![business_id], |r| {
        Ok(AccountGroup {
            id: r.get(0)?,
            business_id: r.get(1)?,
            name: r.get(2)?,
            parent_id: r.get(3)?,
            classification: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
